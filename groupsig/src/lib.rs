//! Group signatures behind one scheme-polymorphic lifecycle.
//!
//! A group member signs so that verification only shows membership; the
//! group manager can open a signature to the signer's identity; and for
//! schemes with tracing, a revealed member trapdoor lets anyone link that
//! member's signatures through the revocation list. Every entity — keys,
//! signatures, join messages, ledgers, trapdoors — is a closed enum over the
//! registered schemes, so adding a scheme is exhaustively checked by the
//! compiler rather than dispatched through function-pointer tables.
//!
//! The implemented schemes are `kty04` (RSA-group traceable signatures with
//! the full reveal/trace/claim surface) and `bbs04` (pairing-based short
//! group signatures with opening), pinned to BLS12-381 at this layer.

pub mod crl;
pub mod error;
pub mod gml;
pub mod join;
pub mod keys;
pub mod lifecycle;
pub mod scheme;
pub mod signature;

#[cfg(test)]
mod tests;

pub use crl::{Crl, CrlEntry, Trapdoor};
pub use error::GroupsigError;
pub use gml::{Gml, GmlEntry};
pub use join::{JoinRequest, JoinResponse, PendingJoin};
pub use keys::{GroupKey, ManagerKey, MemberKey};
pub use lifecycle::{
    claim, claim_verify, join_manager, join_member_finish, join_member_start, open,
    prove_equality, prove_equality_verify, reveal, reveal_into, setup, sign, trace, verify,
    Context, SetupConfig,
};
pub use scheme::{JoinStart, RevocationPolicy, SchemeDescriptor, SchemeId, SCHEMES};
pub use signature::{EqualityProof, Signature};
