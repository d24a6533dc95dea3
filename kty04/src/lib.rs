//! Traceable group signatures over an RSA group.
//!
//! A member holds a certificate `(A, e)` on secret exponents `x` and `x′`
//! satisfying `A^e = C·a^x·a0` with `C = b^{x′}` modulo an RSA modulus whose
//! factorization only the group manager knows. A signature is a set of
//! blinded commitments to the certificate together with a relation-set proof
//! (see `interval_pok`) that binds them to the message. The manager can open
//! a signature to the signer's membership-list index, and a revealed tracing
//! exponent `x′` lets anyone link that member's signatures without opening
//! them.

pub mod claim;
pub mod entries;
pub mod error;
pub mod join;
pub mod keys;
pub mod open;
pub mod sign;

pub use claim::EqualityProof;
pub use entries::{CrlEntry, GmlEntry};
pub use error::Kty04Error;
pub use join::{JoinRequest, JoinResponse, PendingJoin};
pub use keys::{GroupKey, ManagerKey, MemberKey, MemberKeyPublic, SetupConfig};
pub use sign::Signature;
