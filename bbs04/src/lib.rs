//! Short group signatures from bilinear pairings.
//!
//! A member holds an SDH certificate `A = g1·(γ + x)^{−1}` on a secret `x`.
//! A signature is a linear encryption `(T1, T2, T3)` of `A` under the
//! opener's key together with a signature proof of knowledge that the
//! encrypted value is a valid certificate, bound to the message through the
//! challenge. The opener decrypts `T3` to recover `A` and looks the member
//! up in the membership list; the scheme has no tracing trapdoor.

pub mod error;
pub mod join;
pub mod open;
pub mod setup;
pub mod sign;

pub use error::Bbs04Error;
pub use join::{GmlEntry, JoinRequest, MemberKey};
pub use setup::{GroupKey, IssuerKey, ManagerKey, OpenerKey};
pub use sign::Signature;
