//! Proofs of knowledge of discrete logs in groups of unknown order, where a
//! statement is a set of multiplicative relations over public objects and
//! hidden exponents.
//!
//! Unlike a prime-order Schnorr proof, responses here cannot be reduced
//! modulo the group order (it is unknown), so zero knowledge rests on
//! interval arithmetic instead: every hidden exponent lives in a public
//! [`Sphere`], blinding witnesses are drawn from a range that statistically
//! swamps the exponent's offset from the sphere center, and the verifier
//! gates every response on the corresponding interval bound before touching
//! any algebra.

pub mod error;
pub mod proof;
pub mod relation;
pub mod sphere;

pub use error::IntervalPokError;
pub use proof::{ProofContext, RelationSetProof};
pub use relation::{Relation, RelationSet, RelationTarget, Term};
pub use sphere::Sphere;
