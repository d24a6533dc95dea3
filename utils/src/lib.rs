//! Shared infrastructure for the group-signature crates: length-prefixed
//! binary records, digest-based challenge derivation, serde adapters for
//! `arkworks-rs` objects and the stable-index ledger backing the membership
//! and revocation lists.

pub mod encoding;
pub mod hashing_utils;
pub mod ledger;
pub mod serde_utils;

pub use ledger::{Ledger, LedgerError};
