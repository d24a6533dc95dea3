use crate::scheme::SchemeId;
use bbs04::Bbs04Error;
use groupsig_utils::{encoding::DecodeError, LedgerError};
use kty04::Kty04Error;
use std::io;

/// Failures of the lifecycle layer. Protocol-negative outcomes
/// (verification failed, no match found) are *not* errors; they come back as
/// `Ok(false)` / `Ok(None)` from the operation itself.
#[derive(Debug)]
pub enum GroupsigError {
    UnknownSchemeCode(u8),
    /// Arguments from different schemes were mixed in one call.
    SchemeMismatch {
        expected: SchemeId,
        found: SchemeId,
    },
    /// The scheme does not implement this lifecycle operation.
    UnsupportedOperation {
        scheme: SchemeId,
        operation: &'static str,
    },
    /// A join message out of protocol order.
    UnexpectedJoinMessage,
    /// A text-format record that could not be parsed; aborts the import.
    MalformedRecord { line: usize },
    Kty04(Kty04Error),
    Bbs04(Bbs04Error),
    Ledger(LedgerError),
    Decode(DecodeError),
    Io(io::Error),
}

impl From<Kty04Error> for GroupsigError {
    fn from(e: Kty04Error) -> Self {
        Self::Kty04(e)
    }
}

impl From<Bbs04Error> for GroupsigError {
    fn from(e: Bbs04Error) -> Self {
        Self::Bbs04(e)
    }
}

impl From<LedgerError> for GroupsigError {
    fn from(e: LedgerError) -> Self {
        Self::Ledger(e)
    }
}

impl From<DecodeError> for GroupsigError {
    fn from(e: DecodeError) -> Self {
        Self::Decode(e)
    }
}

impl From<io::Error> for GroupsigError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}
