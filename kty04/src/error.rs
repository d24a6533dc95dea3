use groupsig_utils::{encoding::DecodeError, LedgerError};
use interval_pok::IntervalPokError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Kty04Error {
    InvalidParameters(&'static str),
    /// Safe-prime search exhausted its attempt budget.
    PrimeGenerationFailed,
    /// The join request's commitment does not match its tracing exponent.
    InvalidJoinRequest,
    /// The issued certificate fails the membership equation.
    InvalidCertificate,
    /// The certifying exponent has no inverse modulo the group order.
    NonInvertibleExponent,
    /// A signature object outside the group.
    MalformedSignature(&'static str),
    /// Reveal over a vacated membership-list slot.
    VacantSlot(usize),
    /// A persisted record that could not be parsed.
    MalformedRecord,
    Ledger(LedgerError),
    Proof(IntervalPokError),
    Decode(DecodeError),
}

impl From<LedgerError> for Kty04Error {
    fn from(e: LedgerError) -> Self {
        Self::Ledger(e)
    }
}

impl From<IntervalPokError> for Kty04Error {
    fn from(e: IntervalPokError) -> Self {
        Self::Proof(e)
    }
}

impl From<DecodeError> for Kty04Error {
    fn from(e: DecodeError) -> Self {
        Self::Decode(e)
    }
}
