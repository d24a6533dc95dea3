use ark_serialize::SerializationError;

#[derive(Debug)]
pub enum Bbs04Error {
    /// A signature with a zero commitment.
    ZeroSignature,
    /// The issued certificate fails the pairing check.
    InvalidCertificate,
    Serialization(SerializationError),
}

impl From<SerializationError> for Bbs04Error {
    fn from(e: SerializationError) -> Self {
        Self::Serialization(e)
    }
}
