//! Scheme-tagged signatures and membership proofs.

use crate::{error::GroupsigError, scheme::SchemeId};
use ark_bls12_381::Bls12_381;
use groupsig_utils::encoding::{write_u8, Reader};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Signature {
    Kty04(kty04::Signature),
    Bbs04(bbs04::Signature<Bls12_381>),
}

/// Proof that one or more signatures were produced under the same member
/// key.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EqualityProof {
    Kty04(kty04::EqualityProof),
}

impl Signature {
    pub fn scheme(&self) -> SchemeId {
        match self {
            Self::Kty04(_) => SchemeId::Kty04,
            Self::Bbs04(_) => SchemeId::Bbs04,
        }
    }

    /// `[scheme_code: u8]` followed by the scheme's length-prefixed object
    /// encoding.
    pub fn to_bytes(&self) -> Result<Vec<u8>, GroupsigError> {
        let mut out = vec![];
        write_u8(&mut out, self.scheme().code());
        match self {
            Self::Kty04(signature) => out.extend_from_slice(&signature.to_bytes()),
            Self::Bbs04(signature) => out.extend_from_slice(&signature.to_bytes()?),
        }
        Ok(out)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, GroupsigError> {
        let mut reader = Reader::new(bytes);
        let code = reader.read_u8()?;
        let scheme =
            SchemeId::from_code(code).ok_or(GroupsigError::UnknownSchemeCode(code))?;
        match scheme {
            SchemeId::Kty04 => Ok(Self::Kty04(kty04::Signature::from_bytes(&bytes[1..])?)),
            SchemeId::Bbs04 => Ok(Self::Bbs04(bbs04::Signature::from_bytes(&bytes[1..])?)),
        }
    }
}

impl EqualityProof {
    pub fn scheme(&self) -> SchemeId {
        match self {
            Self::Kty04(_) => SchemeId::Kty04,
        }
    }
}
