//! Scheme-tagged key material.

use crate::{error::GroupsigError, scheme::SchemeId};
use ark_bls12_381::Bls12_381;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use groupsig_utils::encoding::{
    write_bytes, write_integer, write_u32, write_u8, Reader,
};
use serde::{Deserialize, Serialize};

/// Public group parameters of one group, under one scheme.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GroupKey {
    Kty04(kty04::GroupKey),
    Bbs04(bbs04::GroupKey<Bls12_381>),
}

/// The issuing/opening authority's secrets.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ManagerKey {
    Kty04(kty04::ManagerKey),
    Bbs04(bbs04::ManagerKey<Bls12_381>),
}

/// One member's signing material.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MemberKey {
    Kty04(kty04::MemberKey),
    Bbs04(bbs04::MemberKey<Bls12_381>),
}

impl GroupKey {
    pub fn scheme(&self) -> SchemeId {
        match self {
            Self::Kty04(_) => SchemeId::Kty04,
            Self::Bbs04(_) => SchemeId::Bbs04,
        }
    }

    /// `[scheme_code: u8]` followed by the scheme's field encoding.
    pub fn to_bytes(&self) -> Result<Vec<u8>, GroupsigError> {
        let mut out = vec![];
        write_u8(&mut out, self.scheme().code());
        match self {
            Self::Kty04(key) => {
                for field in [&key.modulus, &key.a, &key.a0, &key.b, &key.g, &key.h, &key.y] {
                    write_integer(&mut out, field);
                }
                write_u32(&mut out, key.nu);
                write_u32(&mut out, key.security);
                write_u32(&mut out, key.epsilon);
            }
            Self::Bbs04(key) => {
                let mut compressed = vec![];
                key.serialize_compressed(&mut compressed)
                    .map_err(bbs04::Bbs04Error::from)?;
                write_bytes(&mut out, &compressed);
            }
        }
        Ok(out)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, GroupsigError> {
        let mut reader = Reader::new(bytes);
        let code = reader.read_u8()?;
        let scheme =
            SchemeId::from_code(code).ok_or(GroupsigError::UnknownSchemeCode(code))?;
        let key = match scheme {
            SchemeId::Kty04 => {
                let modulus = reader.read_integer()?;
                let a = reader.read_integer()?;
                let a0 = reader.read_integer()?;
                let b = reader.read_integer()?;
                let g = reader.read_integer()?;
                let h = reader.read_integer()?;
                let y = reader.read_integer()?;
                Self::Kty04(kty04::GroupKey {
                    modulus,
                    a,
                    a0,
                    b,
                    g,
                    h,
                    y,
                    nu: reader.read_u32()?,
                    security: reader.read_u32()?,
                    epsilon: reader.read_u32()?,
                })
            }
            SchemeId::Bbs04 => {
                let compressed = reader.read_bytes()?;
                Self::Bbs04(
                    bbs04::GroupKey::deserialize_compressed(compressed)
                        .map_err(bbs04::Bbs04Error::from)?,
                )
            }
        };
        reader.finish()?;
        Ok(key)
    }
}

impl ManagerKey {
    pub fn scheme(&self) -> SchemeId {
        match self {
            Self::Kty04(_) => SchemeId::Kty04,
            Self::Bbs04(_) => SchemeId::Bbs04,
        }
    }
}

impl MemberKey {
    pub fn scheme(&self) -> SchemeId {
        match self {
            Self::Kty04(_) => SchemeId::Kty04,
            Self::Bbs04(_) => SchemeId::Bbs04,
        }
    }
}
