//! Membership-list and revocation-list entries and their wire encodings.

use crate::error::Kty04Error;
use groupsig_utils::encoding::{write_integer, write_u64, Reader};
use rug::Integer;
use serde::{Deserialize, Serialize};

/// Identity-escrow record appended at join time. The certificate recognizes
/// the member's signatures under Open; the trapdoor serves Reveal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GmlEntry {
    pub id: u64,
    pub certificate: Integer,
    pub trapdoor: Integer,
}

/// A revoked tracing trapdoor consulted by Trace.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrlEntry {
    pub id: u64,
    pub trapdoor: Integer,
}

impl GmlEntry {
    pub fn write(&self, out: &mut Vec<u8>) {
        write_u64(out, self.id);
        write_integer(out, &self.certificate);
        write_integer(out, &self.trapdoor);
    }

    pub fn read(reader: &mut Reader<'_>) -> Result<Self, Kty04Error> {
        Ok(Self {
            id: reader.read_u64()?,
            certificate: reader.read_integer()?,
            trapdoor: reader.read_integer()?,
        })
    }

    pub fn to_line_fields(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.certificate.to_string_radix(16),
            self.trapdoor.to_string_radix(16),
        ]
    }

    pub fn from_line_fields(fields: &[&str]) -> Result<Self, Kty04Error> {
        match fields {
            [id, certificate, trapdoor] => Ok(Self {
                id: id.parse().map_err(|_| Kty04Error::MalformedRecord)?,
                certificate: parse_hex(certificate)?,
                trapdoor: parse_hex(trapdoor)?,
            }),
            _ => Err(Kty04Error::MalformedRecord),
        }
    }
}

impl CrlEntry {
    pub fn write(&self, out: &mut Vec<u8>) {
        write_u64(out, self.id);
        write_integer(out, &self.trapdoor);
    }

    pub fn read(reader: &mut Reader<'_>) -> Result<Self, Kty04Error> {
        Ok(Self {
            id: reader.read_u64()?,
            trapdoor: reader.read_integer()?,
        })
    }

    pub fn to_line_fields(&self) -> Vec<String> {
        vec![self.id.to_string(), self.trapdoor.to_string_radix(16)]
    }

    pub fn from_line_fields(fields: &[&str]) -> Result<Self, Kty04Error> {
        match fields {
            [id, trapdoor] => Ok(Self {
                id: id.parse().map_err(|_| Kty04Error::MalformedRecord)?,
                trapdoor: parse_hex(trapdoor)?,
            }),
            _ => Err(Kty04Error::MalformedRecord),
        }
    }
}

fn parse_hex(field: &str) -> Result<Integer, Kty04Error> {
    Integer::from_str_radix(field, 16).map_err(|_| Kty04Error::MalformedRecord)
}
