//! The group membership list: the identity-escrow ledger Open scans.

use crate::{error::GroupsigError, scheme::SchemeId};
use ark_bls12_381::Bls12_381;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use groupsig_utils::{
    encoding::{hex_decode, hex_encode, write_bytes, write_u64, write_u8, Reader},
    Ledger,
};
use serde::{Deserialize, Serialize};
use std::io::{BufRead, Write};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GmlEntry {
    Kty04(kty04::GmlEntry),
    Bbs04(bbs04::GmlEntry<Bls12_381>),
}

impl GmlEntry {
    pub fn scheme(&self) -> SchemeId {
        match self {
            Self::Kty04(_) => SchemeId::Kty04,
            Self::Bbs04(_) => SchemeId::Bbs04,
        }
    }

    pub fn id(&self) -> u64 {
        match self {
            Self::Kty04(entry) => entry.id,
            Self::Bbs04(entry) => entry.id,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gml {
    Kty04(Ledger<kty04::GmlEntry>),
    Bbs04(Ledger<bbs04::GmlEntry<Bls12_381>>),
}

impl Gml {
    /// An empty list tagged with its owning scheme.
    pub fn new(scheme: SchemeId) -> Self {
        match scheme {
            SchemeId::Kty04 => Self::Kty04(Ledger::new()),
            SchemeId::Bbs04 => Self::Bbs04(Ledger::new()),
        }
    }

    pub fn scheme(&self) -> SchemeId {
        match self {
            Self::Kty04(_) => SchemeId::Kty04,
            Self::Bbs04(_) => SchemeId::Bbs04,
        }
    }

    /// Live entries.
    pub fn len(&self) -> usize {
        match self {
            Self::Kty04(ledger) => ledger.len(),
            Self::Bbs04(ledger) => ledger.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Slots, vacancies included.
    pub fn storage_len(&self) -> usize {
        match self {
            Self::Kty04(ledger) => ledger.storage_len(),
            Self::Bbs04(ledger) => ledger.storage_len(),
        }
    }

    /// The index (and identity) the next join will occupy.
    pub fn vacant_index(&self) -> usize {
        match self {
            Self::Kty04(ledger) => ledger.vacant_index(),
            Self::Bbs04(ledger) => ledger.vacant_index(),
        }
    }

    /// No identity-uniqueness check happens here; the lifecycle join assigns
    /// the vacant index.
    pub fn insert(&mut self, entry: GmlEntry) -> Result<usize, GroupsigError> {
        match (self, entry) {
            (Self::Kty04(ledger), GmlEntry::Kty04(entry)) => Ok(ledger.insert(entry)),
            (Self::Bbs04(ledger), GmlEntry::Bbs04(entry)) => Ok(ledger.insert(entry)),
            (gml, entry) => Err(GroupsigError::SchemeMismatch {
                expected: gml.scheme(),
                found: entry.scheme(),
            }),
        }
    }

    /// `Ok(None)` over a vacated slot.
    pub fn get(&self, index: usize) -> Result<Option<GmlEntry>, GroupsigError> {
        match self {
            Self::Kty04(ledger) => Ok(ledger.get(index)?.cloned().map(GmlEntry::Kty04)),
            Self::Bbs04(ledger) => Ok(ledger.get(index)?.cloned().map(GmlEntry::Bbs04)),
        }
    }

    pub fn remove(&mut self, index: usize) -> Result<GmlEntry, GroupsigError> {
        match self {
            Self::Kty04(ledger) => Ok(GmlEntry::Kty04(ledger.remove(index)?)),
            Self::Bbs04(ledger) => Ok(GmlEntry::Bbs04(ledger.remove(index)?)),
        }
    }

    pub(crate) fn kty04_ledger(&self) -> Option<&Ledger<kty04::GmlEntry>> {
        match self {
            Self::Kty04(ledger) => Some(ledger),
            Self::Bbs04(_) => None,
        }
    }

    pub(crate) fn bbs04_ledger(&self) -> Option<&Ledger<bbs04::GmlEntry<Bls12_381>>> {
        match self {
            Self::Kty04(_) => None,
            Self::Bbs04(ledger) => Some(ledger),
        }
    }

    /// `[scheme_code][slot_count: u64][presence: u8, entry…]…` — vacancies
    /// survive the round-trip so indices stay stable.
    pub fn to_bytes(&self) -> Result<Vec<u8>, GroupsigError> {
        let mut out = vec![];
        write_u8(&mut out, self.scheme().code());
        match self {
            Self::Kty04(ledger) => {
                write_u64(&mut out, ledger.storage_len() as u64);
                for slot in ledger.slots() {
                    match slot {
                        Some(entry) => {
                            write_u8(&mut out, 1);
                            entry.write(&mut out);
                        }
                        None => write_u8(&mut out, 0),
                    }
                }
            }
            Self::Bbs04(ledger) => {
                write_u64(&mut out, ledger.storage_len() as u64);
                for slot in ledger.slots() {
                    match slot {
                        Some(entry) => {
                            write_u8(&mut out, 1);
                            write_bbs_entry(entry, &mut out)?;
                        }
                        None => write_u8(&mut out, 0),
                    }
                }
            }
        }
        Ok(out)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, GroupsigError> {
        let mut reader = Reader::new(bytes);
        let code = reader.read_u8()?;
        let scheme =
            SchemeId::from_code(code).ok_or(GroupsigError::UnknownSchemeCode(code))?;
        let count = reader.read_u64()? as usize;
        let mut gml = Self::new(scheme);
        for _ in 0..count {
            let present = reader.read_u8()? == 1;
            match &mut gml {
                Self::Kty04(ledger) => ledger.push_slot(if present {
                    Some(kty04::GmlEntry::read(&mut reader)?)
                } else {
                    None
                }),
                Self::Bbs04(ledger) => ledger.push_slot(if present {
                    Some(read_bbs_entry(&mut reader)?)
                } else {
                    None
                }),
            }
        }
        reader.finish()?;
        Ok(gml)
    }

    /// One live entry per line, tab-separated fields. Vacancies are not
    /// representable here; this is an interchange format.
    pub fn write_text<W: Write>(&self, mut writer: W) -> Result<(), GroupsigError> {
        match self {
            Self::Kty04(ledger) => {
                for (_, entry) in ledger.iter_live() {
                    writeln!(writer, "{}", entry.to_line_fields().join("\t"))?;
                }
            }
            Self::Bbs04(ledger) => {
                for (_, entry) in ledger.iter_live() {
                    writeln!(writer, "{}", bbs_entry_fields(entry)?.join("\t"))?;
                }
            }
        }
        Ok(())
    }

    /// Reads records until EOF; any malformed line aborts the whole import.
    pub fn read_text<R: BufRead>(scheme: SchemeId, reader: R) -> Result<Self, GroupsigError> {
        let mut gml = Self::new(scheme);
        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            let fields: Vec<&str> = line.split('\t').collect();
            match &mut gml {
                Self::Kty04(ledger) => {
                    let entry = kty04::GmlEntry::from_line_fields(&fields)
                        .map_err(|_| GroupsigError::MalformedRecord { line: index + 1 })?;
                    ledger.insert(entry);
                }
                Self::Bbs04(ledger) => {
                    let entry = bbs_entry_from_fields(&fields)
                        .map_err(|_| GroupsigError::MalformedRecord { line: index + 1 })?;
                    ledger.insert(entry);
                }
            }
        }
        Ok(gml)
    }
}

fn write_bbs_entry(
    entry: &bbs04::GmlEntry<Bls12_381>,
    out: &mut Vec<u8>,
) -> Result<(), GroupsigError> {
    write_u64(out, entry.id);
    let mut compressed = vec![];
    entry
        .certificate
        .serialize_compressed(&mut compressed)
        .map_err(bbs04::Bbs04Error::from)?;
    write_bytes(out, &compressed);
    Ok(())
}

fn read_bbs_entry(reader: &mut Reader<'_>) -> Result<bbs04::GmlEntry<Bls12_381>, GroupsigError> {
    let id = reader.read_u64()?;
    let compressed = reader.read_bytes()?;
    let certificate = CanonicalDeserialize::deserialize_compressed(compressed)
        .map_err(bbs04::Bbs04Error::from)?;
    Ok(bbs04::GmlEntry { id, certificate })
}

fn bbs_entry_fields(entry: &bbs04::GmlEntry<Bls12_381>) -> Result<Vec<String>, GroupsigError> {
    let mut compressed = vec![];
    entry
        .certificate
        .serialize_compressed(&mut compressed)
        .map_err(bbs04::Bbs04Error::from)?;
    Ok(vec![entry.id.to_string(), hex_encode(&compressed)])
}

fn bbs_entry_from_fields(fields: &[&str]) -> Result<bbs04::GmlEntry<Bls12_381>, GroupsigError> {
    match fields {
        [id, certificate] => {
            let id = id
                .parse()
                .map_err(|_| GroupsigError::MalformedRecord { line: 0 })?;
            let compressed = hex_decode(certificate)?;
            let certificate = CanonicalDeserialize::deserialize_compressed(&compressed[..])
                .map_err(bbs04::Bbs04Error::from)?;
            Ok(bbs04::GmlEntry { id, certificate })
        }
        _ => Err(GroupsigError::MalformedRecord { line: 0 }),
    }
}
