//! The revocation list: trapdoors whose unlinkability has been revoked,
//! consulted by Trace.

use crate::{
    error::GroupsigError,
    scheme::{RevocationPolicy, SchemeId},
};
use groupsig_utils::{
    encoding::{write_u64, write_u8, Reader},
    Ledger,
};
use rug::Integer;
use serde::{Deserialize, Serialize};
use std::io::{BufRead, Write};

/// A revealed tracing secret bound to one member.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Trapdoor {
    Kty04(Integer),
}

impl Trapdoor {
    pub fn scheme(&self) -> SchemeId {
        match self {
            Self::Kty04(_) => SchemeId::Kty04,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CrlEntry {
    Kty04(kty04::CrlEntry),
}

impl CrlEntry {
    pub fn scheme(&self) -> SchemeId {
        match self {
            Self::Kty04(_) => SchemeId::Kty04,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
enum CrlLedger {
    Kty04(Ledger<kty04::CrlEntry>),
}

/// A revocation list with its insertion policy. The policy defaults per
/// scheme but stays overridable, since sibling schemes disagree on it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Crl {
    inner: CrlLedger,
    policy: RevocationPolicy,
}

impl Crl {
    /// An empty list with the scheme's default policy. Errors for schemes
    /// without tracing.
    pub fn new(scheme: SchemeId) -> Result<Self, GroupsigError> {
        Self::with_policy(scheme, scheme.descriptor().revocation_policy)
    }

    pub fn with_policy(
        scheme: SchemeId,
        policy: RevocationPolicy,
    ) -> Result<Self, GroupsigError> {
        match scheme {
            SchemeId::Kty04 => Ok(Self {
                inner: CrlLedger::Kty04(Ledger::new()),
                policy,
            }),
            SchemeId::Bbs04 => Err(GroupsigError::UnsupportedOperation {
                scheme,
                operation: "revocation list",
            }),
        }
    }

    pub fn scheme(&self) -> SchemeId {
        match &self.inner {
            CrlLedger::Kty04(_) => SchemeId::Kty04,
        }
    }

    pub fn policy(&self) -> RevocationPolicy {
        self.policy
    }

    pub fn len(&self) -> usize {
        match &self.inner {
            CrlLedger::Kty04(ledger) => ledger.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn storage_len(&self) -> usize {
        match &self.inner {
            CrlLedger::Kty04(ledger) => ledger.storage_len(),
        }
    }

    /// Under [`RevocationPolicy::DedupByTrapdoor`], an entry whose trapdoor
    /// is already listed is not inserted again; the existing index comes
    /// back.
    pub fn insert(&mut self, entry: CrlEntry) -> Result<usize, GroupsigError> {
        if self.policy == RevocationPolicy::DedupByTrapdoor {
            if let Some(index) = self.find(&entry)? {
                return Ok(index);
            }
        }
        match (&mut self.inner, entry) {
            (CrlLedger::Kty04(ledger), CrlEntry::Kty04(entry)) => Ok(ledger.insert(entry)),
        }
    }

    /// Linear scan by trapdoor. The error side carries comparison failures,
    /// so "not listed" stays distinguishable from "could not compare".
    pub fn exists(&self, entry: &CrlEntry) -> Result<bool, GroupsigError> {
        Ok(self.find(entry)?.is_some())
    }

    fn find(&self, entry: &CrlEntry) -> Result<Option<usize>, GroupsigError> {
        match (&self.inner, entry) {
            (CrlLedger::Kty04(ledger), CrlEntry::Kty04(entry)) => Ok(ledger
                .iter_live()
                .find(|(_, listed)| listed.trapdoor == entry.trapdoor)
                .map(|(index, _)| index)),
        }
    }

    pub fn get(&self, index: usize) -> Result<Option<CrlEntry>, GroupsigError> {
        match &self.inner {
            CrlLedger::Kty04(ledger) => Ok(ledger.get(index)?.cloned().map(CrlEntry::Kty04)),
        }
    }

    pub fn remove(&mut self, index: usize) -> Result<CrlEntry, GroupsigError> {
        match &mut self.inner {
            CrlLedger::Kty04(ledger) => Ok(CrlEntry::Kty04(ledger.remove(index)?)),
        }
    }

    pub(crate) fn kty04_ledger(&self) -> Option<&Ledger<kty04::CrlEntry>> {
        match &self.inner {
            CrlLedger::Kty04(ledger) => Some(ledger),
        }
    }

    /// `[scheme_code][policy][slot_count: u64][presence: u8, entry…]…`
    pub fn to_bytes(&self) -> Result<Vec<u8>, GroupsigError> {
        let mut out = vec![];
        write_u8(&mut out, self.scheme().code());
        write_u8(
            &mut out,
            match self.policy {
                RevocationPolicy::AllowDuplicates => 0,
                RevocationPolicy::DedupByTrapdoor => 1,
            },
        );
        match &self.inner {
            CrlLedger::Kty04(ledger) => {
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
        }
        Ok(out)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, GroupsigError> {
        let mut reader = Reader::new(bytes);
        let code = reader.read_u8()?;
        let scheme =
            SchemeId::from_code(code).ok_or(GroupsigError::UnknownSchemeCode(code))?;
        let policy = match reader.read_u8()? {
            0 => RevocationPolicy::AllowDuplicates,
            1 => RevocationPolicy::DedupByTrapdoor,
            tag => {
                return Err(GroupsigError::Decode(
                    groupsig_utils::encoding::DecodeError::InvalidTag(tag),
                ))
            }
        };
        let mut crl = Self::with_policy(scheme, policy)?;
        let count = reader.read_u64()? as usize;
        for _ in 0..count {
            let present = reader.read_u8()? == 1;
            match &mut crl.inner {
                CrlLedger::Kty04(ledger) => ledger.push_slot(if present {
                    Some(kty04::CrlEntry::read(&mut reader)?)
                } else {
                    None
                }),
            }
        }
        reader.finish()?;
        Ok(crl)
    }

    /// One `<identity>\t<trapdoor>` record per live entry.
    pub fn write_text<W: Write>(&self, mut writer: W) -> Result<(), GroupsigError> {
        match &self.inner {
            CrlLedger::Kty04(ledger) => {
                for (_, entry) in ledger.iter_live() {
                    writeln!(writer, "{}", entry.to_line_fields().join("\t"))?;
                }
            }
        }
        Ok(())
    }

    /// Reads records until EOF; a line whose field count is wrong aborts the
    /// whole import.
    pub fn read_text<R: BufRead>(scheme: SchemeId, reader: R) -> Result<Self, GroupsigError> {
        let mut crl = Self::new(scheme)?;
        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            let fields: Vec<&str> = line.split('\t').collect();
            match &mut crl.inner {
                CrlLedger::Kty04(ledger) => {
                    let entry = kty04::CrlEntry::from_line_fields(&fields)
                        .map_err(|_| GroupsigError::MalformedRecord { line: index + 1 })?;
                    ledger.insert(entry);
                }
            }
        }
        Ok(crl)
    }
}
