//! The process-wide scheme registry.
//!
//! Every entity in this crate is a closed enum over the implemented schemes;
//! the descriptor table carries the per-scheme protocol constants the
//! lifecycle consults (join shape, revocation policy, which operations the
//! scheme supports).

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SchemeId {
    Kty04,
    Bbs04,
}

/// Which party sends the first join message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JoinStart {
    Member,
    Manager,
}

/// Whether revocation-list insertion scans for an existing trapdoor first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RevocationPolicy {
    AllowDuplicates,
    DedupByTrapdoor,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SchemeDescriptor {
    pub code: u8,
    pub name: &'static str,
    /// Number of messages in the join exchange.
    pub join_seq: u8,
    pub join_start: JoinStart,
    pub revocation_policy: RevocationPolicy,
    pub supports_reveal: bool,
    pub supports_trace: bool,
    pub supports_claim: bool,
}

pub const SCHEMES: [SchemeDescriptor; 2] = [
    SchemeDescriptor {
        code: 0,
        name: "KTY04",
        join_seq: 1,
        join_start: JoinStart::Member,
        revocation_policy: RevocationPolicy::AllowDuplicates,
        supports_reveal: true,
        supports_trace: true,
        supports_claim: true,
    },
    SchemeDescriptor {
        code: 1,
        name: "BBS04",
        join_seq: 1,
        join_start: JoinStart::Member,
        revocation_policy: RevocationPolicy::DedupByTrapdoor,
        supports_reveal: false,
        supports_trace: false,
        supports_claim: false,
    },
];

impl SchemeId {
    pub const fn code(self) -> u8 {
        self.descriptor().code
    }

    pub const fn descriptor(self) -> &'static SchemeDescriptor {
        match self {
            SchemeId::Kty04 => &SCHEMES[0],
            SchemeId::Bbs04 => &SCHEMES[1],
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(SchemeId::Kty04),
            1 => Some(SchemeId::Bbs04),
            _ => None,
        }
    }

    pub const fn name(self) -> &'static str {
        self.descriptor().name
    }
}
