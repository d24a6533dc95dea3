//! Scheme-tagged join-protocol messages.
//!
//! Every implemented scheme joins in a single member-to-manager message
//! answered by the manager's response; the member-side state between the two
//! is a [`PendingJoin`].

use crate::scheme::SchemeId;
use ark_bls12_381::Bls12_381;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum JoinRequest {
    Kty04(kty04::JoinRequest),
    Bbs04(bbs04::JoinRequest),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum JoinResponse {
    Kty04(kty04::JoinResponse),
    /// The issuer hands the member its full key.
    Bbs04(Box<bbs04::MemberKey<Bls12_381>>),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PendingJoin {
    Kty04(kty04::PendingJoin),
    Bbs04,
}

impl JoinRequest {
    pub fn scheme(&self) -> SchemeId {
        match self {
            Self::Kty04(_) => SchemeId::Kty04,
            Self::Bbs04(_) => SchemeId::Bbs04,
        }
    }
}

impl JoinResponse {
    pub fn scheme(&self) -> SchemeId {
        match self {
            Self::Kty04(_) => SchemeId::Kty04,
            Self::Bbs04(_) => SchemeId::Bbs04,
        }
    }
}
