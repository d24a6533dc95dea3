//! The scheme-dispatching lifecycle: Setup, Join, Sign, Verify, Open,
//! Reveal, Trace and Claim/ProveEquality.
//!
//! Every call validates scheme agreement across its arguments before any
//! algebra runs. Protocol-negative outcomes come back inside `Ok` —
//! `Ok(false)` from Verify/Trace, `Ok(None)` from Open — and the error
//! channel is reserved for invalid arguments, unsupported operations and
//! arithmetic failure.

use crate::{
    crl::{Crl, CrlEntry, Trapdoor},
    error::GroupsigError,
    gml::{Gml, GmlEntry},
    join::{JoinRequest, JoinResponse, PendingJoin},
    keys::{GroupKey, ManagerKey, MemberKey},
    scheme::SchemeId,
    signature::{EqualityProof, Signature},
};
use ark_bls12_381::Bls12_381;
use ark_std::rand::{rngs::StdRng, SeedableRng};
use blake2::Blake2b512;
use rug::{rand::RandState, Integer};
use serde::{Deserialize, Serialize};

/// Digest bound into every challenge.
type SchemeDigest = Blake2b512;

/// The explicit environment threaded through every lifecycle call: one
/// randomness source per arithmetic family, both derived from one seed so
/// whole protocol runs replay deterministically.
pub struct Context {
    pub integer_rng: RandState<'static>,
    pub curve_rng: StdRng,
}

impl Context {
    pub fn from_seed(seed: u64) -> Self {
        let mut integer_rng = RandState::new();
        integer_rng.seed(&Integer::from(seed));
        Self {
            integer_rng,
            curve_rng: StdRng::seed_from_u64(seed),
        }
    }
}

/// Per-scheme setup parameters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SetupConfig {
    Kty04(kty04::SetupConfig),
    /// The pairing scheme's parameters are fixed by the curve.
    Bbs04,
}

impl SetupConfig {
    pub fn scheme(&self) -> SchemeId {
        match self {
            Self::Kty04(_) => SchemeId::Kty04,
            Self::Bbs04 => SchemeId::Bbs04,
        }
    }
}

fn ensure_scheme(expected: SchemeId, found: SchemeId) -> Result<(), GroupsigError> {
    if expected != found {
        return Err(GroupsigError::SchemeMismatch { expected, found });
    }
    Ok(())
}

/// One-shot group creation: group key, manager key and an empty membership
/// list.
pub fn setup(
    config: &SetupConfig,
    ctx: &mut Context,
) -> Result<(GroupKey, ManagerKey, Gml), GroupsigError> {
    match config {
        SetupConfig::Kty04(config) => {
            let (group, manager) = kty04::keys::setup(&mut ctx.integer_rng, config)?;
            Ok((
                GroupKey::Kty04(group),
                ManagerKey::Kty04(manager),
                Gml::new(SchemeId::Kty04),
            ))
        }
        SetupConfig::Bbs04 => {
            let (group, manager) = bbs04::setup::setup::<Bls12_381, _>(&mut ctx.curve_rng);
            Ok((
                GroupKey::Bbs04(group),
                ManagerKey::Bbs04(manager),
                Gml::new(SchemeId::Bbs04),
            ))
        }
    }
}

/// The member's opening message of the join exchange.
pub fn join_member_start(
    group: &GroupKey,
    ctx: &mut Context,
) -> Result<(PendingJoin, JoinRequest), GroupsigError> {
    match group {
        GroupKey::Kty04(group) => {
            let (pending, request) =
                kty04::join::join_member_start(&mut ctx.integer_rng, group)?;
            Ok((PendingJoin::Kty04(pending), JoinRequest::Kty04(request)))
        }
        GroupKey::Bbs04(_) => Ok((
            PendingJoin::Bbs04,
            JoinRequest::Bbs04(bbs04::join::join_member_start()),
        )),
    }
}

/// The manager's side: certify the requester under the membership list's
/// vacant index and append the escrow entry.
pub fn join_manager(
    group: &GroupKey,
    manager: &ManagerKey,
    gml: &mut Gml,
    request: &JoinRequest,
    ctx: &mut Context,
) -> Result<JoinResponse, GroupsigError> {
    ensure_scheme(group.scheme(), manager.scheme())?;
    ensure_scheme(group.scheme(), gml.scheme())?;
    ensure_scheme(group.scheme(), request.scheme())?;

    let id = gml.vacant_index() as u64;
    match (group, manager, request) {
        (GroupKey::Kty04(group), ManagerKey::Kty04(manager), JoinRequest::Kty04(request)) => {
            let (response, entry) =
                kty04::join::join_manager(&mut ctx.integer_rng, group, manager, request, id)?;
            gml.insert(GmlEntry::Kty04(entry))?;
            Ok(JoinResponse::Kty04(response))
        }
        (GroupKey::Bbs04(group), ManagerKey::Bbs04(manager), JoinRequest::Bbs04(request)) => {
            let (member, entry) =
                bbs04::join::join_manager(&mut ctx.curve_rng, group, manager, request, id);
            gml.insert(GmlEntry::Bbs04(entry))?;
            Ok(JoinResponse::Bbs04(Box::new(member)))
        }
        _ => Err(GroupsigError::UnexpectedJoinMessage),
    }
}

/// The member's closing step: check the certificate and assemble the key.
pub fn join_member_finish(
    group: &GroupKey,
    pending: PendingJoin,
    response: &JoinResponse,
) -> Result<MemberKey, GroupsigError> {
    match (group, pending, response) {
        (GroupKey::Kty04(group), PendingJoin::Kty04(pending), JoinResponse::Kty04(response)) => {
            Ok(MemberKey::Kty04(kty04::join::join_member_finish(
                group, pending, response,
            )?))
        }
        (GroupKey::Bbs04(group), PendingJoin::Bbs04, JoinResponse::Bbs04(key)) => Ok(
            MemberKey::Bbs04(bbs04::join::join_member_finish(group, (**key).clone())?),
        ),
        _ => Err(GroupsigError::UnexpectedJoinMessage),
    }
}

pub fn sign(
    message: &[u8],
    member: &MemberKey,
    group: &GroupKey,
    ctx: &mut Context,
) -> Result<Signature, GroupsigError> {
    match (member, group) {
        (MemberKey::Kty04(member), GroupKey::Kty04(group)) => Ok(Signature::Kty04(
            kty04::sign::sign::<SchemeDigest, _>(&mut ctx.integer_rng, group, member, message)?,
        )),
        (MemberKey::Bbs04(member), GroupKey::Bbs04(group)) => Ok(Signature::Bbs04(
            bbs04::sign::sign::<_, SchemeDigest, _>(&mut ctx.curve_rng, group, member, message)?,
        )),
        (member, group) => Err(GroupsigError::SchemeMismatch {
            expected: group.scheme(),
            found: member.scheme(),
        }),
    }
}

pub fn verify(
    signature: &Signature,
    message: &[u8],
    group: &GroupKey,
) -> Result<bool, GroupsigError> {
    match (signature, group) {
        (Signature::Kty04(signature), GroupKey::Kty04(group)) => {
            Ok(kty04::sign::verify::<SchemeDigest>(group, signature, message)?)
        }
        (Signature::Bbs04(signature), GroupKey::Bbs04(group)) => {
            Ok(bbs04::sign::verify::<_, SchemeDigest>(group, signature, message)?)
        }
        (signature, group) => Err(GroupsigError::SchemeMismatch {
            expected: group.scheme(),
            found: signature.scheme(),
        }),
    }
}

/// Recovers the signer's identity, or `Ok(None)` when no membership-list
/// entry matches.
pub fn open(
    signature: &Signature,
    group: &GroupKey,
    manager: &ManagerKey,
    gml: &Gml,
) -> Result<Option<u64>, GroupsigError> {
    ensure_scheme(group.scheme(), manager.scheme())?;
    ensure_scheme(group.scheme(), gml.scheme())?;
    ensure_scheme(group.scheme(), signature.scheme())?;

    match (signature, group, manager) {
        (Signature::Kty04(signature), GroupKey::Kty04(group), ManagerKey::Kty04(manager)) => {
            let ledger = gml.kty04_ledger().expect("scheme agreement checked above");
            Ok(kty04::open::open(group, manager, ledger, signature)?)
        }
        (Signature::Bbs04(signature), GroupKey::Bbs04(group), ManagerKey::Bbs04(manager)) => {
            let ledger = gml.bbs04_ledger().expect("scheme agreement checked above");
            Ok(bbs04::open::open(group, manager, ledger, signature)?)
        }
        _ => unreachable!("scheme agreement checked above"),
    }
}

/// Reads the tracing trapdoor escrowed at `index`.
pub fn reveal(gml: &Gml, index: usize) -> Result<Trapdoor, GroupsigError> {
    match gml {
        Gml::Kty04(ledger) => Ok(Trapdoor::Kty04(kty04::open::reveal(ledger, index)?)),
        Gml::Bbs04(_) => Err(GroupsigError::UnsupportedOperation {
            scheme: SchemeId::Bbs04,
            operation: "reveal",
        }),
    }
}

/// [`reveal`], also listing the trapdoor on the revocation list.
pub fn reveal_into(gml: &Gml, index: usize, crl: &mut Crl) -> Result<Trapdoor, GroupsigError> {
    ensure_scheme(gml.scheme(), crl.scheme())?;
    match gml {
        Gml::Kty04(ledger) => {
            let entry = ledger
                .get(index)
                .map_err(kty04::Kty04Error::from)?
                .ok_or(kty04::Kty04Error::VacantSlot(index))?;
            crl.insert(CrlEntry::Kty04(kty04::CrlEntry {
                id: entry.id,
                trapdoor: entry.trapdoor.clone(),
            }))?;
            Ok(Trapdoor::Kty04(entry.trapdoor.clone()))
        }
        Gml::Bbs04(_) => Err(GroupsigError::UnsupportedOperation {
            scheme: SchemeId::Bbs04,
            operation: "reveal",
        }),
    }
}

/// Whether any listed trapdoor links this signature.
pub fn trace(
    signature: &Signature,
    group: &GroupKey,
    crl: &Crl,
) -> Result<bool, GroupsigError> {
    ensure_scheme(group.scheme(), crl.scheme())?;
    ensure_scheme(group.scheme(), signature.scheme())?;
    match (signature, group) {
        (Signature::Kty04(signature), GroupKey::Kty04(group)) => {
            let ledger = crl.kty04_ledger().expect("scheme agreement checked above");
            Ok(kty04::open::trace(group, ledger, signature)?)
        }
        (Signature::Bbs04(_), GroupKey::Bbs04(_)) => Err(GroupsigError::UnsupportedOperation {
            scheme: SchemeId::Bbs04,
            operation: "trace",
        }),
        _ => unreachable!("scheme agreement checked above"),
    }
}

/// A member's proof of authorship of one signature.
pub fn claim(
    signature: &Signature,
    member: &MemberKey,
    group: &GroupKey,
    message: &[u8],
    ctx: &mut Context,
) -> Result<EqualityProof, GroupsigError> {
    ensure_scheme(group.scheme(), member.scheme())?;
    ensure_scheme(group.scheme(), signature.scheme())?;
    match (signature, member, group) {
        (Signature::Kty04(signature), MemberKey::Kty04(member), GroupKey::Kty04(group)) => {
            Ok(EqualityProof::Kty04(kty04::claim::claim::<SchemeDigest, _>(
                &mut ctx.integer_rng,
                group,
                member,
                signature,
                message,
            )?))
        }
        (_, _, GroupKey::Bbs04(_)) => Err(GroupsigError::UnsupportedOperation {
            scheme: SchemeId::Bbs04,
            operation: "claim",
        }),
        _ => unreachable!("scheme agreement checked above"),
    }
}

pub fn claim_verify(
    proof: &EqualityProof,
    signature: &Signature,
    group: &GroupKey,
    message: &[u8],
) -> Result<bool, GroupsigError> {
    ensure_scheme(group.scheme(), proof.scheme())?;
    ensure_scheme(group.scheme(), signature.scheme())?;
    match (proof, signature, group) {
        (EqualityProof::Kty04(proof), Signature::Kty04(signature), GroupKey::Kty04(group)) => Ok(
            kty04::claim::claim_verify::<SchemeDigest>(group, proof, signature, message)?,
        ),
        _ => unreachable!("scheme agreement checked above"),
    }
}

/// Proves several signatures share one member key.
pub fn prove_equality(
    member: &MemberKey,
    group: &GroupKey,
    signatures: &[Signature],
    message: &[u8],
    ctx: &mut Context,
) -> Result<EqualityProof, GroupsigError> {
    match (member, group) {
        (MemberKey::Kty04(member), GroupKey::Kty04(group)) => {
            let signatures = kty04_signatures(signatures)?;
            Ok(EqualityProof::Kty04(
                kty04::claim::prove_equality::<SchemeDigest, _>(
                    &mut ctx.integer_rng,
                    group,
                    member,
                    &signatures,
                    message,
                )?,
            ))
        }
        (MemberKey::Bbs04(_), GroupKey::Bbs04(_)) => Err(GroupsigError::UnsupportedOperation {
            scheme: SchemeId::Bbs04,
            operation: "prove-equality",
        }),
        (member, group) => Err(GroupsigError::SchemeMismatch {
            expected: group.scheme(),
            found: member.scheme(),
        }),
    }
}

pub fn prove_equality_verify(
    proof: &EqualityProof,
    signatures: &[Signature],
    group: &GroupKey,
    message: &[u8],
) -> Result<bool, GroupsigError> {
    ensure_scheme(group.scheme(), proof.scheme())?;
    match (proof, group) {
        (EqualityProof::Kty04(proof), GroupKey::Kty04(group)) => {
            let signatures = kty04_signatures(signatures)?;
            Ok(kty04::claim::verify_equality::<SchemeDigest>(
                group,
                proof,
                &signatures,
                message,
            )?)
        }
        _ => unreachable!("scheme agreement checked above"),
    }
}

fn kty04_signatures(signatures: &[Signature]) -> Result<Vec<&kty04::Signature>, GroupsigError> {
    signatures
        .iter()
        .map(|signature| match signature {
            Signature::Kty04(signature) => Ok(signature),
            other => Err(GroupsigError::SchemeMismatch {
                expected: SchemeId::Kty04,
                found: other.scheme(),
            }),
        })
        .collect()
}
