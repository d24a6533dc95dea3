//! Claiming and signature-equality proofs.
//!
//! The holder of a tracing exponent `x′` can prove, without revealing it,
//! that one or more signatures carry tracing handles under that exponent:
//! for each signature `j`, `T5_j^{x′} = T4_j`. With a single signature this
//! is a claim of authorship.

use crate::{
    error::Kty04Error,
    keys::{GroupKey, MemberKey},
    sign::Signature,
};
use digest::Digest;
use groupsig_utils::encoding::{write_integer, write_u32, Reader};
use interval_pok::{Relation, RelationSet, RelationSetProof, RelationTarget, Term};
use rug::rand::MutRandState;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EqualityProof {
    pub proof: RelationSetProof,
}

impl EqualityProof {
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = vec![];
        write_integer(&mut out, &self.proof.challenge);
        write_u32(&mut out, self.proof.responses.len() as u32);
        for response in &self.proof.responses {
            write_integer(&mut out, response);
        }
        out
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Kty04Error> {
        let mut reader = Reader::new(bytes);
        let challenge = reader.read_integer()?;
        let count = reader.read_u32()? as usize;
        let responses = (0..count)
            .map(|_| reader.read_integer())
            .collect::<Result<Vec<_>, _>>()?;
        reader.finish()?;
        Ok(Self {
            proof: RelationSetProof {
                challenge,
                responses,
            },
        })
    }
}

/// Objects `[T5_1, T4_1, …, T5_m, T4_m]` and one relation per signature.
fn equality_statement(signatures: &[&Signature]) -> (Vec<rug::Integer>, RelationSet) {
    let mut objects = Vec::with_capacity(2 * signatures.len());
    let mut relations = Vec::with_capacity(signatures.len());
    for (j, signature) in signatures.iter().enumerate() {
        objects.push(signature.t5.clone());
        objects.push(signature.t4.clone());
        relations.push(Relation::new(
            vec![Term::new(2 * j, 0)],
            RelationTarget::Object(2 * j + 1),
        ));
    }
    (objects, RelationSet::new(relations))
}

/// Proves all `signatures` carry tracing handles under `member`'s exponent.
pub fn prove_equality<D: Digest, R: MutRandState>(
    rng: &mut R,
    group: &GroupKey,
    member: &MemberKey,
    signatures: &[&Signature],
    message: &[u8],
) -> Result<EqualityProof, Kty04Error> {
    if signatures.is_empty() {
        return Err(Kty04Error::InvalidParameters("no signatures to relate"));
    }
    let (objects, relations) = equality_statement(signatures);
    let proof = RelationSetProof::new::<D, _>(
        rng,
        &group.proof_context(),
        message,
        &objects,
        std::slice::from_ref(&group.m_sphere()),
        std::slice::from_ref(&member.tracing_exponent),
        &relations,
    )?;
    Ok(EqualityProof { proof })
}

pub fn verify_equality<D: Digest>(
    group: &GroupKey,
    proof: &EqualityProof,
    signatures: &[&Signature],
    message: &[u8],
) -> Result<bool, Kty04Error> {
    if signatures.is_empty() {
        return Err(Kty04Error::InvalidParameters("no signatures to relate"));
    }
    let (objects, relations) = equality_statement(signatures);
    proof
        .proof
        .verify::<D>(
            &group.proof_context(),
            message,
            &objects,
            std::slice::from_ref(&group.m_sphere()),
            &relations,
        )
        .map_err(Into::into)
}

/// [`prove_equality`] specialized to the signer's own single signature.
pub fn claim<D: Digest, R: MutRandState>(
    rng: &mut R,
    group: &GroupKey,
    member: &MemberKey,
    signature: &Signature,
    message: &[u8],
) -> Result<EqualityProof, Kty04Error> {
    prove_equality::<D, _>(rng, group, member, &[signature], message)
}

pub fn claim_verify<D: Digest>(
    group: &GroupKey,
    proof: &EqualityProof,
    signature: &Signature,
    message: &[u8],
) -> Result<bool, Kty04Error> {
    verify_equality::<D>(group, proof, &[signature], message)
}
