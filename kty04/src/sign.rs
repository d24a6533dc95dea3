//! Signing and verification.
//!
//! A signature blinds the member's certificate into seven commitments
//! `T1..T7` and proves, over the thirteen objects
//! `[g, h, y, a, a0, b, T1..T7]`, knowledge of exponents
//! `(x, x′, e, r, h′ = e·r)` satisfying
//!
//! 1. `g^r = T2`
//! 2. `g^e·h^r = T3`
//! 3. `T2^e·g^{−h′} = 1`
//! 4. `T1^e·a^{−x}·b^{−x′}·y^{−h′} = a0`
//! 5. `T5^{x′} = T4`
//! 6. `T7^{x} = T6`
//!
//! Relations 1–4 tie `T1` to a certificate valid under the group key;
//! 5 and 6 embed the tracing and claiming handles.

use crate::{
    error::Kty04Error,
    keys::{GroupKey, MemberKey},
};
use digest::Digest;
use groupsig_utils::encoding::{write_integer, write_u32, Reader};
use interval_pok::{
    Relation, RelationSet, RelationSetProof, RelationTarget, Sphere, Term,
};
use rug::{rand::MutRandState, Integer};
use serde::{Deserialize, Serialize};

// Hidden exponents, in response order.
const VAR_X: usize = 0;
const VAR_TRACING: usize = 1;
const VAR_E: usize = 2;
const VAR_R: usize = 3;
const VAR_ER: usize = 4;

// Objects, in transcript order.
const OBJ_G: usize = 0;
const OBJ_H: usize = 1;
const OBJ_Y: usize = 2;
const OBJ_A: usize = 3;
const OBJ_A0: usize = 4;
const OBJ_B: usize = 5;
const OBJ_T1: usize = 6;
const OBJ_T2: usize = 7;
const OBJ_T3: usize = 8;
const OBJ_T4: usize = 9;
const OBJ_T5: usize = 10;
const OBJ_T6: usize = 11;
const OBJ_T7: usize = 12;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    /// `A·y^r`
    pub t1: Integer,
    /// `g^r`
    pub t2: Integer,
    /// `g^e·h^r`
    pub t3: Integer,
    /// `g^{x′·k}`
    pub t4: Integer,
    /// `g^k`
    pub t5: Integer,
    /// `g^{x·k′}`
    pub t6: Integer,
    /// `g^{k′}`
    pub t7: Integer,
    pub proof: RelationSetProof,
}

impl Signature {
    pub(crate) fn commitments(&self) -> [&Integer; 7] {
        [
            &self.t1, &self.t2, &self.t3, &self.t4, &self.t5, &self.t6, &self.t7,
        ]
    }

    /// Length-prefixed encoding: the seven commitments, the challenge, then
    /// the counted responses.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = vec![];
        for t in self.commitments() {
            write_integer(&mut out, t);
        }
        write_integer(&mut out, &self.proof.challenge);
        write_u32(&mut out, self.proof.responses.len() as u32);
        for response in &self.proof.responses {
            write_integer(&mut out, response);
        }
        out
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Kty04Error> {
        let mut reader = Reader::new(bytes);
        let signature = Self::read(&mut reader)?;
        reader.finish()?;
        Ok(signature)
    }

    pub(crate) fn read(reader: &mut Reader<'_>) -> Result<Self, Kty04Error> {
        let t1 = reader.read_integer()?;
        let t2 = reader.read_integer()?;
        let t3 = reader.read_integer()?;
        let t4 = reader.read_integer()?;
        let t5 = reader.read_integer()?;
        let t6 = reader.read_integer()?;
        let t7 = reader.read_integer()?;
        let challenge = reader.read_integer()?;
        let count = reader.read_u32()? as usize;
        let responses = (0..count)
            .map(|_| reader.read_integer())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            t1,
            t2,
            t3,
            t4,
            t5,
            t6,
            t7,
            proof: RelationSetProof {
                challenge,
                responses,
            },
        })
    }
}

/// The six relations over the thirteen objects.
fn signature_relations() -> RelationSet {
    RelationSet::new(vec![
        Relation::new(vec![Term::new(OBJ_G, VAR_R)], RelationTarget::Object(OBJ_T2)),
        Relation::new(
            vec![Term::new(OBJ_G, VAR_E), Term::new(OBJ_H, VAR_R)],
            RelationTarget::Object(OBJ_T3),
        ),
        Relation::new(
            vec![Term::new(OBJ_T2, VAR_E), Term::inverted(OBJ_G, VAR_ER)],
            RelationTarget::One,
        ),
        Relation::new(
            vec![
                Term::new(OBJ_T1, VAR_E),
                Term::inverted(OBJ_A, VAR_X),
                Term::inverted(OBJ_B, VAR_TRACING),
                Term::inverted(OBJ_Y, VAR_ER),
            ],
            RelationTarget::Object(OBJ_A0),
        ),
        Relation::new(
            vec![Term::new(OBJ_T5, VAR_TRACING)],
            RelationTarget::Object(OBJ_T4),
        ),
        Relation::new(vec![Term::new(OBJ_T7, VAR_X)], RelationTarget::Object(OBJ_T6)),
    ])
}

/// One sphere per hidden exponent: Λ for `x`, M for `x′` and `r`, Γ for `e`
/// and the Γ·M product for `h′`.
fn signature_spheres(group: &GroupKey) -> Result<Vec<Sphere>, Kty04Error> {
    let m = group.m_sphere();
    let gamma = group.gamma_sphere();
    let product = gamma.product(&m)?;
    Ok(vec![group.lambda_sphere(), m.clone(), gamma, m, product])
}

fn signature_objects(group: &GroupKey, signature: &Signature) -> Vec<Integer> {
    let mut objects = Vec::with_capacity(13);
    objects.extend(
        [
            &group.g, &group.h, &group.y, &group.a, &group.a0, &group.b,
        ]
        .into_iter()
        .cloned(),
    );
    objects.extend(signature.commitments().into_iter().cloned());
    objects
}

pub fn sign<D: Digest, R: MutRandState>(
    rng: &mut R,
    group: &GroupKey,
    member: &MemberKey,
    message: &[u8],
) -> Result<Signature, Kty04Error> {
    let n = &group.modulus;
    let inner_m = group.m_sphere().inner(group.epsilon, group.security)?;

    // r, k and k' come from inner-M.
    let r = inner_m.random(rng);
    let k = inner_m.random(rng);
    let k_prime = inner_m.random(rng);
    let er = Integer::from(&member.certifying_exponent * &r);

    let t1 = member.certificate.clone() * pow(&group.y, &r, n)? % n;
    let t2 = pow(&group.g, &r, n)?;
    let t3 = pow(&group.g, &member.certifying_exponent, n)? * pow(&group.h, &r, n)? % n;
    let t4 = pow(&group.g, &Integer::from(&member.tracing_exponent * &k), n)?;
    let t5 = pow(&group.g, &k, n)?;
    let t6 = pow(
        &group.g,
        &Integer::from(&member.secret_exponent * &k_prime),
        n,
    )?;
    let t7 = pow(&group.g, &k_prime, n)?;

    let mut signature = Signature {
        t1,
        t2,
        t3,
        t4,
        t5,
        t6,
        t7,
        proof: RelationSetProof {
            challenge: Integer::ZERO,
            responses: vec![],
        },
    };

    let objects = signature_objects(group, &signature);
    let secrets = [
        member.secret_exponent.clone(),
        member.tracing_exponent.clone(),
        member.certifying_exponent.clone(),
        r,
        er,
    ];
    signature.proof = RelationSetProof::new::<D, _>(
        rng,
        &group.proof_context(),
        message,
        &objects,
        &signature_spheres(group)?,
        &secrets,
        &signature_relations(),
    )?;

    Ok(signature)
}

/// `Ok(false)` on any verification failure; `Err` only for signatures whose
/// objects are not group elements or whose shape is wrong.
pub fn verify<D: Digest>(
    group: &GroupKey,
    signature: &Signature,
    message: &[u8],
) -> Result<bool, Kty04Error> {
    for t in signature.commitments() {
        if *t < 1 || *t >= group.modulus {
            return Err(Kty04Error::MalformedSignature(
                "commitment outside the group",
            ));
        }
    }
    let objects = signature_objects(group, signature);
    signature
        .proof
        .verify::<D>(
            &group.proof_context(),
            message,
            &objects,
            &signature_spheres(group)?,
            &signature_relations(),
        )
        .map_err(Into::into)
}

pub(crate) fn pow(
    base: &Integer,
    exponent: &Integer,
    modulus: &Integer,
) -> Result<Integer, Kty04Error> {
    base.clone()
        .pow_mod(exponent, modulus)
        .map_err(|_| Kty04Error::NonInvertibleExponent)
}
