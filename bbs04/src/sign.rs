//! Signing and verification.
//!
//! A signature linearly encrypts the certificate as `T1 = u·α`, `T2 = v·β`,
//! `T3 = A + h·(α + β)` and proves knowledge of `(α, β, x, δ1 = x·α,
//! δ2 = x·β)` satisfying
//!
//! 1. `u·α = T1`
//! 2. `v·β = T2`
//! 3. `T1·x − u·δ1 = 0`
//! 4. `T2·x − v·δ2 = 0`
//! 5. `e(T3, g2)^x · e(h, w)^{−α−β} · e(h, g2)^{−δ1−δ2} = e(g1, g2)·e(T3, w)^{−1}`
//!
//! with the challenge hashed from the message and the five Schnorr
//! commitments.

use crate::{
    error::Bbs04Error,
    join::MemberKey,
    setup::GroupKey,
};
use ark_ec::{
    pairing::{Pairing, PairingOutput},
    AffineRepr, CurveGroup,
};
use ark_ff::{
    field_hashers::{DefaultFieldHasher, HashToField},
    PrimeField,
};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::{ops::Neg, rand::RngCore, vec, vec::Vec, UniformRand};
use digest::DynDigest;
use groupsig_utils::serde_utils::ArkObjectBytes;
use serde::{Deserialize, Serialize};
use serde_with::serde_as;

const CHALLENGE_DOMAIN: &[u8] = b"BBS04-SIGNATURE-CHALLENGE";

#[serde_as]
#[derive(
    Clone, PartialEq, Eq, Debug, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
pub struct Signature<E: Pairing> {
    #[serde_as(as = "ArkObjectBytes")]
    pub t1: E::G1Affine,
    #[serde_as(as = "ArkObjectBytes")]
    pub t2: E::G1Affine,
    #[serde_as(as = "ArkObjectBytes")]
    pub t3: E::G1Affine,
    #[serde_as(as = "ArkObjectBytes")]
    pub challenge: E::ScalarField,
    #[serde_as(as = "ArkObjectBytes")]
    pub s_alpha: E::ScalarField,
    #[serde_as(as = "ArkObjectBytes")]
    pub s_beta: E::ScalarField,
    #[serde_as(as = "ArkObjectBytes")]
    pub s_x: E::ScalarField,
    #[serde_as(as = "ArkObjectBytes")]
    pub s_delta1: E::ScalarField,
    #[serde_as(as = "ArkObjectBytes")]
    pub s_delta2: E::ScalarField,
}

impl<E: Pairing> Signature<E> {
    pub fn is_non_zero(&self) -> bool {
        !(self.t1.is_zero() || self.t2.is_zero() || self.t3.is_zero())
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, Bbs04Error> {
        let mut out = vec![];
        self.serialize_compressed(&mut out)?;
        Ok(out)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Bbs04Error> {
        Self::deserialize_compressed(bytes).map_err(Into::into)
    }
}

pub fn sign<E: Pairing, D: Default + DynDigest + Clone, R: RngCore>(
    rng: &mut R,
    group: &GroupKey<E>,
    member: &MemberKey<E>,
    message: &[u8],
) -> Result<Signature<E>, Bbs04Error> {
    let x = member.secret;
    let alpha = E::ScalarField::rand(rng);
    let beta = E::ScalarField::rand(rng);
    let delta1 = x * alpha;
    let delta2 = x * beta;

    let t1 = (group.u * alpha).into_affine();
    let t2 = (group.v * beta).into_affine();
    let t3 = (member.certificate + group.h * (alpha + beta)).into_affine();

    let r_alpha = E::ScalarField::rand(rng);
    let r_beta = E::ScalarField::rand(rng);
    let r_x = E::ScalarField::rand(rng);
    let r_delta1 = E::ScalarField::rand(rng);
    let r_delta2 = E::ScalarField::rand(rng);

    let c1 = group.u * r_alpha;
    let c2 = group.v * r_beta;
    let c3 = E::multi_pairing(
        [
            E::G1Prepared::from(t3 * r_x),
            E::G1Prepared::from(group.h * (r_alpha + r_beta).neg()),
            E::G1Prepared::from(group.h * (r_delta1 + r_delta2).neg()),
        ],
        [
            E::G2Prepared::from(group.g2),
            E::G2Prepared::from(group.w),
            E::G2Prepared::from(group.g2),
        ],
    );
    let c4 = t1 * r_x - group.u * r_delta1;
    let c5 = t2 * r_x - group.v * r_delta2;

    let challenge = challenge::<E, D>(
        message,
        &t1,
        &t2,
        &t3,
        &c1.into_affine(),
        &c2.into_affine(),
        &c3,
        &c4.into_affine(),
        &c5.into_affine(),
    )?;

    Ok(Signature {
        t1,
        t2,
        t3,
        challenge,
        s_alpha: r_alpha + challenge * alpha,
        s_beta: r_beta + challenge * beta,
        s_x: r_x + challenge * x,
        s_delta1: r_delta1 + challenge * delta1,
        s_delta2: r_delta2 + challenge * delta2,
    })
}

/// Recomputes the five commitments from the responses and compares the
/// challenge. `Ok(false)` on mismatch; `Err` only for zero commitments.
pub fn verify<E: Pairing, D: Default + DynDigest + Clone>(
    group: &GroupKey<E>,
    signature: &Signature<E>,
    message: &[u8],
) -> Result<bool, Bbs04Error> {
    if !signature.is_non_zero() {
        return Err(Bbs04Error::ZeroSignature);
    }
    let c = signature.challenge;

    let c1 = group.u * signature.s_alpha - signature.t1 * c;
    let c2 = group.v * signature.s_beta - signature.t2 * c;
    // Folds the public term (e(T3, w)·e(g1, g2)^{−1})^c into the product.
    let c3 = E::multi_pairing(
        [
            E::G1Prepared::from(signature.t3 * signature.s_x),
            E::G1Prepared::from(group.h * (signature.s_alpha + signature.s_beta).neg()),
            E::G1Prepared::from(group.h * (signature.s_delta1 + signature.s_delta2).neg()),
            E::G1Prepared::from(signature.t3 * c),
            E::G1Prepared::from(group.g1 * c.neg()),
        ],
        [
            E::G2Prepared::from(group.g2),
            E::G2Prepared::from(group.w),
            E::G2Prepared::from(group.g2),
            E::G2Prepared::from(group.w),
            E::G2Prepared::from(group.g2),
        ],
    );
    let c4 = signature.t1 * signature.s_x - group.u * signature.s_delta1;
    let c5 = signature.t2 * signature.s_x - group.v * signature.s_delta2;

    let expected = challenge::<E, D>(
        message,
        &signature.t1,
        &signature.t2,
        &signature.t3,
        &c1.into_affine(),
        &c2.into_affine(),
        &c3,
        &c4.into_affine(),
        &c5.into_affine(),
    )?;
    Ok(expected == signature.challenge)
}

#[allow(clippy::too_many_arguments)]
fn challenge<E: Pairing, D: Default + DynDigest + Clone>(
    message: &[u8],
    t1: &E::G1Affine,
    t2: &E::G1Affine,
    t3: &E::G1Affine,
    c1: &E::G1Affine,
    c2: &E::G1Affine,
    c3: &PairingOutput<E>,
    c4: &E::G1Affine,
    c5: &E::G1Affine,
) -> Result<E::ScalarField, Bbs04Error> {
    let mut bytes = vec![];
    bytes.extend_from_slice(message);
    t1.serialize_compressed(&mut bytes)?;
    t2.serialize_compressed(&mut bytes)?;
    t3.serialize_compressed(&mut bytes)?;
    c1.serialize_compressed(&mut bytes)?;
    c2.serialize_compressed(&mut bytes)?;
    c3.serialize_compressed(&mut bytes)?;
    c4.serialize_compressed(&mut bytes)?;
    c5.serialize_compressed(&mut bytes)?;
    let hasher = <DefaultFieldHasher<D> as HashToField<E::ScalarField>>::new(CHALLENGE_DOMAIN);
    Ok(hasher.hash_to_field(&bytes, 1).pop().unwrap())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        join::{join_manager, join_member_start},
        setup::setup,
    };
    use ark_bls12_381::Bls12_381;
    use ark_std::rand::{rngs::StdRng, SeedableRng};
    use blake2::Blake2b512;

    type Fr = <Bls12_381 as Pairing>::ScalarField;

    fn test_member(
        seed: u64,
    ) -> (
        GroupKey<Bls12_381>,
        crate::ManagerKey<Bls12_381>,
        MemberKey<Bls12_381>,
        StdRng,
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        let (gk, mk) = setup::<Bls12_381, _>(&mut rng);
        let (member, _) = join_manager(&mut rng, &gk, &mk, &join_member_start(), 0);
        (gk, mk, member, rng)
    }

    #[test]
    fn sign_verify_round_trip() {
        let (gk, _, member, mut rng) = test_member(4);
        let sig = sign::<_, Blake2b512, _>(&mut rng, &gk, &member, b"hello").unwrap();
        assert!(verify::<_, Blake2b512>(&gk, &sig, b"hello").unwrap());
        assert!(!verify::<_, Blake2b512>(&gk, &sig, b"hellp").unwrap());
    }

    #[test]
    fn tampered_signatures_are_rejected() {
        let (gk, _, member, mut rng) = test_member(5);
        let sig = sign::<_, Blake2b512, _>(&mut rng, &gk, &member, b"msg").unwrap();

        let mut bad = sig.clone();
        bad.challenge += Fr::from(1u64);
        assert!(!verify::<_, Blake2b512>(&gk, &bad, b"msg").unwrap());

        for i in 0..5 {
            let mut bad = sig.clone();
            match i {
                0 => bad.s_alpha += Fr::from(1u64),
                1 => bad.s_beta += Fr::from(1u64),
                2 => bad.s_x += Fr::from(1u64),
                3 => bad.s_delta1 += Fr::from(1u64),
                _ => bad.s_delta2 += Fr::from(1u64),
            }
            assert!(!verify::<_, Blake2b512>(&gk, &bad, b"msg").unwrap(), "{i}");
        }
    }

    #[test]
    fn signatures_rerandomize_the_encryption() {
        let (gk, _, member, mut rng) = test_member(6);
        let s1 = sign::<_, Blake2b512, _>(&mut rng, &gk, &member, b"m").unwrap();
        let s2 = sign::<_, Blake2b512, _>(&mut rng, &gk, &member, b"m").unwrap();
        assert_ne!(s1.t1, s2.t1);
        assert_ne!(s1.t3, s2.t3);
    }

    #[test]
    fn byte_and_serde_round_trips() {
        let (gk, _, member, mut rng) = test_member(7);
        let sig = sign::<_, Blake2b512, _>(&mut rng, &gk, &member, b"bytes").unwrap();

        let bytes = sig.to_bytes().unwrap();
        let back = Signature::<Bls12_381>::from_bytes(&bytes).unwrap();
        assert_eq!(back, sig);

        let json = serde_json::to_string(&sig).unwrap();
        let back: Signature<Bls12_381> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, sig);
        assert!(verify::<_, Blake2b512>(&gk, &back, b"bytes").unwrap());
    }
}
