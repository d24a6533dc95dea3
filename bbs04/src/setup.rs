//! Group parameters and the issuer/opener keys.

use ark_ec::{pairing::Pairing, AffineRepr, CurveGroup};
use ark_ff::{Field, PrimeField};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::{rand::RngCore, UniformRand};
use groupsig_utils::serde_utils::ArkObjectBytes;
use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Public group parameters: generators, the issuer's `w = g2·γ` and the
/// opener's encryption bases `u, v, h` with `u·ξ1 = v·ξ2 = h`.
#[serde_as]
#[derive(
    Clone, PartialEq, Eq, Debug, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
pub struct GroupKey<E: Pairing> {
    #[serde_as(as = "ArkObjectBytes")]
    pub g1: E::G1Affine,
    #[serde_as(as = "ArkObjectBytes")]
    pub g2: E::G2Affine,
    #[serde_as(as = "ArkObjectBytes")]
    pub h: E::G1Affine,
    #[serde_as(as = "ArkObjectBytes")]
    pub u: E::G1Affine,
    #[serde_as(as = "ArkObjectBytes")]
    pub v: E::G1Affine,
    #[serde_as(as = "ArkObjectBytes")]
    pub w: E::G2Affine,
}

/// Certification secret `γ`.
#[serde_as]
#[derive(
    Clone,
    PartialEq,
    Eq,
    Debug,
    CanonicalSerialize,
    CanonicalDeserialize,
    Zeroize,
    ZeroizeOnDrop,
    Serialize,
    Deserialize,
)]
pub struct IssuerKey<F: PrimeField>(#[serde_as(as = "ArkObjectBytes")] pub F);

/// Decryption secrets `ξ1, ξ2` for the linear encryption inside signatures.
#[serde_as]
#[derive(
    Clone,
    PartialEq,
    Eq,
    Debug,
    CanonicalSerialize,
    CanonicalDeserialize,
    Zeroize,
    ZeroizeOnDrop,
    Serialize,
    Deserialize,
)]
pub struct OpenerKey<F: PrimeField> {
    #[serde_as(as = "ArkObjectBytes")]
    pub xi1: F,
    #[serde_as(as = "ArkObjectBytes")]
    pub xi2: F,
}

/// Both manager roles. Issuance and opening use disjoint halves, so a
/// deployment can split them.
#[derive(Clone, PartialEq, Eq, Debug, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct ManagerKey<E: Pairing> {
    pub issuer: IssuerKey<E::ScalarField>,
    pub opener: OpenerKey<E::ScalarField>,
}

/// Draws the group parameters and both manager secrets.
pub fn setup<E: Pairing, R: RngCore>(rng: &mut R) -> (GroupKey<E>, ManagerKey<E>) {
    let g1 = E::G1::rand(rng).into_affine();
    let g2 = E::G2::rand(rng).into_affine();
    let h = E::G1::rand(rng).into_affine();

    let xi1 = nonzero(rng);
    let xi2 = nonzero(rng);
    let u = (h * xi1.inverse().unwrap()).into_affine();
    let v = (h * xi2.inverse().unwrap()).into_affine();

    let gamma: E::ScalarField = nonzero(rng);
    let w = (g2 * gamma).into_affine();

    (
        GroupKey {
            g1,
            g2,
            h,
            u,
            v,
            w,
        },
        ManagerKey {
            issuer: IssuerKey(gamma),
            opener: OpenerKey { xi1, xi2 },
        },
    )
}

pub(crate) fn nonzero<F: PrimeField, R: RngCore>(rng: &mut R) -> F {
    loop {
        let f = F::rand(rng);
        if !f.is_zero() {
            return f;
        }
    }
}

impl<E: Pairing> GroupKey<E> {
    /// A key with a zero element must be rejected before use.
    pub fn is_valid(&self) -> bool {
        !(self.g1.is_zero()
            || self.g2.is_zero()
            || self.h.is_zero()
            || self.u.is_zero()
            || self.v.is_zero()
            || self.w.is_zero())
    }
}
