//! Credential issuance. The member's opening message carries nothing; the
//! issuer draws the secret and certificate and the member checks the
//! certificate before accepting.

use crate::{
    error::Bbs04Error,
    setup::{nonzero, GroupKey, ManagerKey},
};
use ark_ec::{pairing::Pairing, CurveGroup};
use ark_ff::{Field, Zero};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::{rand::RngCore, vec};
use groupsig_utils::serde_utils::ArkObjectBytes;
use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// The member's (empty) opening message of the join exchange.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct JoinRequest;

/// An SDH pair `(A, x)` with `A = g1·(γ + x)^{−1}`.
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
pub struct MemberKey<E: Pairing> {
    #[zeroize(skip)]
    #[serde_as(as = "ArkObjectBytes")]
    pub certificate: E::G1Affine,
    #[serde_as(as = "ArkObjectBytes")]
    pub secret: E::ScalarField,
}

/// Identity-escrow record: the certificate is what Open recovers.
#[serde_as]
#[derive(
    Clone, PartialEq, Eq, Debug, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
pub struct GmlEntry<E: Pairing> {
    pub id: u64,
    #[serde_as(as = "ArkObjectBytes")]
    pub certificate: E::G1Affine,
}

pub fn join_member_start() -> JoinRequest {
    JoinRequest
}

/// Issues a fresh membership credential under the identity `id`.
pub fn join_manager<E: Pairing, R: RngCore>(
    rng: &mut R,
    group: &GroupKey<E>,
    manager: &ManagerKey<E>,
    _request: &JoinRequest,
    id: u64,
) -> (MemberKey<E>, GmlEntry<E>) {
    let gamma = manager.issuer.0;
    let (secret, inverse) = loop {
        let secret: E::ScalarField = nonzero(rng);
        if let Some(inverse) = (gamma + secret).inverse() {
            break (secret, inverse);
        }
    };
    let certificate = (group.g1 * inverse).into_affine();
    let entry = GmlEntry { id, certificate };
    (
        MemberKey {
            certificate,
            secret,
        },
        entry,
    )
}

/// The member's acceptance check: `e(A, w + g2·x) = e(g1, g2)`.
pub fn join_member_finish<E: Pairing>(
    group: &GroupKey<E>,
    key: MemberKey<E>,
) -> Result<MemberKey<E>, Bbs04Error> {
    let rhs = group.w + group.g2 * key.secret;
    if !E::multi_pairing(
        vec![
            E::G1Prepared::from(key.certificate),
            E::G1Prepared::from((-group.g1.into_group()).into_affine()),
        ],
        vec![E::G2Prepared::from(rhs), E::G2Prepared::from(group.g2)],
    )
    .is_zero()
    {
        return Err(Bbs04Error::InvalidCertificate);
    }
    Ok(key)
}
