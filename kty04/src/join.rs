//! The two-party join protocol: one message from the prospective member, one
//! reply from the manager.
//!
//! The member's message escrows its tracing exponent alongside the
//! commitment, which is what lets the manager serve later reveal requests
//! from the membership list alone.

use crate::{
    entries::GmlEntry,
    error::Kty04Error,
    keys::{GroupKey, ManagerKey, MemberKey},
    sign::pow,
};
use rug::{rand::MutRandState, Integer};
use serde::{Deserialize, Serialize};

/// First (and only) member-to-manager message.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinRequest {
    /// `C = b^{x′}`
    pub commitment: Integer,
    /// The escrowed tracing exponent `x′`.
    pub tracing_exponent: Integer,
}

/// State the member retains between sending the request and receiving the
/// manager's reply.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingJoin {
    commitment: Integer,
    tracing_exponent: Integer,
}

/// Manager-to-member reply completing the member key.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinResponse {
    /// Membership-list index assigned to the member.
    pub id: u64,
    /// Certificate `A = (a0·a^x·C)^{1/e}`.
    pub certificate: Integer,
    /// Membership secret `x` drawn by the manager.
    pub secret_exponent: Integer,
    /// Prime certifying exponent `e`.
    pub certifying_exponent: Integer,
}

/// Draws the tracing exponent and produces the join request.
pub fn join_member_start<R: MutRandState>(
    rng: &mut R,
    group: &GroupKey,
) -> Result<(PendingJoin, JoinRequest), Kty04Error> {
    let tracing_exponent = group
        .m_sphere()
        .inner(group.epsilon, group.security)?
        .random(rng);
    let commitment = pow(&group.b, &tracing_exponent, &group.modulus)?;
    let pending = PendingJoin {
        commitment: commitment.clone(),
        tracing_exponent: tracing_exponent.clone(),
    };
    Ok((
        pending,
        JoinRequest {
            commitment,
            tracing_exponent,
        },
    ))
}

/// Certifies the requesting member under the identity `id` (the caller picks
/// the membership list's vacant index) and produces the matching escrow
/// entry.
pub fn join_manager<R: MutRandState>(
    rng: &mut R,
    group: &GroupKey,
    manager: &ManagerKey,
    request: &JoinRequest,
    id: u64,
) -> Result<(JoinResponse, GmlEntry), Kty04Error> {
    let n = &group.modulus;
    if request.commitment != pow(&group.b, &request.tracing_exponent, n)? {
        return Err(Kty04Error::InvalidJoinRequest);
    }

    let secret_exponent = group
        .lambda_sphere()
        .inner(group.epsilon, group.security)?
        .random(rng);
    let certifying_exponent = group
        .gamma_sphere()
        .inner(group.epsilon, group.security)?
        .random_prime(rng)?;

    // e is invertible modulo the group order, so A^e lands back on the base.
    let inverse = certifying_exponent
        .clone()
        .invert(&manager.group_order())
        .map_err(|_| Kty04Error::NonInvertibleExponent)?;
    let base =
        pow(&group.a, &secret_exponent, n)? * &group.a0 % n * &request.commitment % n;
    let certificate = pow(&base, &inverse, n)?;

    let entry = GmlEntry {
        id,
        certificate: certificate.clone(),
        trapdoor: request.tracing_exponent.clone(),
    };
    let response = JoinResponse {
        id,
        certificate,
        secret_exponent,
        certifying_exponent,
    };
    Ok((response, entry))
}

/// Checks the certificate equation and assembles the member key.
pub fn join_member_finish(
    group: &GroupKey,
    pending: PendingJoin,
    response: &JoinResponse,
) -> Result<MemberKey, Kty04Error> {
    let n = &group.modulus;
    let lhs = pow(&response.certificate, &response.certifying_exponent, n)?;
    let rhs =
        pow(&group.a, &response.secret_exponent, n)? * &group.a0 % n * &pending.commitment % n;
    if lhs != rhs {
        return Err(Kty04Error::InvalidCertificate);
    }
    Ok(MemberKey {
        certificate: response.certificate.clone(),
        commitment: pending.commitment,
        secret_exponent: response.secret_exponent.clone(),
        tracing_exponent: pending.tracing_exponent,
        certifying_exponent: response.certifying_exponent.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::{
        setup,
        tests::{seeded_rng, test_config},
    };
    use rug::integer::IsPrime;

    #[test]
    fn join_produces_a_valid_member_key() {
        let mut rng = seeded_rng(20);
        let (group, manager) = setup(&mut rng, &test_config()).unwrap();
        let (pending, request) = join_member_start(&mut rng, &group).unwrap();
        let (response, entry) = join_manager(&mut rng, &group, &manager, &request, 0).unwrap();
        let member = join_member_finish(&group, pending, &response).unwrap();

        // A^e = C·a^x·a0 and C = b^x'
        let n = &group.modulus;
        let lhs = pow(&member.certificate, &member.certifying_exponent, n).unwrap();
        let rhs = pow(&group.a, &member.secret_exponent, n).unwrap() * &group.a0 % n
            * &member.commitment
            % n;
        assert_eq!(lhs, rhs);
        assert_eq!(
            member.commitment,
            pow(&group.b, &member.tracing_exponent, n).unwrap()
        );

        assert_ne!(
            member.certifying_exponent.is_probably_prime(30),
            IsPrime::No
        );
        assert!(group
            .gamma_sphere()
            .contains(&member.certifying_exponent));
        assert!(group.lambda_sphere().contains(&member.secret_exponent));

        assert_eq!(entry.id, 0);
        assert_eq!(entry.certificate, member.certificate);
        assert_eq!(entry.trapdoor, member.tracing_exponent);
    }

    #[test]
    fn mismatched_commitment_is_rejected() {
        let mut rng = seeded_rng(21);
        let (group, manager) = setup(&mut rng, &test_config()).unwrap();
        let (_, mut request) = join_member_start(&mut rng, &group).unwrap();
        request.commitment += 1;
        assert_eq!(
            join_manager(&mut rng, &group, &manager, &request, 0).unwrap_err(),
            Kty04Error::InvalidJoinRequest
        );
    }

    #[test]
    fn forged_response_fails_the_certificate_check() {
        let mut rng = seeded_rng(22);
        let (group, manager) = setup(&mut rng, &test_config()).unwrap();
        let (pending, request) = join_member_start(&mut rng, &group).unwrap();
        let (mut response, _) = join_manager(&mut rng, &group, &manager, &request, 0).unwrap();
        response.certificate += 1;
        assert_eq!(
            join_member_finish(&group, pending, &response).unwrap_err(),
            Kty04Error::InvalidCertificate
        );
    }
}
