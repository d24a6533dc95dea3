//! Group, manager and member keys, and the one-shot group setup.

use crate::error::Kty04Error;
use interval_pok::{ProofContext, Sphere};
use rug::{integer::IsPrime, rand::MutRandState, Integer};
use serde::{Deserialize, Serialize};

/// Miller–Rabin rounds used during setup.
const PRIMALITY_REPS: u32 = 30;

/// Candidate budget for one safe prime.
const SAFE_PRIME_ATTEMPTS: usize = 1_000_000;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetupConfig {
    /// Bit length of each safe prime; the modulus has twice as many bits.
    pub prime_bits: u32,
    /// Challenge bit length, `k` in the proofs.
    pub security: u32,
    /// Zero-knowledge slack exponent, an integer ≥ 2.
    pub epsilon: u32,
}

impl SetupConfig {
    pub fn new(prime_bits: u32, security: u32) -> Self {
        Self {
            prime_bits,
            security,
            epsilon: 2,
        }
    }

    fn validate(&self) -> Result<(), Kty04Error> {
        if self.prime_bits < 32 {
            return Err(Kty04Error::InvalidParameters("prime_bits below 32"));
        }
        if self.epsilon < 2 {
            return Err(Kty04Error::InvalidParameters("epsilon below 2"));
        }
        if self.security == 0 {
            return Err(Kty04Error::InvalidParameters("security of zero"));
        }
        Ok(())
    }
}

impl Default for SetupConfig {
    fn default() -> Self {
        Self::new(1024, 80)
    }
}

/// Public group parameters. Shared read-only by every operation after setup.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupKey {
    /// RSA modulus `n = p·q`, a product of two safe primes.
    pub modulus: Integer,
    pub a: Integer,
    pub a0: Integer,
    pub b: Integer,
    pub g: Integer,
    pub h: Integer,
    /// Opening key `y = g^x`, `x` held by the manager.
    pub y: Integer,
    /// Modulus bit length; the spheres are placed relative to it.
    pub nu: u32,
    pub security: u32,
    pub epsilon: u32,
}

impl GroupKey {
    /// Sphere for membership exponents `x`.
    pub fn lambda_sphere(&self) -> Sphere {
        Sphere::from_exponents(self.nu / 4, self.nu / 4 - 1)
    }

    /// Sphere for tracing exponents `x′` and the signing free variables.
    pub fn m_sphere(&self) -> Sphere {
        Sphere::from_exponents(self.nu / 2, self.nu / 2 - 1)
    }

    /// Sphere for certifying exponents `e`.
    pub fn gamma_sphere(&self) -> Sphere {
        Sphere::from_exponents(3 * self.nu / 4, 3 * self.nu / 4 - 1)
    }

    pub(crate) fn proof_context(&self) -> ProofContext<'_> {
        ProofContext {
            modulus: &self.modulus,
            epsilon: self.epsilon,
            security: self.security,
        }
    }
}

/// The opening/tracing authority's secret: the factorization of the modulus
/// and the discrete log of `y`. Never transmitted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagerKey {
    pub p: Integer,
    pub q: Integer,
    pub x: Integer,
}

impl ManagerKey {
    /// Order of the quadratic-residue group, `p′·q′`.
    pub fn group_order(&self) -> Integer {
        Integer::from(&self.p - 1u32) / 2u32 * (Integer::from(&self.q - 1u32) / 2u32)
    }
}

/// A member's certificate and secret exponents, satisfying
/// `A^e = C·a^x·a0` and `C = b^{x′}` modulo the group.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberKey {
    /// Certificate `A`.
    pub certificate: Integer,
    /// Commitment `C` to the tracing exponent.
    pub commitment: Integer,
    /// Membership secret `x`.
    pub secret_exponent: Integer,
    /// Tracing secret `x′`; revealing it revokes unlinkability.
    pub tracing_exponent: Integer,
    /// Prime certifying exponent `e`.
    pub certifying_exponent: Integer,
}

/// The shareable fields of a [`MemberKey`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberKeyPublic {
    pub certificate: Integer,
    pub commitment: Integer,
    pub secret_exponent: Integer,
    pub certifying_exponent: Integer,
}

impl MemberKey {
    pub fn public_part(&self) -> MemberKeyPublic {
        MemberKeyPublic {
            certificate: self.certificate.clone(),
            commitment: self.commitment.clone(),
            secret_exponent: self.secret_exponent.clone(),
            certifying_exponent: self.certifying_exponent.clone(),
        }
    }

    pub fn private_part(&self) -> &Integer {
        &self.tracing_exponent
    }
}

/// Draws the group's modulus, generators and opening key.
pub fn setup<R: MutRandState>(
    rng: &mut R,
    config: &SetupConfig,
) -> Result<(GroupKey, ManagerKey), Kty04Error> {
    config.validate()?;

    let p = safe_prime(rng, config.prime_bits)?;
    let q = loop {
        let q = safe_prime(rng, config.prime_bits)?;
        if q != p {
            break q;
        }
    };
    let modulus = Integer::from(&p * &q);
    let nu = modulus.significant_bits();

    let a = quadratic_residue(rng, &modulus);
    let a0 = quadratic_residue(rng, &modulus);
    let b = quadratic_residue(rng, &modulus);
    let g = quadratic_residue(rng, &modulus);
    let h = quadratic_residue(rng, &modulus);

    let manager = ManagerKey {
        p,
        q,
        x: Integer::from(1) + manager_order_sample(rng, &modulus),
    };
    let y = g
        .clone()
        .pow_mod(&manager.x, &modulus)
        .map_err(|_| Kty04Error::NonInvertibleExponent)?;

    let group = GroupKey {
        modulus,
        a,
        a0,
        b,
        g,
        h,
        y,
        nu,
        security: config.security,
        epsilon: config.epsilon,
    };

    // Every sphere family must admit an inner sphere under these parameters,
    // or signing could never succeed.
    for sphere in [
        group.lambda_sphere(),
        group.m_sphere(),
        group.gamma_sphere(),
        group.gamma_sphere().product(&group.m_sphere())?,
    ] {
        sphere.inner(group.epsilon, group.security)?;
    }

    Ok((group, manager))
}

/// A prime `p = 2p′ + 1` of exactly `bits` bits with `p′` prime.
fn safe_prime<R: MutRandState>(rng: &mut R, bits: u32) -> Result<Integer, Kty04Error> {
    for _ in 0..SAFE_PRIME_ATTEMPTS {
        let mut half = Integer::from(Integer::random_bits(bits - 1, rng));
        half.set_bit(bits - 2, true);
        half |= 1u32;
        if half.is_probably_prime(PRIMALITY_REPS) == IsPrime::No {
            continue;
        }
        let candidate = Integer::from(2 * &half) + 1;
        if candidate.is_probably_prime(PRIMALITY_REPS) != IsPrime::No {
            return Ok(candidate);
        }
    }
    Err(Kty04Error::PrimeGenerationFailed)
}

/// A uniform square modulo `n`, coprime to it.
fn quadratic_residue<R: MutRandState>(rng: &mut R, n: &Integer) -> Integer {
    loop {
        let root = Integer::from(n - 2u32).random_below(rng) + 2;
        if Integer::from(root.gcd_ref(n)) == 1 {
            return root.square() % n;
        }
    }
}

/// Sampling space for the opening exponent: slightly below `n/4` keeps the
/// draw inside the quadratic-residue group order without knowing it.
fn manager_order_sample<R: MutRandState>(rng: &mut R, n: &Integer) -> Integer {
    Integer::from(n >> 3u32).random_below(rng)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use rug::rand::RandState;

    pub(crate) fn seeded_rng(seed: u64) -> RandState<'static> {
        let mut rng = RandState::new();
        rng.seed(&Integer::from(seed));
        rng
    }

    pub(crate) fn test_config() -> SetupConfig {
        SetupConfig::new(64, 10)
    }

    #[test]
    fn setup_produces_consistent_parameters() {
        let mut rng = seeded_rng(1);
        let (group, manager) = setup(&mut rng, &test_config()).unwrap();

        assert_eq!(Integer::from(&manager.p * &manager.q), group.modulus);
        assert_eq!(group.nu, group.modulus.significant_bits());
        assert_ne!(manager.p, manager.q);
        assert_ne!(manager.p.is_probably_prime(30), IsPrime::No);
        assert_ne!(manager.q.is_probably_prime(30), IsPrime::No);

        // Safe primes: (p - 1) / 2 is prime too.
        let half = Integer::from(&manager.p - 1u32) / 2u32;
        assert_ne!(half.is_probably_prime(30), IsPrime::No);

        let y = group
            .g
            .clone()
            .pow_mod(&manager.x, &group.modulus)
            .unwrap();
        assert_eq!(y, group.y);
    }

    #[test]
    fn sphere_families_are_ordered_and_admit_inner_spheres() {
        let mut rng = seeded_rng(2);
        let (group, _) = setup(&mut rng, &test_config()).unwrap();

        let lambda = group.lambda_sphere();
        let m = group.m_sphere();
        let gamma = group.gamma_sphere();
        assert!(lambda.max() < m.min());
        assert!(m.max() < gamma.min());

        for sphere in [lambda, m.clone(), gamma.clone()] {
            sphere.inner(group.epsilon, group.security).unwrap();
        }
        gamma
            .product(&m)
            .unwrap()
            .inner(group.epsilon, group.security)
            .unwrap();
    }

    #[test]
    fn undersized_parameters_are_rejected() {
        let mut rng = seeded_rng(3);
        assert!(matches!(
            setup(&mut rng, &SetupConfig::new(16, 10)),
            Err(Kty04Error::InvalidParameters(_))
        ));
        assert!(matches!(
            setup(
                &mut rng,
                &SetupConfig {
                    prime_bits: 64,
                    security: 10,
                    epsilon: 1,
                }
            ),
            Err(Kty04Error::InvalidParameters(_))
        ));
    }

    #[test]
    fn member_key_splits_into_public_and_private_parts() {
        let key = MemberKey {
            certificate: Integer::from(4),
            commitment: Integer::from(9),
            secret_exponent: Integer::from(7),
            tracing_exponent: Integer::from(11),
            certifying_exponent: Integer::from(13),
        };
        assert_eq!(*key.private_part(), 11);
        let public = key.public_part();
        assert_eq!(public.certificate, 4);
        assert_eq!(public.secret_exponent, 7);
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(serde_json::from_str::<MemberKey>(&json).unwrap(), key);
    }
}
