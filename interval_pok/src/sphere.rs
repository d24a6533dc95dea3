//! Integer intervals ("spheres") used to bound hidden exponents and blinding
//! witnesses.
//!
//! A sphere with center `c` and radius `r` is the interval
//! `[c − r + 1, c + r − 1]`. Hidden exponents are drawn from a sphere's
//! *inner* sphere so that, after blinding, the prover's responses stay inside
//! the outer interval the verifier checks against.

use crate::error::IntervalPokError;
use rug::{integer::IsPrime, rand::MutRandState, Integer};
use serde::{Deserialize, Serialize};

/// Miller–Rabin rounds for prime sampling.
const PRIMALITY_REPS: u32 = 30;

/// Attempts before prime sampling reports an exhausted interval.
const PRIME_SEARCH_ATTEMPTS: usize = 50_000;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sphere {
    pub center: Integer,
    pub radius: Integer,
}

impl Sphere {
    pub fn new(center: Integer, radius: Integer) -> Result<Self, IntervalPokError> {
        if radius < 1 {
            return Err(IntervalPokError::InvalidRadius);
        }
        Ok(Self { center, radius })
    }

    /// Sphere `[2^center_exp − 2^radius_exp + 1, 2^center_exp + 2^radius_exp − 1]`.
    pub fn from_exponents(center_exp: u32, radius_exp: u32) -> Self {
        Self {
            center: Integer::from(1) << center_exp,
            radius: Integer::from(1) << radius_exp,
        }
    }

    /// Inclusive lower bound.
    pub fn min(&self) -> Integer {
        Integer::from(&self.center - &self.radius) + 1
    }

    /// Inclusive upper bound.
    pub fn max(&self) -> Integer {
        Integer::from(&self.center + &self.radius) - 1
    }

    /// Floor of the radius' base-2 logarithm.
    pub fn radius_exponent(&self) -> u32 {
        self.radius.significant_bits() - 1
    }

    pub fn contains(&self, value: &Integer) -> bool {
        *value >= self.min() && *value <= self.max()
    }

    /// The tighter sphere exponents must be drawn from so that blinded
    /// responses remain inside this sphere's bound: same center, radius
    /// exponent `(radius_exponent − 2) / epsilon − security`.
    pub fn inner(&self, epsilon: u32, security: u32) -> Result<Self, IntervalPokError> {
        let exponent = self.radius_exponent();
        let reduced = (exponent.saturating_sub(2) / epsilon).checked_sub(security);
        match reduced {
            Some(e) if e >= 1 => Ok(Self {
                center: self.center.clone(),
                radius: Integer::from(1) << e,
            }),
            _ => Err(IntervalPokError::RadiusTooSmall {
                exponent,
                epsilon,
                security,
            }),
        }
    }

    /// Uniform integer in `[min, max]`.
    pub fn random<R: MutRandState>(&self, rng: &mut R) -> Integer {
        let span = Integer::from(2 * &self.radius) - 1;
        self.min() + span.random_below(rng)
    }

    /// Uniform prime in `[min, max]`, by rejection sampling.
    pub fn random_prime<R: MutRandState>(&self, rng: &mut R) -> Result<Integer, IntervalPokError> {
        for _ in 0..PRIME_SEARCH_ATTEMPTS {
            let candidate = self.random(rng);
            if candidate.is_probably_prime(PRIMALITY_REPS) != IsPrime::No {
                return Ok(candidate);
            }
        }
        Err(IntervalPokError::PrimeSearchExhausted)
    }

    /// Sphere enclosing the pointwise product of two non-negative spheres.
    /// The radius is rounded down to a power of two, so points within one
    /// rounding step of the exact bound may fall outside.
    pub fn product(&self, other: &Sphere) -> Result<Self, IntervalPokError> {
        if self.min() < 0 || other.min() < 0 {
            return Err(IntervalPokError::NegativeSphere);
        }
        let center = Integer::from(&self.center * &other.center);
        let exact = self.max() * other.max() - &center + 1u32;
        let radius = Integer::from(1) << (exact.significant_bits() - 1);
        Ok(Self { center, radius })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rug::rand::RandState;

    fn seeded_rng() -> RandState<'static> {
        let mut rng = RandState::new();
        rng.seed(&Integer::from(13));
        rng
    }

    #[test]
    fn bounds_are_inclusive_and_symmetric() {
        let sphere = Sphere::new(Integer::from(100), Integer::from(16)).unwrap();
        assert_eq!(sphere.min(), 85);
        assert_eq!(sphere.max(), 115);
        assert!(sphere.contains(&Integer::from(85)));
        assert!(sphere.contains(&Integer::from(115)));
        assert!(!sphere.contains(&Integer::from(84)));
        assert!(!sphere.contains(&Integer::from(116)));
    }

    #[test]
    fn zero_radius_is_rejected() {
        assert_eq!(
            Sphere::new(Integer::from(4), Integer::ZERO),
            Err(IntervalPokError::InvalidRadius)
        );
    }

    #[test]
    fn random_samples_stay_in_bounds() {
        let mut rng = seeded_rng();
        let sphere = Sphere::from_exponents(32, 20);
        let (min, max) = (sphere.min(), sphere.max());
        for _ in 0..10_000 {
            let sample = sphere.random(&mut rng);
            assert!(sample >= min && sample <= max);
        }
    }

    #[test]
    fn random_prime_is_prime_and_in_bounds() {
        let mut rng = seeded_rng();
        let sphere = Sphere::from_exponents(40, 24);
        let prime = sphere.random_prime(&mut rng).unwrap();
        assert!(sphere.contains(&prime));
        assert_ne!(prime.is_probably_prime(30), IsPrime::No);
    }

    #[test]
    fn inner_sphere_shrinks_radius_and_keeps_center() {
        let sphere = Sphere::from_exponents(64, 63);
        let inner = sphere.inner(2, 10).unwrap();
        assert_eq!(inner.center, sphere.center);
        // (63 - 2) / 2 - 10
        assert_eq!(inner.radius_exponent(), 20);
    }

    #[test]
    fn inner_sphere_underflow_is_an_error() {
        let sphere = Sphere::from_exponents(16, 15);
        assert!(matches!(
            sphere.inner(2, 10),
            Err(IntervalPokError::RadiusTooSmall { .. })
        ));
    }

    #[test]
    fn product_encloses_most_of_the_interval() {
        let mut rng = seeded_rng();
        let a = Sphere::from_exponents(20, 10);
        let b = Sphere::from_exponents(24, 12);
        let product = a.product(&b).unwrap();
        assert_eq!(product.center, Integer::from(1) << 44u32);
        for _ in 0..1_000 {
            let v = a.random(&mut rng) * b.random(&mut rng);
            // Radius rounding can shave the extreme edges, but random points
            // land well inside.
            assert!(product.contains(&v));
        }
    }

    #[test]
    fn product_of_negative_interval_is_rejected() {
        let a = Sphere::new(Integer::from(2), Integer::from(10)).unwrap();
        let b = Sphere::from_exponents(8, 2);
        assert_eq!(a.product(&b), Err(IntervalPokError::NegativeSphere));
    }
}
