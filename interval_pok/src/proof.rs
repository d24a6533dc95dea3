//! Prover and verifier for relation-set statements.
//!
//! The prover follows the usual three moves. For each hidden exponent it
//! draws a blinding witness from `±{0,1}^{epsilon·(security + inner_mu) + 1}`
//! where `inner_mu` is the radius exponent of the exponent's inner sphere,
//! commits to every relation with the witnesses in place of the exponents,
//! derives the challenge from the transcript digest truncated to the low
//! `security` bits, and responds with `s = tw − c·(w − center)`.
//!
//! The verifier first gates every response on `|s| ≤ 2^{epsilon·(inner_mu +
//! security) + 1}` — an out-of-range response is a verification failure, not
//! an error, and short-circuits before any modular arithmetic — and only then
//! reconstructs the commitments as `target^c · Π A^{±(s − c·center)}` and
//! compares the recomputed challenge.

use crate::{
    error::IntervalPokError,
    relation::{RelationSet, RelationTarget},
    sphere::Sphere,
};
use digest::Digest;
use groupsig_utils::hashing_utils::truncated_challenge;
use rug::{rand::MutRandState, Integer};
use serde::{Deserialize, Serialize};

/// Group and soundness parameters a proof is made under.
#[derive(Clone, Debug)]
pub struct ProofContext<'a> {
    /// Modulus of the unknown-order group.
    pub modulus: &'a Integer,
    /// Zero-knowledge slack exponent, an integer ≥ 2.
    pub epsilon: u32,
    /// Challenge bit length.
    pub security: u32,
}

impl ProofContext<'_> {
    /// Bit length of the blinding witness (and of the response bound) for an
    /// exponent drawn from `sphere`'s inner sphere.
    fn witness_bits(&self, sphere: &Sphere) -> Result<u32, IntervalPokError> {
        let inner = sphere.inner(self.epsilon, self.security)?;
        Ok(self.epsilon * (self.security + inner.radius_exponent()) + 1)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationSetProof {
    /// Transcript digest truncated to the security parameter's bit length.
    pub challenge: Integer,
    /// One interval-bounded response per hidden exponent.
    pub responses: Vec<Integer>,
}

impl RelationSetProof {
    pub fn new<D: Digest, R: MutRandState>(
        rng: &mut R,
        ctx: &ProofContext,
        message: &[u8],
        objects: &[Integer],
        spheres: &[Sphere],
        secrets: &[Integer],
        relations: &RelationSet,
    ) -> Result<Self, IntervalPokError> {
        if secrets.len() != spheres.len() {
            return Err(IntervalPokError::DimensionMismatch {
                expected: spheres.len(),
                found: secrets.len(),
            });
        }
        relations.validate(objects.len(), spheres.len())?;

        let witnesses = spheres
            .iter()
            .map(|sphere| {
                let bits = ctx.witness_bits(sphere)?;
                Ok(random_symmetric(rng, bits))
            })
            .collect::<Result<Vec<_>, IntervalPokError>>()?;

        let commitments = commit(ctx.modulus, objects, &witnesses, relations)?;
        let challenge = truncated_challenge::<D, _>(
            message,
            commitments.iter().chain(objects.iter()),
            ctx.security,
        );

        let responses = witnesses
            .into_iter()
            .zip(secrets.iter().zip(spheres.iter()))
            .map(|(tw, (w, sphere))| tw - Integer::from(w - &sphere.center) * &challenge)
            .collect();

        Ok(Self {
            challenge,
            responses,
        })
    }

    /// `Ok(false)` for any well-formed proof that does not verify, whether it
    /// fails the range gate or the challenge comparison. `Err` is reserved
    /// for malformed statements and arithmetic failure.
    pub fn verify<D: Digest>(
        &self,
        ctx: &ProofContext,
        message: &[u8],
        objects: &[Integer],
        spheres: &[Sphere],
        relations: &RelationSet,
    ) -> Result<bool, IntervalPokError> {
        if self.responses.len() != spheres.len() {
            return Err(IntervalPokError::DimensionMismatch {
                expected: spheres.len(),
                found: self.responses.len(),
            });
        }
        relations.validate(objects.len(), spheres.len())?;

        if self.challenge.is_negative()
            || self.challenge.significant_bits() > ctx.security
        {
            return Ok(false);
        }

        // Range gate. Soundness depends on it, so it runs before any of the
        // exponentiations below and rejects on its own.
        for (response, sphere) in self.responses.iter().zip(spheres.iter()) {
            let bound = Integer::from(1) << ctx.witness_bits(sphere)?;
            if Integer::from(response.abs_ref()) > bound {
                return Ok(false);
            }
        }

        let commitments = self.recompute_commitments(ctx, objects, spheres, relations)?;
        let expected = truncated_challenge::<D, _>(
            message,
            commitments.iter().chain(objects.iter()),
            ctx.security,
        );
        Ok(expected == self.challenge)
    }

    /// Reconstructs each commitment from the responses and challenge alone:
    /// with `tw = s + c·(w − z)` the committed value equals
    /// `target^c · Π A^{±(s − c·z)}`.
    fn recompute_commitments(
        &self,
        ctx: &ProofContext,
        objects: &[Integer],
        spheres: &[Sphere],
        relations: &RelationSet,
    ) -> Result<Vec<Integer>, IntervalPokError> {
        relations
            .relations
            .iter()
            .map(|relation| {
                let mut acc = match relation.target {
                    RelationTarget::One => Integer::from(1),
                    RelationTarget::Object(index) => {
                        pow_mod(&objects[index], &self.challenge, ctx.modulus)?
                    }
                };
                for term in &relation.terms {
                    let mut exponent = Integer::from(&self.responses[term.variable])
                        - Integer::from(&self.challenge * &spheres[term.variable].center);
                    if term.inverted {
                        exponent = -exponent;
                    }
                    let factor = pow_mod(&objects[term.object], &exponent, ctx.modulus)?;
                    acc = acc * factor % ctx.modulus;
                }
                Ok(acc)
            })
            .collect()
    }
}

/// Commitments for the prover's first move: `B_j = Π A^{±tw}`.
fn commit(
    modulus: &Integer,
    objects: &[Integer],
    witnesses: &[Integer],
    relations: &RelationSet,
) -> Result<Vec<Integer>, IntervalPokError> {
    relations
        .relations
        .iter()
        .map(|relation| {
            let mut acc = Integer::from(1);
            for term in &relation.terms {
                let mut exponent = witnesses[term.variable].clone();
                if term.inverted {
                    exponent = -exponent;
                }
                let factor = pow_mod(&objects[term.object], &exponent, modulus)?;
                acc = acc * factor % modulus;
            }
            Ok(acc)
        })
        .collect()
}

fn pow_mod(
    base: &Integer,
    exponent: &Integer,
    modulus: &Integer,
) -> Result<Integer, IntervalPokError> {
    base.clone()
        .pow_mod(exponent, modulus)
        .map_err(|_| IntervalPokError::NonInvertibleElement)
}

/// Uniform integer with `|v| < 2^bits`, sign drawn separately.
fn random_symmetric<R: MutRandState>(rng: &mut R, bits: u32) -> Integer {
    let magnitude = Integer::from(Integer::random_bits(bits, rng));
    if Integer::from(Integer::random_bits(1, rng)) == 1 {
        -magnitude
    } else {
        magnitude
    }
}
