//! Range proof verifier implementation
//!
//! Verification walks a fixed sequence of stages:
//!
//! ```text
//! Init -> ChallengesDerived -> MainEquationChecked -> IpaFolded -> IpaChecked
//! ```
//!
//! A proof that fails a check is a normal outcome ([`VerificationOutcome::Rejected`]);
//! only malformed input or an internal defect is an error.

use crate::{polynomial::delta_from_sums, RangeProof};
use rangeproof_core::{
    scalar_hex, scalar_inverse, utils::*, GeneratorSet, GroupElement, RangeProofResult,
    Transcript,
};
use rangeproof_ipa::verification_scalars;
use k256::Scalar;
use serde::Serialize;
use std::sync::Arc;

/// Verification progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum VerificationStage {
    Init,
    ChallengesDerived,
    MainEquationChecked,
    IpaFolded,
    IpaChecked,
}

impl VerificationStage {
    fn next(self) -> Option<Self> {
        match self {
            Self::Init => Some(Self::ChallengesDerived),
            Self::ChallengesDerived => Some(Self::MainEquationChecked),
            Self::MainEquationChecked => Some(Self::IpaFolded),
            Self::IpaFolded => Some(Self::IpaChecked),
            Self::IpaChecked => None,
        }
    }
}

/// Which check a rejected proof failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RejectionReason {
    /// `t_hat*G + tau_x*H != z²*V + delta*G + x*T1 + x²*T2`
    MainEquation,
    /// The folded inner product relation does not hold
    InnerProduct,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rejection {
    pub reason: RejectionReason,
    /// Last stage completed before the failing check
    pub stage: VerificationStage,
}

/// Result of verifying a well-formed proof
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum VerificationOutcome {
    Verified,
    Rejected(Rejection),
}

impl VerificationOutcome {
    pub fn is_verified(&self) -> bool {
        matches!(self, Self::Verified)
    }

    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            Self::Verified => None,
            Self::Rejected(rejection) => Some(rejection),
        }
    }
}

/// Public intermediate values of one verification, for diagnosing
/// mismatches against another implementation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerificationTrace {
    #[serde(with = "scalar_hex")]
    pub y: Scalar,
    #[serde(with = "scalar_hex")]
    pub z: Scalar,
    #[serde(with = "scalar_hex")]
    pub x: Scalar,
    #[serde(with = "scalar_hex")]
    pub delta: Scalar,
    #[serde(with = "scalar_hex")]
    pub sum_y_powers: Scalar,
    #[serde(with = "scalar_hex")]
    pub sum_two_powers: Scalar,
    /// `t_hat*G + tau_x*H`
    pub main_lhs: GroupElement,
    /// `z²*V + delta*G + x*T1 + x²*T2`
    pub main_rhs: GroupElement,
    pub main_equation_holds: bool,
    /// `None` when verification stopped at the main equation
    pub inner_product_holds: Option<bool>,
}

struct StageTracker {
    stage: VerificationStage,
}

impl StageTracker {
    fn advance(&mut self, to: VerificationStage) {
        debug_assert_eq!(self.stage.next(), Some(to), "verification stage skipped");
        tracing::debug!(from = ?self.stage, to = ?to, "verification stage");
        self.stage = to;
    }

    fn reject(&self, reason: RejectionReason) -> VerificationOutcome {
        tracing::warn!(?reason, stage = ?self.stage, "range proof rejected");
        VerificationOutcome::Rejected(Rejection {
            reason,
            stage: self.stage,
        })
    }
}

/// Verifier for range proofs
#[derive(Debug, Clone)]
pub struct RangeVerifier {
    generators: Arc<GeneratorSet>,
    domain: Vec<u8>,
}

impl RangeVerifier {
    /// Create a range verifier with existing generators and a transcript domain
    pub fn new(generators: Arc<GeneratorSet>, domain: impl AsRef<[u8]>) -> Self {
        Self {
            generators,
            domain: domain.as_ref().to_vec(),
        }
    }

    /// Get the generator set used by this verifier
    pub fn generators(&self) -> &GeneratorSet {
        &self.generators
    }

    pub fn bit_length(&self) -> u32 {
        self.generators.bit_length()
    }

    /// Verify a range proof for the commitment `V`
    pub fn verify(&self, commitment: &GroupElement, proof: &RangeProof) -> RangeProofResult<VerificationOutcome> {
        self.verify_with_trace(commitment, proof)
            .map(|(outcome, _)| outcome)
    }

    /// Verify a range proof and return the public intermediate values
    #[tracing::instrument(skip_all, name = "range_verify", fields(bits = self.bit_length()))]
    pub fn verify_with_trace(
        &self,
        commitment: &GroupElement,
        proof: &RangeProof,
    ) -> RangeProofResult<(VerificationOutcome, VerificationTrace)> {
        let gens = &self.generators;
        let bits = self.bit_length();
        let n = bits as usize;
        let padded = gens.vector_length();

        proof.inner_product_proof.check_rounds(padded)?;

        let mut tracker = StageTracker {
            stage: VerificationStage::Init,
        };

        let mut transcript = Transcript::new(&self.domain, bits);
        let (y, z) = transcript.bit_commitment_challenges(&proof.a, &proof.s)?;
        let x = transcript.polynomial_challenge(&proof.t1, &proof.t2)?;
        tracker.advance(VerificationStage::ChallengesDerived);

        let z_squared = z * z;
        let sum_y_powers = sum_of_powers(&y, n);
        let sum_two_powers = sum_of_powers(&Scalar::from(2u64), n);
        let delta = delta_from_sums(&z, &sum_y_powers, &sum_two_powers);

        // t_hat*G + tau_x*H == z²*V + delta*G + x*T1 + x²*T2
        let main_lhs = GroupElement::multiscalar_mul([proof.t_hat, proof.tau_x], [gens.g(), gens.h()]);
        let main_rhs = GroupElement::multiscalar_mul(
            [z_squared, delta, x, x * x],
            [*commitment, gens.g(), proof.t1, proof.t2],
        );
        let main_equation_holds = main_lhs == main_rhs;

        let mut trace = VerificationTrace {
            y,
            z,
            x,
            delta,
            sum_y_powers,
            sum_two_powers,
            main_lhs,
            main_rhs,
            main_equation_holds,
            inner_product_holds: None,
        };

        if !main_equation_holds {
            return Ok((tracker.reject(RejectionReason::MainEquation), trace));
        }
        tracker.advance(VerificationStage::MainEquationChecked);

        let ipa = &proof.inner_product_proof;
        let scalars = verification_scalars(ipa, padded, &mut transcript)?;
        let s_inv = scalars.s_inv();
        tracker.advance(VerificationStage::IpaFolded);

        // Combined check, must equal the identity:
        //   A + x*S - mu*H + (t_hat - ab)*U + Σ(w²L + w^{-2}R)
        //   + Σ(-z - a*s_i) G_i + Σ((z + z²2^i y^{-i}) - b*s_i^{-1} y^{-i}) H_i
        let y_inv_powers = scalar_powers(&scalar_inverse(&y)?, padded);
        let two_powers = scalar_powers(&Scalar::from(2u64), n);

        let g_coefficients = (0..padded).map(|i| {
            let z_term = if i < n { z } else { Scalar::ZERO };
            -z_term - ipa.a * scalars.s[i]
        });
        let h_coefficients = (0..padded).map(|i| {
            let z_term = if i < n {
                z + z_squared * two_powers[i] * y_inv_powers[i]
            } else {
                Scalar::ZERO
            };
            z_term - ipa.b * s_inv[i] * y_inv_powers[i]
        });

        let coefficients = [Scalar::ONE, x, -proof.mu, proof.t_hat - ipa.a * ipa.b]
            .into_iter()
            .chain(scalars.challenges.iter().map(|w| *w * *w))
            .chain(scalars.challenges_inv.iter().map(|w| *w * *w))
            .chain(g_coefficients)
            .chain(h_coefficients);

        let points = [proof.a, proof.s, gens.h(), gens.u()]
            .into_iter()
            .chain(ipa.l_vec.iter().copied())
            .chain(ipa.r_vec.iter().copied())
            .chain(gens.g_vec().iter().copied())
            .chain(gens.h_vec().iter().copied());

        let inner_product_holds = GroupElement::multiscalar_mul(coefficients, points).is_identity();
        trace.inner_product_holds = Some(inner_product_holds);

        if !inner_product_holds {
            return Ok((tracker.reject(RejectionReason::InnerProduct), trace));
        }
        tracker.advance(VerificationStage::IpaChecked);

        Ok((VerificationOutcome::Verified, trace))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RangeProver;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;
    use rangeproof_core::RangeProofError;

    fn prove(bits: u32, value: u64, seed: u64) -> (RangeVerifier, RangeProof, GroupElement) {
        let generators = GeneratorSet::shared(bits).unwrap();
        let prover = RangeProver::new(Arc::clone(&generators), b"verifier_test");
        let verifier = RangeVerifier::new(generators, b"verifier_test");
        let (proof, commitment) = prover
            .prove(value, &mut ChaCha20Rng::seed_from_u64(seed))
            .unwrap();
        (verifier, proof, commitment)
    }

    #[test]
    fn test_valid_proof_trace() {
        let (verifier, proof, commitment) = prove(8, 200, 1);
        let (outcome, trace) = verifier.verify_with_trace(&commitment, &proof).unwrap();

        assert_eq!(outcome, VerificationOutcome::Verified);
        assert!(trace.main_equation_holds);
        assert_eq!(trace.inner_product_holds, Some(true));
        assert_eq!(trace.main_lhs, trace.main_rhs);
        assert_eq!(trace.sum_two_powers, Scalar::from(255u64));
        assert_eq!(trace.delta, crate::polynomial::delta(&trace.y, &trace.z, 8));
    }

    #[test]
    fn test_wrong_commitment_fails_main_equation() {
        let (verifier, proof, commitment) = prove(8, 200, 2);
        let other = commitment + GroupElement::generator();

        let (outcome, trace) = verifier.verify_with_trace(&other, &proof).unwrap();
        assert_eq!(
            outcome,
            VerificationOutcome::Rejected(Rejection {
                reason: RejectionReason::MainEquation,
                stage: VerificationStage::ChallengesDerived,
            })
        );
        assert!(!trace.main_equation_holds);
        assert_eq!(trace.inner_product_holds, None);
    }

    #[test]
    fn test_tampered_ipa_fails_inner_product() {
        let (verifier, mut proof, commitment) = prove(8, 17, 3);
        proof.inner_product_proof.b += Scalar::ONE;

        let outcome = verifier.verify(&commitment, &proof).unwrap();
        assert_eq!(
            outcome.rejection().map(|r| r.reason),
            Some(RejectionReason::InnerProduct)
        );
        assert_eq!(
            outcome.rejection().map(|r| r.stage),
            Some(VerificationStage::IpaFolded)
        );
    }

    #[test]
    fn test_tampered_mu_fails_inner_product() {
        let (verifier, mut proof, commitment) = prove(16, 9999, 4);
        proof.mu += Scalar::ONE;

        let outcome = verifier.verify(&commitment, &proof).unwrap();
        assert_eq!(
            outcome.rejection().map(|r| r.reason),
            Some(RejectionReason::InnerProduct)
        );
    }

    #[test]
    fn test_tampered_t_hat_fails_main_equation() {
        let (verifier, mut proof, commitment) = prove(16, 9999, 5);
        proof.t_hat += Scalar::ONE;

        let outcome = verifier.verify(&commitment, &proof).unwrap();
        assert_eq!(
            outcome.rejection().map(|r| r.reason),
            Some(RejectionReason::MainEquation)
        );
    }

    #[test]
    fn test_non_power_of_two_bit_length() {
        let (verifier, proof, commitment) = prove(5, 31, 6);
        assert_eq!(proof.num_rounds(), 3);
        assert!(verifier.verify(&commitment, &proof).unwrap().is_verified());
    }

    #[test]
    fn test_wrong_round_count_is_structure_error() {
        let (verifier, mut proof, commitment) = prove(8, 1, 7);
        proof.inner_product_proof.l_vec.pop();
        proof.inner_product_proof.r_vec.pop();

        assert!(matches!(
            verifier.verify(&commitment, &proof),
            Err(RangeProofError::InvalidProofStructure(_))
        ));
    }

    #[test]
    fn test_other_domain_rejects() {
        let (verifier, proof, commitment) = prove(8, 77, 8);
        let other = RangeVerifier::new(GeneratorSet::shared(8).unwrap(), b"other_domain");

        assert!(verifier.verify(&commitment, &proof).unwrap().is_verified());
        assert!(!other.verify(&commitment, &proof).unwrap().is_verified());
    }

    #[test]
    fn test_stage_order() {
        assert!(VerificationStage::Init < VerificationStage::ChallengesDerived);
        assert_eq!(VerificationStage::IpaFolded.next(), Some(VerificationStage::IpaChecked));
        assert_eq!(VerificationStage::IpaChecked.next(), None);
    }

    #[test]
    fn test_trace_serializes() {
        let (verifier, proof, commitment) = prove(4, 3, 9);
        let (_, trace) = verifier.verify_with_trace(&commitment, &proof).unwrap();
        let json = serde_json::to_value(&trace).unwrap();
        assert_eq!(json["main_equation_holds"], serde_json::Value::Bool(true));
        assert_eq!(json["y"].as_str().unwrap().len(), 64);
    }
}
