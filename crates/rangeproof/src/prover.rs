//! Range proof prover implementation

use crate::{
    polynomial::{left_polynomial, right_polynomial, InnerProductPolynomial},
    RangeProof,
};
use rangeproof_core::{
    pedersen_commit, scalar_inverse, utils::*, vector_commit, GeneratorSet, GroupElement,
    RangeProofError, RangeProofResult, Transcript,
};
use rangeproof_ipa::InnerProductProver;
use k256::{elliptic_curve::Field, Scalar};
use rand_core::{CryptoRng, RngCore};
use std::sync::Arc;
use zeroize::Zeroizing;

/// Largest value representable in `bit_length` bits
pub fn max_value(bit_length: u32) -> u64 {
    if bit_length >= 64 {
        u64::MAX
    } else {
        (1u64 << bit_length) - 1
    }
}

fn random_scalar<R: RngCore + CryptoRng>(rng: &mut R) -> Zeroizing<Scalar> {
    Zeroizing::new(Scalar::random(&mut *rng))
}

fn random_vector<R: RngCore + CryptoRng>(rng: &mut R, n: usize) -> Zeroizing<Vec<Scalar>> {
    Zeroizing::new((0..n).map(|_| Scalar::random(&mut *rng)).collect())
}

/// Prover for generating range proofs
#[derive(Debug, Clone)]
pub struct RangeProver {
    generators: Arc<GeneratorSet>,
    domain: Vec<u8>,
}

impl RangeProver {
    /// Create a range prover with existing generators and a transcript domain
    pub fn new(generators: Arc<GeneratorSet>, domain: impl AsRef<[u8]>) -> Self {
        Self {
            generators,
            domain: domain.as_ref().to_vec(),
        }
    }

    /// Get the generator set used by this prover
    pub fn generators(&self) -> &GeneratorSet {
        &self.generators
    }

    pub fn bit_length(&self) -> u32 {
        self.generators.bit_length()
    }

    /// Prove that `value` lies in `[0, 2^bit_length)`.
    ///
    /// Returns the proof and the Pedersen commitment `V = v*G + gamma*H`.
    /// Every blinding scalar is drawn fresh from `rng` and wiped on return.
    #[tracing::instrument(skip_all, name = "range_prove", fields(bits = self.bit_length()))]
    pub fn prove<R: RngCore + CryptoRng>(
        &self,
        value: u64,
        rng: &mut R,
    ) -> RangeProofResult<(RangeProof, GroupElement)> {
        let bits = self.bit_length();
        if value > max_value(bits) {
            return Err(RangeProofError::ValueOutOfRange { value, bits });
        }

        let gens = &self.generators;
        let n = bits as usize;
        let g_vec = &gens.g_vec()[..n];
        let h_vec = &gens.h_vec()[..n];

        // Bit decomposition
        let a_l = Zeroizing::new(bit_decomposition(value, n));
        let a_r = Zeroizing::new(a_l.iter().map(|bit| *bit - Scalar::ONE).collect::<Vec<_>>());

        let alpha = random_scalar(rng);
        let rho = random_scalar(rng);
        let gamma = random_scalar(rng);
        let s_l = random_vector(rng, n);
        let s_r = random_vector(rng, n);

        let v = Zeroizing::new(Scalar::from(value));
        let commitment = pedersen_commit(gens, &v, &gamma);

        // A = alpha*H + <a_L, G> + <a_R, H>
        let a = gens.h() * *alpha + vector_commit(&a_l, g_vec, &a_r, h_vec)?;
        // S = rho*H + <s_L, G> + <s_R, H>
        let s = gens.h() * *rho + vector_commit(&s_l, g_vec, &s_r, h_vec)?;

        let mut transcript = Transcript::new(&self.domain, bits);
        let (y, z) = transcript.bit_commitment_challenges(&a, &s)?;

        let l_poly = left_polynomial(&a_l, &s_l, &z)?;
        let r_poly = right_polynomial(&a_r, &s_r, &y, &z)?;
        let t_poly = InnerProductPolynomial::from_vectors(&l_poly, &r_poly)?;

        let tau1 = random_scalar(rng);
        let tau2 = random_scalar(rng);
        let t1 = pedersen_commit(gens, &t_poly.t1, &tau1);
        let t2 = pedersen_commit(gens, &t_poly.t2, &tau2);

        let x = transcript.polynomial_challenge(&t1, &t2)?;

        let l = l_poly.evaluate(&x)?;
        let r = r_poly.evaluate(&x)?;
        let t_hat = inner_product(&l, &r)?;
        let tau_x = z * z * *gamma + x * *tau1 + x * x * *tau2;
        let mu = *alpha + x * *rho;

        // H'_i = y^{-i} H_i over the padded length
        let padded = gens.vector_length();
        let y_inv_powers = scalar_powers(&scalar_inverse(&y)?, padded);
        let h_prime = gens
            .h_vec()
            .iter()
            .zip(y_inv_powers.iter())
            .map(|(h, y_inv)| *h * *y_inv)
            .collect();

        let ipa_prover = InnerProductProver::with_bases(gens.g_vec().to_vec(), h_prime, gens.u())?;
        let inner_product_proof = ipa_prover.prove(&mut transcript, &l, &r)?;

        tracing::debug!(rounds = inner_product_proof.num_rounds(), "range proof generated");

        let proof = RangeProof {
            a,
            s,
            t1,
            t2,
            tau_x,
            mu,
            t_hat,
            inner_product_proof,
        };
        Ok((proof, commitment))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{RangeVerifier, VerificationOutcome};
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn setup(bits: u32) -> (RangeProver, RangeVerifier) {
        let generators = GeneratorSet::shared(bits).unwrap();
        (
            RangeProver::new(Arc::clone(&generators), b"test"),
            RangeVerifier::new(generators, b"test"),
        )
    }

    #[test]
    fn test_range_proof_roundtrip() {
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        let (prover, verifier) = setup(8);

        let (proof, commitment) = prover.prove(42, &mut rng).unwrap();
        assert_eq!(proof.num_rounds(), 3);
        assert_eq!(
            verifier.verify(&commitment, &proof).unwrap(),
            VerificationOutcome::Verified
        );
    }

    #[test]
    fn test_range_proof_different_bit_lengths() {
        let mut rng = ChaCha20Rng::seed_from_u64(2);

        let test_cases = [(0u64, 1u32), (1, 1), (3, 2), (5, 3), (15, 4), (255, 8), (1023, 10)];

        for (value, bits) in test_cases {
            let (prover, verifier) = setup(bits);
            let (proof, commitment) = prover.prove(value, &mut rng).unwrap();
            assert!(
                verifier.verify(&commitment, &proof).unwrap().is_verified(),
                "Failed for value {} with {} bits",
                value,
                bits
            );
        }
    }

    #[test]
    fn test_range_proof_64_bits() {
        let mut rng = ChaCha20Rng::seed_from_u64(3);
        let (prover, verifier) = setup(64);

        let (proof, commitment) = prover.prove(u64::MAX, &mut rng).unwrap();
        assert_eq!(proof.num_rounds(), 6);
        assert!(verifier.verify(&commitment, &proof).unwrap().is_verified());
    }

    #[test]
    fn test_range_proof_fails_for_out_of_range_value() {
        let mut rng = ChaCha20Rng::seed_from_u64(4);
        let (prover, _) = setup(8);

        assert_eq!(
            prover.prove(256, &mut rng).unwrap_err(),
            RangeProofError::ValueOutOfRange { value: 256, bits: 8 }
        );
    }

    #[test]
    fn test_fresh_blindings_per_proof() {
        let mut rng = ChaCha20Rng::seed_from_u64(5);
        let (prover, _) = setup(8);

        let (proof1, commitment1) = prover.prove(42, &mut rng).unwrap();
        let (proof2, commitment2) = prover.prove(42, &mut rng).unwrap();
        assert_ne!(commitment1, commitment2);
        assert_ne!(proof1.to_bytes(), proof2.to_bytes());
    }

    #[test]
    fn test_same_seed_same_proof() {
        let (prover, _) = setup(16);
        let first = prover.prove(1000, &mut ChaCha20Rng::seed_from_u64(6)).unwrap();
        let second = prover.prove(1000, &mut ChaCha20Rng::seed_from_u64(6)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_max_value() {
        assert_eq!(max_value(1), 1);
        assert_eq!(max_value(8), 255);
        assert_eq!(max_value(32), u32::MAX as u64);
        assert_eq!(max_value(64), u64::MAX);
    }
}
