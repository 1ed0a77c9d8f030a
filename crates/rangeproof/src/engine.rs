//! Collaborator-facing range proof engine
//!
//! One engine serves one `(bit_length, domain)` pair. It is immutable after
//! construction and can be shared across threads; every call owns its own
//! transcript and blinding scalars.

use crate::{
    EngineConfig, ProofBundle, RangeProof, RangeProver, RangeVerifier, SensorScale, ValueRange,
    VerificationOutcome,
};
use rangeproof_core::{GeneratorManifest, GeneratorSet, GroupElement, RangeProofError, RangeProofResult};
use rand::rngs::OsRng;
use rand_core::{CryptoRng, RngCore};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct RangeProofEngine {
    config: EngineConfig,
    generators: Arc<GeneratorSet>,
    prover: RangeProver,
    verifier: RangeVerifier,
}

impl RangeProofEngine {
    /// Validate `config` and attach the shared generator set for its bit length
    pub fn new(config: EngineConfig) -> RangeProofResult<Self> {
        config.validate()?;
        let generators = GeneratorSet::shared(config.bit_length)?;

        tracing::debug!(
            bit_length = config.bit_length,
            domain = %config.domain,
            "range proof engine ready"
        );

        Ok(Self {
            prover: RangeProver::new(Arc::clone(&generators), config.domain.as_bytes()),
            verifier: RangeVerifier::new(Arc::clone(&generators), config.domain.as_bytes()),
            generators,
            config,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn bit_length(&self) -> u32 {
        self.config.bit_length
    }

    /// Prove `value` with blindings from the operating system CSPRNG
    pub fn generate_proof(&self, value: u64, range: ValueRange) -> RangeProofResult<ProofBundle> {
        self.generate_proof_with_rng(value, range, &mut OsRng)
    }

    pub fn generate_proof_with_rng<R: RngCore + CryptoRng>(
        &self,
        value: u64,
        range: ValueRange,
        rng: &mut R,
    ) -> RangeProofResult<ProofBundle> {
        let bits = self.bit_length();
        range.validate(bits)?;
        if !range.contains(value) {
            return Err(RangeProofError::ValueOutOfRange { value, bits });
        }

        let (proof, commitment) = self.prover.prove(value, rng)?;
        Ok(ProofBundle::new(commitment, proof, range))
    }

    /// Prove a fractional sensor reading under `scale`.
    ///
    /// The bundle carries the normalised range `[0, round((max - min) * factor)]`.
    pub fn generate_proof_for_reading(
        &self,
        reading: f64,
        scale: &SensorScale,
    ) -> RangeProofResult<ProofBundle> {
        self.generate_proof_for_reading_with_rng(reading, scale, &mut OsRng)
    }

    pub fn generate_proof_for_reading_with_rng<R: RngCore + CryptoRng>(
        &self,
        reading: f64,
        scale: &SensorScale,
        rng: &mut R,
    ) -> RangeProofResult<ProofBundle> {
        let range = scale.value_range(self.bit_length())?;
        let value = scale.encode(reading)?;
        tracing::debug!(range_max = range.max, factor = scale.factor, "encoded sensor reading");
        self.generate_proof_with_rng(value, range, rng)
    }

    /// Verify `proof` against a hex-encoded commitment
    pub fn verify_proof(
        &self,
        commitment_hex: &str,
        proof: &RangeProof,
        range: ValueRange,
    ) -> RangeProofResult<VerificationOutcome> {
        let commitment = GroupElement::from_hex(commitment_hex)?;
        self.verify_commitment(&commitment, proof, range)
    }

    pub fn verify_bundle(&self, bundle: &ProofBundle) -> RangeProofResult<VerificationOutcome> {
        self.verify_commitment(&bundle.commitment, &bundle.proof, bundle.range())
    }

    /// Parse and verify a JSON [`ProofBundle`]
    pub fn verify_json(&self, json: &str) -> RangeProofResult<VerificationOutcome> {
        self.verify_bundle(&ProofBundle::from_json(json)?)
    }

    fn verify_commitment(
        &self,
        commitment: &GroupElement,
        proof: &RangeProof,
        range: ValueRange,
    ) -> RangeProofResult<VerificationOutcome> {
        range.validate(self.bit_length())?;
        self.verifier.verify(commitment, proof)
    }

    /// Generators in use, for comparison with a remote deployment
    pub fn generator_manifest(&self) -> GeneratorManifest {
        self.generators.manifest()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn engine(bits: u32) -> RangeProofEngine {
        RangeProofEngine::new(EngineConfig::new(bits, "engine_test")).unwrap()
    }

    #[test]
    fn test_generate_and_verify() {
        let engine = engine(16);
        let range = ValueRange::full(16).unwrap();

        let bundle = engine.generate_proof(12345, range).unwrap();
        assert_eq!(engine.verify_bundle(&bundle).unwrap(), VerificationOutcome::Verified);

        let outcome = engine
            .verify_proof(&bundle.commitment.to_hex(), &bundle.proof, range)
            .unwrap();
        assert!(outcome.is_verified());
    }

    #[test]
    fn test_verify_json_round_trip() {
        let engine = engine(8);
        let mut rng = ChaCha20Rng::seed_from_u64(11);
        let bundle = engine
            .generate_proof_with_rng(99, ValueRange::new(10, 200), &mut rng)
            .unwrap();

        let json = bundle.to_json().unwrap();
        assert!(engine.verify_json(&json).unwrap().is_verified());
        assert_eq!(ProofBundle::from_json(&json).unwrap(), bundle);
    }

    #[test]
    fn test_value_outside_claimed_range() {
        let engine = engine(8);
        let result = engine.generate_proof(5, ValueRange::new(10, 200));
        assert_eq!(
            result.unwrap_err(),
            RangeProofError::ValueOutOfRange { value: 5, bits: 8 }
        );
    }

    #[test]
    fn test_range_wider_than_bit_length() {
        let engine = engine(8);
        assert!(matches!(
            engine.generate_proof(5, ValueRange::new(0, 1000)),
            Err(RangeProofError::InvalidRange { .. })
        ));
    }

    #[test]
    fn test_verify_rejects_inconsistent_range() {
        let engine = engine(8);
        let bundle = engine.generate_proof(5, ValueRange::full(8).unwrap()).unwrap();
        let result = engine.verify_proof(&bundle.commitment.to_hex(), &bundle.proof, ValueRange::new(0, 70000));
        assert!(matches!(result, Err(RangeProofError::InvalidRange { .. })));
    }

    #[test]
    fn test_verify_rejects_bad_commitment_hex() {
        let engine = engine(8);
        let bundle = engine.generate_proof(5, ValueRange::full(8).unwrap()).unwrap();
        let result = engine.verify_proof("zz", &bundle.proof, bundle.range());
        assert!(matches!(result, Err(RangeProofError::Decode(_))));
    }

    #[test]
    fn test_sensor_reading_proof() {
        let engine = engine(32);
        let mut rng = ChaCha20Rng::seed_from_u64(15);
        let bundle = engine
            .generate_proof_for_reading_with_rng(1.5, &SensorScale::new(0.0, 3.0), &mut rng)
            .unwrap();

        assert_eq!(bundle.range(), ValueRange::new(0, 3000));
        assert!(engine.verify_bundle(&bundle).unwrap().is_verified());

        // The commitment opens to the scaled integer
        let (_, expected) = engine
            .prover
            .prove(1500, &mut ChaCha20Rng::seed_from_u64(15))
            .unwrap();
        assert_eq!(bundle.commitment, expected);
    }

    #[test]
    fn test_sensor_reading_rejected_before_proving() {
        let engine = engine(16);
        let scale = SensorScale::new(0.0, 3.0);
        assert!(matches!(
            engine.generate_proof_for_reading(f64::NAN, &scale),
            Err(RangeProofError::InvalidReading(_))
        ));
        assert!(matches!(
            engine.generate_proof_for_reading(4.0, &scale),
            Err(RangeProofError::InvalidReading(_))
        ));
        // 100.0 * 1000 does not fit 16 bits
        assert!(matches!(
            engine.generate_proof_for_reading(1.0, &SensorScale::new(0.0, 100.0)),
            Err(RangeProofError::InvalidRange { .. })
        ));
    }

    #[test]
    fn test_invalid_config() {
        assert_eq!(
            RangeProofEngine::new(EngineConfig::new(0, "d")).unwrap_err(),
            RangeProofError::UnsupportedBitLength(0)
        );
        assert!(RangeProofEngine::new(EngineConfig::new(8, "")).is_err());
    }

    #[test]
    fn test_manifest_matches_bit_length() {
        let manifest = engine(32).generator_manifest();
        assert_eq!(manifest.bit_length, 32);
        assert_eq!(manifest.g_vec.len(), 32);
        assert_eq!(manifest.scheme, "HASHED_SHA256_H_BASIS_V2");
    }
}
