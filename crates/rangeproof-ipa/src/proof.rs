//! Inner Product Argument proof structure

use rangeproof_core::{
    scalar_from_bytes, scalar_hex, scalar_to_bytes, utils::folding_rounds, GroupElement,
    RangeProofError, RangeProofResult, POINT_LENGTH, SCALAR_LENGTH,
};
use k256::Scalar;
use serde::{Deserialize, Serialize};

/// Bytes per folding round (`L || R`)
pub const ROUND_LENGTH: usize = 2 * POINT_LENGTH;

/// An inner product argument proof
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InnerProductProof {
    /// L values from each folding round (log_2(n) elements)
    #[serde(rename = "L")]
    pub l_vec: Vec<GroupElement>,
    /// R values from each folding round (log_2(n) elements)
    #[serde(rename = "R")]
    pub r_vec: Vec<GroupElement>,
    /// Final scalar value a
    #[serde(with = "scalar_hex")]
    pub a: Scalar,
    /// Final scalar value b
    #[serde(with = "scalar_hex")]
    pub b: Scalar,
}

impl InnerProductProof {
    /// Create a new inner product proof
    pub fn new(l_vec: Vec<GroupElement>, r_vec: Vec<GroupElement>, a: Scalar, b: Scalar) -> Self {
        Self { l_vec, r_vec, a, b }
    }

    /// Get the number of folding rounds
    pub fn num_rounds(&self) -> usize {
        self.l_vec.len()
    }

    /// Validate proof structure
    pub fn validate_structure(&self) -> RangeProofResult<()> {
        if self.l_vec.len() != self.r_vec.len() {
            return Err(RangeProofError::InvalidProofStructure(format!(
                "L has {} entries but R has {}",
                self.l_vec.len(),
                self.r_vec.len()
            )));
        }

        // Empty L/R vectors are valid for vectors of length 1
        Ok(())
    }

    /// Check that the proof folds a vector of length `n` (padded to a power of two)
    pub fn check_rounds(&self, n: usize) -> RangeProofResult<()> {
        self.validate_structure()?;
        let expected = folding_rounds(n);
        if self.num_rounds() != expected {
            return Err(RangeProofError::InvalidProofStructure(format!(
                "expected {} folding rounds for vector length {}, got {}",
                expected,
                n,
                self.num_rounds()
            )));
        }
        Ok(())
    }

    /// Get proof size in bytes
    pub fn size_bytes(&self) -> usize {
        self.num_rounds() * ROUND_LENGTH + 2 * SCALAR_LENGTH
    }

    /// Append `(L_i || R_i)* || a || b` to `out`
    pub fn write_bytes(&self, out: &mut Vec<u8>) {
        for (l, r) in self.l_vec.iter().zip(self.r_vec.iter()) {
            out.extend_from_slice(&l.to_bytes());
            out.extend_from_slice(&r.to_bytes());
        }
        out.extend_from_slice(&scalar_to_bytes(&self.a));
        out.extend_from_slice(&scalar_to_bytes(&self.b));
    }

    /// Serialize proof to bytes
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut result = Vec::with_capacity(self.size_bytes());
        self.write_bytes(&mut result);
        result
    }

    /// Deserialize proof from bytes; the round count is implied by the length
    pub fn from_bytes(bytes: &[u8]) -> RangeProofResult<Self> {
        let tail = 2 * SCALAR_LENGTH;
        if bytes.len() < tail || (bytes.len() - tail) % ROUND_LENGTH != 0 {
            return Err(RangeProofError::InvalidProofStructure(format!(
                "inner product proof length {} is not 64 + k*{}",
                bytes.len(),
                ROUND_LENGTH
            )));
        }

        let rounds = (bytes.len() - tail) / ROUND_LENGTH;
        let mut l_vec = Vec::with_capacity(rounds);
        let mut r_vec = Vec::with_capacity(rounds);
        for chunk in bytes[..rounds * ROUND_LENGTH].chunks_exact(ROUND_LENGTH) {
            l_vec.push(GroupElement::from_bytes(&chunk[..POINT_LENGTH])?);
            r_vec.push(GroupElement::from_bytes(&chunk[POINT_LENGTH..])?);
        }

        let scalars = &bytes[rounds * ROUND_LENGTH..];
        let a = scalar_from_bytes(&scalars[..SCALAR_LENGTH])?;
        let b = scalar_from_bytes(&scalars[SCALAR_LENGTH..])?;

        Ok(Self { l_vec, r_vec, a, b })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_proof(rounds: usize) -> InnerProductProof {
        let g = GroupElement::generator();
        let l_vec = (0..rounds).map(|i| g * Scalar::from(i as u64 + 2)).collect();
        let r_vec = (0..rounds).map(|i| g * Scalar::from(i as u64 + 100)).collect();
        InnerProductProof::new(l_vec, r_vec, Scalar::from(42u64), Scalar::from(37u64))
    }

    #[test]
    fn test_proof_creation() {
        let proof = sample_proof(1);

        assert_eq!(proof.num_rounds(), 1);
        assert_eq!(proof.a, Scalar::from(42u64));
        assert_eq!(proof.b, Scalar::from(37u64));
        assert!(proof.validate_structure().is_ok());
    }

    #[test]
    fn test_invalid_proof_structure() {
        let mut proof = sample_proof(2);
        proof.r_vec.pop();

        assert!(matches!(
            proof.validate_structure(),
            Err(RangeProofError::InvalidProofStructure(_))
        ));
    }

    #[test]
    fn test_round_count_check() {
        let proof = sample_proof(5);
        assert!(proof.check_rounds(32).is_ok());
        assert!(proof.check_rounds(17).is_ok());
        assert!(proof.check_rounds(64).is_err());
        assert!(proof.check_rounds(16).is_err());
    }

    #[test]
    fn test_proof_size() {
        let proof = sample_proof(3);

        // 3 rounds of (L, R) + 2 scalars = 3*66 + 64 bytes
        assert_eq!(proof.size_bytes(), 262);
        assert_eq!(proof.to_bytes().len(), 262);
    }

    #[test]
    fn test_bytes_round_trip() {
        let proof = sample_proof(4);
        let parsed = InnerProductProof::from_bytes(&proof.to_bytes()).unwrap();
        assert_eq!(parsed, proof);
    }

    #[test]
    fn test_from_bytes_rejects_bad_length() {
        let bytes = sample_proof(2).to_bytes();
        assert!(matches!(
            InnerProductProof::from_bytes(&bytes[..bytes.len() - 1]),
            Err(RangeProofError::InvalidProofStructure(_))
        ));
        assert!(InnerProductProof::from_bytes(&[0u8; 10]).is_err());
    }

    #[test]
    fn test_json_field_names() {
        let json = serde_json::to_value(sample_proof(1)).unwrap();
        assert!(json.get("L").is_some());
        assert!(json.get("R").is_some());
        assert_eq!(
            json["a"].as_str().unwrap(),
            "000000000000000000000000000000000000000000000000000000000000002A"
        );
    }
}
