//! Range proof structure and serialization

use rangeproof_core::{
    scalar_from_bytes, scalar_hex, scalar_to_bytes, GroupElement, RangeProofError,
    RangeProofResult, POINT_LENGTH, SCALAR_LENGTH,
};
use rangeproof_ipa::InnerProductProof;
use k256::Scalar;
use serde::{Deserialize, Serialize};

/// `A || S || T1 || T2 || tau_x || mu || t`
const HEADER_LENGTH: usize = 4 * POINT_LENGTH + 3 * SCALAR_LENGTH;

/// A range proof that a committed value lies in [0, 2^n).
///
/// The commitment itself travels separately; the proof carries no secret.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeProof {
    /// Commitment to the bit vectors `a_L`, `a_R`
    #[serde(rename = "A")]
    pub a: GroupElement,
    /// Commitment to the blinding vectors `s_L`, `s_R`
    #[serde(rename = "S")]
    pub s: GroupElement,
    /// Commitment to `t1`
    #[serde(rename = "T1")]
    pub t1: GroupElement,
    /// Commitment to `t2`
    #[serde(rename = "T2")]
    pub t2: GroupElement,
    /// Blinding of `t_hat`
    #[serde(with = "scalar_hex")]
    pub tau_x: Scalar,
    /// Combined blinding of `A` and `S`
    #[serde(with = "scalar_hex")]
    pub mu: Scalar,
    /// `t(x) = <l(x), r(x)>`
    #[serde(rename = "t", with = "scalar_hex")]
    pub t_hat: Scalar,
    pub inner_product_proof: InnerProductProof,
}

impl RangeProof {
    /// Number of inner product folding rounds
    pub fn num_rounds(&self) -> usize {
        self.inner_product_proof.num_rounds()
    }

    /// Get proof size in bytes
    pub fn size_bytes(&self) -> usize {
        HEADER_LENGTH + self.inner_product_proof.size_bytes()
    }

    /// Serialize the proof to bytes
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.size_bytes());
        for point in [&self.a, &self.s, &self.t1, &self.t2] {
            bytes.extend_from_slice(&point.to_bytes());
        }
        for scalar in [&self.tau_x, &self.mu, &self.t_hat] {
            bytes.extend_from_slice(&scalar_to_bytes(scalar));
        }
        self.inner_product_proof.write_bytes(&mut bytes);
        bytes
    }

    /// Deserialize proof from bytes
    pub fn from_bytes(bytes: &[u8]) -> RangeProofResult<Self> {
        if bytes.len() < HEADER_LENGTH {
            return Err(RangeProofError::InvalidProofStructure(format!(
                "range proof needs at least {} bytes, got {}",
                HEADER_LENGTH,
                bytes.len()
            )));
        }

        let (points, rest) = bytes.split_at(4 * POINT_LENGTH);
        let point_at = |i: usize| GroupElement::from_bytes(&points[i * POINT_LENGTH..(i + 1) * POINT_LENGTH]);
        let a = point_at(0)?;
        let s = point_at(1)?;
        let t1 = point_at(2)?;
        let t2 = point_at(3)?;

        let (scalars, ipa_bytes) = rest.split_at(3 * SCALAR_LENGTH);
        let tau_x = scalar_from_bytes(&scalars[..SCALAR_LENGTH])?;
        let mu = scalar_from_bytes(&scalars[SCALAR_LENGTH..2 * SCALAR_LENGTH])?;
        let t_hat = scalar_from_bytes(&scalars[2 * SCALAR_LENGTH..])?;

        let inner_product_proof = InnerProductProof::from_bytes(ipa_bytes)?;

        Ok(Self {
            a,
            s,
            t1,
            t2,
            tau_x,
            mu,
            t_hat,
            inner_product_proof,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_proof(rounds: usize) -> RangeProof {
        let g = GroupElement::generator();
        let point = |k: u64| g * Scalar::from(k);
        RangeProof {
            a: point(2),
            s: point(3),
            t1: point(4),
            t2: point(5),
            tau_x: Scalar::from(6u64),
            mu: Scalar::from(7u64),
            t_hat: Scalar::from(8u64),
            inner_product_proof: InnerProductProof::new(
                (0..rounds).map(|i| point(10 + i as u64)).collect(),
                (0..rounds).map(|i| point(20 + i as u64)).collect(),
                Scalar::from(9u64),
                Scalar::from(10u64),
            ),
        }
    }

    #[test]
    fn test_proof_size_for_32_bits() {
        // 4*33 + 3*32 + 5*66 + 2*32
        let proof = sample_proof(5);
        assert_eq!(proof.size_bytes(), 622);
        assert_eq!(proof.to_bytes().len(), 622);
    }

    #[test]
    fn test_bytes_round_trip() {
        let proof = sample_proof(3);
        let parsed = RangeProof::from_bytes(&proof.to_bytes()).unwrap();
        assert_eq!(parsed, proof);
        assert_eq!(parsed.num_rounds(), 3);
    }

    #[test]
    fn test_from_bytes_rejects_truncation() {
        let bytes = sample_proof(2).to_bytes();
        assert!(matches!(
            RangeProof::from_bytes(&bytes[..bytes.len() - 3]),
            Err(RangeProofError::InvalidProofStructure(_))
        ));
        assert!(RangeProof::from_bytes(&bytes[..100]).is_err());
    }

    #[test]
    fn test_from_bytes_rejects_bad_point() {
        let mut bytes = sample_proof(1).to_bytes();
        bytes[0] = 0x05;
        assert!(matches!(
            RangeProof::from_bytes(&bytes),
            Err(RangeProofError::Decode(_))
        ));
    }

    #[test]
    fn test_json_field_names() {
        let json = serde_json::to_value(sample_proof(1)).unwrap();
        for field in ["A", "S", "T1", "T2", "tau_x", "mu", "t", "inner_product_proof"] {
            assert!(json.get(field).is_some(), "missing {field}");
        }
        assert!(json["inner_product_proof"]["L"].is_array());

        let parsed: RangeProof = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, sample_proof(1));
    }
}
