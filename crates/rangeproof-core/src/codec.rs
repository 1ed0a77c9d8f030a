//! Fixed-width scalar encoding and serde helpers

use crate::{DecodeError, SCALAR_LENGTH};
use k256::{elliptic_curve::ff::PrimeField, FieldBytes, Scalar};

/// Big-endian 32-byte encoding
pub fn scalar_to_bytes(scalar: &Scalar) -> [u8; SCALAR_LENGTH] {
    let mut out = [0u8; SCALAR_LENGTH];
    out.copy_from_slice(&scalar.to_bytes());
    out
}

/// Decode a canonical big-endian scalar (must be below the group order)
pub fn scalar_from_bytes(bytes: &[u8]) -> Result<Scalar, DecodeError> {
    if bytes.len() != SCALAR_LENGTH {
        return Err(DecodeError::InvalidEncoding(format!(
            "expected {} scalar bytes, got {}",
            SCALAR_LENGTH,
            bytes.len()
        )));
    }
    let mut repr = [0u8; SCALAR_LENGTH];
    repr.copy_from_slice(bytes);
    Option::<Scalar>::from(Scalar::from_repr(FieldBytes::from(repr))).ok_or_else(|| {
        DecodeError::InvalidEncoding("scalar is not reduced modulo the group order".to_string())
    })
}

/// Uppercase, zero-padded 64-character hex
pub fn scalar_to_hex(scalar: &Scalar) -> String {
    hex::encode_upper(scalar_to_bytes(scalar))
}

pub fn scalar_from_hex(s: &str) -> Result<Scalar, DecodeError> {
    let bytes = hex::decode(s.trim())
        .map_err(|e| DecodeError::InvalidEncoding(format!("bad scalar hex: {e}")))?;
    scalar_from_bytes(&bytes)
}

/// `#[serde(with = "scalar_hex")]` for `Scalar` fields
pub mod scalar_hex {
    use super::{scalar_from_hex, scalar_to_hex};
    use k256::Scalar;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(scalar: &Scalar, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&scalar_to_hex(scalar))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Scalar, D::Error> {
        let s = String::deserialize(deserializer)?;
        scalar_from_hex(&s).map_err(serde::de::Error::custom)
    }
}
