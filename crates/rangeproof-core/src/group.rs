//! Group operations and point utilities

use crate::{DecodeError, RangeProofError, RangeProofResult};
use k256::{
    elliptic_curve::{
        ops::{LinearCombinationExt, Reduce},
        sec1::{FromEncodedPoint, ToEncodedPoint},
    },
    AffinePoint, EncodedPoint, FieldBytes, ProjectivePoint, Scalar, U256,
};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use subtle::{Choice, ConstantTimeEq};

/// Length of a compressed SEC1 point
pub const POINT_LENGTH: usize = 33;

/// Length of a big-endian scalar
pub const SCALAR_LENGTH: usize = 32;

/// A point on secp256k1 with additional utility methods
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupElement(pub ProjectivePoint);

impl GroupElement {
    /// Identity element
    pub fn identity() -> Self {
        Self(ProjectivePoint::IDENTITY)
    }

    /// The standard secp256k1 base point
    pub fn generator() -> Self {
        Self(ProjectivePoint::GENERATOR)
    }

    pub fn is_identity(&self) -> bool {
        self.0 == ProjectivePoint::IDENTITY
    }

    /// Compressed SEC1 encoding.
    ///
    /// The identity has no SEC1 compressed form; it is written as 33 zero
    /// bytes so that every encoding has the same length.
    pub fn to_bytes(&self) -> [u8; POINT_LENGTH] {
        let mut out = [0u8; POINT_LENGTH];
        if self.is_identity() {
            return out;
        }
        let encoded = self.0.to_affine().to_encoded_point(true);
        out.copy_from_slice(encoded.as_bytes());
        out
    }

    /// Decode a compressed SEC1 point
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        if bytes.len() != POINT_LENGTH {
            return Err(DecodeError::InvalidEncoding(format!(
                "expected {} point bytes, got {}",
                POINT_LENGTH,
                bytes.len()
            )));
        }
        if bytes.iter().all(|b| *b == 0) {
            return Ok(Self::identity());
        }
        if bytes[0] != 0x02 && bytes[0] != 0x03 {
            return Err(DecodeError::InvalidEncoding(format!(
                "unknown point tag 0x{:02x}",
                bytes[0]
            )));
        }

        let encoded = EncodedPoint::from_bytes(bytes)
            .map_err(|e| DecodeError::InvalidEncoding(e.to_string()))?;
        let affine: Option<AffinePoint> = AffinePoint::from_encoded_point(&encoded).into();
        affine
            .map(|p| Self(ProjectivePoint::from(p)))
            .ok_or(DecodeError::PointNotOnCurve)
    }

    /// Uppercase hex of the compressed encoding
    pub fn to_hex(&self) -> String {
        hex::encode_upper(self.to_bytes())
    }

    /// Decode from hex (either case)
    pub fn from_hex(s: &str) -> Result<Self, DecodeError> {
        let bytes = hex::decode(s.trim())
            .map_err(|e| DecodeError::InvalidEncoding(format!("bad point hex: {e}")))?;
        Self::from_bytes(&bytes)
    }

    /// Perform multi-scalar multiplication
    pub fn multiscalar_mul<I, J>(scalars: I, points: J) -> Self
    where
        I: IntoIterator<Item = Scalar>,
        J: IntoIterator<Item = GroupElement>,
    {
        let terms: Vec<(ProjectivePoint, Scalar)> = points
            .into_iter()
            .map(|p| p.0)
            .zip(scalars)
            .collect();
        Self(ProjectivePoint::lincomb_ext(terms.as_slice()))
    }
}

impl Default for GroupElement {
    fn default() -> Self {
        Self::identity()
    }
}

impl ConstantTimeEq for GroupElement {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.0.ct_eq(&other.0)
    }
}

impl std::ops::Add for GroupElement {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(self.0 + other.0)
    }
}

impl std::ops::Sub for GroupElement {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self(self.0 - other.0)
    }
}

impl std::ops::Mul<Scalar> for GroupElement {
    type Output = Self;

    fn mul(self, scalar: Scalar) -> Self {
        Self(self.0 * scalar)
    }
}

impl std::ops::Neg for GroupElement {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl From<ProjectivePoint> for GroupElement {
    fn from(point: ProjectivePoint) -> Self {
        Self(point)
    }
}

impl From<GroupElement> for ProjectivePoint {
    fn from(element: GroupElement) -> Self {
        element.0
    }
}

impl Serialize for GroupElement {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for GroupElement {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// Reduce a 32-byte big-endian digest modulo the group order
pub fn scalar_from_hash(digest: &[u8; 32]) -> Scalar {
    <Scalar as Reduce<U256>>::reduce_bytes(&FieldBytes::from(*digest))
}

/// Multiplicative inverse; zero has none and signals a derivation defect
pub fn scalar_inverse(scalar: &Scalar) -> RangeProofResult<Scalar> {
    Option::<Scalar>::from(scalar.invert())
        .ok_or_else(|| RangeProofError::InternalArithmetic("inversion of zero scalar".to_string()))
}
