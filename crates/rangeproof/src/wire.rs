//! JSON wire format exchanged with verification services
//!
//! ```json
//! {
//!   "commitment": "02...",
//!   "proof": {
//!     "A": "..", "S": "..", "T1": "..", "T2": "..",
//!     "tau_x": "..", "mu": "..", "t": "..",
//!     "inner_product_proof": { "L": [".."], "R": [".."], "a": "..", "b": ".." }
//!   },
//!   "range_min": 0,
//!   "range_max": 4294967295
//! }
//! ```

use crate::{max_value, RangeProof};
use rangeproof_core::{GroupElement, RangeProofError, RangeProofResult, MAX_BIT_LENGTH};
use serde::{Deserialize, Serialize};

/// Claimed value range `[min, max]`, both ends inclusive.
///
/// The proof itself attests `[0, 2^n)`; the range is metadata that must be
/// consistent with the proof width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueRange {
    pub min: u64,
    pub max: u64,
}

impl ValueRange {
    pub fn new(min: u64, max: u64) -> Self {
        Self { min, max }
    }

    /// `[0, 2^bit_length - 1]`
    pub fn full(bit_length: u32) -> RangeProofResult<Self> {
        if bit_length == 0 || bit_length > MAX_BIT_LENGTH {
            return Err(RangeProofError::UnsupportedBitLength(bit_length));
        }
        Ok(Self::new(0, max_value(bit_length)))
    }

    /// Check `min < max <= 2^bit_length - 1`
    pub fn validate(&self, bit_length: u32) -> RangeProofResult<()> {
        if self.min >= self.max || self.max > max_value(bit_length) {
            return Err(RangeProofError::InvalidRange {
                min: self.min,
                max: self.max,
                bits: bit_length,
            });
        }
        Ok(())
    }

    pub fn contains(&self, value: u64) -> bool {
        self.min <= value && value <= self.max
    }
}

/// Readings are proven to three decimal places unless a scale says otherwise
pub const DEFAULT_SCALE_FACTOR: u64 = 1000;

// 2^64, the first f64 that no longer fits in a u64
const U64_LIMIT: f64 = 18_446_744_073_709_551_616.0;

fn default_scale_factor() -> u64 {
    DEFAULT_SCALE_FACTOR
}

/// Fixed-point encoding of a bounded sensor reading.
///
/// A reading `r` in `[min, max]` is proven as the integer
/// `round((r - min) * factor)`, so the wire range is
/// `[0, round((max - min) * factor)]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensorScale {
    pub min: f64,
    pub max: f64,
    #[serde(default = "default_scale_factor")]
    pub factor: u64,
}

impl SensorScale {
    pub fn new(min: f64, max: f64) -> Self {
        Self {
            min,
            max,
            factor: DEFAULT_SCALE_FACTOR,
        }
    }

    pub fn with_factor(mut self, factor: u64) -> Self {
        self.factor = factor;
        self
    }

    fn check(&self) -> RangeProofResult<()> {
        if !self.min.is_finite() || !self.max.is_finite() || self.min >= self.max {
            return Err(RangeProofError::InvalidConfig(format!(
                "sensor scale [{}, {}] is not a finite interval",
                self.min, self.max
            )));
        }
        if self.factor == 0 {
            return Err(RangeProofError::InvalidConfig(
                "sensor scale factor must be positive".to_string(),
            ));
        }
        Ok(())
    }

    fn scaled(&self, reading: f64) -> f64 {
        ((reading - self.min) * self.factor as f64).round()
    }

    /// Normalised wire range for this scale, checked against `bit_length`
    pub fn value_range(&self, bit_length: u32) -> RangeProofResult<ValueRange> {
        self.check()?;
        let scaled_max = self.scaled(self.max);
        if scaled_max >= U64_LIMIT {
            return Err(RangeProofError::InvalidRange {
                min: 0,
                max: u64::MAX,
                bits: bit_length,
            });
        }
        let range = ValueRange::new(0, scaled_max as u64);
        range.validate(bit_length)?;
        Ok(range)
    }

    /// Integer the reading is proven as
    pub fn encode(&self, reading: f64) -> RangeProofResult<u64> {
        self.check()?;
        if !reading.is_finite() || reading < self.min || reading > self.max {
            return Err(RangeProofError::InvalidReading(format!(
                "{reading} is outside [{}, {}]",
                self.min, self.max
            )));
        }
        let scaled = self.scaled(reading);
        if scaled >= U64_LIMIT {
            return Err(RangeProofError::InvalidReading(format!(
                "{reading} does not fit in 64 bits at factor {}",
                self.factor
            )));
        }
        Ok(scaled as u64)
    }
}

/// A proof with its commitment and claimed range, as sent over the wire
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofBundle {
    pub commitment: GroupElement,
    pub proof: RangeProof,
    pub range_min: u64,
    pub range_max: u64,
}

impl ProofBundle {
    pub fn new(commitment: GroupElement, proof: RangeProof, range: ValueRange) -> Self {
        Self {
            commitment,
            proof,
            range_min: range.min,
            range_max: range.max,
        }
    }

    pub fn range(&self) -> ValueRange {
        ValueRange::new(self.range_min, self.range_max)
    }

    pub fn to_json(&self) -> RangeProofResult<String> {
        serde_json::to_string(self).map_err(|e| RangeProofError::InvalidProofStructure(e.to_string()))
    }

    /// Parse a bundle; malformed JSON, hex, points or scalars are all
    /// `InvalidProofStructure`
    pub fn from_json(json: &str) -> RangeProofResult<Self> {
        serde_json::from_str(json).map_err(|e| RangeProofError::InvalidProofStructure(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_range() {
        assert_eq!(ValueRange::full(8).unwrap(), ValueRange::new(0, 255));
        assert_eq!(ValueRange::full(64).unwrap().max, u64::MAX);
        assert!(ValueRange::full(0).is_err());
    }

    #[test]
    fn test_range_validation() {
        assert!(ValueRange::new(0, 255).validate(8).is_ok());
        assert!(ValueRange::new(10, 20).validate(8).is_ok());
        assert_eq!(
            ValueRange::new(0, 256).validate(8),
            Err(RangeProofError::InvalidRange { min: 0, max: 256, bits: 8 })
        );
        assert!(ValueRange::new(5, 5).validate(8).is_err());
        assert!(ValueRange::new(6, 5).validate(8).is_err());
    }

    #[test]
    fn test_range_contains() {
        let range = ValueRange::new(10, 20);
        assert!(range.contains(10));
        assert!(range.contains(20));
        assert!(!range.contains(9));
        assert!(!range.contains(21));
    }

    #[test]
    fn test_sensor_scale_encoding() {
        let scale = SensorScale::new(0.0, 3.0);
        assert_eq!(scale.encode(1.5).unwrap(), 1500);
        assert_eq!(scale.encode(0.0).unwrap(), 0);
        assert_eq!(scale.encode(3.0).unwrap(), 3000);
        assert_eq!(scale.value_range(32).unwrap(), ValueRange::new(0, 3000));
    }

    #[test]
    fn test_sensor_scale_negative_minimum() {
        let scale = SensorScale::new(-100.0, 100.0);
        assert_eq!(scale.encode(1.261).unwrap(), 101_261);
        assert_eq!(scale.encode(-5.261).unwrap(), 94_739);
        assert_eq!(scale.value_range(32).unwrap(), ValueRange::new(0, 200_000));
    }

    #[test]
    fn test_sensor_scale_rejects_bad_readings() {
        let scale = SensorScale::new(0.0, 3.0);
        for reading in [f64::NAN, f64::INFINITY, -0.001, 3.5] {
            assert!(matches!(
                scale.encode(reading),
                Err(RangeProofError::InvalidReading(_))
            ));
        }
    }

    #[test]
    fn test_sensor_scale_rejects_bad_bounds() {
        for scale in [
            SensorScale::new(3.0, 3.0),
            SensorScale::new(f64::NAN, 3.0),
            SensorScale::new(0.0, 3.0).with_factor(0),
        ] {
            assert!(matches!(
                scale.value_range(32),
                Err(RangeProofError::InvalidConfig(_))
            ));
        }
    }

    #[test]
    fn test_sensor_scale_must_fit_bit_length() {
        assert_eq!(
            SensorScale::new(0.0, 3.0).value_range(8),
            Err(RangeProofError::InvalidRange { min: 0, max: 3000, bits: 8 })
        );
        assert!(matches!(
            SensorScale::new(0.0, 1e300).value_range(64),
            Err(RangeProofError::InvalidRange { .. })
        ));
    }

    #[test]
    fn test_sensor_scale_json_defaults_factor() {
        let scale: SensorScale = serde_json::from_str(r#"{"min": -1.5, "max": 2.5}"#).unwrap();
        assert_eq!(scale, SensorScale::new(-1.5, 2.5));
        assert_eq!(scale.factor, 1000);
    }

    #[test]
    fn test_from_json_rejects_malformed() {
        assert!(matches!(
            ProofBundle::from_json("{not json"),
            Err(RangeProofError::InvalidProofStructure(_))
        ));
        assert!(matches!(
            ProofBundle::from_json(r#"{"commitment": "00", "range_min": 0, "range_max": 1}"#),
            Err(RangeProofError::InvalidProofStructure(_))
        ));
    }
}
