//! Engine configuration

use rangeproof_core::{RangeProofError, RangeProofResult, MAX_BIT_LENGTH};
use serde::{Deserialize, Serialize};

/// Transcript domain shared with the reference verification service
pub const DEFAULT_DOMAIN: &str = "ICS_BULLETPROOF_VERIFIER_v1";

pub const DEFAULT_BIT_LENGTH: u32 = 32;

/// Longest accepted transcript domain, in bytes
pub const MAX_DOMAIN_LENGTH: usize = 255;

/// Configuration for a range proof engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Proof width in bits (1..=64)
    pub bit_length: u32,
    /// Fiat-Shamir domain tag; prover and verifier must agree
    pub domain: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            bit_length: DEFAULT_BIT_LENGTH,
            domain: DEFAULT_DOMAIN.to_string(),
        }
    }
}

impl EngineConfig {
    pub fn new(bit_length: u32, domain: impl Into<String>) -> Self {
        Self {
            bit_length,
            domain: domain.into(),
        }
    }

    /// Parse a JSON configuration; missing fields take their defaults
    pub fn from_json(json: &str) -> RangeProofResult<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| RangeProofError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates configuration parameters
    pub fn validate(&self) -> RangeProofResult<()> {
        if self.bit_length == 0 || self.bit_length > MAX_BIT_LENGTH {
            return Err(RangeProofError::UnsupportedBitLength(self.bit_length));
        }
        if self.domain.is_empty() {
            return Err(RangeProofError::InvalidConfig(
                "domain must not be empty".to_string(),
            ));
        }
        if self.domain.len() > MAX_DOMAIN_LENGTH {
            return Err(RangeProofError::InvalidConfig(format!(
                "domain is {} bytes, limit is {}",
                self.domain.len(),
                MAX_DOMAIN_LENGTH
            )));
        }
        Ok(())
    }
}
