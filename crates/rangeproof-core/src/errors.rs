//! Error types for range proof operations

use thiserror::Error;

/// Failure to decode a wire-encoded point or scalar
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Wrong length, unknown tag, bad hex or non-canonical scalar
    #[error("Invalid encoding: {0}")]
    InvalidEncoding(String),

    /// Well-formed encoding whose x-coordinate has no point on the curve
    #[error("Point is not on the curve")]
    PointNotOnCurve,
}

/// Main error type for range proof operations
///
/// A proof that fails to verify is not an error: see `VerificationOutcome`
/// in the `rangeproof` crate.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RangeProofError {
    /// The value to prove does not fit the requested range
    #[error("Value {value} is not in range [0, 2^{bits})")]
    ValueOutOfRange { value: u64, bits: u32 },

    /// Sensor reading is not finite or lies outside its scale
    #[error("Invalid sensor reading: {0}")]
    InvalidReading(String),

    /// Range metadata is inconsistent with the proof bit length
    #[error("Invalid range [{min}, {max}] for a {bits}-bit proof")]
    InvalidRange { min: u64, max: u64, bits: u32 },

    /// Bit length outside 1..=64
    #[error("Unsupported bit length: {0}")]
    UnsupportedBitLength(u32),

    /// Malformed point or scalar
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// Proof has the wrong shape (missing fields, wrong round count, bad length)
    #[error("Invalid proof structure: {0}")]
    InvalidProofStructure(String),

    /// Vector length mismatch
    #[error("Vector length mismatch: expected {expected}, got {actual}")]
    VectorLengthMismatch { expected: usize, actual: usize },

    /// Insufficient generators
    #[error("Insufficient generators: need {needed}, have {available}")]
    InsufficientGenerators { needed: usize, available: usize },

    /// Rejected engine configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Generator derivation or transcript ordering defect; never retried
    #[error("Internal arithmetic error: {0}")]
    InternalArithmetic(String),
}

/// Result type for range proof operations
pub type RangeProofResult<T> = Result<T, RangeProofError>;
