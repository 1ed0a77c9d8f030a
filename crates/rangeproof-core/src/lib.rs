//! # Range Proof Core
//!
//! Foundational types for Bulletproofs range proofs over secp256k1:
//!
//! - Group and scalar arithmetic with fixed-length SEC1 / big-endian encodings
//! - Deterministic generator derivation and a process-wide generator cache
//! - Pedersen scalar and vector commitments
//! - The Fiat-Shamir transcript that fixes the challenge order
//! - Error types and scalar vector utilities
//!
//! ## Mathematical Background
//!
//! Commitments live in the secp256k1 group with generators:
//! - `G`: the curve base point, used for values
//! - `H`: a hash-derived second base, used for blindings
//! - `{G_i}`, `{H_i}`: per-bit vector generators
//! - `U`: base for the inner product term
//!
//! A value commitment is `V = v*G + gamma*H`; the inner product argument
//! proves knowledge of vectors `l, r` with
//! ```text
//! P = <l, G> + <r, H> + <l, r>*U
//! ```

pub mod codec;
pub mod commitment;
pub mod errors;
pub mod generators;
pub mod group;
pub mod transcript;
pub mod utils;

pub use codec::*;
pub use commitment::*;
pub use errors::*;
pub use generators::*;
pub use group::*;
pub use transcript::*;

/// Re-export commonly used types from k256
pub use k256::{ProjectivePoint, Scalar};
