//! # Bulletproofs Range Proofs
//!
//! Non-interactive range proofs over secp256k1. A prover convinces a
//! verifier that a Pedersen commitment `V = v*G + gamma*H` opens to a value
//! in `[0, 2^n)` without revealing `v`. Proofs are `4*33 + 5*32 + 66*⌈log2 n⌉`
//! bytes.
//!
//! ## Mathematical Background
//!
//! 1. **Bit Decomposition**: `v = Σ a_L[i] * 2^i` with `a_R = a_L - 1`
//! 2. **Bit Commitments**: `A` commits to `(a_L, a_R)`, `S` to blinding vectors
//! 3. **Polynomial Identity**: challenges `y, z` collapse the bit constraints
//!    into `t(X) = <l(X), r(X)>`, whose constant term is `z²v + delta(y, z)`
//! 4. **Evaluation**: `T1`, `T2` commit to `t1`, `t2`; challenge `x` fixes the
//!    evaluation point
//! 5. **Inner Product Argument**: proves `<l(x), r(x)> = t_hat` in
//!    `⌈log2 n⌉` rounds
//!
//! ## Usage
//!
//! ```rust,no_run
//! use rangeproof::{EngineConfig, RangeProofEngine, ValueRange};
//!
//! // Prove that a 32-bit reading is in range
//! let engine = RangeProofEngine::new(EngineConfig::default()).unwrap();
//! let range = ValueRange::full(32).unwrap();
//!
//! let bundle = engine.generate_proof(206794, range).unwrap();
//! let json = bundle.to_json().unwrap();
//!
//! // Any engine with the same configuration can verify
//! let verifier = RangeProofEngine::new(EngineConfig::default()).unwrap();
//! assert!(verifier.verify_json(&json).unwrap().is_verified());
//!
//! // Fractional readings are proven in fixed point: 1.5 in [0, 3] becomes 1500 in [0, 3000]
//! let reading = engine
//!     .generate_proof_for_reading(1.5, &rangeproof::SensorScale::new(0.0, 3.0))
//!     .unwrap();
//! assert_eq!(reading.range_max, 3000);
//! ```

pub mod config;
pub mod engine;
pub mod polynomial;
pub mod proof;
pub mod prover;
pub mod verifier;
pub mod wire;


pub use config::*;
pub use engine::*;
pub use polynomial::delta;
pub use proof::*;
pub use prover::*;
pub use verifier::*;
pub use wire::*;

pub use rangeproof_core::{GeneratorManifest, GeneratorSet, GroupElement, RangeProofError, RangeProofResult};
pub use rangeproof_ipa::InnerProductProof;
