//! # Inner Product Argument (IPA)
//!
//! The logarithmic-size core of a Bulletproofs range proof. Given bases
//! `G, H` of length `n` (a power of two) and a base `U`, the prover shows
//! knowledge of vectors `a`, `b` such that:
//!
//! ```text
//! P = <a, G> + <b, H> + <a, b> U
//! ```
//!
//! ## Folding
//!
//! While `n > 1`:
//!    - Split vectors: `a = (a_L, a_R)`, `b = (b_L, b_R)`
//!    - Compute cross terms:
//!      - `L = <a_L, G_R> + <b_R, H_L> + <a_L, b_R> U`
//!      - `R = <a_R, G_L> + <b_L, H_R> + <a_R, b_L> U`
//!    - Derive `w` from `(L, R)` and the current length
//!    - Fold vectors:
//!      - `a' = w a_L + w^{-1} a_R`
//!      - `b' = w^{-1} b_L + w b_R`
//!    - Fold generators:
//!      - `G' = w^{-1} G_L + w G_R`
//!      - `H' = w H_L + w^{-1} H_R`
//!
//! The prover folds in place over its working buffers. The verifier never
//! folds points: it expands the challenges into coefficients `s_i` and checks
//! the final relation with one multi-scalar multiplication.

pub mod proof;
pub mod prover;
pub mod verifier;

pub use proof::*;
pub use prover::*;
pub use verifier::*;
