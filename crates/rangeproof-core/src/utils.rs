//! Scalar vector helpers shared by the prover and verifier

use crate::{RangeProofError, RangeProofResult};
use k256::Scalar;

/// Compute powers of a scalar: [1, x, x^2, x^3, ..., x^(n-1)]
pub fn scalar_powers(x: &Scalar, n: usize) -> Vec<Scalar> {
    let mut powers = Vec::with_capacity(n);
    let mut current = Scalar::ONE;

    for _ in 0..n {
        powers.push(current);
        current *= *x;
    }

    powers
}

/// Sum of powers 1 + x + ... + x^(n-1)
pub fn sum_of_powers(x: &Scalar, n: usize) -> Scalar {
    scalar_powers(x, n)
        .into_iter()
        .fold(Scalar::ZERO, |acc, p| acc + p)
}

fn check_lengths(a: &[Scalar], b: &[Scalar]) -> RangeProofResult<()> {
    if a.len() != b.len() {
        return Err(RangeProofError::VectorLengthMismatch {
            expected: a.len(),
            actual: b.len(),
        });
    }
    Ok(())
}

/// Compute the inner product of two scalar vectors
pub fn inner_product(a: &[Scalar], b: &[Scalar]) -> RangeProofResult<Scalar> {
    check_lengths(a, b)?;
    Ok(a.iter()
        .zip(b.iter())
        .fold(Scalar::ZERO, |acc, (ai, bi)| acc + *ai * *bi))
}

/// Add two scalar vectors element-wise
pub fn vector_add(a: &[Scalar], b: &[Scalar]) -> RangeProofResult<Vec<Scalar>> {
    check_lengths(a, b)?;
    Ok(a.iter().zip(b.iter()).map(|(ai, bi)| *ai + *bi).collect())
}

/// Scale a vector by a scalar
pub fn vector_scale(vec: &[Scalar], scalar: &Scalar) -> Vec<Scalar> {
    vec.iter().map(|v| *v * *scalar).collect()
}

/// Little-endian bit decomposition of a value
pub fn bit_decomposition(value: u64, bits: usize) -> Vec<Scalar> {
    let mut result = Vec::with_capacity(bits);
    let mut v = value;

    for _ in 0..bits {
        result.push(Scalar::from(v & 1));
        v >>= 1;
    }

    result
}

/// Check if a number is a power of 2
pub fn is_power_of_two(n: usize) -> bool {
    n != 0 && (n & (n - 1)) == 0
}

/// Find the next power of 2 greater than or equal to n
pub fn next_power_of_two(n: usize) -> usize {
    if n == 0 {
        return 1;
    }

    let mut power = 1;
    while power < n {
        power <<= 1;
    }
    power
}

/// Number of halvings needed to bring `n` down to 1, i.e. ceil(log2 n)
pub fn folding_rounds(n: usize) -> usize {
    next_power_of_two(n).trailing_zeros() as usize
}
