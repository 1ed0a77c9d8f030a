//! Pedersen scalar and vector commitments

use crate::{GeneratorSet, GroupElement, RangeProofError, RangeProofResult};
use k256::Scalar;

/// `value * G + blinding * H`
pub fn pedersen_commit(generators: &GeneratorSet, value: &Scalar, blinding: &Scalar) -> GroupElement {
    GroupElement::multiscalar_mul([*value, *blinding], [generators.g(), generators.h()])
}

/// Compute the multi-base commitment `Σ a_i * g_basis_i + Σ b_i * h_basis_i`
pub fn vector_commit(
    a: &[Scalar],
    g_basis: &[GroupElement],
    b: &[Scalar],
    h_basis: &[GroupElement],
) -> RangeProofResult<GroupElement> {
    if a.len() != b.len() {
        return Err(RangeProofError::VectorLengthMismatch {
            expected: a.len(),
            actual: b.len(),
        });
    }
    if g_basis.len() < a.len() || h_basis.len() < b.len() {
        return Err(RangeProofError::InsufficientGenerators {
            needed: a.len(),
            available: g_basis.len().min(h_basis.len()),
        });
    }

    let scalars = a.iter().chain(b.iter()).copied();
    let points = g_basis[..a.len()]
        .iter()
        .chain(h_basis[..b.len()].iter())
        .copied();

    Ok(GroupElement::multiscalar_mul(scalars, points))
}
