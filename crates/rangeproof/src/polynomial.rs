//! Blinded vector polynomials `l(X)`, `r(X)` and their inner product `t(X)`
//!
//! For bit vectors `a_L`, `a_R = a_L - 1` and blinding vectors `s_L`, `s_R`:
//!
//! ```text
//! l(X) = (a_L - z·1) + s_L·X
//! r(X) = y^n ∘ (a_R + z·1 + s_R·X) + z²·2^n
//! t(X) = <l(X), r(X)> = t0 + t1·X + t2·X²
//! ```
//!
//! with `t0 = z²·v + delta(y, z)` whenever `a_L` is the bit decomposition of `v`.

use rangeproof_core::{
    utils::{inner_product, scalar_powers, sum_of_powers, vector_add, vector_scale},
    RangeProofError, RangeProofResult,
};
use k256::Scalar;
use zeroize::Zeroizing;

/// Degree-one vector polynomial `constant + linear·X`
#[derive(Clone)]
pub struct VectorPolynomial {
    pub constant: Zeroizing<Vec<Scalar>>,
    pub linear: Zeroizing<Vec<Scalar>>,
}

impl VectorPolynomial {
    pub fn new(constant: Vec<Scalar>, linear: Vec<Scalar>) -> RangeProofResult<Self> {
        if constant.len() != linear.len() {
            return Err(RangeProofError::VectorLengthMismatch {
                expected: constant.len(),
                actual: linear.len(),
            });
        }
        Ok(Self {
            constant: Zeroizing::new(constant),
            linear: Zeroizing::new(linear),
        })
    }

    pub fn len(&self) -> usize {
        self.constant.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constant.is_empty()
    }

    /// Evaluate at `x`
    pub fn evaluate(&self, x: &Scalar) -> RangeProofResult<Zeroizing<Vec<Scalar>>> {
        Ok(Zeroizing::new(vector_add(
            &self.constant,
            &vector_scale(&self.linear, x),
        )?))
    }
}

/// Coefficients of `t(X) = <l(X), r(X)>`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InnerProductPolynomial {
    pub t0: Scalar,
    pub t1: Scalar,
    pub t2: Scalar,
}

impl InnerProductPolynomial {
    /// Multiply out `<l(X), r(X)>`
    pub fn from_vectors(l: &VectorPolynomial, r: &VectorPolynomial) -> RangeProofResult<Self> {
        let t0 = inner_product(&l.constant, &r.constant)?;
        let t2 = inner_product(&l.linear, &r.linear)?;
        let t1 = inner_product(&l.constant, &r.linear)? + inner_product(&l.linear, &r.constant)?;
        Ok(Self { t0, t1, t2 })
    }

    pub fn evaluate(&self, x: &Scalar) -> Scalar {
        self.t0 + *x * (self.t1 + *x * self.t2)
    }
}

/// `l(X) = (a_L - z·1) + s_L·X`
pub fn left_polynomial(a_l: &[Scalar], s_l: &[Scalar], z: &Scalar) -> RangeProofResult<VectorPolynomial> {
    let constant = a_l.iter().map(|bit| *bit - *z).collect();
    VectorPolynomial::new(constant, s_l.to_vec())
}

/// `r(X) = y^n ∘ (a_R + z·1 + s_R·X) + z²·2^n`
pub fn right_polynomial(
    a_r: &[Scalar],
    s_r: &[Scalar],
    y: &Scalar,
    z: &Scalar,
) -> RangeProofResult<VectorPolynomial> {
    if a_r.len() != s_r.len() {
        return Err(RangeProofError::VectorLengthMismatch {
            expected: a_r.len(),
            actual: s_r.len(),
        });
    }

    let n = a_r.len();
    let y_powers = scalar_powers(y, n);
    let two_powers = scalar_powers(&Scalar::from(2u64), n);
    let z_squared = *z * *z;

    let constant = (0..n)
        .map(|i| y_powers[i] * (a_r[i] + *z) + z_squared * two_powers[i])
        .collect();
    let linear = (0..n).map(|i| y_powers[i] * s_r[i]).collect();

    VectorPolynomial::new(constant, linear)
}

/// `delta(y, z) = (z - z²)·Σ y^i - z³·Σ 2^i` over `i < n`
pub fn delta(y: &Scalar, z: &Scalar, n: usize) -> Scalar {
    let sum_y = sum_of_powers(y, n);
    let sum_2 = sum_of_powers(&Scalar::from(2u64), n);
    delta_from_sums(z, &sum_y, &sum_2)
}

pub(crate) fn delta_from_sums(z: &Scalar, sum_y: &Scalar, sum_2: &Scalar) -> Scalar {
    let z_squared = *z * *z;
    let z_cubed = z_squared * *z;
    (*z - z_squared) * *sum_y - z_cubed * *sum_2
}
