//! Inner Product Argument prover implementation

use crate::InnerProductProof;
use rangeproof_core::{
    scalar_inverse, utils::*, vector_commit, GeneratorSet, GroupElement, RangeProofError,
    RangeProofResult, Transcript,
};
use k256::Scalar;

/// Inner Product Argument prover
///
/// Owns working copies of the bases; proving folds them in place.
#[derive(Debug, Clone)]
pub struct InnerProductProver {
    g: Vec<GroupElement>,
    h: Vec<GroupElement>,
    u: GroupElement,
}

impl InnerProductProver {
    /// Prover over the generator set's `G_vec`, `H_vec` and `U`
    pub fn new(generators: &GeneratorSet) -> Self {
        Self {
            g: generators.g_vec().to_vec(),
            h: generators.h_vec().to_vec(),
            u: generators.u(),
        }
    }

    /// Prover over explicit bases, e.g. `H'_i = y^{-i} H_i` in a range proof
    pub fn with_bases(
        g: Vec<GroupElement>,
        h: Vec<GroupElement>,
        u: GroupElement,
    ) -> RangeProofResult<Self> {
        if g.len() != h.len() {
            return Err(RangeProofError::VectorLengthMismatch {
                expected: g.len(),
                actual: h.len(),
            });
        }
        if !is_power_of_two(g.len()) {
            return Err(RangeProofError::InvalidProofStructure(format!(
                "basis length {} is not a power of two",
                g.len()
            )));
        }
        Ok(Self { g, h, u })
    }

    /// Commitment `P = <a, G> + <b, H> + <a, b> U` for this prover's bases
    pub fn commit(&self, a: &[Scalar], b: &[Scalar]) -> RangeProofResult<GroupElement> {
        let c = inner_product(a, b)?;
        Ok(vector_commit(a, &self.g, b, &self.h)? + self.u * c)
    }

    /// Create an inner product proof
    ///
    /// Proves knowledge of `a`, `b` with `P = <a, G> + <b, H> + <a, b> U`.
    /// Inputs shorter than the bases are padded with zeros.
    #[tracing::instrument(skip_all, name = "ipa_prove", fields(n = self.g.len()))]
    pub fn prove(
        mut self,
        transcript: &mut Transcript,
        a: &[Scalar],
        b: &[Scalar],
    ) -> RangeProofResult<InnerProductProof> {
        if a.len() != b.len() {
            return Err(RangeProofError::VectorLengthMismatch {
                expected: a.len(),
                actual: b.len(),
            });
        }
        if a.len() > self.g.len() {
            return Err(RangeProofError::InsufficientGenerators {
                needed: a.len(),
                available: self.g.len(),
            });
        }

        let mut a = a.to_vec();
        let mut b = b.to_vec();
        a.resize(self.g.len(), Scalar::ZERO);
        b.resize(self.g.len(), Scalar::ZERO);

        let rounds = folding_rounds(a.len());
        let mut l_vec = Vec::with_capacity(rounds);
        let mut r_vec = Vec::with_capacity(rounds);

        let mut n = a.len();
        while n > 1 {
            let m = n / 2;

            let (l, r) = {
                let (a_l, a_r) = a[..n].split_at(m);
                let (b_l, b_r) = b[..n].split_at(m);
                let (g_l, g_r) = self.g[..n].split_at(m);
                let (h_l, h_r) = self.h[..n].split_at(m);

                // Cross terms
                let c_l = inner_product(a_l, b_r)?;
                let c_r = inner_product(a_r, b_l)?;

                // L = <a_L, G_R> + <b_R, H_L> + c_L U
                let l = vector_commit(a_l, g_r, b_r, h_l)? + self.u * c_l;
                // R = <a_R, G_L> + <b_L, H_R> + c_R U
                let r = vector_commit(a_r, g_l, b_l, h_r)? + self.u * c_r;
                (l, r)
            };

            let w = transcript.folding_challenge(&l, &r, n)?;
            let w_inv = scalar_inverse(&w)?;

            for i in 0..m {
                a[i] = a[i] * w + a[m + i] * w_inv;
                b[i] = b[i] * w_inv + b[m + i] * w;
                self.g[i] = self.g[i] * w_inv + self.g[m + i] * w;
                self.h[i] = self.h[i] * w + self.h[m + i] * w_inv;
            }

            l_vec.push(l);
            r_vec.push(r);
            n = m;
        }

        tracing::debug!(rounds = l_vec.len(), "inner product folded");
        Ok(InnerProductProof::new(l_vec, r_vec, a[0], b[0]))
    }
}
