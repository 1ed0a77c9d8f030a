//! Inner Product Argument verifier implementation

use crate::InnerProductProof;
use rangeproof_core::{
    scalar_inverse, utils::*, GeneratorSet, GroupElement, RangeProofError, RangeProofResult,
    Transcript,
};
use k256::Scalar;

/// Challenges of a proof together with the expanded folding coefficients.
///
/// After all rounds the folded bases are `g = <s, G>` and `h = <s^{-1}, H>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationScalars {
    /// Round challenges `w_j`, first round first
    pub challenges: Vec<Scalar>,
    /// `w_j^{-1}`
    pub challenges_inv: Vec<Scalar>,
    /// `s_i = Π_j w_j^{±1}`, `+1` where bit `k-1-j` of `i` is set
    pub s: Vec<Scalar>,
}

impl VerificationScalars {
    /// `s_i^{-1}`, which equals `s_{n-1-i}`
    pub fn s_inv(&self) -> Vec<Scalar> {
        self.s.iter().rev().copied().collect()
    }
}

/// Replay the folding challenges of `proof` for vectors of length `n` and
/// expand them into per-generator coefficients
pub fn verification_scalars(
    proof: &InnerProductProof,
    n: usize,
    transcript: &mut Transcript,
) -> RangeProofResult<VerificationScalars> {
    proof.check_rounds(n)?;

    let padded_n = next_power_of_two(n);
    let rounds = proof.num_rounds();

    let mut challenges = Vec::with_capacity(rounds);
    let mut length = padded_n;
    for (l, r) in proof.l_vec.iter().zip(proof.r_vec.iter()) {
        challenges.push(transcript.folding_challenge(l, r, length)?);
        length /= 2;
    }

    let challenges_inv = challenges
        .iter()
        .map(scalar_inverse)
        .collect::<RangeProofResult<Vec<_>>>()?;

    let mut s = vec![Scalar::ONE; padded_n];
    for (round, (w, w_inv)) in challenges.iter().zip(challenges_inv.iter()).enumerate() {
        let bit_position = rounds - 1 - round; // MSB first
        for (i, s_i) in s.iter_mut().enumerate() {
            if (i >> bit_position) & 1 == 1 {
                *s_i *= *w;
            } else {
                *s_i *= *w_inv;
            }
        }
    }

    Ok(VerificationScalars {
        challenges,
        challenges_inv,
        s,
    })
}

/// Inner Product Argument verifier
#[derive(Debug, Clone)]
pub struct InnerProductVerifier {
    g: Vec<GroupElement>,
    h: Vec<GroupElement>,
    u: GroupElement,
}

impl InnerProductVerifier {
    /// Verifier over the generator set's `G_vec`, `H_vec` and `U`
    pub fn new(generators: &GeneratorSet) -> Self {
        Self {
            g: generators.g_vec().to_vec(),
            h: generators.h_vec().to_vec(),
            u: generators.u(),
        }
    }

    /// Verifier over explicit bases
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
        Ok(Self { g, h, u })
    }

    /// Verify an inner product proof against the commitment `p`.
    ///
    /// Checks `P + Σ(w_j² L_j + w_j^{-2} R_j) == a<s, G> + b<s^{-1}, H> + ab U`
    /// as a single multi-scalar multiplication. A malformed proof is an
    /// error; a well-formed proof that does not verify returns `Ok(false)`.
    #[tracing::instrument(skip_all, name = "ipa_verify", fields(n = self.g.len()))]
    pub fn verify(
        &self,
        transcript: &mut Transcript,
        proof: &InnerProductProof,
        p: &GroupElement,
    ) -> RangeProofResult<bool> {
        let n = self.g.len();
        if n == 0 {
            return Err(RangeProofError::InsufficientGenerators {
                needed: 1,
                available: 0,
            });
        }

        let scalars = verification_scalars(proof, n, transcript)?;
        if scalars.s.len() > n {
            return Err(RangeProofError::InsufficientGenerators {
                needed: scalars.s.len(),
                available: n,
            });
        }
        let s_inv = scalars.s_inv();

        let coefficients = scalars
            .s
            .iter()
            .map(|s_i| proof.a * *s_i)
            .chain(s_inv.iter().map(|s_i| proof.b * *s_i))
            .chain(std::iter::once(proof.a * proof.b))
            .chain(std::iter::once(-Scalar::ONE))
            .chain(scalars.challenges.iter().map(|w| -(*w * *w)))
            .chain(scalars.challenges_inv.iter().map(|w| -(*w * *w)));

        let points = self.g[..scalars.s.len()]
            .iter()
            .chain(self.h[..scalars.s.len()].iter())
            .copied()
            .chain(std::iter::once(self.u))
            .chain(std::iter::once(*p))
            .chain(proof.l_vec.iter().copied())
            .chain(proof.r_vec.iter().copied());

        let holds = GroupElement::multiscalar_mul(coefficients, points).is_identity();
        if !holds {
            tracing::warn!("inner product equation does not hold");
        }
        Ok(holds)
    }
}
