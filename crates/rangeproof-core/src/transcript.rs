//! Fiat-Shamir transcript for range proofs
//!
//! Every challenge is `SHA256(domain || length_be4 || elements...) mod n`.
//! The protocol order is fixed and enforced by [`TranscriptPhase`]:
//!
//! ```text
//! y   = H(domain || n || A || S)
//! z   = H(domain || n || A || S || y)
//! x   = H(domain || n || T1 || T2 || z)
//! w_j = H(domain || len_j || L_j || R_j)     len_j = vector length before fold j
//! ```

use crate::{codec::scalar_to_bytes, GroupElement, RangeProofError, RangeProofResult};
use k256::Scalar;
use sha2::{Digest, Sha256};

mod sealed {
    pub trait Sealed {}

    impl Sealed for crate::GroupElement {}
    impl Sealed for k256::Scalar {}
}

/// Canonical byte form of a transcript element.
///
/// Closed: only points and scalars can be hashed into a challenge.
pub trait Encodable: sealed::Sealed {
    fn to_bytes(&self) -> Vec<u8>;
}

impl Encodable for GroupElement {
    fn to_bytes(&self) -> Vec<u8> {
        GroupElement::to_bytes(self).to_vec()
    }
}

impl Encodable for Scalar {
    fn to_bytes(&self) -> Vec<u8> {
        scalar_to_bytes(self).to_vec()
    }
}

/// Position in the challenge sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranscriptPhase {
    /// Waiting for `A` and `S`
    AwaitingBitCommitments,
    /// `y` and `z` derived, waiting for `T1` and `T2`
    ChallengesYz,
    /// `x` derived, waiting for the first folding round
    ChallengeX,
    /// Inner product rounds in progress
    Folding,
}

/// Challenge generator scoped to one proving or verification call
#[derive(Debug, Clone)]
pub struct Transcript {
    domain: Vec<u8>,
    bit_length: u32,
    phase: TranscriptPhase,
    z: Option<Scalar>,
}

impl Transcript {
    /// Start a range proof transcript
    pub fn new(domain: impl AsRef<[u8]>, bit_length: u32) -> Self {
        Self {
            domain: domain.as_ref().to_vec(),
            bit_length,
            phase: TranscriptPhase::AwaitingBitCommitments,
            z: None,
        }
    }

    /// Start a transcript for a standalone inner product argument over
    /// vectors of length `n`
    pub fn for_inner_product(domain: impl AsRef<[u8]>, n: u32) -> Self {
        Self {
            domain: domain.as_ref().to_vec(),
            bit_length: n,
            phase: TranscriptPhase::Folding,
            z: None,
        }
    }

    pub fn phase(&self) -> TranscriptPhase {
        self.phase
    }

    pub fn domain(&self) -> &[u8] {
        &self.domain
    }

    pub fn bit_length(&self) -> u32 {
        self.bit_length
    }

    fn require_phase(&self, allowed: &[TranscriptPhase], operation: &str) -> RangeProofResult<()> {
        let in_order = allowed.contains(&self.phase);
        debug_assert!(in_order, "{operation} requested in phase {:?}", self.phase);
        if in_order {
            return Ok(());
        }
        Err(RangeProofError::InternalArithmetic(format!(
            "{operation} requested in transcript phase {:?}",
            self.phase
        )))
    }

    fn challenge(&self, length: u32, elements: &[&dyn Encodable]) -> RangeProofResult<Scalar> {
        let mut hasher = Sha256::new();
        hasher.update(&self.domain);
        hasher.update(length.to_be_bytes());
        for element in elements {
            hasher.update(element.to_bytes());
        }
        let challenge = crate::group::scalar_from_hash(&hasher.finalize().into());
        if challenge == Scalar::ZERO {
            return Err(RangeProofError::InternalArithmetic(
                "zero Fiat-Shamir challenge".to_string(),
            ));
        }
        Ok(challenge)
    }

    /// Derive `(y, z)` from the bit commitments `A` and `S`
    pub fn bit_commitment_challenges(
        &mut self,
        a: &GroupElement,
        s: &GroupElement,
    ) -> RangeProofResult<(Scalar, Scalar)> {
        self.require_phase(
            &[TranscriptPhase::AwaitingBitCommitments],
            "bit commitment challenges",
        )?;

        let y = self.challenge(self.bit_length, &[a, s])?;
        let z = self.challenge(self.bit_length, &[a, s, &y])?;

        self.z = Some(z);
        self.phase = TranscriptPhase::ChallengesYz;
        tracing::debug!(
            y = %hex::encode_upper(scalar_to_bytes(&y)),
            z = %hex::encode_upper(scalar_to_bytes(&z)),
            "derived y, z"
        );
        Ok((y, z))
    }

    /// Derive `x` from the polynomial commitments `T1` and `T2`
    pub fn polynomial_challenge(&mut self, t1: &GroupElement, t2: &GroupElement) -> RangeProofResult<Scalar> {
        self.require_phase(&[TranscriptPhase::ChallengesYz], "polynomial challenge")?;
        let z = self.z.ok_or_else(|| {
            RangeProofError::InternalArithmetic("z missing after bit commitment phase".to_string())
        })?;

        let x = self.challenge(self.bit_length, &[t1, t2, &z])?;

        self.phase = TranscriptPhase::ChallengeX;
        tracing::debug!(x = %hex::encode_upper(scalar_to_bytes(&x)), "derived x");
        Ok(x)
    }

    /// Derive the folding challenge for one inner product round.
    ///
    /// `length` is the vector length before this round's fold, so rounds at
    /// different depths hash distinct inputs.
    pub fn folding_challenge(
        &mut self,
        l: &GroupElement,
        r: &GroupElement,
        length: usize,
    ) -> RangeProofResult<Scalar> {
        self.require_phase(
            &[TranscriptPhase::ChallengeX, TranscriptPhase::Folding],
            "folding challenge",
        )?;
        let length = u32::try_from(length).map_err(|_| {
            RangeProofError::InternalArithmetic(format!("folding length {length} exceeds u32"))
        })?;

        let w = self.challenge(length, &[l, r])?;

        self.phase = TranscriptPhase::Folding;
        Ok(w)
    }
}
