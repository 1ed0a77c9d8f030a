//! Deterministic generator derivation and the process-wide generator cache
//!
//! Every generator is a hash-derived multiple of a fixed basis:
//!
//! ```text
//! H        = SHA256(encode(G) || "bulletproof_h")  * G
//! U        = SHA256(encode(G) || "bulletproof_u")  * G
//! G_vec[i] = SHA256("bulletproof_g_" || i)         * G
//! H_vec[i] = SHA256("bulletproof_h_" || i)         * H
//! ```
//!
//! where `i` is written in decimal. `H_vec` uses `H` as its basis; deriving it
//! from `G` produces a different, incompatible generator set.

use crate::{
    group::scalar_from_hash, utils::next_power_of_two, GroupElement, RangeProofError,
    RangeProofResult,
};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::sync::{Arc, OnceLock};

/// Identifier of the derivation procedure implemented here
pub const GENERATOR_SCHEME: &str = "HASHED_SHA256_H_BASIS_V2";

pub const CURVE_NAME: &str = "secp256k1";

/// Largest supported range proof width
pub const MAX_BIT_LENGTH: u32 = 64;

const H_SEED: &[u8] = b"bulletproof_h";
const U_SEED: &[u8] = b"bulletproof_u";
const G_VEC_PREFIX: &[u8] = b"bulletproof_g_";
const H_VEC_PREFIX: &[u8] = b"bulletproof_h_";

#[allow(clippy::declare_interior_mutable_const)]
const EMPTY_SLOT: OnceLock<Arc<GeneratorSet>> = OnceLock::new();

/// One slot per bit length, index `bit_length - 1`
static GENERATOR_CACHE: [OnceLock<Arc<GeneratorSet>>; MAX_BIT_LENGTH as usize] =
    [EMPTY_SLOT; MAX_BIT_LENGTH as usize];

/// Generator set for range proofs of a fixed bit length
#[derive(Debug, Clone)]
pub struct GeneratorSet {
    /// Value generator G
    g: GroupElement,
    /// Blinding generator H
    h: GroupElement,
    /// Inner product generator U
    u: GroupElement,
    /// Per-bit generators on the left side
    g_vec: Vec<GroupElement>,
    /// Per-bit generators on the right side
    h_vec: Vec<GroupElement>,
    bit_length: u32,
}

/// `SHA256(encode(G) || seed) * G`
pub fn derive_h(g: &GroupElement) -> GroupElement {
    derive_seeded(g, H_SEED)
}

fn derive_seeded(g: &GroupElement, seed: &[u8]) -> GroupElement {
    let mut hasher = Sha256::new();
    hasher.update(g.to_bytes());
    hasher.update(seed);
    *g * scalar_from_hash(&hasher.finalize().into())
}

/// `SHA256(prefix || decimal(index)) * basis`
pub fn derive_vector(prefix: &[u8], index: usize, basis: &GroupElement) -> GroupElement {
    let mut hasher = Sha256::new();
    hasher.update(prefix);
    hasher.update(index.to_string().as_bytes());
    *basis * scalar_from_hash(&hasher.finalize().into())
}

fn check_bit_length(bit_length: u32) -> RangeProofResult<()> {
    if bit_length == 0 || bit_length > MAX_BIT_LENGTH {
        return Err(RangeProofError::UnsupportedBitLength(bit_length));
    }
    Ok(())
}

impl GeneratorSet {
    /// Derive a fresh generator set.
    ///
    /// Vector generators are derived for the bit length rounded up to a power
    /// of two, which is the length the inner product argument folds over.
    pub fn new(bit_length: u32) -> RangeProofResult<Self> {
        check_bit_length(bit_length)?;
        Ok(Self::derive(bit_length))
    }

    /// Shared, lazily derived generator set for `bit_length`.
    ///
    /// Derivation runs at most once per bit length for the life of the
    /// process; later calls return the same `Arc`.
    pub fn shared(bit_length: u32) -> RangeProofResult<Arc<Self>> {
        check_bit_length(bit_length)?;
        let slot = &GENERATOR_CACHE[(bit_length - 1) as usize];
        Ok(Arc::clone(
            slot.get_or_init(|| Arc::new(Self::derive(bit_length))),
        ))
    }

    fn derive(bit_length: u32) -> Self {
        let g = GroupElement::generator();
        let h = derive_h(&g);
        let u = derive_seeded(&g, U_SEED);

        let padded = next_power_of_two(bit_length as usize);
        let g_vec = (0..padded)
            .map(|i| derive_vector(G_VEC_PREFIX, i, &g))
            .collect();
        let h_vec = (0..padded)
            .map(|i| derive_vector(H_VEC_PREFIX, i, &h))
            .collect();

        tracing::debug!(
            bit_length,
            padded,
            scheme = GENERATOR_SCHEME,
            "derived generator set"
        );

        Self {
            g,
            h,
            u,
            g_vec,
            h_vec,
            bit_length,
        }
    }

    /// Range proof width in bits
    pub fn bit_length(&self) -> u32 {
        self.bit_length
    }

    /// Length of the vector generators (bit length rounded up to a power of two)
    pub fn vector_length(&self) -> usize {
        self.g_vec.len()
    }

    /// Get the G generator (used for value commitments)
    pub fn g(&self) -> GroupElement {
        self.g
    }

    /// Get the H generator (used for blinding factor commitments)
    pub fn h(&self) -> GroupElement {
        self.h
    }

    /// Get the U generator (used for inner product commitments)
    pub fn u(&self) -> GroupElement {
        self.u
    }

    pub fn g_vec(&self) -> &[GroupElement] {
        &self.g_vec
    }

    pub fn h_vec(&self) -> &[GroupElement] {
        &self.h_vec
    }

    /// SHA-256 over the scheme identifier and every encoded generator
    pub fn fingerprint(&self) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(GENERATOR_SCHEME.as_bytes());
        hasher.update(self.bit_length.to_be_bytes());
        for point in [self.g, self.h, self.u]
            .iter()
            .chain(self.g_vec.iter())
            .chain(self.h_vec.iter())
        {
            hasher.update(point.to_bytes());
        }
        hasher.finalize().into()
    }

    /// Serializable description used to compare deployments
    pub fn manifest(&self) -> GeneratorManifest {
        GeneratorManifest {
            scheme: GENERATOR_SCHEME.to_string(),
            curve: CURVE_NAME.to_string(),
            bit_length: self.bit_length,
            g: self.g,
            h: self.h,
            u: self.u,
            g_vec: self.g_vec.clone(),
            h_vec: self.h_vec.clone(),
            fingerprint: hex::encode_upper(self.fingerprint()),
        }
    }
}

/// Dump of a generator set, exchanged between prover and verifier
/// deployments to detect derivation drift
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorManifest {
    pub scheme: String,
    pub curve: String,
    pub bit_length: u32,
    #[serde(rename = "G")]
    pub g: GroupElement,
    #[serde(rename = "H")]
    pub h: GroupElement,
    #[serde(rename = "U")]
    pub u: GroupElement,
    #[serde(rename = "G_vec")]
    pub g_vec: Vec<GroupElement>,
    #[serde(rename = "H_vec")]
    pub h_vec: Vec<GroupElement>,
    pub fingerprint: String,
}

impl GeneratorManifest {
    /// Name of the first entry that differs from `other`, if any
    pub fn first_mismatch(&self, other: &Self) -> Option<String> {
        if self.scheme != other.scheme {
            return Some("scheme".to_string());
        }
        if self.curve != other.curve {
            return Some("curve".to_string());
        }
        if self.bit_length != other.bit_length {
            return Some("bit_length".to_string());
        }
        for (name, mine, theirs) in [("G", self.g, other.g), ("H", self.h, other.h), ("U", self.u, other.u)] {
            if mine != theirs {
                return Some(name.to_string());
            }
        }
        for (name, mine, theirs) in [("G_vec", &self.g_vec, &other.g_vec), ("H_vec", &self.h_vec, &other.h_vec)] {
            if mine.len() != theirs.len() {
                return Some(format!("{name}.len"));
            }
            if let Some(i) = mine.iter().zip(theirs.iter()).position(|(a, b)| a != b) {
                return Some(format!("{name}[{i}]"));
            }
        }
        None
    }
}
