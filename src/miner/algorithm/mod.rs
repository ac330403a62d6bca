// src/miner/algorithm/mod.rs
//! Proof-of-work algorithms
//!
//! The node verifies solutions with the BLAKE3 hash chain in [`blake3_chain`].
//! Searches only depend on the [`Algorithm`] trait so the digest function can
//! be swapped in tests.

/// BLAKE3 hash-chain implementation
pub mod blake3_chain;

pub use blake3_chain::{Blake3Chain, ITER_COUNT};

use crate::types::Hash32;
use num_bigint::BigUint;

/// Common interface for proof-of-work digest functions
pub trait Algorithm: Send + Sync {
    /// Computes the final digest for `header_hash` and `nonce`
    ///
    /// Must be a pure function of its inputs.
    fn digest(&self, header_hash: &Hash32, nonce: u64) -> Hash32;

    /// Number of hash evaluations performed by one call to [`Algorithm::digest`]
    fn hashes_per_attempt(&self) -> u64;

    /// Checks whether the digest for `nonce` satisfies `target`
    fn verify(&self, header_hash: &Hash32, nonce: u64, target: &BigUint) -> bool {
        meets_target(&self.digest(header_hash, nonce), target)
    }
}

/// Whether `digest`, read as a big-endian unsigned integer, is `<= target`
pub fn meets_target(digest: &Hash32, target: &BigUint) -> bool {
    BigUint::from_bytes_be(digest) <= *target
}
