// src/miner/algorithm/blake3_chain.rs
//! BLAKE3 hash-chain proof of work
//!
//! `digest0 = BLAKE3(header_hash || nonce_be)`, then the digest is rehashed
//! `ITER_COUNT` times. The node's verifier uses the same constant.

use crate::miner::algorithm::Algorithm;
use crate::types::{HASH_LEN, Hash32};

/// Number of rehashes applied after the first hash
pub const ITER_COUNT: u32 = 312_688;

/// Sequential BLAKE3 hash chain
#[derive(Debug, Clone, Copy)]
pub struct Blake3Chain {
    iterations: u32,
}

impl Blake3Chain {
    /// Creates a chain with a custom number of rehashes
    ///
    /// Anything other than [`ITER_COUNT`] will not be accepted by the node.
    pub fn new(iterations: u32) -> Self {
        Self { iterations }
    }
}

impl Default for Blake3Chain {
    fn default() -> Self {
        Self::new(ITER_COUNT)
    }
}

impl Algorithm for Blake3Chain {
    fn digest(&self, header_hash: &Hash32, nonce: u64) -> Hash32 {
        let mut message = [0u8; HASH_LEN + 8];
        message[..HASH_LEN].copy_from_slice(header_hash);
        message[HASH_LEN..].copy_from_slice(&nonce.to_be_bytes());

        let mut digest: Hash32 = blake3::hash(&message).into();
        for _ in 0..self.iterations {
            digest = blake3::hash(&digest).into();
        }
        digest
    }

    fn hashes_per_attempt(&self) -> u64 {
        u64::from(self.iterations) + 1
    }
}
