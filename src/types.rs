// src/types.rs
use num_bigint::BigUint;
use std::fmt;

/// Width of every hash handled by the miner (header, seed, digest)
pub const HASH_LEN: usize = 32;

/// A 32-byte hash as sent and received by the node
pub type Hash32 = [u8; HASH_LEN];

/// Formats a hash the way the node expects it: `0x` followed by lowercase hex
pub fn hash_to_hex(hash: &[u8]) -> String {
    format!("0x{}", hex::encode(hash))
}

/// One unit of mining work fetched from the node
///
/// The job identifier is derived from the header hash when the job is built,
/// so two jobs with the same header always compare as the same job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    header_hash: Hash32,
    seed_hash: Hash32,
    target: BigUint,
    job_id: String,
    block_number: u64,
}

impl Job {
    /// Builds a job and derives its identifier from `header_hash`
    pub fn new(header_hash: Hash32, seed_hash: Hash32, target: BigUint, block_number: u64) -> Self {
        Job {
            job_id: Self::id_for(&header_hash),
            header_hash,
            seed_hash,
            target,
            block_number,
        }
    }

    /// Job identifier for a given header hash
    pub fn id_for(header_hash: &Hash32) -> String {
        hash_to_hex(header_hash)
    }

    /// Header hash the nonce is appended to
    pub fn header_hash(&self) -> &Hash32 {
        &self.header_hash
    }

    /// Seed hash reported by the node. Not used by the search.
    pub fn seed_hash(&self) -> &Hash32 {
        &self.seed_hash
    }

    /// Inclusive upper bound a digest must not exceed
    pub fn target(&self) -> &BigUint {
        &self.target
    }

    /// Identifier used to detect job changes
    pub fn job_id(&self) -> &str {
        &self.job_id
    }

    /// Chain height reported alongside the job
    pub fn block_number(&self) -> u64 {
        self.block_number
    }

    /// Whether `other` describes the same work
    pub fn is_same_job(&self, other: &Job) -> bool {
        self.job_id == other.job_id
    }
}

impl fmt::Display for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "block={} job_id={}", self.block_number, self.job_id)
    }
}

/// A nonce whose hash chain satisfied a job's target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    /// Winning nonce
    pub nonce: u64,
    /// Header hash of the job that was solved
    pub header_hash: Hash32,
    /// Final digest of the hash chain
    pub mix_digest: Hash32,
}

impl Candidate {
    /// Nonce as submitted to the node: 8 bytes, most significant first
    pub fn nonce_bytes(&self) -> [u8; 8] {
        self.nonce.to_be_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    const HEADER: Hash32 = hex!("00000000000000000000000000000000000000000000000000000000000000a1");

    #[test]
    fn job_id_is_derived_from_header_hash() {
        let a = Job::new(HEADER, [1u8; 32], BigUint::from(10u32), 7);
        let b = Job::new(HEADER, [2u8; 32], BigUint::from(99u32), 8);

        assert_eq!(a.job_id(), b.job_id());
        assert!(a.is_same_job(&b));
        assert_eq!(
            a.job_id(),
            "0x00000000000000000000000000000000000000000000000000000000000000a1"
        );
    }

    #[test]
    fn different_headers_are_different_jobs() {
        let mut other = HEADER;
        other[0] = 0xff;
        let a = Job::new(HEADER, [0u8; 32], BigUint::from(1u32), 1);
        let b = Job::new(other, [0u8; 32], BigUint::from(1u32), 1);

        assert_ne!(a.job_id(), b.job_id());
        assert!(!a.is_same_job(&b));
    }

    #[test]
    fn nonce_bytes_are_big_endian() {
        let candidate = Candidate {
            nonce: 0x0102_0304_0506_0708,
            header_hash: HEADER,
            mix_digest: [0u8; 32],
        };
        assert_eq!(candidate.nonce_bytes(), [1, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn display_shows_block_and_id() {
        let job = Job::new([0u8; 32], [0u8; 32], BigUint::from(0u32), 42);
        assert!(job.to_string().starts_with("block=42 job_id=0x0000"));
    }
}
