// src/miner/search.rs
//! Nonce search for a single job
//!
//! A search walks the nonce space upwards from a starting value, wrapping at
//! `u64::MAX`, until a digest satisfies the job's target or its cancellation
//! token fires. Cancellation is only checked between attempts, so a search
//! can overrun by one full hash chain.

use crate::miner::algorithm::{Algorithm, meets_target};
use crate::types::{Candidate, Job};
use crossbeam_channel::Sender;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Result of one search invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// A qualifying nonce was found
    Found(Candidate),
    /// The token fired before a solution was found
    Cancelled,
}

/// Runs searches with a fixed algorithm
#[derive(Clone)]
pub struct Searcher {
    algorithm: Arc<dyn Algorithm>,
    /// Receives the number of hash evaluations after each attempt
    hash_sender: Option<Sender<u64>>,
}

impl Searcher {
    /// Creates a searcher for `algorithm`
    pub fn new(algorithm: Arc<dyn Algorithm>) -> Self {
        Searcher {
            algorithm,
            hash_sender: None,
        }
    }

    /// Reports hash evaluations to a statistics channel
    pub fn with_hash_sender(mut self, sender: Sender<u64>) -> Self {
        self.hash_sender = Some(sender);
        self
    }

    /// Searches `job` starting at `start_nonce` until solved or cancelled
    pub fn search(&self, job: &Job, start_nonce: u64, cancel: &CancellationToken) -> SearchOutcome {
        let header_hash = *job.header_hash();
        let per_attempt = self.algorithm.hashes_per_attempt();
        let mut nonce = start_nonce;

        loop {
            if cancel.is_cancelled() {
                return SearchOutcome::Cancelled;
            }

            let digest = self.algorithm.digest(&header_hash, nonce);
            if let Some(sender) = &self.hash_sender {
                let _ = sender.send(per_attempt);
            }

            if meets_target(&digest, job.target()) {
                return SearchOutcome::Found(Candidate {
                    nonce,
                    header_hash,
                    mix_digest: digest,
                });
            }
            nonce = nonce.wrapping_add(1);
        }
    }
}
