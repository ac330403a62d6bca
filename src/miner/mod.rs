// src/miner/mod.rs
//! Core mining functionality
//!
//! - Proof-of-work algorithm (BLAKE3 hash chain)
//! - Nonce search with cooperative cancellation
//! - Worker slots that preempt stale searches
//! - The dispatcher that polls for jobs and fans them out

/// Proof-of-work algorithms
pub mod algorithm;

/// Nonce search for one job
pub mod search;

/// Worker slot threads
///
/// Each slot receives jobs on its own inbox and supervises one search at a time.
pub mod worker;

/// Job polling and broadcast
pub mod dispatcher;

pub use self::algorithm::{Algorithm, Blake3Chain, ITER_COUNT};
pub use self::dispatcher::{Dispatcher, PollOutcome};
pub use self::search::{SearchOutcome, Searcher};
pub use self::worker::WorkerSlot;
