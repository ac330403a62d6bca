//! Liberty miner - BLAKE3 hash-chain proof-of-work client
//!
//! Polls a node for mining jobs over JSON-RPC, fans each new job out to a
//! set of worker slots, and submits any nonce whose hash chain meets the
//! job's target.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// Proof-of-work search, worker slots and job dispatch
pub mod miner;

/// Node communication
pub mod network;

/// Statistics collection and reporting functionality
pub mod stats;

/// Utility functions and error handling
pub mod utils;

/// Command-line interface definitions
pub mod cli;

/// Configuration management
pub mod config;

/// Shared type definitions
pub mod types;

// Core exports
pub use cli::Commands;
pub use config::MinerConfig;
pub use miner::{Algorithm, Blake3Chain, Dispatcher, SearchOutcome, Searcher, WorkerSlot};
pub use network::{NodeClient, WorkSource};
pub use stats::{ShareResult, StatsReporter};
pub use types::{Candidate, Job};
pub use utils::{MinerError, init_logging, startup_banner};
