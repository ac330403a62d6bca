// src/config/mod.rs
//! Runtime configuration
//!
//! The miner takes no configuration file. [`MinerConfig`] is built from the
//! command line and filled in with fixed protocol timings.

/// Configuration structure and validation
pub mod config;

pub use config::MinerConfig;
