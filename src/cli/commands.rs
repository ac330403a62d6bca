// src/cli/commands.rs
use clap::Parser;

/// Liberty miner - BLAKE3 hash-chain proof-of-work client
#[derive(Parser, Debug)]
#[command(name = "liberty-miner")]
#[command(version, about, long_about = None)]
pub struct Commands {
    /// JSON-RPC endpoint of the node (e.g., http://127.0.0.1:8545)
    pub rpc_url: String,

    /// Number of worker threads (defaults to the number of logical CPUs)
    pub threads: Option<usize>,
}
