// src/config/config.rs
use crate::cli::Commands;
use crate::miner::ITER_COUNT;
use crate::utils::error::MinerError;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use url::Url;

/// Complete settings for one miner process
#[derive(Debug, Clone)]
pub struct MinerConfig {
    /// JSON-RPC endpoint of the node
    pub rpc_url: String,

    /// Number of worker slots
    /// (default: number of CPU cores)
    pub worker_threads: usize,

    /// Delay between job polls
    pub poll_interval: Duration,

    /// Delay before retrying a failed poll
    pub retry_backoff: Duration,

    /// Timeout for a single RPC request
    pub request_timeout: Duration,

    /// Rehashes per nonce attempt; must match the node's verifier
    pub iterations: u32,

    /// How often statistics are logged
    pub stats_interval: Duration,

    /// Base seed for starting nonces. Slot `i` uses `seed + i`.
    pub seed: u64,
}

impl MinerConfig {
    /// Creates a configuration with default timings
    pub fn new(rpc_url: impl Into<String>, worker_threads: usize) -> Self {
        MinerConfig {
            rpc_url: rpc_url.into(),
            worker_threads,
            poll_interval: Duration::from_secs(1),
            retry_backoff: Duration::from_secs(1),
            request_timeout: Duration::from_secs(10),
            iterations: ITER_COUNT,
            stats_interval: Duration::from_secs(60),
            seed: clock_seed(),
        }
    }

    /// Builds and validates a configuration from parsed arguments
    pub fn from_cli(cli: Commands) -> Result<Self, MinerError> {
        let threads = cli.threads.unwrap_or_else(num_cpus::get);
        let config = Self::new(cli.rpc_url, threads);
        config.validate()?;
        Ok(config)
    }

    /// Checks values that would otherwise fail later at runtime
    ///
    /// # Errors
    /// * `ConfigError` - zero workers or a non-HTTP endpoint
    /// * `UrlError` - the endpoint is not a URL
    pub fn validate(&self) -> Result<(), MinerError> {
        if self.worker_threads == 0 {
            return Err(MinerError::ConfigError(
                "worker thread count must be at least 1".into(),
            ));
        }

        let url = Url::parse(&self.rpc_url)?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(MinerError::ConfigError(format!(
                "Unsupported RPC scheme '{}' in {}, expected http or https",
                url.scheme(),
                self.rpc_url
            )));
        }
        Ok(())
    }

    /// Nonce seed for slot `index`
    pub fn slot_seed(&self, index: usize) -> u64 {
        self.seed.wrapping_add(index as u64)
    }
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default()
}
