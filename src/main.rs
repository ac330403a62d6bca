// src/main.rs
use clap::Parser;
use liberty_miner::*;
use std::sync::Arc;
use tokio::runtime::{Handle, Runtime};

/// Main entry point
///
/// Exits non-zero if the arguments are invalid or the node cannot be
/// reached at startup. Otherwise mines until the process is terminated.
fn main() -> Result<(), MinerError> {
    let cli = Commands::parse();
    init_logging();

    let config = MinerConfig::from_cli(cli)?;
    let rt = Runtime::new()?;
    rt.block_on(start_mining(config))
}

/// Connects to the node, starts the worker slots and runs the dispatcher
async fn start_mining(config: MinerConfig) -> Result<(), MinerError> {
    log::info!("{}", startup_banner(&config.rpc_url, config.worker_threads));
    let node = Arc::new(NodeClient::new(&config.rpc_url, config.request_timeout)?);
    let height = node.connect().await.map_err(|e| {
        MinerError::TransportError(format!("Failed to connect to {}: {}", config.rpc_url, e))
    })?;
    log::info!("Connected to node at {} (block {})", config.rpc_url, height);

    let reporter = StatsReporter::new(config.stats_interval);
    reporter.start_reporting();

    let searcher = Searcher::new(Arc::new(Blake3Chain::new(config.iterations)))
        .with_hash_sender(reporter.hash_sender());
    let share_sender = reporter.share_sender();

    let mut dispatcher = Dispatcher::new(
        Arc::clone(&node),
        config.poll_interval,
        config.retry_backoff,
    );
    for id in 0..config.worker_threads {
        let slot = WorkerSlot::new(
            id,
            config.slot_seed(id),
            Arc::clone(&node),
            searcher.clone(),
            Handle::current(),
        )
        .with_share_sender(share_sender.clone());
        let (inbox, _handle) = slot.spawn()?;
        dispatcher.add_slot(inbox);
    }

    log::info!("Started {} workers", dispatcher.slot_count());
    dispatcher.run().await;
    Ok(())
}
