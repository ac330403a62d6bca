// src/utils/logging.rs
//! Logging configuration
//!
//! Uses `env_logger` with a compact single-line format. The default level is
//! Info; `RUST_LOG` overrides it when set.

use env_logger::{Builder, Target};
use log::LevelFilter;
use std::env;

/// Initializes the logging subsystem
///
/// Safe to call more than once; later calls are ignored.
pub fn init_logging() {
    let mut builder = common_log_config();

    if env::var("RUST_LOG").is_err() {
        builder.filter_level(LevelFilter::Info);
    } else {
        builder.parse_env("RUST_LOG");
    }

    let _ = builder.try_init();
}

/// Line logged once at startup, before the node is contacted
pub fn startup_banner(rpc_url: &str, workers: usize) -> String {
    format!(
        "{} v{} | node: {} | workers: {}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        rpc_url,
        workers
    )
}

/// Base builder: `[ts LEVEL module:line] message` on stdout
fn common_log_config() -> Builder {
    let mut builder = Builder::new();

    builder
        .format(|buf, record| {
            use std::io::Write;
            let ts = buf.timestamp_seconds();
            let level = record.level();
            let module = record.module_path().unwrap_or_default();
            let line = record.line().unwrap_or(0);

            writeln!(
                buf,
                "[{} {} {}:{}] {}",
                ts,
                level,
                module,
                line,
                record.args()
            )
        })
        .target(Target::Stdout);

    builder
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn banner_names_binary_node_and_workers() {
        let banner = startup_banner("http://127.0.0.1:8545", 4);
        assert!(banner.starts_with("liberty-miner v"));
        assert!(banner.contains("node: http://127.0.0.1:8545"));
        assert!(banner.ends_with("workers: 4"));
    }
}
