// src/network/mod.rs
//! Network communication components
//!
//! - [`WorkSource`]: what the miner needs from a node
//! - [`NodeClient`]: JSON-RPC implementation over HTTP

/// Work source abstraction
pub mod source;

/// Node JSON-RPC client
///
/// Fetches work with `eth_getWork`/`eth_blockNumber` and submits solutions
/// with `eth_submitWork`.
pub mod node;

pub use node::NodeClient;
pub use source::WorkSource;
