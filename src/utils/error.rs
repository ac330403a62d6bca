// src/utils/error.rs
use std::io;
use thiserror::Error;

/// Main error type for the miner
///
/// Separates failures reaching the node (`TransportError`) from responses
/// the node sent but that could not be understood (`ProtocolError`). A
/// rejected solution is not an error; it is reported as `Ok(false)`.
#[derive(Error, Debug)]
pub enum MinerError {
    /// Connectivity failure or an RPC-level error returned by the node
    #[error("Transport error: {0}")]
    TransportError(String),

    /// Malformed, short or otherwise unusable response from the node
    #[error("Protocol violation: {0}")]
    ProtocolError(String),

    /// Invalid command-line or configuration values
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Standard I/O operation errors
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),

    /// URL parsing errors
    #[error("URL parse error: {0}")]
    UrlError(#[from] url::ParseError),
}

impl MinerError {
    /// Whether this error came from reaching the node rather than from its payload
    pub fn is_transport(&self) -> bool {
        matches!(self, MinerError::TransportError(_))
    }
}

/// Converts HTTP client errors into MinerError
///
/// Every reqwest failure (connect, timeout, body read, status) means the
/// node could not be reached or talked to, so it is a `TransportError`.
impl From<reqwest::Error> for MinerError {
    fn from(e: reqwest::Error) -> Self {
        MinerError::TransportError(format!("HTTP request failed: {}", e))
    }
}

/// Converts hex decoding errors into MinerError
///
/// Hex only ever arrives from the node, so bad hex is a `ProtocolError`.
impl From<hex::FromHexError> for MinerError {
    fn from(e: hex::FromHexError) -> Self {
        MinerError::ProtocolError(format!("Hex conversion failed: {}", e))
    }
}
