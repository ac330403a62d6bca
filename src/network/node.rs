// src/network/node.rs
use crate::network::source::WorkSource;
use crate::types::{Candidate, HASH_LEN, Hash32, Job, hash_to_hex};
use crate::utils::error::MinerError;
use num_bigint::BigUint;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// JSON-RPC request envelope
#[derive(Debug, Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: Value,
}

/// JSON-RPC response envelope
#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcErrorObject>,
}

/// Error object returned by the node
#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    #[serde(default)]
    code: i64,
    message: String,
}

/// Client for a node's mining JSON-RPC interface
///
/// Wraps a single `reqwest::Client`, which pools connections and is safe to
/// share between the dispatcher and all searches.
pub struct NodeClient {
    /// RPC endpoint (e.g., "http://127.0.0.1:8545")
    rpc_url: String,
    /// HTTP client for making RPC requests
    client: Client,
    /// Request id counter
    next_id: AtomicU64,
}

impl NodeClient {
    /// Creates a new NodeClient
    ///
    /// # Arguments
    /// * `rpc_url` - URL of the node's RPC endpoint
    /// * `timeout` - Per-request timeout
    pub fn new(rpc_url: impl Into<String>, timeout: Duration) -> Result<Self, MinerError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(NodeClient {
            rpc_url: rpc_url.into(),
            client,
            next_id: AtomicU64::new(1),
        })
    }

    /// Verifies the node is reachable by asking for the current block number
    ///
    /// # Returns
    /// * `Ok(u64)` - The node's current block number
    /// * `Err(MinerError)` - If the node cannot be reached
    pub async fn connect(&self) -> Result<u64, MinerError> {
        self.block_number().await
    }

    /// Gets the current block number from the node
    pub async fn block_number(&self) -> Result<u64, MinerError> {
        let result = self.rpc_call("eth_blockNumber", json!([])).await?;
        parse_block_number(&result)
    }

    /// Makes an RPC call to the node and returns its `result`
    ///
    /// # Errors
    /// * `TransportError` - HTTP failure or an `error` object in the response
    /// * `ProtocolError` - The body is not a JSON-RPC response
    async fn rpc_call(&self, method: &str, params: Value) -> Result<Value, MinerError> {
        let request = RpcRequest {
            jsonrpc: "2.0",
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            method,
            params,
        };

        let body = self
            .client
            .post(&self.rpc_url)
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;

        let response: RpcResponse = serde_json::from_slice(&body).map_err(|e| {
            MinerError::ProtocolError(format!("Invalid {} response: {}", method, e))
        })?;
        into_result(method, response)
    }
}

impl WorkSource for NodeClient {
    async fn fetch_job(&self) -> Result<Job, MinerError> {
        let work = self.rpc_call("eth_getWork", json!([])).await?;
        let block_number = self.block_number().await?;
        parse_work(&work, block_number)
    }

    async fn submit_solution(&self, candidate: &Candidate) -> Result<bool, MinerError> {
        let result = self
            .rpc_call("eth_submitWork", submit_params(candidate))
            .await?;
        result.as_bool().ok_or_else(|| {
            MinerError::ProtocolError(format!("eth_submitWork returned non-boolean: {}", result))
        })
    }
}

fn into_result(method: &str, response: RpcResponse) -> Result<Value, MinerError> {
    if let Some(error) = response.error {
        return Err(MinerError::TransportError(format!(
            "{} failed with code {}: {}",
            method, error.code, error.message
        )));
    }
    response
        .result
        .ok_or_else(|| MinerError::ProtocolError(format!("{} response has no result", method)))
}

/// Builds a job from an `eth_getWork` result
///
/// Expects at least `[headerHash, seedHash, target]`, all `0x`-prefixed hex.
pub fn parse_work(work: &Value, block_number: u64) -> Result<Job, MinerError> {
    let fields = work
        .as_array()
        .ok_or_else(|| MinerError::ProtocolError("eth_getWork result is not an array".into()))?;
    if fields.len() < 3 {
        return Err(MinerError::ProtocolError(format!(
            "eth_getWork returned {} fields, expected 3",
            fields.len()
        )));
    }

    let field = |index: usize, name: &str| {
        fields[index]
            .as_str()
            .ok_or_else(|| MinerError::ProtocolError(format!("{} is not a string", name)))
    };

    let header_hash = parse_hash(field(0, "header hash")?)?;
    let seed_hash = parse_hash(field(1, "seed hash")?)?;
    let target = parse_target(field(2, "target")?)?;

    Ok(Job::new(header_hash, seed_hash, target, block_number))
}

/// Parses an `eth_blockNumber` result
pub fn parse_block_number(value: &Value) -> Result<u64, MinerError> {
    let text = value
        .as_str()
        .ok_or_else(|| MinerError::ProtocolError("block number is not a string".into()))?;
    let digits = strip_hex_prefix(text)?;
    u64::from_str_radix(digits, 16)
        .map_err(|e| MinerError::ProtocolError(format!("Invalid block number '{}': {}", text, e)))
}

/// Parameters for `eth_submitWork`: nonce, header hash, mix digest
pub fn submit_params(candidate: &Candidate) -> Value {
    json!([
        hash_to_hex(&candidate.nonce_bytes()),
        hash_to_hex(&candidate.header_hash),
        hash_to_hex(&candidate.mix_digest),
    ])
}

fn parse_hash(text: &str) -> Result<Hash32, MinerError> {
    let bytes = hex::decode(strip_hex_prefix(text)?)?;
    bytes.try_into().map_err(|bytes: Vec<u8>| {
        MinerError::ProtocolError(format!(
            "Expected {}-byte hash, got {} bytes",
            HASH_LEN,
            bytes.len()
        ))
    })
}

fn parse_target(text: &str) -> Result<BigUint, MinerError> {
    let digits = strip_hex_prefix(text)?;
    if digits.is_empty() {
        return Ok(BigUint::default());
    }
    BigUint::parse_bytes(digits.as_bytes(), 16)
        .ok_or_else(|| MinerError::ProtocolError(format!("Invalid target '{}'", text)))
}

/// Strips the `0x` prefix and rejects anything but hex digits after it
fn strip_hex_prefix(text: &str) -> Result<&str, MinerError> {
    let digits = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .ok_or_else(|| MinerError::ProtocolError(format!("Missing 0x prefix in '{}'", text)))?;
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(MinerError::ProtocolError(format!("Invalid hex digits in '{}'", text)));
    }
    Ok(digits)
}
