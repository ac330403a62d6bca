// src/network/source.rs
//! Interface to wherever jobs come from and solutions go to

use crate::types::{Candidate, Job};
use crate::utils::error::MinerError;
use std::future::Future;

/// Remote source of mining jobs
///
/// Shared between the dispatcher and every search, so implementations must
/// handle concurrent calls.
pub trait WorkSource: Send + Sync + 'static {
    /// Fetches the node's current job
    ///
    /// # Errors
    /// * `TransportError` - the node could not be reached or returned an RPC error
    /// * `ProtocolError` - the response was malformed
    fn fetch_job(&self) -> impl Future<Output = Result<Job, MinerError>> + Send;

    /// Submits a solution
    ///
    /// Returns `Ok(true)` if the node accepted it and `Ok(false)` if it was rejected.
    fn submit_solution(
        &self,
        candidate: &Candidate,
    ) -> impl Future<Output = Result<bool, MinerError>> + Send;
}
