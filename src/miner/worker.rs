// src/miner/worker.rs
//! Worker slot implementation
//!
//! A slot is a long-lived thread with its own job inbox. Every job it
//! receives preempts the search it started previously: the old search's
//! token is cancelled without waiting for it to exit, then a new search is
//! spawned on its own thread. The old and new searches may overlap briefly.

use crate::miner::search::{SearchOutcome, Searcher};
use crate::network::WorkSource;
use crate::stats::ShareResult;
use crate::types::{Candidate, Job};
use crate::utils::error::MinerError;
use crossbeam_channel::{Receiver, Sender};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use std::sync::Arc;
use std::thread::JoinHandle;
use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;

/// One persistent search supervisor
pub struct WorkerSlot<S: WorkSource> {
    /// Slot index, used in thread names and logs
    id: usize,
    /// Source of starting nonces, private to this slot
    rng: StdRng,
    /// Where solutions are submitted
    source: Arc<S>,
    /// Runs the nonce search
    searcher: Searcher,
    /// Runtime used to drive submissions from search threads
    runtime: Handle,
    /// Submission outcomes for statistics
    share_sender: Option<Sender<ShareResult>>,
}

impl<S: WorkSource> WorkerSlot<S> {
    /// Creates a slot
    ///
    /// # Arguments
    /// * `id` - Slot index
    /// * `seed` - Seed for this slot's starting nonces; use distinct seeds per slot
    /// * `source` - Work source used to submit solutions
    /// * `searcher` - Search configuration
    /// * `runtime` - Handle of the runtime the work source runs on
    pub fn new(id: usize, seed: u64, source: Arc<S>, searcher: Searcher, runtime: Handle) -> Self {
        WorkerSlot {
            id,
            rng: StdRng::seed_from_u64(seed),
            source,
            searcher,
            runtime,
            share_sender: None,
        }
    }

    /// Reports submission outcomes to a statistics channel
    pub fn with_share_sender(mut self, sender: Sender<ShareResult>) -> Self {
        self.share_sender = Some(sender);
        self
    }

    /// Starts the slot thread
    ///
    /// # Returns
    /// The sender feeding this slot's inbox and the slot thread's handle.
    /// The slot runs until every sender for its inbox is dropped.
    pub fn spawn(self) -> Result<(Sender<Arc<Job>>, JoinHandle<()>), MinerError> {
        let (job_sender, job_receiver) = crossbeam_channel::unbounded();
        let handle = std::thread::Builder::new()
            .name(format!("worker-{}", self.id))
            .spawn(move || self.run(job_receiver))?;
        Ok((job_sender, handle))
    }

    fn run(mut self, jobs: Receiver<Arc<Job>>) {
        let mut current: Option<CancellationToken> = None;

        for job in jobs.iter() {
            if let Some(previous) = current.take() {
                previous.cancel();
            }

            let token = CancellationToken::new();
            let start_nonce = self.rng.next_u64();
            match self.start_search(job, start_nonce, token.clone()) {
                Ok(_) => current = Some(token),
                Err(e) => log::error!("Worker {}: failed to start search: {}", self.id, e),
            }
        }

        if let Some(last) = current {
            last.cancel();
        }
        log::debug!("Worker {}: inbox closed, stopping", self.id);
    }

    fn start_search(
        &self,
        job: Arc<Job>,
        start_nonce: u64,
        cancel: CancellationToken,
    ) -> Result<JoinHandle<()>, MinerError> {
        let task = SearchTask {
            worker_id: self.id,
            job,
            start_nonce,
            cancel,
            source: Arc::clone(&self.source),
            searcher: self.searcher.clone(),
            runtime: self.runtime.clone(),
            share_sender: self.share_sender.clone(),
        };

        let handle = std::thread::Builder::new()
            .name(format!("search-{}", self.id))
            .spawn(move || task.run())?;
        Ok(handle)
    }
}

/// One search invocation plus the submission of its result
struct SearchTask<S: WorkSource> {
    worker_id: usize,
    job: Arc<Job>,
    start_nonce: u64,
    cancel: CancellationToken,
    source: Arc<S>,
    searcher: Searcher,
    runtime: Handle,
    share_sender: Option<Sender<ShareResult>>,
}

impl<S: WorkSource> SearchTask<S> {
    fn run(self) {
        log::info!(
            "Worker {}: starting search on {} with nonce={}",
            self.worker_id,
            self.job.job_id(),
            self.start_nonce
        );

        match self.searcher.search(&self.job, self.start_nonce, &self.cancel) {
            SearchOutcome::Found(candidate) => self.submit(candidate),
            SearchOutcome::Cancelled => {
                log::debug!(
                    "Worker {}: search on {} cancelled",
                    self.worker_id,
                    self.job.job_id()
                );
            }
        }
    }

    /// Submits once; the outcome never restarts the search
    fn submit(&self, candidate: Candidate) {
        log::info!(
            "Worker {}: valid solution found (nonce={}), submitting to node",
            self.worker_id,
            candidate.nonce
        );

        let result = match self.runtime.block_on(self.source.submit_solution(&candidate)) {
            Ok(true) => {
                log::info!("Worker {}: solution accepted by the node", self.worker_id);
                ShareResult::Accepted
            }
            Ok(false) => {
                log::warn!("Worker {}: solution rejected by the node", self.worker_id);
                ShareResult::Rejected
            }
            Err(e) => {
                log::warn!("Worker {}: submission failed: {}", self.worker_id, e);
                ShareResult::Failed
            }
        };

        if let Some(sender) = &self.share_sender {
            let _ = sender.send(result);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::miner::algorithm::Blake3Chain;
    use crate::network::source::mock::MockSource;
    use num_bigint::BigUint;
    use std::time::Duration;

    const WAIT: Duration = Duration::from_secs(10);

    fn job(tag: u8, target: BigUint) -> Arc<Job> {
        let mut header = [0u8; 32];
        header[31] = tag;
        Arc::new(Job::new(header, [0u8; 32], target, u64::from(tag)))
    }

    fn max_target() -> BigUint {
        BigUint::from_bytes_be(&[0xff; 32])
    }

    fn slot(source: Arc<MockSource>, seed: u64) -> WorkerSlot<MockSource> {
        let searcher = Searcher::new(Arc::new(Blake3Chain::new(32)));
        WorkerSlot::new(0, seed, source, searcher, Handle::current())
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn solves_trivial_job_with_first_nonce() {
        let (source, submitted) = MockSource::new(Vec::new(), true);
        let (shares_tx, shares_rx) = crossbeam_channel::unbounded();
        let (inbox, _handle) = slot(Arc::new(source), 7)
            .with_share_sender(shares_tx)
            .spawn()
            .unwrap();

        let job = job(1, max_target());
        inbox.send(Arc::clone(&job)).unwrap();

        let candidate = submitted.recv_timeout(WAIT).unwrap();
        let expected_nonce = StdRng::seed_from_u64(7).next_u64();
        assert_eq!(candidate.nonce, expected_nonce);
        assert_eq!(candidate.header_hash, *job.header_hash());
        assert!(matches!(shares_rx.recv_timeout(WAIT), Ok(ShareResult::Accepted)));

        // Exactly one submission for one trivial job
        assert!(submitted.recv_timeout(Duration::from_millis(200)).is_err());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn rejected_solution_does_not_stop_slot() {
        let (source, submitted) = MockSource::new(Vec::new(), false);
        let (shares_tx, shares_rx) = crossbeam_channel::unbounded();
        let (inbox, _handle) = slot(Arc::new(source), 11)
            .with_share_sender(shares_tx)
            .spawn()
            .unwrap();

        inbox.send(job(1, max_target())).unwrap();
        assert_eq!(submitted.recv_timeout(WAIT).unwrap().header_hash[31], 1);
        assert!(matches!(shares_rx.recv_timeout(WAIT), Ok(ShareResult::Rejected)));

        inbox.send(job(2, max_target())).unwrap();
        assert_eq!(submitted.recv_timeout(WAIT).unwrap().header_hash[31], 2);
        assert!(submitted.recv_timeout(Duration::from_millis(200)).is_err());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn new_job_preempts_unsolvable_search() {
        let (source, submitted) = MockSource::new(Vec::new(), true);
        let (inbox, _handle) = slot(Arc::new(source), 3).spawn().unwrap();

        inbox.send(job(1, BigUint::from(0u32))).unwrap();
        std::thread::sleep(Duration::from_millis(50));
        inbox.send(job(2, max_target())).unwrap();

        let candidate = submitted.recv_timeout(WAIT).unwrap();
        assert_eq!(candidate.header_hash[31], 2);
        assert!(submitted.recv_timeout(Duration::from_millis(200)).is_err());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn slot_stops_when_inbox_closes() {
        let (source, submitted) = MockSource::new(Vec::new(), true);
        let (inbox, handle) = slot(Arc::new(source), 5).spawn().unwrap();

        inbox.send(job(1, BigUint::from(0u32))).unwrap();
        drop(inbox);

        tokio::task::spawn_blocking(move || handle.join())
            .await
            .unwrap()
            .expect("slot thread panicked");
        assert!(submitted.try_recv().is_err());
    }
}
