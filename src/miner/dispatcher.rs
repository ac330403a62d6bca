// src/miner/dispatcher.rs
//! Job dispatcher
//!
//! Polls the work source and fans every new job out to all worker slots.
//! Each slot owns a dedicated inbox, so a broadcast reaches every slot
//! individually rather than landing on whichever slot reads a shared queue
//! first.

use crate::network::WorkSource;
use crate::types::Job;
use crossbeam_channel::Sender;
use std::sync::Arc;
use std::time::Duration;

/// What a single poll did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    /// A new job was broadcast to this many slots
    Broadcast(usize),
    /// The node still reports the tracked job
    Unchanged,
    /// Fetching failed; nothing changed
    FetchFailed,
}

/// Polls for jobs and broadcasts changes
pub struct Dispatcher<S: WorkSource> {
    /// Source of jobs
    source: Arc<S>,
    /// One inbox per worker slot
    slots: Vec<Sender<Arc<Job>>>,
    /// Most recently broadcast job, `None` until the first successful fetch
    current_job: Option<Arc<Job>>,
    /// Delay between successful polls
    poll_interval: Duration,
    /// Delay after a failed poll
    retry_backoff: Duration,
}

impl<S: WorkSource> Dispatcher<S> {
    /// Creates a dispatcher with no slots
    pub fn new(source: Arc<S>, poll_interval: Duration, retry_backoff: Duration) -> Self {
        Dispatcher {
            source,
            slots: Vec::new(),
            current_job: None,
            poll_interval,
            retry_backoff,
        }
    }

    /// Registers a slot inbox
    pub fn add_slot(&mut self, inbox: Sender<Arc<Job>>) {
        self.slots.push(inbox);
    }

    /// Number of registered slots
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Job most recently broadcast
    pub fn current_job(&self) -> Option<&Arc<Job>> {
        self.current_job.as_ref()
    }

    /// Polls forever. Fetch failures are logged and retried.
    pub async fn run(&mut self) {
        loop {
            let delay = match self.poll_once().await {
                PollOutcome::FetchFailed => self.retry_backoff,
                PollOutcome::Broadcast(_) | PollOutcome::Unchanged => self.poll_interval,
            };
            tokio::time::sleep(delay).await;
        }
    }

    /// Fetches once and broadcasts if the job changed
    pub async fn poll_once(&mut self) -> PollOutcome {
        let job = match self.source.fetch_job().await {
            Ok(job) => job,
            Err(e) => {
                log::warn!("Error fetching work: {}", e);
                return PollOutcome::FetchFailed;
            }
        };

        if let Some(current) = &self.current_job {
            if current.is_same_job(&job) {
                log::debug!("Job {} unchanged", job.job_id());
                return PollOutcome::Unchanged;
            }
        }

        log::info!("New mining job received: {}", job);
        let job = Arc::new(job);
        let delivered = self.broadcast(&job);
        self.current_job = Some(job);
        PollOutcome::Broadcast(delivered)
    }

    /// Sends `job` to every slot inbox and returns how many accepted it
    fn broadcast(&self, job: &Arc<Job>) -> usize {
        self.slots
            .iter()
            .enumerate()
            .filter(|(index, inbox)| match inbox.send(Arc::clone(job)) {
                Ok(()) => true,
                Err(_) => {
                    log::warn!("Worker {} inbox closed, job not delivered", index);
                    false
                }
            })
            .count()
    }
}
