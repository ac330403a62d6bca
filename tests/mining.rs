use crossbeam_channel::{Receiver, Sender, unbounded};
use liberty_miner::miner::PollOutcome;
use liberty_miner::*;
use num_bigint::BigUint;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::runtime::Handle;

const WAIT: Duration = Duration::from_secs(10);

/// Node stand-in that replays a fixed sequence of jobs
struct ScriptedNode {
    jobs: Mutex<VecDeque<Job>>,
    accept: bool,
    submitted: Sender<Candidate>,
}

impl ScriptedNode {
    fn new(jobs: Vec<Job>, accept: bool) -> (Arc<Self>, Receiver<Candidate>) {
        let (tx, rx) = unbounded();
        let node = ScriptedNode {
            jobs: Mutex::new(jobs.into()),
            accept,
            submitted: tx,
        };
        (Arc::new(node), rx)
    }
}

impl WorkSource for ScriptedNode {
    async fn fetch_job(&self) -> Result<Job, MinerError> {
        self.jobs
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| MinerError::TransportError("no more work".into()))
    }

    async fn submit_solution(&self, candidate: &Candidate) -> Result<bool, MinerError> {
        self.submitted.send(*candidate).unwrap();
        Ok(self.accept)
    }
}

fn job(tag: u8, target: BigUint) -> Job {
    let mut header = [0u8; 32];
    header[0] = tag;
    Job::new(header, [tag; 32], target, u64::from(tag))
}

fn max_target() -> BigUint {
    BigUint::from_bytes_be(&[0xff; 32])
}

fn start(node: &Arc<ScriptedNode>, slots: usize) -> Dispatcher<ScriptedNode> {
    let searcher = Searcher::new(Arc::new(Blake3Chain::new(128)));
    let mut dispatcher = Dispatcher::new(
        Arc::clone(node),
        Duration::from_millis(5),
        Duration::from_millis(5),
    );
    for id in 0..slots {
        let slot = WorkerSlot::new(
            id,
            1_000 + id as u64,
            Arc::clone(node),
            searcher.clone(),
            Handle::current(),
        );
        let (inbox, _handle) = slot.spawn().unwrap();
        dispatcher.add_slot(inbox);
    }
    dispatcher
}

#[tokio::test(flavor = "multi_thread")]
async fn each_slot_solves_each_new_job() {
    let a = job(0xa, max_target());
    let b = job(0xb, max_target());
    let (node, submitted) = ScriptedNode::new(vec![a.clone(), a.clone(), b.clone()], true);
    let mut dispatcher = start(&node, 3);

    assert_eq!(dispatcher.poll_once().await, PollOutcome::Broadcast(3));
    let mut first: Vec<Candidate> = (0..3).map(|_| submitted.recv_timeout(WAIT).unwrap()).collect();

    assert_eq!(dispatcher.poll_once().await, PollOutcome::Unchanged);
    assert_eq!(dispatcher.poll_once().await, PollOutcome::Broadcast(3));
    let second: Vec<Candidate> = (0..3).map(|_| submitted.recv_timeout(WAIT).unwrap()).collect();

    assert!(first.iter().all(|c| c.header_hash == *a.header_hash()));
    assert!(second.iter().all(|c| c.header_hash == *b.header_hash()));

    // Distinct seeds give each slot its own starting nonce
    first.sort_by_key(|c| c.nonce);
    first.dedup_by_key(|c| c.nonce);
    assert_eq!(first.len(), 3);

    assert!(submitted.recv_timeout(Duration::from_millis(200)).is_err());
}

#[tokio::test(flavor = "multi_thread")]
async fn stale_job_is_abandoned_for_new_one() {
    let stuck = job(1, BigUint::from(0u32));
    let easy = job(2, max_target());
    let (node, submitted) = ScriptedNode::new(vec![stuck, easy.clone()], false);
    let mut dispatcher = start(&node, 2);

    dispatcher.poll_once().await;
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(submitted.try_recv().is_err());

    dispatcher.poll_once().await;
    for _ in 0..2 {
        let candidate = submitted.recv_timeout(WAIT).unwrap();
        assert_eq!(candidate.header_hash, *easy.header_hash());
        assert!(Blake3Chain::new(128).verify(&candidate.header_hash, candidate.nonce, easy.target()));
    }

    // Rejections are not retried and the slots stay alive
    assert!(submitted.recv_timeout(Duration::from_millis(200)).is_err());
    let next = job(3, max_target());
    node.jobs.lock().unwrap().push_back(next.clone());
    assert_eq!(dispatcher.poll_once().await, PollOutcome::Broadcast(2));
    for _ in 0..2 {
        assert_eq!(submitted.recv_timeout(WAIT).unwrap().header_hash, *next.header_hash());
    }
}
