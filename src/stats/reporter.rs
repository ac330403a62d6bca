// src/stats/reporter.rs
use crossbeam_channel::{Receiver, Sender};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use sysinfo::System;

/// Snapshot of mining counters
#[derive(Debug, Clone, Default)]
pub struct MiningStats {
    /// Total hash evaluations across all searches
    pub hashes_total: u64,
    /// Solutions accepted by the node
    pub solutions_accepted: u64,
    /// Solutions rejected by the node
    pub solutions_rejected: u64,
    /// Solutions that could not be submitted
    pub submissions_failed: u64,
    /// Average hash evaluations per second since start
    pub avg_hashrate: f64,
}

/// Process-level resource usage
#[derive(Debug, Clone)]
pub struct HardwareStats {
    /// Average CPU usage across cores (0-100)
    pub cpu_usage: f32,
    /// Memory in use on the host (in bytes)
    pub memory_used: u64,
}

/// Outcome of one solution submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareResult {
    /// The node accepted the solution
    Accepted,
    /// The node answered `false`
    Rejected,
    /// The node could not be reached
    Failed,
}

/// Collects and periodically logs mining statistics
pub struct StatsReporter {
    stats: Arc<MiningStatsAtomic>,
    report_interval: Duration,
}

struct MiningStatsAtomic {
    hashes: AtomicU64,
    accepted: AtomicU64,
    rejected: AtomicU64,
    failed: AtomicU64,
    start_time: Instant,
}

impl StatsReporter {
    /// Creates a reporter that logs every `report_interval`
    pub fn new(report_interval: Duration) -> Self {
        StatsReporter {
            stats: Arc::new(MiningStatsAtomic {
                hashes: AtomicU64::new(0),
                accepted: AtomicU64::new(0),
                rejected: AtomicU64::new(0),
                failed: AtomicU64::new(0),
                start_time: Instant::now(),
            }),
            report_interval,
        }
    }

    /// Returns a sender for submission outcomes
    ///
    /// Outcomes are counted on a background thread until every clone of the
    /// sender is dropped.
    pub fn share_sender(&self) -> Sender<ShareResult> {
        let (tx, rx) = crossbeam_channel::unbounded();
        self.start_share_listener(rx);
        tx
    }

    /// Returns a sender for hash evaluation counts
    pub fn hash_sender(&self) -> Sender<u64> {
        let (tx, rx) = crossbeam_channel::unbounded();
        self.start_hashrate_listener(rx);
        tx
    }

    /// Current counters
    pub fn get_stats(&self) -> MiningStats {
        snapshot(&self.stats)
    }

    /// Starts the periodic log line on a background thread
    pub fn start_reporting(&self) {
        let stats = self.stats.clone();
        let interval = self.report_interval;

        std::thread::spawn(move || {
            let mut system = System::new();

            loop {
                std::thread::sleep(interval);
                let mining_stats = snapshot(&stats);
                let hw_stats = hardware_stats(&mut system);

                log::info!(
                    "Hashrate: {:.2} H/s | Accepted/Rejected/Failed: {}/{}/{} | CPU: {:.1}% | Mem: {} MiB",
                    mining_stats.avg_hashrate,
                    mining_stats.solutions_accepted,
                    mining_stats.solutions_rejected,
                    mining_stats.submissions_failed,
                    hw_stats.cpu_usage,
                    hw_stats.memory_used / (1024 * 1024)
                );
            }
        });
    }

    fn start_share_listener(&self, receiver: Receiver<ShareResult>) {
        let stats = self.stats.clone();

        std::thread::spawn(move || {
            for result in receiver {
                let counter = match result {
                    ShareResult::Accepted => &stats.accepted,
                    ShareResult::Rejected => &stats.rejected,
                    ShareResult::Failed => &stats.failed,
                };
                counter.fetch_add(1, Ordering::Relaxed);
            }
        });
    }

    fn start_hashrate_listener(&self, receiver: Receiver<u64>) {
        let stats = self.stats.clone();

        std::thread::spawn(move || {
            for count in receiver {
                stats.hashes.fetch_add(count, Ordering::Relaxed);
            }
        });
    }
}

fn snapshot(stats: &MiningStatsAtomic) -> MiningStats {
    let elapsed = stats.start_time.elapsed().as_secs_f64().max(1.0);
    let hashes = stats.hashes.load(Ordering::Relaxed);

    MiningStats {
        hashes_total: hashes,
        solutions_accepted: stats.accepted.load(Ordering::Relaxed),
        solutions_rejected: stats.rejected.load(Ordering::Relaxed),
        submissions_failed: stats.failed.load(Ordering::Relaxed),
        avg_hashrate: hashes as f64 / elapsed,
    }
}

fn hardware_stats(system: &mut System) -> HardwareStats {
    system.refresh_cpu_all();
    system.refresh_memory();

    let cpus = system.cpus();
    let cpu_usage = if cpus.is_empty() {
        0.0
    } else {
        cpus.iter().map(|c| c.cpu_usage()).sum::<f32>() / cpus.len() as f32
    };

    HardwareStats {
        cpu_usage,
        memory_used: system.used_memory(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wait_for(reporter: &StatsReporter, check: impl Fn(&MiningStats) -> bool) -> MiningStats {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            let stats = reporter.get_stats();
            if check(&stats) || Instant::now() > deadline {
                return stats;
            }
            std::thread::sleep(Duration::from_millis(10));
        }
    }

    #[test]
    fn counts_submission_outcomes() {
        let reporter = StatsReporter::new(Duration::from_secs(60));
        let sender = reporter.share_sender();
        for result in [
            ShareResult::Accepted,
            ShareResult::Accepted,
            ShareResult::Rejected,
            ShareResult::Failed,
        ] {
            sender.send(result).unwrap();
        }

        let stats = wait_for(&reporter, |s| s.submissions_failed == 1 && s.solutions_accepted == 2);
        assert_eq!(stats.solutions_accepted, 2);
        assert_eq!(stats.solutions_rejected, 1);
        assert_eq!(stats.submissions_failed, 1);
    }

    #[test]
    fn sums_hash_counts() {
        let reporter = StatsReporter::new(Duration::from_secs(60));
        let sender = reporter.hash_sender();
        sender.send(312_689).unwrap();
        sender.send(11).unwrap();

        let stats = wait_for(&reporter, |s| s.hashes_total == 312_700);
        assert_eq!(stats.hashes_total, 312_700);
        assert!(stats.avg_hashrate > 0.0);
    }
}
