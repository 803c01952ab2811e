//! Aggregate statistics for a worker pool.
//!
//! [`StatsAggregator`] is mutated by worker threads and read by anyone.
//! Every update touches all counters under one lock, so a
//! [`StatsSnapshot`] always satisfies `processed == succeeded + failed`
//! and `sum(by_worker) == processed`.

use crate::core::{JobStatus, PoolError, Result, WorkerId};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// Point-in-time copy of pool statistics.
///
/// Owned data: mutating a snapshot never affects the live aggregator.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    /// Jobs processed, successful or not.
    pub processed: u64,

    /// Jobs whose outcome was `Succeeded`.
    pub succeeded: u64,

    /// Jobs whose outcome was `Failed`.
    pub failed: u64,

    /// Jobs processed per worker. Holds an entry for every worker `1..=N`.
    pub by_worker: BTreeMap<WorkerId, u64>,

    /// Total time spent inside the work function.
    pub total_processing_time: Duration,
}

impl StatsSnapshot {
    /// Returns the success rate as a percentage (0.0 to 100.0).
    pub fn success_rate(&self) -> f64 {
        if self.processed == 0 {
            100.0
        } else {
            (self.succeeded as f64 / self.processed as f64) * 100.0
        }
    }

    /// Returns the failure rate as a percentage (0.0 to 100.0).
    pub fn failure_rate(&self) -> f64 {
        100.0 - self.success_rate()
    }

    /// Average time spent per processed job.
    pub fn average_processing_time(&self) -> Duration {
        match u32::try_from(self.processed) {
            Ok(0) => Duration::ZERO,
            Ok(count) => self.total_processing_time / count,
            Err(_) => Duration::from_secs_f64(
                self.total_processing_time.as_secs_f64() / self.processed as f64,
            ),
        }
    }

    /// Number of workers the snapshot covers.
    pub fn worker_count(&self) -> usize {
        self.by_worker.len()
    }
}

struct Counters {
    processed: u64,
    succeeded: u64,
    failed: u64,
    /// Index `id - 1` holds the count for worker `id`
    per_worker: Box<[u64]>,
    total_processing_time: Duration,
}

/// Thread-safe statistics tracker shared by all workers of a pool.
pub struct StatsAggregator {
    counters: Mutex<Counters>,
}

impl StatsAggregator {
    /// Creates a tracker for workers `1..=worker_count`.
    pub fn new(worker_count: usize) -> Self {
        Self {
            counters: Mutex::new(Counters {
                processed: 0,
                succeeded: 0,
                failed: 0,
                per_worker: vec![0; worker_count].into_boxed_slice(),
                total_processing_time: Duration::ZERO,
            }),
        }
    }

    /// Number of worker slots.
    pub fn worker_count(&self) -> usize {
        self.counters.lock().per_worker.len()
    }

    /// Records one processed job for `worker_id`.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::UnknownWorker`] if `worker_id` is outside
    /// `1..=worker_count`; nothing is recorded in that case.
    pub fn record(&self, worker_id: WorkerId, status: JobStatus, elapsed: Duration) -> Result<()> {
        let mut counters = self.counters.lock();
        let worker_count = counters.per_worker.len();
        let index = match worker_id.checked_sub(1) {
            Some(index) if index < worker_count => index,
            _ => return Err(PoolError::unknown_worker(worker_id, worker_count)),
        };

        counters.per_worker[index] += 1;
        counters.processed += 1;
        match status {
            JobStatus::Succeeded => counters.succeeded += 1,
            JobStatus::Failed => counters.failed += 1,
        }
        counters.total_processing_time += elapsed;
        Ok(())
    }

    /// Records a successful job.
    pub fn record_success(&self, worker_id: WorkerId, elapsed: Duration) -> Result<()> {
        self.record(worker_id, JobStatus::Succeeded, elapsed)
    }

    /// Records a failed job.
    pub fn record_failure(&self, worker_id: WorkerId, elapsed: Duration) -> Result<()> {
        self.record(worker_id, JobStatus::Failed, elapsed)
    }

    /// Returns a snapshot of the current statistics.
    pub fn snapshot(&self) -> StatsSnapshot {
        let counters = self.counters.lock();
        StatsSnapshot {
            processed: counters.processed,
            succeeded: counters.succeeded,
            failed: counters.failed,
            by_worker: counters
                .per_worker
                .iter()
                .enumerate()
                .map(|(index, count)| (index + 1, *count))
                .collect(),
            total_processing_time: counters.total_processing_time,
        }
    }
}

impl std::fmt::Debug for StatsAggregator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatsAggregator")
            .field("snapshot", &self.snapshot())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_snapshot_default() {
        let stats = StatsAggregator::new(3);
        let snapshot = stats.snapshot();
        assert_eq!(snapshot.processed, 0);
        assert_eq!(snapshot.succeeded, 0);
        assert_eq!(snapshot.failed, 0);
        assert_eq!(snapshot.worker_count(), 3);
        assert!(snapshot.by_worker.values().all(|count| *count == 0));
    }

    #[test]
    fn test_record_success_and_failure() {
        let stats = StatsAggregator::new(2);
        stats.record_success(1, Duration::from_millis(10)).unwrap();
        stats.record_failure(2, Duration::from_millis(20)).unwrap();
        stats.record_success(2, Duration::from_millis(30)).unwrap();

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.processed, 3);
        assert_eq!(snapshot.succeeded, 2);
        assert_eq!(snapshot.failed, 1);
        assert_eq!(snapshot.by_worker[&1], 1);
        assert_eq!(snapshot.by_worker[&2], 2);
        assert_eq!(snapshot.total_processing_time, Duration::from_millis(60));
        assert_eq!(snapshot.average_processing_time(), Duration::from_millis(20));
    }

    #[test]
    fn test_unknown_worker_rejected() {
        let stats = StatsAggregator::new(2);
        assert!(matches!(
            stats.record_success(0, Duration::ZERO),
            Err(PoolError::UnknownWorker { worker_id: 0, .. })
        ));
        assert!(matches!(
            stats.record_failure(3, Duration::ZERO),
            Err(PoolError::UnknownWorker { worker_id: 3, worker_count: 2 })
        ));
        assert_eq!(stats.snapshot(), StatsAggregator::new(2).snapshot());
    }

    #[test]
    fn test_snapshot_is_detached() {
        let stats = StatsAggregator::new(1);
        stats.record_success(1, Duration::ZERO).unwrap();

        let mut snapshot = stats.snapshot();
        snapshot.processed = 100;
        snapshot.by_worker.insert(1, 100);

        let fresh = stats.snapshot();
        assert_eq!(fresh.processed, 1);
        assert_eq!(fresh.by_worker[&1], 1);
    }

    #[test]
    fn test_success_rate() {
        let snapshot = StatsSnapshot {
            processed: 10,
            succeeded: 8,
            failed: 2,
            ..Default::default()
        };
        assert!((snapshot.success_rate() - 80.0).abs() < 0.01);
        assert!((snapshot.failure_rate() - 20.0).abs() < 0.01);
        assert!((StatsSnapshot::default().success_rate() - 100.0).abs() < 0.01);
    }

    #[test]
    fn test_concurrent_snapshots_stay_consistent() {
        let workers = 4;
        let per_worker = 2_000;
        let stats = Arc::new(StatsAggregator::new(workers));

        let writers: Vec<_> = (1..=workers)
            .map(|id| {
                let stats = Arc::clone(&stats);
                thread::spawn(move || {
                    for i in 0..per_worker {
                        let status = if i % 3 == 0 {
                            JobStatus::Failed
                        } else {
                            JobStatus::Succeeded
                        };
                        stats.record(id, status, Duration::ZERO).unwrap();
                    }
                })
            })
            .collect();

        let reader = {
            let stats = Arc::clone(&stats);
            thread::spawn(move || {
                for _ in 0..500 {
                    let snapshot = stats.snapshot();
                    assert_eq!(snapshot.processed, snapshot.succeeded + snapshot.failed);
                    assert_eq!(snapshot.by_worker.values().sum::<u64>(), snapshot.processed);
                }
            })
        };

        for writer in writers {
            writer.join().unwrap();
        }
        reader.join().unwrap();

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.processed, (workers * per_worker) as u64);
        assert!(snapshot.by_worker.values().all(|count| *count == per_worker as u64));
    }
}
