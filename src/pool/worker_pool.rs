//! Worker pool implementation

use crate::core::{Job, JobId, JobResult, PoolError, Processor, Result};
use crate::pool::collector::ResultCollector;
use crate::pool::config::PoolConfig;
use crate::pool::stats::{StatsAggregator, StatsSnapshot};
use crate::pool::worker::{Worker, WorkerContext};
use crate::queue::{BoundedQueue, QueueError};
use log::{debug, info, warn};
use parking_lot::Mutex;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Lifecycle of a [`WorkerPool`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolState {
    /// Constructed, no workers yet
    Created,
    /// Workers running, submissions accepted
    Running,
    /// Job queue closed, workers finishing the backlog
    Draining,
    /// Workers joined and result queue closed
    Terminated,
}

impl PoolState {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => PoolState::Created,
            1 => PoolState::Running,
            2 => PoolState::Draining,
            _ => PoolState::Terminated,
        }
    }
}

impl fmt::Display for PoolState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PoolState::Created => "created",
            PoolState::Running => "running",
            PoolState::Draining => "draining",
            PoolState::Terminated => "terminated",
        };
        f.write_str(name)
    }
}

/// A fixed-size pool of workers fed by a bounded job queue
///
/// Jobs flow through a bounded job queue to `worker_count` threads; each
/// processed job yields one [`JobResult`] on a bounded result queue and one
/// update of the pool statistics.
///
/// # Shutdown Mechanism
///
/// 1. [`stop()`](Self::stop) closes the job queue; new submissions fail
///    with [`PoolError::QueueClosed`].
/// 2. Workers finish every job already queued, then exit.
/// 3. [`collect()`](Self::collect) joins the workers, closes the result
///    queue and returns the results with a final snapshot.
///
/// [`abort()`](Self::abort) replaces step 1 when queued jobs should be
/// handed back instead of processed.
///
/// # Example
///
/// ```rust
/// use rust_worker_pool::prelude::*;
///
/// # fn main() -> Result<()> {
/// let pool = WorkerPool::new(PoolConfig::new(3, 5), |job: &Job<String>| {
///     Outcome::succeeded(format!("processed {}", job.payload()))
/// })?;
/// pool.start()?;
///
/// for i in 1..=10 {
///     pool.submit(Job::new(i, format!("job {}", i)))?;
/// }
/// pool.stop()?;
///
/// let (results, stats) = pool.collect()?;
/// assert_eq!(results.len(), 10);
/// assert_eq!(stats.processed, 10);
/// # Ok(())
/// # }
/// ```
pub struct WorkerPool<P: Send + 'static = String> {
    config: PoolConfig,
    jobs: Arc<BoundedQueue<Job<P>>>,
    results: Arc<BoundedQueue<JobResult>>,
    stats: Arc<StatsAggregator>,
    processor: Arc<dyn Processor<P>>,
    workers: Mutex<Vec<Worker>>,
    state: AtomicU8,
    collected: AtomicBool,
    next_job_id: AtomicU64,
    total_jobs_submitted: AtomicU64,
}

impl<P: Send + 'static> fmt::Debug for WorkerPool<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkerPool")
            .field("config", &self.config)
            .field("state", &self.state())
            .field("queued_jobs", &self.jobs.len())
            .field(
                "total_jobs_submitted",
                &self.total_jobs_submitted.load(Ordering::Relaxed),
            )
            .finish()
    }
}

impl<P: Send + 'static> WorkerPool<P> {
    /// Create a pool with the given configuration and work function
    ///
    /// Both queues are allocated here; their capacities never change.
    pub fn new(config: PoolConfig, processor: impl Processor<P> + 'static) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            jobs: Arc::new(BoundedQueue::new(config.job_queue_capacity)),
            results: Arc::new(BoundedQueue::new(config.result_queue_capacity)),
            stats: Arc::new(StatsAggregator::new(config.worker_count)),
            processor: Arc::new(processor),
            workers: Mutex::new(Vec::new()),
            state: AtomicU8::new(PoolState::Created as u8),
            collected: AtomicBool::new(false),
            next_job_id: AtomicU64::new(1),
            total_jobs_submitted: AtomicU64::new(0),
            config,
        })
    }

    /// Create a pool with `worker_count` workers and equal job and result
    /// queue capacities
    pub fn with_workers(
        worker_count: usize,
        queue_capacity: usize,
        processor: impl Processor<P> + 'static,
    ) -> Result<Self> {
        Self::new(PoolConfig::new(worker_count, queue_capacity), processor)
    }

    /// Spawn the workers, with IDs `1..=worker_count`
    ///
    /// # Errors
    ///
    /// - [`PoolError::AlreadyStarted`] on any call after the first; no
    ///   additional workers are spawned.
    /// - [`PoolError::SpawnError`] if a thread could not be created. Workers
    ///   already spawned are shut down and the pool is terminated.
    pub fn start(&self) -> Result<()> {
        // Held across the transition so collect() never sees a running pool
        // without its workers
        let mut workers = self.workers.lock();

        if self
            .state
            .compare_exchange(
                PoolState::Created as u8,
                PoolState::Running as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_err()
        {
            return Err(PoolError::already_started(self.config.worker_count));
        }

        let context = WorkerContext {
            jobs: Arc::clone(&self.jobs),
            results: Arc::clone(&self.results),
            processor: Arc::clone(&self.processor),
            stats: Arc::clone(&self.stats),
        };

        let mut spawned = Vec::with_capacity(self.config.worker_count);
        for id in 1..=self.config.worker_count {
            match Worker::spawn(id, &self.config.thread_name_prefix, context.clone()) {
                Ok(worker) => spawned.push(worker),
                Err(e) => {
                    warn!("failed to start worker {}: {}, shutting pool down", id, e);
                    self.jobs.close();
                    self.results.close();
                    for worker in spawned {
                        let _ = worker.join();
                    }
                    self.state
                        .store(PoolState::Terminated as u8, Ordering::Release);
                    return Err(e);
                }
            }
        }

        *workers = spawned;
        info!(
            "worker pool started: {} workers, job queue capacity {}, result queue capacity {}",
            self.config.worker_count,
            self.config.job_queue_capacity,
            self.config.result_queue_capacity
        );
        Ok(())
    }

    fn ensure_started(&self) -> Result<()> {
        if self.state() == PoolState::Created {
            Err(PoolError::PoolNotStarted)
        } else {
            Ok(())
        }
    }

    fn record_submission(&self, job_id: JobId) {
        self.total_jobs_submitted.fetch_add(1, Ordering::Relaxed);
        log::trace!("job {} queued", job_id);
    }

    /// Submit a job, blocking while the job queue is full
    ///
    /// # Errors
    ///
    /// - [`PoolError::PoolNotStarted`] before [`start()`](Self::start)
    /// - [`PoolError::QueueClosed`] after [`stop()`](Self::stop); the job is
    ///   not queued
    pub fn submit(&self, job: Job<P>) -> Result<()> {
        self.ensure_started()?;
        let job_id = job.id();
        self.jobs
            .push(job)
            .map_err(|_| PoolError::queue_closed(job_id))?;
        self.record_submission(job_id);
        Ok(())
    }

    /// Submit a payload under a generated job ID
    ///
    /// IDs are generated monotonically starting at 1. Mixing generated and
    /// caller-assigned IDs on one pool is the caller's responsibility.
    pub fn submit_payload(&self, payload: P) -> Result<JobId> {
        let job_id = self.next_job_id.fetch_add(1, Ordering::Relaxed);
        self.submit(Job::new(job_id, payload))?;
        Ok(job_id)
    }

    /// Attempts to submit a job without blocking.
    ///
    /// # Errors
    ///
    /// - [`PoolError::PoolNotStarted`] before [`start()`](Self::start)
    /// - [`PoolError::QueueFull`] if the job queue is at capacity
    /// - [`PoolError::QueueClosed`] after [`stop()`](Self::stop)
    pub fn try_submit(&self, job: Job<P>) -> Result<()> {
        self.ensure_started()?;
        let job_id = job.id();
        self.jobs.try_push(job).map_err(|e| match e {
            QueueError::Full(_) => PoolError::queue_full(self.jobs.capacity()),
            _ => PoolError::queue_closed(job_id),
        })?;
        self.record_submission(job_id);
        Ok(())
    }

    /// Submits a job, waiting at most `timeout` for queue space.
    ///
    /// # Errors
    ///
    /// - [`PoolError::PoolNotStarted`] before [`start()`](Self::start)
    /// - [`PoolError::SubmissionTimeout`] if no space became available
    /// - [`PoolError::QueueClosed`] after [`stop()`](Self::stop)
    pub fn submit_timeout(&self, job: Job<P>, timeout: Duration) -> Result<()> {
        self.ensure_started()?;
        let job_id = job.id();
        self.jobs.push_timeout(job, timeout).map_err(|e| match e {
            QueueError::Timeout(_) => PoolError::submission_timeout(timeout.as_millis() as u64),
            _ => PoolError::queue_closed(job_id),
        })?;
        self.record_submission(job_id);
        Ok(())
    }

    /// Stop accepting jobs and let workers drain the backlog
    ///
    /// Jobs already queued are still processed; in-flight jobs are never
    /// cancelled. Second and subsequent calls are no-ops.
    ///
    /// # Errors
    ///
    /// [`PoolError::PoolNotStarted`] before [`start()`](Self::start)
    pub fn stop(&self) -> Result<()> {
        self.ensure_started()?;
        if self
            .state
            .compare_exchange(
                PoolState::Running as u8,
                PoolState::Draining as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_ok()
        {
            debug!("worker pool draining, {} jobs queued", self.jobs.len());
        }
        self.jobs.close();
        Ok(())
    }

    /// Stop accepting jobs and hand back every job still queued
    ///
    /// The returned jobs will never be processed and never produce a
    /// result. Jobs already picked up by a worker still complete.
    ///
    /// # Errors
    ///
    /// [`PoolError::PoolNotStarted`] before [`start()`](Self::start)
    pub fn abort(&self) -> Result<Vec<Job<P>>> {
        self.stop()?;
        let residual = self.jobs.drain();
        if !residual.is_empty() {
            warn!("worker pool aborted with {} jobs still queued", residual.len());
        }
        Ok(residual)
    }

    /// Wait for the workers to finish and return every result
    ///
    /// Results come back in the order workers published them, which is
    /// completion order, not submission order. The final snapshot is taken
    /// after every worker has exited.
    ///
    /// Blocks until the pool is stopped, possibly by another thread.
    ///
    /// # Errors
    ///
    /// - [`PoolError::PoolNotStarted`] before [`start()`](Self::start)
    /// - [`PoolError::AlreadyCollected`] on the second call
    /// - [`PoolError::JoinError`] if a worker thread panicked
    pub fn collect(&self) -> Result<(Vec<JobResult>, StatsSnapshot)> {
        self.ensure_started()?;
        if self
            .collected
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(PoolError::AlreadyCollected);
        }

        let workers = std::mem::take(&mut *self.workers.lock());
        let results = ResultCollector::new(Arc::clone(&self.results)).collect(workers);
        self.state
            .store(PoolState::Terminated as u8, Ordering::Release);

        let results = results?;
        let snapshot = self.stats.snapshot();
        info!(
            "worker pool terminated: {} processed, {} succeeded, {} failed",
            snapshot.processed, snapshot.succeeded, snapshot.failed
        );
        Ok((results, snapshot))
    }

    /// Live statistics; may be called at any time
    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    /// Current lifecycle state
    pub fn state(&self) -> PoolState {
        PoolState::from_u8(self.state.load(Ordering::Acquire))
    }

    /// Check if the pool accepts submissions
    pub fn is_running(&self) -> bool {
        self.state() == PoolState::Running
    }

    /// Get the number of workers
    pub fn worker_count(&self) -> usize {
        self.config.worker_count
    }

    /// Get the configuration the pool was built with
    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    /// Number of jobs waiting in the job queue (approximate)
    pub fn queued_jobs(&self) -> usize {
        self.jobs.len()
    }

    /// Get total number of jobs accepted by the job queue
    pub fn total_jobs_submitted(&self) -> u64 {
        self.total_jobs_submitted.load(Ordering::Relaxed)
    }
}

impl<P: Send + 'static> Drop for WorkerPool<P> {
    fn drop(&mut self) {
        if self.collected.load(Ordering::Acquire) {
            return;
        }
        // Force termination: discard the backlog and release workers blocked
        // on a full result queue
        self.jobs.close();
        let discarded = self.jobs.drain().len();
        if discarded > 0 {
            warn!(
                "worker pool dropped with {} queued jobs, discarding them",
                discarded
            );
        }
        self.results.close();

        for worker in std::mem::take(self.workers.get_mut()) {
            let id = worker.id();
            if let Err(e) = worker.join() {
                log::error!("failed to join worker {} during drop: {}", id, e);
            }
        }
        self.state
            .store(PoolState::Terminated as u8, Ordering::Release);
    }
}
