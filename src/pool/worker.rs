//! Worker thread implementation

use crate::core::{Job, JobResult, Outcome, PoolError, Processor, Result, WorkerId};
use crate::pool::stats::StatsAggregator;
use crate::queue::BoundedQueue;
use log::{debug, trace, warn};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

#[cfg(feature = "tracing")]
use tracing::{span, Level};

/// Observable state of a worker thread
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    /// Waiting for the next job
    Idle,
    /// Executing the work function
    Running,
    /// Pushing the result onto the result queue
    Publishing,
    /// Job queue reached end-of-stream; the thread has returned
    Exited,
}

impl WorkerState {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => WorkerState::Idle,
            1 => WorkerState::Running,
            2 => WorkerState::Publishing,
            _ => WorkerState::Exited,
        }
    }
}

/// Queues and shared state a worker operates on
pub(crate) struct WorkerContext<P> {
    pub(crate) jobs: Arc<BoundedQueue<Job<P>>>,
    pub(crate) results: Arc<BoundedQueue<JobResult>>,
    pub(crate) processor: Arc<dyn Processor<P>>,
    pub(crate) stats: Arc<StatsAggregator>,
}

impl<P> Clone for WorkerContext<P> {
    fn clone(&self) -> Self {
        Self {
            jobs: Arc::clone(&self.jobs),
            results: Arc::clone(&self.results),
            processor: Arc::clone(&self.processor),
            stats: Arc::clone(&self.stats),
        }
    }
}

/// A worker thread that processes jobs from the job queue
#[derive(Debug)]
pub struct Worker {
    id: WorkerId,
    thread: Option<thread::JoinHandle<()>>,
    state: Arc<AtomicU8>,
}

impl Worker {
    /// Spawn a worker thread named `<name_prefix>-<id>`.
    ///
    /// # Shutdown Behavior
    ///
    /// The worker exits when the job queue is closed and empty, so every job
    /// queued before the close is processed.
    pub(crate) fn spawn<P: Send + 'static>(
        id: WorkerId,
        name_prefix: &str,
        context: WorkerContext<P>,
    ) -> Result<Self> {
        let state = Arc::new(AtomicU8::new(WorkerState::Idle as u8));
        let state_clone = Arc::clone(&state);

        let thread = thread::Builder::new()
            .name(format!("{}-{}", name_prefix, id))
            .spawn(move || Self::run(id, context, &state_clone))
            .map_err(|e| PoolError::spawn_with_source(id, "failed to spawn worker thread", e))?;

        Ok(Self {
            id,
            thread: Some(thread),
            state,
        })
    }

    /// Get worker ID
    pub fn id(&self) -> WorkerId {
        self.id
    }

    /// Current state of the worker
    pub fn state(&self) -> WorkerState {
        WorkerState::from_u8(self.state.load(Ordering::Acquire))
    }

    /// Join the worker thread
    pub fn join(mut self) -> Result<()> {
        if let Some(thread) = self.thread.take() {
            thread
                .join()
                .map_err(|panic| PoolError::join(self.id, panic_message(panic.as_ref())))?;
        }
        Ok(())
    }

    fn set_state(state: &AtomicU8, next: WorkerState) {
        state.store(next as u8, Ordering::Release);
    }

    /// Main worker loop
    fn run<P>(id: WorkerId, context: WorkerContext<P>, state: &AtomicU8) {
        #[cfg(feature = "tracing")]
        let worker_span = span!(Level::DEBUG, "worker", id = id);
        #[cfg(feature = "tracing")]
        let _guard = worker_span.enter();

        debug!("worker {} started", id);
        let mut processed: u64 = 0;

        while let Some(job) = context.jobs.pop() {
            Self::set_state(state, WorkerState::Running);
            let job_id = job.id();
            let (outcome, elapsed) = Self::execute_job(id, &job, context.processor.as_ref());
            let status = outcome.status;

            Self::set_state(state, WorkerState::Publishing);
            let result = JobResult {
                job_id,
                worker_id: id,
                status,
                message: outcome.message,
                elapsed,
            };
            if context.results.push(result).is_err() {
                warn!(
                    "worker {}: result queue closed, result for job {} discarded",
                    id, job_id
                );
            }

            if let Err(e) = context.stats.record(id, status, elapsed) {
                warn!("worker {}: {}", id, e);
            }
            processed += 1;
            Self::set_state(state, WorkerState::Idle);
        }

        Self::set_state(state, WorkerState::Exited);
        debug!("worker {} exiting after {} jobs", id, processed);
    }

    /// Execute a single job with panic protection
    fn execute_job<P>(id: WorkerId, job: &Job<P>, processor: &dyn Processor<P>) -> (Outcome, Duration) {
        #[cfg(feature = "tracing")]
        let job_span = span!(Level::DEBUG, "job", job_id = job.id());
        #[cfg(feature = "tracing")]
        let _job_guard = job_span.enter();

        let start = Instant::now();
        let result = catch_unwind(AssertUnwindSafe(|| processor.process(job)));
        let elapsed = start.elapsed();

        let outcome = match result {
            Ok(outcome) => outcome,
            Err(panic) => {
                let message = panic_message(panic.as_ref());
                warn!("worker {}: job {} panicked: {}", id, job.id(), message);
                Outcome::failed(format!("work function panicked: {}", message))
            }
        };

        if outcome.status.is_success() {
            trace!(
                "worker {}: job {} succeeded in {}us",
                id,
                job.id(),
                elapsed.as_micros()
            );
        } else {
            warn!("worker {}: job {} failed: {}", id, job.id(), outcome.message);
        }

        (outcome, elapsed)
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

impl Drop for Worker {
    fn drop(&mut self) {
        if let Some(thread) = self.thread.take() {
            // Bounded wait so Drop cannot hang on a stuck work function
            const JOIN_TIMEOUT: Duration = Duration::from_secs(5);

            let start = Instant::now();
            while !thread.is_finished() {
                if start.elapsed() >= JOIN_TIMEOUT {
                    warn!(
                        "worker {} did not finish within {}s during drop, detaching",
                        self.id,
                        JOIN_TIMEOUT.as_secs()
                    );
                    return;
                }
                thread::sleep(Duration::from_millis(10));
            }
            if let Err(panic) = thread.join() {
                log::error!(
                    "worker {} panicked during shutdown: {}",
                    self.id,
                    panic_message(panic.as_ref())
                );
            }
        }
    }
}
