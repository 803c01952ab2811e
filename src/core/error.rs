//! Error types for the worker pool

use crate::core::job::{JobId, WorkerId};

/// Result type for worker pool operations
pub type Result<T> = std::result::Result<T, PoolError>;

/// Errors that can occur in the worker pool
///
/// Individual job failures are never reported through this type: a failed
/// job produces a normal [`JobResult`](crate::core::JobResult) with status
/// [`Failed`](crate::core::JobStatus::Failed).
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum PoolError {
    /// The job queue has been closed by `stop()` or `abort()`
    #[error("Job queue is closed, job {job_id} was not accepted")]
    QueueClosed {
        /// ID of the rejected job
        job_id: JobId,
    },

    /// `start()` was called on a pool that was already started
    #[error("Worker pool is already started with {worker_count} workers")]
    AlreadyStarted {
        /// Number of workers spawned by the first start
        worker_count: usize,
    },

    /// An operation that needs running workers was called before `start()`
    #[error("Worker pool has not been started")]
    PoolNotStarted,

    /// `collect()` was called a second time
    #[error("Results have already been collected")]
    AlreadyCollected,

    /// Non-blocking submission found the job queue at capacity
    #[error("Job queue is full ({capacity} jobs queued)")]
    QueueFull {
        /// Capacity of the job queue
        capacity: usize,
    },

    /// Job submission timed out waiting for queue space
    #[error("Job submission timed out after {timeout_ms}ms")]
    SubmissionTimeout {
        /// Timeout duration in milliseconds
        timeout_ms: u64,
    },

    /// Invalid configuration with parameter
    #[error("Invalid configuration for '{parameter}': {message}")]
    InvalidConfig {
        /// Configuration parameter name
        parameter: String,
        /// Error message
        message: String,
    },

    /// Failed to spawn a worker thread
    #[error("Failed to spawn worker thread #{worker_id}: {message}")]
    SpawnError {
        /// ID of the worker that failed to spawn
        worker_id: WorkerId,
        /// Error message
        message: String,
        /// Source IO error
        #[source]
        source: Option<std::io::Error>,
    },

    /// Failed to join a worker thread
    #[error("Failed to join worker thread #{worker_id}: {message}")]
    JoinError {
        /// ID of the worker that failed to join
        worker_id: WorkerId,
        /// Error message
        message: String,
    },

    /// A statistics update named a worker outside 1..=worker_count
    #[error("Unknown worker #{worker_id} (pool has {worker_count} workers)")]
    UnknownWorker {
        /// Offending worker ID
        worker_id: WorkerId,
        /// Number of workers in the pool
        worker_count: usize,
    },
}

impl PoolError {
    /// Create a queue closed error
    pub fn queue_closed(job_id: JobId) -> Self {
        PoolError::QueueClosed { job_id }
    }

    /// Create an already started error
    pub fn already_started(worker_count: usize) -> Self {
        PoolError::AlreadyStarted { worker_count }
    }

    /// Create a queue full error
    pub fn queue_full(capacity: usize) -> Self {
        PoolError::QueueFull { capacity }
    }

    /// Create a submission timeout error
    pub fn submission_timeout(timeout_ms: u64) -> Self {
        PoolError::SubmissionTimeout { timeout_ms }
    }

    /// Create an invalid config error
    pub fn invalid_config(parameter: impl Into<String>, message: impl Into<String>) -> Self {
        PoolError::InvalidConfig {
            parameter: parameter.into(),
            message: message.into(),
        }
    }

    /// Create a spawn error with source
    pub fn spawn_with_source(
        worker_id: WorkerId,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        PoolError::SpawnError {
            worker_id,
            message: message.into(),
            source: Some(source),
        }
    }

    /// Create a join error
    pub fn join(worker_id: WorkerId, message: impl Into<String>) -> Self {
        PoolError::JoinError {
            worker_id,
            message: message.into(),
        }
    }

    /// Create an unknown worker error
    pub fn unknown_worker(worker_id: WorkerId, worker_count: usize) -> Self {
        PoolError::UnknownWorker {
            worker_id,
            worker_count,
        }
    }

    /// Returns `true` for errors that indicate API misuse rather than a
    /// runtime condition the caller can recover from.
    pub fn is_misuse(&self) -> bool {
        matches!(
            self,
            PoolError::AlreadyStarted { .. }
                | PoolError::PoolNotStarted
                | PoolError::AlreadyCollected
                | PoolError::InvalidConfig { .. }
        )
    }
}
