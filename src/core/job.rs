//! Job, outcome and result types

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Identifier of a submitted job
pub type JobId = u64;

/// Identifier of a worker, in the range `1..=worker_count`
pub type WorkerId = usize;

/// A unit of work submitted to the pool
///
/// The payload is opaque to the pool; only the injected [`Processor`]
/// interprets it. A job is immutable once submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job<P = String> {
    id: JobId,
    payload: P,
}

impl<P> Job<P> {
    /// Create a job with a caller-assigned identifier
    pub fn new(id: JobId, payload: P) -> Self {
        Self { id, payload }
    }

    /// Get the job identifier
    pub fn id(&self) -> JobId {
        self.id
    }

    /// Get the job payload
    pub fn payload(&self) -> &P {
        &self.payload
    }

    /// Consume the job and return its payload
    pub fn into_payload(self) -> P {
        self.payload
    }
}

/// Classification of a processed job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JobStatus {
    /// The work function reported success
    Succeeded,
    /// The work function reported failure or panicked
    Failed,
}

impl JobStatus {
    /// Returns `true` for [`JobStatus::Succeeded`]
    pub fn is_success(self) -> bool {
        matches!(self, JobStatus::Succeeded)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobStatus::Succeeded => write!(f, "succeeded"),
            JobStatus::Failed => write!(f, "failed"),
        }
    }
}

/// What a work function reports back for one job
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    /// Success or failure
    pub status: JobStatus,
    /// Human-readable description of what happened
    pub message: String,
}

impl Outcome {
    /// A successful outcome
    pub fn succeeded(message: impl Into<String>) -> Self {
        Self {
            status: JobStatus::Succeeded,
            message: message.into(),
        }
    }

    /// A failed outcome
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            status: JobStatus::Failed,
            message: message.into(),
        }
    }

    /// Build an outcome from a success predicate
    pub fn from_bool(success: bool, message: impl Into<String>) -> Self {
        if success {
            Self::succeeded(message)
        } else {
            Self::failed(message)
        }
    }
}

/// The record published for every processed job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobResult {
    /// Job that was processed
    pub job_id: JobId,
    /// Worker that processed it
    pub worker_id: WorkerId,
    /// Success or failure
    pub status: JobStatus,
    /// Message produced by the work function
    pub message: String,
    /// Time spent inside the work function
    pub elapsed: Duration,
}

impl JobResult {
    /// Returns `true` if the job succeeded
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

/// The work function injected into a pool
///
/// Called concurrently from up to `worker_count` threads. It must not block
/// indefinitely and must not retry: failure is reported through the
/// returned [`Outcome`]. Any `Fn(&Job<P>) -> Outcome + Send + Sync` closure
/// is a processor.
pub trait Processor<P>: Send + Sync {
    /// Process a single job
    fn process(&self, job: &Job<P>) -> Outcome;
}

impl<P, F> Processor<P> for F
where
    F: Fn(&Job<P>) -> Outcome + Send + Sync,
{
    fn process(&self, job: &Job<P>) -> Outcome {
        self(job)
    }
}
