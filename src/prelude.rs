//! Convenient re-exports for common types and traits

pub use crate::core::{
    Job, JobId, JobResult, JobStatus, Outcome, PoolError, Processor, Result, WorkerId,
};
pub use crate::pool::{PoolConfig, PoolState, StatsSnapshot, WorkerPool};
