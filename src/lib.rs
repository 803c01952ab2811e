//! # Rust Worker Pool
//!
//! A bounded work-distribution engine: a fixed number of worker threads
//! consume jobs from a bounded queue, publish typed results to a second
//! bounded queue and keep live aggregate statistics.
//!
//! ## Features
//!
//! - **Bounded Queues**: Producers block when the job queue is full; a capacity of 0 is a synchronous hand-off
//! - **Injected Work Function**: Any `Fn(&Job<P>) -> Outcome` closure or [`Processor`] implementation
//! - **Worker Statistics**: Processed, succeeded and failed counts with a per-worker breakdown
//! - **Graceful Shutdown**: Stop accepting work, drain the backlog, then close the result stream
//! - **Panic Isolation**: A panicking work function yields a `Failed` result instead of killing a worker
//!
//! ## Quick Start
//!
//! ```rust
//! use rust_worker_pool::prelude::*;
//!
//! # fn main() -> Result<()> {
//! // Jobs with even IDs fail, odd IDs succeed
//! let pool = WorkerPool::with_workers(2, 8, |job: &Job<String>| {
//!     Outcome::from_bool(job.id() % 2 == 1, format!("processed {}", job.payload()))
//! })?;
//! pool.start()?;
//!
//! for id in 1..=6 {
//!     pool.submit(Job::new(id, format!("task {}", id)))?;
//! }
//!
//! // Stop accepting jobs; queued jobs are still processed
//! pool.stop()?;
//!
//! let (results, stats) = pool.collect()?;
//! assert_eq!(results.len(), 6);
//! assert_eq!(stats.succeeded, 3);
//! assert_eq!(stats.failed, 3);
//! # Ok(())
//! # }
//! ```
//!
//! ## Live Statistics
//!
//! ```rust
//! use rust_worker_pool::prelude::*;
//!
//! # fn main() -> Result<()> {
//! let config = PoolConfig::new(4, 100).with_thread_name_prefix("stats-demo");
//! let pool = WorkerPool::new(config, |_: &Job<u64>| Outcome::succeeded("ok"))?;
//! pool.start()?;
//! # for i in 0..10 {
//! #     pool.submit(Job::new(i, i))?;
//! # }
//!
//! let stats = pool.stats();
//! assert_eq!(stats.processed, stats.succeeded + stats.failed);
//! for (worker, processed) in &stats.by_worker {
//!     println!("Worker {}: {} jobs processed", worker, processed);
//! }
//! # pool.stop()?;
//! # pool.collect()?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod core;
pub mod pool;
pub mod prelude;
pub mod queue;

pub use crate::core::{Job, JobId, JobResult, JobStatus, Outcome, PoolError, Processor, Result, WorkerId};
pub use crate::pool::{PoolConfig, PoolState, StatsAggregator, StatsSnapshot, WorkerPool};
pub use crate::queue::{BoundedQueue, QueueError};
