//! Worker pool, workers, statistics and result collection

pub mod collector;
pub mod config;
pub mod stats;
pub mod worker;
pub mod worker_pool;

pub use collector::ResultCollector;
pub use config::PoolConfig;
pub use stats::{StatsAggregator, StatsSnapshot};
pub use worker::{Worker, WorkerState};
pub use worker_pool::{PoolState, WorkerPool};
