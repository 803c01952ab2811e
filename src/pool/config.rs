//! Configuration for worker pools

use crate::core::{PoolError, Result};
use serde::{Deserialize, Serialize};

/// Configuration for a [`WorkerPool`](crate::pool::WorkerPool).
///
/// All capacities are fixed when the pool is constructed.
///
/// # Example
///
/// ```rust
/// use rust_worker_pool::pool::PoolConfig;
///
/// let config = PoolConfig::new(4, 32)
///     .with_result_queue_capacity(128)
///     .with_thread_name_prefix("resize");
///
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Number of worker threads. Must be at least 1.
    pub worker_count: usize,
    /// Job queue capacity (0 = synchronous hand-off).
    pub job_queue_capacity: usize,
    /// Result queue capacity (0 = synchronous hand-off).
    ///
    /// Results are drained by `collect()`; if it is not running while jobs
    /// are submitted, this must cover every result produced before it starts.
    pub result_queue_capacity: usize,
    /// Worker thread name prefix, threads are named `<prefix>-<id>`.
    pub thread_name_prefix: String,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            worker_count: num_cpus::get(),
            job_queue_capacity: 100,
            result_queue_capacity: 100,
            thread_name_prefix: "worker".to_string(),
        }
    }
}

impl PoolConfig {
    /// Create a configuration with the given worker count and job queue
    /// capacity. The result queue gets the same capacity.
    #[must_use]
    pub fn new(worker_count: usize, job_queue_capacity: usize) -> Self {
        Self {
            worker_count,
            job_queue_capacity,
            result_queue_capacity: job_queue_capacity,
            ..Default::default()
        }
    }

    /// Load a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| PoolError::invalid_config("json", e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Set the number of worker threads
    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_worker_count(mut self, worker_count: usize) -> Self {
        self.worker_count = worker_count;
        self
    }

    /// Set the job queue capacity
    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_job_queue_capacity(mut self, capacity: usize) -> Self {
        self.job_queue_capacity = capacity;
        self
    }

    /// Set the result queue capacity
    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_result_queue_capacity(mut self, capacity: usize) -> Self {
        self.result_queue_capacity = capacity;
        self
    }

    /// Set thread name prefix
    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_thread_name_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.thread_name_prefix = prefix.into();
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.worker_count == 0 {
            return Err(PoolError::invalid_config(
                "worker_count",
                "Number of workers must be greater than 0",
            ));
        }
        if self.thread_name_prefix.is_empty() {
            return Err(PoolError::invalid_config(
                "thread_name_prefix",
                "Thread name prefix must not be empty",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PoolConfig::default();
        assert_eq!(config.worker_count, num_cpus::get());
        assert_eq!(config.job_queue_capacity, 100);
        assert_eq!(config.result_queue_capacity, 100);
        assert_eq!(config.thread_name_prefix, "worker");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_new_mirrors_capacity() {
        let config = PoolConfig::new(3, 5);
        assert_eq!(config.worker_count, 3);
        assert_eq!(config.job_queue_capacity, 5);
        assert_eq!(config.result_queue_capacity, 5);
    }

    #[test]
    fn test_builder() {
        let config = PoolConfig::new(2, 0)
            .with_worker_count(6)
            .with_job_queue_capacity(8)
            .with_result_queue_capacity(0)
            .with_thread_name_prefix("io");
        assert_eq!(config.worker_count, 6);
        assert_eq!(config.job_queue_capacity, 8);
        assert_eq!(config.result_queue_capacity, 0);
        assert_eq!(config.thread_name_prefix, "io");
    }

    #[test]
    fn test_zero_workers_rejected() {
        let err = PoolConfig::new(0, 10).validate().unwrap_err();
        assert!(matches!(err, PoolError::InvalidConfig { ref parameter, .. } if parameter == "worker_count"));
    }

    #[test]
    fn test_empty_prefix_rejected() {
        let err = PoolConfig::new(1, 10)
            .with_thread_name_prefix("")
            .validate()
            .unwrap_err();
        assert!(matches!(err, PoolError::InvalidConfig { .. }));
    }

    #[test]
    fn test_from_json() {
        let config = PoolConfig::from_json(r#"{"worker_count": 5, "job_queue_capacity": 20}"#)
            .expect("valid config");
        assert_eq!(config.worker_count, 5);
        assert_eq!(config.job_queue_capacity, 20);
        assert_eq!(config.result_queue_capacity, 100);
        assert_eq!(config.thread_name_prefix, "worker");
    }

    #[test]
    fn test_from_json_rejects_invalid() {
        assert!(matches!(
            PoolConfig::from_json("{not json"),
            Err(PoolError::InvalidConfig { .. })
        ));
        assert!(matches!(
            PoolConfig::from_json(r#"{"worker_count": 0}"#),
            Err(PoolError::InvalidConfig { .. })
        ));
    }
}
