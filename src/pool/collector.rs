//! Drains the result queue while workers finish.

use crate::core::{JobResult, PoolError, Result};
use crate::pool::worker::Worker;
use crate::queue::BoundedQueue;
use log::debug;
use std::sync::Arc;
use std::thread;

/// Collects every published [`JobResult`] once the workers are done.
///
/// Draining runs on the calling thread while a helper thread joins the
/// workers and then closes the result queue. Overlapping the two keeps
/// workers from blocking forever on a full result queue.
pub struct ResultCollector {
    results: Arc<BoundedQueue<JobResult>>,
}

impl ResultCollector {
    /// Create a collector for the given result queue
    pub fn new(results: Arc<BoundedQueue<JobResult>>) -> Self {
        Self { results }
    }

    /// Wait for `workers` to exit and return results in dequeue order.
    ///
    /// The result queue is closed only after the last worker has been
    /// joined, so no result is ever pushed after the close.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::JoinError`] if a worker thread panicked, or
    /// [`PoolError::SpawnError`] if the helper thread could not be started.
    pub fn collect(self, workers: Vec<Worker>) -> Result<Vec<JobResult>> {
        let results = Arc::clone(&self.results);
        let closer = thread::Builder::new()
            .name("result-closer".to_string())
            .spawn(move || {
                let mut outcome = Ok(());
                for worker in workers {
                    let id = worker.id();
                    if let Err(e) = worker.join() {
                        debug!("worker {} failed to join: {}", id, e);
                        if outcome.is_ok() {
                            outcome = Err(e);
                        }
                    }
                }
                results.close();
                outcome
            })
            .map_err(|e| PoolError::spawn_with_source(0, "failed to spawn result closer", e))?;

        let mut collected = Vec::new();
        while let Some(result) = self.results.pop() {
            collected.push(result);
        }
        debug!("collected {} results", collected.len());

        closer
            .join()
            .map_err(|_| PoolError::join(0, "result closer panicked"))??;
        Ok(collected)
    }
}
