//! Worker pool
//!
//! Starts a fixed number of independent workers that share one queue
//! handle and one configuration, then waits for all of them to stop.

use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, error, info, info_span};

use crate::config::Config;
use crate::scheduler::queue::JobQueue;
use crate::scheduler::worker::Worker;

/// Fixed-size pool of polling workers
pub struct WorkerPool {
    config: Config,
    queue: Arc<dyn JobQueue>,
}

impl WorkerPool {
    /// Creates a new worker pool
    pub fn new(config: Config, queue: Arc<dyn JobQueue>) -> Self {
        Self { config, queue }
    }

    /// Spawns one task per configured worker, ids `1..=workers`
    pub fn spawn(&self, cancel: &CancellationToken) -> Vec<JoinHandle<()>> {
        let policy = self.config.backoff_policy();

        (1..=self.config.workers)
            .map(|id| {
                let worker = Worker::new(
                    id,
                    self.config.queue.clone(),
                    Arc::clone(&self.queue),
                    policy.clone(),
                    cancel.clone(),
                );
                let span = info_span!("worker", worker_id = worker.id());
                tokio::spawn(worker.run().instrument(span))
            })
            .collect()
    }

    /// Runs every worker until `cancel` fires and they have all stopped
    ///
    /// Returns the number of workers that panicked instead of stopping.
    pub async fn run(&self, cancel: CancellationToken) -> usize {
        info!("Starting {} worker(s)", self.config.workers);

        let handles = self.spawn(&cancel);
        Self::join(handles).await
    }

    /// Waits for all worker tasks, logging the ones that panicked
    pub async fn join(handles: Vec<JoinHandle<()>>) -> usize {
        let mut panicked = 0;

        for handle in handles {
            if let Err(e) = handle.await {
                error!("Worker task panicked: {}", e);
                panicked += 1;
            }
        }

        panicked
    }
}
