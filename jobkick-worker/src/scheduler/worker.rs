//! Polling worker
//!
//! One worker is an endless claim → trigger cycle against a single queue.
//! Nothing a worker runs into is fatal: transport failures, unexpected
//! statuses and idle queues all end in a retry delay, and only cancellation
//! ends the loop.

use jobkick_client::ClaimOutcome;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, trace};

use crate::backoff::{Backoff, BackoffPolicy, DelayClass};
use crate::scheduler::queue::JobQueue;

/// What to do after one claim/trigger round
#[derive(Debug, PartialEq)]
enum Next {
    /// Claim again right away
    Poll,
    /// Claim again after the delay
    Wait(Duration),
    /// Cancellation was requested
    Stop,
}

/// A single polling loop
pub struct Worker {
    id: usize,
    queue_name: String,
    queue: Arc<dyn JobQueue>,
    backoff: Backoff,
    cancel: CancellationToken,
}

impl Worker {
    /// Creates a new worker
    ///
    /// # Arguments
    /// * `id` - Worker index, 1-based
    /// * `queue_name` - Queue to claim jobs from
    /// * `queue` - Shared queue service handle
    /// * `policy` - Retry delay policy
    /// * `cancel` - Token that stops the loop at its next suspension point
    pub fn new(
        id: usize,
        queue_name: impl Into<String>,
        queue: Arc<dyn JobQueue>,
        policy: BackoffPolicy,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            id,
            queue_name: queue_name.into(),
            queue,
            backoff: Backoff::new(policy),
            cancel,
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    /// Runs the loop until cancelled
    pub async fn run(mut self) {
        info!("Worker {} polling queue '{}'", self.id, self.queue_name);

        loop {
            match self.poll_once().await {
                Next::Poll => tokio::task::yield_now().await,
                Next::Wait(delay) => {
                    if !self.pause(delay).await {
                        break;
                    }
                }
                Next::Stop => break,
            }
        }

        info!("Worker {} stopped", self.id);
    }

    /// Claims one job and triggers it
    async fn poll_once(&mut self) -> Next {
        let claimed = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => return Next::Stop,
            result = self.queue.claim(&self.queue_name) => result,
        };

        let job_id = match claimed {
            Ok(ClaimOutcome::Job(job_id)) => job_id,
            Ok(ClaimOutcome::Empty) => {
                let delay = self.backoff.next_delay(DelayClass::Idle);
                info!(
                    "No jobs in queue '{}' (204), waiting {:?}",
                    self.queue_name, delay
                );
                return Next::Wait(delay);
            }
            Ok(ClaimOutcome::Blank) => {
                trace!("Claim returned an empty job id, polling again");
                return Next::Poll;
            }
            Ok(ClaimOutcome::Unexpected(status)) => {
                let delay = self.backoff.next_delay(DelayClass::ClaimError);
                debug!("Claim answered {}, retrying in {:?}", status, delay);
                return Next::Wait(delay);
            }
            Err(e) => {
                let delay = self.backoff.next_delay(DelayClass::ClaimError);
                error!(
                    "Failed to claim from queue '{}': {:#} (retrying in {:?})",
                    self.queue_name, e, delay
                );
                return Next::Wait(delay);
            }
        };

        self.backoff.reset();

        let triggered = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => return Next::Stop,
            result = self.queue.trigger(&job_id) => result,
        };

        match triggered {
            Ok(status) => {
                info!(
                    job_id = %job_id,
                    status = status.as_u16(),
                    "Job {} dispatched (status {})",
                    job_id,
                    status.as_u16()
                );
                Next::Poll
            }
            Err(e) => {
                let delay = self.backoff.next_delay(DelayClass::TriggerError);
                error!(
                    "Failed to call {}: {:#} (retrying in {:?})",
                    self.queue.trigger_target(&job_id),
                    e,
                    delay
                );
                Next::Wait(delay)
            }
        }
    }

    /// Sleeps unless cancelled first; returns false on cancellation
    async fn pause(&self, delay: Duration) -> bool {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => false,
            _ = tokio::time::sleep(delay) => true,
        }
    }
}
