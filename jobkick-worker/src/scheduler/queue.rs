//! Queue service seam
//!
//! Workers talk to the queue through [`JobQueue`] so the loop can be driven
//! by something other than a live HTTP service.

use anyhow::Result;
use async_trait::async_trait;
use jobkick_client::{ClaimOutcome, JobId, QueueClient, StatusCode};

/// Operations a worker needs from the remote queue service
#[async_trait]
pub trait JobQueue: Send + Sync {
    /// Claims the next job of `queue`
    ///
    /// Errors mean the call never produced a response (DNS, connect, timeout).
    async fn claim(&self, queue: &str) -> Result<ClaimOutcome>;

    /// Triggers a claimed job and returns whatever status the service answered
    async fn trigger(&self, job_id: &JobId) -> Result<StatusCode>;

    /// Location of the trigger endpoint, for log lines
    fn trigger_target(&self, job_id: &JobId) -> String;
}

#[async_trait]
impl JobQueue for QueueClient {
    async fn claim(&self, queue: &str) -> Result<ClaimOutcome> {
        Ok(self.claim_job(queue).await?)
    }

    async fn trigger(&self, job_id: &JobId) -> Result<StatusCode> {
        Ok(self.trigger_job(job_id).await?)
    }

    fn trigger_target(&self, job_id: &JobId) -> String {
        self.trigger_url(job_id)
    }
}
