//! Job queue endpoints

use crate::QueueClient;
use crate::error::Result;
use crate::job::{ClaimOutcome, JobId};
use reqwest::StatusCode;
use tracing::debug;

impl QueueClient {
    // =============================================================================
    // URLs
    // =============================================================================

    /// URL of the claim endpoint for a queue
    pub fn claim_url(&self, queue: &str) -> String {
        format!("{}/jobs/{}/ack", self.base_url, queue)
    }

    /// URL of the trigger endpoint for a job
    pub fn trigger_url(&self, job_id: &JobId) -> String {
        format!("{}/jobs/{}/run", self.base_url, job_id)
    }

    // =============================================================================
    // Job Lifecycle
    // =============================================================================

    /// Claim the next job of a queue
    ///
    /// The response body is always read to the end so the connection can be
    /// reused. Only a 200 body matters; read errors on other statuses are
    /// ignored.
    ///
    /// # Arguments
    /// * `queue` - The queue name
    ///
    /// # Returns
    /// The classified response, or an error when the request itself failed
    ///
    /// # Example
    /// ```no_run
    /// # use jobkick_client::{ClaimOutcome, ClientOptions, QueueClient};
    /// # async fn example() -> anyhow::Result<()> {
    /// let client = QueueClient::new("https://localhost", &ClientOptions::default())?;
    /// match client.claim_job("default").await? {
    ///     ClaimOutcome::Job(job_id) => println!("claimed {}", job_id),
    ///     other => println!("nothing to do: {:?}", other),
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn claim_job(&self, queue: &str) -> Result<ClaimOutcome> {
        let url = self.claim_url(queue);
        let response = self.client.get(&url).send().await?;

        let status = response.status();
        let body = if status == StatusCode::OK {
            response.text().await?
        } else {
            if let Err(e) = response.bytes().await {
                debug!("Discarding unreadable body from {}: {}", url, e);
            }
            String::new()
        };

        debug!("Claim {} answered {}", url, status);

        Ok(ClaimOutcome::from_response(status, &body))
    }

    /// Trigger execution of a claimed job
    ///
    /// Every status code the service answers with counts as delivered; the
    /// body is drained and dropped.
    ///
    /// # Arguments
    /// * `job_id` - The job to run
    ///
    /// # Returns
    /// The status code returned by the service
    pub async fn trigger_job(&self, job_id: &JobId) -> Result<StatusCode> {
        let url = self.trigger_url(job_id);
        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if let Err(e) = response.bytes().await {
            debug!("Discarding unreadable body from {}: {}", url, e);
        }

        Ok(status)
    }
}
