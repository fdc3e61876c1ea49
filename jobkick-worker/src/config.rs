//! Dispatcher configuration
//!
//! Defines every startup setting: where the queue service lives, which queue
//! to poll, how many workers run, transport timeouts, TLS mode and retry
//! tuning. Each flag can also be set through a `JOBKICK_*` environment variable.

use clap::Parser;
use jobkick_client::ClientOptions;
use std::time::Duration;

use crate::backoff::BackoffPolicy;

/// Dispatcher configuration
///
/// Built once at startup and shared read-only by all workers.
#[derive(Debug, Clone, Parser)]
#[command(name = "jobkick")]
#[command(about = "Polls a remote job queue and triggers every job it hands out", long_about = None)]
pub struct Config {
    /// Number of concurrent polling workers
    #[arg(long, env = "JOBKICK_WORKERS", default_value_t = 3)]
    pub workers: usize,

    /// Base URL of the queue service (e.g., "https://localhost")
    #[arg(long, env = "JOBKICK_URL", default_value = "https://localhost")]
    pub url: String,

    /// Queue name to claim jobs from
    #[arg(long, env = "JOBKICK_QUEUE", default_value = "default")]
    pub queue: String,

    /// Timeout of each HTTP call (e.g., "30s", "500ms", "1m")
    #[arg(long, env = "JOBKICK_TIMEOUT", default_value = "30s", value_parser = humantime::parse_duration)]
    pub timeout: Duration,

    /// Skip TLS certificate verification (self-signed development endpoints only)
    #[arg(long, env = "JOBKICK_INSECURE")]
    pub insecure: bool,

    /// Growth factor between consecutive retry delays (1.0 keeps them fixed)
    #[arg(long, env = "JOBKICK_BACKOFF_MULTIPLIER", default_value_t = 2.0)]
    pub backoff_multiplier: f64,

    /// Upper bound of a single retry delay
    #[arg(long, env = "JOBKICK_MAX_BACKOFF", default_value = "60s", value_parser = humantime::parse_duration)]
    pub max_backoff: Duration,

    /// Random spread applied to retry delays, as a fraction (0.1 = ±10%, at most 0.5)
    #[arg(long, env = "JOBKICK_JITTER", default_value_t = 0.1)]
    pub jitter: f64,
}

impl Config {
    /// Retry policy derived from the backoff flags
    pub fn backoff_policy(&self) -> BackoffPolicy {
        BackoffPolicy {
            multiplier: self.backoff_multiplier,
            max_delay: self.max_backoff,
            jitter: self.jitter,
        }
    }

    /// Transport settings for the queue client
    pub fn client_options(&self) -> ClientOptions {
        ClientOptions {
            timeout: self.timeout,
            accept_invalid_certs: self.insecure,
        }
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.workers == 0 {
            anyhow::bail!("workers must be greater than 0");
        }

        if self.url.is_empty() {
            anyhow::bail!("url cannot be empty");
        }

        if !self.url.starts_with("http://") && !self.url.starts_with("https://") {
            anyhow::bail!("url must start with http:// or https://");
        }

        if self.queue.trim().is_empty() {
            anyhow::bail!("queue cannot be empty");
        }

        if self.queue.contains('/') {
            anyhow::bail!("queue cannot contain '/'");
        }

        if self.timeout.is_zero() {
            anyhow::bail!("timeout must be greater than 0");
        }

        self.backoff_policy().validate()
    }
}
