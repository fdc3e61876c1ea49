//! Jobkick
//!
//! A polling job dispatcher. A fixed pool of workers claims job identifiers
//! from a remote queue service and triggers each one through a second
//! endpoint.
//!
//! Architecture:
//! - Configuration: command-line flags with `JOBKICK_*` environment fallbacks
//! - Client: HTTP calls to the queue service (`jobkick-client`)
//! - Scheduler: the worker pool and its poll/trigger loops
//! - Backoff: retry delays with exponential growth, cap and jitter
//! - Shutdown: signal handling that cancels every worker

mod backoff;
mod config;
mod scheduler;
mod shutdown;

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::scheduler::{JobQueue, WorkerPool};
use jobkick_client::QueueClient;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "jobkick=info,jobkick_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::parse();
    config.validate().context("Invalid configuration")?;

    info!(
        "Starting with {} worker(s) on queue '{}' at {} (timeout {}, insecure={})",
        config.workers,
        config.queue,
        config.url,
        humantime::format_duration(config.timeout),
        config.insecure
    );

    if config.insecure {
        warn!("TLS certificate verification is disabled");
    }

    // One client, one connection pool, shared by every worker
    let client = QueueClient::new(config.url.clone(), &config.client_options())
        .context("Failed to build queue client")?;
    let queue: Arc<dyn JobQueue> = Arc::new(client);

    let cancel = CancellationToken::new();
    let _signal_listener = shutdown::cancel_on_signal(cancel.clone());

    let pool = WorkerPool::new(config, queue);
    let panicked = pool.run(cancel).await;

    if panicked > 0 {
        warn!("{} worker(s) ended with a panic", panicked);
    }

    info!("All workers stopped");
    Ok(())
}
