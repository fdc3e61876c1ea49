//! Scheduler layer for the dispatcher
//!
//! This layer owns the pool of polling workers. Each worker repeatedly
//! claims a job from the queue service and triggers it, handling every
//! failure locally with a retry delay.

pub mod pool;
pub mod queue;
pub mod worker;

pub use pool::WorkerPool;
pub use queue::JobQueue;
pub use worker::Worker;
