//! Background thumbnail processing for Fibr.
//!
//! This crate provides:
//! - A bounded job queue that request handlers submit to without blocking
//! - A job executor that dispatches jobs to the thumbnail engine
//! - A worker runner consuming jobs one at a time, draining on shutdown
//! - A cron scheduler for periodic reconciliation walks

pub mod executor;
pub mod queue;
pub mod runner;
pub mod scheduler;

pub use executor::JobExecutor;
pub use queue::{JobReceiver, ThumbnailQueue};
pub use runner::WorkerRunner;
pub use scheduler::CronScheduler;
