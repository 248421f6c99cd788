//! Cron scheduler for periodic reconciliation walks.

use std::sync::Arc;

use tokio_cron_scheduler::{Job as CronJob, JobScheduler};

use fibr_core::error::AppError;
use fibr_core::traits::jobs::JobSubmitter;
use fibr_core::types::ThumbnailJob;

/// Cron-based scheduler submitting thumbnail walks to the queue.
pub struct CronScheduler {
    /// The underlying job scheduler
    scheduler: JobScheduler,
    /// Queue receiving scheduled work
    jobs: Arc<dyn JobSubmitter>,
}

impl std::fmt::Debug for CronScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CronScheduler").finish()
    }
}

impl CronScheduler {
    /// Create a new cron scheduler
    pub async fn new(jobs: Arc<dyn JobSubmitter>) -> Result<Self, AppError> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| AppError::internal(format!("Failed to create scheduler: {e}")))?;

        Ok(Self { scheduler, jobs })
    }

    /// Submit a full walk on every tick of the cron `schedule`
    /// (six fields, seconds first).
    pub async fn register_walk(&self, schedule: &str) -> Result<(), AppError> {
        let jobs = Arc::clone(&self.jobs);
        let job = CronJob::new_async(schedule, move |_uuid, _lock| {
            let jobs = Arc::clone(&jobs);
            Box::pin(async move {
                tracing::debug!("Scheduling thumbnail walk");
                jobs.submit(ThumbnailJob::Walk);
            })
        })
        .map_err(|e| {
            AppError::configuration(format!("Invalid thumbnail walk schedule '{schedule}': {e}"))
        })?;

        self.scheduler
            .add(job)
            .await
            .map_err(|e| AppError::internal(format!("Failed to add walk schedule: {e}")))?;

        tracing::info!(schedule, "Registered: thumbnail walk");
        Ok(())
    }

    /// Start the scheduler
    pub async fn start(&self) -> Result<(), AppError> {
        self.scheduler
            .start()
            .await
            .map_err(|e| AppError::internal(format!("Failed to start scheduler: {e}")))?;

        tracing::info!("Cron scheduler started");
        Ok(())
    }

    /// Shutdown the scheduler
    pub async fn shutdown(&mut self) -> Result<(), AppError> {
        self.scheduler
            .shutdown()
            .await
            .map_err(|e| AppError::internal(format!("Failed to shutdown scheduler: {e}")))?;

        tracing::info!("Cron scheduler shut down");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fibr_core::error::ErrorKind;
    use fibr_core::traits::jobs::NoopSubmitter;

    #[tokio::test]
    async fn test_invalid_schedule_is_configuration_error() {
        let scheduler = CronScheduler::new(Arc::new(NoopSubmitter)).await.unwrap();
        let err = scheduler.register_walk("every tuesday").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Configuration);
    }

    #[tokio::test]
    async fn test_valid_schedule_registers() {
        let scheduler = CronScheduler::new(Arc::new(NoopSubmitter)).await.unwrap();
        scheduler.register_walk("0 0 3 * * *").await.unwrap();
    }
}
