//! Job executor dispatching thumbnail jobs to the engine.

use tracing::{debug, error};

use fibr_core::types::ThumbnailJob;
use fibr_storage::thumbnail::Thumbnailer;

/// Runs one thumbnail job to completion. Failures are logged, never returned.
#[derive(Debug, Clone)]
pub struct JobExecutor {
    thumbnailer: Thumbnailer,
}

impl JobExecutor {
    /// Create a new executor.
    pub fn new(thumbnailer: Thumbnailer) -> Self {
        Self { thumbnailer }
    }

    /// Execute a job.
    pub async fn execute(&self, job: ThumbnailJob) {
        debug!(job = job.label(), "Executing thumbnail job");

        match job {
            ThumbnailJob::Generate { pathname } => self.thumbnailer.generate(&pathname).await,
            ThumbnailJob::Delete { pathname } => self.thumbnailer.delete(&pathname).await,
            ThumbnailJob::Move { from, to } => self.thumbnailer.rename(&from, &to).await,
            ThumbnailJob::Walk => {
                if let Err(e) = self.thumbnailer.walk().await {
                    error!(error = %e, "Thumbnail walk failed");
                }
            }
        }
    }
}
