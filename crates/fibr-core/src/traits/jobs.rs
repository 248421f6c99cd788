//! Submission side of the thumbnail work queue.

use crate::types::ThumbnailJob;

/// Hands thumbnail work to the background pipeline.
///
/// Submitting never blocks and never fails the caller: an implementation
/// that cannot accept the job logs and drops it.
pub trait JobSubmitter: Send + Sync + std::fmt::Debug + 'static {
    /// Queue a job for asynchronous execution.
    fn submit(&self, job: ThumbnailJob);
}

/// Submitter that discards every job, used when thumbnails are disabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSubmitter;

impl JobSubmitter for NoopSubmitter {
    fn submit(&self, _job: ThumbnailJob) {}
}
