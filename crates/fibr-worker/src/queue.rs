//! Bounded thumbnail job queue.

use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{debug, warn};

use fibr_core::traits::jobs::JobSubmitter;
use fibr_core::types::ThumbnailJob;

/// Receiving end of the queue, owned by the [`WorkerRunner`](crate::WorkerRunner).
pub type JobReceiver = mpsc::Receiver<ThumbnailJob>;

/// Submission side of the thumbnail queue.
///
/// Submitting never waits. When the queue is full a generation job is
/// dropped and a later walk reconciles the missing thumbnail, while a cleanup
/// job is handed to a task that waits for room.
#[derive(Debug, Clone)]
pub struct ThumbnailQueue {
    sender: mpsc::Sender<ThumbnailJob>,
}

impl ThumbnailQueue {
    /// Create a queue holding at most `capacity` pending jobs.
    pub fn bounded(capacity: usize) -> (Self, JobReceiver) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        (Self { sender }, receiver)
    }
}

impl ThumbnailQueue {
    /// Enqueue `job` from a background task once the queue has room.
    fn defer(&self, job: ThumbnailJob) {
        let Ok(runtime) = Handle::try_current() else {
            warn!(?job, "No runtime to defer thumbnail job, dropping it");
            return;
        };

        debug!(job = job.label(), "Thumbnail queue full, deferring job");
        let sender = self.sender.clone();
        runtime.spawn(async move {
            if let Err(e) = sender.send(job).await {
                warn!(job = ?e.0, "Thumbnail queue closed, dropping job");
            }
        });
    }
}

impl JobSubmitter for ThumbnailQueue {
    fn submit(&self, job: ThumbnailJob) {
        let label = job.label();
        match self.sender.try_send(job) {
            Ok(()) => debug!(job = label, "Enqueued thumbnail job"),
            Err(TrySendError::Full(job)) if job.is_cleanup() => self.defer(job),
            Err(TrySendError::Full(job)) => {
                warn!(job = label, ?job, "Thumbnail queue full, dropping job");
            }
            Err(TrySendError::Closed(job)) => {
                warn!(job = label, ?job, "Thumbnail queue closed, dropping job");
            }
        }
    }
}
