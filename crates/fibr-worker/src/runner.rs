//! Worker runner: consumes thumbnail jobs one at a time.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::info;

use crate::executor::JobExecutor;
use crate::queue::JobReceiver;

/// Sequential consumer of the thumbnail queue.
///
/// One job at a time bounds memory used by image decoding.
#[derive(Debug)]
pub struct WorkerRunner {
    executor: Arc<JobExecutor>,
    receiver: JobReceiver,
}

impl WorkerRunner {
    /// Create a new worker runner.
    pub fn new(executor: Arc<JobExecutor>, receiver: JobReceiver) -> Self {
        Self { executor, receiver }
    }

    /// Run until the cancel signal is received or every submitter is gone.
    ///
    /// On cancel the queue is closed and jobs already queued are drained
    /// before returning.
    pub async fn run(mut self, mut cancel: watch::Receiver<bool>) -> usize {
        info!("Thumbnail worker started");
        let mut executed = 0;

        loop {
            tokio::select! {
                changed = cancel.changed() => {
                    if changed.is_err() || *cancel.borrow() {
                        info!("Thumbnail worker received shutdown signal");
                        break;
                    }
                }
                job = self.receiver.recv() => match job {
                    Some(job) => {
                        self.executor.execute(job).await;
                        executed += 1;
                    }
                    None => break,
                },
            }
        }

        self.receiver.close();
        let mut drained = 0;
        while let Some(job) = self.receiver.recv().await {
            self.executor.execute(job).await;
            drained += 1;
        }

        info!(executed, drained, "Thumbnail worker shut down complete");
        executed + drained
    }
}
