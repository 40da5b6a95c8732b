//! Response aggregator - Fans attachment lookups out to concurrent workers
//! and collects whatever comes back into a single response

use std::future::Future;
use std::time::Duration;

use tokio::sync::mpsc;

use crate::domain::entities::{Attachment, Response};

/// Default time a single worker gets before its attachment is dropped
pub const DEFAULT_WORKER_TIMEOUT: Duration = Duration::from_secs(5);

/// Runs attachment-producing jobs concurrently
#[derive(Debug, Clone, Copy)]
pub struct Aggregator {
    timeout: Duration,
}

impl Aggregator {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Spawn one worker per job and append every attachment in receipt order.
    ///
    /// Workers that exceed the timeout or panic are left out. Returns the
    /// number of attachments added.
    pub async fn gather<I, F>(&self, response: &mut Response, jobs: I) -> usize
    where
        I: IntoIterator<Item = F>,
        F: Future<Output = Attachment> + Send + 'static,
    {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut launched = 0usize;

        for (idx, job) in jobs.into_iter().enumerate() {
            let tx = tx.clone();
            let timeout = self.timeout;
            launched += 1;
            tokio::spawn(async move {
                match tokio::time::timeout(timeout, job).await {
                    Ok(attachment) => {
                        let _ = tx.send(attachment);
                    }
                    Err(_) => {
                        tracing::warn!("Worker {} timed out after {:?}, skipping", idx, timeout);
                    }
                }
            });
        }
        // Receiving ends once every worker has dropped its sender
        drop(tx);

        let mut received = 0usize;
        while let Some(attachment) = rx.recv().await {
            response.add_attachment(attachment);
            received += 1;
        }

        if received < launched {
            tracing::debug!("Aggregated {} of {} attachments", received, launched);
        }
        received
    }
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::new(DEFAULT_WORKER_TIMEOUT)
    }
}
