//! Queue monitor: cancellable periodic polling of the pipeline queue.
//!
//! The backend has no server push, so queue-status displays poll on a fixed
//! interval. The monitor owns its timer task explicitly: `stop` (or dropping
//! the handle) aborts it, so no timer outlives the screen that started it.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::warn;

use medipost_client::QueueStatus;

use crate::backend::WorkflowBackend;

/// Default poll period for queue-status displays.
pub const DEFAULT_POLL_PERIOD: Duration = Duration::from_secs(3);

/// Handle to a running queue poll. Polling stops when `stop` is called or
/// the handle is dropped.
pub struct QueueMonitor {
    handle: JoinHandle<()>,
    rx: watch::Receiver<Option<QueueStatus>>,
}

impl QueueMonitor {
    /// Spawn a poll task against the given backend.
    pub fn start<B>(backend: Arc<B>, period: Duration) -> Self
    where
        B: WorkflowBackend + 'static,
    {
        let (tx, rx) = watch::channel(None);
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                match backend.fetch_queue_status().await {
                    Ok(status) => {
                        if tx.send(Some(status)).is_err() {
                            // Every receiver is gone; nothing left to inform.
                            break;
                        }
                    }
                    // A failed poll is transient; the next tick retries.
                    Err(e) => warn!(error = %e, "queue status poll failed"),
                }
            }
        });
        Self { handle, rx }
    }

    /// Latest queue snapshot, if any poll has succeeded yet.
    pub fn latest(&self) -> Option<QueueStatus> {
        self.rx.borrow().clone()
    }

    /// Subscribe to queue snapshots as they arrive.
    pub fn subscribe(&self) -> watch::Receiver<Option<QueueStatus>> {
        self.rx.clone()
    }

    /// Stop polling immediately.
    pub fn stop(&self) {
        self.handle.abort();
    }
}

impl Drop for QueueMonitor {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
