//! The signal router: push notifications in, cache refreshes out.
//!
//! Raw push payloads arrive on a channel from the transport layer. The
//! router decodes them into typed signals and dispatches each one to the
//! reconciliation cache. Undecodable payloads and failed refreshes are
//! logged and skipped; the push channel is at-most-once, so a dropped
//! signal is recovered by the next refresh or reconciliation pass.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use laddersync_client::{RatingService, Signal};

use crate::cache::RatingCache;

/// Dispatch loop for push notifications.
///
/// Runs between [`start`](Self::start) and [`stop`](Self::stop);
/// dropping the router stops it. The loop also ends on its own when the
/// transport closes the push channel.
pub struct SignalRouter {
    task: Option<JoinHandle<()>>,
}

impl SignalRouter {
    /// Start routing raw pushes from `pushes` into `cache`.
    pub fn start<S>(cache: Arc<RatingCache<S>>, mut pushes: mpsc::Receiver<Vec<u8>>) -> Self
    where
        S: RatingService + 'static,
    {
        let task = tokio::spawn(async move {
            while let Some(raw) = pushes.recv().await {
                let signal = match Signal::from_wire(&raw) {
                    Ok(signal) => signal,
                    Err(e) => {
                        tracing::warn!("dropping undecodable push payload: {e}");
                        continue;
                    }
                };

                if let Err(e) = cache.on_signal(&signal).await {
                    // The cache was left untouched; the periodic
                    // reconciliation pass will converge eventually.
                    tracing::warn!("signal-driven refresh failed: {e}");
                }
            }
            tracing::debug!("push channel closed, signal router exiting");
        });

        Self { task: Some(task) }
    }

    /// Stop the dispatch loop. Idempotent.
    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    /// Whether the dispatch loop is still attached.
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }
}

impl Drop for SignalRouter {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
