//! The LadderClient: unified API for the laddersync system.
//!
//! Bundles the reconciliation cache, the signal router and the
//! reconciliation scheduler behind one explicit lifecycle, hands out
//! per-session ranking paginators, and drives the outcome-aware publish
//! protocol.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use laddersync_client::{ProfileDirectory, PublishOutcome, RatingService, Result};
use laddersync_core::{AgentId, RecordId, Score};
use laddersync_store::{
    RankingPaginator, RatingCache, ReconcileScheduler, SignalRouter, DEFAULT_RECONCILE_PERIOD,
};

/// Configuration for the client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Period of the background reconciliation timer.
    pub reconcile_period: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            reconcile_period: DEFAULT_RECONCILE_PERIOD,
        }
    }
}

/// Result of an outcome-aware publish.
///
/// Keeps "result recorded" and "result rejected, still contestable"
/// distinguishable, and additionally exposes the partial-link window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishReport {
    /// The record was committed canonically.
    Recorded {
        /// The new record's id.
        record: RecordId,
        /// False if linking into the author's own index failed: the
        /// record exists but is not yet discoverable via the author's
        /// history. Bounded by the next successful link or
        /// reconciliation pass; not an error.
        linked: bool,
    },
    /// The chain head moved under us. Nothing was merged. Refresh the
    /// cache and decide whether the result is still worth publishing
    /// against the corrected head.
    Rejected,
}

/// The main client struct.
///
/// Construction wires nothing up: background work (the reconciliation
/// timer and the push dispatch loop) only runs between
/// [`start`](Self::start) and [`stop`](Self::stop), so rebuilding a
/// client never leaks timers or handlers.
pub struct LadderClient<S, P> {
    service: Arc<S>,
    profiles: Arc<P>,
    cache: Arc<RatingCache<S>>,
    scheduler: ReconcileScheduler<S>,
    router: Option<SignalRouter>,
}

impl<S, P> LadderClient<S, P>
where
    S: RatingService + 'static,
    P: ProfileDirectory + 'static,
{
    /// Create a stopped client for the given local agent.
    pub fn new(me: AgentId, service: Arc<S>, profiles: Arc<P>, config: ClientConfig) -> Self {
        let cache = Arc::new(RatingCache::new(me, Arc::clone(&service)));
        let scheduler = ReconcileScheduler::new(Arc::clone(&service), config.reconcile_period);
        Self {
            service,
            profiles,
            cache,
            scheduler,
            router: None,
        }
    }

    /// The local agent's id.
    pub fn me(&self) -> &AgentId {
        self.cache.me()
    }

    /// The reconciliation cache.
    pub fn cache(&self) -> &Arc<RatingCache<S>> {
        &self.cache
    }

    /// Start background work: the reconciliation timer (with one
    /// immediate pass) and the push dispatch loop over `pushes`.
    /// Calling `start` on a running client does nothing.
    pub fn start(&mut self, pushes: mpsc::Receiver<Vec<u8>>) {
        self.scheduler.start();
        if !self.router.as_ref().is_some_and(|r| r.is_running()) {
            self.router = Some(SignalRouter::start(Arc::clone(&self.cache), pushes));
        }
    }

    /// Stop all background work. Idempotent.
    pub fn stop(&mut self) {
        self.scheduler.stop();
        if let Some(mut router) = self.router.take() {
            router.stop();
        }
    }

    /// Whether background work is currently running.
    pub fn is_running(&self) -> bool {
        self.scheduler.is_running() || self.router.as_ref().is_some_and(|r| r.is_running())
    }

    /// Create a fresh leaderboard paginator for one browsing session.
    ///
    /// # Panics
    ///
    /// Panics if `chunk_size` is zero.
    pub fn ranking(&self, chunk_size: usize) -> RankingPaginator<S, P> {
        RankingPaginator::new(
            Arc::clone(&self.service),
            Arc::clone(&self.profiles),
            chunk_size,
        )
    }

    /// Publish a match outcome against `opponent`, then link the new
    /// record into the local agent's own index.
    ///
    /// A failed link is reported as `Recorded { linked: false }` — the
    /// record is canonical but not yet discoverable via the author's
    /// history, a tolerated window closed by the next reconciliation
    /// pass. A chain-head conflict comes back as `Rejected` and is
    /// never retried here.
    pub async fn publish(&self, opponent: &AgentId, score: Score) -> Result<PublishReport> {
        match self.service.publish_result(opponent, score).await? {
            PublishOutcome::Published { record } => {
                match self.service.link_own_result(&record).await {
                    Ok(()) => Ok(PublishReport::Recorded {
                        record,
                        linked: true,
                    }),
                    Err(e) => {
                        tracing::warn!(
                            record = %record,
                            "published but not yet linked into own index: {e}"
                        );
                        Ok(PublishReport::Recorded {
                            record,
                            linked: false,
                        })
                    }
                }
            }
            PublishOutcome::OutdatedChainHead => Ok(PublishReport::Rejected),
        }
    }
}
