//! The reconciliation scheduler.
//!
//! The authoritative in-ledger scheduler is not guaranteed to fire
//! promptly, so the client nudges the Rating Service itself: one resolve
//! call immediately at start, then one per period. The resolve operation
//! is idempotent by contract, so firing it too often is harmless; the
//! loop awaits each call before sleeping again, so calls never overlap
//! even when one outlives the period.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use laddersync_client::RatingService;

/// Default period between reconciliation passes.
pub const DEFAULT_RECONCILE_PERIOD: Duration = Duration::from_secs(10);

/// Timer-driven driver for the backend's resolve-unpublished operation.
///
/// Construction has no side effects; the timer only runs between
/// [`start`](Self::start) and [`stop`](Self::stop). Dropping the
/// scheduler stops it.
pub struct ReconcileScheduler<S> {
    service: Arc<S>,
    period: Duration,
    task: Option<JoinHandle<()>>,
}

impl<S> ReconcileScheduler<S> {
    /// Create a stopped scheduler with the given period.
    pub fn new(service: Arc<S>, period: Duration) -> Self {
        Self {
            service,
            period,
            task: None,
        }
    }

    /// Stop the timer. Idempotent; in-flight work is dropped.
    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    /// Whether the timer is currently running.
    pub fn is_running(&self) -> bool {
        self.task.is_some()
    }
}

impl<S: RatingService + 'static> ReconcileScheduler<S> {
    /// Start the periodic timer. The first resolve fires immediately.
    /// Calling `start` on a running scheduler does nothing.
    pub fn start(&mut self) {
        if self.task.is_some() {
            return;
        }

        let service = Arc::clone(&self.service);
        let period = self.period;

        self.task = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            // A resolve call that outlives the period must not cause a
            // burst of catch-up calls afterwards.
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                if let Err(e) = service.resolve_unpublished().await {
                    tracing::warn!("reconciliation pass failed: {e}");
                }
            }
        }));
    }
}

impl<S> Drop for ReconcileScheduler<S> {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use laddersync_client::{PublishOutcome, Result};
    use laddersync_core::{AgentId, CommittedRecord, Rating, RecordId, Score};
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Stub service that counts resolve calls and records the maximum
    /// number in flight at once.
    #[derive(Default)]
    struct ResolveProbe {
        calls: AtomicUsize,
        in_flight: AtomicUsize,
        max_in_flight: Mutex<usize>,
        resolve_latency: Duration,
    }

    impl ResolveProbe {
        fn with_latency(latency: Duration) -> Self {
            Self {
                resolve_latency: latency,
                ..Default::default()
            }
        }
    }

    #[async_trait]
    impl RatingService for ResolveProbe {
        async fn results_for_agents(
            &self,
            _agents: &[AgentId],
        ) -> Result<BTreeMap<AgentId, Vec<CommittedRecord>>> {
            Ok(BTreeMap::new())
        }

        async fn ratings_for_agents(
            &self,
            _agents: &[AgentId],
        ) -> Result<BTreeMap<AgentId, Rating>> {
            Ok(BTreeMap::new())
        }

        async fn ranking_chunk(
            &self,
            _from: Option<Rating>,
            _count: usize,
        ) -> Result<BTreeMap<Rating, Vec<AgentId>>> {
            Ok(BTreeMap::new())
        }

        async fn resolve_unpublished(&self) -> Result<()> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            {
                let mut max = self.max_in_flight.lock().unwrap();
                *max = (*max).max(now);
            }
            tokio::time::sleep(self.resolve_latency).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn publish_result(
            &self,
            _opponent: &AgentId,
            _score: Score,
        ) -> Result<PublishOutcome> {
            Ok(PublishOutcome::OutdatedChainHead)
        }

        async fn link_own_result(&self, _record: &RecordId) -> Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_scheduler_fires_immediately_and_periodically() {
        let probe = Arc::new(ResolveProbe::with_latency(Duration::from_millis(1)));
        let mut scheduler = ReconcileScheduler::new(Arc::clone(&probe), Duration::from_millis(20));

        scheduler.start();
        tokio::time::sleep(Duration::from_millis(55)).await;
        scheduler.stop();

        // Immediate call plus at least two periodic ones.
        assert!(probe.calls.load(Ordering::SeqCst) >= 3);
    }

    #[tokio::test]
    async fn test_scheduler_never_overlaps_resolve_calls() {
        // Resolve takes longer than the period.
        let probe = Arc::new(ResolveProbe::with_latency(Duration::from_millis(30)));
        let mut scheduler = ReconcileScheduler::new(Arc::clone(&probe), Duration::from_millis(10));

        scheduler.start();
        tokio::time::sleep(Duration::from_millis(100)).await;
        scheduler.stop();

        assert!(probe.calls.load(Ordering::SeqCst) >= 2);
        assert_eq!(*probe.max_in_flight.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_start_and_stop_are_idempotent() {
        let probe = Arc::new(ResolveProbe::default());
        let mut scheduler = ReconcileScheduler::new(Arc::clone(&probe), Duration::from_secs(60));

        scheduler.start();
        scheduler.start();
        assert!(scheduler.is_running());

        scheduler.stop();
        scheduler.stop();
        assert!(!scheduler.is_running());
    }

    #[tokio::test]
    async fn test_scheduler_survives_resolve_failures() {
        struct FailingService;

        #[async_trait]
        impl RatingService for FailingService {
            async fn results_for_agents(
                &self,
                _agents: &[AgentId],
            ) -> Result<BTreeMap<AgentId, Vec<CommittedRecord>>> {
                Ok(BTreeMap::new())
            }
            async fn ratings_for_agents(
                &self,
                _agents: &[AgentId],
            ) -> Result<BTreeMap<AgentId, Rating>> {
                Ok(BTreeMap::new())
            }
            async fn ranking_chunk(
                &self,
                _from: Option<Rating>,
                _count: usize,
            ) -> Result<BTreeMap<Rating, Vec<AgentId>>> {
                Ok(BTreeMap::new())
            }
            async fn resolve_unpublished(&self) -> Result<()> {
                Err(laddersync_client::ServiceError::Transport("down".into()))
            }
            async fn publish_result(
                &self,
                _opponent: &AgentId,
                _score: Score,
            ) -> Result<PublishOutcome> {
                Ok(PublishOutcome::OutdatedChainHead)
            }
            async fn link_own_result(&self, _record: &RecordId) -> Result<()> {
                Ok(())
            }
        }

        let mut scheduler =
            ReconcileScheduler::new(Arc::new(FailingService), Duration::from_millis(10));
        scheduler.start();
        tokio::time::sleep(Duration::from_millis(40)).await;
        // Still running despite every pass failing.
        assert!(scheduler.is_running());
        scheduler.stop();
    }
}
