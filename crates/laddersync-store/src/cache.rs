//! The reconciliation cache: fresh local views of ratings and history.
//!
//! The cache exclusively owns two derived maps (agent → rating, agent →
//! ordered match history) and keeps them fresh against backend mutation
//! through explicit refreshes and unsolicited push signals. Readers get
//! immutable snapshots through a watch channel; each logical update is
//! published as exactly one new snapshot version.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::watch;

use laddersync_client::{RatingService, Result, Signal};
use laddersync_core::{AgentId, CommittedRecord, Rating};

use crate::merge::{merge_histories, merge_ratings};

/// An immutable view of the cache at one point in time.
#[derive(Debug, Clone, Default)]
pub struct CacheSnapshot {
    ratings: HashMap<AgentId, Rating>,
    histories: HashMap<AgentId, Vec<CommittedRecord>>,
}

impl CacheSnapshot {
    /// The cached rating of an agent, if one has been fetched.
    pub fn rating_of(&self, agent: &AgentId) -> Option<Rating> {
        self.ratings.get(agent).copied()
    }

    /// The cached match history of an agent, newest first. Empty if the
    /// agent's history has never been fetched.
    pub fn history_of(&self, agent: &AgentId) -> &[CommittedRecord] {
        self.histories.get(agent).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All cached ratings.
    pub fn ratings(&self) -> &HashMap<AgentId, Rating> {
        &self.ratings
    }

    /// All cached histories.
    pub fn histories(&self) -> &HashMap<AgentId, Vec<CommittedRecord>> {
        &self.histories
    }
}

/// The reconciliation cache.
///
/// Owns fetch-then-merge: every refresh bulk-fetches from the Rating
/// Service and merges by key overwrite, so unrelated keys are never
/// touched or removed. A failed fetch leaves the cache exactly as it
/// was; retrying is the caller's decision.
pub struct RatingCache<S> {
    me: AgentId,
    service: Arc<S>,
    state: watch::Sender<CacheSnapshot>,
}

impl<S: RatingService> RatingCache<S> {
    /// Create an empty cache for the given local agent.
    pub fn new(me: AgentId, service: Arc<S>) -> Self {
        let (state, _) = watch::channel(CacheSnapshot::default());
        Self { me, service, state }
    }

    /// The local agent's id.
    pub fn me(&self) -> &AgentId {
        &self.me
    }

    /// Subscribe to cache updates. Each refresh or signal produces at
    /// most one new snapshot version.
    pub fn subscribe(&self) -> watch::Receiver<CacheSnapshot> {
        self.state.subscribe()
    }

    /// The current snapshot.
    pub fn snapshot(&self) -> CacheSnapshot {
        self.state.borrow().clone()
    }

    /// The local agent's cached rating.
    pub fn my_rating(&self) -> Option<Rating> {
        self.state.borrow().rating_of(&self.me)
    }

    /// The local agent's cached history, newest first.
    pub fn my_history(&self) -> Vec<CommittedRecord> {
        self.state.borrow().history_of(&self.me).to_vec()
    }

    /// Bulk-fetch ratings for `agents` and merge them in.
    pub async fn refresh_ratings(&self, agents: &[AgentId]) -> Result<()> {
        let fetched = self.service.ratings_for_agents(agents).await?;
        self.state.send_modify(|snapshot| {
            merge_ratings(&mut snapshot.ratings, fetched);
        });
        Ok(())
    }

    /// Bulk-fetch match histories for `agents` and merge them in,
    /// re-ordering each affected agent's list by descending commit
    /// timestamp.
    pub async fn refresh_history(&self, agents: &[AgentId]) -> Result<()> {
        let fetched = self.service.results_for_agents(agents).await?;
        self.state.send_modify(|snapshot| {
            merge_histories(&mut snapshot.histories, fetched);
        });
        Ok(())
    }

    /// Refresh the local agent's rating.
    pub async fn refresh_my_rating(&self) -> Result<()> {
        self.refresh_ratings(std::slice::from_ref(&self.me)).await
    }

    /// Refresh the local agent's history.
    pub async fn refresh_my_history(&self) -> Result<()> {
        self.refresh_history(std::slice::from_ref(&self.me)).await
    }

    /// Handle a push signal.
    ///
    /// For a new match record, both participants' ratings and histories
    /// are fetched and applied as one combined update: no reader can
    /// observe the rating refreshed but the history stale, or vice
    /// versa, for the same signal. If either fetch fails, nothing is
    /// applied.
    pub async fn on_signal(&self, signal: &Signal) -> Result<()> {
        match signal {
            Signal::NewMatchRecord { record, record_id, .. } => {
                let players = record.participants();
                tracing::debug!(record = %record_id, "refreshing cache for new match record");

                let (ratings, histories) = tokio::try_join!(
                    self.service.ratings_for_agents(&players),
                    self.service.results_for_agents(&players),
                )?;

                self.state.send_modify(|snapshot| {
                    merge_ratings(&mut snapshot.ratings, ratings);
                    merge_histories(&mut snapshot.histories, histories);
                });
                Ok(())
            }
        }
    }
}
