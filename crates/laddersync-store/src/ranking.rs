//! The ranking paginator: incremental materialization of the global
//! leaderboard.
//!
//! Each paginator instance owns one growing leaderboard snapshot built
//! from repeated cursor-based chunk fetches, one instance per browsing
//! session, never shared. Fetches are not safe to run concurrently on
//! the same instance; the `&mut self` receiver makes callers serialize.

use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::watch;

use laddersync_client::{ProfileDirectory, RatingService, Result};
use laddersync_core::{AgentId, Rating};

use crate::merge::merge_ranking;

/// The aggregated ranking fetched so far, plus the exhaustion flag.
#[derive(Debug, Clone, Default)]
pub struct RankingSnapshot {
    by_rating: BTreeMap<Rating, Vec<AgentId>>,
    exhausted: bool,
}

impl RankingSnapshot {
    /// Agents grouped by exact rating value.
    pub fn by_rating(&self) -> &BTreeMap<Rating, Vec<AgentId>> {
        &self.by_rating
    }

    /// Whether the last fetched page signalled end of data. Not
    /// permanent: the backing set can grow, and a later fetch may
    /// return a fresh non-empty page.
    pub fn exhausted(&self) -> bool {
        self.exhausted
    }

    /// Total number of agents held.
    pub fn agent_count(&self) -> usize {
        self.by_rating.values().map(Vec::len).sum()
    }

    /// The lowest rating value fetched so far.
    pub fn min_rating_seen(&self) -> Option<Rating> {
        self.by_rating.keys().next().copied()
    }

    /// All (rating, agent) pairs, strongest first.
    pub fn iter_descending(&self) -> impl Iterator<Item = (Rating, &AgentId)> {
        self.by_rating
            .iter()
            .rev()
            .flat_map(|(rating, agents)| agents.iter().map(move |a| (*rating, a)))
    }
}

/// Cursor-based leaderboard paginator.
pub struct RankingPaginator<S, P> {
    service: Arc<S>,
    profiles: Arc<P>,
    chunk_size: usize,
    state: watch::Sender<RankingSnapshot>,
}

impl<S: RatingService, P: ProfileDirectory> RankingPaginator<S, P> {
    /// Create a paginator fetching `chunk_size` agents per page.
    ///
    /// # Panics
    ///
    /// Panics if `chunk_size` is zero: a zero-sized page would never
    /// terminate pagination, so it is a caller error.
    pub fn new(service: Arc<S>, profiles: Arc<P>, chunk_size: usize) -> Self {
        assert!(chunk_size > 0, "chunk_size must be a positive integer");
        let (state, _) = watch::channel(RankingSnapshot::default());
        Self {
            service,
            profiles,
            chunk_size,
            state,
        }
    }

    /// Subscribe to snapshot updates.
    pub fn subscribe(&self) -> watch::Receiver<RankingSnapshot> {
        self.state.subscribe()
    }

    /// The current snapshot.
    pub fn snapshot(&self) -> RankingSnapshot {
        self.state.borrow().clone()
    }

    /// Fetch and apply the next leaderboard page.
    ///
    /// The cursor is one below the minimum rating fetched so far, or
    /// unbounded on the first call (which fetches the top of the
    /// leaderboard). All agents in the page have their identities
    /// prefetched in one batch before the chunk is applied, so the
    /// rendering layer never shows unresolved names. A rating value
    /// already held is replaced by the page's agent set for that value.
    ///
    /// Sets `exhausted` when the page came back with strictly fewer
    /// agents than `chunk_size`; cleared again if a later page is full.
    pub async fn fetch_next_chunk(&mut self) -> Result<()> {
        let cursor = self
            .state
            .borrow()
            .min_rating_seen()
            .map(|min| min.saturating_sub(1));

        let page = self.service.ranking_chunk(cursor, self.chunk_size).await?;

        let agents: Vec<AgentId> = page.values().flatten().cloned().collect();
        self.profiles.fetch_profiles(&agents).await?;

        let exhausted = agents.len() < self.chunk_size;
        tracing::debug!(
            cursor = ?cursor,
            fetched = agents.len(),
            exhausted,
            "applying ranking chunk"
        );

        self.state.send_modify(|snapshot| {
            merge_ranking(&mut snapshot.by_rating, page);
            snapshot.exhausted = exhausted;
        });
        Ok(())
    }
}
