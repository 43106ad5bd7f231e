//! The Rating Service seam: the abstract interface to the backend.
//!
//! The Rating Service runs inside the ledger network and owns
//! persistence, chain linking and rating arithmetic. The client never
//! computes ratings itself; everything here is a thin RPC stub.

use std::collections::BTreeMap;

use async_trait::async_trait;
use laddersync_core::{AgentId, CommittedRecord, Rating, RecordId, Score};

use crate::error::Result;

/// Outcome of a publish attempt.
///
/// `OutdatedChainHead` is an expected, non-fatal business result: a
/// racing writer advanced one of the chain heads between the client's
/// last read and this publish. The attempt is rejected outright and
/// never silently retried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishOutcome {
    /// The record was committed canonically.
    ///
    /// The author must still call [`RatingService::link_own_result`] with
    /// this id before the record is discoverable via their own history.
    Published {
        /// The ledger-assigned id of the new record.
        record: RecordId,
    },
    /// Rejected: the expected chain head was stale. Nothing was merged.
    OutdatedChainHead,
}

/// Async RPC interface to the Rating Service.
///
/// # Design Notes
///
/// - **Bulk by default**: lookups take agent slices and return maps so a
///   signal handler can refresh both participants in one round-trip each.
/// - **Failures are transient**: any error leaves backend state unknown
///   but client caches untouched; no retry happens at this layer.
/// - **`resolve_unpublished` is idempotent**: safe to invoke arbitrarily
///   often, which is what lets the scheduler fire it on a fixed period.
#[async_trait]
pub trait RatingService: Send + Sync {
    /// Fetch the committed match history of each given agent.
    ///
    /// Returns only records the agent's own index links to; a record in
    /// its partial-link window is legitimately absent.
    async fn results_for_agents(
        &self,
        agents: &[AgentId],
    ) -> Result<BTreeMap<AgentId, Vec<CommittedRecord>>>;

    /// Fetch the current rating of each given agent.
    async fn ratings_for_agents(&self, agents: &[AgentId]) -> Result<BTreeMap<AgentId, Rating>>;

    /// Fetch one leaderboard page: up to `count` agents rated at or
    /// below `from` (or from the top when `from` is `None`), grouped by
    /// exact rating value, descending.
    async fn ranking_chunk(
        &self,
        from: Option<Rating>,
        count: usize,
    ) -> Result<BTreeMap<Rating, Vec<AgentId>>>;

    /// Ask the backend to resolve match results a peer recorded but
    /// could not fully index. Idempotent by contract.
    async fn resolve_unpublished(&self) -> Result<()>;

    /// Publish the outcome of a match against `opponent`, with `score`
    /// being the caller's result. The backend reads both chain heads,
    /// computes both new ratings and either commits or reports a
    /// conflict.
    async fn publish_result(&self, opponent: &AgentId, score: Score) -> Result<PublishOutcome>;

    /// Link a just-published record into the author's own index, making
    /// it discoverable via their history.
    async fn link_own_result(&self, record: &RecordId) -> Result<()>;
}
