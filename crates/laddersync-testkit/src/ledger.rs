//! One client's connection to the in-memory ledger.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use laddersync_client::{PublishOutcome, RatingService, Result, ServiceError};
use laddersync_core::{AgentId, CommittedRecord, Rating, RecordId, Score};

use crate::world::{HeadView, LedgerWorld};

/// A `RatingService` implementation bound to one agent of a shared
/// [`LedgerWorld`].
///
/// Supports failure injection: [`fail_next_fetch`](Self::fail_next_fetch)
/// makes the next lookup RPC fail with a transport error, and
/// [`fail_next_link`](Self::fail_next_link) does the same for the next
/// link call (opening the partial-link window).
/// [`capture_stale_heads`](Self::capture_stale_heads) freezes the chain
/// heads so the next publish races whatever commits in between.
pub struct MemoryLedger {
    world: Arc<LedgerWorld>,
    me: AgentId,
    stale_view: Mutex<Option<HeadView>>,
    fail_next_fetch: AtomicBool,
    fail_next_link: AtomicBool,
}

impl MemoryLedger {
    pub(crate) fn new(world: Arc<LedgerWorld>, me: AgentId) -> Self {
        Self {
            world,
            me,
            stale_view: Mutex::new(None),
            fail_next_fetch: AtomicBool::new(false),
            fail_next_link: AtomicBool::new(false),
        }
    }

    /// The agent this connection publishes as.
    pub fn me(&self) -> &AgentId {
        &self.me
    }

    /// The shared world behind this connection.
    pub fn world(&self) -> &Arc<LedgerWorld> {
        &self.world
    }

    /// Make the next lookup RPC fail with a transport error.
    pub fn fail_next_fetch(&self) {
        self.fail_next_fetch.store(true, Ordering::SeqCst);
    }

    /// Make the next `link_own_result` call fail with a transport error.
    pub fn fail_next_link(&self) {
        self.fail_next_link.store(true, Ordering::SeqCst);
    }

    /// Freeze the current chain heads; the next publish is built from
    /// this frozen view instead of the live one.
    pub fn capture_stale_heads(&self) {
        *self.stale_view.lock().unwrap() = Some(self.world.head_view());
    }

    fn check_fetch_failure(&self) -> Result<()> {
        if self.fail_next_fetch.swap(false, Ordering::SeqCst) {
            Err(ServiceError::Transport("injected fetch failure".into()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl RatingService for MemoryLedger {
    async fn results_for_agents(
        &self,
        agents: &[AgentId],
    ) -> Result<std::collections::BTreeMap<AgentId, Vec<CommittedRecord>>> {
        self.check_fetch_failure()?;
        Ok(agents
            .iter()
            .map(|agent| (agent.clone(), self.world.results_for(agent)))
            .collect())
    }

    async fn ratings_for_agents(
        &self,
        agents: &[AgentId],
    ) -> Result<std::collections::BTreeMap<AgentId, Rating>> {
        self.check_fetch_failure()?;
        Ok(self.world.ratings_for(agents).into_iter().collect())
    }

    async fn ranking_chunk(
        &self,
        from: Option<Rating>,
        count: usize,
    ) -> Result<std::collections::BTreeMap<Rating, Vec<AgentId>>> {
        self.check_fetch_failure()?;
        Ok(self.world.ranking_chunk(from, count))
    }

    async fn resolve_unpublished(&self) -> Result<()> {
        self.world.resolve_for(&self.me);
        Ok(())
    }

    async fn publish_result(&self, opponent: &AgentId, score: Score) -> Result<PublishOutcome> {
        let draft = match self.stale_view.lock().unwrap().take() {
            Some(view) => self
                .world
                .prepare_with_view(&self.me, opponent, score, Vec::new(), &view),
            None => self.world.prepare(&self.me, opponent, score, Vec::new()),
        };
        Ok(self.world.commit(draft))
    }

    async fn link_own_result(&self, record: &RecordId) -> Result<()> {
        if self.fail_next_link.swap(false, Ordering::SeqCst) {
            return Err(ServiceError::Transport("injected link failure".into()));
        }
        if self.world.link(&self.me, record) {
            Ok(())
        } else {
            Err(ServiceError::Rejected(format!("unknown record {record}")))
        }
    }
}
