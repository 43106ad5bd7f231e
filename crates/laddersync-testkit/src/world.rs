//! A shared in-memory rating ledger.
//!
//! `LedgerWorld` plays the role of the whole ledger network in tests:
//! canonical record storage, per-agent chain heads, per-agent
//! discoverability indexes, rating arithmetic and signal fan-out. Each
//! participating client connects through [`LedgerWorld::connect`], which
//! hands out a [`MemoryLedger`](crate::MemoryLedger) bound to one agent.
//!
//! Publishing is split into `prepare` (read both chain heads and
//! ratings, build the record) and `commit` (validate the optimistic
//! links, then merge), so tests can interleave two writers' prepares to
//! provoke a genuine chain-head conflict.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;

use laddersync_client::{PublishOutcome, Signal};
use laddersync_core::{
    AgentId, CommittedRecord, MatchRecord, Rating, RatingUpdate, RecordId, Score,
};

use crate::ledger::MemoryLedger;

/// Rating for an agent who has not played any match yet.
pub const INITIAL_RATING: Rating = 1000;

/// Maximum rating gain or loss from one match.
pub const K_FACTOR: f32 = 32.0;

/// Standard Elo update for one match, player A's score given.
///
/// `elo_pair(1000, 1000, Score::Win) == (1016, 984)`.
pub fn elo_pair(rating_a: Rating, rating_b: Rating, score_a: Score) -> (Rating, Rating) {
    let expected_a = 1.0 / (1.0 + 10f32.powf((rating_b - rating_a) as f32 / 400.0));
    let expected_b = 1.0 - expected_a;
    let actual_a = score_a.value();
    let actual_b = score_a.inverse().value();

    let new_a = (rating_a as f32 + K_FACTOR * (actual_a - expected_a)).round() as Rating;
    let new_b = (rating_b as f32 + K_FACTOR * (actual_b - expected_b)).round() as Rating;
    (new_a, new_b)
}

/// A publish attempt built from a particular view of the chain heads.
///
/// Committing validates the embedded `previous_record` links against the
/// heads at commit time, which is where racing writers collide.
#[derive(Debug, Clone)]
pub struct PublishDraft {
    record: MatchRecord,
}

impl PublishDraft {
    /// The record this draft would commit.
    pub fn record(&self) -> &MatchRecord {
        &self.record
    }
}

/// A frozen view of chain heads and ratings, used to publish "from the
/// past" and provoke an `OutdatedChainHead`.
#[derive(Debug, Clone)]
pub struct HeadView {
    heads: HashMap<AgentId, RecordId>,
    ratings: HashMap<AgentId, Rating>,
}

struct WorldInner {
    /// Canonical records by id.
    records: HashMap<RecordId, CommittedRecord>,
    /// Each agent's chain head: the id of their latest record.
    heads: HashMap<AgentId, RecordId>,
    /// Current rating per known agent.
    ratings: HashMap<AgentId, Rating>,
    /// Discoverability index: which records an agent's history links to.
    index: HashMap<AgentId, Vec<RecordId>>,
    /// Logical commit clock; each commit gets a strictly later value.
    clock: i64,
}

/// The shared ledger state. Thread-safe; clone the `Arc` freely.
pub struct LedgerWorld {
    inner: Mutex<WorldInner>,
    subscribers: Mutex<Vec<mpsc::Sender<Vec<u8>>>>,
}

impl LedgerWorld {
    /// Create an empty world.
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            inner: Mutex::new(WorldInner {
                records: HashMap::new(),
                heads: HashMap::new(),
                ratings: HashMap::new(),
                index: HashMap::new(),
                clock: 1,
            }),
            subscribers: Mutex::new(Vec::new()),
        })
    }

    /// Connect a client for `agent`, registering them at the initial
    /// rating if unknown.
    pub fn connect(self: &Arc<Self>, agent: impl Into<AgentId>) -> MemoryLedger {
        let agent = agent.into();
        self.register(&agent);
        MemoryLedger::new(Arc::clone(self), agent)
    }

    /// Register an agent at the initial rating (no-op if known).
    pub fn register(&self, agent: &AgentId) {
        let mut inner = self.inner.lock().unwrap();
        inner.ratings.entry(agent.clone()).or_insert(INITIAL_RATING);
        inner.index.entry(agent.clone()).or_default();
    }

    /// Fixture helper: force an agent's rating, registering them first.
    pub fn set_rating(&self, agent: &AgentId, rating: Rating) {
        self.register(agent);
        self.inner
            .lock()
            .unwrap()
            .ratings
            .insert(agent.clone(), rating);
    }

    /// Subscribe to the push channel. Delivery is at-most-once: a full
    /// subscriber queue drops the signal.
    pub fn subscribe(&self) -> mpsc::Receiver<Vec<u8>> {
        let (tx, rx) = mpsc::channel(64);
        self.subscribers.lock().unwrap().push(tx);
        rx
    }

    /// Freeze the current heads and ratings.
    pub fn head_view(&self) -> HeadView {
        let inner = self.inner.lock().unwrap();
        HeadView {
            heads: inner.heads.clone(),
            ratings: inner.ratings.clone(),
        }
    }

    /// Build a publish draft from the live chain heads.
    pub fn prepare(
        &self,
        author: &AgentId,
        opponent: &AgentId,
        score: Score,
        info: Vec<u8>,
    ) -> PublishDraft {
        self.prepare_with_view(author, opponent, score, info, &self.head_view())
    }

    /// Build a publish draft from a frozen view of heads and ratings.
    pub fn prepare_with_view(
        &self,
        author: &AgentId,
        opponent: &AgentId,
        score: Score,
        info: Vec<u8>,
        view: &HeadView,
    ) -> PublishDraft {
        self.register(author);
        self.register(opponent);

        let rating_of = |agent: &AgentId| view.ratings.get(agent).copied().unwrap_or(INITIAL_RATING);
        let (new_author, new_opponent) = elo_pair(rating_of(author), rating_of(opponent), score);

        PublishDraft {
            record: MatchRecord {
                player_a: RatingUpdate {
                    agent: author.clone(),
                    current_rating: new_author,
                    previous_record: view.heads.get(author).cloned(),
                },
                player_b: RatingUpdate {
                    agent: opponent.clone(),
                    current_rating: new_opponent,
                    previous_record: view.heads.get(opponent).cloned(),
                },
                score_a: score,
                info,
            },
        }
    }

    /// Validate a draft against the live chain heads and commit it.
    ///
    /// Either player's `previous_record` disagreeing with their current
    /// head means a racing writer got there first: the draft is rejected
    /// outright and nothing is merged.
    pub fn commit(&self, draft: PublishDraft) -> PublishOutcome {
        let record = draft.record;
        let signal;
        let id;
        {
            let mut inner = self.inner.lock().unwrap();

            for update in [&record.player_a, &record.player_b] {
                if inner.heads.get(&update.agent) != update.previous_record.as_ref() {
                    return PublishOutcome::OutdatedChainHead;
                }
            }

            id = derive_record_id(&record, inner.clock);
            let committed = CommittedRecord {
                id: id.clone(),
                committed_at: inner.clock,
                record: record.clone(),
            };
            inner.clock += 1;
            inner.records.insert(id.clone(), committed);

            for update in [&record.player_a, &record.player_b] {
                inner.heads.insert(update.agent.clone(), id.clone());
                inner
                    .ratings
                    .insert(update.agent.clone(), update.current_rating);
            }

            signal = Signal::NewMatchRecord {
                record_id: id.clone(),
                record,
                link_missing: true,
            };
        }

        self.broadcast(&signal);
        PublishOutcome::Published { record: id }
    }

    /// Link a record into `agent`'s discoverability index. Idempotent.
    /// Returns false if the record does not exist canonically.
    pub fn link(&self, agent: &AgentId, record: &RecordId) -> bool {
        let mut inner = self.inner.lock().unwrap();
        if !inner.records.contains_key(record) {
            return false;
        }
        let linked = inner.index.entry(agent.clone()).or_default();
        if !linked.contains(record) {
            linked.push(record.clone());
        }
        true
    }

    /// Index every committed record involving `agent` that their index
    /// does not link to yet. Idempotent; commit order is preserved.
    pub fn resolve_for(&self, agent: &AgentId) {
        let mut inner = self.inner.lock().unwrap();

        let mut missing: Vec<(i64, RecordId)> = inner
            .records
            .values()
            .filter(|c| c.record.update_for(agent).is_some())
            .filter(|c| {
                inner
                    .index
                    .get(agent)
                    .map_or(true, |linked| !linked.contains(&c.id))
            })
            .map(|c| (c.committed_at, c.id.clone()))
            .collect();
        missing.sort();

        let linked = inner.index.entry(agent.clone()).or_default();
        for (_, id) in missing {
            linked.push(id);
        }
    }

    /// The indexed history of an agent, in link order.
    pub fn results_for(&self, agent: &AgentId) -> Vec<CommittedRecord> {
        let inner = self.inner.lock().unwrap();
        inner
            .index
            .get(agent)
            .into_iter()
            .flatten()
            .filter_map(|id| inner.records.get(id).cloned())
            .collect()
    }

    /// Current ratings for the known subset of `agents`.
    pub fn ratings_for(&self, agents: &[AgentId]) -> HashMap<AgentId, Rating> {
        let inner = self.inner.lock().unwrap();
        agents
            .iter()
            .filter_map(|a| inner.ratings.get(a).map(|r| (a.clone(), *r)))
            .collect()
    }

    /// One leaderboard page: up to `count` agents rated at or below
    /// `from` (from the top when `None`), grouped by rating, walking the
    /// ratings in descending order. The boundary group may be partial.
    pub fn ranking_chunk(
        &self,
        from: Option<Rating>,
        count: usize,
    ) -> std::collections::BTreeMap<Rating, Vec<AgentId>> {
        let inner = self.inner.lock().unwrap();

        let mut by_rating: std::collections::BTreeMap<Rating, Vec<AgentId>> =
            std::collections::BTreeMap::new();
        for (agent, rating) in &inner.ratings {
            by_rating.entry(*rating).or_default().push(agent.clone());
        }

        let mut page = std::collections::BTreeMap::new();
        let mut taken = 0;
        for (rating, mut agents) in by_rating.into_iter().rev() {
            if taken >= count {
                break;
            }
            if from.is_some_and(|cursor| rating > cursor) {
                continue;
            }
            agents.sort();
            agents.truncate(count - taken);
            taken += agents.len();
            page.insert(rating, agents);
        }
        page
    }

    fn broadcast(&self, signal: &Signal) {
        let wire = signal.to_wire().expect("signal encodes");
        for subscriber in self.subscribers.lock().unwrap().iter() {
            // At-most-once: a full queue loses the signal.
            let _ = subscriber.try_send(wire.clone());
        }
    }
}

/// Content-address a record at its commit position.
fn derive_record_id(record: &MatchRecord, position: i64) -> RecordId {
    let mut buf = Vec::new();
    ciborium::into_writer(&(position, record), &mut buf).expect("record encodes");
    RecordId::new(hex::encode(blake3::hash(&buf).as_bytes()))
}
