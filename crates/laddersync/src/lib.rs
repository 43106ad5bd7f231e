//! # laddersync
//!
//! Client-side synchronization layer for a peer-to-peer
//! competitive-rating application.
//!
//! ## Overview
//!
//! Participants are identified by public keys; match outcomes are
//! immutable records, each chained to its author's previous record via
//! an optimistic-concurrency link. A remote Rating Service inside the
//! ledger network owns persistence, chain linking and rating
//! arithmetic — this client never computes ratings itself. What it does
//! own:
//!
//! - **Reconciliation cache**: fresh local views of per-agent ratings
//!   and match histories, kept consistent against backend mutation and
//!   unsolicited push notifications.
//! - **Ranking paginator**: incremental materialization of the global
//!   leaderboard from cursor-based chunk queries.
//! - **Publish protocol**: outcome-aware publishing that surfaces
//!   chain-append conflicts from racing writers as data.
//! - **Reconciliation scheduler**: a periodic idempotent nudge toward
//!   backend consistency.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use laddersync::{ClientConfig, LadderClient, PublishReport};
//! use laddersync::core::{AgentId, Score};
//! # use laddersync::client_api::{ProfileDirectory, RatingService};
//!
//! async fn example<S, P>(service: Arc<S>, profiles: Arc<P>, pushes: tokio::sync::mpsc::Receiver<Vec<u8>>)
//! where
//!     S: RatingService + 'static,
//!     P: ProfileDirectory + 'static,
//! {
//!     let mut client = LadderClient::new(
//!         AgentId::new("my-public-key"),
//!         service,
//!         profiles,
//!         ClientConfig::default(),
//!     );
//!     client.start(pushes);
//!
//!     client.cache().refresh_my_rating().await.unwrap();
//!
//!     match client.publish(&AgentId::new("opponent"), Score::Win).await.unwrap() {
//!         PublishReport::Recorded { record, .. } => println!("recorded as {record}"),
//!         PublishReport::Rejected => println!("chain head moved, refresh and decide"),
//!     }
//!
//!     client.stop();
//! }
//! ```
//!
//! ## Re-exports
//!
//! - `laddersync::core` — domain types (`AgentId`, `MatchRecord`, ...)
//! - `laddersync::client_api` — the `RatingService` and
//!   `ProfileDirectory` seams and the push `Signal`
//! - `laddersync::store` — cache, paginator, router, scheduler

pub mod client;

// Re-export component crates
pub use laddersync_client as client_api;
pub use laddersync_core as core;
pub use laddersync_store as store;

// Re-export main types for convenience
pub use client::{ClientConfig, LadderClient, PublishReport};
pub use laddersync_client::{
    ProfileDirectory, PublishOutcome, RatingService, Result, ServiceError, Signal,
};
pub use laddersync_core::{
    AgentId, CommittedRecord, MatchRecord, Rating, RatingUpdate, RecordId, Score,
};
pub use laddersync_store::{
    CacheSnapshot, RankingPaginator, RankingSnapshot, RatingCache, ReconcileScheduler,
    SignalRouter,
};
