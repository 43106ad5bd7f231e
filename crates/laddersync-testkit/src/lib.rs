//! # laddersync-testkit
//!
//! Testing utilities for laddersync.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **[`LedgerWorld`]**: an in-memory stand-in for the whole ledger
//!   network — canonical records, chain heads, rating arithmetic,
//!   discoverability indexes and signal fan-out.
//! - **[`MemoryLedger`]**: one agent's `RatingService` connection to a
//!   world, with failure injection and stale-head capture for conflict
//!   scenarios.
//! - **[`MemoryProfiles`]**: a `ProfileDirectory` stub that logs
//!   prefetches.
//! - **Fixtures**: deterministic agents, seeded worlds, tracing setup.
//!
//! ## Conflict scenarios
//!
//! ```rust
//! use laddersync_client::{PublishOutcome, RatingService};
//! use laddersync_core::Score;
//! use laddersync_testkit::LedgerWorld;
//!
//! # #[tokio::main(flavor = "current_thread")] async fn main() {
//! let world = LedgerWorld::new();
//! let alice = world.connect("alice");
//! let bob = world.connect("bob");
//!
//! // Bob reads the chain heads, then Alice publishes first.
//! bob.capture_stale_heads();
//! let first = alice.publish_result(bob.me(), Score::Win).await.unwrap();
//! assert!(matches!(first, PublishOutcome::Published { .. }));
//!
//! // Bob's publish was built against stale heads and is rejected.
//! let second = bob.publish_result(alice.me(), Score::Loss).await.unwrap();
//! assert_eq!(second, PublishOutcome::OutdatedChainHead);
//! # }
//! ```

pub mod fixtures;
pub mod ledger;
pub mod profiles;
pub mod world;

pub use fixtures::{agents, init_tracing, random_agent, seeded_world};
pub use ledger::MemoryLedger;
pub use profiles::MemoryProfiles;
pub use world::{elo_pair, HeadView, LedgerWorld, PublishDraft, INITIAL_RATING, K_FACTOR};
