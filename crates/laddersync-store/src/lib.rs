//! # laddersync-store
//!
//! Client-resident state for the laddersync system: the subsystems that
//! make distributed rating data usable locally.
//!
//! ## Overview
//!
//! - [`RatingCache`] — reconciliation cache over per-agent ratings and
//!   match histories; fetch-then-merge, signal-driven refreshes.
//! - [`RankingPaginator`] — cursor-based leaderboard paginator with
//!   dedup and exhaustion detection; one instance per browsing session.
//! - [`SignalRouter`] — decodes raw pushes and dispatches them to the
//!   cache.
//! - [`ReconcileScheduler`] — periodic idempotent nudge toward backend
//!   consistency.
//!
//! ## Key Properties
//!
//! - **Merges are idempotent and local**: applying a fetch result twice
//!   equals applying it once; refreshing `{A}` never changes state for
//!   any agent outside `{A}`.
//! - **Signal refreshes are atomic**: for one signal, ratings and
//!   history update in the same snapshot version.
//! - **Failures leave state untouched**: a failed fetch changes nothing
//!   and is surfaced to the caller; no automatic retry here.

pub mod cache;
mod merge;
pub mod ranking;
pub mod router;
pub mod scheduler;

pub use cache::{CacheSnapshot, RatingCache};
pub use ranking::{RankingPaginator, RankingSnapshot};
pub use router::SignalRouter;
pub use scheduler::{ReconcileScheduler, DEFAULT_RECONCILE_PERIOD};
