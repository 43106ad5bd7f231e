//! # laddersync-core
//!
//! Core domain types for the laddersync client: the data model shared by
//! the RPC layer, the reconciliation cache and the ranking paginator.
//!
//! ## Key Concepts
//!
//! - **Agent**: a participant, identified by an opaque public key string.
//! - **MatchRecord**: immutable outcome of one match between two agents.
//!   Never edited; each player's records chain backwards through
//!   `previous_record`.
//! - **CommittedRecord**: a record plus its ledger commit provenance
//!   (record id and commit timestamp).
//! - **Score**: player A's result as one of win / draw / loss; player B's
//!   score is always the inverse.
//!
//! The Rating Service owns chain linking and rating arithmetic; these
//! types are read-through copies of what it serves.

pub mod record;
pub mod types;

pub use record::{CommittedRecord, InvalidScore, MatchRecord, RatingUpdate, Score};
pub use types::{AgentId, Rating, RecordId};
