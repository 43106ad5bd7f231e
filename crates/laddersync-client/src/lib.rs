//! # laddersync-client
//!
//! The external-interface layer of the laddersync client: async trait
//! seams for the Rating Service and the Profile Directory, plus the
//! typed push-channel signals.
//!
//! ## Overview
//!
//! Everything the client knows about the outside world goes through two
//! traits:
//!
//! - [`RatingService`] — the bulk lookup RPCs, the idempotent
//!   reconciliation trigger, and the publish/link pair.
//! - [`ProfileDirectory`] — fire-and-forget identity prefetch.
//!
//! Push notifications arrive as raw bytes and decode into [`Signal`]
//! values. Chain-head conflicts are returned as [`PublishOutcome`] data,
//! never as errors.

pub mod error;
pub mod profiles;
pub mod service;
pub mod signal;

pub use error::{Result, ServiceError};
pub use profiles::ProfileDirectory;
pub use service::{PublishOutcome, RatingService};
pub use signal::Signal;
