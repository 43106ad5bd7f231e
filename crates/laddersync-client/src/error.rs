//! Error types for the client seams.

use thiserror::Error;

/// Errors surfaced by the Rating Service and Profile Directory seams.
///
/// A chain-head conflict is *not* an error: it comes back as
/// [`crate::PublishOutcome::OutdatedChainHead`] so callers can tell
/// "result recorded" from "result rejected, still contestable".
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The RPC could not be completed. Cached state is left untouched;
    /// retrying is the caller's decision.
    #[error("transport error: {0}")]
    Transport(String),

    /// A push payload or RPC response could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),

    /// The backend refused the call outright (malformed input, unknown
    /// operation). Distinct from a transient transport failure.
    #[error("rejected by rating service: {0}")]
    Rejected(String),
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, ServiceError>;
