//! Strong type definitions for laddersync.
//!
//! Identities are newtypes over the opaque strings the ledger hands out,
//! to prevent mixing agents and record ids at compile time.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Integer skill score. Higher is stronger. May be negative; no floor
/// is enforced anywhere in the client.
pub type Rating = i32;

/// The public-key identity of a participant.
///
/// Opaque to the client: agents have no lifecycle and are implicitly
/// created on first reference.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgentId(String);

impl AgentId {
    /// Create an AgentId from its string form.
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the string form.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AgentId({})", self.0)
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for AgentId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for AgentId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl AsRef<str> for AgentId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Identifier of a committed match record, assigned by the ledger.
///
/// Used both to address records and as the optimistic-concurrency link
/// each player's chain head holds to their own prior record.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// Create a RecordId from its string form.
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the string form.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let short = if self.0.len() > 16 { &self.0[..16] } else { &self.0 };
        write!(f, "RecordId({short})")
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for RecordId {
    fn from(s: String) -> Self {
        Self(s)
    }
}
