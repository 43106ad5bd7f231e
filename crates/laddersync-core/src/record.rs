//! Match records: the atomic unit of rating history.
//!
//! A match record is immutable once committed. Each player's records form
//! a singly linked chain through `previous_record`; two racing writers can
//! legitimately reference the same prior link, which the ledger rejects as
//! a chain-head conflict.

use serde::{Deserialize, Serialize};

use crate::types::{AgentId, Rating, RecordId};

/// The score of player A in a match, from player A's perspective.
///
/// Player B's score is always the inverse (`score_b = 1 - score_a`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Score {
    /// Player A lost (0.0).
    Loss,
    /// The match was drawn (0.5).
    Draw,
    /// Player A won (1.0).
    Win,
}

impl Score {
    /// The numeric value of this score.
    pub fn value(self) -> f32 {
        match self {
            Score::Loss => 0.0,
            Score::Draw => 0.5,
            Score::Win => 1.0,
        }
    }

    /// The opponent's score for the same match.
    pub fn inverse(self) -> Self {
        match self {
            Score::Loss => Score::Win,
            Score::Draw => Score::Draw,
            Score::Win => Score::Loss,
        }
    }

    /// Parse from the numeric form used on the wire.
    ///
    /// Only 0, 0.5 and 1 are valid scores.
    pub fn from_value(value: f32) -> Result<Self, InvalidScore> {
        if value == 0.0 {
            Ok(Score::Loss)
        } else if value == 0.5 {
            Ok(Score::Draw)
        } else if value == 1.0 {
            Ok(Score::Win)
        } else {
            Err(InvalidScore(value))
        }
    }
}

/// Error for a numeric score outside {0, 0.5, 1}.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
#[error("invalid score value: {0} (expected 0, 0.5 or 1)")]
pub struct InvalidScore(pub f32);

/// One player's state after a match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingUpdate {
    /// The player this update belongs to.
    pub agent: AgentId,
    /// The player's rating after the match.
    pub current_rating: Rating,
    /// Link to the player's previous record. None for their first match.
    pub previous_record: Option<RecordId>,
}

/// An immutable record of one match outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    /// Player A's state after the match.
    pub player_a: RatingUpdate,
    /// Player B's state after the match.
    pub player_b: RatingUpdate,
    /// Player A's score; player B's is the inverse.
    pub score_a: Score,
    /// Opaque application payload describing the match.
    pub info: Vec<u8>,
}

impl MatchRecord {
    /// The two participants, player A first.
    pub fn participants(&self) -> [AgentId; 2] {
        [self.player_a.agent.clone(), self.player_b.agent.clone()]
    }

    /// The opponent of `agent` in this match, if `agent` played in it.
    pub fn opponent_of(&self, agent: &AgentId) -> Option<&AgentId> {
        if &self.player_a.agent == agent {
            Some(&self.player_b.agent)
        } else if &self.player_b.agent == agent {
            Some(&self.player_a.agent)
        } else {
            None
        }
    }

    /// The score of `agent` in this match, if `agent` played in it.
    pub fn score_for(&self, agent: &AgentId) -> Option<Score> {
        if &self.player_a.agent == agent {
            Some(self.score_a)
        } else if &self.player_b.agent == agent {
            Some(self.score_a.inverse())
        } else {
            None
        }
    }

    /// The rating update for `agent`, if `agent` played in this match.
    pub fn update_for(&self, agent: &AgentId) -> Option<&RatingUpdate> {
        if &self.player_a.agent == agent {
            Some(&self.player_a)
        } else if &self.player_b.agent == agent {
            Some(&self.player_b)
        } else {
            None
        }
    }
}

/// A match record together with its commit provenance.
///
/// `committed_at` comes from the ledger's commit metadata, not from any
/// field inside the record, and orders an agent's history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommittedRecord {
    /// The ledger-assigned record id.
    pub id: RecordId,
    /// Commit timestamp (Unix milliseconds) from the record's provenance.
    pub committed_at: i64,
    /// The record itself.
    pub record: MatchRecord,
}
