//! Push-channel signals from the ledger network.
//!
//! Signals are delivered at-most-once per commit with no cross-commit
//! ordering guarantee; consumers treat them as hints to re-fetch, never
//! as authoritative state.

use serde::{Deserialize, Serialize};

use laddersync_core::{MatchRecord, RecordId};

use crate::error::{Result, ServiceError};

/// A typed push notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Signal {
    /// A new match record was committed somewhere in the network.
    NewMatchRecord {
        /// Id of the committed record.
        record_id: RecordId,
        /// The record itself, as committed.
        record: MatchRecord,
        /// True if the author has not yet linked the record into their
        /// own index (the partial-link window).
        link_missing: bool,
    },
}

impl Signal {
    /// Decode a signal from its wire form.
    pub fn from_wire(bytes: &[u8]) -> Result<Self> {
        ciborium::from_reader(bytes).map_err(|e| ServiceError::Decode(e.to_string()))
    }

    /// Encode a signal to its wire form.
    pub fn to_wire(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        ciborium::into_writer(self, &mut buf)
            .map_err(|e| ServiceError::Decode(e.to_string()))?;
        Ok(buf)
    }
}
