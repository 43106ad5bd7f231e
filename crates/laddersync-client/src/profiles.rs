//! The Profile Directory seam.

use async_trait::async_trait;
use laddersync_core::AgentId;

use crate::error::Result;

/// Identity/display-name lookup collaborator.
///
/// Prefetching populates an external name-resolution cache consumed by
/// the rendering layer; this core never reads profile contents back. The
/// paginator still awaits the prefetch so a chunk is never applied with
/// unresolved identities.
#[async_trait]
pub trait ProfileDirectory: Send + Sync {
    /// Prefetch the profiles of the given agents in one batch.
    async fn fetch_profiles(&self, agents: &[AgentId]) -> Result<()>;
}
