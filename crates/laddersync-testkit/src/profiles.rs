//! Profile Directory stub that records what was prefetched.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use laddersync_client::{ProfileDirectory, Result, ServiceError};
use laddersync_core::AgentId;

/// In-memory profile directory. Remembers every agent whose profile was
/// prefetched so tests can assert the paginator batched them correctly.
#[derive(Default)]
pub struct MemoryProfiles {
    fetched: Mutex<Vec<AgentId>>,
    fail_next: AtomicBool,
}

impl MemoryProfiles {
    /// Create an empty directory stub.
    pub fn new() -> Self {
        Self::default()
    }

    /// All agents prefetched so far, in call order.
    pub fn fetched(&self) -> Vec<AgentId> {
        self.fetched.lock().unwrap().clone()
    }

    /// Make the next prefetch fail with a transport error.
    pub fn fail_next(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl ProfileDirectory for MemoryProfiles {
    async fn fetch_profiles(&self, agents: &[AgentId]) -> Result<()> {
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(ServiceError::Transport("injected profile failure".into()));
        }
        self.fetched.lock().unwrap().extend_from_slice(agents);
        Ok(())
    }
}
