//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use std::sync::Arc;

use laddersync_core::{AgentId, Rating};

use crate::world::LedgerWorld;

/// Deterministic agent ids `agent-0` .. `agent-{n-1}`.
pub fn agents(n: usize) -> Vec<AgentId> {
    (0..n).map(|i| AgentId::new(format!("agent-{i}"))).collect()
}

/// A fresh agent id that will not collide across tests sharing a world.
pub fn random_agent() -> AgentId {
    AgentId::new(format!("agent-{:08x}", rand::random::<u32>()))
}

/// A world pre-seeded with the given (agent, rating) pairs.
pub fn seeded_world(ratings: &[(&str, Rating)]) -> Arc<LedgerWorld> {
    let world = LedgerWorld::new();
    for (name, rating) in ratings {
        world.set_rating(&AgentId::new(*name), *rating);
    }
    world
}

/// Install a test-friendly tracing subscriber. Safe to call repeatedly.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_agents_are_deterministic() {
        assert_eq!(agents(2), agents(2));
        assert_eq!(agents(1)[0].as_str(), "agent-0");
    }

    #[test]
    fn test_seeded_world_holds_ratings() {
        let world = seeded_world(&[("alice", 1200), ("bob", 800)]);
        let fetched = world.ratings_for(&agents_named(&["alice", "bob"]));
        assert_eq!(fetched[&AgentId::new("alice")], 1200);
        assert_eq!(fetched[&AgentId::new("bob")], 800);
    }

    fn agents_named(names: &[&str]) -> Vec<AgentId> {
        names.iter().map(|n| AgentId::new(*n)).collect()
    }
}
