//! Pure merge helpers shared by the cache and the paginator.
//!
//! All merges are overwrite-per-key: a fetched value replaces whatever
//! the cache held for that key, and keys outside the fetch are never
//! touched or removed. This makes every merge idempotent and local.

use std::collections::{BTreeMap, HashMap};

use laddersync_core::{AgentId, CommittedRecord, Rating};

/// Merge fetched ratings into the cached map, key by key.
pub(crate) fn merge_ratings(
    into: &mut HashMap<AgentId, Rating>,
    fetched: BTreeMap<AgentId, Rating>,
) {
    for (agent, rating) in fetched {
        into.insert(agent, rating);
    }
}

/// Merge fetched histories into the cached map, key by key, then order
/// each affected agent's list by descending commit timestamp.
///
/// The sort key is the record's provenance timestamp, never a field of
/// the record itself. The sort is stable, so records committed in the
/// same millisecond keep their fetched order.
pub(crate) fn merge_histories(
    into: &mut HashMap<AgentId, Vec<CommittedRecord>>,
    fetched: BTreeMap<AgentId, Vec<CommittedRecord>>,
) {
    for (agent, mut records) in fetched {
        records.sort_by(|a, b| b.committed_at.cmp(&a.committed_at));
        into.insert(agent, records);
    }
}

/// Merge one leaderboard page into the aggregated ranking.
///
/// Pagination is authoritative per page: the page's agent set for a
/// rating value replaces any previously held set for that value.
pub(crate) fn merge_ranking(
    into: &mut BTreeMap<Rating, Vec<AgentId>>,
    page: BTreeMap<Rating, Vec<AgentId>>,
) {
    for (rating, agents) in page {
        into.insert(rating, agents);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use laddersync_core::{MatchRecord, RatingUpdate, RecordId, Score};
    use proptest::prelude::*;

    fn committed(id: &str, at: i64) -> CommittedRecord {
        let update = |name: &str| RatingUpdate {
            agent: AgentId::new(name),
            current_rating: 1000,
            previous_record: None,
        };
        CommittedRecord {
            id: RecordId::new(id),
            committed_at: at,
            record: MatchRecord {
                player_a: update("a"),
                player_b: update("b"),
                score_a: Score::Draw,
                info: Vec::new(),
            },
        }
    }

    #[test]
    fn test_history_merge_sorts_descending_by_commit_time() {
        let mut cached = HashMap::new();
        let fetched = BTreeMap::from([(
            AgentId::new("a"),
            vec![committed("r1", 10), committed("r2", 30), committed("r3", 20)],
        )]);

        merge_histories(&mut cached, fetched);

        let ids: Vec<&str> = cached[&AgentId::new("a")]
            .iter()
            .map(|r| r.id.as_str())
            .collect();
        assert_eq!(ids, ["r2", "r3", "r1"]);
    }

    #[test]
    fn test_history_merge_ties_keep_fetched_order() {
        let mut cached = HashMap::new();
        let fetched = BTreeMap::from([(
            AgentId::new("a"),
            vec![committed("first", 7), committed("second", 7)],
        )]);

        merge_histories(&mut cached, fetched);

        let ids: Vec<&str> = cached[&AgentId::new("a")]
            .iter()
            .map(|r| r.id.as_str())
            .collect();
        assert_eq!(ids, ["first", "second"]);
    }

    #[test]
    fn test_ranking_merge_replaces_existing_key() {
        let mut aggregated = BTreeMap::from([
            (1000, vec![AgentId::new("stale")]),
            (900, vec![AgentId::new("kept")]),
        ]);
        let page = BTreeMap::from([(1000, vec![AgentId::new("fresh")])]);

        merge_ranking(&mut aggregated, page);

        assert_eq!(aggregated[&1000], vec![AgentId::new("fresh")]);
        assert_eq!(aggregated[&900], vec![AgentId::new("kept")]);
    }

    fn arb_ratings() -> impl Strategy<Value = BTreeMap<AgentId, Rating>> {
        proptest::collection::btree_map("[a-f]{1,4}".prop_map(AgentId::new), -500i32..3000, 0..8)
    }

    proptest! {
        #[test]
        fn merge_ratings_is_idempotent(
            base in arb_ratings(),
            fetched in arb_ratings(),
        ) {
            let mut once: HashMap<_, _> = base.clone().into_iter().collect();
            merge_ratings(&mut once, fetched.clone());

            let mut twice: HashMap<_, _> = base.into_iter().collect();
            merge_ratings(&mut twice, fetched.clone());
            merge_ratings(&mut twice, fetched);

            prop_assert_eq!(once, twice);
        }

        #[test]
        fn merge_ratings_is_local(
            base in arb_ratings(),
            fetched in arb_ratings(),
        ) {
            let mut merged: HashMap<_, _> = base.clone().into_iter().collect();
            merge_ratings(&mut merged, fetched.clone());

            for (agent, rating) in &base {
                if !fetched.contains_key(agent) {
                    prop_assert_eq!(merged.get(agent), Some(rating));
                }
            }
            prop_assert_eq!(merged.len(), {
                let mut keys: std::collections::HashSet<_> = base.keys().collect();
                keys.extend(fetched.keys());
                keys.len()
            });
        }
    }
}
