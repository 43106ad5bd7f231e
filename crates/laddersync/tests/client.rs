//! End-to-end tests for the client facade against the in-memory ledger.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use laddersync::{AgentId, ClientConfig, LadderClient, PublishReport, Score};
use laddersync_testkit::{init_tracing, LedgerWorld, MemoryLedger, MemoryProfiles};

fn agent(name: &str) -> AgentId {
    AgentId::new(name)
}

fn client_for(
    ledger: Arc<MemoryLedger>,
    config: ClientConfig,
) -> LadderClient<MemoryLedger, MemoryProfiles> {
    let me = ledger.me().clone();
    LadderClient::new(me, ledger, Arc::new(MemoryProfiles::default()), config)
}

#[tokio::test]
async fn test_racing_publish_is_rejected_as_data() {
    init_tracing();
    let world = LedgerWorld::new();
    let alice_ledger = Arc::new(world.connect("alice"));
    let bob_ledger = Arc::new(world.connect("bob"));

    let alice = client_for(Arc::clone(&alice_ledger), ClientConfig::default());
    let bob = client_for(Arc::clone(&bob_ledger), ClientConfig::default());

    // Bob reads the chain heads, then alice commits first.
    bob_ledger.capture_stale_heads();

    let report = alice.publish(&agent("bob"), Score::Win).await.unwrap();
    assert!(matches!(
        report,
        PublishReport::Recorded { linked: true, .. }
    ));

    // Bob's publish was built from heads that no longer exist.
    let report = bob.publish(&agent("alice"), Score::Win).await.unwrap();
    assert_eq!(report, PublishReport::Rejected);

    // Only alice's result counted.
    let everyone = [agent("alice"), agent("bob")];
    alice.cache().refresh_ratings(&everyone).await.unwrap();
    let snapshot = alice.cache().snapshot();
    assert_eq!(snapshot.rating_of(&agent("alice")), Some(1016));
    assert_eq!(snapshot.rating_of(&agent("bob")), Some(984));
}

#[tokio::test]
async fn test_failed_link_is_recorded_and_reconciled() {
    let world = LedgerWorld::new();
    let alice_ledger = Arc::new(world.connect("alice"));
    world.register(&agent("bob"));

    let config = ClientConfig {
        reconcile_period: Duration::from_millis(20),
    };
    let mut alice = client_for(Arc::clone(&alice_ledger), config);

    alice_ledger.fail_next_link();
    let report = alice.publish(&agent("bob"), Score::Win).await.unwrap();
    assert!(matches!(
        report,
        PublishReport::Recorded { linked: false, .. }
    ));

    // The record is canonical but not yet discoverable via alice's own
    // history.
    alice.cache().refresh_my_history().await.unwrap();
    assert!(alice.cache().my_history().is_empty());

    // Starting the client kicks off reconciliation, which closes the
    // window.
    let (_push_tx, push_rx) = mpsc::channel(8);
    alice.start(push_rx);
    tokio::time::sleep(Duration::from_millis(60)).await;
    alice.stop();

    alice.cache().refresh_my_history().await.unwrap();
    let history = alice.cache().my_history();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].record.score_a, Score::Win);
}

#[tokio::test]
async fn test_pushed_record_converges_the_cache() {
    init_tracing();
    let world = LedgerWorld::new();
    let alice_ledger = Arc::new(world.connect("alice"));
    let bob_ledger = Arc::new(world.connect("bob"));

    let mut alice = client_for(Arc::clone(&alice_ledger), ClientConfig::default());
    let mut updates = alice.cache().subscribe();
    updates.borrow_and_update();

    alice.start(world.subscribe());

    // Bob records a win over alice; the world pushes the signal.
    let bob = client_for(Arc::clone(&bob_ledger), ClientConfig::default());
    let report = bob.publish(&agent("alice"), Score::Win).await.unwrap();
    assert!(matches!(report, PublishReport::Recorded { .. }));

    tokio::time::timeout(Duration::from_secs(1), updates.changed())
        .await
        .expect("cache update arrives")
        .unwrap();

    // The one pushed snapshot carries both ratings and bob's history.
    let snapshot = updates.borrow_and_update();
    assert_eq!(snapshot.rating_of(&agent("alice")), Some(984));
    assert_eq!(snapshot.rating_of(&agent("bob")), Some(1016));
    assert_eq!(snapshot.history_of(&agent("bob")).len(), 1);
    drop(snapshot);

    alice.stop();
}

#[tokio::test]
async fn test_start_and_stop_are_idempotent() {
    let world = LedgerWorld::new();
    let ledger = Arc::new(world.connect("alice"));
    let mut client = client_for(ledger, ClientConfig::default());

    assert!(!client.is_running());

    let (_tx1, rx1) = mpsc::channel(8);
    client.start(rx1);
    assert!(client.is_running());

    // A second start on a running client is a no-op.
    let (_tx2, rx2) = mpsc::channel(8);
    client.start(rx2);
    assert!(client.is_running());

    client.stop();
    client.stop();
    assert!(!client.is_running());

    // The client can be restarted after a stop.
    let (_tx3, rx3) = mpsc::channel(8);
    client.start(rx3);
    assert!(client.is_running());
    client.stop();
}
