//! Watchlist store semantics against a scriptable gateway
//!
//! Covers the consistency contract: network-then-local mutation ordering,
//! the view-toggle invariants, per-key serialization of in-flight mutations,
//! and the replay property for successful operations.

mod common;

use common::MockGateway;
use proptest::prelude::*;
use sentiment_client::{WatchlistKind, WatchlistStore};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

fn store_with(gateway: Arc<MockGateway>) -> WatchlistStore {
    WatchlistStore::new(gateway)
}

#[tokio::test]
async fn test_load_partitions_by_kind() {
    let gateway = Arc::new(MockGateway::new());
    gateway.queue_load(vec![
        MockGateway::entry(WatchlistKind::Crypto, "BTC"),
        MockGateway::entry(WatchlistKind::Crypto, "ETH"),
        MockGateway::entry(WatchlistKind::User, "amy"),
    ]);

    let store = store_with(Arc::clone(&gateway));
    store.load("u1").await;

    assert!(store.is_member(WatchlistKind::Crypto, "BTC"));
    assert!(store.is_member(WatchlistKind::Crypto, "ETH"));
    assert!(store.is_member(WatchlistKind::User, "amy"));
    assert!(!store.is_member(WatchlistKind::User, "BTC"));
    assert!(store.error().is_none());
}

#[tokio::test]
async fn test_load_is_idempotent_last_response_wins() {
    let gateway = Arc::new(MockGateway::new());
    gateway.queue_load(vec![MockGateway::entry(WatchlistKind::Crypto, "BTC")]);
    gateway.queue_load(vec![MockGateway::entry(WatchlistKind::Crypto, "SOL")]);

    let store = store_with(Arc::clone(&gateway));
    store.load("u1").await;
    store.load("u1").await;

    // The second response replaces the first wholesale
    assert!(store.is_member(WatchlistKind::Crypto, "SOL"));
    assert!(!store.is_member(WatchlistKind::Crypto, "BTC"));
}

#[tokio::test]
async fn test_failed_add_leaves_set_unchanged() {
    let gateway = Arc::new(MockGateway::new());
    gateway.queue_outcome(Err(MockGateway::server_error()));

    let store = store_with(Arc::clone(&gateway));
    store.load("u1").await;

    let ok = store.add(WatchlistKind::User, "bob").await;
    assert!(!ok);
    // No optimistic insert happened, so there is nothing to roll back
    assert!(!store.is_member(WatchlistKind::User, "bob"));
    assert_eq!(store.error().as_deref(), Some("watchlist returned HTTP 500"));

    // A user-initiated retry succeeds and clears the error
    let ok = store.add(WatchlistKind::User, "bob").await;
    assert!(ok);
    assert!(store.is_member(WatchlistKind::User, "bob"));
    assert!(store.error().is_none());
}

#[tokio::test]
async fn test_mutation_without_principal_is_rejected_locally() {
    let gateway = Arc::new(MockGateway::new());
    let store = store_with(Arc::clone(&gateway));

    let ok = store.add(WatchlistKind::User, "bob").await;
    assert!(!ok);
    assert!(store.error().is_some());
    // No request went out
    assert!(gateway.recorded_calls().is_empty());
}

#[tokio::test]
async fn test_view_toggle_noop_on_empty_set() {
    let gateway = Arc::new(MockGateway::new());
    let store = store_with(Arc::clone(&gateway));
    store.load("u1").await;

    store.toggle_view(WatchlistKind::Crypto);
    assert!(!store.view_enabled(WatchlistKind::Crypto));

    store.add(WatchlistKind::Crypto, "BTC").await;
    store.toggle_view(WatchlistKind::Crypto);
    assert!(store.view_enabled(WatchlistKind::Crypto));
    store.toggle_view(WatchlistKind::Crypto);
    assert!(!store.view_enabled(WatchlistKind::Crypto));
}

#[tokio::test]
async fn test_removing_last_item_forces_view_off() {
    let gateway = Arc::new(MockGateway::new());
    gateway.queue_load(vec![MockGateway::entry(WatchlistKind::User, "amy")]);

    let store = store_with(Arc::clone(&gateway));
    store.load("u1").await;
    store.toggle_view(WatchlistKind::User);
    assert!(store.view_enabled(WatchlistKind::User));

    store.remove(WatchlistKind::User, "amy").await;

    assert!(store.is_empty(WatchlistKind::User));
    assert!(!store.view_enabled(WatchlistKind::User));
    // The other collection's toggle is independent and untouched
    assert!(!store.view_enabled(WatchlistKind::Crypto));
}

#[tokio::test]
async fn test_failed_remove_keeps_view_on() {
    let gateway = Arc::new(MockGateway::new());
    gateway.queue_load(vec![MockGateway::entry(WatchlistKind::User, "amy")]);
    gateway.queue_outcome(Err(MockGateway::server_error()));

    let store = store_with(Arc::clone(&gateway));
    store.load("u1").await;
    store.toggle_view(WatchlistKind::User);

    store.remove(WatchlistKind::User, "amy").await;

    // Rejected removal: membership and toggle both unchanged
    assert!(store.is_member(WatchlistKind::User, "amy"));
    assert!(store.view_enabled(WatchlistKind::User));
}

#[tokio::test]
async fn test_clear_drops_all_session_state() {
    let gateway = Arc::new(MockGateway::new());
    gateway.queue_load(vec![MockGateway::entry(WatchlistKind::User, "amy")]);

    let store = store_with(Arc::clone(&gateway));
    store.load("u1").await;
    store.toggle_view(WatchlistKind::User);

    store.clear();

    assert!(store.is_empty(WatchlistKind::User));
    assert!(store.is_empty(WatchlistKind::Crypto));
    assert!(!store.view_enabled(WatchlistKind::User));
    assert!(store.error().is_none());
}

#[tokio::test(start_paused = true)]
async fn test_back_to_back_toggles_serialize_per_key() {
    let gateway = Arc::new(MockGateway::with_delay(Duration::from_millis(50)));
    let store = Arc::new(store_with(Arc::clone(&gateway)));
    store.load("u1").await;

    // Both toggles target the same key while the first is still in flight.
    // Serialization makes the second observe post-add membership and issue a
    // remove instead of a duplicate add.
    let first = {
        let store = Arc::clone(&store);
        tokio::spawn(async move { store.toggle(WatchlistKind::User, "bob").await })
    };
    tokio::task::yield_now().await;
    let second = {
        let store = Arc::clone(&store);
        tokio::spawn(async move { store.toggle(WatchlistKind::User, "bob").await })
    };

    assert!(first.await.unwrap());
    assert!(second.await.unwrap());

    let calls: Vec<String> = gateway
        .recorded_calls()
        .into_iter()
        .filter(|c| !c.starts_with("load"))
        .collect();
    assert_eq!(calls, vec!["add:user:bob", "remove:user:bob"]);
    assert!(!store.is_member(WatchlistKind::User, "bob"));
}

#[tokio::test(start_paused = true)]
async fn test_disjoint_keys_do_not_serialize_against_each_other() {
    let gateway = Arc::new(MockGateway::with_delay(Duration::from_millis(50)));
    let store = Arc::new(store_with(Arc::clone(&gateway)));
    store.load("u1").await;

    let a = {
        let store = Arc::clone(&store);
        tokio::spawn(async move { store.add(WatchlistKind::User, "amy").await })
    };
    let b = {
        let store = Arc::clone(&store);
        tokio::spawn(async move { store.add(WatchlistKind::Crypto, "BTC").await })
    };

    assert!(a.await.unwrap());
    assert!(b.await.unwrap());
    assert!(store.is_member(WatchlistKind::User, "amy"));
    assert!(store.is_member(WatchlistKind::Crypto, "BTC"));
}

/// One scripted operation for the replay property
#[derive(Debug, Clone)]
enum Op {
    Add { key: u8, succeed: bool },
    Remove { key: u8, succeed: bool },
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0u8..8, any::<bool>()).prop_map(|(key, succeed)| Op::Add { key, succeed }),
        (0u8..8, any::<bool>()).prop_map(|(key, succeed)| Op::Remove { key, succeed }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// The membership set after N operations equals the set obtained by
    /// replaying only the successful operations in issued order.
    #[test]
    fn prop_membership_equals_replay_of_successes(ops in proptest::collection::vec(op_strategy(), 0..40)) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();

        let (members, replay) = runtime.block_on(async {
            let gateway = Arc::new(MockGateway::new());
            for op in &ops {
                let succeed = match op {
                    Op::Add { succeed, .. } | Op::Remove { succeed, .. } => *succeed,
                };
                gateway.queue_outcome(if succeed {
                    Ok(())
                } else {
                    Err(MockGateway::server_error())
                });
            }

            let store = store_with(Arc::clone(&gateway));
            store.load("u1").await;

            let mut replay: HashSet<String> = HashSet::new();
            for op in &ops {
                match op {
                    Op::Add { key, succeed } => {
                        let key = format!("k{key}");
                        store.add(WatchlistKind::User, &key).await;
                        if *succeed {
                            replay.insert(key);
                        }
                    }
                    Op::Remove { key, succeed } => {
                        let key = format!("k{key}");
                        store.remove(WatchlistKind::User, &key).await;
                        if *succeed {
                            replay.remove(&key);
                        }
                    }
                }
            }

            (store.members(WatchlistKind::User), replay)
        });

        prop_assert_eq!(members, replay);
    }
}
