//! End-to-end flow: create a board, contribute cards, vote, observe.

use huddle_board::{BoardFeed, BoardRegistry, BoardWatcher, CardLedger, Error};
use huddle_store::MemoryStore;
use std::sync::Arc;
use std::time::Duration;

struct Harness {
    store: Arc<MemoryStore>,
    registry: BoardRegistry,
    ledger: CardLedger,
    watcher: BoardWatcher,
}

fn harness() -> Harness {
    let store = Arc::new(MemoryStore::new());
    Harness {
        registry: BoardRegistry::new(store.clone()),
        ledger: CardLedger::new(store.clone()),
        watcher: BoardWatcher::new(store.clone()),
        store,
    }
}

async fn snapshot(feed: &mut BoardFeed) -> huddle_board::Board {
    feed.next()
        .await
        .expect("feed open")
        .expect("no feed error")
        .expect("board present")
}

#[tokio::test]
async fn full_retro_session() {
    let hx = harness();

    // Create "Sprint 1" -> slug sprint-1, visible to an existence check.
    let slug = hx.registry.create_board("Sprint 1").await.unwrap();
    assert_eq!(slug, "sprint-1");
    assert!(hx.registry.board_exists(&slug).await.unwrap());

    // A second creation with an equivalent name collides.
    assert!(matches!(
        hx.registry.create_board("sprint 1").await,
        Err(Error::NameTaken(_))
    ));

    // Two observers attach; both are primed immediately.
    let mut ann_view = hx.watcher.watch(&slug).await.unwrap();
    let mut bob_view = hx.watcher.watch(&slug).await.unwrap();
    assert!(snapshot(&mut ann_view).await.cards.is_empty());
    assert!(snapshot(&mut bob_view).await.cards.is_empty());

    // Ann ships a card; both observers converge on it.
    let card_id = hx
        .ledger
        .add_card(&slug, 0, "Ship it", "Ann", 1_000)
        .await
        .unwrap();
    let seen_by_ann = snapshot(&mut ann_view).await;
    let seen_by_bob = snapshot(&mut bob_view).await;
    assert_eq!(seen_by_ann, seen_by_bob);
    assert_eq!(seen_by_ann.cards[&card_id].votes, 0);

    // s1 votes once; a repeat from s1 is a no-op; s2 still counts.
    assert!(hx.ledger.vote_card(&slug, &card_id, "s1").await.unwrap());
    let board = snapshot(&mut ann_view).await;
    assert_eq!(board.cards[&card_id].votes, 1);
    assert!(board.cards[&card_id].has_voted("s1"));

    assert!(!hx.ledger.vote_card(&slug, &card_id, "s1").await.unwrap());

    assert!(hx.ledger.vote_card(&slug, &card_id, "s2").await.unwrap());
    let board = snapshot(&mut bob_view).await;
    // Bob's feed may still hold the s1 snapshot; drain to the latest.
    let board = if board.cards[&card_id].votes == 2 {
        board
    } else {
        snapshot(&mut bob_view).await
    };
    assert_eq!(board.cards[&card_id].votes, 2);
    assert!(board.cards[&card_id].has_voted("s1"));
    assert!(board.cards[&card_id].has_voted("s2"));

    // Cancelled observers release their store subscriptions.
    ann_view.cancel();
    bob_view.cancel();
    for _ in 0..50 {
        if hx.store.subscriber_count() == 0 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert_eq!(hx.store.subscriber_count(), 0);

    // The document itself is unaffected by observers leaving.
    let board = hx.registry.get_board(&slug).await.unwrap().unwrap();
    assert_eq!(board.cards[&card_id].votes, 2);
}

#[tokio::test]
async fn boards_are_isolated() {
    let hx = harness();
    let sprint = hx.registry.create_board("Sprint 1").await.unwrap();
    let launch = hx.registry.create_board("Launch Retro").await.unwrap();

    hx.ledger
        .add_card(&sprint, 0, "only here", "Ann", 1)
        .await
        .unwrap();

    let mut launch_view = hx.watcher.watch(&launch).await.unwrap();
    let primed = launch_view
        .next()
        .await
        .unwrap()
        .unwrap()
        .unwrap();
    assert!(primed.cards.is_empty());

    let board = hx.registry.get_board(&launch).await.unwrap().unwrap();
    assert!(board.cards.is_empty());
}
