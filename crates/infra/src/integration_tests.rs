//! Integration tests for the full ledger pipeline.
//!
//! Ledger → Store → AlertBus → subscriber, plus the contended-writer race.

use std::sync::Arc;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use partstock_alerts::{AlertBus, CrossingEvent, CrossingKind, InMemoryAlertBus};
use partstock_components::{NewComponent, StockActor};
use partstock_core::{ComponentId, UserId};

use crate::history::{History, LogFilter, Pagination};
use crate::ledger::{LedgerError, MovementContext, TransactionLedger};
use crate::store::{InMemoryInventoryStore, InventoryStore};

type Ledger = TransactionLedger<Arc<InMemoryInventoryStore>, Arc<InMemoryAlertBus<CrossingEvent>>>;

fn actor() -> StockActor {
    StockActor {
        id: UserId::new(),
        name: "integration".to_string(),
    }
}

fn setup() -> (Arc<Ledger>, Arc<InMemoryInventoryStore>, Arc<InMemoryAlertBus<CrossingEvent>>) {
    let store = Arc::new(InMemoryInventoryStore::new());
    let bus = Arc::new(InMemoryAlertBus::new());
    let ledger = Arc::new(TransactionLedger::new(store.clone(), bus.clone()));
    (ledger, store, bus)
}

fn seed(ledger: &Ledger, quantity: i64, threshold: i64) -> ComponentId {
    let (component, _) = ledger
        .create_component(
            NewComponent {
                part_number: format!("IT-{}", ComponentId::new()),
                name: "integration part".to_string(),
                category: "test".to_string(),
                initial_quantity: quantity,
                critical_low_threshold: threshold,
                unit_price_cents: 0,
                description: None,
                location_bin: None,
            },
            &actor(),
        )
        .unwrap();
    component.id()
}

#[test]
fn contended_outward_has_one_winner_and_one_clean_failure() {
    // Two concurrent outward(7) against quantity 10: exactly one success,
    // one InsufficientStock, final quantity 3, exactly one movement entry.
    let (ledger, store, _) = setup();
    let id = seed(&ledger, 10, 0);

    // Start gate so both threads hit the ledger together.
    let (ready_tx, ready_rx) = mpsc::channel::<()>();
    let gate = Arc::new(std::sync::Barrier::new(2));

    let mut handles = Vec::new();
    for _ in 0..2 {
        let ledger = ledger.clone();
        let gate = gate.clone();
        let ready_tx = ready_tx.clone();
        handles.push(thread::spawn(move || {
            let _ = ready_tx.send(());
            gate.wait();
            ledger.outward(id, 7, &MovementContext::new(actor(), "race"))
        }));
    }
    drop(ready_tx);
    for _ in 0..2 {
        ready_rx.recv_timeout(Duration::from_secs(1)).unwrap();
    }

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    let successes = results.iter().filter(|r| r.is_ok()).count();
    let insufficient = results
        .iter()
        .filter(|r| matches!(r, Err(LedgerError::InsufficientStock { .. })))
        .count();
    assert_eq!(successes, 1);
    assert_eq!(insufficient, 1);

    assert_eq!(store.load(id).unwrap().unwrap().component.quantity(), 3);

    let movements = store
        .entries()
        .unwrap()
        .into_iter()
        .filter(|e| e.component_id == id && e.action == partstock_components::LogAction::Outward)
        .count();
    assert_eq!(movements, 1);
}

#[test]
fn contention_on_one_component_does_not_lose_updates() {
    // 8 writers x 25 inward(1): all must land despite version conflicts.
    let (ledger, store, _) = setup();
    let id = seed(&ledger, 0, 0);

    let mut handles = Vec::new();
    for _ in 0..8 {
        let ledger = ledger.clone();
        handles.push(thread::spawn(move || {
            let ctx = MovementContext::new(actor(), "stress");
            for _ in 0..25 {
                // A store-level conflict shows up here only if 5 retries were
                // exhausted; accept it, the invariant check below still holds.
                let _ = ledger.inward(id, 1, &ctx);
            }
        }));
    }
    for h in handles {
        h.join().unwrap();
    }

    let quantity = store.load(id).unwrap().unwrap().component.quantity();
    let delta_sum: i64 = store
        .entries()
        .unwrap()
        .iter()
        .filter(|e| e.component_id == id)
        .map(|e| e.quantity_changed)
        .sum();
    assert_eq!(quantity, delta_sum);
}

#[test]
fn crossings_reach_a_live_subscriber_in_commit_order() {
    let (ledger, _, bus) = setup();
    let id = seed(&ledger, 20, 10);

    // Subscribe before operating (broadcast delivers only post-subscription).
    let sub = bus.subscribe();
    let (ready_tx, ready_rx) = mpsc::channel::<()>();
    let (events_tx, events_rx) = mpsc::channel::<CrossingEvent>();
    let consumer = thread::spawn(move || {
        let _ = ready_tx.send(());
        while let Ok(event) = sub.recv() {
            if events_tx.send(event).is_err() {
                break;
            }
        }
    });
    ready_rx.recv_timeout(Duration::from_secs(1)).unwrap();

    let ctx = MovementContext::new(actor(), "cycle");
    ledger.outward(id, 12, &ctx).unwrap(); // 20 -> 8: low_stock
    ledger.outward(id, 3, &ctx).unwrap(); // 8 -> 5: already low, silent
    ledger.inward(id, 10, &ctx).unwrap(); // 5 -> 15: restocked

    let first = events_rx.recv_timeout(Duration::from_secs(1)).unwrap();
    assert_eq!(first.kind, CrossingKind::LowStock);
    assert_eq!(first.quantity, 8);

    let second = events_rx.recv_timeout(Duration::from_secs(1)).unwrap();
    assert_eq!(second.kind, CrossingKind::Restocked);
    assert_eq!(second.quantity, 15);

    assert!(events_rx.recv_timeout(Duration::from_millis(100)).is_err());

    drop(events_rx);
    drop(ledger);
    drop(bus);
    let _ = consumer.join();
}

#[test]
fn history_reflects_committed_operations_across_components() {
    let (ledger, store, _) = setup();
    let history = History::new(store);
    let a = seed(&ledger, 50, 5);
    let b = seed(&ledger, 50, 5);

    let ctx = MovementContext::new(actor(), "mixed use");
    ledger.outward(a, 5, &ctx).unwrap();
    ledger.inward(b, 5, &ctx).unwrap();
    ledger.adjustment(a, 40, &ctx).unwrap();

    let page = history
        .query(&LogFilter::default(), Pagination::default())
        .unwrap();

    // 2 created + 3 movements, newest first.
    assert_eq!(page.page_info.total_count, 5);
    assert_eq!(page.entries[0].action, partstock_components::LogAction::Adjustment);
    assert_eq!(page.entries[0].component_id, a);
}
