//! Ledger throughput benchmarks.
//!
//! Measures the full pipeline (load → plan → commit → crossing evaluation)
//! against the in-memory store, with and without a live alert subscriber.

use std::sync::Arc;

use criterion::{Criterion, criterion_group, criterion_main};

use partstock_alerts::{CrossingEvent, InMemoryAlertBus};
use partstock_components::{NewComponent, StockActor};
use partstock_core::{ComponentId, UserId};
use partstock_infra::ledger::{MovementContext, TransactionLedger};
use partstock_infra::store::InMemoryInventoryStore;

type Ledger = TransactionLedger<Arc<InMemoryInventoryStore>, Arc<InMemoryAlertBus<CrossingEvent>>>;

fn setup(initial_quantity: i64, threshold: i64) -> (Ledger, ComponentId, MovementContext) {
    let store = Arc::new(InMemoryInventoryStore::new());
    let bus = Arc::new(InMemoryAlertBus::new());
    let ledger = TransactionLedger::new(store, bus);

    let actor = StockActor {
        id: UserId::new(),
        name: "bench".to_string(),
    };
    let (component, _) = ledger
        .create_component(
            NewComponent {
                part_number: "BENCH-1".to_string(),
                name: "bench part".to_string(),
                category: "bench".to_string(),
                initial_quantity,
                critical_low_threshold: threshold,
                unit_price_cents: 0,
                description: None,
                location_bin: None,
            },
            &actor,
        )
        .unwrap();

    (ledger, component.id(), MovementContext::new(actor, "bench"))
}

fn bench_inward(c: &mut Criterion) {
    let (ledger, id, ctx) = setup(0, 0);
    c.bench_function("ledger_inward", |b| {
        b.iter(|| ledger.inward(id, 1, &ctx).unwrap())
    });
}

fn bench_alternating_crossings(c: &mut Criterion) {
    // Threshold 5, oscillating 10 <-> 4: every pair of operations crosses
    // the boundary twice, exercising the publish path.
    let (ledger, id, ctx) = setup(10, 5);
    c.bench_function("ledger_oscillating_crossings", |b| {
        b.iter(|| {
            ledger.outward(id, 6, &ctx).unwrap();
            ledger.inward(id, 6, &ctx).unwrap();
        })
    });
}

criterion_group!(benches, bench_inward, bench_alternating_crossings);
criterion_main!(benches);
