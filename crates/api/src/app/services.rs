use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use axum::response::sse::{Event as SseEvent, KeepAlive, Sse};
use tokio::sync::broadcast;
use tokio_stream::{StreamExt, wrappers::BroadcastStream};

use partstock_alerts::{AlertBus, CrossingEvent, InMemoryAlertBus};
use partstock_infra::catalog::ComponentCatalog;
use partstock_infra::history::History;
use partstock_infra::ledger::TransactionLedger;
use partstock_infra::store::InMemoryInventoryStore;

pub type Store = Arc<InMemoryInventoryStore>;
pub type Bus = Arc<InMemoryAlertBus<CrossingEvent>>;

/// Application service container shared by all handlers.
pub struct AppServices {
    pub ledger: TransactionLedger<Store, Bus>,
    pub history: History<Store>,
    pub catalog: ComponentCatalog<Store>,
    realtime_tx: broadcast::Sender<CrossingEvent>,
}

impl AppServices {
    /// Wire the in-memory stack: one store, one bus, and a bridge thread
    /// forwarding bus events into the SSE broadcast channel.
    pub fn build() -> Arc<Self> {
        let store: Store = Arc::new(InMemoryInventoryStore::new());
        let bus: Bus = Arc::new(InMemoryAlertBus::new());

        let (realtime_tx, _) = broadcast::channel::<CrossingEvent>(256);

        // Bridge: alert bus (std mpsc) -> tokio broadcast for SSE clients.
        // Lossy towards slow clients; the bus side is never blocked.
        let subscription = bus.subscribe();
        let tx = realtime_tx.clone();
        std::thread::spawn(move || {
            while let Ok(event) = subscription.recv() {
                let _ = tx.send(event);
            }
        });

        Arc::new(Self {
            ledger: TransactionLedger::new(store.clone(), bus),
            history: History::new(store.clone()),
            catalog: ComponentCatalog::new(store),
            realtime_tx,
        })
    }

    pub fn subscribe_alerts(&self) -> broadcast::Receiver<CrossingEvent> {
        self.realtime_tx.subscribe()
    }
}

/// SSE stream of crossing events for notification consumers.
pub fn alert_sse_stream(
    services: Arc<AppServices>,
) -> Sse<impl tokio_stream::Stream<Item = Result<SseEvent, Infallible>>> {
    let rx = services.subscribe_alerts();
    let stream = BroadcastStream::new(rx)
        .filter_map(|msg| msg.ok())
        .map(|event| {
            let data = serde_json::to_string(&event).unwrap_or_default();
            Ok(SseEvent::default().event("crossing").data(data))
        });

    Sse::new(stream).keep_alive(KeepAlive::new().interval(Duration::from_secs(15)))
}
