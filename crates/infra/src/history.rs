//! History query service: read-only, filtered, paginated log views.
//!
//! Newest first — `occurred_at` descending, ties broken by the write-time
//! sequence number (also descending). Consecutive pages over unchanged data
//! never skip or duplicate an entry; there is no snapshot isolation across
//! page fetches, so a write between fetches may shift later pages by one.
//! That relaxation is accepted, not a defect.

use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};

use partstock_components::{LogAction, LogEntry};
use partstock_core::UserId;

use crate::store::{InventoryStore, StoreError};

/// Action filter: everything, or one specific log kind.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum ActionFilter {
    #[default]
    All,
    Only(LogAction),
}

impl ActionFilter {
    fn matches(&self, action: LogAction) -> bool {
        match self {
            ActionFilter::All => true,
            ActionFilter::Only(kind) => action == *kind,
        }
    }
}

/// Filter criteria for log queries.
#[derive(Debug, Clone, Default)]
pub struct LogFilter {
    /// Case-insensitive substring over component name, part number, reason,
    /// and actor name.
    pub search: Option<String>,
    pub action: ActionFilter,
    /// Restrict to one actor.
    pub actor: Option<UserId>,
    /// Only entries within the last N days (positive), measured from now.
    pub since_days: Option<i64>,
}

/// Pagination parameters.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Pagination {
    /// 1-based page index.
    pub page: u32,
    /// Entries per page.
    pub per_page: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: 50,
        }
    }
}

impl Pagination {
    pub fn new(page: Option<u32>, per_page: Option<u32>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            per_page: per_page.unwrap_or(50).clamp(1, 200),
        }
    }
}

/// Pagination metadata returned alongside a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    pub current_page: u32,
    pub total_pages: u32,
    pub total_count: u64,
    pub has_next: bool,
    pub has_previous: bool,
}

/// One page of matching log entries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogPage {
    pub entries: Vec<LogEntry>,
    pub page_info: PageInfo,
}

/// Read-only history view over a store's transaction log.
#[derive(Debug)]
pub struct History<S> {
    store: S,
}

impl<S> History<S>
where
    S: InventoryStore,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Query the log with filters and pagination.
    pub fn query(&self, filter: &LogFilter, pagination: Pagination) -> Result<LogPage, StoreError> {
        let cutoff = filter
            .since_days
            .filter(|days| *days > 0)
            .map(|days| Utc::now() - Duration::days(days));
        let needle = filter
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);

        let mut matching: Vec<LogEntry> = self
            .store
            .entries()?
            .into_iter()
            .filter(|entry| filter.action.matches(entry.action))
            .filter(|entry| filter.actor.is_none_or(|actor| entry.actor_id == actor))
            .filter(|entry| cutoff.is_none_or(|cutoff| entry.occurred_at >= cutoff))
            .filter(|entry| {
                needle.as_deref().is_none_or(|needle| {
                    entry.component_name.to_lowercase().contains(needle)
                        || entry.part_number.to_lowercase().contains(needle)
                        || entry.reason.to_lowercase().contains(needle)
                        || entry.actor_name.to_lowercase().contains(needle)
                })
            })
            .collect();

        // Newest first; the sequence number breaks timestamp ties so the
        // order is total and stable across pages.
        matching.sort_by(|a, b| {
            b.occurred_at
                .cmp(&a.occurred_at)
                .then(b.sequence.cmp(&a.sequence))
        });

        let total_count = matching.len() as u64;
        let per_page = pagination.per_page.max(1);
        let total_pages = (total_count.div_ceil(per_page as u64)) as u32;
        // A page index past the end resolves to the last page, so the
        // reported current_page always names the page actually returned.
        let page = pagination.page.max(1).min(total_pages.max(1));

        let start = (page as usize - 1).saturating_mul(per_page as usize);
        let entries: Vec<LogEntry> = matching
            .into_iter()
            .skip(start)
            .take(per_page as usize)
            .collect();

        Ok(LogPage {
            entries,
            page_info: PageInfo {
                current_page: page,
                total_pages,
                total_count,
                has_next: page < total_pages,
                has_previous: page > 1 && total_pages > 0,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Arc;

    use partstock_alerts::{CrossingEvent, InMemoryAlertBus};
    use partstock_components::{NewComponent, StockActor};
    use partstock_core::ComponentId;

    use crate::ledger::{MovementContext, TransactionLedger};
    use crate::store::InMemoryInventoryStore;

    use super::*;

    fn actor(name: &str) -> StockActor {
        StockActor {
            id: UserId::new(),
            name: name.to_string(),
        }
    }

    fn setup() -> (
        TransactionLedger<Arc<InMemoryInventoryStore>, Arc<InMemoryAlertBus<CrossingEvent>>>,
        History<Arc<InMemoryInventoryStore>>,
    ) {
        let store = Arc::new(InMemoryInventoryStore::new());
        let bus = Arc::new(InMemoryAlertBus::new());
        (
            TransactionLedger::new(store.clone(), bus),
            History::new(store),
        )
    }

    fn seed_component(
        ledger: &TransactionLedger<Arc<InMemoryInventoryStore>, Arc<InMemoryAlertBus<CrossingEvent>>>,
        part: &str,
        name: &str,
    ) -> ComponentId {
        let (component, _) = ledger
            .create_component(
                NewComponent {
                    part_number: part.to_string(),
                    name: name.to_string(),
                    category: "misc".to_string(),
                    initial_quantity: 10_000,
                    critical_low_threshold: 0,
                    unit_price_cents: 0,
                    description: None,
                    location_bin: None,
                },
                &actor("seed"),
            )
            .unwrap();
        component.id()
    }

    #[test]
    fn pages_are_disjoint_and_metadata_is_exact() {
        let (ledger, history) = setup();
        let id = seed_component(&ledger, "BULK-1", "bulk part");
        let ctx = MovementContext::new(actor("worker"), "burn down");

        // 1 created entry + 120 movements.
        for _ in 0..120 {
            ledger.outward(id, 1, &ctx).unwrap();
        }

        let filter = LogFilter {
            action: ActionFilter::Only(LogAction::Outward),
            ..LogFilter::default()
        };

        let page1 = history.query(&filter, Pagination::new(Some(1), Some(50))).unwrap();
        let page2 = history.query(&filter, Pagination::new(Some(2), Some(50))).unwrap();
        let page3 = history.query(&filter, Pagination::new(Some(3), Some(50))).unwrap();

        assert_eq!(page1.entries.len(), 50);
        assert_eq!(page2.entries.len(), 50);
        assert_eq!(page3.entries.len(), 20);

        let mut seen: HashSet<_> = HashSet::new();
        for entry in page1.entries.iter().chain(page2.entries.iter()) {
            assert!(seen.insert(entry.id), "entry duplicated across pages");
        }
        assert_eq!(seen.len(), 100);

        assert_eq!(
            page2.page_info,
            PageInfo {
                current_page: 2,
                total_pages: 3,
                total_count: 120,
                has_next: true,
                has_previous: true,
            }
        );
        assert!(!page3.page_info.has_next);
    }

    #[test]
    fn out_of_range_page_resolves_to_the_last_page() {
        let (ledger, history) = setup();
        let id = seed_component(&ledger, "TAIL-1", "tail part");
        let ctx = MovementContext::new(actor("worker"), "drip");

        // 1 created entry + 7 movements = 8 entries, 3 pages of 3.
        for _ in 0..7 {
            ledger.inward(id, 1, &ctx).unwrap();
        }

        let page = history
            .query(&LogFilter::default(), Pagination::new(Some(99), Some(3)))
            .unwrap();
        assert_eq!(page.page_info.current_page, 3);
        assert_eq!(page.page_info.total_pages, 3);
        assert_eq!(page.entries.len(), 2);
        assert!(!page.page_info.has_next);
        assert!(page.page_info.has_previous);
    }

    #[test]
    fn newest_first_with_sequence_tiebreak() {
        let (ledger, history) = setup();
        let id = seed_component(&ledger, "SEQ-1", "seq part");
        let ctx = MovementContext::new(actor("worker"), "tick");

        for _ in 0..5 {
            ledger.inward(id, 1, &ctx).unwrap();
        }

        let page = history
            .query(&LogFilter::default(), Pagination::default())
            .unwrap();
        let sequences: Vec<u64> = page.entries.iter().map(|e| e.sequence).collect();
        let mut sorted = sequences.clone();
        sorted.sort_unstable_by(|a, b| b.cmp(a));
        assert_eq!(sequences, sorted);
    }

    #[test]
    fn text_search_covers_name_part_reason_and_actor() {
        let (ledger, history) = setup();
        let opamp = seed_component(&ledger, "LM358-DIP", "dual op-amp");
        let mcu = seed_component(&ledger, "STM32F103", "cortex mcu");

        ledger
            .outward(opamp, 2, &MovementContext::new(actor("priya"), "preamp prototype"))
            .unwrap();
        ledger
            .outward(mcu, 1, &MovementContext::new(actor("sam"), "flight controller"))
            .unwrap();

        let search = |needle: &str| {
            let filter = LogFilter {
                search: Some(needle.to_string()),
                ..LogFilter::default()
            };
            history.query(&filter, Pagination::default()).unwrap()
        };

        assert_eq!(search("lm358").page_info.total_count, 2); // created + outward
        assert_eq!(search("op-amp").page_info.total_count, 2);
        assert_eq!(search("preamp").page_info.total_count, 1);
        assert_eq!(search("PRIYA").page_info.total_count, 1);
        assert_eq!(search("nonexistent").page_info.total_count, 0);
    }

    #[test]
    fn actor_and_action_filters_compose() {
        let (ledger, history) = setup();
        let id = seed_component(&ledger, "FIL-1", "filter part");
        let priya = actor("priya");
        let sam = actor("sam");

        ledger.inward(id, 5, &MovementContext::new(priya.clone(), "a")).unwrap();
        ledger.outward(id, 1, &MovementContext::new(priya.clone(), "b")).unwrap();
        ledger.outward(id, 1, &MovementContext::new(sam, "c")).unwrap();

        let filter = LogFilter {
            action: ActionFilter::Only(LogAction::Outward),
            actor: Some(priya.id),
            ..LogFilter::default()
        };
        let page = history.query(&filter, Pagination::default()).unwrap();
        assert_eq!(page.page_info.total_count, 1);
        assert_eq!(page.entries[0].reason, "b");
    }

    #[test]
    fn since_days_window_keeps_recent_entries() {
        let (ledger, history) = setup();
        let id = seed_component(&ledger, "WIN-1", "windowed part");
        ledger
            .inward(id, 1, &MovementContext::new(actor("w"), "now"))
            .unwrap();

        // Everything just written is inside any positive window.
        let filter = LogFilter {
            since_days: Some(7),
            ..LogFilter::default()
        };
        let page = history.query(&filter, Pagination::default()).unwrap();
        assert_eq!(page.page_info.total_count, 2);
    }

    #[test]
    fn empty_log_yields_empty_first_page() {
        let (_, history) = setup();
        let page = history
            .query(&LogFilter::default(), Pagination::default())
            .unwrap();
        assert!(page.entries.is_empty());
        assert_eq!(page.page_info.total_pages, 0);
        assert!(!page.page_info.has_next);
        assert!(!page.page_info.has_previous);
    }
}
