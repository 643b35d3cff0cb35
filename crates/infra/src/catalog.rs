//! Component read paths: search, categories, low-stock, stats.
//!
//! Thin shared-read views over the store for reporting collaborators. No
//! writes happen here; the ledger owns the write path.

use serde::{Deserialize, Serialize};

use partstock_components::Component;
use partstock_core::ComponentId;

use crate::store::{InventoryStore, StoreError};

/// Search parameters for the component listing.
#[derive(Debug, Clone, Default)]
pub struct ComponentQuery {
    /// Substring match on the part number.
    pub part: Option<String>,
    /// Substring match on name, part number, or description.
    pub search: Option<String>,
    /// Exact category match.
    pub category: Option<String>,
    /// Maximum results (default 20).
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub name: String,
    pub count: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryStats {
    pub total_components: u64,
    pub total_categories: u64,
    pub low_stock_count: u64,
}

/// Read-only component views.
#[derive(Debug)]
pub struct ComponentCatalog<S> {
    store: S,
}

impl<S> ComponentCatalog<S>
where
    S: InventoryStore,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn get(&self, id: ComponentId) -> Result<Option<Component>, StoreError> {
        Ok(self.store.load(id)?.map(|record| record.component))
    }

    /// Search components, name-sorted, limited.
    pub fn search(&self, query: &ComponentQuery) -> Result<Vec<Component>, StoreError> {
        let part = query.part.as_deref().map(str::to_lowercase);
        let needle = query.search.as_deref().map(str::to_lowercase);
        let limit = query.limit.unwrap_or(20);

        let results = self
            .store
            .list()?
            .into_iter()
            .filter(|c| {
                part.as_deref()
                    .is_none_or(|p| c.part_number().to_lowercase().contains(p))
            })
            .filter(|c| {
                needle.as_deref().is_none_or(|needle| {
                    c.name().to_lowercase().contains(needle)
                        || c.part_number().to_lowercase().contains(needle)
                        || c.description()
                            .is_some_and(|d| d.to_lowercase().contains(needle))
                })
            })
            .filter(|c| {
                query
                    .category
                    .as_deref()
                    .is_none_or(|cat| c.category() == cat)
            })
            .take(limit)
            .collect();

        Ok(results)
    }

    /// Components at or below their threshold, out-of-stock first.
    pub fn low_stock(&self) -> Result<Vec<Component>, StoreError> {
        let mut low: Vec<Component> = self
            .store
            .list()?
            .into_iter()
            .filter(Component::is_low_stock)
            .collect();
        low.sort_by_key(|c| (!c.is_out_of_stock(), c.quantity()));
        Ok(low)
    }

    /// Distinct categories with component counts, name-sorted.
    pub fn categories(&self) -> Result<Vec<CategoryCount>, StoreError> {
        let mut counts = std::collections::BTreeMap::<String, u64>::new();
        for component in self.store.list()? {
            *counts.entry(component.category().to_string()).or_default() += 1;
        }
        Ok(counts
            .into_iter()
            .map(|(name, count)| CategoryCount { name, count })
            .collect())
    }

    pub fn stats(&self) -> Result<InventoryStats, StoreError> {
        let all = self.store.list()?;
        let categories: std::collections::HashSet<&str> =
            all.iter().map(|c| c.category()).collect();
        let low_stock_count = all.iter().filter(|c| c.is_low_stock()).count() as u64;

        Ok(InventoryStats {
            total_components: all.len() as u64,
            total_categories: categories.len() as u64,
            low_stock_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::Utc;

    use partstock_components::{LogAction, NewComponent, NewLogEntry, StockActor};
    use partstock_core::UserId;

    use crate::store::InMemoryInventoryStore;

    use super::*;

    fn seed(store: &InMemoryInventoryStore, part: &str, name: &str, category: &str, quantity: i64, threshold: i64) {
        let component = Component::create(
            ComponentId::new(),
            NewComponent {
                part_number: part.to_string(),
                name: name.to_string(),
                category: category.to_string(),
                initial_quantity: quantity,
                critical_low_threshold: threshold,
                unit_price_cents: 0,
                description: Some(format!("{name} for bench use")),
                location_bin: None,
            },
        )
        .unwrap();
        let actor = StockActor {
            id: UserId::new(),
            name: "seed".to_string(),
        };
        let entry = NewLogEntry::lifecycle(&component, LogAction::Created, "seed", &actor, Utc::now());
        store.insert(component, entry).unwrap();
    }

    fn catalog() -> ComponentCatalog<Arc<InMemoryInventoryStore>> {
        let store = Arc::new(InMemoryInventoryStore::new());
        seed(&store, "RES-10K", "10k resistor", "passives", 100, 20);
        seed(&store, "CAP-100N", "100n capacitor", "passives", 5, 10);
        seed(&store, "NE555", "555 timer", "ics", 0, 3);
        ComponentCatalog::new(store)
    }

    #[test]
    fn search_filters_compose_and_limit_applies() {
        let catalog = catalog();

        let by_part = catalog
            .search(&ComponentQuery {
                part: Some("res".to_string()),
                ..ComponentQuery::default()
            })
            .unwrap();
        assert_eq!(by_part.len(), 1);
        assert_eq!(by_part[0].part_number(), "RES-10K");

        let by_category = catalog
            .search(&ComponentQuery {
                category: Some("passives".to_string()),
                ..ComponentQuery::default()
            })
            .unwrap();
        assert_eq!(by_category.len(), 2);

        let limited = catalog
            .search(&ComponentQuery {
                limit: Some(1),
                ..ComponentQuery::default()
            })
            .unwrap();
        assert_eq!(limited.len(), 1);

        let by_description = catalog
            .search(&ComponentQuery {
                search: Some("bench use".to_string()),
                ..ComponentQuery::default()
            })
            .unwrap();
        assert_eq!(by_description.len(), 3);
    }

    #[test]
    fn low_stock_lists_out_of_stock_first() {
        let catalog = catalog();
        let low = catalog.low_stock().unwrap();
        assert_eq!(low.len(), 2);
        assert_eq!(low[0].part_number(), "NE555");
        assert!(low[0].is_out_of_stock());
        assert_eq!(low[1].part_number(), "CAP-100N");
    }

    #[test]
    fn categories_and_stats_agree() {
        let catalog = catalog();

        let categories = catalog.categories().unwrap();
        assert_eq!(
            categories,
            vec![
                CategoryCount { name: "ics".to_string(), count: 1 },
                CategoryCount { name: "passives".to_string(), count: 2 },
            ]
        );

        let stats = catalog.stats().unwrap();
        assert_eq!(stats.total_components, 3);
        assert_eq!(stats.total_categories, 2);
        assert_eq!(stats.low_stock_count, 2);
    }
}
