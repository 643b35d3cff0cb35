use std::collections::HashMap;
use std::sync::RwLock;

use partstock_components::{Component, LogEntry, NewLogEntry};
use partstock_core::ComponentId;

use super::{ComponentRecord, InventoryStore, StoreError};

#[derive(Debug, Default)]
struct Inner {
    components: HashMap<ComponentId, ComponentRecord>,
    // Lowercased part number -> owning component, for uniqueness checks.
    part_numbers: HashMap<String, ComponentId>,
    log: Vec<LogEntry>,
    next_sequence: u64,
}

impl Inner {
    fn assign_sequence(&mut self) -> u64 {
        self.next_sequence += 1;
        self.next_sequence
    }
}

/// In-memory inventory store.
///
/// Intended for tests/dev. A single lock covers components and log, which
/// makes `commit` trivially atomic; a SQL backend would use a transaction
/// behind the same trait.
#[derive(Debug, Default)]
pub struct InMemoryInventoryStore {
    inner: RwLock<Inner>,
}

impl InMemoryInventoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned() -> StoreError {
    StoreError::Storage("lock poisoned".to_string())
}

impl InventoryStore for InMemoryInventoryStore {
    fn insert(
        &self,
        component: Component,
        entry: NewLogEntry,
    ) -> Result<(ComponentRecord, LogEntry), StoreError> {
        let mut inner = self.inner.write().map_err(|_| poisoned())?;

        let part_key = component.part_number().to_lowercase();
        if inner.part_numbers.contains_key(&part_key) {
            return Err(StoreError::DuplicatePartNumber(
                component.part_number().to_string(),
            ));
        }
        if inner.components.contains_key(&component.id()) {
            return Err(StoreError::Storage(format!(
                "component {} already exists",
                component.id()
            )));
        }

        let record = ComponentRecord {
            component,
            version: 1,
        };
        let sequence = inner.assign_sequence();
        let committed = entry.into_committed(sequence);

        inner.part_numbers.insert(part_key, record.component.id());
        inner
            .components
            .insert(record.component.id(), record.clone());
        inner.log.push(committed.clone());

        Ok((record, committed))
    }

    fn load(&self, id: ComponentId) -> Result<Option<ComponentRecord>, StoreError> {
        let inner = self.inner.read().map_err(|_| poisoned())?;
        Ok(inner.components.get(&id).cloned())
    }

    fn list(&self) -> Result<Vec<Component>, StoreError> {
        let inner = self.inner.read().map_err(|_| poisoned())?;
        let mut all: Vec<Component> = inner
            .components
            .values()
            .map(|r| r.component.clone())
            .collect();
        all.sort_by(|a, b| a.name().to_lowercase().cmp(&b.name().to_lowercase()));
        Ok(all)
    }

    fn commit(
        &self,
        expected_version: u64,
        updated: Component,
        entry: NewLogEntry,
    ) -> Result<(ComponentRecord, LogEntry), StoreError> {
        let mut inner = self.inner.write().map_err(|_| poisoned())?;

        let current = inner
            .components
            .get(&updated.id())
            .ok_or(StoreError::NotFound)?
            .version;

        if current != expected_version {
            return Err(StoreError::Conflict(format!(
                "expected version {expected_version}, found {current}"
            )));
        }

        let sequence = inner.assign_sequence();
        let committed = entry.into_committed(sequence);
        let record = ComponentRecord {
            component: updated,
            version: current + 1,
        };

        inner
            .components
            .insert(record.component.id(), record.clone());
        inner.log.push(committed.clone());

        Ok((record, committed))
    }

    fn append_entry(&self, entry: NewLogEntry) -> Result<LogEntry, StoreError> {
        let mut inner = self.inner.write().map_err(|_| poisoned())?;

        if !inner.components.contains_key(&entry.component_id) {
            return Err(StoreError::NotFound);
        }

        let sequence = inner.assign_sequence();
        let committed = entry.into_committed(sequence);
        inner.log.push(committed.clone());

        Ok(committed)
    }

    fn entries(&self) -> Result<Vec<LogEntry>, StoreError> {
        let inner = self.inner.read().map_err(|_| poisoned())?;
        Ok(inner.log.clone())
    }
}
