//! Durable inventory storage seam.
//!
//! One record per component plus a global append-only transaction log. The
//! contract that makes the ledger safe lives here: `commit` persists a
//! component's new quantity and its log entry as one atomic unit, guarded by
//! a per-component version check. No caller can observe a quantity change
//! without its entry, or an entry without its quantity change.

mod in_memory;

use std::sync::Arc;

use thiserror::Error;

use partstock_components::{Component, LogEntry, NewLogEntry};
use partstock_core::ComponentId;

pub use in_memory::InMemoryInventoryStore;

/// A component together with its storage version.
///
/// The version increments on every committed quantity change and backs the
/// optimistic concurrency check: two writers racing on the same component
/// cannot both commit against the same version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentRecord {
    pub component: Component,
    pub version: u64,
}

/// Storage operation error.
///
/// Infrastructure failures only; domain validation happens before anything
/// reaches the store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Optimistic concurrency check failed (stale version).
    #[error("optimistic concurrency check failed: {0}")]
    Conflict(String),

    /// The referenced component does not exist.
    #[error("component not found")]
    NotFound,

    /// Part numbers are unique across the store.
    #[error("duplicate part number: {0}")]
    DuplicatePartNumber(String),

    /// The durable write could not complete. Never retried silently.
    #[error("storage failure: {0}")]
    Storage(String),
}

/// Inventory store: versioned component records + append-only log.
///
/// Implementations must:
/// - serialize commits per component (version check and write are one step)
/// - keep `commit` atomic: updated quantity and log entry both persist or
///   neither does
/// - assign log sequence numbers from a single monotonic counter at write
///   time (they are the tie-break for timestamp ordering)
/// - never mutate or delete a committed log entry
pub trait InventoryStore: Send + Sync {
    /// Insert a new component together with its `created` lifecycle entry.
    ///
    /// Fails with [`StoreError::DuplicatePartNumber`] if the part number is
    /// already registered (case-insensitive).
    fn insert(
        &self,
        component: Component,
        entry: NewLogEntry,
    ) -> Result<(ComponentRecord, LogEntry), StoreError>;

    /// Load one component record (current state + version).
    fn load(&self, id: ComponentId) -> Result<Option<ComponentRecord>, StoreError>;

    /// List all components.
    fn list(&self) -> Result<Vec<Component>, StoreError>;

    /// Atomically persist a quantity change and its log entry.
    ///
    /// The component is keyed by `updated.id()`. Fails with
    /// [`StoreError::Conflict`] when `expected_version` no longer matches,
    /// in which case nothing is written.
    fn commit(
        &self,
        expected_version: u64,
        updated: Component,
        entry: NewLogEntry,
    ) -> Result<(ComponentRecord, LogEntry), StoreError>;

    /// Append a pass-through lifecycle entry (updated/deleted) without
    /// touching the component's quantity or version.
    fn append_entry(&self, entry: NewLogEntry) -> Result<LogEntry, StoreError>;

    /// All committed log entries, in sequence order.
    fn entries(&self) -> Result<Vec<LogEntry>, StoreError>;
}

impl<S> InventoryStore for Arc<S>
where
    S: InventoryStore + ?Sized,
{
    fn insert(
        &self,
        component: Component,
        entry: NewLogEntry,
    ) -> Result<(ComponentRecord, LogEntry), StoreError> {
        (**self).insert(component, entry)
    }

    fn load(&self, id: ComponentId) -> Result<Option<ComponentRecord>, StoreError> {
        (**self).load(id)
    }

    fn list(&self) -> Result<Vec<Component>, StoreError> {
        (**self).list()
    }

    fn commit(
        &self,
        expected_version: u64,
        updated: Component,
        entry: NewLogEntry,
    ) -> Result<(ComponentRecord, LogEntry), StoreError> {
        (**self).commit(expected_version, updated, entry)
    }

    fn append_entry(&self, entry: NewLogEntry) -> Result<LogEntry, StoreError> {
        (**self).append_entry(entry)
    }

    fn entries(&self) -> Result<Vec<LogEntry>, StoreError> {
        (**self).entries()
    }
}
