//! Transaction ledger (the inventory write path).
//!
//! Every quantity change flows through here and nowhere else. The pipeline
//! for each operation:
//!
//! ```text
//! Operation
//!   ↓
//! 1. Load component record (state + version)
//!   ↓
//! 2. Plan the change (pure decision logic on `Component`)
//!   ↓
//! 3. Build the log entry capturing previous/new/delta/reason/actor
//!   ↓
//! 4. Commit atomically (quantity + entry, optimistic version check)
//!   ↓  — version conflict? reload and retry, bounded —
//! 5. Evaluate threshold crossing and publish the alert (post-commit)
//! ```
//!
//! Alerts are dispatched strictly after the commit: a notification is never
//! sent for a transaction that did not durably land. The converse also
//! holds — a publish failure does not roll back or fail the committed
//! transaction; it is logged and swallowed.

use chrono::Utc;

use partstock_alerts::{AlertBus, CrossingEvent, evaluate_crossing};
use partstock_components::{
    Component, LogAction, LogEntry, NewComponent, NewLogEntry, QuantityChange, StockActor,
};
use partstock_core::{ComponentId, DomainError};

use crate::store::{ComponentRecord, InventoryStore, StoreError};

/// Internal retry bound for optimistic commit conflicts. Conflicts beyond
/// this surface to the caller as [`LedgerError::Conflict`].
const MAX_COMMIT_ATTEMPTS: u32 = 5;

/// Ledger operation failure, surfaced to callers as distinct typed variants.
#[derive(Debug)]
pub enum LedgerError {
    /// Invalid argument (non-positive quantity, negative target, blank reason).
    Validation(String),
    /// Outward movement exceeds current stock. Never clamped.
    InsufficientStock { requested: i64, available: i64 },
    /// Unknown component.
    NotFound,
    /// Optimistic retries exhausted under contention.
    Conflict(String),
    /// Part number already registered (component creation).
    DuplicatePartNumber(String),
    /// The durable write could not complete. Not retried by the ledger.
    Store(StoreError),
}

impl From<DomainError> for LedgerError {
    fn from(value: DomainError) -> Self {
        match value {
            DomainError::Validation(msg) => LedgerError::Validation(msg),
            DomainError::InsufficientStock {
                requested,
                available,
            } => LedgerError::InsufficientStock {
                requested,
                available,
            },
            DomainError::NotFound => LedgerError::NotFound,
            DomainError::Conflict(msg) => LedgerError::Conflict(msg),
            DomainError::InvalidId(msg) => LedgerError::Validation(msg),
        }
    }
}

impl From<StoreError> for LedgerError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::NotFound => LedgerError::NotFound,
            StoreError::Conflict(msg) => LedgerError::Conflict(msg),
            StoreError::DuplicatePartNumber(part) => LedgerError::DuplicatePartNumber(part),
            other => LedgerError::Store(other),
        }
    }
}

/// Caller-supplied context for a stock movement.
#[derive(Debug, Clone)]
pub struct MovementContext {
    pub actor: StockActor,
    pub reason: String,
    pub project_name: Option<String>,
    pub notes: Option<String>,
}

impl MovementContext {
    pub fn new(actor: StockActor, reason: impl Into<String>) -> Self {
        Self {
            actor,
            reason: reason.into(),
            project_name: None,
            notes: None,
        }
    }

    pub fn with_project(mut self, project_name: impl Into<String>) -> Self {
        self.project_name = Some(project_name.into());
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// Result of a committed ledger operation.
#[derive(Debug, Clone)]
pub struct LedgerReceipt {
    /// Component state after the commit.
    pub component: Component,
    /// The committed log entry (exactly one per successful operation).
    pub entry: LogEntry,
    /// The crossing event published for this operation, if the movement
    /// crossed the low-stock boundary (at most one per operation).
    pub crossing: Option<CrossingEvent>,
}

/// The inventory transaction ledger.
///
/// Generic over the store and the alert bus so tests run against the
/// in-memory implementations and production can swap either side without
/// touching the pipeline.
#[derive(Debug)]
pub struct TransactionLedger<S, B> {
    store: S,
    bus: B,
}

impl<S, B> TransactionLedger<S, B> {
    pub fn new(store: S, bus: B) -> Self {
        Self { store, bus }
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

impl<S, B> TransactionLedger<S, B>
where
    S: InventoryStore,
    B: AlertBus<CrossingEvent>,
{
    /// Increase stock by `quantity` (receipt). `quantity` must be positive;
    /// there is no upper bound.
    pub fn inward(
        &self,
        component_id: ComponentId,
        quantity: i64,
        ctx: &MovementContext,
    ) -> Result<LedgerReceipt, LedgerError> {
        self.apply(component_id, LogAction::Inward, ctx, |component| {
            component.plan_inward(quantity)
        })
    }

    /// Decrease stock by `quantity` (consumption). Fails with
    /// [`LedgerError::InsufficientStock`] when `quantity` exceeds the current
    /// stock; the quantity never goes negative.
    pub fn outward(
        &self,
        component_id: ComponentId,
        quantity: i64,
        ctx: &MovementContext,
    ) -> Result<LedgerReceipt, LedgerError> {
        self.apply(component_id, LogAction::Outward, ctx, |component| {
            component.plan_outward(quantity)
        })
    }

    /// Set stock to an absolute `new_quantity` (correction). The recorded
    /// delta may be zero; repeating the same target is a logged no-op.
    pub fn adjustment(
        &self,
        component_id: ComponentId,
        new_quantity: i64,
        ctx: &MovementContext,
    ) -> Result<LedgerReceipt, LedgerError> {
        self.apply(component_id, LogAction::Adjustment, ctx, |component| {
            component.plan_adjustment(new_quantity)
        })
    }

    /// Register a new component and its `created` lifecycle entry.
    ///
    /// Creation is an administrative operation; it goes through the ledger
    /// only so that the audit trail starts at the component's birth.
    pub fn create_component(
        &self,
        input: NewComponent,
        actor: &StockActor,
    ) -> Result<(Component, LogEntry), LedgerError> {
        let component = Component::create(ComponentId::new(), input)?;
        let entry = NewLogEntry::lifecycle(
            &component,
            LogAction::Created,
            "component created",
            actor,
            Utc::now(),
        );

        let (record, committed) = self.store.insert(component, entry)?;
        tracing::info!(
            component_id = %record.component.id(),
            part_number = %record.component.part_number(),
            "component created"
        );
        Ok((record.component, committed))
    }

    /// Record a pass-through lifecycle entry (`updated` / `deleted`) for a
    /// CRUD collaborator. Quantity is untouched and nothing is validated
    /// beyond the component existing.
    pub fn record_lifecycle(
        &self,
        component_id: ComponentId,
        action: LogAction,
        reason: impl Into<String>,
        actor: &StockActor,
    ) -> Result<LogEntry, LedgerError> {
        debug_assert!(matches!(action, LogAction::Updated | LogAction::Deleted));

        let record = self
            .store
            .load(component_id)?
            .ok_or(LedgerError::NotFound)?;
        let entry = NewLogEntry::lifecycle(&record.component, action, reason, actor, Utc::now());
        Ok(self.store.append_entry(entry)?)
    }

    /// Shared pipeline for the three movement kinds.
    ///
    /// The plan closure is re-run on every retry against freshly loaded
    /// state, so a conflict loser re-decides with the winner's result
    /// visible (this is what turns a lost race into `InsufficientStock`
    /// instead of a lost update).
    fn apply(
        &self,
        component_id: ComponentId,
        action: LogAction,
        ctx: &MovementContext,
        plan: impl Fn(&Component) -> Result<QuantityChange, DomainError>,
    ) -> Result<LedgerReceipt, LedgerError> {
        let mut attempt = 0;
        loop {
            attempt += 1;

            let ComponentRecord { component, version } = self
                .store
                .load(component_id)?
                .ok_or(LedgerError::NotFound)?;

            let change = plan(&component)?;
            let entry = NewLogEntry::stock_movement(
                &component,
                action,
                change,
                &ctx.reason,
                &ctx.actor,
                ctx.project_name.clone(),
                ctx.notes.clone(),
                Utc::now(),
            )?;

            let updated = component.with_quantity(change.new);
            match self.store.commit(version, updated, entry) {
                Ok((record, committed)) => {
                    let crossing = self.dispatch_crossing(&record.component, change);
                    tracing::debug!(
                        component_id = %component_id,
                        action = %action,
                        previous = change.previous,
                        new = change.new,
                        "stock movement committed"
                    );
                    return Ok(LedgerReceipt {
                        component: record.component,
                        entry: committed,
                        crossing,
                    });
                }
                Err(StoreError::Conflict(msg)) => {
                    if attempt >= MAX_COMMIT_ATTEMPTS {
                        return Err(LedgerError::Conflict(format!(
                            "gave up after {attempt} attempts: {msg}"
                        )));
                    }
                    tracing::debug!(
                        component_id = %component_id,
                        attempt,
                        "commit conflict, retrying"
                    );
                }
                Err(other) => return Err(other.into()),
            }
        }
    }

    /// Evaluate and publish the threshold crossing for a committed change.
    ///
    /// Runs strictly after the commit. A bus failure is observed, not
    /// propagated: the transaction already happened.
    fn dispatch_crossing(
        &self,
        component: &Component,
        change: QuantityChange,
    ) -> Option<CrossingEvent> {
        let event = evaluate_crossing(
            component.id(),
            change.previous,
            change.new,
            component.critical_low_threshold(),
            Utc::now(),
        )?;

        if let Err(e) = self.bus.publish(event.clone()) {
            tracing::warn!(
                component_id = %component.id(),
                error = ?e,
                "alert publish failed after commit; transaction stands"
            );
        }

        Some(event)
    }
}
