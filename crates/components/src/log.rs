use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use partstock_core::{ComponentId, DomainError, DomainResult, EntryId, UserId};

use crate::component::{Component, QuantityChange};

/// Kind of transaction log entry.
///
/// `Inward`/`Outward`/`Adjustment` are produced and validated by the ledger.
/// `Created`/`Updated`/`Deleted` are lifecycle pass-through kinds recorded on
/// behalf of component CRUD collaborators.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogAction {
    Inward,
    Outward,
    Adjustment,
    Created,
    Updated,
    Deleted,
}

impl LogAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogAction::Inward => "inward",
            LogAction::Outward => "outward",
            LogAction::Adjustment => "adjustment",
            LogAction::Created => "created",
            LogAction::Updated => "updated",
            LogAction::Deleted => "deleted",
        }
    }

    /// Parse the lowercase wire name used in queries and exports.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "inward" => Some(LogAction::Inward),
            "outward" => Some(LogAction::Outward),
            "adjustment" => Some(LogAction::Adjustment),
            "created" => Some(LogAction::Created),
            "updated" => Some(LogAction::Updated),
            "deleted" => Some(LogAction::Deleted),
            _ => None,
        }
    }
}

impl core::fmt::Display for LogAction {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The principal performing an operation, as supplied by the caller.
///
/// Opaque to the ledger: no role or permission semantics attach here. The
/// display name is denormalized into log entries for searchable history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockActor {
    pub id: UserId,
    pub name: String,
}

/// A log entry ready to be committed (no sequence number assigned yet).
///
/// The store assigns the global monotonic `sequence` during commit, producing
/// a [`LogEntry`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewLogEntry {
    pub id: EntryId,
    pub component_id: ComponentId,
    pub component_name: String,
    pub part_number: String,
    pub action: LogAction,
    pub previous_quantity: i64,
    pub new_quantity: i64,
    pub quantity_changed: i64,
    pub reason: String,
    pub actor_id: UserId,
    pub actor_name: String,
    pub project_name: Option<String>,
    pub notes: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

/// A committed, immutable transaction log entry.
///
/// Entries are append-only: never mutated or deleted after commit. `sequence`
/// is a write-time monotonic position used as the tie-break when ordering by
/// timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: EntryId,
    pub component_id: ComponentId,
    pub component_name: String,
    pub part_number: String,
    pub action: LogAction,
    pub previous_quantity: i64,
    pub new_quantity: i64,
    pub quantity_changed: i64,
    pub reason: String,
    pub actor_id: UserId,
    pub actor_name: String,
    pub project_name: Option<String>,
    pub notes: Option<String>,
    pub occurred_at: DateTime<Utc>,
    pub sequence: u64,
}

impl NewLogEntry {
    /// Build a ledger entry for a validated stock movement.
    ///
    /// The reason is required for the three ledger actions; blank reasons are
    /// rejected here so no collaborator can slip an unexplained movement in.
    pub fn stock_movement(
        component: &Component,
        action: LogAction,
        change: QuantityChange,
        reason: &str,
        actor: &StockActor,
        project_name: Option<String>,
        notes: Option<String>,
        occurred_at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        debug_assert!(matches!(
            action,
            LogAction::Inward | LogAction::Outward | LogAction::Adjustment
        ));
        if reason.trim().is_empty() {
            return Err(DomainError::validation("reason is required"));
        }

        Ok(Self {
            id: EntryId::new(),
            component_id: component.id(),
            component_name: component.name().to_string(),
            part_number: component.part_number().to_string(),
            action,
            previous_quantity: change.previous,
            new_quantity: change.new,
            quantity_changed: change.delta,
            reason: reason.trim().to_string(),
            actor_id: actor.id,
            actor_name: actor.name.clone(),
            project_name,
            notes,
            occurred_at,
        })
    }

    /// Build a pass-through lifecycle entry (created/updated/deleted).
    ///
    /// Not validated by the ledger beyond shape: the quantity does not change
    /// and the reason is the lifecycle description supplied by the caller.
    pub fn lifecycle(
        component: &Component,
        action: LogAction,
        reason: impl Into<String>,
        actor: &StockActor,
        occurred_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: EntryId::new(),
            component_id: component.id(),
            component_name: component.name().to_string(),
            part_number: component.part_number().to_string(),
            action,
            previous_quantity: component.quantity(),
            new_quantity: component.quantity(),
            quantity_changed: 0,
            reason: reason.into(),
            actor_id: actor.id,
            actor_name: actor.name.clone(),
            project_name: None,
            notes: None,
            occurred_at,
        }
    }

    /// Attach the store-assigned sequence number, producing the committed form.
    pub fn into_committed(self, sequence: u64) -> LogEntry {
        LogEntry {
            id: self.id,
            component_id: self.component_id,
            component_name: self.component_name,
            part_number: self.part_number,
            action: self.action,
            previous_quantity: self.previous_quantity,
            new_quantity: self.new_quantity,
            quantity_changed: self.quantity_changed,
            reason: self.reason,
            actor_id: self.actor_id,
            actor_name: self.actor_name,
            project_name: self.project_name,
            notes: self.notes,
            occurred_at: self.occurred_at,
            sequence,
        }
    }
}
