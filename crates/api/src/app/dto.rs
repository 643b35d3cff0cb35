use serde::Deserialize;

use partstock_alerts::CrossingEvent;
use partstock_components::{Component, LogEntry};
use partstock_infra::history::LogPage;
use partstock_infra::ledger::LedgerReceipt;

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct InwardRequest {
    pub component_id: String,
    pub quantity: i64,
    pub reason: String,
    pub project_name: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct OutwardRequest {
    pub component_id: String,
    pub quantity: i64,
    pub reason: String,
    pub project_name: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AdjustmentRequest {
    pub component_id: String,
    pub new_quantity: i64,
    pub reason: String,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateComponentRequest {
    pub part_number: String,
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub initial_quantity: i64,
    #[serde(default)]
    pub critical_low_threshold: i64,
    #[serde(default)]
    pub unit_price_cents: u64,
    pub description: Option<String>,
    pub location_bin: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ComponentSearchParams {
    pub part: Option<String>,
    pub search: Option<String>,
    pub category: Option<String>,
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct LogQueryParams {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub search: Option<String>,
    /// One of the action kinds, or "all"/empty.
    pub action: Option<String>,
    /// Actor UUID, or "all"/empty.
    pub actor: Option<String>,
    /// Positive number of days, or "all"/empty for no window.
    pub since_days: Option<String>,
}

// -------------------------
// JSON mapping helpers
// -------------------------

pub fn component_to_json(c: &Component) -> serde_json::Value {
    serde_json::json!({
        "id": c.id().to_string(),
        "part_number": c.part_number(),
        "name": c.name(),
        "category": c.category(),
        "quantity": c.quantity(),
        "critical_low_threshold": c.critical_low_threshold(),
        "unit_price_cents": c.unit_price_cents(),
        "description": c.description(),
        "location_bin": c.location_bin(),
        "is_low_stock": c.is_low_stock(),
        "is_out_of_stock": c.is_out_of_stock(),
    })
}

pub fn entry_to_json(e: &LogEntry) -> serde_json::Value {
    serde_json::json!({
        "id": e.id.to_string(),
        "component_id": e.component_id.to_string(),
        "component_name": e.component_name,
        "part_number": e.part_number,
        "action": e.action.as_str(),
        "previous_quantity": e.previous_quantity,
        "new_quantity": e.new_quantity,
        "quantity_changed": e.quantity_changed,
        "reason": e.reason,
        "actor_id": e.actor_id.to_string(),
        "actor_name": e.actor_name,
        "project_name": e.project_name,
        "notes": e.notes,
        "occurred_at": e.occurred_at.to_rfc3339(),
        "sequence": e.sequence,
    })
}

pub fn crossing_to_json(event: &CrossingEvent) -> serde_json::Value {
    serde_json::json!({
        "component_id": event.component_id.to_string(),
        "type": match event.kind {
            partstock_alerts::CrossingKind::LowStock => "low_stock",
            partstock_alerts::CrossingKind::Restocked => "restocked",
        },
        "priority": format!("{:?}", event.priority).to_lowercase(),
        "quantity": event.quantity,
        "threshold": event.threshold,
        "timestamp": event.occurred_at.to_rfc3339(),
    })
}

pub fn receipt_to_json(receipt: &LedgerReceipt) -> serde_json::Value {
    serde_json::json!({
        "component": component_to_json(&receipt.component),
        "entry": entry_to_json(&receipt.entry),
        "crossing": receipt.crossing.as_ref().map(crossing_to_json),
    })
}

pub fn log_page_to_json(page: &LogPage) -> serde_json::Value {
    serde_json::json!({
        "entries": page.entries.iter().map(entry_to_json).collect::<Vec<_>>(),
        "pagination": {
            "current_page": page.page_info.current_page,
            "total_pages": page.page_info.total_pages,
            "total_count": page.page_info.total_count,
            "has_next": page.page_info.has_next,
            "has_previous": page.page_info.has_previous,
        }
    })
}
