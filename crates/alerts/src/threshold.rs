//! Threshold crossing evaluation.
//!
//! The single authoritative low-stock definition lives here: a component is
//! low when `quantity <= threshold`. Out-of-stock (`quantity == 0`) is a
//! stricter classification used for display and priority, not a separate
//! crossing edge.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use partstock_core::ComponentId;

/// Direction of a threshold crossing.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrossingKind {
    /// Quantity fell to or below the threshold.
    LowStock,
    /// Quantity rose back above the threshold.
    Restocked,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertPriority {
    Info,
    High,
    Critical,
}

/// A threshold crossing, emitted at most once per state transition.
///
/// Ephemeral: produced after a ledger commit and handed to the bus; the core
/// never stores these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrossingEvent {
    pub component_id: ComponentId,
    pub kind: CrossingKind,
    pub priority: AlertPriority,
    pub quantity: i64,
    pub threshold: i64,
    pub occurred_at: DateTime<Utc>,
}

pub fn low_stock(quantity: i64, threshold: i64) -> bool {
    quantity <= threshold
}

pub fn out_of_stock(quantity: i64) -> bool {
    quantity == 0
}

/// Decide whether a quantity transition crosses the low-stock boundary.
///
/// Returns `None` for no-change transitions (still-low or still-fine), even
/// when the quantity moved; repeated small movements while already low do not
/// re-alert.
pub fn evaluate_crossing(
    component_id: ComponentId,
    previous_quantity: i64,
    new_quantity: i64,
    threshold: i64,
    occurred_at: DateTime<Utc>,
) -> Option<CrossingEvent> {
    let was_low = low_stock(previous_quantity, threshold);
    let is_low = low_stock(new_quantity, threshold);

    if was_low == is_low {
        return None;
    }

    let (kind, priority) = if is_low {
        let priority = if out_of_stock(new_quantity) {
            AlertPriority::Critical
        } else {
            AlertPriority::High
        };
        (CrossingKind::LowStock, priority)
    } else {
        (CrossingKind::Restocked, AlertPriority::Info)
    };

    Some(CrossingEvent {
        component_id,
        kind,
        priority,
        quantity: new_quantity,
        threshold,
        occurred_at,
    })
}
