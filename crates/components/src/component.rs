use serde::{Deserialize, Serialize};

use partstock_core::{ComponentId, DomainError, DomainResult};

/// An inventory component (electronic part).
///
/// `quantity` is the current on-hand count and is mutated exclusively by the
/// transaction ledger; everyone else reads. Invariant: `quantity >= 0` and
/// equals the sum of all applied deltas in the component's log entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Component {
    id: ComponentId,
    part_number: String,
    name: String,
    category: String,
    quantity: i64,
    critical_low_threshold: i64,
    /// Minor currency units (cents). Reporting only, never used by the ledger.
    unit_price_cents: u64,
    description: Option<String>,
    location_bin: Option<String>,
}

/// Validated input for creating a component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewComponent {
    pub part_number: String,
    pub name: String,
    pub category: String,
    pub initial_quantity: i64,
    pub critical_low_threshold: i64,
    pub unit_price_cents: u64,
    pub description: Option<String>,
    pub location_bin: Option<String>,
}

/// A planned quantity transition, not yet committed.
///
/// `new = previous + delta` always holds; `delta` may be zero only for
/// adjustments.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct QuantityChange {
    pub previous: i64,
    pub new: i64,
    pub delta: i64,
}

impl Component {
    /// Construct a validated component.
    pub fn create(id: ComponentId, input: NewComponent) -> DomainResult<Self> {
        if input.part_number.trim().is_empty() {
            return Err(DomainError::validation("part_number cannot be empty"));
        }
        if input.name.trim().is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }
        if input.initial_quantity < 0 {
            return Err(DomainError::validation("initial quantity cannot be negative"));
        }
        if input.critical_low_threshold < 0 {
            return Err(DomainError::validation("threshold cannot be negative"));
        }

        Ok(Self {
            id,
            part_number: input.part_number,
            name: input.name,
            category: input.category,
            quantity: input.initial_quantity,
            critical_low_threshold: input.critical_low_threshold,
            unit_price_cents: input.unit_price_cents,
            description: input.description,
            location_bin: input.location_bin,
        })
    }

    pub fn id(&self) -> ComponentId {
        self.id
    }

    pub fn part_number(&self) -> &str {
        &self.part_number
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    pub fn critical_low_threshold(&self) -> i64 {
        self.critical_low_threshold
    }

    pub fn unit_price_cents(&self) -> u64 {
        self.unit_price_cents
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn location_bin(&self) -> Option<&str> {
        self.location_bin.as_deref()
    }

    /// Plan an inward movement (receipt). Quantity must be strictly positive;
    /// there is no business upper bound, but the stock counter itself must
    /// not wrap.
    pub fn plan_inward(&self, quantity: i64) -> DomainResult<QuantityChange> {
        if quantity <= 0 {
            return Err(DomainError::validation("inward quantity must be positive"));
        }
        let new = self
            .quantity
            .checked_add(quantity)
            .ok_or_else(|| DomainError::validation("inward quantity overflows the stock counter"))?;
        Ok(QuantityChange {
            previous: self.quantity,
            new,
            delta: quantity,
        })
    }

    /// Plan an outward movement (consumption). Never clamps: taking more than
    /// is on hand is an error, not a zeroing.
    pub fn plan_outward(&self, quantity: i64) -> DomainResult<QuantityChange> {
        if quantity <= 0 {
            return Err(DomainError::validation("outward quantity must be positive"));
        }
        if quantity > self.quantity {
            return Err(DomainError::insufficient_stock(quantity, self.quantity));
        }
        Ok(QuantityChange {
            previous: self.quantity,
            new: self.quantity - quantity,
            delta: -quantity,
        })
    }

    /// Plan an adjustment (correction) to an absolute quantity. The delta may
    /// be zero; re-applying the same target is a recorded no-op.
    pub fn plan_adjustment(&self, new_quantity: i64) -> DomainResult<QuantityChange> {
        if new_quantity < 0 {
            return Err(DomainError::validation("adjusted quantity cannot be negative"));
        }
        let delta = new_quantity
            .checked_sub(self.quantity)
            .ok_or_else(|| DomainError::validation("adjustment delta overflows"))?;
        Ok(QuantityChange {
            previous: self.quantity,
            new: new_quantity,
            delta,
        })
    }

    /// Apply a planned change, producing the post-commit component state.
    pub fn with_quantity(&self, quantity: i64) -> Self {
        let mut next = self.clone();
        next.quantity = quantity;
        next
    }

    pub fn is_low_stock(&self) -> bool {
        self.quantity <= self.critical_low_threshold
    }

    pub fn is_out_of_stock(&self) -> bool {
        self.quantity == 0
    }
}
