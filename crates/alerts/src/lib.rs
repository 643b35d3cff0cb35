//! `partstock-alerts` — threshold monitoring and alert distribution.
//!
//! The threshold monitor is a pure function of (previous quantity, new
//! quantity, threshold); the bus is the seam through which crossing events
//! reach notification consumers.

pub mod bus;
pub mod in_memory;
pub mod threshold;

pub use bus::{AlertBus, Subscription};
pub use in_memory::{InMemoryAlertBus, InMemoryBusError};
pub use threshold::{AlertPriority, CrossingEvent, CrossingKind, evaluate_crossing, low_stock, out_of_stock};
