//! `partstock-components` — typed inventory records.
//!
//! `Component` (current stock state) and the transaction log record types.
//! Decision logic here is pure: planning a stock change validates and
//! computes the quantity transition, persistence happens elsewhere.

pub mod component;
pub mod log;

pub use component::{Component, NewComponent, QuantityChange};
pub use log::{LogAction, LogEntry, NewLogEntry, StockActor};
