//! `partstock-infra` — storage seam and ledger orchestration.
//!
//! Composes the domain crates into the transaction pipeline: the
//! [`store::InventoryStore`] trait (atomic quantity-plus-log commit), the
//! [`ledger::TransactionLedger`] (the only write path to stock quantities),
//! the [`history`] query service, and the [`catalog`] read paths.

pub mod catalog;
pub mod history;
pub mod ledger;
pub mod store;

#[cfg(test)]
mod integration_tests;
