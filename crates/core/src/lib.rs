//! `partstock-core` — domain foundation building blocks.
//!
//! Pure domain primitives only: typed identifiers and the domain error
//! taxonomy. No storage, no transport, no IO.

pub mod error;
pub mod id;

pub use error::{DomainError, DomainResult};
pub use id::{ComponentId, EntryId, UserId};
