//! HTTP API: server, routing, and request/response mapping.
//!
//! Role checks are the caller's concern (a gateway or session layer); this
//! surface takes the acting principal from headers and hands it to the
//! ledger opaquely.

pub mod app;
