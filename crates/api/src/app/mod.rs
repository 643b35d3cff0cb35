use std::sync::Arc;

use axum::{Extension, Router, routing::get};
use tower::ServiceBuilder;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the application router with in-memory storage and alert bus.
pub fn build_app() -> Router {
    let services = services::AppServices::build();
    build_app_with(services)
}

pub fn build_app_with(services: Arc<services::AppServices>) -> Router {
    Router::new()
        .route("/health", get(routes::system::health))
        .route("/stats", get(routes::components::stats))
        .route("/categories", get(routes::components::categories))
        .route("/alerts/stream", get(routes::system::alert_stream))
        .nest("/components", routes::components::router())
        .nest("/stock", routes::stock::router())
        .nest("/logs", routes::logs::router())
        .layer(ServiceBuilder::new().layer(Extension(services)))
}
