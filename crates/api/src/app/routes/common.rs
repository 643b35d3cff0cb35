use axum::http::{HeaderMap, StatusCode};

use partstock_components::StockActor;
use partstock_core::{ComponentId, UserId};

use crate::app::errors;

/// Resolve the acting principal from request headers.
///
/// Authentication happens upstream; by the time a request reaches the ledger
/// the caller is trusted to state who is acting. `X-Actor-Id` must be a UUID,
/// `X-Actor-Name` is the display name recorded in log entries.
pub fn actor_from_headers(headers: &HeaderMap) -> Result<StockActor, axum::response::Response> {
    let id = headers
        .get("x-actor-id")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            errors::json_error(
                StatusCode::BAD_REQUEST,
                "missing_actor",
                "X-Actor-Id header is required",
            )
        })?;
    let id: UserId = id.parse().map_err(|_| {
        errors::json_error(
            StatusCode::BAD_REQUEST,
            "invalid_actor",
            "X-Actor-Id must be a UUID",
        )
    })?;

    let name = headers
        .get("x-actor-name")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string();

    Ok(StockActor { id, name })
}

pub fn parse_component_id(raw: &str) -> Result<ComponentId, axum::response::Response> {
    raw.parse().map_err(|_| {
        errors::json_error(
            StatusCode::BAD_REQUEST,
            "invalid_component_id",
            "component_id must be a UUID",
        )
    })
}
