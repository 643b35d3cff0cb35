use std::sync::Arc;

use axum::{
    Json, Router,
    extract::Extension,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::post,
};

use partstock_infra::ledger::MovementContext;

use crate::app::routes::common;
use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/inward", post(inward))
        .route("/outward", post(outward))
        .route("/adjustment", post(adjustment))
}

fn movement_context(
    headers: &HeaderMap,
    reason: String,
    project_name: Option<String>,
    notes: Option<String>,
) -> Result<MovementContext, axum::response::Response> {
    let actor = common::actor_from_headers(headers)?;
    let mut ctx = MovementContext::new(actor, reason);
    if let Some(project) = project_name {
        ctx = ctx.with_project(project);
    }
    if let Some(notes) = notes {
        ctx = ctx.with_notes(notes);
    }
    Ok(ctx)
}

pub async fn inward(
    Extension(services): Extension<Arc<AppServices>>,
    headers: HeaderMap,
    Json(body): Json<dto::InwardRequest>,
) -> axum::response::Response {
    let component_id = match common::parse_component_id(&body.component_id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let ctx = match movement_context(&headers, body.reason, body.project_name, body.notes) {
        Ok(ctx) => ctx,
        Err(resp) => return resp,
    };

    match services.ledger.inward(component_id, body.quantity, &ctx) {
        Ok(receipt) => (StatusCode::OK, Json(dto::receipt_to_json(&receipt))).into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}

pub async fn outward(
    Extension(services): Extension<Arc<AppServices>>,
    headers: HeaderMap,
    Json(body): Json<dto::OutwardRequest>,
) -> axum::response::Response {
    let component_id = match common::parse_component_id(&body.component_id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let ctx = match movement_context(&headers, body.reason, body.project_name, body.notes) {
        Ok(ctx) => ctx,
        Err(resp) => return resp,
    };

    match services.ledger.outward(component_id, body.quantity, &ctx) {
        Ok(receipt) => (StatusCode::OK, Json(dto::receipt_to_json(&receipt))).into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}

pub async fn adjustment(
    Extension(services): Extension<Arc<AppServices>>,
    headers: HeaderMap,
    Json(body): Json<dto::AdjustmentRequest>,
) -> axum::response::Response {
    let component_id = match common::parse_component_id(&body.component_id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let ctx = match movement_context(&headers, body.reason, None, body.notes) {
        Ok(ctx) => ctx,
        Err(resp) => return resp,
    };

    match services
        .ledger
        .adjustment(component_id, body.new_quantity, &ctx)
    {
        Ok(receipt) => (StatusCode::OK, Json(dto::receipt_to_json(&receipt))).into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}
