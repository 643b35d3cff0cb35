use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, Query},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
};

use partstock_components::NewComponent;
use partstock_infra::catalog::ComponentQuery;

use crate::app::routes::common;
use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", post(create).get(search))
        .route("/low-stock", get(low_stock))
        .route("/:id", get(get_component))
}

pub async fn create(
    Extension(services): Extension<Arc<AppServices>>,
    headers: HeaderMap,
    Json(body): Json<dto::CreateComponentRequest>,
) -> axum::response::Response {
    let actor = match common::actor_from_headers(&headers) {
        Ok(actor) => actor,
        Err(resp) => return resp,
    };

    let input = NewComponent {
        part_number: body.part_number,
        name: body.name,
        category: body.category,
        initial_quantity: body.initial_quantity,
        critical_low_threshold: body.critical_low_threshold,
        unit_price_cents: body.unit_price_cents,
        description: body.description,
        location_bin: body.location_bin,
    };

    match services.ledger.create_component(input, &actor) {
        Ok((component, _entry)) => (
            StatusCode::CREATED,
            Json(dto::component_to_json(&component)),
        )
            .into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}

pub async fn search(
    Extension(services): Extension<Arc<AppServices>>,
    Query(params): Query<dto::ComponentSearchParams>,
) -> axum::response::Response {
    let query = ComponentQuery {
        part: params.part,
        search: params.search,
        category: params.category,
        limit: params.limit,
    };

    match services.catalog.search(&query) {
        Ok(components) => {
            let items: Vec<_> = components.iter().map(dto::component_to_json).collect();
            (
                StatusCode::OK,
                Json(serde_json::json!({ "components": items, "count": items.len() })),
            )
                .into_response()
        }
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn low_stock(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.catalog.low_stock() {
        Ok(components) => {
            let items: Vec<_> = components.iter().map(dto::component_to_json).collect();
            (
                StatusCode::OK,
                Json(serde_json::json!({ "components": items, "count": items.len() })),
            )
                .into_response()
        }
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn get_component(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match common::parse_component_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match services.catalog.get(id) {
        Ok(Some(component)) => {
            (StatusCode::OK, Json(dto::component_to_json(&component))).into_response()
        }
        Ok(None) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "component not found"),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn categories(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.catalog.categories() {
        Ok(categories) => {
            (StatusCode::OK, Json(serde_json::json!({ "categories": categories }))).into_response()
        }
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn stats(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    match services.catalog.stats() {
        Ok(stats) => (StatusCode::OK, Json(serde_json::json!(stats))).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}
