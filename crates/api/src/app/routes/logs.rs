use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};

use partstock_components::LogAction;
use partstock_core::UserId;
use partstock_infra::history::{ActionFilter, LogFilter, Pagination};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new().route("/", get(query_logs))
}

/// Parse the `action` query value: "all"/empty selects everything.
fn parse_action_filter(raw: Option<&str>) -> Result<ActionFilter, String> {
    match raw.map(str::trim) {
        None | Some("") | Some("all") => Ok(ActionFilter::All),
        Some(other) => LogAction::parse(other)
            .map(ActionFilter::Only)
            .ok_or_else(|| format!("unknown action kind: {other}")),
    }
}

/// Parse the `since_days` query value: "all"/empty means no window.
fn parse_since_days(raw: Option<&str>) -> Result<Option<i64>, String> {
    match raw.map(str::trim) {
        None | Some("") | Some("all") => Ok(None),
        Some(other) => match other.parse::<i64>() {
            Ok(days) if days > 0 => Ok(Some(days)),
            _ => Err("since_days must be a positive number of days or \"all\"".to_string()),
        },
    }
}

/// Parse the `actor` query value: "all"/empty selects everyone.
fn parse_actor_filter(raw: Option<&str>) -> Result<Option<UserId>, String> {
    match raw.map(str::trim) {
        None | Some("") | Some("all") => Ok(None),
        Some(other) => other
            .parse::<UserId>()
            .map(Some)
            .map_err(|_| "actor must be a UUID or \"all\"".to_string()),
    }
}

pub async fn query_logs(
    Extension(services): Extension<Arc<AppServices>>,
    Query(params): Query<dto::LogQueryParams>,
) -> axum::response::Response {
    let action = match parse_action_filter(params.action.as_deref()) {
        Ok(action) => action,
        Err(msg) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_action", msg),
    };
    let actor = match parse_actor_filter(params.actor.as_deref()) {
        Ok(actor) => actor,
        Err(msg) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_actor", msg),
    };
    let since_days = match parse_since_days(params.since_days.as_deref()) {
        Ok(days) => days,
        Err(msg) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_since_days", msg),
    };

    let filter = LogFilter {
        search: params.search,
        action,
        actor,
        since_days,
    };
    let pagination = Pagination::new(params.page, params.limit);

    match services.history.query(&filter, pagination) {
        Ok(page) => (StatusCode::OK, Json(dto::log_page_to_json(&page))).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_filter_accepts_all_and_kinds() {
        assert_eq!(parse_action_filter(None).unwrap(), ActionFilter::All);
        assert_eq!(parse_action_filter(Some("all")).unwrap(), ActionFilter::All);
        assert_eq!(parse_action_filter(Some("")).unwrap(), ActionFilter::All);
        assert_eq!(
            parse_action_filter(Some("outward")).unwrap(),
            ActionFilter::Only(LogAction::Outward)
        );
        assert!(parse_action_filter(Some("sideways")).is_err());
    }

    #[test]
    fn actor_filter_accepts_all_and_uuids() {
        assert_eq!(parse_actor_filter(None).unwrap(), None);
        assert_eq!(parse_actor_filter(Some("all")).unwrap(), None);

        let id = UserId::new();
        assert_eq!(parse_actor_filter(Some(&id.to_string())).unwrap(), Some(id));
        assert!(parse_actor_filter(Some("not-a-uuid")).is_err());
    }

    #[test]
    fn since_days_accepts_all_and_positive_windows() {
        assert_eq!(parse_since_days(None).unwrap(), None);
        assert_eq!(parse_since_days(Some("all")).unwrap(), None);
        assert_eq!(parse_since_days(Some("")).unwrap(), None);
        assert_eq!(parse_since_days(Some("30")).unwrap(), Some(30));
        assert!(parse_since_days(Some("0")).is_err());
        assert!(parse_since_days(Some("-3")).is_err());
        assert!(parse_since_days(Some("soon")).is_err());
    }
}
