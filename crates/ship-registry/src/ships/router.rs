use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{ShipDraft, ShipId, ShipPatch, ShipType};
use super::query::{OrderKey, PageRequest, ShipFilter, ShipQuery};
use super::repository::{RepositoryError, ShipRepository};
use super::service::{ShipRegistryService, ShipServiceError};

/// Query string accepted by the listing endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShipListParams {
    pub name: Option<String>,
    pub planet: Option<String>,
    pub ship_type: Option<ShipType>,
    pub after: Option<i64>,
    pub before: Option<i64>,
    pub is_used: Option<bool>,
    pub min_speed: Option<f64>,
    pub max_speed: Option<f64>,
    pub min_crew_size: Option<u32>,
    pub max_crew_size: Option<u32>,
    pub min_rating: Option<f64>,
    pub max_rating: Option<f64>,
    pub order: Option<String>,
    pub page_number: Option<usize>,
    pub page_size: Option<usize>,
}

impl ShipListParams {
    /// Convert into an engine request, rejecting a zero page size.
    pub fn into_query(self) -> Result<ShipQuery, String> {
        if self.page_size == Some(0) {
            return Err("pageSize must be greater than zero".to_string());
        }

        let order = OrderKey::parse(self.order.as_deref());
        let page = PageRequest::new(self.page_number, self.page_size);
        let filter = ShipFilter {
            name: self.name,
            planet: self.planet,
            ship_type: self.ship_type,
            after: self.after,
            before: self.before,
            is_used: self.is_used,
            min_speed: self.min_speed,
            max_speed: self.max_speed,
            min_crew_size: self.min_crew_size,
            max_crew_size: self.max_crew_size,
            min_rating: self.min_rating,
            max_rating: self.max_rating,
        };

        Ok(ShipQuery {
            filter,
            order,
            page,
        })
    }
}

/// Router builder exposing the ship registry REST surface.
pub fn ship_router<R>(service: Arc<ShipRegistryService<R>>) -> Router
where
    R: ShipRepository + 'static,
{
    Router::new()
        .route(
            "/rest/ships",
            get(list_handler::<R>).post(create_handler::<R>),
        )
        .route("/rest/ships/count", get(count_handler::<R>))
        .route(
            "/rest/ships/:id",
            get(get_handler::<R>)
                .post(update_handler::<R>)
                .delete(delete_handler::<R>),
        )
        .with_state(service)
}

/// Identities are positive integers; anything else is a client error.
pub(crate) fn parse_ship_id(raw: &str) -> Option<ShipId> {
    match raw.trim().parse::<u64>() {
        Ok(0) | Err(_) => None,
        Ok(id) => Some(ShipId(id)),
    }
}

pub(crate) async fn list_handler<R>(
    State(service): State<Arc<ShipRegistryService<R>>>,
    Query(params): Query<ShipListParams>,
) -> Response
where
    R: ShipRepository + 'static,
{
    let request = match params.into_query() {
        Ok(request) => request,
        Err(message) => return error_response(StatusCode::BAD_REQUEST, &message),
    };

    match service.list(&request) {
        Ok(ships) => (StatusCode::OK, axum::Json(ships)).into_response(),
        Err(other) => service_error_response(other),
    }
}

pub(crate) async fn count_handler<R>(
    State(service): State<Arc<ShipRegistryService<R>>>,
    Query(filter): Query<ShipFilter>,
) -> Response
where
    R: ShipRepository + 'static,
{
    match service.count(&filter) {
        Ok(count) => (StatusCode::OK, axum::Json(count)).into_response(),
        Err(other) => service_error_response(other),
    }
}

pub(crate) async fn create_handler<R>(
    State(service): State<Arc<ShipRegistryService<R>>>,
    payload: Result<axum::Json<ShipDraft>, JsonRejection>,
) -> Response
where
    R: ShipRepository + 'static,
{
    let axum::Json(draft) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return rejected_body_response(rejection),
    };

    match service.create(draft) {
        Ok(ship) => (StatusCode::OK, axum::Json(ship)).into_response(),
        Err(other) => service_error_response(other),
    }
}

pub(crate) async fn get_handler<R>(
    State(service): State<Arc<ShipRegistryService<R>>>,
    Path(raw_id): Path<String>,
) -> Response
where
    R: ShipRepository + 'static,
{
    let Some(id) = parse_ship_id(&raw_id) else {
        return invalid_id_response(&raw_id);
    };

    match service.get(id) {
        Ok(ship) => (StatusCode::OK, axum::Json(ship)).into_response(),
        Err(other) => service_error_response(other),
    }
}

pub(crate) async fn update_handler<R>(
    State(service): State<Arc<ShipRegistryService<R>>>,
    Path(raw_id): Path<String>,
    payload: Result<axum::Json<Option<ShipPatch>>, JsonRejection>,
) -> Response
where
    R: ShipRepository + 'static,
{
    let Some(id) = parse_ship_id(&raw_id) else {
        return invalid_id_response(&raw_id);
    };
    let axum::Json(patch) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return rejected_body_response(rejection),
    };

    match service.update(id, patch) {
        Ok(ship) => (StatusCode::OK, axum::Json(ship)).into_response(),
        Err(other) => service_error_response(other),
    }
}

pub(crate) async fn delete_handler<R>(
    State(service): State<Arc<ShipRegistryService<R>>>,
    Path(raw_id): Path<String>,
) -> Response
where
    R: ShipRepository + 'static,
{
    let Some(id) = parse_ship_id(&raw_id) else {
        return invalid_id_response(&raw_id);
    };

    match service.delete(id) {
        Ok(()) => StatusCode::OK.into_response(),
        Err(other) => service_error_response(other),
    }
}

fn service_error_response(error: ShipServiceError) -> Response {
    let status = match &error {
        ShipServiceError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        ShipServiceError::NotFound(_) | ShipServiceError::Repository(RepositoryError::NotFound) => {
            StatusCode::NOT_FOUND
        }
        ShipServiceError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    error_response(status, &error.to_string())
}

/// Malformed or mistyped bodies are client errors, whatever axum's default status.
fn rejected_body_response(rejection: JsonRejection) -> Response {
    error_response(StatusCode::BAD_REQUEST, &rejection.body_text())
}

fn invalid_id_response(raw_id: &str) -> Response {
    error_response(
        StatusCode::BAD_REQUEST,
        &format!("ship id must be a positive integer (found '{raw_id}')"),
    )
}

fn error_response(status: StatusCode, message: &str) -> Response {
    let payload = json!({
        "error": message,
    });
    (status, axum::Json(payload)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ship_ids_must_be_positive_integers() {
        assert_eq!(parse_ship_id("12"), Some(ShipId(12)));
        assert_eq!(parse_ship_id("0"), None);
        assert_eq!(parse_ship_id("-4"), None);
        assert_eq!(parse_ship_id("abc"), None);
        assert_eq!(parse_ship_id("1.5"), None);
    }

    #[test]
    fn list_params_apply_defaults_and_order_fallback() {
        let params = ShipListParams {
            order: Some("unknown".to_string()),
            ..ShipListParams::default()
        };

        let request = params.into_query().expect("defaults are valid");
        assert_eq!(request.order, OrderKey::Id);
        assert_eq!(request.page, PageRequest::new(Some(0), Some(3)));
        assert_eq!(request.filter, ShipFilter::default());
    }

    #[test]
    fn list_params_reject_zero_page_size() {
        let params = ShipListParams {
            page_size: Some(0),
            ..ShipListParams::default()
        };

        assert!(params.into_query().is_err());
    }
}
