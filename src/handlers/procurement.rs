use super::common::{success_response, ListParams};
use crate::errors::ServiceError;
use crate::AppState;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
    routing::get,
    Router,
};

async fn list_purchase_orders(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, ServiceError> {
    let req = params.into_request(state.config.default_page_size);
    let page = state.procurement.list_orders(&req)?;
    Ok(success_response(page))
}

async fn list_logistics(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, ServiceError> {
    let req = params.into_request(state.config.default_page_size);
    let page = state.procurement.list_logistics(&req)?;
    Ok(success_response(page))
}

async fn company_profile(State(state): State<AppState>) -> impl IntoResponse {
    success_response(state.procurement.profile())
}

pub fn purchase_order_routes() -> Router<AppState> {
    Router::new().route("/", get(list_purchase_orders))
}

pub fn logistics_routes() -> Router<AppState> {
    Router::new().route("/", get(list_logistics))
}

pub fn profile_routes() -> Router<AppState> {
    Router::new().route("/", get(company_profile))
}
