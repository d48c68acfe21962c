use super::common::{success_response, ListParams};
use crate::errors::ServiceError;
use crate::AppState;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
    routing::get,
    Router,
};

/// Shortage plan over the full item set; only the computed results are
/// paginated.
async fn shortage_plan(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, ServiceError> {
    let req = params.into_request(state.config.default_page_size);
    let plan = state.mrp.plan(&req).await?;
    Ok(success_response(plan))
}

pub fn mrp_routes() -> Router<AppState> {
    Router::new().route("/", get(shortage_plan))
}
