use super::common::{success_response, validate_input};
use crate::errors::ServiceError;
use crate::services::analysis::{EngagementKind, ScoutingTarget};
use crate::AppState;
use axum::{
    extract::{Json, State},
    response::IntoResponse,
    routing::post,
    Router,
};
use serde::Deserialize;
use validator::Validate;

/// Structured procurement analysis over the full inventory and supplier
/// base. Degrades to a locally computed summary when the AI collaborator is
/// unavailable.
async fn procurement_analysis(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ServiceError> {
    let items = state.store.all_items("").await;
    let suppliers = state.store.all_suppliers().await;
    let analysis = state.analysis.analyze(&items, &suppliers).await;
    Ok(success_response(analysis))
}

/// Web-grounded scouting for alternative suppliers or competitors.
async fn supplier_scouting(
    State(state): State<AppState>,
    Json(target): Json<ScoutingTarget>,
) -> Result<impl IntoResponse, ServiceError> {
    let report = state.analysis.scout(&target).await;
    Ok(success_response(report))
}

#[derive(Debug, Deserialize, Validate)]
pub struct EngagementRequest {
    pub kind: EngagementKind,
    #[validate(length(min = 1))]
    pub candidate_name: String,
    #[validate(length(min = 1))]
    pub item_name: String,
}

/// Drafts an RFI/NDA/RFQ email towards a scouted candidate.
async fn engagement_draft(
    State(state): State<AppState>,
    Json(payload): Json<EngagementRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    validate_input(&payload)?;
    let company = state.procurement.profile().company_name;
    let draft = state
        .analysis
        .engagement_draft(
            payload.kind,
            &payload.candidate_name,
            &payload.item_name,
            &company,
        )
        .await;
    Ok(success_response(serde_json::json!({ "draft": draft })))
}

pub fn analysis_routes() -> Router<AppState> {
    Router::new()
        .route("/procurement", post(procurement_analysis))
        .route("/scouting", post(supplier_scouting))
        .route("/engagement", post(engagement_draft))
}
