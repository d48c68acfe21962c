use super::common::{created_response, success_response, validate_input, ListParams};
use crate::entities::Supplier;
use crate::errors::ServiceError;
use crate::AppState;
use axum::{
    extract::{Json, Query, State},
    response::IntoResponse,
    routing::get,
    Router,
};
use serde::Deserialize;
use tracing::info;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct SupplierPayload {
    #[validate(length(min = 1, max = 64))]
    pub id: String,
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(range(min = 1.0, max = 5.0))]
    pub rating: f32,
    #[validate(email)]
    pub email: String,
    pub payment_terms: String,
    pub row_index: Option<u32>,
}

impl SupplierPayload {
    fn into_supplier(self) -> Supplier {
        Supplier {
            id: self.id,
            name: self.name,
            rating: self.rating,
            email: self.email,
            payment_terms: self.payment_terms,
            row_index: self.row_index,
        }
    }
}

/// List suppliers with pagination and optional free-text search
async fn list_suppliers(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, ServiceError> {
    let req = params.into_request(state.config.default_page_size);
    let page = state.store.list_suppliers(&req).await?;
    Ok(success_response(page))
}

async fn create_supplier(
    State(state): State<AppState>,
    Json(payload): Json<SupplierPayload>,
) -> Result<impl IntoResponse, ServiceError> {
    validate_input(&payload)?;
    let supplier = payload.into_supplier();
    state.store.create_supplier(&supplier).await?;
    info!(id = %supplier.id, "Supplier created");
    Ok(created_response(serde_json::json!({
        "id": supplier.id,
        "message": "Supplier created successfully"
    })))
}

async fn update_supplier(
    State(state): State<AppState>,
    Json(payload): Json<SupplierPayload>,
) -> Result<impl IntoResponse, ServiceError> {
    validate_input(&payload)?;
    let supplier = payload.into_supplier();
    state.store.update_supplier(&supplier).await?;
    info!(id = %supplier.id, row = ?supplier.row_index, "Supplier updated");
    Ok(success_response(serde_json::json!({
        "message": "Supplier updated successfully"
    })))
}

pub fn supplier_routes() -> Router<AppState> {
    Router::new().route(
        "/",
        get(list_suppliers).post(create_supplier).put(update_supplier),
    )
}
