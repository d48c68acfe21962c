use super::common::{created_response, success_response, validate_input, ListParams};
use crate::entities::{Category, Item};
use crate::errors::ServiceError;
use crate::AppState;
use axum::{
    extract::{Json, Query, State},
    response::IntoResponse,
    routing::get,
    Router,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::info;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct ItemPayload {
    #[validate(length(min = 1, max = 64))]
    pub sku: String,
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub category: Category,
    #[validate(range(min = 0))]
    pub stock: i64,
    #[validate(range(min = 0))]
    pub safety_stock: i64,
    pub cost: Decimal,
    pub supplier_id: String,
    #[validate(range(min = 0))]
    pub lead_time_days: i64,
    /// Sheet row to replace; present for updates, absent for creates.
    pub row_index: Option<u32>,
}

impl ItemPayload {
    fn validate_cost(&self) -> Result<(), ServiceError> {
        if self.cost.is_sign_negative() {
            return Err(ServiceError::ValidationError(
                "cost must not be negative".into(),
            ));
        }
        Ok(())
    }

    fn into_item(self) -> Item {
        Item {
            sku: self.sku,
            name: self.name,
            category: self.category,
            stock: self.stock,
            safety_stock: self.safety_stock,
            cost: self.cost,
            supplier_id: self.supplier_id,
            lead_time_days: self.lead_time_days,
            row_index: self.row_index,
        }
    }
}

/// List items with pagination and optional free-text search
async fn list_items(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, ServiceError> {
    let req = params.into_request(state.config.default_page_size);
    let page = state.store.list_items(&req).await?;
    Ok(success_response(page))
}

/// Append a new item
async fn create_item(
    State(state): State<AppState>,
    Json(payload): Json<ItemPayload>,
) -> Result<impl IntoResponse, ServiceError> {
    validate_input(&payload)?;
    payload.validate_cost()?;

    let item = payload.into_item();
    state.store.create_item(&item).await?;
    info!(sku = %item.sku, "Item created");
    Ok(created_response(serde_json::json!({
        "sku": item.sku,
        "message": "Item created successfully"
    })))
}

/// Replace an item in place at its tracked sheet row
async fn update_item(
    State(state): State<AppState>,
    Json(payload): Json<ItemPayload>,
) -> Result<impl IntoResponse, ServiceError> {
    validate_input(&payload)?;
    payload.validate_cost()?;

    let item = payload.into_item();
    state.store.update_item(&item).await?;
    info!(sku = %item.sku, row = ?item.row_index, "Item updated");
    Ok(success_response(serde_json::json!({
        "message": "Item updated successfully"
    })))
}

pub fn item_routes() -> Router<AppState> {
    Router::new().route("/", get(list_items).post(create_item).put(update_item))
}
