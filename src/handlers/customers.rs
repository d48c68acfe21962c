use super::common::{created_response, success_response, validate_input, ListParams};
use crate::entities::Customer;
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
pub struct CustomerPayload {
    #[validate(length(min = 1, max = 64))]
    pub id: String,
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    pub vat_number: String,
    pub address: String,
    pub region: String,
    pub payment_terms: String,
    pub row_index: Option<u32>,
}

impl CustomerPayload {
    fn into_customer(self) -> Customer {
        Customer {
            id: self.id,
            name: self.name,
            email: self.email,
            vat_number: self.vat_number,
            address: self.address,
            region: self.region,
            payment_terms: self.payment_terms,
            row_index: self.row_index,
        }
    }
}

/// List customers with pagination and optional free-text search
async fn list_customers(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, ServiceError> {
    let req = params.into_request(state.config.default_page_size);
    let page = state.store.list_customers(&req).await?;
    Ok(success_response(page))
}

async fn create_customer(
    State(state): State<AppState>,
    Json(payload): Json<CustomerPayload>,
) -> Result<impl IntoResponse, ServiceError> {
    validate_input(&payload)?;
    let customer = payload.into_customer();
    state.store.create_customer(&customer).await?;
    info!(id = %customer.id, "Customer created");
    Ok(created_response(serde_json::json!({
        "id": customer.id,
        "message": "Customer created successfully"
    })))
}

async fn update_customer(
    State(state): State<AppState>,
    Json(payload): Json<CustomerPayload>,
) -> Result<impl IntoResponse, ServiceError> {
    validate_input(&payload)?;
    let customer = payload.into_customer();
    state.store.update_customer(&customer).await?;
    info!(id = %customer.id, row = ?customer.row_index, "Customer updated");
    Ok(success_response(serde_json::json!({
        "message": "Customer updated successfully"
    })))
}

pub fn customer_routes() -> Router<AppState> {
    Router::new().route(
        "/",
        get(list_customers).post(create_customer).put(update_customer),
    )
}
