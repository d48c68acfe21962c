use crate::AppState;
use axum::{extract::State, response::Json};
use serde_json::{json, Value};

pub async fn api_status() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");
    Json(json!({
        "status": "ok",
        "version": version,
        "service": "procura-api",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "environment": std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
    }))
}

/// Liveness plus a report of which backend reads are currently served from.
pub async fn health_check(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "checks": {
            "store_mode": state.store.mode().to_string(),
            "credential": state.session.phase().to_string(),
        },
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
