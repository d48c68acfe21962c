//! Session credential handoff. The OAuth dance itself happens in an external
//! sign-in flow; this module only receives the resulting bearer token and
//! tracks its lifecycle.

pub mod session;

pub use session::{AccessToken, CredentialPhase, SessionContext};

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tracing::info;
use validator::Validate;

use crate::errors::ServiceError;

#[derive(Debug, Deserialize, Validate)]
pub struct TokenHandoffRequest {
    #[validate(length(min = 1))]
    pub access_token: String,
    /// Remaining token lifetime in seconds, when the sign-in flow knows it.
    pub expires_in_secs: Option<i64>,
}

/// Installs the credential obtained by the external sign-in flow.
async fn put_token(
    State(session): State<SessionContext>,
    Json(payload): Json<TokenHandoffRequest>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    payload.validate()?;
    session.activate(
        AccessToken::new(payload.access_token),
        payload.expires_in_secs,
    );
    info!("Access credential installed");
    Ok(Json(json!({ "state": session.phase().to_string() })))
}

async fn delete_token(
    State(session): State<SessionContext>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    session.clear();
    info!("Access credential cleared");
    Ok(Json(json!({ "state": session.phase().to_string() })))
}

async fn token_state(State(session): State<SessionContext>) -> Json<serde_json::Value> {
    Json(json!({ "state": session.phase().to_string() }))
}

pub fn auth_routes() -> Router<SessionContext> {
    Router::new()
        .route("/token", post(put_token).delete(delete_token))
        .route("/state", get(token_state))
}
