//! HTTP surface smoke tests against an offline (seed-backed) application
//! state: list envelopes, write failures without credentials, and the MRP
//! endpoint.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use procura_api::auth::SessionContext;
use procura_api::config::AppConfig;
use procura_api::services::analysis::AnalysisService;
use procura_api::services::datastore::SpreadsheetDataStore;
use procura_api::services::mrp::MrpService;
use procura_api::services::procurement::ProcurementService;
use procura_api::sheets::{HttpSheetsBackend, SeedBackend};
use procura_api::AppState;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

fn test_config() -> AppConfig {
    AppConfig {
        spreadsheet_id: "sheet-smoke".into(),
        sheets_base_url: "http://127.0.0.1:1".into(),
        ai_base_url: "http://127.0.0.1:1".into(),
        ai_api_key: None,
        ai_text_model: "text-model".into(),
        ai_reasoning_model: "reasoning-model".into(),
        http_timeout_secs: 1,
        default_page_size: 20,
        host: "127.0.0.1".into(),
        port: 0,
        environment: "development".into(),
        log_level: "info".into(),
        log_json: false,
        cors_allowed_origins: None,
        cors_allow_any_origin: false,
    }
}

fn app() -> Router {
    let cfg = test_config();
    let session = SessionContext::new();
    let live = Arc::new(
        HttpSheetsBackend::new(cfg.sheets_base_url.clone(), Duration::from_secs(1)).unwrap(),
    );
    let store = Arc::new(SpreadsheetDataStore::new(
        live,
        Arc::new(SeedBackend::with_demo_data()),
        session.clone(),
        cfg.spreadsheet_id.clone(),
    ));
    let state = AppState {
        mrp: Arc::new(MrpService::new(store.clone())),
        analysis: Arc::new(
            AnalysisService::new(
                cfg.ai_base_url.clone(),
                None,
                cfg.ai_text_model.clone(),
                cfg.ai_reasoning_model.clone(),
                Duration::from_secs(1),
            )
            .unwrap(),
        ),
        procurement: Arc::new(ProcurementService::new()),
        store,
        session: session.clone(),
        config: cfg,
    };

    Router::new()
        .nest("/api/v1", procura_api::api_v1_routes())
        .with_state(state)
        .nest("/auth", procura_api::auth::auth_routes().with_state(session))
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, json)
}

#[tokio::test]
async fn items_list_returns_the_page_envelope() {
    let (status, body) = get_json(app(), "/api/v1/items?page=1&page_size=2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 5);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
    assert_eq!(body["data"][0]["sku"], "HYD-VAL-001");
    assert_eq!(body["data"][0]["row_index"], 2);
}

#[tokio::test]
async fn search_mode_totals_are_exact() {
    let (status, body) = get_json(app(), "/api/v1/items?search=valvola").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 1);
    assert!(body["data"][0].get("row_index").is_none());
}

#[tokio::test]
async fn unauthenticated_write_is_rejected_with_401() {
    let payload = serde_json::json!({
        "sku": "NEW-SKU-1",
        "name": "Nuovo Articolo",
        "category": "Generico",
        "stock": 10,
        "safety_stock": 5,
        "cost": "12.50",
        "supplier_id": "SUP-01",
        "lead_time_days": 7
    });
    let response = app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/items")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn update_without_row_index_is_a_bad_request() {
    let payload = serde_json::json!({
        "sku": "HYD-VAL-001",
        "name": "Valvola Controllo Flusso",
        "category": "Idraulica",
        "stock": 30,
        "safety_stock": 20,
        "cost": "150",
        "supplier_id": "SUP-01",
        "lead_time_days": 7
    });
    let response = app()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/api/v1/items")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn mrp_endpoint_serves_the_computed_plan() {
    let (status, body) = get_json(app(), "/api/v1/mrp?page=1&page_size=20").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 5);
    let shortages: Vec<_> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|r| r["is_shortage"] == true)
        .collect();
    assert_eq!(shortages.len(), 2);
    assert_eq!(shortages[0]["qty_to_order"], 8);
}

#[tokio::test]
async fn analysis_endpoint_degrades_instead_of_failing() {
    let response = app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/analysis/procurement")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert!(body["summary"].as_str().unwrap().contains("unavailable"));
    assert_eq!(body["kpis"][0]["value"], "5");
}

#[tokio::test]
async fn health_reports_store_mode_and_credential_phase() {
    let (status, body) = get_json(app(), "/api/v1/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["checks"]["store_mode"], "seed");
    assert_eq!(body["checks"]["credential"], "unset");
}

#[tokio::test]
async fn token_handoff_flips_the_store_to_live_mode() {
    let app = app();
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/auth/token")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    serde_json::json!({"access_token": "tok-live", "expires_in_secs": 3600})
                        .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let (_, body) = get_json(app, "/api/v1/health").await;
    assert_eq!(body["checks"]["store_mode"], "live");
    assert_eq!(body["checks"]["credential"], "active");
}

#[tokio::test]
async fn profile_and_purchase_orders_are_served() {
    let (status, body) = get_json(app(), "/api/v1/profile").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["vat_number"], "IT12345678901");

    let (status, body) = get_json(app(), "/api/v1/purchase-orders?search=hydraforce").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 1);
    assert_eq!(body["data"][0]["status"], "RECEIVED");
}
