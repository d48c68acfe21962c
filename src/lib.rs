//! Procura API Library
//!
//! This crate provides the core functionality for the procurement dashboard
//! backend: the spreadsheet-backed datastore, the MRP shortage engine, the
//! generic paging controller, and the HTTP surface over them.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

// Core modules
pub mod auth;
pub mod config;
pub mod entities;
pub mod errors;
pub mod handlers;
pub mod paging;
pub mod services;
pub mod sheets;

use axum::{routing::get, Router};
use std::sync::Arc;

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub config: config::AppConfig,
    pub session: auth::SessionContext,
    pub store: Arc<services::datastore::SpreadsheetDataStore>,
    pub mrp: Arc<services::mrp::MrpService>,
    pub analysis: Arc<services::analysis::AnalysisService>,
    pub procurement: Arc<services::procurement::ProcurementService>,
}

/// Builds the full application state from configuration. The live backend
/// and AI client are constructed here; tests assemble their own state with
/// substituted backends.
pub fn build_state(cfg: config::AppConfig) -> Result<AppState, errors::ServiceError> {
    use std::time::Duration;

    let timeout = Duration::from_secs(cfg.http_timeout_secs);
    let session = auth::SessionContext::new();

    let live = Arc::new(sheets::HttpSheetsBackend::new(
        cfg.sheets_base_url.clone(),
        timeout,
    )?);
    let seed = Arc::new(sheets::SeedBackend::with_demo_data());
    let store = Arc::new(services::datastore::SpreadsheetDataStore::new(
        live,
        seed,
        session.clone(),
        cfg.spreadsheet_id.clone(),
    ));

    let mrp = Arc::new(services::mrp::MrpService::new(store.clone()));
    let analysis = Arc::new(services::analysis::AnalysisService::new(
        cfg.ai_base_url.clone(),
        cfg.ai_api_key.clone(),
        cfg.ai_text_model.clone(),
        cfg.ai_reasoning_model.clone(),
        timeout,
    )?);
    let procurement = Arc::new(services::procurement::ProcurementService::new());

    Ok(AppState {
        config: cfg,
        session,
        store,
        mrp,
        analysis,
        procurement,
    })
}

// Enhanced API routes function
pub fn api_v1_routes() -> Router<AppState> {
    Router::new()
        // Status and health endpoints
        .route("/status", get(handlers::health::api_status))
        .route("/health", get(handlers::health::health_check))
        // Master data
        .nest("/items", handlers::items::item_routes())
        .nest("/suppliers", handlers::suppliers::supplier_routes())
        .nest("/customers", handlers::customers::customer_routes())
        // Planning
        .nest("/mrp", handlers::mrp::mrp_routes())
        // AI analysis
        .nest("/analysis", handlers::analysis::analysis_routes())
        // Procurement
        .nest("/purchase-orders", handlers::procurement::purchase_order_routes())
        .nest("/logistics", handlers::procurement::logistics_routes())
        .nest("/profile", handlers::procurement::profile_routes())
}
