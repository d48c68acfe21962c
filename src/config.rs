use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;
use std::path::Path;
use thiserror::Error;
use tracing::{error, info};
use validator::Validate;

/// Default values for configuration
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_ENV: &str = "development";
const DEFAULT_PORT: u16 = 8080;
const CONFIG_DIR: &str = "config";
const DEFAULT_SHEETS_BASE_URL: &str = "https://sheets.googleapis.com";
const DEFAULT_AI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_AI_TEXT_MODEL: &str = "gemini-3-flash-preview";
const DEFAULT_AI_REASONING_MODEL: &str = "gemini-3-pro-preview";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;
const DEFAULT_PAGE_SIZE: u32 = 20;

/// Application configuration structure with validation
#[derive(Clone, Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Identifier of the backing spreadsheet (the "database")
    #[validate(length(min = 1))]
    pub spreadsheet_id: String,

    /// Base URL of the spreadsheet values API
    #[serde(default = "default_sheets_base_url")]
    pub sheets_base_url: String,

    /// Base URL of the generative-AI API
    #[serde(default = "default_ai_base_url")]
    pub ai_base_url: String,

    /// API key for the generative-AI collaborator; absent means the analysis
    /// endpoints always serve the locally computed fallback
    #[serde(default)]
    pub ai_api_key: Option<String>,

    /// Model used for structured analysis and drafting
    #[serde(default = "default_ai_text_model")]
    pub ai_text_model: String,

    /// Model used for web-grounded supplier scouting
    #[serde(default = "default_ai_reasoning_model")]
    pub ai_reasoning_model: String,

    /// Timeout applied to outbound HTTP calls (seconds)
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,

    /// Page size handed to list endpoints that do not specify one
    #[serde(default = "default_page_size")]
    pub default_page_size: u32,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Application environment
    #[serde(default = "default_environment")]
    pub environment: String,

    /// Logging level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Log in JSON format (structured logging)
    #[serde(default)]
    pub log_json: bool,

    /// CORS: comma-separated list of allowed origins (production)
    #[serde(default)]
    pub cors_allowed_origins: Option<String>,

    /// Allow permissive CORS fallback outside development
    #[serde(default)]
    pub cors_allow_any_origin: bool,
}

fn default_sheets_base_url() -> String {
    DEFAULT_SHEETS_BASE_URL.to_string()
}
fn default_ai_base_url() -> String {
    DEFAULT_AI_BASE_URL.to_string()
}
fn default_ai_text_model() -> String {
    DEFAULT_AI_TEXT_MODEL.to_string()
}
fn default_ai_reasoning_model() -> String {
    DEFAULT_AI_REASONING_MODEL.to_string()
}
fn default_http_timeout_secs() -> u64 {
    DEFAULT_HTTP_TIMEOUT_SECS
}
fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}
fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_environment() -> String {
    DEFAULT_ENV.to_string()
}
fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

impl AppConfig {
    pub fn log_level(&self) -> &str {
        &self.log_level
    }

    pub fn is_development(&self) -> bool {
        self.environment.eq_ignore_ascii_case("development")
            || self.environment.eq_ignore_ascii_case("dev")
    }

    /// Permissive CORS is only acceptable in development or when explicitly
    /// overridden.
    pub fn should_allow_permissive_cors(&self) -> bool {
        self.is_development() || self.cors_allow_any_origin
    }
}

#[derive(Debug, Error)]
pub enum AppConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] ConfigError),
    #[error("configuration validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

/// Initializes tracing using the provided log level as the default filter
pub fn init_tracing(level: &str, json: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_directive = format!("procura_api={},tower_http=debug", level);
    let filter_directive = env::var("RUST_LOG")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(default_directive);

    if json {
        let _ = fmt().with_env_filter(filter_directive).json().try_init();
    } else {
        let _ = fmt().with_env_filter(filter_directive).try_init();
    }
}

/// Loads application configuration
///
/// Layers configuration sources in this order:
/// 1. Default config (config/default.toml)
/// 2. Environment-specific config (config/{env}.toml)
/// 3. Environment variables (APP__*)
pub fn load_config() -> Result<AppConfig, AppConfigError> {
    let run_env = env::var("RUN_ENV")
        .or_else(|_| env::var("APP_ENV"))
        .unwrap_or_else(|_| DEFAULT_ENV.to_string());
    info!("Loading configuration for environment: {}", run_env);

    if !Path::new(CONFIG_DIR).exists() {
        info!(
            "Config directory '{}' not found; relying on built-in defaults and environment variables",
            CONFIG_DIR
        );
    }

    let config = Config::builder()
        .set_default("environment", DEFAULT_ENV)?
        .set_default("log_level", DEFAULT_LOG_LEVEL)?
        .set_default("log_json", false)?
        .add_source(File::with_name(&format!("{}/default", CONFIG_DIR)).required(false))
        .add_source(File::with_name(&format!("{}/{}", CONFIG_DIR, run_env)).required(false))
        .add_source(Environment::with_prefix("APP").separator("__"))
        .build()?;

    // Check for the spreadsheet id before deserialization to give a clear
    // error message; there is no sane default for it.
    if config.get_string("spreadsheet_id").is_err() {
        error!("Spreadsheet id is not configured. Set APP__SPREADSHEET_ID or add spreadsheet_id to config/{}.toml.", run_env);
        return Err(AppConfigError::Load(ConfigError::NotFound(
            "spreadsheet_id is required but not configured".into(),
        )));
    }

    let app_config: AppConfig = config.try_deserialize()?;

    app_config.validate().map_err(|e| {
        error!("Configuration validation failed: {:?}", e);
        AppConfigError::Validation(e)
    })?;

    info!("Configuration loaded successfully");
    Ok(app_config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> AppConfig {
        AppConfig {
            spreadsheet_id: "sheet-123".into(),
            sheets_base_url: default_sheets_base_url(),
            ai_base_url: default_ai_base_url(),
            ai_api_key: None,
            ai_text_model: default_ai_text_model(),
            ai_reasoning_model: default_ai_reasoning_model(),
            http_timeout_secs: default_http_timeout_secs(),
            default_page_size: default_page_size(),
            host: default_host(),
            port: default_port(),
            environment: "production".into(),
            log_level: default_log_level(),
            log_json: false,
            cors_allowed_origins: None,
            cors_allow_any_origin: false,
        }
    }

    #[test]
    fn production_requires_explicit_cors() {
        let cfg = base_config();
        assert!(!cfg.should_allow_permissive_cors());
    }

    #[test]
    fn development_allows_permissive_cors() {
        let mut cfg = base_config();
        cfg.environment = "development".into();
        assert!(cfg.should_allow_permissive_cors());
    }

    #[test]
    fn override_flag_allows_permissive_cors() {
        let mut cfg = base_config();
        cfg.cors_allow_any_origin = true;
        assert!(cfg.should_allow_permissive_cors());
    }

    #[test]
    fn empty_spreadsheet_id_fails_validation() {
        let mut cfg = base_config();
        cfg.spreadsheet_id = String::new();
        assert!(cfg.validate().is_err());
    }
}
