//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::net::SocketAddr;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub database_url: String,
    pub log_level: Level,
    /// Base URL of the OpenAI-compatible AI gateway (without trailing slash).
    pub gateway_url: String,
    pub gateway_api_key: String,
    pub analysis_model: String,
    /// Base URL of the external identity service.
    pub identity_url: String,
    /// The restricted credential sent alongside caller bearer tokens; only
    /// ever used to validate them, never for privileged operations.
    pub identity_anon_key: String,
    pub rate_limit_max_requests: u32,
    pub rate_limit_window_secs: u64,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination.
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        // --- Load Server and Database Settings ---
        let bind_address_str =
            std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        let bind_address = bind_address_str
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string()))?;

        let database_url = std::env::var("DATABASE_URL")
            .map_err(|_| ConfigError::MissingVar("DATABASE_URL".to_string()))?;

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        // --- Load AI Gateway Settings ---
        let gateway_url = std::env::var("AI_GATEWAY_URL")
            .unwrap_or_else(|_| "https://ai.gateway.lovable.dev/v1".to_string());
        let gateway_api_key = std::env::var("AI_GATEWAY_API_KEY")
            .map_err(|_| ConfigError::MissingVar("AI_GATEWAY_API_KEY".to_string()))?;
        let analysis_model = std::env::var("ANALYSIS_MODEL")
            .unwrap_or_else(|_| "google/gemini-3-flash-preview".to_string());

        // --- Load Identity Service Settings ---
        let identity_url = std::env::var("IDENTITY_URL")
            .map_err(|_| ConfigError::MissingVar("IDENTITY_URL".to_string()))?;
        let identity_anon_key = std::env::var("IDENTITY_ANON_KEY")
            .map_err(|_| ConfigError::MissingVar("IDENTITY_ANON_KEY".to_string()))?;

        // --- Load Rate Limit Policy ---
        let rate_limit_max_requests = parse_var("RATE_LIMIT_MAX_REQUESTS", 10)?;
        let rate_limit_window_secs = parse_var("RATE_LIMIT_WINDOW_SECS", 3600)?;

        Ok(Self {
            bind_address,
            database_url,
            log_level,
            gateway_url,
            gateway_api_key,
            analysis_model,
            identity_url,
            identity_anon_key,
            rate_limit_max_requests,
            rate_limit_window_secs,
        })
    }
}

fn parse_var<T: std::str::FromStr>(name: &str, default: T) -> Result<T, ConfigError> {
    match std::env::var(name) {
        Ok(raw) => raw
            .parse::<T>()
            .map_err(|_| ConfigError::InvalidValue(name.to_string(), raw)),
        Err(_) => Ok(default),
    }
}
