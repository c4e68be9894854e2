//! services/api/src/error.rs
//!
//! Defines the primary error type for the entire API service and its mapping
//! onto HTTP responses. Every failure a handler can produce funnels through
//! `ApiError::into_response`, which emits the uniform `{"error": ...}` body.
//! Internal detail (upstream bodies, SQL errors) only ever reaches the logs.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;
use tracing::{error, warn};

use crate::config::ConfigError;
use stress_analysis_core::ports::PortError;
use stress_analysis_core::report::ReportError;
use stress_analysis_core::validate::ValidationError;

/// The primary error type for the `api` service.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Malformed or oversized caller input.
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// The request body could not be parsed as JSON at all.
    #[error("Request body must be valid JSON")]
    MalformedBody,

    /// The caller presented no credential, or one the identity service rejected.
    #[error("Authentication required")]
    Unauthenticated,

    /// The caller hit the local analysis quota.
    #[error("Rate limit exceeded")]
    RateLimited,

    /// Represents an error that propagated up from one of the core service ports.
    #[error("Service Port Error: {0}")]
    Port(#[from] PortError),

    /// The model's completion failed parsing or schema validation.
    #[error("Analysis Error: {0}")]
    Report(#[from] ReportError),

    /// Represents an error from the underlying database library.
    #[error("Database Error: {0}")]
    Database(#[from] sqlx::Error),

    /// Represents a standard Input/Output error (e.g., binding to a network socket).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A catch-all for any other unexpected errors.
    #[error("An unexpected internal error occurred: {0}")]
    Internal(String),
}

impl ApiError {
    /// The status code and caller-facing message for this error.
    fn public_parts(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Validation(_) | ApiError::MalformedBody => (StatusCode::BAD_REQUEST, ""),
            ApiError::Unauthenticated | ApiError::Port(PortError::Unauthorized) => (
                StatusCode::UNAUTHORIZED,
                "Authentication required. Please sign in.",
            ),
            ApiError::RateLimited | ApiError::Port(PortError::RateLimited) => (
                StatusCode::TOO_MANY_REQUESTS,
                "Rate limit exceeded. Please try again later.",
            ),
            ApiError::Port(PortError::CreditsExhausted) => (
                StatusCode::PAYMENT_REQUIRED,
                "AI credits exhausted. Please add credits to continue.",
            ),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to analyze portfolio. Please try again.",
            ),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, public_message) = self.public_parts();

        // Validation messages are safe to echo verbatim; everything else gets
        // a fixed message while the detail goes to the logs.
        let message = if status == StatusCode::BAD_REQUEST {
            self.to_string()
        } else {
            public_message.to_string()
        };

        if status.is_server_error() {
            error!("request failed: {self}");
        } else if status != StatusCode::BAD_REQUEST {
            warn!("request rejected ({status}): {self}");
        }

        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_map_to_400() {
        let (status, _) = ApiError::Validation(ValidationError::MissingFileContent).public_parts();
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn auth_errors_map_to_401_with_fixed_message() {
        let (status, message) = ApiError::Unauthenticated.public_parts();
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(message, "Authentication required. Please sign in.");
    }

    #[test]
    fn local_and_upstream_rate_limits_both_map_to_429() {
        let (local, _) = ApiError::RateLimited.public_parts();
        let (upstream, _) = ApiError::Port(PortError::RateLimited).public_parts();
        assert_eq!(local, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(upstream, StatusCode::TOO_MANY_REQUESTS);
    }

    #[test]
    fn credits_exhausted_maps_to_402() {
        let (status, _) = ApiError::Port(PortError::CreditsExhausted).public_parts();
        assert_eq!(status, StatusCode::PAYMENT_REQUIRED);
    }

    #[test]
    fn report_failures_are_generic_500s() {
        let err = ApiError::Report(ReportError::Schema("stress_score out of range".into()));
        let (status, message) = err.public_parts();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!message.contains("stress_score"));
    }
}
