//! crates/stress_analysis_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of specific external implementations like databases or APIs.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{AnalysisRecord, AnalysisReport, AnalysisRequest, AuthenticatedUser};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., database, network).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Unauthorized")]
    Unauthorized,
    /// The AI gateway answered 429.
    #[error("Upstream rate limit exceeded")]
    RateLimited,
    /// The AI gateway answered 402.
    #[error("Upstream credits exhausted")]
    CreditsExhausted,
    /// The AI gateway answered with any other non-success status.
    #[error("Upstream service unavailable: {0}")]
    Unavailable(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait AnalysisStore: Send + Sync {
    /// Inserts one analysis row and returns it exactly as stored.
    async fn insert_analysis(
        &self,
        user: &AuthenticatedUser,
        request: &AnalysisRequest,
        report: &AnalysisReport,
    ) -> PortResult<AnalysisRecord>;

    /// Counts the user's analyses created at or after `since`.
    /// This is the sole input to rate limiting; there is no in-process counter.
    async fn count_since(&self, user_id: &str, since: DateTime<Utc>) -> PortResult<i64>;

    /// Returns the user's most recent analyses, newest first.
    async fn list_for_user(&self, user_id: &str, limit: i64) -> PortResult<Vec<AnalysisRecord>>;
}

#[async_trait]
pub trait IdentityService: Send + Sync {
    /// Exchanges a bearer token with the external identity service for the
    /// subject it belongs to. Any failure (rejection, unparseable claims,
    /// missing subject) maps to `PortError::Unauthorized`.
    async fn resolve_user(&self, bearer_token: &str) -> PortResult<AuthenticatedUser>;
}

#[async_trait]
pub trait CompletionService: Send + Sync {
    /// Performs the single round trip to the external analysis model and
    /// returns the raw completion text. No retries, no streaming.
    async fn request_analysis(
        &self,
        student_name: &str,
        file_name: &str,
        document_content: &str,
    ) -> PortResult<String>;
}
