//! services/api/src/web/middleware.rs
//!
//! Authentication middleware for protecting routes.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::warn;

use crate::error::ApiError;
use crate::web::state::AppState;

/// Middleware that validates the bearer credential and resolves the caller's
/// identity through the external identity service.
///
/// If valid, inserts the [`AuthenticatedUser`](stress_analysis_core::domain::AuthenticatedUser)
/// into request extensions for handlers to use. If missing or rejected,
/// returns 401 before any quota is consumed or any AI call is made.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    // 1. Extract the bearer token from the Authorization header.
    let bearer_token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or(ApiError::Unauthenticated)?;

    // 2. Exchange it with the identity service for the caller's subject.
    let user = state
        .identity
        .resolve_user(bearer_token)
        .await
        .map_err(|e| {
            warn!("Failed to resolve bearer credential: {e}");
            ApiError::Unauthenticated
        })?;

    // 3. Insert the identity into request extensions.
    req.extensions_mut().insert(user);

    // 4. Continue to the handler.
    Ok(next.run(req).await)
}
