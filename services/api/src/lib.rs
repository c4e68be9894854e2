//! services/api/src/lib.rs
//!
//! Library surface of the `api` service, shared by the `api` and `openapi`
//! binaries and by the integration tests.

pub mod adapters;
pub mod config;
pub mod error;
pub mod web;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderName, Method},
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::web::state::AppState;

/// Builds the API router with the auth middleware and the permissive CORS
/// layer. Kept separate from `main` so tests can drive the router with
/// in-memory port implementations.
pub fn build_router(app_state: Arc<AppState>) -> Router {
    // The allowed-header list mirrors what the browser client sends. With a
    // wildcard origin, OPTIONS preflights are answered with an empty body.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            HeaderName::from_static("apikey"),
            HeaderName::from_static("x-client-info"),
        ]);

    let protected_routes = Router::new()
        .route("/analyze", post(web::analyze_handler))
        .route("/analyze/upload", post(web::analyze_upload_handler))
        .route("/analyses", get(web::list_analyses_handler))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            web::require_auth,
        ));

    Router::new()
        .merge(protected_routes)
        .layer(DefaultBodyLimit::max(10 * 1024 * 1024))
        .layer(cors)
        .with_state(app_state)
}
