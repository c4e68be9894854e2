//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::config::Config;
use std::sync::Arc;
use stress_analysis_core::ports::{AnalysisStore, CompletionService, IdentityService};

/// The shared application state, created once at startup and passed to all handlers.
///
/// There is deliberately no per-request or per-process mutable state here:
/// each request is handled as one linear pass through the pipeline, and the
/// store is the single source of truth for rate-limit counting.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn AnalysisStore>,
    pub identity: Arc<dyn IdentityService>,
    pub completion: Arc<dyn CompletionService>,
    pub config: Arc<Config>,
}
