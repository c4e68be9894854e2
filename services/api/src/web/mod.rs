pub mod middleware;
pub mod rate_limit;
pub mod rest;
pub mod state;

// Re-export the handlers and middleware to make them easily accessible
// to the binary that builds the web server router.
pub use middleware::require_auth;
pub use rest::{analyze_handler, analyze_upload_handler, list_analyses_handler};
