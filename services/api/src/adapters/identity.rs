//! services/api/src/adapters/identity.rs
//!
//! This module contains the adapter for the external identity service.
//! It implements the `IdentityService` port from the `core` crate by
//! exchanging a caller's bearer token for the claims it carries.

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use stress_analysis_core::domain::AuthenticatedUser;
use stress_analysis_core::ports::{IdentityService, PortError, PortResult};

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that validates bearer tokens against an external identity
/// endpoint (`GET {base_url}/auth/v1/user`).
///
/// The anon key is a restricted credential sent alongside every lookup; it
/// grants nothing beyond the right to ask "whose token is this".
#[derive(Clone)]
pub struct IdentityAdapter {
    client: reqwest::Client,
    base_url: String,
    anon_key: String,
}

impl IdentityAdapter {
    /// Creates a new `IdentityAdapter`.
    pub fn new(client: reqwest::Client, base_url: String, anon_key: String) -> Self {
        Self {
            client,
            base_url,
            anon_key,
        }
    }
}

//=========================================================================================
// `IdentityService` Trait Implementation
//=========================================================================================

#[async_trait]
impl IdentityService for IdentityAdapter {
    async fn resolve_user(&self, bearer_token: &str) -> PortResult<AuthenticatedUser> {
        let url = format!("{}/auth/v1/user", self.base_url.trim_end_matches('/'));

        let response = self
            .client
            .get(&url)
            .bearer_auth(bearer_token)
            .header("apikey", &self.anon_key)
            .send()
            .await
            .map_err(|e| PortError::Unexpected(format!("identity service unreachable: {e}")))?;

        if !response.status().is_success() {
            debug!("identity service rejected token: {}", response.status());
            return Err(PortError::Unauthorized);
        }

        let claims: Value = response
            .json()
            .await
            .map_err(|_| PortError::Unauthorized)?;

        let subject = claims
            .get("id")
            .and_then(Value::as_str)
            .filter(|id| !id.is_empty())
            .ok_or(PortError::Unauthorized)?;

        Ok(AuthenticatedUser {
            user_id: subject.to_string(),
        })
    }
}
