//! Session domain model
//!
//! A session is the persisted login state: the Service Manager URL, the
//! logged user and the opaque token sent on every request.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

/// Persisted login state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Base URL of the Service Manager
    pub url: String,

    /// Authenticated user
    pub user: String,

    /// Basic auth token (`base64(user:password)`)
    pub token: String,
}

impl SessionConfig {
    pub fn new(url: impl Into<String>, user: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            user: user.into(),
            token: token.into(),
        }
    }

    /// Builds a session for `user`, encoding the password into a basic auth token
    pub fn with_basic_auth(url: impl Into<String>, user: &str, password: &str) -> Self {
        Self::new(url, user, basic_token(user, password))
    }

    /// Returns true if every field is populated
    pub fn is_complete(&self) -> bool {
        !self.url.is_empty() && !self.user.is_empty() && !self.token.is_empty()
    }
}

/// Encodes `user:password` as a basic auth token
pub fn basic_token(user: &str, password: &str) -> String {
    STANDARD.encode(format!("{}:{}", user, password))
}
