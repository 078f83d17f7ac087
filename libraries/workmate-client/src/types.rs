//! Types for Workmate API requests and responses.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for connecting to a Workmate server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Base URL of the server (e.g., "https://workmate.example.com")
    pub url: String,
    /// Per-request timeout
    pub timeout: Duration,
}

impl ServerConfig {
    /// Create a new server config with the default timeout.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Builder-style timeout setter.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

// =============================================================================
// Authentication Types
// =============================================================================

/// Request body for the login endpoint.
#[derive(Debug, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Response from a successful login or logout.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct SuccessResponse {
    #[serde(default)]
    pub success: bool,
}
