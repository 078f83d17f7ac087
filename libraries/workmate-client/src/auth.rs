//! Session endpoints of the Workmate API.
//!
//! The session lives in an HTTP-only cookie, so every call relies on the
//! cookie store of the shared `reqwest::Client`.

use crate::error::{ClientError, Result};
use crate::types::{LoginRequest, SuccessResponse};
use reqwest::Client;
use tracing::{debug, info, warn};
use workmate_core::{SessionInfo, SessionTimeLeft};

/// Authentication client for the Workmate API.
pub struct AuthClient<'a> {
    http: &'a Client,
    base_url: &'a str,
}

impl<'a> AuthClient<'a> {
    pub(crate) fn new(http: &'a Client, base_url: &'a str) -> Self {
        Self { http, base_url }
    }

    /// Login with username and password.
    ///
    /// On success the server sets the session cookie.
    pub async fn login(&self, username: &str, password: &str) -> Result<()> {
        let url = format!("{}/api/auth", self.base_url);
        debug!(url = %url, username = %username, "Attempting login");

        let request = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };

        let response = self
            .http
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(ClientError::from_send)?;

        let status = response.status();

        if status.is_success() {
            info!(username = %username, "Login successful");
            Ok(())
        } else if status.as_u16() == 401 {
            let error = ClientError::from_response(response).await;
            warn!(status = %status, "Login failed: invalid credentials");
            match error {
                ClientError::AuthRequired => Err(ClientError::AuthFailed(
                    "Invalid username or password".to_string(),
                )),
                other => Err(other),
            }
        } else {
            Err(ClientError::from_response(response).await)
        }
    }

    /// Read the current session.
    ///
    /// A missing or expired cookie is not an error: the server answers with
    /// `isValid: false`.
    pub async fn session(&self) -> Result<SessionInfo> {
        let url = format!("{}/api/auth", self.base_url);
        debug!(url = %url, "Checking session");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(ClientError::from_send)?;

        if !response.status().is_success() {
            return Err(ClientError::from_response(response).await);
        }

        let session: SessionInfo = response.json().await.map_err(|e| {
            ClientError::ParseError(format!("Failed to parse session response: {}", e))
        })?;

        debug!(valid = session.is_valid, "Session checked");
        Ok(session)
    }

    /// Remaining session time.
    pub async fn time_left(&self) -> Result<SessionTimeLeft> {
        let url = format!("{}/api/logout", self.base_url);

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(ClientError::from_send)?;

        if !response.status().is_success() {
            return Err(ClientError::from_response(response).await);
        }

        response.json().await.map_err(|e| {
            ClientError::ParseError(format!("Failed to parse session time response: {}", e))
        })
    }

    /// Destroy the session.
    pub async fn logout(&self) -> Result<()> {
        let url = format!("{}/api/logout", self.base_url);
        debug!(url = %url, "Logging out");

        let response = self
            .http
            .post(&url)
            .send()
            .await
            .map_err(ClientError::from_send)?;

        if !response.status().is_success() {
            return Err(ClientError::from_response(response).await);
        }

        // Body is informational only; an empty or odd body still means success.
        let body: SuccessResponse = response.json().await.unwrap_or_default();
        info!(success = body.success, "Logged out");
        Ok(())
    }
}
