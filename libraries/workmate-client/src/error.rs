//! Error types for the Workmate client.

use serde::Deserialize;
use thiserror::Error;
use workmate_core::CoreError;

/// Errors that can occur when talking to the Workmate API.
#[derive(Error, Debug)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Server returned an error response
    #[error("Server error ({status}): {message}")]
    ServerError { status: u16, message: String },

    /// Playlist (or other resource) does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// No valid session cookie
    #[error("Authentication required")]
    AuthRequired,

    /// Login rejected
    #[error("Authentication failed: {0}")]
    AuthFailed(String),

    /// Invalid server URL
    #[error("Invalid server URL: {0}")]
    InvalidUrl(String),

    /// Failed to parse server response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Server is offline or unreachable
    #[error("Server unreachable: {0}")]
    ServerUnreachable(String),
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Error body the API sends with non-2xx responses
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

impl ClientError {
    /// Map a transport failure
    pub(crate) fn from_send(e: reqwest::Error) -> Self {
        if e.is_connect() || e.is_timeout() {
            Self::ServerUnreachable(e.to_string())
        } else {
            Self::Request(e)
        }
    }

    /// Turn a non-2xx response into an error, reading the `{ "error": ... }` body
    pub(crate) async fn from_response(response: reqwest::Response) -> Self {
        let status = response.status().as_u16();
        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&text)
            .map(|body| body.error)
            .unwrap_or(text);

        match status {
            401 => Self::AuthRequired,
            404 => Self::NotFound(message),
            _ => Self::ServerError { status, message },
        }
    }
}

impl From<ClientError> for CoreError {
    fn from(e: ClientError) -> Self {
        match e {
            ClientError::Request(e) => CoreError::network(e.to_string()),
            ClientError::ServerUnreachable(msg) => CoreError::network(msg),
            ClientError::InvalidUrl(msg) => CoreError::network(format!("invalid server URL: {msg}")),
            ClientError::ParseError(msg) => CoreError::network(format!("invalid response: {msg}")),
            ClientError::ServerError { status, message } => CoreError::Rejected { status, message },
            ClientError::NotFound(msg) => CoreError::PlaylistNotFound(msg),
            ClientError::AuthRequired => CoreError::SessionExpired,
            ClientError::AuthFailed(message) => CoreError::Rejected {
                status: 401,
                message,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_maps_to_playlist_not_found() {
        let core: CoreError = ClientError::NotFound("No matching playlist was found".into()).into();
        assert!(core.is_not_found());
    }

    #[test]
    fn server_error_keeps_status() {
        let core: CoreError = ClientError::ServerError {
            status: 500,
            message: "Internal server error".into(),
        }
        .into();
        assert!(matches!(core, CoreError::Rejected { status: 500, .. }));
    }

    #[test]
    fn missing_session_maps_to_expired() {
        let core: CoreError = ClientError::AuthRequired.into();
        assert!(matches!(core, CoreError::SessionExpired));
    }
}
