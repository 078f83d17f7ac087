/// Core error types for Workmate
use thiserror::Error;

/// Result type alias using `CoreError`
pub type Result<T> = std::result::Result<T, CoreError>;

/// Core error type for Workmate
///
/// Every variant is recoverable: callers surface it as an inline message and
/// leave local state as it was before the failing call.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Empty or unparseable track locator
    #[error("Invalid track locator: {0}")]
    InvalidLocator(String),

    /// Track not found
    #[error("Track not found: {0}")]
    TrackNotFound(String),

    /// Playlist not found (stale or unknown object id)
    #[error("Playlist not found: {0}")]
    PlaylistNotFound(String),

    /// The persistence service could not be reached
    #[error("Network error: {0}")]
    Network(String),

    /// The persistence service answered with an error
    #[error("Request rejected ({status}): {message}")]
    Rejected {
        /// HTTP status (or equivalent RPC code)
        status: u16,
        /// Error text from the service
        message: String,
    },

    /// Session is missing or expired
    #[error("Session expired")]
    SessionExpired,

    /// Serialization errors
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

impl CoreError {
    /// Create an invalid locator error
    pub fn invalid_locator(locator: impl Into<String>) -> Self {
        Self::InvalidLocator(locator.into())
    }

    /// Create a network error
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    /// Whether the failure came from a stale id rather than transport
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::TrackNotFound(_) | Self::PlaylistNotFound(_))
    }
}
