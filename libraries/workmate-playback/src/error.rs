//! Error types for the playback engine

use thiserror::Error;
use workmate_core::CoreError;

/// Playback errors
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// The backend reported the video as unplayable
    #[error("Video unavailable: {0}")]
    VideoUnavailable(String),

    /// No track is currently loaded
    #[error("No track loaded")]
    NoTrackLoaded,

    /// Queue is empty
    #[error("Queue is empty")]
    QueueEmpty,

    /// Operation not allowed on the one-shot special track
    #[error("Special tracks are not part of the playlist")]
    EphemeralTrack,

    /// Another gateway-backed action has not resolved yet
    #[error("Another action is still pending")]
    ActionPending,

    /// Persistence or session service failure
    #[error(transparent)]
    Gateway(#[from] CoreError),
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
