//! Core types for the playback engine

use serde::{Deserialize, Serialize};
use std::time::Duration;
use workmate_core::TrackId;

/// What the backend is currently loaded with
///
/// Either a track of the persisted queue, or the one-shot special track that
/// lives outside it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NowPlaying {
    /// A track of the queue, resolved by id
    Queued {
        /// Queue track id
        track_id: TrackId,
    },

    /// One-shot track, never persisted
    Ephemeral {
        /// Backend video id
        video_id: String,
        /// Title, once the backend reported it
        title: Option<String>,
    },
}

impl NowPlaying {
    /// Whether this is the one-shot special track
    pub fn is_ephemeral(&self) -> bool {
        matches!(self, Self::Ephemeral { .. })
    }
}

/// Transport state shown to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Transport {
    /// No backend instance (nothing loaded, or powered off)
    #[default]
    Idle,

    /// Cued, waiting for the backend to start playing
    Loading,

    /// Currently playing
    Playing,

    /// Paused mid-track
    Paused,

    /// Last track ended with nothing after it
    Stopped,

    /// Backend reported the loaded video as unplayable
    Unavailable,
}

/// Playback engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerConfig {
    /// Grace period before an unplayable video is skipped or removed
    pub error_grace: Duration,

    /// How often the play position is polled
    pub progress_interval: Duration,

    /// One-shot track played before the queue on startup
    pub ephemeral_url: Option<String>,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            error_grace: Duration::from_millis(1700),
            progress_interval: Duration::from_secs(1),
            ephemeral_url: None,
        }
    }
}
