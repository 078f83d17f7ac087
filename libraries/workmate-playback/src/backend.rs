//! Playback backend abstraction
//!
//! The engine never plays media itself. It cues video ids on a backend (an
//! embedded web player, a simulated clock in the terminal app, a recording
//! fake in tests) and reacts to the lifecycle events the backend reports.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Platform playback backend
///
/// Calls are fire-and-forget: results come back as [`BackendEvent`]s through
/// whatever channel the platform wires into [`crate::Player::run`].
pub trait PlaybackBackend: Send {
    /// Load a video without starting it
    fn cue(&mut self, video_id: &str);

    /// Start or resume playback of the loaded video
    fn play(&mut self);

    /// Pause playback
    fn pause(&mut self);

    /// Jump to a position in the loaded video
    fn seek_to(&mut self, position: Duration);

    /// Mute audio output
    fn mute(&mut self);

    /// Unmute audio output
    fn unmute(&mut self);

    /// Current play position
    fn current_time(&self) -> Duration;

    /// Duration of the loaded video (zero if unknown)
    fn duration(&self) -> Duration;

    /// Metadata of the loaded video, once known
    fn metadata(&self) -> Option<VideoMetadata>;

    /// Unload everything and hide the player
    fn clear(&mut self);
}

/// Metadata reported by the backend for the loaded video
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoMetadata {
    /// Video id the metadata belongs to
    pub video_id: String,

    /// Human readable title
    pub title: String,
}

/// Backend lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BackendState {
    /// Backend instance finished its first load
    Ready,

    /// Video can't be played
    Error,

    /// Video played to the end
    Ended,

    /// Video loaded, not playing
    Cued,

    /// Video playing
    Playing,

    /// Video paused
    Paused,
}

/// Lifecycle event for one loaded video
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendEvent {
    /// Video the event refers to
    pub video_id: String,

    /// New state
    pub state: BackendState,
}

impl BackendEvent {
    /// Create an event
    pub fn new(video_id: impl Into<String>, state: BackendState) -> Self {
        Self {
            video_id: video_id.into(),
            state,
        }
    }
}

/// Backend that records every call, for unit tests
#[cfg(test)]
pub(crate) mod recording {
    use super::{PlaybackBackend, VideoMetadata};
    use std::collections::HashMap;
    use std::time::Duration;

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub(crate) enum Call {
        Cue(String),
        Play,
        Pause,
        Seek(Duration),
        Mute,
        Unmute,
        Clear,
    }

    #[derive(Debug, Default)]
    pub(crate) struct RecordingBackend {
        pub calls: Vec<Call>,
        pub loaded: Option<String>,
        pub titles: HashMap<String, String>,
        pub position: Duration,
        pub length: Duration,
    }

    impl RecordingBackend {
        pub fn cued(&self) -> Vec<&str> {
            self.calls
                .iter()
                .filter_map(|call| match call {
                    Call::Cue(id) => Some(id.as_str()),
                    _ => None,
                })
                .collect()
        }

        pub fn last_call(&self) -> Option<&Call> {
            self.calls.last()
        }
    }

    impl PlaybackBackend for RecordingBackend {
        fn cue(&mut self, video_id: &str) {
            self.loaded = Some(video_id.to_string());
            self.calls.push(Call::Cue(video_id.to_string()));
        }

        fn play(&mut self) {
            self.calls.push(Call::Play);
        }

        fn pause(&mut self) {
            self.calls.push(Call::Pause);
        }

        fn seek_to(&mut self, position: Duration) {
            self.position = position;
            self.calls.push(Call::Seek(position));
        }

        fn mute(&mut self) {
            self.calls.push(Call::Mute);
        }

        fn unmute(&mut self) {
            self.calls.push(Call::Unmute);
        }

        fn current_time(&self) -> Duration {
            self.position
        }

        fn duration(&self) -> Duration {
            self.length
        }

        fn metadata(&self) -> Option<VideoMetadata> {
            let video_id = self.loaded.clone()?;
            let title = self.titles.get(&video_id)?.clone();
            Some(VideoMetadata { video_id, title })
        }

        fn clear(&mut self) {
            self.loaded = None;
            self.calls.push(Call::Clear);
        }
    }
}
