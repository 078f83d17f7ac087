/// Track domain type
use serde::{Deserialize, Serialize};
use std::fmt;

/// Track identifier
///
/// Stable for a session and unique within one queue, even when two tracks
/// share the same locator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackId(String);

impl TrackId {
    /// Create a track ID from an existing string
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the inner string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for TrackId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for TrackId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// One playable item of a queue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    /// Unique track identifier
    pub id: TrackId,

    /// Source locator (the video URL)
    pub url: String,

    /// Title reported by the playback backend, once known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl Track {
    /// Create a track with no title yet
    pub fn new(id: impl Into<TrackId>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            url: url.into(),
            title: None,
        }
    }

    /// Builder-style title setter
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// The backend video id this track points at, if the locator parses
    pub fn video_id(&self) -> Option<&str> {
        crate::locator::extract_video_id(&self.url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn track_serializes_without_missing_title() {
        let track = Track::new("dQw4w9WgXcQ-1", "https://youtu.be/dQw4w9WgXcQ");
        let json = serde_json::to_value(&track).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"id": "dQw4w9WgXcQ-1", "url": "https://youtu.be/dQw4w9WgXcQ"})
        );
    }

    #[test]
    fn track_deserializes_with_title() {
        let track: Track = serde_json::from_str(
            r#"{"id":"a-1","url":"https://www.youtube.com/watch?v=dQw4w9WgXcQ","title":"Song"}"#,
        )
        .unwrap();
        assert_eq!(track.id.as_str(), "a-1");
        assert_eq!(track.title.as_deref(), Some("Song"));
        assert_eq!(track.video_id(), Some("dQw4w9WgXcQ"));
    }
}
