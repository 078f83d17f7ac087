/// Persisted playlist wire types
use crate::types::Track;
use serde::{Deserialize, Serialize};

/// Playlist as returned by the persistence service
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistDocument {
    /// Persistence key (absent on `fetch`, where the caller already knows it)
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub object_id: Option<String>,

    /// Playlist title
    pub title: String,

    /// Tracks in persisted order
    #[serde(default)]
    pub tracks: Vec<Track>,
}

/// Kind of mutation applied to a persisted playlist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MutateMode {
    /// Append a track
    Add,
    /// Remove a track by id
    Remove,
    /// Remove every track
    Empty,
}

/// Body of a playlist mutation call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutateRequest {
    /// Playlist object id
    pub id: String,

    /// Track concerned (absent for `Empty`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub track: Option<Track>,

    /// Mutation kind
    pub mode: MutateMode,
}

impl MutateRequest {
    /// Append `track` to playlist `id`
    pub fn add(id: impl Into<String>, track: Track) -> Self {
        Self {
            id: id.into(),
            track: Some(track),
            mode: MutateMode::Add,
        }
    }

    /// Remove `track` from playlist `id`
    pub fn remove(id: impl Into<String>, track: Track) -> Self {
        Self {
            id: id.into(),
            track: Some(track),
            mode: MutateMode::Remove,
        }
    }

    /// Empty playlist `id`
    pub fn empty(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            track: None,
            mode: MutateMode::Empty,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_request_has_no_track_field() {
        let json = serde_json::to_value(MutateRequest::empty("pl1")).unwrap();
        assert_eq!(json, serde_json::json!({"id": "pl1", "mode": "empty"}));
    }

    #[test]
    fn remove_request_carries_track() {
        let track = Track::new("abc-1", "https://youtu.be/abcdefghijk");
        let json = serde_json::to_value(MutateRequest::remove("pl1", track)).unwrap();
        assert_eq!(json["mode"], "remove");
        assert_eq!(json["track"]["id"], "abc-1");
    }

    #[test]
    fn document_parses_fetch_shape() {
        let doc: PlaylistDocument =
            serde_json::from_str(r#"{"title":"alice's Playlist","tracks":[]}"#).unwrap();
        assert_eq!(doc.title, "alice's Playlist");
        assert!(doc.object_id.is_none());
        assert!(doc.tracks.is_empty());
    }
}
