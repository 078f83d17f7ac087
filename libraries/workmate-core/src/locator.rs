//! Track locator parsing
//!
//! A locator is the URL a user pastes in. The playback backend only
//! understands the 11-character video id buried inside it.

use crate::error::{CoreError, Result};
use url::Url;

/// Length of a backend video id
pub const VIDEO_ID_LEN: usize = 11;

/// Extract the video id from a locator
///
/// Accepts `watch?v=`, `youtu.be/`, `/embed/`, `/v/` and `/shorts/` forms.
/// Returns a slice of `url` so no allocation happens on the hot path.
pub fn extract_video_id(url: &str) -> Option<&str> {
    let trimmed = url.trim();
    let parsed = Url::parse(trimmed).ok()?;
    let host = parsed.host_str()?;
    let host = host.strip_prefix("www.").unwrap_or(host);

    let candidate = match host {
        "youtu.be" => parsed.path_segments()?.next()?.to_string(),
        "youtube.com" | "m.youtube.com" | "music.youtube.com" | "youtube-nocookie.com" => {
            let mut segments = parsed.path_segments()?;
            match segments.next()? {
                "watch" => parsed
                    .query_pairs()
                    .find(|(key, _)| key == "v")
                    .map(|(_, value)| value.into_owned())?,
                "embed" | "v" | "shorts" | "live" => segments.next()?.to_string(),
                _ => return None,
            }
        }
        _ => return None,
    };

    if !is_video_id(&candidate) {
        return None;
    }

    // Hand back a borrow of the caller's string.
    trimmed
        .find(candidate.as_str())
        .map(|start| &trimmed[start..start + VIDEO_ID_LEN])
}

/// Like [`extract_video_id`], but reports a validation error
pub fn require_video_id(url: &str) -> Result<&str> {
    if url.trim().is_empty() {
        return Err(CoreError::invalid_locator("empty locator"));
    }
    extract_video_id(url).ok_or_else(|| CoreError::invalid_locator(url))
}

fn is_video_id(candidate: &str) -> bool {
    candidate.len() == VIDEO_ID_LEN
        && candidate
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}
