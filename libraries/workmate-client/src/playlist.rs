//! Playlist endpoints of the Workmate API.

use crate::error::{ClientError, Result};
use reqwest::Client;
use tracing::debug;
use workmate_core::{MutateRequest, PlaylistDocument};

/// Playlist client for the Workmate API.
pub struct PlaylistClient<'a> {
    http: &'a Client,
    base_url: &'a str,
}

impl<'a> PlaylistClient<'a> {
    pub(crate) fn new(http: &'a Client, base_url: &'a str) -> Self {
        Self { http, base_url }
    }

    /// Fetch a playlist by object id.
    pub async fn fetch(&self, playlist_id: &str) -> Result<PlaylistDocument> {
        let url = format!("{}/api/playlist/", self.base_url);
        debug!(url = %url, playlist_id = %playlist_id, "Fetching playlist");

        let response = self
            .http
            .get(&url)
            .query(&[("id", playlist_id)])
            .send()
            .await
            .map_err(ClientError::from_send)?;

        if !response.status().is_success() {
            return Err(ClientError::from_response(response).await);
        }

        let playlist: PlaylistDocument = response.json().await.map_err(|e| {
            ClientError::ParseError(format!("Failed to parse playlist response: {}", e))
        })?;

        debug!(
            title = %playlist.title,
            tracks = playlist.tracks.len(),
            "Fetched playlist"
        );

        Ok(playlist)
    }

    /// Apply an add / remove / empty mutation.
    ///
    /// Returns the playlist as stored after the mutation.
    pub async fn mutate(&self, request: &MutateRequest) -> Result<PlaylistDocument> {
        let url = format!("{}/api/playlist", self.base_url);
        debug!(
            url = %url,
            playlist_id = %request.id,
            mode = ?request.mode,
            track_id = request.track.as_ref().map(|t| t.id.as_str()).unwrap_or_default(),
            "Mutating playlist"
        );

        let response = self
            .http
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(ClientError::from_send)?;

        if !response.status().is_success() {
            return Err(ClientError::from_response(response).await);
        }

        let playlist: PlaylistDocument = response.json().await.map_err(|e| {
            ClientError::ParseError(format!("Failed to parse playlist response: {}", e))
        })?;

        debug!(tracks = playlist.tracks.len(), "Playlist updated");
        Ok(playlist)
    }
}
