//! Main Workmate client.

use crate::auth::AuthClient;
use crate::error::{ClientError, Result};
use crate::playlist::PlaylistClient;
use crate::types::ServerConfig;
use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use url::Url;
use workmate_core::{
    MutateRequest, PersistenceGateway, PlaylistDocument, SessionInfo, SessionService,
    SessionTimeLeft,
};

/// Client for the Workmate playlist and session API.
///
/// The session is carried in a cookie, so one client instance must be used
/// for login and every call after it.
///
/// # Example
///
/// ```ignore
/// use workmate_client::{ServerConfig, WorkmateClient};
///
/// let client = WorkmateClient::new(ServerConfig::new("https://workmate.example.com"))?;
/// client.login("user", "password").await?;
///
/// let session = client.auth().session().await?;
/// if let Some(id) = session.playlist() {
///     let playlist = client.playlists().fetch(id).await?;
///     println!("{} tracks", playlist.tracks.len());
/// }
/// ```
pub struct WorkmateClient {
    http: Client,
    base_url: String,
    username: Arc<RwLock<Option<String>>>,
}

impl WorkmateClient {
    /// Create a new client with the given configuration.
    pub fn new(config: ServerConfig) -> Result<Self> {
        if config.url.is_empty() {
            return Err(ClientError::InvalidUrl("URL cannot be empty".into()));
        }

        let base_url = config.url.trim_end_matches('/').to_string();
        let parsed = Url::parse(&base_url).map_err(|e| ClientError::InvalidUrl(e.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ClientError::InvalidUrl(
                "URL must start with http:// or https://".into(),
            ));
        }

        let http = Client::builder()
            .cookie_store(true)
            .timeout(config.timeout)
            .connect_timeout(Duration::from_secs(10))
            .user_agent(format!("Workmate/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ClientError::Request)?;

        debug!(url = %base_url, timeout = ?config.timeout, "Created Workmate client");

        Ok(Self {
            http,
            base_url,
            username: Arc::new(RwLock::new(None)),
        })
    }

    /// Server base URL, without a trailing slash.
    pub fn url(&self) -> &str {
        &self.base_url
    }

    /// Username of the last successful login, if any.
    pub async fn username(&self) -> Option<String> {
        self.username.read().await.clone()
    }

    /// Session endpoints.
    pub fn auth(&self) -> AuthClient<'_> {
        AuthClient::new(&self.http, &self.base_url)
    }

    /// Playlist endpoints.
    pub fn playlists(&self) -> PlaylistClient<'_> {
        PlaylistClient::new(&self.http, &self.base_url)
    }

    /// Login and keep the session cookie for subsequent requests.
    pub async fn login(&self, username: &str, password: &str) -> Result<()> {
        self.auth().login(username, password).await?;
        *self.username.write().await = Some(username.to_string());
        Ok(())
    }
}

#[async_trait]
impl PersistenceGateway for WorkmateClient {
    async fn mutate(&self, request: MutateRequest) -> workmate_core::Result<PlaylistDocument> {
        self.playlists().mutate(&request).await.map_err(|e| {
            warn!(playlist_id = %request.id, mode = ?request.mode, error = %e, "Playlist mutation failed");
            e.into()
        })
    }

    async fn fetch(&self, playlist_id: &str) -> workmate_core::Result<PlaylistDocument> {
        self.playlists().fetch(playlist_id).await.map_err(|e| {
            warn!(playlist_id = %playlist_id, error = %e, "Playlist fetch failed");
            e.into()
        })
    }
}

#[async_trait]
impl SessionService for WorkmateClient {
    async fn session(&self) -> workmate_core::Result<SessionInfo> {
        Ok(self.auth().session().await?)
    }

    async fn time_left(&self) -> workmate_core::Result<SessionTimeLeft> {
        Ok(self.auth().time_left().await?)
    }

    async fn logout(&self) -> workmate_core::Result<()> {
        self.auth().logout().await?;
        *self.username.write().await = None;
        info!("Session closed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_validation() {
        assert!(WorkmateClient::new(ServerConfig::new("")).is_err());
        assert!(WorkmateClient::new(ServerConfig::new("not-a-url")).is_err());
        assert!(WorkmateClient::new(ServerConfig::new("ftp://example.com")).is_err());
        assert!(WorkmateClient::new(ServerConfig::new("http://localhost:3000")).is_ok());
        assert!(WorkmateClient::new(ServerConfig::new("https://workmate.example.com")).is_ok());
    }

    #[test]
    fn test_url_normalization() {
        let client = WorkmateClient::new(ServerConfig::new("https://workmate.example.com/"))
            .expect("valid url");
        assert_eq!(client.url(), "https://workmate.example.com");
    }
}
