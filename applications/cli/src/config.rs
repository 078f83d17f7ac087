/// Terminal player configuration
use crate::error::{CliError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;
use workmate_client::ServerConfig;
use workmate_playback::PlayerConfig;

/// Config file looked up in the working directory when `--config` is absent
pub const DEFAULT_CONFIG_FILE: &str = "workmate.toml";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default = "default_server")]
    pub server: ServerSettings,

    #[serde(default)]
    pub account: AccountSettings,

    #[serde(default = "default_playback")]
    pub playback: PlaybackSettings,

    #[serde(default = "default_session")]
    pub session: SessionSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerSettings {
    #[serde(default)]
    pub url: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AccountSettings {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlaybackSettings {
    #[serde(default = "default_error_grace_ms")]
    pub error_grace_ms: u64,

    #[serde(default = "default_progress_interval_ms")]
    pub progress_interval_ms: u64,

    #[serde(default = "default_simulated_track_secs")]
    pub simulated_track_secs: u64,

    /// Video ids the simulated backend reports as unplayable
    #[serde(default)]
    pub simulated_unavailable: Vec<String>,

    pub ephemeral_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionSettings {
    #[serde(default = "default_max_age_secs")]
    pub max_age_secs: u64,
}

impl AppConfig {
    /// Load configuration from file and environment
    ///
    /// `path` overrides the default `workmate.toml`; an explicit path must
    /// exist, the default one is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                settings = settings.add_source(config::File::from(path.to_path_buf()));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        // Override with environment variables, e.g. WORKMATE_SERVER__URL
        settings = settings.add_source(
            config::Environment::with_prefix("WORKMATE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = settings
            .build()
            .map_err(|e| CliError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| CliError::Config(e.to_string()))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.url.is_empty() {
            return Err(CliError::Config(
                "Server URL is required (set WORKMATE_SERVER__URL)".to_string(),
            ));
        }

        let url = Url::parse(&self.server.url)
            .map_err(|e| CliError::Config(format!("Invalid server URL: {}", e)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(CliError::Config(
                "Server URL must start with http:// or https://".to_string(),
            ));
        }

        if self.account.username.is_some() != self.account.password.is_some() {
            return Err(CliError::Config(
                "account.username and account.password must be set together".to_string(),
            ));
        }

        if self.playback.simulated_track_secs == 0 {
            return Err(CliError::Config(
                "playback.simulated_track_secs must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }

    /// Credentials to log in with, when both are configured
    pub fn credentials(&self) -> Option<(&str, &str)> {
        Some((
            self.account.username.as_deref()?,
            self.account.password.as_deref()?,
        ))
    }

    pub fn server_config(&self) -> ServerConfig {
        ServerConfig::new(self.server.url.clone())
            .with_timeout(Duration::from_secs(self.server.timeout_secs))
    }

    pub fn player_config(&self) -> PlayerConfig {
        PlayerConfig {
            error_grace: Duration::from_millis(self.playback.error_grace_ms),
            progress_interval: Duration::from_millis(self.playback.progress_interval_ms),
            ephemeral_url: self.playback.ephemeral_url.clone(),
        }
    }

    pub fn max_session_age(&self) -> Duration {
        Duration::from_secs(self.session.max_age_secs)
    }

    pub fn simulated_track_length(&self) -> Duration {
        Duration::from_secs(self.playback.simulated_track_secs)
    }
}

// Default values
fn default_server() -> ServerSettings {
    ServerSettings {
        url: String::new(),
        timeout_secs: default_timeout_secs(),
    }
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_playback() -> PlaybackSettings {
    PlaybackSettings {
        error_grace_ms: default_error_grace_ms(),
        progress_interval_ms: default_progress_interval_ms(),
        simulated_track_secs: default_simulated_track_secs(),
        simulated_unavailable: Vec::new(),
        ephemeral_url: None,
    }
}

fn default_error_grace_ms() -> u64 {
    1700
}

fn default_progress_interval_ms() -> u64 {
    1000
}

fn default_simulated_track_secs() -> u64 {
    30
}

fn default_session() -> SessionSettings {
    SessionSettings {
        max_age_secs: default_max_age_secs(),
    }
}

fn default_max_age_secs() -> u64 {
    workmate_playback::DEFAULT_MAX_SESSION_AGE.as_secs()
}

impl Default for ServerSettings {
    fn default() -> Self {
        default_server()
    }
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        default_playback()
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        default_session()
    }
}
