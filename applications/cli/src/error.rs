/// Terminal player error types
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Server error: {0}")]
    Client(#[from] workmate_client::ClientError),

    #[error("Playback error: {0}")]
    Playback(#[from] workmate_playback::PlaybackError),

    #[error("Service error: {0}")]
    Core(#[from] workmate_core::CoreError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
