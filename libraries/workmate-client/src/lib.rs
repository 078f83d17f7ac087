//! Workmate Client
//!
//! HTTP client for the Workmate playlist and session API.
//!
//! # Features
//!
//! - **Authentication**: cookie session login, session check, time left, logout
//! - **Playlists**: fetch by id, add / remove / empty mutations
//! - **Service traits**: [`WorkmateClient`] implements the `workmate-core`
//!   `PersistenceGateway` and `SessionService` contracts, so it can drive
//!   the playback engine directly
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use workmate_client::{ServerConfig, WorkmateClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = WorkmateClient::new(ServerConfig::new("https://workmate.example.com"))?;
//!     client.login("user", "password").await?;
//!
//!     let gateway = Arc::new(client);
//!     // hand `gateway` to workmate_playback::Player::new
//!     Ok(())
//! }
//! ```

mod auth;
mod client;
mod error;
mod playlist;
mod types;

// Re-export main types
pub use client::WorkmateClient;
pub use error::{ClientError, Result};
pub use types::{LoginRequest, ServerConfig, SuccessResponse, DEFAULT_TIMEOUT};

// Re-export sub-clients for direct use if needed
pub use auth::AuthClient;
pub use playlist::PlaylistClient;
