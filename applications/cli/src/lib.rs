//! Workmate terminal player
//!
//! Drives the playback engine from stdin against a Workmate server, with a
//! simulated backend standing in for the video player.
//!
//! This library exposes the app components for testing purposes.

pub mod backend;
pub mod config;
pub mod display;
pub mod error;
pub mod input;

// Re-export commonly used types for convenience
pub use backend::SimulatedBackend;
pub use config::AppConfig;
pub use error::{CliError, Result};
