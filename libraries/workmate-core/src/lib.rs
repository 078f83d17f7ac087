//! Workmate Core
//!
//! Platform-agnostic domain types, service contracts, and error handling
//! shared by the playback engine, the HTTP client, and the terminal app.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Track`, `PlaylistDocument`, `SessionInfo`, etc.
//! - **Service Traits**: `PersistenceGateway`, `SessionService`
//! - **Locator parsing**: video id extraction from pasted URLs
//! - **Error Handling**: unified `CoreError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use workmate_core::{locator, MutateRequest, Track};
//!
//! let url = "https://www.youtube.com/watch?v=dQw4w9WgXcQ";
//! let video_id = locator::require_video_id(url).unwrap();
//! let track = Track::new(format!("{video_id}-1"), url);
//!
//! let request = MutateRequest::add("my-playlist", track);
//! assert!(request.track.is_some());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod locator;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use error::{CoreError, Result};
pub use traits::{PersistenceGateway, SessionService};
pub use types::{
    MutateMode, MutateRequest, PlaylistDocument, SessionInfo, SessionTimeLeft, Track, TrackId,
};
