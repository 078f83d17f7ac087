//! Workmate - Playback Engine
//!
//! Playlist queue engine for a remote-video music player.
//!
//! This crate provides:
//! - Track queue with current / lookahead pointers (no wraparound)
//! - Reversible shuffle that survives adds and removes while shuffled
//! - Playback controller: auto-advance, error-driven skip / remove, and a
//!   one-shot special track kept outside the queue
//! - Two-depth action menu driven by abstract triggers
//! - Async [`Player`] that applies gateway-backed mutations only after the
//!   gateway confirmed them
//!
//! # Architecture
//!
//! `workmate-playback` never plays media and never talks HTTP itself:
//! - Media goes through the [`PlaybackBackend`] trait
//! - Persistence and sessions go through the `workmate-core` service traits
//!
//! # Example: Queue navigation
//!
//! ```rust
//! use workmate_playback::TrackQueue;
//! use workmate_core::Track;
//!
//! let mut queue = TrackQueue::new();
//! queue.load(
//!     "Focus",
//!     "playlist-1",
//!     vec![
//!         Track::new("T1", "https://youtu.be/dQw4w9WgXcQ"),
//!         Track::new("T2", "https://youtu.be/9bZkp7q19f0"),
//!     ],
//! );
//!
//! assert_eq!(queue.play_next(false).unwrap().id.as_str(), "T2");
//! // No wraparound at the end
//! assert_eq!(queue.play_next(false).unwrap().id.as_str(), "T2");
//! assert_eq!(queue.track_index(), "2 of 2");
//! ```
//!
//! # Example: Menu
//!
//! ```rust
//! use workmate_playback::{Menu, MenuAction, MenuCommand, Trigger};
//!
//! let mut menu = Menu::new();
//! menu.handle(Trigger::Select);
//! menu.handle(Trigger::Down);
//! assert_eq!(menu.highlighted(), MenuAction::Shuffle);
//! assert_eq!(menu.handle(Trigger::A), MenuCommand::ToggleShuffle);
//! ```

mod backend;
mod controller;
mod error;
mod menu;
mod player;
mod queue;
mod shuffle;
mod status;
mod timer;
mod trigger;
pub mod types;

// Public exports
pub use backend::{BackendEvent, BackendState, PlaybackBackend, VideoMetadata};
pub use controller::{PlaybackController, Recovery, Step, UNAVAILABLE_TITLE};
pub use error::{PlaybackError, Result};
pub use menu::{Menu, MenuAction, MenuCommand, MenuDepth};
pub use player::{Input, PendingAction, Player, DEFAULT_MAX_SESSION_AGE, NOTICE_TTL};
pub use queue::TrackQueue;
pub use status::{
    confirmation, MenuView, Notice, StatusSnapshot, EMPTY_PLAYLIST_PROMPT, SPECIAL_TRACK_PROMPT,
};
pub use timer::TimerSlot;
pub use trigger::{Trigger, UnknownTrigger};
pub use types::{NowPlaying, PlayerConfig, Transport};
