/// Domain types for Workmate
mod playlist;
mod session;
mod track;

pub use playlist::{MutateMode, MutateRequest, PlaylistDocument};
pub use session::{SessionInfo, SessionTimeLeft};
pub use track::{Track, TrackId};
