//! Display snapshot of the player

use crate::menu::{MenuAction, MenuDepth};
use crate::types::Transport;
use serde::{Deserialize, Serialize};

/// Prompt when the special track is asked to be removed
pub const SPECIAL_TRACK_PROMPT: &str =
    "Special tracks aren't added to your playlist, so no worries!";

/// Prompt for remove / empty on an empty playlist
pub const EMPTY_PLAYLIST_PROMPT: &str = "Playlist is already empty";

/// Short-lived inline message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Notice {
    /// Locator did not parse
    InvalidUrl,
    /// Add confirmed by the gateway
    MusicAdded,
    /// Gateway refused or failed a mutation
    SaveFailed,
    /// Skip past the last track
    EndOfPlaylist,
    /// Anything else that failed (logout, bootstrap)
    Failed,
}

impl Notice {
    /// Message shown to the user
    pub fn message(self) -> &'static str {
        match self {
            Notice::InvalidUrl => "Enter a valid URL",
            Notice::MusicAdded => "Music added!",
            Notice::SaveFailed => "Error saving changes",
            Notice::EndOfPlaylist => "End of playlist",
            Notice::Failed => "There was an error. Please try again.",
        }
    }
}

/// What the action menu shows
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuView {
    /// How deep the menu is open
    pub depth: MenuDepth,

    /// Highlighted entry
    pub highlighted: MenuAction,

    /// Shuffle mode flag shown next to the shuffle entry
    pub shuffle: bool,

    /// Confirmation text at depth 2
    pub prompt: Option<String>,

    /// Whether confirming does anything
    pub confirm: bool,
}

/// Confirmation text and whether a confirm is offered
pub fn confirmation(action: MenuAction, queue_empty: bool, ephemeral: bool) -> (&'static str, bool) {
    match action {
        MenuAction::Logout => (action.prompt(), true),
        MenuAction::Remove if ephemeral => (SPECIAL_TRACK_PROMPT, false),
        _ if queue_empty => (EMPTY_PLAYLIST_PROMPT, false),
        _ => (action.prompt(), true),
    }
}

/// Everything a frontend needs to draw the player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusSnapshot {
    /// Power flag
    pub powered: bool,

    /// Logged-in username, if the session is valid
    pub username: Option<String>,

    /// Playlist title
    pub playlist_title: String,

    /// Title line of the playback subject
    pub title: Option<String>,

    /// Transport state
    pub transport: Transport,

    /// `"shuffle on"`, `"special track"` or `"track 2 of 5"`
    pub index_label: String,

    /// Play position in percent
    pub progress: f64,

    /// Mute flag
    pub muted: bool,

    /// Remaining session time in percent of the maximum session age
    pub session_left: Option<f64>,

    /// Action menu
    pub menu: MenuView,

    /// Latest inline message
    pub notice: Option<Notice>,
}

impl StatusSnapshot {
    /// Index line for the given flags
    pub fn index_label(shuffled: bool, ephemeral: bool, track_index: &str) -> String {
        if shuffled {
            "shuffle on".to_string()
        } else if ephemeral {
            "special track".to_string()
        } else {
            format!("track {}", track_index)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompts_per_context() {
        assert_eq!(
            confirmation(MenuAction::Remove, false, false),
            ("Remove current track from playlist?", true)
        );
        assert_eq!(
            confirmation(MenuAction::Remove, false, true),
            (SPECIAL_TRACK_PROMPT, false)
        );
        assert_eq!(
            confirmation(MenuAction::Empty, true, false),
            (EMPTY_PLAYLIST_PROMPT, false)
        );
        assert_eq!(
            confirmation(MenuAction::Logout, true, true),
            ("Log out from current account?", true)
        );
    }

    #[test]
    fn index_label_precedence() {
        assert_eq!(StatusSnapshot::index_label(true, true, "1 of 2"), "shuffle on");
        assert_eq!(StatusSnapshot::index_label(false, true, "1 of 2"), "special track");
        assert_eq!(StatusSnapshot::index_label(false, false, "1 of 2"), "track 1 of 2");
    }

    #[test]
    fn notice_messages() {
        assert_eq!(Notice::InvalidUrl.message(), "Enter a valid URL");
        assert_eq!(Notice::SaveFailed.message(), "Error saving changes");
    }
}
