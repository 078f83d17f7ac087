//! Two-depth action menu
//!
//! ```text
//! Closed   --select-->  Actions  --a (not shuffle)-->  Confirm(action)
//!   ^                     |  ^                            |
//!   +---------b-----------+  +-------------b--------------+
//! ```
//!
//! The menu only tracks where the cursor is. It returns a [`MenuCommand`]
//! for everything that touches the queue, the backend or the gateway, and
//! the caller decides when an executed action is done (see
//! [`Menu::close`]).

use crate::trigger::Trigger;
use serde::{Deserialize, Serialize};

/// Entries of the action menu, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MenuAction {
    /// Remove the current track from the playlist
    Remove,
    /// Toggle shuffle mode
    Shuffle,
    /// Remove every track from the playlist
    Empty,
    /// End the session
    Logout,
}

impl MenuAction {
    /// All actions, in display order
    pub const ALL: [MenuAction; 4] = [
        MenuAction::Remove,
        MenuAction::Shuffle,
        MenuAction::Empty,
        MenuAction::Logout,
    ];

    /// Label shown in the action list
    pub fn label(self) -> &'static str {
        match self {
            MenuAction::Remove => "remove",
            MenuAction::Shuffle => "shuffle",
            MenuAction::Empty => "empty",
            MenuAction::Logout => "logout",
        }
    }

    /// Confirmation prompt for a non-empty queue
    pub fn prompt(self) -> &'static str {
        match self {
            MenuAction::Remove => "Remove current track from playlist?",
            MenuAction::Shuffle => "",
            MenuAction::Empty => "Empty your entire playlist?",
            MenuAction::Logout => "Log out from current account?",
        }
    }

    /// Whether the action needs a second confirmation step
    pub fn needs_confirmation(self) -> bool {
        !matches!(self, MenuAction::Shuffle)
    }
}

/// How deep the menu is open
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MenuDepth {
    /// Menu hidden, triggers drive playback
    #[default]
    Closed,
    /// Action list shown
    Actions,
    /// Confirmation for one action shown
    Confirm(MenuAction),
}

/// What the caller should do after a trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuCommand {
    /// Nothing beyond the menu's own state change
    None,
    /// Step back in the queue
    PlayPrevious,
    /// Step forward in the queue
    PlayNext,
    /// Play / pause the loaded video
    TogglePlay,
    /// Mute / unmute
    ToggleMute,
    /// Flip shuffle mode
    ToggleShuffle,
    /// Run a confirmed action
    Execute(MenuAction),
}

/// Action menu state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Menu {
    depth: MenuDepth,
    highlighted: usize,
}

impl Menu {
    /// Create a closed menu
    pub fn new() -> Self {
        Self::default()
    }

    /// Current depth
    pub fn depth(&self) -> MenuDepth {
        self.depth
    }

    /// Whether the action list (or a confirmation) is shown
    pub fn is_open(&self) -> bool {
        self.depth != MenuDepth::Closed
    }

    /// Highlighted action
    pub fn highlighted(&self) -> MenuAction {
        MenuAction::ALL[self.highlighted]
    }

    /// Close the menu and reset the cursor
    pub fn close(&mut self) {
        self.depth = MenuDepth::Closed;
        self.highlighted = 0;
    }

    /// Feed one trigger
    pub fn handle(&mut self, trigger: Trigger) -> MenuCommand {
        match self.depth {
            MenuDepth::Closed => match trigger {
                Trigger::Select => {
                    self.depth = MenuDepth::Actions;
                    MenuCommand::None
                }
                Trigger::Left => MenuCommand::PlayPrevious,
                Trigger::Right => MenuCommand::PlayNext,
                Trigger::A => MenuCommand::TogglePlay,
                Trigger::B => MenuCommand::ToggleMute,
                _ => MenuCommand::None,
            },
            MenuDepth::Actions => match trigger {
                Trigger::Up => {
                    let len = MenuAction::ALL.len();
                    self.highlighted = (self.highlighted + len - 1) % len;
                    MenuCommand::None
                }
                Trigger::Down => {
                    self.highlighted = (self.highlighted + 1) % MenuAction::ALL.len();
                    MenuCommand::None
                }
                Trigger::A => {
                    let action = self.highlighted();
                    if action.needs_confirmation() {
                        self.depth = MenuDepth::Confirm(action);
                        MenuCommand::None
                    } else {
                        MenuCommand::ToggleShuffle
                    }
                }
                Trigger::B => {
                    self.close();
                    MenuCommand::None
                }
                _ => MenuCommand::None,
            },
            MenuDepth::Confirm(action) => match trigger {
                Trigger::A => MenuCommand::Execute(action),
                Trigger::B => {
                    self.depth = MenuDepth::Actions;
                    MenuCommand::None
                }
                _ => MenuCommand::None,
            },
        }
    }
}
