//! Abstract input triggers
//!
//! Every physical input (keyboard, pointer, hardware button) is normalised
//! into one of eight triggers before it reaches the engine.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Normalised input event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trigger {
    /// Confirm / primary button
    A,
    /// Back / secondary button
    B,
    /// Menu cursor up
    Up,
    /// Menu cursor down
    Down,
    /// Previous track
    Left,
    /// Next track
    Right,
    /// Open the action menu
    Select,
    /// Power toggle
    Power,
}

impl Trigger {
    /// All triggers, in display order
    pub const ALL: [Trigger; 8] = [
        Trigger::A,
        Trigger::B,
        Trigger::Up,
        Trigger::Down,
        Trigger::Left,
        Trigger::Right,
        Trigger::Select,
        Trigger::Power,
    ];

    /// Lowercase name
    pub fn as_str(self) -> &'static str {
        match self {
            Trigger::A => "a",
            Trigger::B => "b",
            Trigger::Up => "up",
            Trigger::Down => "down",
            Trigger::Left => "left",
            Trigger::Right => "right",
            Trigger::Select => "select",
            Trigger::Power => "power",
        }
    }
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for an unknown trigger name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTrigger(pub String);

impl fmt::Display for UnknownTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown trigger: {}", self.0)
    }
}

impl std::error::Error for UnknownTrigger {}

impl FromStr for Trigger {
    type Err = UnknownTrigger;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        Trigger::ALL
            .into_iter()
            .find(|t| t.as_str() == name)
            .ok_or(UnknownTrigger(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_names_case_insensitively() {
        assert_eq!("a".parse::<Trigger>().unwrap(), Trigger::A);
        assert_eq!(" Select ".parse::<Trigger>().unwrap(), Trigger::Select);
        assert_eq!("POWER".parse::<Trigger>().unwrap(), Trigger::Power);
    }

    #[test]
    fn rejects_unknown_names() {
        let err = "start".parse::<Trigger>().unwrap_err();
        assert_eq!(err.to_string(), "unknown trigger: start");
    }

    #[test]
    fn display_round_trips() {
        for trigger in Trigger::ALL {
            assert_eq!(trigger.to_string().parse::<Trigger>().unwrap(), trigger);
        }
    }
}
