/// Session types supplied by the auth service
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Session summary used to bootstrap or reset the queue
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionInfo {
    /// Whether the session is still usable
    pub is_valid: bool,

    /// Logged-in username
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    /// Object id of the user's playlist
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub playlist_id: Option<String>,

    /// Expiry instant (epoch milliseconds on the wire)
    #[serde(
        default,
        with = "chrono::serde::ts_milliseconds_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub expires_at: Option<DateTime<Utc>>,
}

impl SessionInfo {
    /// An invalid session
    pub fn invalid() -> Self {
        Self::default()
    }

    /// Playlist to load, only when the session is valid
    pub fn playlist(&self) -> Option<&str> {
        if self.is_valid {
            self.playlist_id.as_deref()
        } else {
            None
        }
    }

    /// Whether the session has passed its expiry at `now`
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        !self.is_valid || self.expires_at.is_some_and(|at| now > at)
    }
}

/// Remaining session time
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionTimeLeft {
    /// Milliseconds until expiry
    pub time_left: u64,

    /// Whether the session already expired
    #[serde(default)]
    pub expired: bool,
}

impl SessionTimeLeft {
    /// Remaining time as a percentage of `max_age`, clamped to 0..=100
    pub fn percent_of(&self, max_age: Duration) -> f64 {
        if self.expired || max_age.is_zero() {
            return 0.0;
        }
        let ratio = self.time_left as f64 / max_age.as_millis() as f64;
        (ratio * 100.0).clamp(0.0, 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn parses_camel_case_session() {
        let info: SessionInfo = serde_json::from_str(
            r#"{"isValid":true,"username":"alice","playlistId":"pl1","expiresAt":1700000000000}"#,
        )
        .unwrap();
        assert!(info.is_valid);
        assert_eq!(info.playlist(), Some("pl1"));
        assert_eq!(
            info.expires_at,
            Some(Utc.timestamp_millis_opt(1_700_000_000_000).unwrap())
        );
    }

    #[test]
    fn invalid_session_exposes_no_playlist() {
        let info: SessionInfo = serde_json::from_str(r#"{"isValid":false}"#).unwrap();
        assert_eq!(info.playlist(), None);
        assert!(info.is_expired_at(Utc::now()));
    }

    #[test]
    fn time_left_percentage() {
        let left = SessionTimeLeft {
            time_left: 30_000,
            expired: false,
        };
        assert_eq!(left.percent_of(Duration::from_secs(120)), 25.0);

        let expired = SessionTimeLeft {
            time_left: 0,
            expired: true,
        };
        assert_eq!(expired.percent_of(Duration::from_secs(120)), 0.0);
    }
}
