//! Text rendering of the player status

use std::fmt::Write;
use workmate_playback::{MenuDepth, StatusSnapshot, Transport};

/// Whether two snapshots differ in anything but play progress
pub fn differs(a: &StatusSnapshot, b: &StatusSnapshot) -> bool {
    let mut a = a.clone();
    a.progress = b.progress;
    a != *b
}

fn transport_label(transport: Transport) -> &'static str {
    match transport {
        Transport::Idle => "idle",
        Transport::Loading => "loading",
        Transport::Playing => "playing",
        Transport::Paused => "paused",
        Transport::Stopped => "stopped",
        Transport::Unavailable => "unavailable",
    }
}

/// Render a snapshot as a few terminal lines
pub fn render(status: &StatusSnapshot) -> String {
    if !status.powered {
        return "[off]".to_string();
    }

    let mut out = String::new();
    let title = status.title.as_deref().unwrap_or("-");
    let _ = write!(
        out,
        "[{}] {} ({}, {:.0}%{})",
        transport_label(status.transport),
        title,
        status.index_label,
        status.progress,
        if status.muted { ", muted" } else { "" },
    );

    if !status.playlist_title.is_empty() || status.username.is_some() {
        let _ = write!(out, "\n  playlist: {}", status.playlist_title);
        if let Some(user) = &status.username {
            let _ = write!(out, " | user: {}", user);
        }
        if let Some(left) = status.session_left {
            let _ = write!(out, " | session: {:.0}%", left);
        }
    }

    let menu = &status.menu;
    match menu.depth {
        MenuDepth::Closed => {}
        MenuDepth::Actions => {
            let _ = write!(
                out,
                "\n  menu: > {}{}",
                menu.highlighted.label(),
                if menu.shuffle { " (shuffle on)" } else { "" }
            );
        }
        MenuDepth::Confirm(_) => {
            let prompt = menu.prompt.as_deref().unwrap_or_default();
            let _ = write!(
                out,
                "\n  {}{}",
                prompt,
                if menu.confirm { " [a: yes / b: no]" } else { " [b: back]" }
            );
        }
    }

    if let Some(notice) = status.notice {
        let _ = write!(out, "\n  ! {}", notice.message());
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use workmate_playback::{MenuAction, MenuView, Notice};

    fn snapshot() -> StatusSnapshot {
        StatusSnapshot {
            powered: true,
            username: Some("ada".into()),
            playlist_title: "Focus".into(),
            title: Some("Video dQw4w9WgXcQ".into()),
            transport: Transport::Playing,
            index_label: "track 1 of 3".into(),
            progress: 42.4,
            muted: false,
            session_left: Some(50.0),
            menu: MenuView {
                depth: MenuDepth::Closed,
                highlighted: MenuAction::Remove,
                shuffle: false,
                prompt: None,
                confirm: false,
            },
            notice: None,
        }
    }

    #[test]
    fn renders_now_playing() {
        let text = render(&snapshot());
        assert!(text.starts_with("[playing] Video dQw4w9WgXcQ (track 1 of 3, 42%)"));
        assert!(text.contains("playlist: Focus | user: ada | session: 50%"));
    }

    #[test]
    fn renders_confirmation_and_notice() {
        let mut status = snapshot();
        status.menu.depth = MenuDepth::Confirm(MenuAction::Empty);
        status.menu.prompt = Some("Empty your entire playlist?".into());
        status.menu.confirm = true;
        status.notice = Some(Notice::SaveFailed);

        let text = render(&status);
        assert!(text.contains("Empty your entire playlist? [a: yes / b: no]"));
        assert!(text.contains("! Error saving changes"));
    }

    #[test]
    fn powered_off() {
        let mut status = snapshot();
        status.powered = false;
        assert_eq!(render(&status), "[off]");
    }

    #[test]
    fn progress_alone_is_not_a_change() {
        let a = snapshot();
        let mut b = snapshot();
        b.progress = 80.0;
        assert!(!differs(&a, &b));

        b.muted = true;
        assert!(differs(&a, &b));
    }
}
