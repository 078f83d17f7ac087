//! Keyboard trigger source
//!
//! One command per stdin line: a trigger name (`a`, `b`, `up`, `down`,
//! `left`, `right`, `select`, `power`), `add <url>`, or `quit`.

use std::io::BufRead;
use tokio::sync::mpsc;
use tracing::{debug, warn};
use workmate_playback::{Input, Trigger, UnknownTrigger};

pub const HELP: &str = "\
commands:
  a / b                 menu confirm / back (play-pause / mute when closed)
  up / down             move the menu highlight
  left / right          previous / next track
  select                open the menu
  power                 switch the player off or on
  add <url>             add a video to the playlist
  help                  show this help
  quit                  exit";

/// A parsed stdin line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Player(Input),
    Help,
}

/// Parse one line; `Ok(None)` for a blank line
pub fn parse_line(line: &str) -> Result<Option<Command>, UnknownTrigger> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (word, rest) = line
        .split_once(char::is_whitespace)
        .map_or((line, ""), |(word, rest)| (word, rest.trim()));

    let command = match word.to_ascii_lowercase().as_str() {
        "add" => Command::Player(Input::AddTrack(rest.to_string())),
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Player(Input::Shutdown),
        _ => Command::Player(Input::Trigger(word.parse::<Trigger>()?)),
    };
    Ok(Some(command))
}

/// Forward parsed lines from `reader` to the player until EOF or shutdown
///
/// Blocking: run it on a dedicated thread, not on the async runtime.
pub fn forward_lines<R: BufRead>(reader: R, inputs: &mpsc::Sender<Input>) {
    for line in reader.lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                warn!(error = %e, "Failed to read input");
                break;
            }
        };

        match parse_line(&line) {
            Ok(Some(Command::Player(input))) => {
                let shutdown = input == Input::Shutdown;
                if inputs.blocking_send(input).is_err() || shutdown {
                    return;
                }
            }
            Ok(Some(Command::Help)) => println!("{}", HELP),
            Ok(None) => {}
            Err(e) => {
                debug!(error = %e, "Unknown command");
                println!("{} (type `help`)", e);
            }
        }
    }

    debug!("Input closed");
    let _ = inputs.blocking_send(Input::Shutdown);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_triggers_case_insensitively() {
        assert_eq!(
            parse_line("Right").unwrap(),
            Some(Command::Player(Input::Trigger(Trigger::Right)))
        );
        assert_eq!(
            parse_line("  select ").unwrap(),
            Some(Command::Player(Input::Trigger(Trigger::Select)))
        );
    }

    #[test]
    fn parses_add_with_url() {
        assert_eq!(
            parse_line("add https://youtu.be/dQw4w9WgXcQ").unwrap(),
            Some(Command::Player(Input::AddTrack(
                "https://youtu.be/dQw4w9WgXcQ".into()
            )))
        );
        assert_eq!(
            parse_line("add").unwrap(),
            Some(Command::Player(Input::AddTrack(String::new())))
        );
    }

    #[test]
    fn blank_and_unknown_lines() {
        assert_eq!(parse_line("   ").unwrap(), None);
        assert!(parse_line("jump").is_err());
        assert_eq!(parse_line("help").unwrap(), Some(Command::Help));
        assert_eq!(
            parse_line("quit").unwrap(),
            Some(Command::Player(Input::Shutdown))
        );
    }

    #[test]
    fn forwards_lines_then_shuts_down() {
        let (tx, mut rx) = mpsc::channel(8);
        let script: &[u8] = b"left\nbogus\nadd https://youtu.be/dQw4w9WgXcQ\n";

        forward_lines(script, &tx);

        assert_eq!(rx.try_recv(), Ok(Input::Trigger(Trigger::Left)));
        assert_eq!(
            rx.try_recv(),
            Ok(Input::AddTrack("https://youtu.be/dQw4w9WgXcQ".into()))
        );
        assert_eq!(rx.try_recv(), Ok(Input::Shutdown));
    }

    #[test]
    fn quit_stops_reading() {
        let (tx, mut rx) = mpsc::channel(8);
        let script: &[u8] = b"quit\nright\n";

        forward_lines(script, &tx);

        assert_eq!(rx.try_recv(), Ok(Input::Shutdown));
        assert!(rx.try_recv().is_err());
    }
}
