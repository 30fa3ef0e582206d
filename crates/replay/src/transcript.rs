//! # Transcript Format
//!
//! One host event per line, command first:
//!
//! ```text
//! chat fg §eAlice has logged into server WC1 as a §bMage
//! sent 2le
//! sb 0 §b§lTracked Quest:
//! sb-remove 0
//! sb-tick
//! ab center §eⒹ 75%
//! title §cMask of the Lunatic
//! world world
//! auth
//! screen What would you like to sell?
//! advancement challenge §f[§aRagni§f] | §7Territory Defences: §cHigh\n§7Treasury: §fLow
//! ```
//!
//! Blank lines and lines starting with `#` are skipped. In advancement
//! descriptions a literal `\n` separates lines.

use wynnparse_core::{ActionBarPosition, ChatChannel, WorldState};
use wynnparse_protocol::RawLine;
use wynnparse_territory::{AdvancementDisplay, AdvancementEntry, AdvancementFrame};

/// Errors for a single transcript line
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum TranscriptError {
    #[error("Unknown command '{0}'")]
    UnknownCommand(String),

    #[error("Missing {what} for '{command}'")]
    MissingArgument {
        command: &'static str,
        what: &'static str,
    },

    #[error("Invalid {what} '{value}'")]
    InvalidArgument { what: &'static str, value: String },
}

/// One replayed host callback
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    Chat(RawLine),
    Sent(String),
    ScoreboardLine { index: usize, text: String },
    ScoreboardRemove(usize),
    ScoreboardTick,
    ActionBar { position: ActionBarPosition, text: String },
    Title(String),
    World(WorldState),
    Authenticated,
    Screen(String),
    Advancement(AdvancementEntry),
}

fn split_word(rest: &str) -> (&str, &str) {
    match rest.split_once(' ') {
        Some((word, rest)) => (word, rest),
        None => (rest, ""),
    }
}

fn required<'a>(
    command: &'static str,
    what: &'static str,
    value: &'a str,
) -> std::result::Result<&'a str, TranscriptError> {
    if value.is_empty() {
        Err(TranscriptError::MissingArgument { command, what })
    } else {
        Ok(value)
    }
}

fn parse_index(value: &str) -> std::result::Result<usize, TranscriptError> {
    value.parse().map_err(|_| TranscriptError::InvalidArgument {
        what: "line index",
        value: value.to_string(),
    })
}

fn parse_frame(value: &str) -> std::result::Result<AdvancementFrame, TranscriptError> {
    match value.to_ascii_lowercase().as_str() {
        "task" => Ok(AdvancementFrame::Task),
        "goal" => Ok(AdvancementFrame::Goal),
        "challenge" => Ok(AdvancementFrame::Challenge),
        _ => Err(TranscriptError::InvalidArgument {
            what: "advancement frame",
            value: value.to_string(),
        }),
    }
}

/// Parse one transcript line
///
/// # Returns
/// `None` for blank lines and comments
///
/// # Errors
/// Returns an error if the command is unknown or its arguments are malformed
pub fn parse_line(line: &str) -> std::result::Result<Option<HostEvent>, TranscriptError> {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.trim().is_empty() || line.trim_start().starts_with('#') {
        return Ok(None);
    }

    let (command, rest) = split_word(line.trim_start());
    let event = match command {
        "chat" => {
            let (channel, text) = split_word(rest);
            let channel = ChatChannel::from_str(required("chat", "channel", channel)?)
                .ok_or_else(|| TranscriptError::InvalidArgument {
                    what: "channel",
                    value: channel.to_string(),
                })?;
            HostEvent::Chat(RawLine::new(text, channel))
        }
        "sent" => HostEvent::Sent(rest.to_string()),
        "sb" => {
            let (index, text) = split_word(rest);
            HostEvent::ScoreboardLine {
                index: parse_index(required("sb", "line index", index)?)?,
                text: text.to_string(),
            }
        }
        "sb-remove" => HostEvent::ScoreboardRemove(parse_index(required(
            "sb-remove",
            "line index",
            rest.trim(),
        )?)?),
        "sb-tick" => HostEvent::ScoreboardTick,
        "ab" => {
            let (position, text) = split_word(rest);
            let position = ActionBarPosition::from_str(required("ab", "position", position)?)
                .ok_or_else(|| TranscriptError::InvalidArgument {
                    what: "position",
                    value: position.to_string(),
                })?;
            HostEvent::ActionBar {
                position,
                text: text.to_string(),
            }
        }
        "title" => HostEvent::Title(rest.to_string()),
        "world" => {
            let state = required("world", "state", rest.trim())?;
            HostEvent::World(WorldState::from_str(state).ok_or_else(|| {
                TranscriptError::InvalidArgument {
                    what: "world state",
                    value: state.to_string(),
                }
            })?)
        }
        "auth" => HostEvent::Authenticated,
        "screen" => HostEvent::Screen(rest.to_string()),
        "advancement" => {
            let (frame, rest) = split_word(rest);
            let frame = parse_frame(required("advancement", "frame", frame)?)?;
            let (title, description) = rest.split_once(" | ").unwrap_or((rest, ""));
            let title = required("advancement", "title", title.trim())?;
            HostEvent::Advancement(AdvancementEntry {
                id: title.to_string(),
                display: Some(AdvancementDisplay {
                    title: title.to_string(),
                    description: description.replace("\\n", "\n"),
                    frame,
                }),
            })
        }
        other => return Err(TranscriptError::UnknownCommand(other.to_string())),
    };

    Ok(Some(event))
}
