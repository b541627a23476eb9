//! Typed events reconstructed from raw log lines.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One structured record derived from a single raw log line.
///
/// Events are immutable once constructed; the only way to obtain one
/// is through [`crate::parse`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEvent {
    /// When the event occurred, reconstructed from the file's calendar
    /// date and the line's `[HH:MM:SS]` prefix. Log lines carry no
    /// timezone, so the timestamp is naive.
    pub timestamp: NaiveDateTime,
    /// What happened, with the fields of that event shape.
    #[serde(flatten)]
    pub kind: EventKind,
}

/// The closed set of line shapes a bouncer log can contain.
///
/// All fields are raw, unescaped substrings of the original line; the
/// parser performs no trimming beyond what each shape rule consumes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventKind {
    /// The bouncer connected to the network.
    Connected { server: String, port: String },
    /// The bouncer lost or closed its connection.
    Disconnected { server: String, port: String },
    /// A regular channel message (`<nick> text`).
    Message { nick: String, text: String },
    /// A notice (`-nick- text`).
    Notice { nick: String, text: String },
    /// Someone joined the channel.
    Join { nick: String, host: String },
    /// Someone left the channel.
    Part {
        nick: String,
        host: String,
        reason: String,
    },
    /// `nick` was kicked by `target`.
    Kick {
        nick: String,
        target: String,
        reason: String,
    },
    /// Someone quit the network.
    Quit {
        nick: String,
        host: String,
        reason: String,
    },
    /// A `/me` action.
    Action { nick: String, action: String },
    /// A mode change.
    Mode { nick: String, mode: String },
    /// A nick change.
    NickChange { old_nick: String, new_nick: String },
    /// A topic change. The topic may be empty.
    Topic { nick: String, topic: String },
    /// A ZNC broadcast notice.
    Broadcast { text: String },
}

impl EventKind {
    /// The discriminant tag used in serialized output.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Connected { .. } => "connected",
            Self::Disconnected { .. } => "disconnected",
            Self::Message { .. } => "message",
            Self::Notice { .. } => "notice",
            Self::Join { .. } => "join",
            Self::Part { .. } => "part",
            Self::Kick { .. } => "kick",
            Self::Quit { .. } => "quit",
            Self::Action { .. } => "action",
            Self::Mode { .. } => "mode",
            Self::NickChange { .. } => "nick_change",
            Self::Topic { .. } => "topic",
            Self::Broadcast { .. } => "broadcast",
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
