//! Line classification and timestamp reconstruction.
//!
//! Every line in a bouncer log is `[HH:MM:SS] ` followed by one of a
//! fixed set of shapes. [`parse`] extracts the clock time, merges it
//! with the file's calendar date, and classifies the remainder against
//! an ordered rule list. The first line matching no shape aborts the
//! whole parse; there is no skip-and-continue mode.

use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveDateTime};
use regex::{Captures, Regex};
use thiserror::Error;

use crate::event::{EventKind, LogEvent};

/// Fatal parse failures, carrying the offending line so operators can
/// extend the rule set or fix malformed logs.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The line matched none of the known shapes.
    #[error("unrecognized log line: {line}")]
    UnrecognizedLine { line: String },
    /// The `[HH:MM:SS]` prefix was missing or its components do not
    /// form a valid clock time.
    #[error("invalid timestamp in log line: {line}")]
    InvalidTimestamp { line: String },
}

impl ParseError {
    /// The raw line that failed to parse.
    #[must_use]
    pub fn line(&self) -> &str {
        match self {
            Self::UnrecognizedLine { line } | Self::InvalidTimestamp { line } => line,
        }
    }
}

static TIMESTAMP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[(\d{2}):(\d{2}):(\d{2})\] ").unwrap());

// Shape rules, in classification order. All are anchored: the single-
// asterisk action rule requires exactly "* " at the start, so it can
// never swallow a "***" line regardless of position in the list.
static NOTICE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^-(\S+)- (.*)$").unwrap());
static CONNECTED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Connected to IRC \((\S+) (\S+)\)$").unwrap());
static DISCONNECTED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Disconnected from IRC \((\S+) (\S+)\)$").unwrap());
static BROADCAST_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^Broadcast: (.*)$").unwrap());
static JOIN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\*{3} Joins: (\S+) \(([^)]+)\)$").unwrap());
static KICK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\*{3} (\S+) was kicked by (\S+) \((.*)\)$").unwrap());
static ACTION_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\* (\S+) (.*)$").unwrap());
static PART_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\*{3} Parts: (\S+) \(([^)]+)\) \((.*)\)$").unwrap());
static QUIT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\*{3} Quits: (\S+) \(([^)]+)\) \((.*)\)$").unwrap());
static MODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\*{3} (\S+) sets mode: (.*)$").unwrap());
static NICK_CHANGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\*{3} (\S+) is now known as (\S+)$").unwrap());
static TOPIC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\*{3} (\S+) changes topic to '(.*)'$").unwrap());

/// Parses a full log text into typed events.
///
/// Each line is classified independently against `base_date`; line
/// order is preserved. Returns the first failure without accumulating
/// partial results.
pub fn parse(input: &str, base_date: NaiveDate) -> Result<Vec<LogEvent>, ParseError> {
    input.lines().map(|line| parse_line(line, base_date)).collect()
}

fn parse_line(line: &str, base_date: NaiveDate) -> Result<LogEvent, ParseError> {
    let captures = TIMESTAMP_RE.captures(line).ok_or_else(|| ParseError::InvalidTimestamp {
        line: line.to_string(),
    })?;
    let timestamp =
        reconstruct_timestamp(base_date, &captures).ok_or_else(|| ParseError::InvalidTimestamp {
            line: line.to_string(),
        })?;

    // The prefix is all ASCII, so slicing at the match length is safe.
    let rest = &line[captures[0].len()..];
    let kind = classify(rest).ok_or_else(|| ParseError::UnrecognizedLine {
        line: line.to_string(),
    })?;

    Ok(LogEvent { timestamp, kind })
}

/// Merges the file's calendar date with the line's clock time.
///
/// Components are not bounds-checked beyond what chrono enforces; a
/// minute of 61 yields `None` and the caller treats that as fatal.
fn reconstruct_timestamp(base_date: NaiveDate, captures: &Captures<'_>) -> Option<NaiveDateTime> {
    let hour = captures[1].parse().ok()?;
    let minute = captures[2].parse().ok()?;
    let second = captures[3].parse().ok()?;
    base_date.and_hms_opt(hour, minute, second)
}

/// Classifies a timestamp-stripped line against the ordered rule list.
///
/// First match wins. Each arm binds its own captures; no match state
/// is shared between attempts.
fn classify(rest: &str) -> Option<EventKind> {
    if let Some(body) = rest.strip_prefix('<') {
        // Nick is everything up to the first '>'; a '<' line without
        // one matches no shape and falls through to the fatal path.
        let (nick, tail) = body.split_once('>')?;
        let text = tail.strip_prefix(' ').unwrap_or(tail);
        return Some(EventKind::Message {
            nick: nick.to_string(),
            text: text.to_string(),
        });
    }
    if let Some(c) = NOTICE_RE.captures(rest) {
        return Some(EventKind::Notice {
            nick: c[1].to_string(),
            text: c[2].to_string(),
        });
    }
    if let Some(c) = CONNECTED_RE.captures(rest) {
        return Some(EventKind::Connected {
            server: c[1].to_string(),
            port: c[2].to_string(),
        });
    }
    if let Some(c) = DISCONNECTED_RE.captures(rest) {
        return Some(EventKind::Disconnected {
            server: c[1].to_string(),
            port: c[2].to_string(),
        });
    }
    if let Some(c) = BROADCAST_RE.captures(rest) {
        return Some(EventKind::Broadcast {
            text: c[1].to_string(),
        });
    }
    if let Some(c) = JOIN_RE.captures(rest) {
        return Some(EventKind::Join {
            nick: c[1].to_string(),
            host: c[2].to_string(),
        });
    }
    if let Some(c) = KICK_RE.captures(rest) {
        return Some(EventKind::Kick {
            nick: c[1].to_string(),
            target: c[2].to_string(),
            reason: c[3].to_string(),
        });
    }
    if let Some(c) = ACTION_RE.captures(rest) {
        return Some(EventKind::Action {
            nick: c[1].to_string(),
            action: c[2].to_string(),
        });
    }
    if let Some(c) = PART_RE.captures(rest) {
        return Some(EventKind::Part {
            nick: c[1].to_string(),
            host: c[2].to_string(),
            reason: c[3].to_string(),
        });
    }
    if let Some(c) = QUIT_RE.captures(rest) {
        return Some(EventKind::Quit {
            nick: c[1].to_string(),
            host: c[2].to_string(),
            reason: c[3].to_string(),
        });
    }
    if let Some(c) = MODE_RE.captures(rest) {
        return Some(EventKind::Mode {
            nick: c[1].to_string(),
            mode: c[2].to_string(),
        });
    }
    if let Some(c) = NICK_CHANGE_RE.captures(rest) {
        return Some(EventKind::NickChange {
            old_nick: c[1].to_string(),
            new_nick: c[2].to_string(),
        });
    }
    if let Some(c) = TOPIC_RE.captures(rest) {
        return Some(EventKind::Topic {
            nick: c[1].to_string(),
            topic: c[2].to_string(),
        });
    }
    None
}
