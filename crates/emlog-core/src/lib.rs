//! Parsing engine for EnergyMech/ZNC-style IRC channel logs.
//!
//! This crate turns the loosely structured, one-line-per-event text
//! written by an IRC bouncer into typed [`LogEvent`] records:
//! - Event model: [`LogEvent`] and the closed [`EventKind`] union
//! - Line classification: [`parse`] with fail-fast [`ParseError`]
//! - Filename context: [`LogFileContext`] for channel/date resolution
//!
//! The crate performs no I/O; callers hand it already-materialized
//! text plus the calendar date the file covers.

pub mod event;
pub mod logfile;
pub mod parser;

pub use event::{EventKind, LogEvent};
pub use logfile::{LogFileContext, UNKNOWN_CHANNEL};
pub use parser::{ParseError, parse};
