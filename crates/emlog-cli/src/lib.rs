//! IRC log converter CLI.
//!
//! This crate provides the command-line interface around
//! [`emlog_core`]: file reading, channel aggregation, and JSON output.

mod cli;
pub mod commands;

pub use cli::{Cli, Commands};
