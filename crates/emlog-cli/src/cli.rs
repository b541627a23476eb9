//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// EnergyMech/ZNC IRC log converter.
///
/// Reads bouncer channel logs and emits the events as typed JSON
/// records, grouped by channel.
#[derive(Debug, Parser)]
#[command(name = "emlog", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Convert log files to a channel-grouped JSON event map.
    Convert {
        /// Log files to convert, in processing order.
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Pretty-print the JSON output.
        #[arg(long)]
        pretty: bool,
    },
}
