//! CLI subcommand implementations.

pub mod convert;
