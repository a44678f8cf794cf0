//! Commands module - implementations of the CLI subcommands

pub mod clean;
pub mod generate;
