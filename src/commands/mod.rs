//! Subcommand handlers for the castplay binary.

pub mod completions;
pub mod config;
pub mod dump;
pub mod info;
pub mod play;
