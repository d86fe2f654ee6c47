//! Command-line interface definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// castplay - replay recorded terminal sessions
#[derive(Parser, Debug)]
#[command(name = "castplay", version, about, long_about = None)]
pub struct Cli {
    /// Append logs to this file (level from CASTPLAY_LOG, default "warn")
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Replay a recording in this terminal
    ///
    /// Keys: space play/pause, left/right seek, home/end jump, q quit.
    Play {
        /// Recording to play (asciicast v1 or v3)
        file: PathBuf,

        /// Start playing immediately
        #[arg(long)]
        autoplay: bool,

        /// Seconds moved by one arrow key press
        #[arg(long, value_name = "SECONDS")]
        seek_step: Option<f64>,
    },

    /// Show information about a recording
    Info {
        /// Recording to inspect
        file: PathBuf,
    },

    /// Print the output a recording shows at a point in time
    Dump {
        /// Recording to replay
        file: PathBuf,

        /// Position in seconds (defaults to the end)
        #[arg(long, value_name = "SECONDS")]
        at: Option<f64>,
    },

    /// Generate shell completions
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Inspect the configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print the effective configuration as TOML
    Show,
    /// Print the configuration file path
    Path,
    /// Write a default configuration file if none exists
    Init,
}
