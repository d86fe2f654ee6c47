//! castplay CLI entry point

mod commands;

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use castplay::cli::{Cli, Commands, ConfigCommands};

/// Environment variable holding the log filter.
const LOG_ENV: &str = "CASTPLAY_LOG";

/// Install the log subscriber.
///
/// Logs go to `log_file` when given. Otherwise they go to stderr, except
/// while the interactive player owns the screen.
#[cfg(not(tarpaulin_include))]
fn init_logging(log_file: Option<&Path>, interactive: bool) -> Result<()> {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));

    match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None if !interactive => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
        None => {}
    }
    Ok(())
}

#[cfg(not(tarpaulin_include))]
fn main() -> Result<()> {
    let cli = Cli::parse();

    let interactive = matches!(cli.command, Commands::Play { .. });
    init_logging(cli.log_file.as_deref(), interactive)?;

    match cli.command {
        Commands::Play {
            file,
            autoplay,
            seek_step,
        } => commands::play::handle(&file, autoplay, seek_step),
        Commands::Info { file } => commands::info::handle(&file),
        Commands::Dump { file, at } => commands::dump::handle(&file, at),
        Commands::Completions { shell } => {
            commands::completions::handle(shell);
            Ok(())
        }
        Commands::Config { command } => match command {
            ConfigCommands::Show => commands::config::handle_show(),
            ConfigCommands::Path => commands::config::handle_path(),
            ConfigCommands::Init => commands::config::handle_init(),
        },
    }
}
