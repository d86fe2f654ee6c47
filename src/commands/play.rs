//! Play command handler

use std::path::Path;

use anyhow::{bail, Context, Result};

use castplay::app::{play_session, PlaybackResult};
use castplay::{Config, Session};

/// Replay a recording interactively.
///
/// Command-line flags override the values from the config file.
#[cfg(not(tarpaulin_include))]
pub fn handle(file: &Path, autoplay: bool, seek_step: Option<f64>) -> Result<()> {
    if !atty::is(atty::Stream::Stdout) || !atty::is(atty::Stream::Stdin) {
        bail!("castplay play needs an interactive terminal; try `castplay dump` instead");
    }

    let mut config = Config::load().context("Failed to load config")?;
    if autoplay {
        config.player.autoplay = true;
    }
    if let Some(step) = seek_step {
        config.player.seek_step_secs = step;
    }

    let session = Session::load(file)
        .with_context(|| format!("Failed to load recording {}", file.display()))?;
    tracing::info!(
        path = %file.display(),
        events = session.len(),
        duration_ms = session.duration().as_millis() as u64,
        "loaded recording"
    );

    match play_session(session, &config.player)? {
        PlaybackResult::Finished => tracing::info!("playback finished"),
        PlaybackResult::Interrupted => tracing::info!("playback interrupted"),
    }
    Ok(())
}
