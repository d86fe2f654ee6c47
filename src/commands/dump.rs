//! Dump command handler

use std::io;
use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Context, Result};

use castplay::cursor::PlaybackCursor;
use castplay::terminal::ScreenTerminal;
use castplay::Session;

/// Convert the `--at` argument into a seek target.
pub fn target_from_secs(at: Option<f64>, session: &Session) -> Result<Duration> {
    match at {
        None => Ok(session.duration()),
        Some(secs) => match Duration::try_from_secs_f64(secs) {
            Ok(target) => Ok(target.min(session.duration())),
            Err(_) => bail!("Invalid position: {} (expected seconds >= 0)", secs),
        },
    }
}

/// Write the output the recording shows at `--at` to stdout.
#[cfg(not(tarpaulin_include))]
pub fn handle(file: &Path, at: Option<f64>) -> Result<()> {
    let session = Session::load(file)
        .with_context(|| format!("Failed to load recording {}", file.display()))?;
    let target = target_from_secs(at, &session)?;

    let stdout = io::stdout();
    let mut terminal = ScreenTerminal::new(stdout.lock(), 0);
    let mut cursor = PlaybackCursor::new();
    let advance = cursor
        .advance_to(&session, target, &mut terminal)
        .context("Failed to write output")?;
    tracing::debug!(
        target_ms = target.as_millis() as u64,
        replayed = advance.replayed,
        "dumped prefix"
    );
    Ok(())
}
