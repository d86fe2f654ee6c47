//! Info command handler

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::DateTime;
use humansize::{format_size, DECIMAL};

use castplay::render::format_duration;
use castplay::Session;

/// Human-readable summary of a recording, one `label: value` per line.
pub fn describe(session: &Session, file_size: u64) -> Vec<(&'static str, String)> {
    let meta = session.meta();
    let mut lines = vec![
        ("Size", format_size(file_size, DECIMAL)),
        ("Terminal", format!("{}x{}", meta.width, meta.height)),
        ("Events", session.len().to_string()),
        (
            "Duration",
            format_duration(session.duration().as_secs_f64()),
        ),
        ("Output", format_size(session.output_bytes() as u64, DECIMAL)),
    ];

    if let Some(title) = &meta.title {
        lines.push(("Title", title.clone()));
    }
    if let Some(command) = &meta.command {
        lines.push(("Command", command.clone()));
    }
    if let Some(recorded) = meta.timestamp.and_then(|ts| DateTime::from_timestamp(ts, 0)) {
        lines.push(("Recorded", recorded.format("%Y-%m-%d %H:%M UTC").to_string()));
    }

    lines
}

/// Print information about a recording.
#[cfg(not(tarpaulin_include))]
pub fn handle(file: &Path) -> Result<()> {
    let file_size = fs::metadata(file)
        .with_context(|| format!("Failed to read {}", file.display()))?
        .len();
    let session = Session::load(file)
        .with_context(|| format!("Failed to load recording {}", file.display()))?;

    println!("{}", file.display());
    for (label, value) in describe(&session, file_size) {
        println!("  {:<9} {}", format!("{}:", label), value);
    }
    Ok(())
}
