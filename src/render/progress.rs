//! Progress bar used as the position display of the terminal player.
//!
//! Drawn on a reserved row below the replayed output, with the playhead
//! position, the transport state and the elapsed/total time.

use std::io::{self, Write};
use std::time::Duration;

use crate::reporter::PositionDisplay;

/// Format a duration in seconds to MM:SS format.
///
/// # Arguments
/// * `seconds` - Duration in seconds
///
/// # Returns
/// A string in MM:SS format
pub fn format_duration(seconds: f64) -> String {
    let total_secs = seconds as u64;
    let mins = total_secs / 60;
    let secs = total_secs % 60;
    format!("{:02}:{:02}", mins, secs)
}

/// Build the progress bar character array.
///
/// # Arguments
/// * `bar_width` - Width of the bar in characters
/// * `current` - Current playback position
/// * `total` - Total length of the recording
///
/// # Returns
/// A tuple of (bar_chars, filled_count) where bar_chars contains the visual
/// representation and filled_count is the number of filled positions.
pub fn build_progress_bar_chars(
    bar_width: usize,
    current: Duration,
    total: Duration,
) -> (Vec<char>, usize) {
    let progress = if total.is_zero() {
        1.0
    } else {
        (current.as_secs_f64() / total.as_secs_f64()).clamp(0.0, 1.0)
    };

    let filled = (bar_width as f64 * progress) as usize;

    let mut bar: Vec<char> = vec!['─'; bar_width];
    if filled < bar_width {
        bar[filled] = '⏺';
    }

    (bar, filled)
}

/// Render the progress bar at the given row.
///
/// # Arguments
/// * `out` - Writer to render to
/// * `width` - Terminal width
/// * `row` - Row to render at (0-indexed)
/// * `label` - Transport state shown before the time
/// * `current` - Current playback position
/// * `total` - Total length of the recording
pub fn render_progress_bar<W: Write>(
    out: &mut W,
    width: u16,
    row: u16,
    label: &str,
    current: Duration,
    total: Duration,
) -> io::Result<()> {
    let bar_width = (width as usize).saturating_sub(22); // Account for padding, label and time
    let (bar, filled) = build_progress_bar_chars(bar_width, current, total);

    let time_display = format!(
        " {:<7} {}/{}",
        label,
        format_duration(current.as_secs_f64()),
        format_duration(total.as_secs_f64())
    );

    const GREEN: &str = "\x1b[32m";
    const WHITE: &str = "\x1b[97m";
    const DARK_GREY: &str = "\x1b[90m";
    const GREY: &str = "\x1b[37m";

    // Build output string to minimize syscalls
    let mut output = String::with_capacity(width as usize * 4);
    output.push_str("\x1b7"); // Save cursor: the replayed output owns it
    output.push_str(&format!("\x1b[{};1H", row + 1));
    output.push_str("\x1b[48;5;236m "); // Dark gray background + padding

    output.push_str(GREEN);
    for (i, &c) in bar.iter().enumerate() {
        if i < filled {
            output.push('━');
        } else if i == filled {
            output.push_str(WHITE);
            output.push(c);
        } else {
            output.push_str(DARK_GREY);
            output.push(c);
        }
    }

    output.push_str(GREY);
    output.push_str(&time_display);

    // Fill remaining width
    let used_width = 1 + bar_width + time_display.len();
    let remaining = (width as usize).saturating_sub(used_width);
    for _ in 0..remaining {
        output.push(' ');
    }

    output.push_str("\x1b[0m"); // Reset
    output.push_str("\x1b8"); // Restore cursor
    out.write_all(output.as_bytes())?;
    out.flush()
}

/// Progress bar on the bottom row of the screen.
pub struct ProgressBar<W: Write> {
    out: W,
    width: u16,
    row: u16,
    label: &'static str,
    total: Duration,
    current: Duration,
}

impl<W: Write> ProgressBar<W> {
    pub fn new(out: W, width: u16, row: u16) -> Self {
        Self {
            out,
            width,
            row,
            label: "paused",
            total: Duration::ZERO,
            current: Duration::ZERO,
        }
    }

    /// Move the bar after a terminal resize and redraw it.
    pub fn relocate(&mut self, width: u16, row: u16) -> io::Result<()> {
        self.width = width;
        self.row = row;
        self.redraw()
    }

    /// Change the state label; redraws only when it differs.
    pub fn set_label(&mut self, label: &'static str) -> io::Result<()> {
        if self.label == label {
            return Ok(());
        }
        self.label = label;
        self.redraw()
    }

    pub fn redraw(&mut self) -> io::Result<()> {
        render_progress_bar(
            &mut self.out,
            self.width,
            self.row,
            self.label,
            self.current,
            self.total,
        )
    }

    pub fn current(&self) -> Duration {
        self.current
    }
}

impl<W: Write> PositionDisplay for ProgressBar<W> {
    fn set_value(&mut self, position: Duration) -> io::Result<()> {
        self.current = position;
        self.redraw()
    }

    fn set_max(&mut self, max: Duration) -> io::Result<()> {
        self.total = max;
        self.redraw()
    }
}
