//! Rendering components for the terminal player.

mod progress;

pub use progress::{build_progress_bar_chars, format_duration, render_progress_bar, ProgressBar};
