//! Session construction and loading errors.

use std::time::Duration;

/// Errors that reject a recorded log before a player can be built for it.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Session contains no output events")]
    Empty,

    #[error("Event {index} at {offset:?} precedes the previous event at {previous:?}")]
    NonMonotonic {
        index: usize,
        offset: Duration,
        previous: Duration,
    },

    #[error("Session duration {duration:?} is shorter than the last event at {last:?}")]
    DurationTooShort { duration: Duration, last: Duration },

    #[error("Invalid event at {at}: {message}")]
    Parse { at: String, message: String },

    #[error("Unsupported asciicast version {0} (expected 1 or 3)")]
    UnsupportedVersion(u64),

    #[error("Failed to read session: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse session JSON: {0}")]
    Json(#[from] serde_json::Error),
}
