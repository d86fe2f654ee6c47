//! Recorded session model.
//!
//! A [`Session`] is the immutable event log a player replays: terminal
//! output chunks stamped with their absolute offset from the start of the
//! recording, plus the total length of the recording. Sessions are
//! validated once at construction; a player never sees a malformed log.

mod asciicast;
mod error;

use std::fs;
use std::path::Path;
use std::time::Duration;

pub use error::SessionError;

/// A chunk of terminal output and the moment it became available.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    /// Elapsed time since the start of the session
    pub offset: Duration,
    /// Raw output bytes, written to the terminal verbatim
    pub chunk: Vec<u8>,
}

impl Event {
    pub fn new(offset: Duration, chunk: impl Into<Vec<u8>>) -> Self {
        Self {
            offset,
            chunk: chunk.into(),
        }
    }
}

/// Descriptive information carried alongside the event log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionMeta {
    /// Recorded terminal width
    pub width: u16,
    /// Recorded terminal height
    pub height: u16,
    pub title: Option<String>,
    pub command: Option<String>,
    /// Unix timestamp of the recording, when the recorder stored one
    pub timestamp: Option<i64>,
}

impl Default for SessionMeta {
    fn default() -> Self {
        Self {
            width: 80,
            height: 24,
            title: None,
            command: None,
            timestamp: None,
        }
    }
}

/// An ordered, validated event log.
///
/// Invariants:
/// - offsets are non-decreasing (ties replay in log order)
/// - `duration >= events[last].offset`
#[derive(Debug, Clone)]
pub struct Session {
    events: Vec<Event>,
    duration: Duration,
    meta: SessionMeta,
}

impl Session {
    /// Build a session whose duration is the offset of its final event.
    pub fn new(events: Vec<Event>) -> Result<Self, SessionError> {
        let last = events.last().map(|e| e.offset).unwrap_or_default();
        Self::with_duration(events, last)
    }

    /// Build a session with an explicitly supplied total length.
    pub fn with_duration(events: Vec<Event>, duration: Duration) -> Result<Self, SessionError> {
        validate(&events)?;

        // validate() rejected the empty case
        let last = events.last().map(|e| e.offset).unwrap_or_default();
        if duration < last {
            return Err(SessionError::DurationTooShort { duration, last });
        }

        Ok(Self {
            events,
            duration,
            meta: SessionMeta::default(),
        })
    }

    /// A session with no output at all.
    ///
    /// Recorded logs never produce this (an empty log is rejected), but a
    /// caller may still want a player for a recording that printed nothing.
    /// Such a player ends on its first play attempt.
    pub fn empty(duration: Duration) -> Self {
        Self {
            events: Vec::new(),
            duration,
            meta: SessionMeta::default(),
        }
    }

    pub fn with_meta(mut self, meta: SessionMeta) -> Self {
        self.meta = meta;
        self
    }

    /// Load a recorded session from a file (asciicast v1 or v3).
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SessionError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::parse_str(&content)
    }

    /// Parse a recorded session from its textual form.
    pub fn parse_str(content: &str) -> Result<Self, SessionError> {
        asciicast::parse(content)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Event> {
        self.events.get(index)
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn meta(&self) -> &SessionMeta {
        &self.meta
    }

    /// Number of events whose offset is at or before `time`.
    pub fn count_at(&self, time: Duration) -> usize {
        self.events.partition_point(|e| e.offset <= time)
    }

    /// Total number of output bytes across all events.
    pub fn output_bytes(&self) -> usize {
        self.events.iter().map(|e| e.chunk.len()).sum()
    }

    /// Concatenated output of `events[..count]`.
    pub fn prefix_output(&self, count: usize) -> Vec<u8> {
        self.events
            .iter()
            .take(count)
            .flat_map(|e| e.chunk.iter().copied())
            .collect()
    }
}

fn validate(events: &[Event]) -> Result<(), SessionError> {
    if events.is_empty() {
        return Err(SessionError::Empty);
    }

    for (index, pair) in events.windows(2).enumerate() {
        if pair[1].offset < pair[0].offset {
            return Err(SessionError::NonMonotonic {
                index: index + 1,
                offset: pair[1].offset,
                previous: pair[0].offset,
            });
        }
    }

    Ok(())
}
