//! Playback cursor: how much of the event log has been replayed.
//!
//! The terminal always shows exactly the output of `events[..index]`.
//! Seeking forward appends the missing events; seeking backward clears the
//! terminal and replays the prefix from the start. Nothing is ever patched
//! or diffed, so the screen stays reproducible however erratically seeks
//! jump around.

use std::io;
use std::time::Duration;

use crate::session::Session;
use crate::terminal::Terminal;

/// Signed distance from a clock reading to the next event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Residual {
    /// The next event is still in the future
    Ahead(Duration),
    /// The clock has already passed the next event
    Behind(Duration),
}

impl Residual {
    /// Residual of an event due at `due`, seen from `now`.
    pub fn between(due: Duration, now: Duration) -> Self {
        match due.checked_sub(now) {
            Some(ahead) => Residual::Ahead(ahead),
            None => Residual::Behind(now - due),
        }
    }

    /// Delay to hand to a timer: overdue events fire immediately.
    pub fn delay(self) -> Duration {
        match self {
            Residual::Ahead(ahead) => ahead,
            Residual::Behind(_) => Duration::ZERO,
        }
    }
}

/// Outcome of [`PlaybackCursor::advance_to`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Advance {
    /// Whether the terminal was cleared and the prefix replayed from zero
    pub rewound: bool,
    /// Events written by this call
    pub replayed: usize,
    /// Time from the target to the next due event; `None` for an empty log
    pub residual: Option<Residual>,
}

/// Replay position within a session.
///
/// Invariant: `index == 0 || events[index - 1].offset <= elapsed`, and
/// `elapsed < events[index].offset` while an unreplayed event remains.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlaybackCursor {
    index: usize,
    elapsed: Duration,
}

impl PlaybackCursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of events already written to the terminal.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Offset of the last replayed event.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn is_exhausted(&self, session: &Session) -> bool {
        self.index >= session.len()
    }

    pub fn reset(&mut self) {
        self.index = 0;
        self.elapsed = Duration::ZERO;
    }

    /// Bring the terminal to the state it had at `target`.
    ///
    /// A target behind the last replayed event clears and resets the
    /// terminal first. All newly due chunks go out in a single write.
    /// The returned residual is measured to the next unreplayed event, or
    /// to the final event once the log is exhausted.
    pub fn advance_to<T: Terminal + ?Sized>(
        &mut self,
        session: &Session,
        target: Duration,
        terminal: &mut T,
    ) -> io::Result<Advance> {
        let events = session.events();
        let Some(last) = events.last() else {
            return Ok(Advance {
                rewound: false,
                replayed: 0,
                residual: None,
            });
        };

        let rewound = self.index > 0 && target < events[self.index - 1].offset;
        if rewound {
            terminal.clear()?;
            terminal.reset()?;
            self.reset();
        }

        let start = self.index;
        let mut output = Vec::new();
        while let Some(event) = events.get(self.index) {
            if event.offset > target {
                break;
            }
            output.extend_from_slice(&event.chunk);
            self.elapsed = event.offset;
            self.index += 1;
        }

        terminal.write(&output)?;

        // Past the end, measure against the final event
        let due = events.get(self.index).unwrap_or(last).offset;

        Ok(Advance {
            rewound,
            replayed: self.index - start,
            residual: Some(Residual::between(due, target)),
        })
    }

    /// Replay exactly one event during steady playback.
    ///
    /// `now` is the live clock reading; the residual to the following event
    /// is measured against it rather than against the nominal gap between
    /// offsets, which is what keeps timer lateness from accumulating.
    /// Returns `None` when there is nothing left to schedule.
    pub fn step_once<T: Terminal + ?Sized>(
        &mut self,
        session: &Session,
        now: Duration,
        terminal: &mut T,
    ) -> io::Result<Option<Residual>> {
        let Some(event) = session.get(self.index) else {
            return Ok(None);
        };

        terminal.write(&event.chunk)?;
        self.elapsed = event.offset;
        self.index += 1;

        Ok(session
            .get(self.index)
            .map(|next| Residual::between(next.offset, now)))
    }
}
