//! Deferred calls and the replay tick scheduler.
//!
//! Everything runs on one thread. Deferred work is registered in a
//! [`TimerQueue`], which the host loop drains when wall time passes the
//! earliest deadline. Each registration hands back a [`TimerHandle`] that
//! remembers when it was armed and for how long, so the remaining time of
//! a pending call can be asked of the handle itself.

use std::collections::BTreeMap;
use std::time::Duration;

use crate::cursor::Residual;

/// Identity of one scheduled call. Never reused within a queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(u64);

/// What a timer does when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    /// Replay the next event
    Tick,
    /// Sample the clock for the position display
    Report,
}

/// A pending deferred call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerHandle {
    id: TimerId,
    armed_at: Duration,
    delay: Duration,
}

impl TimerHandle {
    pub fn id(&self) -> TimerId {
        self.id
    }

    pub fn armed_at(&self) -> Duration {
        self.armed_at
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn deadline(&self) -> Duration {
        self.armed_at + self.delay
    }

    /// Time left before this call is due; zero once it is late.
    pub fn remaining(&self, now: Duration) -> Duration {
        self.deadline().saturating_sub(now)
    }
}

/// Single-threaded registry of deferred calls, ordered by deadline.
///
/// Calls with equal deadlines fire in the order they were scheduled.
#[derive(Debug, Default)]
pub struct TimerQueue {
    next_id: u64,
    pending: BTreeMap<(Duration, TimerId), TimerKind>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, kind: TimerKind, now: Duration, delay: Duration) -> TimerHandle {
        let id = TimerId(self.next_id);
        self.next_id += 1;

        let handle = TimerHandle {
            id,
            armed_at: now,
            delay,
        };
        self.pending.insert((handle.deadline(), id), kind);
        handle
    }

    /// Prevent a pending call from firing. Returns false if it already
    /// fired or was cancelled.
    pub fn cancel(&mut self, handle: &TimerHandle) -> bool {
        self.pending
            .remove(&(handle.deadline(), handle.id))
            .is_some()
    }

    pub fn next_deadline(&self) -> Option<Duration> {
        self.pending.keys().next().map(|(deadline, _)| *deadline)
    }

    /// Remove and return the earliest call due at `now`, if any.
    pub fn pop_due(&mut self, now: Duration) -> Option<(TimerId, TimerKind)> {
        let (&(deadline, id), _) = self.pending.iter().next()?;
        if deadline > now {
            return None;
        }
        self.pending
            .remove(&(deadline, id))
            .map(|kind| (id, kind))
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

/// Keeps at most one replay tick pending.
///
/// Each tick is re-armed from the delay the cursor computes against the
/// live clock, never from an accumulated nominal schedule, so timer
/// lateness is absorbed on the very next tick.
#[derive(Debug, Default)]
pub struct Scheduler {
    pending: Option<TimerHandle>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm the next tick, replacing any tick already pending.
    pub fn arm(&mut self, timers: &mut TimerQueue, now: Duration, delay: Duration) -> TimerHandle {
        self.cancel(timers);
        let handle = timers.schedule(TimerKind::Tick, now, delay);
        tracing::trace!(delay_ms = delay.as_millis() as u64, "tick armed");
        self.pending = Some(handle);
        handle
    }

    /// Arm the next tick from a residual. Events already overdue fire
    /// immediately.
    pub fn arm_residual(
        &mut self,
        timers: &mut TimerQueue,
        now: Duration,
        residual: Residual,
    ) -> TimerHandle {
        if let Residual::Behind(late) = residual {
            if late >= Duration::from_secs(1) {
                tracing::warn!(late_ms = late.as_millis() as u64, "replay is running behind");
            }
        }
        self.arm(timers, now, residual.delay())
    }

    /// Capture the remaining delay of the pending tick and cancel it.
    ///
    /// The remaining time comes from the handle, not from event offsets,
    /// so a pause/resume cycle keeps the replay timeline where it was.
    pub fn pause(&mut self, timers: &mut TimerQueue, now: Duration) -> Option<Duration> {
        let handle = self.pending.take()?;
        let remaining = handle.remaining(now);
        timers.cancel(&handle);
        tracing::debug!(remaining_ms = remaining.as_millis() as u64, "tick paused");
        Some(remaining)
    }

    pub fn cancel(&mut self, timers: &mut TimerQueue) {
        if let Some(handle) = self.pending.take() {
            timers.cancel(&handle);
        }
    }

    /// Acknowledge a fired tick. False for a tick this scheduler no longer
    /// owns.
    pub fn fired(&mut self, id: TimerId) -> bool {
        match self.pending {
            Some(handle) if handle.id == id => {
                self.pending = None;
                true
            }
            _ => false,
        }
    }

    pub fn is_armed(&self) -> bool {
        self.pending.is_some()
    }

    pub fn remaining(&self, now: Duration) -> Option<Duration> {
        self.pending.map(|h| h.remaining(now))
    }
}
