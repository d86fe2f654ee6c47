//! Seek position reporting.
//!
//! While playing, the clock is sampled on a fixed interval and pushed to
//! the position display (a slider or progress bar). A display that turns
//! every value change into a change notification would otherwise feed the
//! engine's own updates back to it as user seeks, so each programmatic
//! update runs under an [`EchoGuard`].

use std::cell::Cell;
use std::io;
use std::rc::Rc;
use std::time::Duration;

use crate::scheduler::{TimerHandle, TimerId, TimerKind, TimerQueue};

/// Something that shows the current playback position.
pub trait PositionDisplay {
    /// Move the display to `position`.
    fn set_value(&mut self, position: Duration) -> io::Result<()>;

    /// Update the upper bound of the display range.
    fn set_max(&mut self, _max: Duration) -> io::Result<()> {
        Ok(())
    }
}

/// Shared flag telling gesture handlers to ignore echoes of programmatic
/// display updates.
///
/// Display implementations that raise change notifications synchronously
/// can hold a clone and consult [`EchoSuppressor::is_suppressed`].
#[derive(Debug, Clone, Default)]
pub struct EchoSuppressor {
    pending: Rc<Cell<usize>>,
}

impl EchoSuppressor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Suppress echoes of the next `updates` programmatic updates, until
    /// the returned guard is dropped.
    pub fn suppress(&self, updates: usize) -> EchoGuard {
        self.pending.set(self.pending.get() + updates);
        EchoGuard {
            pending: Rc::clone(&self.pending),
            updates,
        }
    }

    pub fn is_suppressed(&self) -> bool {
        self.pending.get() > 0
    }
}

/// Releases its suppression on drop, including when the update it
/// guarded failed.
#[derive(Debug)]
pub struct EchoGuard {
    pending: Rc<Cell<usize>>,
    updates: usize,
}

impl Drop for EchoGuard {
    fn drop(&mut self) {
        self.pending
            .set(self.pending.get().saturating_sub(self.updates));
    }
}

/// Periodic sampler feeding the position display.
#[derive(Debug)]
pub struct SeekReporter {
    interval: Duration,
    pending: Option<TimerHandle>,
    echo: EchoSuppressor,
}

impl SeekReporter {
    pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(100);

    /// Sampler firing every `interval`, never more often than every 1ms.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval: interval.max(Duration::from_millis(1)),
            pending: None,
            echo: EchoSuppressor::new(),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn echo(&self) -> &EchoSuppressor {
        &self.echo
    }

    /// Arm the next sample one interval from `now`.
    pub fn start(&mut self, timers: &mut TimerQueue, now: Duration) {
        self.stop(timers);
        self.pending = Some(timers.schedule(TimerKind::Report, now, self.interval));
    }

    pub fn stop(&mut self, timers: &mut TimerQueue) {
        if let Some(handle) = self.pending.take() {
            timers.cancel(&handle);
        }
    }

    pub fn is_running(&self) -> bool {
        self.pending.is_some()
    }

    /// Acknowledge a fired sample. False for a sample this reporter no
    /// longer owns.
    pub fn fired(&mut self, id: TimerId) -> bool {
        match self.pending {
            Some(handle) if handle.id() == id => {
                self.pending = None;
                true
            }
            _ => false,
        }
    }

    /// Push a position to the display with echo suppression held.
    pub fn publish<D: PositionDisplay + ?Sized>(
        &self,
        display: &mut D,
        position: Duration,
    ) -> io::Result<()> {
        let _guard = self.echo.suppress(1);
        tracing::trace!(position_ms = position.as_millis() as u64, "position published");
        display.set_value(position)
    }
}

impl Default for SeekReporter {
    fn default() -> Self {
        Self::new(Self::DEFAULT_INTERVAL)
    }
}


#[cfg(test)]
mod tests {
    use super::testing::RecordingDisplay;
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn zero_interval_is_raised_to_one_millisecond() {
        assert_eq!(SeekReporter::new(Duration::ZERO).interval(), ms(1));
        assert_eq!(SeekReporter::new(ms(250)).interval(), ms(250));
    }

    #[test]
    fn guard_releases_on_drop() {
        let echo = EchoSuppressor::new();
        {
            let _guard = echo.suppress(1);
            assert!(echo.is_suppressed());
        }
        assert!(!echo.is_suppressed());
    }

    #[test]
    fn nested_guards_release_independently() {
        let echo = EchoSuppressor::new();
        let outer = echo.suppress(2);
        let inner = echo.suppress(1);
        drop(inner);
        assert!(echo.is_suppressed());
        drop(outer);
        assert!(!echo.is_suppressed());
    }

    #[test]
    fn publish_suppresses_echo_during_update() {
        let reporter = SeekReporter::default();
        let mut display = RecordingDisplay {
            echo: Some(reporter.echo().clone()),
            ..Default::default()
        };

        reporter.publish(&mut display, ms(300)).unwrap();

        assert_eq!(display.values, vec![ms(300)]);
        assert_eq!(display.suppressed, vec![true]);
        assert!(!reporter.echo().is_suppressed());
    }

    #[test]
    fn failed_update_still_releases_suppression() {
        let reporter = SeekReporter::default();
        let mut display = RecordingDisplay {
            fail: true,
            ..Default::default()
        };

        assert!(reporter.publish(&mut display, ms(300)).is_err());
        assert!(!reporter.echo().is_suppressed());
    }

    #[test]
    fn samples_on_fixed_interval() {
        let mut timers = TimerQueue::new();
        let mut reporter = SeekReporter::default();

        reporter.start(&mut timers, ms(40));
        assert_eq!(timers.next_deadline(), Some(ms(140)));

        let (id, kind) = timers.pop_due(ms(140)).unwrap();
        assert_eq!(kind, TimerKind::Report);
        assert!(reporter.fired(id));
        assert!(!reporter.is_running());
    }

    #[test]
    fn stop_cancels_pending_sample() {
        let mut timers = TimerQueue::new();
        let mut reporter = SeekReporter::default();
        reporter.start(&mut timers, ms(0));
        reporter.stop(&mut timers);
        assert!(timers.is_empty());
    }
}
