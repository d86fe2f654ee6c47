//! Time sources for playback.
//!
//! Two layers live here:
//!
//! - [`TimeSource`]: raw monotonic wall time. The system implementation
//!   backs real playback; [`ManualTime`] lets tests step time by hand.
//! - [`ClockSource`]: the playback-relative "current time" the engine
//!   synchronizes to. A [`FreeClock`] advances on its own from wall time;
//!   a [`MediaClock`] follows the position of a narration track.
//!
//! A player picks exactly one clock source at construction and keeps it
//! for the lifetime of the session.

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Monotonic wall time, measured from an arbitrary origin.
pub trait TimeSource {
    fn now(&self) -> Duration;
}

/// Wall time backed by `std::time::Instant`.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicTime {
    origin: Instant,
}

impl MonotonicTime {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicTime {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for MonotonicTime {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Hand-driven wall time. Clones share the same reading.
#[derive(Debug, Clone, Default)]
pub struct ManualTime {
    now: Rc<Cell<Duration>>,
}

impl ManualTime {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }

    pub fn set(&self, to: Duration) {
        self.now.set(to);
    }
}

impl TimeSource for ManualTime {
    fn now(&self) -> Duration {
        self.now.get()
    }
}

/// Playback-relative time the engine replays against.
pub trait ClockSource {
    /// Current position on the playback timeline.
    fn now(&self) -> Duration;

    /// Begin advancing.
    fn start(&mut self);

    /// Stop advancing. `now()` stays frozen at the returned value.
    fn stop(&mut self) -> Duration;

    /// Reposition so that a subsequent `now()` reports `position`.
    fn seek_to(&mut self, position: Duration);

    fn is_running(&self) -> bool;

    /// Whether the clock has run off the end of its timeline on its own.
    ///
    /// Media clocks report their end through the media's `ended`
    /// notification instead and always return false here.
    fn at_end(&self) -> bool {
        false
    }

    /// Length of the external timeline, when the clock follows one.
    fn media_duration(&self) -> Option<Duration> {
        None
    }
}

/// Clock that advances from a captured start instant.
///
/// `now() = wall_now - started_at + accumulated`, where `accumulated`
/// holds the position reached before the last start (or set by a seek).
pub struct FreeClock {
    time: Rc<dyn TimeSource>,
    started_at: Option<Duration>,
    accumulated: Duration,
    end: Duration,
}

impl FreeClock {
    /// Create a stopped clock at zero that ends once it reaches `end`.
    pub fn new(time: Rc<dyn TimeSource>, end: Duration) -> Self {
        Self {
            time,
            started_at: None,
            accumulated: Duration::ZERO,
            end,
        }
    }
}

impl ClockSource for FreeClock {
    fn now(&self) -> Duration {
        match self.started_at {
            Some(start) => self.time.now().saturating_sub(start) + self.accumulated,
            None => self.accumulated,
        }
    }

    fn start(&mut self) {
        if self.started_at.is_none() {
            self.started_at = Some(self.time.now());
        }
    }

    fn stop(&mut self) -> Duration {
        self.accumulated = self.now();
        self.started_at = None;
        self.accumulated
    }

    fn seek_to(&mut self, position: Duration) {
        self.accumulated = position;
        if self.started_at.is_some() {
            self.started_at = Some(self.time.now());
        }
    }

    fn is_running(&self) -> bool {
        self.started_at.is_some()
    }

    fn at_end(&self) -> bool {
        self.now() >= self.end
    }
}

/// The narration track a [`MediaClock`] follows.
///
/// Mirrors a media element: positions are in seconds, and the element
/// owns its own notion of playing vs paused.
pub trait Media {
    fn play(&mut self);
    fn pause(&mut self);
    /// Current playback position in seconds.
    fn current_time(&self) -> f64;
    fn set_current_time(&mut self, seconds: f64);
    /// Length in seconds, once known.
    fn duration(&self) -> Option<f64>;
}

/// Clock that delegates to an external media position.
pub struct MediaClock<M: Media> {
    media: M,
    running: bool,
}

impl<M: Media> MediaClock<M> {
    pub fn new(media: M) -> Self {
        Self {
            media,
            running: false,
        }
    }

    pub fn media(&self) -> &M {
        &self.media
    }
}

impl<M: Media> ClockSource for MediaClock<M> {
    fn now(&self) -> Duration {
        secs_to_duration(self.media.current_time())
    }

    fn start(&mut self) {
        self.media.play();
        self.running = true;
    }

    fn stop(&mut self) -> Duration {
        let position = self.now();
        self.media.pause();
        self.running = false;
        position
    }

    fn seek_to(&mut self, position: Duration) {
        self.media.set_current_time(position.as_secs_f64());
    }

    fn is_running(&self) -> bool {
        self.running
    }

    fn media_duration(&self) -> Option<Duration> {
        self.media.duration().map(secs_to_duration)
    }
}

/// Seconds to `Duration`; negative or non-finite readings become zero.
fn secs_to_duration(seconds: f64) -> Duration {
    Duration::try_from_secs_f64(seconds).unwrap_or(Duration::ZERO)
}
