//! Transport state machine and the player engine.
//!
//! [`Player`] owns the session, the playback cursor, the clock source and
//! every pending timer, and is the only thing that mutates them. It is
//! driven from a single thread by two kinds of calls:
//!
//! - user intent: [`Player::toggle`], [`Player::seek`], and the slider
//!   gestures [`Player::on_slide`] / [`Player::on_slide_end`];
//! - the host loop: [`Player::fire_due`] whenever wall time reaches
//!   [`Player::next_deadline`], plus the media notifications when a
//!   narration track backs the clock.
//!
//! Pausing or seeking always cancels the in-flight tick before the cursor
//! is touched, so a stale tick can never write into a screen that has
//! since been rebuilt.

use std::io;
use std::rc::Rc;
use std::time::Duration;

use crate::clock::{ClockSource, FreeClock, Media, MediaClock, TimeSource};
use crate::config::PlayerConfig;
use crate::cursor::PlaybackCursor;
use crate::reporter::{EchoSuppressor, PositionDisplay, SeekReporter};
use crate::scheduler::{Scheduler, TimerKind, TimerQueue};
use crate::session::Session;
use crate::terminal::Terminal;

/// Where the transport is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportState {
    Paused,
    Playing,
    /// Terminal until the next toggle restarts from zero
    Ended,
}

impl TransportState {
    pub fn label(self) -> &'static str {
        match self {
            Self::Paused => "paused",
            Self::Playing => "playing",
            Self::Ended => "ended",
        }
    }
}

/// Tunables for a [`Player`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerOptions {
    /// Period of the seek position reporter
    pub report_interval: Duration,
}

impl Default for PlayerOptions {
    fn default() -> Self {
        Self {
            report_interval: SeekReporter::DEFAULT_INTERVAL,
        }
    }
}

impl From<&PlayerConfig> for PlayerOptions {
    fn from(config: &PlayerConfig) -> Self {
        Self {
            report_interval: config.report_interval(),
        }
    }
}

/// Replays a session against a terminal in step with a clock source.
pub struct Player<T: Terminal, D: PositionDisplay> {
    session: Session,
    terminal: T,
    display: D,
    time: Rc<dyn TimeSource>,
    clock: Box<dyn ClockSource>,
    cursor: PlaybackCursor,
    state: TransportState,
    timers: TimerQueue,
    scheduler: Scheduler,
    reporter: SeekReporter,
    /// Delay to arm the first tick with on the next resume
    residual: Duration,
    startable: bool,
    /// A slide gesture is in progress
    sliding: bool,
    max_seek: Duration,
}

impl<T: Terminal, D: PositionDisplay> Player<T, D> {
    /// Player without a narration track: time advances on its own and the
    /// player is startable immediately.
    pub fn with_free_clock(
        session: Session,
        terminal: T,
        display: D,
        time: Rc<dyn TimeSource>,
        options: PlayerOptions,
    ) -> io::Result<Self> {
        let clock = FreeClock::new(Rc::clone(&time), session.duration());
        let mut player = Self::new(session, terminal, display, time, Box::new(clock), options)?;
        player.startable = true;
        Ok(player)
    }

    /// Player synchronized to a narration track. It stays unstartable
    /// until [`Player::on_can_play_through`].
    pub fn with_media<M: Media + 'static>(
        session: Session,
        terminal: T,
        display: D,
        time: Rc<dyn TimeSource>,
        media: M,
        options: PlayerOptions,
    ) -> io::Result<Self> {
        let clock = MediaClock::new(media);
        Self::new(session, terminal, display, time, Box::new(clock), options)
    }

    fn new(
        session: Session,
        mut terminal: T,
        mut display: D,
        time: Rc<dyn TimeSource>,
        clock: Box<dyn ClockSource>,
        options: PlayerOptions,
    ) -> io::Result<Self> {
        let meta = session.meta();
        terminal.open(meta.width, meta.height)?;
        display.set_max(session.duration())?;

        tracing::debug!(
            events = session.len(),
            duration_ms = session.duration().as_millis() as u64,
            "player created"
        );

        Ok(Self {
            max_seek: session.duration(),
            session,
            terminal,
            display,
            time,
            clock,
            cursor: PlaybackCursor::new(),
            state: TransportState::Paused,
            timers: TimerQueue::new(),
            scheduler: Scheduler::new(),
            reporter: SeekReporter::new(options.report_interval),
            residual: Duration::ZERO,
            startable: false,
            sliding: false,
        })
    }

    // === Accessors ===

    pub fn state(&self) -> TransportState {
        self.state
    }

    pub fn is_startable(&self) -> bool {
        self.startable
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn cursor(&self) -> &PlaybackCursor {
        &self.cursor
    }

    pub fn terminal(&self) -> &T {
        &self.terminal
    }

    pub fn terminal_mut(&mut self) -> &mut T {
        &mut self.terminal
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }

    /// Current clock reading.
    pub fn position(&self) -> Duration {
        self.clock.now()
    }

    /// Delay the next resume will arm its first tick with.
    pub fn residual(&self) -> Duration {
        self.residual
    }

    /// Upper bound of the position display: the session duration, or the
    /// media duration once it is known. Seeks are bounded by the session.
    pub fn max_seek(&self) -> Duration {
        self.max_seek
    }

    /// Suppression flag shared with the position display.
    pub fn echo_suppressor(&self) -> EchoSuppressor {
        self.reporter.echo().clone()
    }

    /// Remaining time of the pending replay tick, if one is armed.
    pub fn pending_tick(&self) -> Option<Duration> {
        self.scheduler.remaining(self.time.now())
    }

    /// Earliest pending timer deadline, in wall time.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers.next_deadline()
    }

    /// Wall time left until the earliest pending timer.
    pub fn time_until_next(&self) -> Option<Duration> {
        self.next_deadline()
            .map(|deadline| deadline.saturating_sub(self.time.now()))
    }

    // === User intent ===

    /// Play if paused, pause if playing, restart if ended.
    ///
    /// Ignored until the player is startable.
    pub fn toggle(&mut self) -> io::Result<()> {
        if !self.startable {
            tracing::debug!("toggle ignored: not startable yet");
            return Ok(());
        }

        if self.state == TransportState::Ended {
            self.restart()?;
        }

        match self.state {
            TransportState::Playing => self.pause(),
            _ => self.play(),
        }
    }

    /// Pause if playing; otherwise do nothing.
    pub fn pause(&mut self) -> io::Result<()> {
        if self.state != TransportState::Playing {
            return Ok(());
        }

        self.reporter.stop(&mut self.timers);
        let now = self.time.now();
        self.residual = self
            .scheduler
            .pause(&mut self.timers, now)
            .unwrap_or(Duration::ZERO);
        let position = self.clock.stop();
        self.state = TransportState::Paused;

        tracing::debug!(
            position_ms = position.as_millis() as u64,
            residual_ms = self.residual.as_millis() as u64,
            "paused"
        );
        Ok(())
    }

    /// Reposition playback to `target`, leaving the transport paused.
    ///
    /// The target is clamped to the session duration, even when the media
    /// is shorter. A playing transport is paused first; an ended one
    /// becomes paused at the target.
    pub fn seek(&mut self, target: Duration) -> io::Result<()> {
        if !self.startable {
            tracing::debug!("seek ignored: not startable yet");
            return Ok(());
        }

        let target = target.min(self.session.duration());
        self.pause()?;
        self.scheduler.cancel(&mut self.timers);

        let advance = self
            .cursor
            .advance_to(&self.session, target, &mut self.terminal)?;
        self.clock.seek_to(target);
        self.residual = advance.residual.map(|r| r.delay()).unwrap_or_default();
        self.state = TransportState::Paused;
        self.reporter.publish(&mut self.display, target)?;

        tracing::debug!(
            target_ms = target.as_millis() as u64,
            rewound = advance.rewound,
            replayed = advance.replayed,
            residual_ms = self.residual.as_millis() as u64,
            "seek"
        );
        Ok(())
    }

    /// Seek relative to the current position.
    pub fn seek_by(&mut self, forward: bool, step: Duration) -> io::Result<()> {
        let position = self.clock.now();
        let target = if forward {
            position + step
        } else {
            position.saturating_sub(step)
        };
        self.seek(target)
    }

    /// Live drag of the position display.
    ///
    /// The first slide of a gesture pauses a playing transport. The display
    /// keeps whatever value the user dragged it to. Echoes of the engine's
    /// own display updates are ignored.
    pub fn on_slide(&mut self, value: Duration) -> io::Result<()> {
        if self.reporter.echo().is_suppressed() {
            return Ok(());
        }

        if !self.sliding {
            self.sliding = true;
            tracing::debug!(value_ms = value.as_millis() as u64, "slide started");
            if self.state == TransportState::Playing {
                self.pause()?;
            }
        }
        Ok(())
    }

    /// Commit of a slide gesture: seek to where the display was released.
    pub fn on_slide_end(&mut self, value: Duration) -> io::Result<()> {
        if self.reporter.echo().is_suppressed() {
            return Ok(());
        }

        self.sliding = false;
        self.seek(value)
    }

    // === Media notifications ===

    /// The media reported a (new) duration; it bounds seeking from now on.
    pub fn on_duration_change(&mut self) -> io::Result<()> {
        if let Some(duration) = self.clock.media_duration() {
            self.max_seek = duration;
            self.display.set_max(duration)?;
            tracing::debug!(duration_ms = duration.as_millis() as u64, "media duration");
        }
        Ok(())
    }

    /// The media can play through without stalling.
    pub fn on_can_play_through(&mut self) {
        if !self.startable {
            tracing::debug!("player startable");
        }
        self.startable = true;
    }

    /// The media played to its end.
    pub fn on_media_ended(&mut self) -> io::Result<()> {
        self.finish()
    }

    // === Host loop ===

    /// Run every timer whose deadline has passed, in deadline order.
    pub fn fire_due(&mut self) -> io::Result<()> {
        let now = self.time.now();
        while let Some((id, kind)) = self.timers.pop_due(now) {
            match kind {
                TimerKind::Tick => {
                    if self.scheduler.fired(id) {
                        self.tick()?;
                    }
                }
                TimerKind::Report => {
                    if self.reporter.fired(id) {
                        self.report()?;
                    }
                }
            }
        }
        Ok(())
    }

    // === Transitions ===

    fn play(&mut self) -> io::Result<()> {
        if self.session.is_empty() {
            tracing::debug!("empty session, nothing to play");
            return self.finish();
        }

        if self.cursor.index() == 0 {
            // Nothing replayed yet: wait for the first event's own offset
            if let Some(first) = self.session.get(0) {
                self.residual = first.offset.saturating_sub(self.clock.now());
            }
        }

        self.clock.start();
        let now = self.time.now();
        self.scheduler.arm(&mut self.timers, now, self.residual);
        self.reporter.start(&mut self.timers, now);
        self.state = TransportState::Playing;

        tracing::debug!(
            position_ms = self.clock.now().as_millis() as u64,
            residual_ms = self.residual.as_millis() as u64,
            "playing"
        );
        Ok(())
    }

    /// Leave `Ended` for a paused transport at zero with a blank screen.
    fn restart(&mut self) -> io::Result<()> {
        self.terminal.clear()?;
        self.terminal.reset()?;
        self.cursor.reset();
        self.clock.seek_to(Duration::ZERO);
        self.residual = Duration::ZERO;
        self.reporter.publish(&mut self.display, Duration::ZERO)?;
        self.state = TransportState::Paused;
        tracing::debug!("restarted");
        Ok(())
    }

    fn finish(&mut self) -> io::Result<()> {
        self.reporter.stop(&mut self.timers);
        self.scheduler.cancel(&mut self.timers);
        self.clock.stop();

        let end = self.session.duration();
        self.cursor
            .advance_to(&self.session, end, &mut self.terminal)?;
        self.residual = Duration::ZERO;
        self.sliding = false;
        self.state = TransportState::Ended;
        self.reporter.publish(&mut self.display, self.max_seek)?;

        tracing::debug!("ended");
        Ok(())
    }

    fn tick(&mut self) -> io::Result<()> {
        if self.state != TransportState::Playing {
            return Ok(());
        }

        let now = self.clock.now();
        let next = self
            .cursor
            .step_once(&self.session, now, &mut self.terminal)?;

        tracing::trace!(
            index = self.cursor.index(),
            clock_ms = now.as_millis() as u64,
            "tick"
        );

        if let Some(residual) = next {
            let wall = self.time.now();
            self.scheduler
                .arm_residual(&mut self.timers, wall, residual);
        }
        Ok(())
    }

    fn report(&mut self) -> io::Result<()> {
        if self.state != TransportState::Playing {
            return Ok(());
        }

        let position = self.clock.now().min(self.max_seek);
        self.reporter.publish(&mut self.display, position)?;

        if self.clock.at_end() {
            return self.finish();
        }

        let now = self.time.now();
        self.reporter.start(&mut self.timers, now);
        Ok(())
    }
}
