//! Interactive terminal player.
//!
//! Hosts a [`Player`] on the current terminal: recorded output is replayed
//! above a one-line progress bar, keyboard input is mapped to player
//! intents, and the loop sleeps exactly until the next pending timer.
//!
//! There is no narration track here, so playback always runs on a free
//! clock.

mod input;

pub use input::{handle_key_event, InputResult};

use std::io::{self, Stdout};
use std::rc::Rc;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::{cursor, execute, terminal};

use crate::clock::{MonotonicTime, TimeSource};
use crate::config::PlayerConfig;
use crate::render::ProgressBar;
use crate::session::Session;
use crate::terminal::ScreenTerminal;
use crate::transport::{Player, PlayerOptions, TransportState};

/// How long to wait for input when no timer is pending.
const IDLE_POLL: Duration = Duration::from_millis(250);

/// Rows kept free below the replayed output.
const STATUS_ROWS: u16 = 1;

/// How an interactive session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackResult {
    /// The user quit after the recording played to its end
    Finished,
    /// The user quit before the end
    Interrupted,
}

/// Puts the terminal in raw mode on the alternate screen for its lifetime.
struct ScreenGuard;

impl ScreenGuard {
    fn enter() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        execute!(io::stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;
        Ok(Self)
    }
}

impl Drop for ScreenGuard {
    fn drop(&mut self) {
        let _ = execute!(io::stdout(), cursor::Show, terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

/// Play a session interactively until the user quits.
#[cfg(not(tarpaulin_include))]
pub fn play_session(session: Session, config: &PlayerConfig) -> Result<PlaybackResult> {
    let _guard = ScreenGuard::enter().context("Failed to prepare terminal")?;

    let (cols, rows) = terminal::size().context("Failed to query terminal size")?;
    let time: Rc<dyn TimeSource> = Rc::new(MonotonicTime::new());
    let screen = ScreenTerminal::new(io::stdout(), STATUS_ROWS);
    let bar = ProgressBar::new(io::stdout(), cols, rows.saturating_sub(STATUS_ROWS));

    let mut player = Player::with_free_clock(
        session,
        screen,
        bar,
        time,
        PlayerOptions::from(config),
    )?;

    if config.autoplay {
        player.toggle()?;
    }

    let result = run_loop(&mut player, config.seek_step());
    player.terminal_mut().release()?;
    result
}

#[cfg(not(tarpaulin_include))]
fn run_loop(
    player: &mut Player<ScreenTerminal<Stdout>, ProgressBar<Stdout>>,
    step: Duration,
) -> Result<PlaybackResult> {
    loop {
        let label = player.state().label();
        player.display_mut().set_label(label)?;

        let timeout = player.time_until_next().unwrap_or(IDLE_POLL);
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if handle_key_event(key, player, step)? == InputResult::Quit {
                        let result = if player.state() == TransportState::Ended {
                            PlaybackResult::Finished
                        } else {
                            PlaybackResult::Interrupted
                        };
                        tracing::debug!(?result, "player closed");
                        return Ok(result);
                    }
                }
                Event::Resize(cols, rows) => {
                    player
                        .display_mut()
                        .relocate(cols, rows.saturating_sub(STATUS_ROWS))?;
                }
                _ => {} // Ignore focus events, etc.
            }
        }

        player.fire_due()?;
    }
}
