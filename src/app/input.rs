//! Keyboard input handling for the terminal player.
//!
//! Keys are translated into the same intents a graphical front end would
//! raise: a toggle, slider gestures, or direct seeks.

use std::io;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::reporter::PositionDisplay;
use crate::terminal::Terminal;
use crate::transport::Player;

/// Result of processing an input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputResult {
    /// Continue normal playback
    Continue,
    /// Exit the player
    Quit,
}

/// Handle a keyboard event.
///
/// # Arguments
/// * `key` - The key event
/// * `player` - The player receiving the intent
/// * `step` - Distance moved by one arrow key press
pub fn handle_key_event<T: Terminal, D: PositionDisplay>(
    key: KeyEvent,
    player: &mut Player<T, D>,
    step: Duration,
) -> io::Result<InputResult> {
    match key.code {
        // === Quit ===
        KeyCode::Char('q') | KeyCode::Esc => return Ok(InputResult::Quit),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            return Ok(InputResult::Quit)
        }

        // === Playback controls ===
        KeyCode::Char(' ') => player.toggle()?,

        // === Seeking ===
        KeyCode::Left | KeyCode::Char('<') | KeyCode::Char(',') => {
            let target = player.position().saturating_sub(step);
            slide_to(player, target)?;
        }
        KeyCode::Right | KeyCode::Char('>') | KeyCode::Char('.') => {
            let target = player.position() + step;
            slide_to(player, target)?;
        }
        KeyCode::Home => player.seek(Duration::ZERO)?,
        KeyCode::End => {
            let end = player.session().duration();
            player.seek(end)?;
        }

        _ => {}
    }

    Ok(InputResult::Continue)
}

/// A key press is a complete slide gesture: drag, then release.
fn slide_to<T: Terminal, D: PositionDisplay>(
    player: &mut Player<T, D>,
    target: Duration,
) -> io::Result<()> {
    player.on_slide(target)?;
    player.on_slide_end(target)
}
