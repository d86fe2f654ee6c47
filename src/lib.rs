//! castplay - replay recorded terminal sessions in sync with an optional
//! narration track.
//!
//! The core is the playback engine in [`transport`]: it maps a continuous
//! clock (a narration track's position, or free-running wall time) onto a
//! discrete, ordered log of terminal output, replays the right prefix of
//! that log at any moment, schedules the next event with drift correction,
//! and supports arbitrary seeking in both directions.
//!
//! # Architecture
//!
//! - `session`: the validated event log and its loaders
//! - `clock`: wall-time sources and the playback clock variants
//! - `cursor`: prefix replay and single-step advance
//! - `scheduler`: timer handles, the timer queue and the tick scheduler
//! - `reporter`: position display updates with echo suppression
//! - `transport`: the transport state machine (`Player`)
//! - `terminal`: the terminal the engine writes to
//! - `render`, `app`: the interactive terminal front end
//!
//! # Usage
//!
//! ```no_run
//! use std::rc::Rc;
//! use castplay::clock::MonotonicTime;
//! use castplay::render::ProgressBar;
//! use castplay::terminal::CaptureTerminal;
//! use castplay::{Player, PlayerOptions, Session};
//!
//! let session = Session::load("session.cast").unwrap();
//! let mut player = Player::with_free_clock(
//!     session,
//!     CaptureTerminal::new(),
//!     ProgressBar::new(std::io::sink(), 80, 23),
//!     Rc::new(MonotonicTime::new()),
//!     PlayerOptions::default(),
//! )
//! .unwrap();
//! player.toggle().unwrap();
//! ```

pub mod app;
pub mod cli;
pub mod clock;
pub mod config;
pub mod cursor;
pub mod render;
pub mod reporter;
pub mod scheduler;
pub mod session;
pub mod terminal;
pub mod transport;

pub use config::Config;
pub use session::{Event, Session, SessionError, SessionMeta};
pub use transport::{Player, PlayerOptions, TransportState};
