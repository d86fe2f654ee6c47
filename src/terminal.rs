//! Terminal collaborator.
//!
//! The engine only ever pushes to a terminal: it opens it once with the
//! recorded geometry, writes replayed output, and clears/resets it when a
//! seek has to rebuild the screen from the start. It never reads back.

use std::io::{self, Write};

use crossterm::{cursor, queue, style, terminal};

/// Destination for replayed output.
pub trait Terminal {
    /// Prepare the terminal for a recording of the given size.
    fn open(&mut self, cols: u16, rows: u16) -> io::Result<()>;

    /// Write a chunk of recorded output verbatim.
    fn write(&mut self, chunk: &[u8]) -> io::Result<()>;

    /// Erase the visible screen.
    fn clear(&mut self) -> io::Result<()>;

    /// Return to the initial terminal state (attributes, cursor).
    fn reset(&mut self) -> io::Result<()>;
}

/// Terminal that replays onto a real screen through crossterm.
///
/// The bottom `reserved_rows` of the screen are kept out of the scroll
/// region so a status line can live there undisturbed.
pub struct ScreenTerminal<W: Write> {
    out: W,
    reserved_rows: u16,
}

impl<W: Write> ScreenTerminal<W> {
    pub fn new(out: W, reserved_rows: u16) -> Self {
        Self { out, reserved_rows }
    }

    /// Drop the scroll region restriction set by `open`.
    pub fn release(&mut self) -> io::Result<()> {
        self.out.write_all(b"\x1b[r")?;
        queue!(self.out, style::ResetColor, cursor::Show)?;
        self.out.flush()
    }
}

impl<W: Write> Terminal for ScreenTerminal<W> {
    fn open(&mut self, cols: u16, rows: u16) -> io::Result<()> {
        tracing::debug!(cols, rows, "opening screen terminal");
        let (_, screen_rows) = terminal::size()?;
        let bottom = screen_rows.saturating_sub(self.reserved_rows).max(1);
        // DECSTBM: confine scrolling above the reserved rows
        write!(self.out, "\x1b[1;{}r", bottom)?;
        self.clear()
    }

    fn write(&mut self, chunk: &[u8]) -> io::Result<()> {
        if chunk.is_empty() {
            return Ok(());
        }
        self.out.write_all(chunk)?;
        self.out.flush()
    }

    fn clear(&mut self) -> io::Result<()> {
        queue!(
            self.out,
            terminal::Clear(terminal::ClearType::All),
            cursor::MoveTo(0, 0)
        )?;
        self.out.flush()
    }

    fn reset(&mut self) -> io::Result<()> {
        queue!(
            self.out,
            style::SetAttribute(style::Attribute::Reset),
            style::ResetColor,
            cursor::MoveTo(0, 0),
            cursor::Show
        )?;
        self.out.flush()
    }
}

/// Terminal that records every call in memory.
///
/// `screen()` is the output written since the last clear, i.e. what a real
/// terminal would currently be showing.
#[derive(Debug, Clone, Default)]
pub struct CaptureTerminal {
    /// Geometry passed to `open`
    pub geometry: Option<(u16, u16)>,
    /// Every byte ever written
    pub output: Vec<u8>,
    /// Bytes written since the last clear
    pub since_clear: Vec<u8>,
    pub writes: usize,
    pub clears: usize,
    pub resets: usize,
}

impl CaptureTerminal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn screen(&self) -> &[u8] {
        &self.since_clear
    }

    pub fn screen_text(&self) -> String {
        String::from_utf8_lossy(&self.since_clear).into_owned()
    }
}

impl Terminal for CaptureTerminal {
    fn open(&mut self, cols: u16, rows: u16) -> io::Result<()> {
        self.geometry = Some((cols, rows));
        Ok(())
    }

    fn write(&mut self, chunk: &[u8]) -> io::Result<()> {
        self.output.extend_from_slice(chunk);
        self.since_clear.extend_from_slice(chunk);
        self.writes += 1;
        Ok(())
    }

    fn clear(&mut self) -> io::Result<()> {
        self.since_clear.clear();
        self.clears += 1;
        Ok(())
    }

    fn reset(&mut self) -> io::Result<()> {
        self.resets += 1;
        Ok(())
    }
}
