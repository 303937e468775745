//! Owns the player's terminal while a session runs
//!
//! The board is drawn on the alternate screen in raw mode so single key
//! presses reach the coordinator. Whatever happens, the shell gets its
//! normal screen back when `Tui` goes out of scope.

use crossterm::{
    cursor, execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use std::io::{self, stdout, Stdout, Write};

/// ASCII BEL, the only sound a plain terminal can make.
const BELL: &[u8] = b"\x07";

pub struct Tui {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    active: bool,
}

impl Tui {
    pub fn new() -> io::Result<Self> {
        let terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
        Ok(Self {
            terminal,
            active: false,
        })
    }

    /// Switch to the game screen: raw keys, hidden cursor, blank canvas.
    pub fn enter(&mut self) -> io::Result<()> {
        enable_raw_mode()?;
        self.active = true;
        execute!(stdout(), EnterAlternateScreen, cursor::Hide)?;
        self.terminal.clear()
    }

    /// Give the shell its screen back. Calling it twice is harmless.
    pub fn exit(&mut self) -> io::Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        execute!(stdout(), cursor::Show, LeaveAlternateScreen)?;
        disable_raw_mode()
    }

    pub fn draw<F>(&mut self, render: F) -> io::Result<()>
    where
        F: FnOnce(&mut Frame),
    {
        self.terminal.draw(render).map(|_| ())
    }

    /// Sound effect for a hit or a miss.
    pub fn bell(&mut self) -> io::Result<()> {
        let mut out = stdout();
        out.write_all(BELL)?;
        out.flush()
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        if let Err(e) = self.exit() {
            tracing::warn!(error = %e, "could not restore terminal");
        }
    }
}
