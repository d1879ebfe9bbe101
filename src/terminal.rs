use std::{
    io::{self, stdout, Stdout, Write},
    ops::{Deref, DerefMut},
};

use crossterm::{
    cursor::{Hide, Show},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};

use ratatui::{self, backend::CrosstermBackend};
use tracing::warn;

use crate::error::{Error, Result};

type TerminalBackend<W> = ratatui::Terminal<CrosstermBackend<W>>;

/// Owns the screen while the picker runs. Dropping it gives the terminal back.
pub struct Terminal<W: Write> {
    inner: TerminalBackend<W>,
}

impl Terminal<Stdout> {
    pub fn new() -> Result<Self> {
        enable_raw_mode().map_err(Error::Ui)?;
        // raw mode is already on, so undo it if the rest of the setup fails
        Self::enter().map_err(|err| {
            let _ = restore_terminal();
            Error::Ui(err)
        })
    }

    fn enter() -> io::Result<Self> {
        let mut stdout = stdout();
        execute!(stdout, EnterAlternateScreen, Hide)?;

        let backend = CrosstermBackend::new(stdout);
        let terminal = ratatui::Terminal::new(backend)?;

        Ok(Self { inner: terminal })
    }
}

impl<W: Write> Deref for Terminal<W> {
    type Target = TerminalBackend<W>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl<W: Write> DerefMut for Terminal<W> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.inner
    }
}

impl<W: Write> Drop for Terminal<W> {
    fn drop(&mut self) {
        if let Err(err) = restore_terminal() {
            warn!(error = %err, "failed to restore terminal");
        }
    }
}

fn restore_terminal() -> io::Result<()> {
    let screen = execute!(stdout(), LeaveAlternateScreen, Show);
    let raw = disable_raw_mode();
    screen.and(raw)
}
