//! Deletion confirmation.
//!
//! [`TerminalPrompt`] lists the files about to be removed on stderr and
//! reads a single key press in raw mode: `y` or `Y` accepts, anything else
//! declines. When stdin is not a terminal a line is read instead.
//! [`AutoConfirm`] accepts without asking (`--yes`).

use std::io::{self, BufRead, IsTerminal, Write};
use std::path::PathBuf;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal;
use thiserror::Error;

/// Errors from the confirmation prompt.
#[derive(Debug, Error)]
pub enum PromptError {
    /// Terminal or stream I/O failed.
    #[error("prompt I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Something that can approve a deletion.
pub trait Confirm {
    /// Ask whether `paths` may be removed.
    ///
    /// # Errors
    ///
    /// Returns `PromptError` if the answer cannot be read.
    fn confirm(&mut self, paths: &[PathBuf]) -> Result<bool, PromptError>;
}

/// Accepts every request.
#[derive(Debug, Default, Clone, Copy)]
pub struct AutoConfirm;

impl Confirm for AutoConfirm {
    fn confirm(&mut self, paths: &[PathBuf]) -> Result<bool, PromptError> {
        log::debug!("Auto-confirming deletion of {} file(s)", paths.len());
        Ok(true)
    }
}

/// Interactive `Delete? (y/N)` prompt on the controlling terminal.
#[derive(Debug, Default)]
pub struct TerminalPrompt;

/// Disables raw mode when dropped, so the terminal is restored on every path.
struct RawModeGuard;

impl RawModeGuard {
    fn enable() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

/// Whether a key press counts as "yes".
#[must_use]
pub fn is_affirmative(key: &KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('y') | KeyCode::Char('Y'))
        && !key.modifiers.contains(KeyModifiers::CONTROL)
}

/// Whether a typed line counts as "yes": any answer starting with `y` or `Y`.
#[must_use]
pub fn is_affirmative_line(line: &str) -> bool {
    matches!(line.trim_start().chars().next(), Some('y' | 'Y'))
}

impl TerminalPrompt {
    fn read_key() -> Result<bool, PromptError> {
        let _guard = RawModeGuard::enable()?;
        loop {
            if let Event::Key(key) = event::read()? {
                // Windows reports releases too.
                if key.kind == KeyEventKind::Press {
                    return Ok(is_affirmative(&key));
                }
            }
        }
    }

    fn read_line() -> Result<bool, PromptError> {
        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
        Ok(is_affirmative_line(&line))
    }
}

impl Confirm for TerminalPrompt {
    fn confirm(&mut self, paths: &[PathBuf]) -> Result<bool, PromptError> {
        let mut err = io::stderr().lock();
        writeln!(
            err,
            "The following {} file(s) will be deleted:",
            paths.len()
        )?;
        for path in paths {
            writeln!(err, "  {}", path.display())?;
        }
        write!(err, "Delete? (y/N) ")?;
        err.flush()?;

        let accepted = if io::stdin().is_terminal() {
            Self::read_key()?
        } else {
            Self::read_line()?
        };

        writeln!(err, "{}", if accepted { "y" } else { "n" })?;
        log::debug!("Deletion prompt answered: {}", accepted);
        Ok(accepted)
    }
}
