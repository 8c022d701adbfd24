//! Terminal driver for the TUI.
//!
//! Implements the [`Driver`] trait for terminal I/O using crossterm for
//! keyboard events and ratatui for rendering. The network side lives entirely
//! in the session driven by the runtime.

use std::io::{self, Stdout, stdout};

use crossterm::{
    ExecutableCommand,
    event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use thiserror::Error;
use xdchat_app::{App, AppAction, AppEvent, Driver, InputState, KeyInput};

use crate::ui;

/// Interval of the idle tick while no input arrives.
const TICK_INTERVAL: tokio::time::Duration = tokio::time::Duration::from_millis(100);

/// Terminal driver errors.
#[derive(Debug, Error)]
pub enum TerminalError {
    /// I/O error from terminal operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Terminal driver implementing the [`Driver`] trait.
///
/// Handles terminal I/O (crossterm) and rendering (ratatui). Owns the input
/// state for text editing.
pub struct TerminalDriver {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    event_stream: EventStream,
    input_state: InputState,
    restored: bool,
}

impl TerminalDriver {
    /// Enter raw mode and the alternate screen.
    pub fn new() -> Result<Self, TerminalError> {
        enable_raw_mode()?;
        stdout().execute(EnterAlternateScreen)?;

        let backend = CrosstermBackend::new(stdout());
        let terminal = Terminal::new(backend)?;
        let event_stream = EventStream::new();

        Ok(Self { terminal, event_stream, input_state: InputState::new(), restored: false })
    }

    /// Convert a crossterm key event to `KeyInput`.
    ///
    /// Ctrl+C maps to Esc, since raw mode swallows the signal.
    fn convert_key(event: KeyEvent) -> Option<KeyInput> {
        if event.modifiers.contains(KeyModifiers::CONTROL) && event.code == KeyCode::Char('c') {
            return Some(KeyInput::Esc);
        }

        match event.code {
            KeyCode::Char(c) => Some(KeyInput::Char(c)),
            KeyCode::Enter => Some(KeyInput::Enter),
            KeyCode::Backspace => Some(KeyInput::Backspace),
            KeyCode::Delete => Some(KeyInput::Delete),
            KeyCode::Esc => Some(KeyInput::Esc),
            KeyCode::Left => Some(KeyInput::Left),
            KeyCode::Right => Some(KeyInput::Right),
            KeyCode::Home => Some(KeyInput::Home),
            KeyCode::End => Some(KeyInput::End),
            KeyCode::F(n) => Some(KeyInput::F(n)),
            _ => None,
        }
    }
}

impl Driver for TerminalDriver {
    type Error = TerminalError;

    async fn poll_event(&mut self, app: &mut App) -> Result<Vec<AppAction>, Self::Error> {
        tokio::select! {
            biased;

            // Terminal events
            maybe_event = self.event_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key_event))) if key_event.kind == KeyEventKind::Press => {
                        match Self::convert_key(key_event) {
                            Some(key_input) => Ok(self.input_state.handle_key(key_input, app)),
                            None => Ok(vec![]),
                        }
                    },
                    Some(Ok(Event::Resize(cols, rows))) => {
                        Ok(app.handle(AppEvent::Resize(cols, rows)))
                    },
                    Some(Err(e)) => Err(TerminalError::Io(e)),
                    _ => Ok(vec![]),
                }
            }

            // Tick timeout
            () = tokio::time::sleep(TICK_INTERVAL) => {
                Ok(app.handle(AppEvent::Tick))
            }
        }
    }

    fn render(&mut self, app: &App) -> Result<(), Self::Error> {
        self.terminal.draw(|frame| {
            ui::render(frame, app, &self.input_state);
        })?;
        Ok(())
    }

    fn stop(&mut self) {
        if self.restored {
            return;
        }
        self.restored = true;

        if let Err(e) = disable_raw_mode() {
            tracing::warn!("Failed to leave raw mode: {e}");
        }
        if let Err(e) = stdout().execute(LeaveAlternateScreen) {
            tracing::warn!("Failed to leave alternate screen: {e}");
        }
    }
}

impl Drop for TerminalDriver {
    fn drop(&mut self) {
        self.stop();
    }
}
