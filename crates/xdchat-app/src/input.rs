//! Input state and key handling.
//!
//! This module owns all text input state (buffer, cursor) and handles
//! character-level key events. Command parsing happens here on Enter.

use crate::{
    App, AppAction,
    commands::{self, Command},
};

/// Keyboard input abstraction.
///
/// Decouples application logic from terminal libraries (crossterm, termion,
/// etc.) enabling tests without a terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInput {
    /// Printable character.
    Char(char),
    /// Enter/Return key.
    Enter,
    /// Backspace key (delete character before cursor).
    Backspace,
    /// Delete key (delete character at cursor).
    Delete,
    /// Escape key (quit).
    Esc,
    /// Left arrow key.
    Left,
    /// Right arrow key.
    Right,
    /// Home key (cursor to start).
    Home,
    /// End key (cursor to end).
    End,
    /// Function key by number (F2 toggles the connection).
    F(u8),
}

/// Text input buffer and cursor.
///
/// The cursor is a byte offset that always sits on a char boundary.
#[derive(Debug, Default)]
pub struct InputState {
    /// Text buffer for user input.
    buffer: String,
    /// Cursor position within the buffer.
    cursor: usize,
}

impl InputState {
    /// Create a new empty input state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current text in the input buffer.
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Current cursor position (byte offset).
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Number of characters before the cursor, for on-screen placement.
    pub fn cursor_column(&self) -> usize {
        self.buffer[..self.cursor].chars().count()
    }

    /// Handle a key input event.
    ///
    /// Returns actions to process (may be empty for input-only keys,
    /// or contain session actions for commands).
    pub fn handle_key(&mut self, key: KeyInput, app: &mut App) -> Vec<AppAction> {
        match key {
            KeyInput::Char(c) => {
                self.buffer.insert(self.cursor, c);
                self.cursor += c.len_utf8();
                vec![AppAction::Render]
            },
            KeyInput::Backspace => {
                if let Some(prev) = self.prev_boundary() {
                    self.buffer.remove(prev);
                    self.cursor = prev;
                }
                vec![AppAction::Render]
            },
            KeyInput::Delete => {
                if self.cursor < self.buffer.len() {
                    self.buffer.remove(self.cursor);
                }
                vec![AppAction::Render]
            },
            KeyInput::Left => {
                if let Some(prev) = self.prev_boundary() {
                    self.cursor = prev;
                }
                vec![AppAction::Render]
            },
            KeyInput::Right => {
                if let Some(c) = self.buffer[self.cursor..].chars().next() {
                    self.cursor += c.len_utf8();
                }
                vec![AppAction::Render]
            },
            KeyInput::Home => {
                self.cursor = 0;
                vec![AppAction::Render]
            },
            KeyInput::End => {
                self.cursor = self.buffer.len();
                vec![AppAction::Render]
            },
            KeyInput::Enter => self.handle_enter(app),
            KeyInput::Esc => app.quit(),
            KeyInput::F(2) => app.toggle_connection(),
            KeyInput::F(_) => vec![],
        }
    }

    /// Byte offset of the char before the cursor.
    fn prev_boundary(&self) -> Option<usize> {
        self.buffer[..self.cursor].char_indices().next_back().map(|(i, _)| i)
    }

    /// Handle Enter key - parse command and call App API.
    fn handle_enter(&mut self, app: &mut App) -> Vec<AppAction> {
        let text = std::mem::take(&mut self.buffer);
        self.cursor = 0;

        if text.trim().is_empty() {
            return vec![AppAction::Render];
        }

        match commands::parse(&text) {
            Command::Connect => app.connect(),
            Command::Disconnect => app.disconnect(),
            Command::Nick { nickname } => app.change_nickname(&nickname),
            Command::Join { channel } => app.change_channel(&channel),
            Command::Config => app.show_config(),
            Command::About => app.show_about(),
            Command::Help => app.show_help(),
            Command::Quit => app.quit(),
            Command::Message { text } => app.send_message(&text),
            Command::Unknown { input } => {
                app.set_status(format!("Unknown command: /{input} (try /help)"));
                vec![AppAction::Render]
            },
            Command::InvalidArgs { command, error } => {
                app.set_status(format!("/{command}: {error}"));
                vec![AppAction::Render]
            },
        }
    }
}
