//! Application state machine.
//!
//! This module defines the [`App`] state machine, which manages the interactive
//! state of the client completely decoupled from I/O and the session.
//!
//! This is a pure state machine: it consumes [`crate::AppEvent`] inputs and
//! produces [`crate::AppAction`] instructions for the runtime to execute.
//!
//! # Responsibilities
//!
//! - Keeps the scrollback log, bounded at [`MAX_LOG_LINES`].
//! - Mirrors the session's connection state and configuration for display.
//! - Rejects identity and channel changes up front while connected.
//! - Stores terminal dimensions to handle resize events.

use std::{
    collections::VecDeque,
    path::{Path, PathBuf},
};

use xdchat_client::{ConnectionState, SessionConfig, SessionEvent, validate_channel, validate_nickname};

use crate::{AppAction, AppEvent, commands};

/// Scrollback lines kept before the oldest are dropped.
pub const MAX_LOG_LINES: usize = 2000;

/// Application state machine.
///
/// Pure state machine that processes events and produces actions.
/// No I/O dependencies, fully testable without a terminal or a socket.
#[derive(Debug, Clone)]
pub struct App {
    /// Connection state as last published by the session.
    state: ConnectionState,
    /// Configuration as last confirmed by the session.
    config: SessionConfig,
    /// Scrollback, oldest first.
    log: VecDeque<String>,
    /// Terminal dimensions (columns, rows).
    terminal_size: (u16, u16),
    /// Transient status message. `None` if no message.
    status_message: Option<String>,
    /// Settings file, if settings are persisted.
    settings_path: Option<PathBuf>,
}

impl App {
    /// Create a disconnected App showing `config`.
    pub fn new(config: SessionConfig) -> Self {
        Self {
            state: ConnectionState::Disconnected,
            config,
            log: VecDeque::new(),
            terminal_size: (80, 24),
            status_message: None,
            settings_path: None,
        }
    }

    /// Record where settings are persisted, for `/config`.
    #[must_use]
    pub fn with_settings_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.settings_path = Some(path.into());
        self
    }

    /// Process an event and return actions.
    pub fn handle(&mut self, event: AppEvent) -> Vec<AppAction> {
        match event {
            AppEvent::Tick => vec![],
            AppEvent::Resize(cols, rows) => {
                self.terminal_size = (cols, rows);
                vec![AppAction::Render]
            },
            AppEvent::Session(SessionEvent::State(state)) => {
                self.state = state;
                vec![AppAction::Render]
            },
            AppEvent::Session(event) => {
                if let Some(line) = event.display_line() {
                    self.push_line(line);
                }
                vec![AppAction::Render]
            },
            AppEvent::ConfigChanged(config) => {
                if config.nickname != self.config.nickname {
                    self.status_message = Some(format!("Nickname changed to {}", config.nickname));
                } else if config.channel != self.config.channel {
                    self.status_message = Some(format!("Channel changed to {}", config.channel));
                }
                self.config = config;
                vec![AppAction::Render]
            },
            AppEvent::Error { message } => {
                self.status_message = Some(format!("Error: {message}"));
                vec![AppAction::Render]
            },
        }
    }

    /// Set a status message to display to the user.
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    /// Append a line to the scrollback, dropping the oldest past the limit.
    pub fn push_line(&mut self, line: impl Into<String>) {
        if self.log.len() == MAX_LOG_LINES {
            self.log.pop_front();
        }
        self.log.push_back(line.into());
    }

    /// Connect if disconnected, disconnect if connected.
    pub fn toggle_connection(&mut self) -> Vec<AppAction> {
        match self.state {
            ConnectionState::Disconnected => self.connect(),
            ConnectionState::Connected => self.disconnect(),
            state => {
                self.status_message = Some(format!("{state}, please wait"));
                vec![AppAction::Render]
            },
        }
    }

    /// Open the connection.
    pub fn connect(&mut self) -> Vec<AppAction> {
        if self.state != ConnectionState::Disconnected {
            self.status_message = Some(format!("Already {}", self.state.to_string().to_lowercase()));
            return vec![AppAction::Render];
        }
        self.status_message = Some(format!("Connecting to {}...", self.config.address()));
        vec![AppAction::Connect, AppAction::Render]
    }

    /// Close the connection.
    pub fn disconnect(&mut self) -> Vec<AppAction> {
        if self.state != ConnectionState::Connected {
            self.status_message = Some("Not connected".into());
            return vec![AppAction::Render];
        }
        self.status_message = None;
        vec![AppAction::Disconnect, AppAction::Render]
    }

    /// Request a nickname change.
    ///
    /// Refused with a status message unless disconnected; nothing changes
    /// until the session confirms with [`AppEvent::ConfigChanged`].
    pub fn change_nickname(&mut self, nickname: &str) -> Vec<AppAction> {
        if self.state != ConnectionState::Disconnected {
            self.status_message = Some("Disconnect from the server to change the nickname".into());
            return vec![AppAction::Render];
        }
        match validate_nickname(nickname) {
            Ok(nickname) if nickname == self.config.nickname => {
                self.status_message = Some(format!("Nickname is already {nickname}"));
                vec![AppAction::Render]
            },
            Ok(nickname) => vec![AppAction::SetNickname { nickname }, AppAction::Render],
            Err(e) => {
                self.status_message = Some(e.to_string());
                vec![AppAction::Render]
            },
        }
    }

    /// Request a channel change.
    ///
    /// Refused with a status message unless disconnected; nothing changes
    /// until the session confirms with [`AppEvent::ConfigChanged`].
    pub fn change_channel(&mut self, channel: &str) -> Vec<AppAction> {
        if self.state != ConnectionState::Disconnected {
            self.status_message = Some("Disconnect from the server to change the channel".into());
            return vec![AppAction::Render];
        }
        match validate_channel(channel) {
            Ok(channel) if channel == self.config.channel => {
                self.status_message = Some(format!("Channel is already {channel}"));
                vec![AppAction::Render]
            },
            Ok(channel) => vec![AppAction::SetChannel { channel }, AppAction::Render],
            Err(e) => {
                self.status_message = Some(e.to_string());
                vec![AppAction::Render]
            },
        }
    }

    /// Send a chat message to the configured channel.
    pub fn send_message(&mut self, text: &str) -> Vec<AppAction> {
        if self.state != ConnectionState::Connected {
            self.status_message = Some("Not connected. Use /connect or F2 first".into());
            return vec![AppAction::Render];
        }
        if text.trim().is_empty() {
            return vec![];
        }
        vec![AppAction::Send { text: text.to_string() }, AppAction::Render]
    }

    /// Print the current configuration into the scrollback.
    pub fn show_config(&mut self) -> Vec<AppAction> {
        let settings_file = self.settings_path.as_deref().map_or_else(
            || "not persisted".to_string(),
            |path| std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf()).display().to_string(),
        );

        let lines = [
            "=== Current settings ===".to_string(),
            format!("Nickname: {}", self.config.nickname),
            format!("Channel: {}", self.config.channel),
            format!("Server: {}", self.config.server),
            format!("Port: {}", self.config.port),
            format!("Settings file: {settings_file}"),
        ];
        for line in lines {
            self.push_line(line);
        }
        vec![AppAction::Render]
    }

    /// Print version and feature summary into the scrollback.
    pub fn show_about(&mut self) -> Vec<AppAction> {
        let lines = [
            format!("=== XDchat {} ===", env!("CARGO_PKG_VERSION")),
            "A minimal terminal IRC client:".to_string(),
            "- one server, one nickname, one channel".to_string(),
            "- nickname and channel changes saved to a settings file".to_string(),
            "- automatic keep-alive responses".to_string(),
        ];
        for line in lines {
            self.push_line(line);
        }
        vec![AppAction::Render]
    }

    /// Print command and key reference into the scrollback.
    pub fn show_help(&mut self) -> Vec<AppAction> {
        self.push_line("=== Commands ===");
        for line in commands::HELP {
            self.push_line(*line);
        }
        self.push_line("Keys: F2 connect/disconnect, Esc quit");
        vec![AppAction::Render]
    }

    /// Quit the application.
    pub fn quit(&self) -> Vec<AppAction> {
        vec![AppAction::Quit]
    }

    /// Current connection state.
    pub fn connection_state(&self) -> ConnectionState {
        self.state
    }

    /// Configuration as last confirmed by the session.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Scrollback lines, oldest first.
    pub fn log(&self) -> &VecDeque<String> {
        &self.log
    }

    /// Terminal dimensions (columns, rows).
    pub fn terminal_size(&self) -> (u16, u16) {
        self.terminal_size
    }

    /// Transient status message. `None` if no message.
    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    /// Settings file. `None` if settings are not persisted.
    pub fn settings_path(&self) -> Option<&Path> {
        self.settings_path.as_deref()
    }
}
