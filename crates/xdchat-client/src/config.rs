//! Session configuration.
//!
//! [`SessionConfig`] holds identity, channel and server address. The session
//! reads it when connecting and when formatting outbound messages; it can only
//! change while disconnected (see [`crate::Session::set_nickname`]).

use std::fmt;

use crate::ConfigError;

/// Channel joined when none is configured.
pub const DEFAULT_CHANNEL: &str = "#XDchatOnly";

/// Server used when none is configured.
pub const DEFAULT_SERVER: &str = "irc.libera.chat";

/// Plain-text IRC port.
pub const DEFAULT_PORT: u16 = 6667;

/// Prefix of the generated per-process nickname.
const NICKNAME_PREFIX: &str = "XDchatUser";

/// Identity, channel and server for one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Nickname registered with the server.
    pub nickname: String,
    /// Channel joined after registration and targeted by messages.
    pub channel: String,
    /// Server host name or address.
    pub server: String,
    /// Server TCP port.
    pub port: u16,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            nickname: default_nickname(),
            channel: DEFAULT_CHANNEL.to_string(),
            server: DEFAULT_SERVER.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl SessionConfig {
    /// Server address as `host:port`.
    pub fn address(&self) -> String {
        format!("{}:{}", self.server, self.port)
    }

    /// Replace the nickname after validation.
    pub fn with_nickname(mut self, nickname: &str) -> Result<Self, ConfigError> {
        self.nickname = validate_nickname(nickname)?;
        Ok(self)
    }

    /// Replace the channel after validation.
    pub fn with_channel(mut self, channel: &str) -> Result<Self, ConfigError> {
        self.channel = validate_channel(channel)?;
        Ok(self)
    }

    /// Replace the server host after validation.
    pub fn with_server(mut self, server: &str) -> Result<Self, ConfigError> {
        self.server = validate_server(server)?;
        Ok(self)
    }

    /// Replace the port.
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }
}

impl fmt::Display for SessionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} in {} on {}:{}", self.nickname, self.channel, self.server, self.port)
    }
}

/// Per-process nickname: prefix plus the last four digits of the process id.
fn default_nickname() -> String {
    format!("{NICKNAME_PREFIX}{:04}", std::process::id() % 10_000)
}

/// Trimmed nickname, or why it is unusable.
pub fn validate_nickname(value: &str) -> Result<String, ConfigError> {
    let nickname = value.trim();
    let reject = |reason| ConfigError::InvalidNickname { value: value.to_string(), reason };

    if nickname.is_empty() {
        return Err(reject("must not be empty"));
    }
    if nickname.contains(char::is_whitespace) {
        return Err(reject("must not contain whitespace"));
    }
    if nickname.starts_with([':', '#', '&']) {
        return Err(reject("must not start with ':', '#' or '&'"));
    }
    Ok(nickname.to_string())
}

/// Trimmed channel name, or why it is unusable.
pub fn validate_channel(value: &str) -> Result<String, ConfigError> {
    let channel = value.trim();
    let reject = |reason| ConfigError::InvalidChannel { value: value.to_string(), reason };

    if channel.is_empty() {
        return Err(reject("must not be empty"));
    }
    if !channel.starts_with(['#', '&']) {
        return Err(reject("must start with '#' or '&'"));
    }
    if channel.len() < 2 {
        return Err(reject("must have a name after the prefix"));
    }
    if channel.contains(|c: char| c.is_whitespace() || c == ',') {
        return Err(reject("must not contain whitespace or commas"));
    }
    Ok(channel.to_string())
}

/// Trimmed server host, or why it is unusable.
pub fn validate_server(value: &str) -> Result<String, ConfigError> {
    let server = value.trim();
    let reject = |reason| ConfigError::InvalidServer { value: value.to_string(), reason };

    if server.is_empty() {
        return Err(reject("must not be empty"));
    }
    if server.contains(char::is_whitespace) {
        return Err(reject("must not contain whitespace"));
    }
    Ok(server.to_string())
}

/// Parse a non-zero TCP port.
pub fn parse_port(value: &str) -> Result<u16, ConfigError> {
    match value.trim().parse::<u16>() {
        Ok(port) if port != 0 => Ok(port),
        _ => Err(ConfigError::InvalidPort { value: value.to_string() }),
    }
}
