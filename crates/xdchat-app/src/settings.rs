//! Settings file store.
//!
//! Plain `key: value` lines:
//!
//! ```text
//! nickname: alice
//! channel: #XDchatOnly
//! server: irc.libera.chat
//! port: 6667
//! last_updated: 2025-01-31 18:04:11
//! ```
//!
//! Loading never fails. A missing or unreadable file, malformed lines, unknown
//! keys and invalid values all fall back to defaults and are logged. Saving
//! goes through a temporary file in the same directory followed by a rename,
//! so a crash never leaves a truncated file behind.

use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use tempfile::NamedTempFile;
use thiserror::Error;
use xdchat_client::{
    ConfigError, SessionConfig, parse_port, validate_channel, validate_nickname, validate_server,
};

/// Settings file used when none is given.
pub const DEFAULT_SETTINGS_FILE: &str = "XDchatSettingsSave.txt";

/// Timestamp format of the `last_updated` key.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Settings file I/O failures.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// Reading the file failed.
    #[error("failed to read {path}: {source}")]
    Read {
        /// Settings file
        path: PathBuf,
        /// Underlying I/O error
        source: io::Error,
    },

    /// Writing the temporary file failed.
    #[error("failed to write {path}: {source}")]
    Write {
        /// Settings file
        path: PathBuf,
        /// Underlying I/O error
        source: io::Error,
    },

    /// Renaming the temporary file over the settings file failed.
    #[error("failed to replace {path}: {source}")]
    Persist {
        /// Settings file
        path: PathBuf,
        /// Underlying persist error
        source: tempfile::PersistError,
    },
}

/// Loads and saves [`SessionConfig`] at one path.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    /// Store backed by `path`. Nothing is touched until `load` or `save`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Settings file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stored configuration over `defaults`.
    ///
    /// Every problem is logged and skipped; the result is always usable.
    pub fn load(&self, defaults: SessionConfig) -> SessionConfig {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!("No settings file at {}, using defaults", self.path.display());
                return defaults;
            },
            Err(source) => {
                let error = SettingsError::Read { path: self.path.clone(), source };
                tracing::warn!("{error}, using defaults");
                return defaults;
            },
        };

        let (config, problems) = parse_settings(&text, defaults);
        for problem in &problems {
            tracing::warn!("Ignoring settings entry in {}: {problem}", self.path.display());
        }
        tracing::info!("Loaded settings from {}: {config}", self.path.display());
        config
    }

    /// Write `config` with the current local time as `last_updated`.
    ///
    /// # Errors
    ///
    /// - `SettingsError::Write` if the temporary file cannot be written
    /// - `SettingsError::Persist` if it cannot replace the settings file
    pub fn save(&self, config: &SessionConfig) -> Result<(), SettingsError> {
        let timestamp = chrono::Local::now().format(TIMESTAMP_FORMAT).to_string();
        let contents = render_settings(config, &timestamp);
        let write_error = |source| SettingsError::Write { path: self.path.clone(), source };

        let dir = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()).unwrap_or(Path::new("."));
        let mut temp_file = NamedTempFile::new_in(dir).map_err(write_error)?;
        temp_file.write_all(contents.as_bytes()).map_err(write_error)?;
        temp_file.as_file_mut().sync_all().map_err(write_error)?;
        temp_file
            .persist(&self.path)
            .map_err(|source| SettingsError::Persist { path: self.path.clone(), source })?;

        tracing::info!("Saved settings to {}", self.path.display());
        Ok(())
    }
}

/// Apply `key: value` lines over `defaults`.
///
/// Returns the resulting configuration and every line that was skipped.
/// Blank lines and the informational `last_updated` key are ignored.
pub fn parse_settings(text: &str, defaults: SessionConfig) -> (SessionConfig, Vec<ConfigError>) {
    let mut config = defaults;
    let mut problems = Vec::new();

    for line in text.lines().map(str::trim).filter(|line| !line.is_empty()) {
        let Some((key, value)) = line.split_once(':') else {
            problems.push(ConfigError::Malformed { line: line.to_string() });
            continue;
        };

        let applied = match key.trim() {
            "nickname" => validate_nickname(value).map(|v| config.nickname = v),
            "channel" => validate_channel(value).map(|v| config.channel = v),
            "server" => validate_server(value).map(|v| config.server = v),
            "port" => parse_port(value).map(|v| config.port = v),
            "last_updated" => Ok(()),
            other => Err(ConfigError::UnknownKey { key: other.to_string() }),
        };
        if let Err(problem) = applied {
            problems.push(problem);
        }
    }

    (config, problems)
}

/// File contents for `config`.
fn render_settings(config: &SessionConfig, timestamp: &str) -> String {
    format!(
        "nickname: {}\nchannel: {}\nserver: {}\nport: {}\nlast_updated: {timestamp}\n",
        config.nickname, config.channel, config.server, config.port
    )
}
