//! Application layer for XDchat
//!
//! Pure state machine and generic runtime between the terminal and the
//! session, so the same orchestration code runs in production and in tests.
//!
//! # Components
//!
//! - [`App`]: View model (scrollback, mirrored connection state, status line)
//! - [`InputState`]: Line editor and slash-command dispatch
//! - [`SettingsStore`]: `key: value` settings file
//! - [`Driver`]: Trait for platform-specific terminal I/O
//! - [`Runtime`]: Orchestration loop between Driver, App and Session

#![forbid(unsafe_code)]

mod action;
mod app;
pub mod commands;
mod driver;
mod event;
mod input;
mod runtime;
mod settings;

pub use action::AppAction;
pub use app::{App, MAX_LOG_LINES};
pub use driver::Driver;
pub use event::AppEvent;
pub use input::{InputState, KeyInput};
pub use runtime::Runtime;
pub use settings::{DEFAULT_SETTINGS_FILE, SettingsError, SettingsStore, parse_settings};
