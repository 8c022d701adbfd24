//! Application input events.
//!
//! This module defines [`AppEvent`], the inputs that drive the
//! [`crate::App`] state machine apart from direct API calls.
//!
//! Events originate from two distinct sources:
//! - The terminal (resize) and system ticks.
//! - The session, either its event queue or the result of an action the
//!   runtime executed on it.

use xdchat_client::{SessionConfig, SessionEvent};

/// Events processed by the App state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// Periodic tick.
    Tick,

    /// Terminal resize (columns, rows).
    Resize(u16, u16),

    /// Output from the session's event queue.
    Session(SessionEvent),

    /// The session accepted a configuration change.
    ConfigChanged(SessionConfig),

    /// An action failed.
    Error {
        /// Error description.
        message: String,
    },
}
