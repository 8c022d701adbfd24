//! Application side-effects and intents.
//!
//! This module defines the [`AppAction`] enum, which represents instructions
//! produced by the [`crate::App`] state machine for the runtime to execute.

/// Actions produced by the App state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppAction {
    /// Render the UI.
    Render,

    /// Quit the application.
    Quit,

    /// Open the session's connection.
    Connect,

    /// Close the session's connection.
    Disconnect,

    /// Send a chat message to the configured channel.
    Send {
        /// Message text as typed.
        text: String,
    },

    /// Change the nickname (only honoured while disconnected).
    SetNickname {
        /// Requested nickname.
        nickname: String,
    },

    /// Change the channel (only honoured while disconnected).
    SetChannel {
        /// Requested channel.
        channel: String,
    },
}
