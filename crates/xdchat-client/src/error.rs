//! Error types for the client session.
//!
//! Each error kind has a fixed propagation rule:
//!
//! - [`ConnectError`] surfaces to the caller of `connect`; the session stays
//!   `Disconnected`.
//! - [`SendError`] surfaces to the caller of `send`; the connection is left
//!   alone.
//! - [`TransportError`] is only observed by the inbound reader, which tears the
//!   connection down and reports it as a notice line.
//! - [`ConfigError`] reports rejected configuration changes and settings that
//!   could not be parsed. Parse failures are recovered by defaulting.

use std::io;

use thiserror::Error;
use xdchat_proto::DecodeError;

use crate::ConnectionState;

/// Errors from [`crate::Session::connect`].
#[derive(Debug, Error)]
pub enum ConnectError {
    /// A connection already exists or a transition is in flight.
    #[error("cannot connect while {state}")]
    InvalidState {
        /// State observed when the connect was requested
        state: ConnectionState,
    },

    /// Name resolution or TCP connect failed.
    #[error("failed to connect to {addr}: {source}")]
    Connect {
        /// Target address (host:port)
        addr: String,
        /// Underlying I/O error
        source: io::Error,
    },

    /// A registration command could not be written.
    #[error("registration failed while sending {command}: {source}")]
    Registration {
        /// Keyword of the command that failed
        command: &'static str,
        /// Underlying I/O error
        source: io::Error,
    },
}

/// Errors from [`crate::Session::send`].
#[derive(Debug, Error)]
pub enum SendError {
    /// No registered connection.
    #[error("not connected")]
    NotConnected,

    /// The socket write failed.
    #[error("write failed: {0}")]
    Write(#[source] io::Error),
}

/// Reasons the inbound reader stopped.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The peer closed the connection (zero-byte read).
    #[error("connection closed by server")]
    Closed,

    /// Reading from the socket failed.
    #[error("read failed: {0}")]
    Read(#[source] io::Error),

    /// The inbound byte stream could not be split into lines.
    #[error("malformed input: {0}")]
    Decode(#[from] DecodeError),

    /// Writing a keep-alive response failed.
    #[error("keep-alive response failed: {0}")]
    Write(#[source] io::Error),
}

/// Rejected or unparseable configuration values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Identity and channel can only change while disconnected.
    #[error("disconnect from the server before changing settings (currently {state})")]
    Locked {
        /// State observed when the change was requested
        state: ConnectionState,
    },

    /// Nickname failed validation.
    #[error("invalid nickname {value:?}: {reason}")]
    InvalidNickname {
        /// Rejected value
        value: String,
        /// Why it was rejected
        reason: &'static str,
    },

    /// Channel name failed validation.
    #[error("invalid channel {value:?}: {reason}")]
    InvalidChannel {
        /// Rejected value
        value: String,
        /// Why it was rejected
        reason: &'static str,
    },

    /// Server host failed validation.
    #[error("invalid server {value:?}: {reason}")]
    InvalidServer {
        /// Rejected value
        value: String,
        /// Why it was rejected
        reason: &'static str,
    },

    /// Port is not a non-zero 16-bit number.
    #[error("invalid port {value:?}")]
    InvalidPort {
        /// Rejected value
        value: String,
    },

    /// Settings line is not `key: value`.
    #[error("malformed settings line {line:?}")]
    Malformed {
        /// Offending line
        line: String,
    },

    /// Settings key is not recognised.
    #[error("unknown settings key {key:?}")]
    UnknownKey {
        /// Offending key
        key: String,
    },
}
