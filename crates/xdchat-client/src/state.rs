//! Connection state types.

use std::fmt;

/// Lifecycle state of the session's connection.
///
/// ```text
/// ┌──────────────┐ connect ┌────────────┐ registered ┌───────────┐
/// │ Disconnected │────────>│ Connecting │───────────>│ Connected │
/// └──────────────┘         └────────────┘            └───────────┘
///        ^  ^                    │ error                   │ disconnect /
///        │  └────────────────────┘                         │ reader failure
///        │                 ┌───────────────┐               │
///        └─────────────────│ Disconnecting │<──────────────┘
///                          └───────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectionState {
    /// No socket.
    Disconnected,
    /// Socket opening or registration in progress.
    Connecting,
    /// Registered; exactly one live socket.
    Connected,
    /// Teardown in progress.
    Disconnecting,
}

impl ConnectionState {
    /// True in the only state that owns a live socket.
    pub fn is_connected(self) -> bool {
        self == Self::Connected
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Disconnected => "Disconnected",
            Self::Connecting => "Connecting",
            Self::Connected => "Connected",
            Self::Disconnecting => "Disconnecting",
        };
        f.write_str(label)
    }
}

/// Point-in-time view of the session's link, taken under the session lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkStatus {
    /// Published connection state.
    pub state: ConnectionState,
    /// Whether a socket write half is held.
    pub has_socket: bool,
    /// Whether the inbound reader task is alive.
    pub reader_running: bool,
    /// Number of successful connects so far.
    pub epoch: u64,
}

impl LinkStatus {
    /// `Connected` if and only if a socket is held.
    pub fn is_consistent(&self) -> bool {
        self.state.is_connected() == self.has_socket
    }
}
