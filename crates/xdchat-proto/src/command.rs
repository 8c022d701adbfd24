//! Outbound commands and keep-alive detection.
//!
//! A [`Command`] is the typed form of one protocol line the client sends.
//! [`Command::encode`] produces the exact wire text, always terminated by
//! [`LINE_TERMINATOR`].
//!
//! # Security
//!
//! - Line Injection: Arguments come from user input and server text. Any CR,
//!   LF or NUL inside an argument is replaced with a space during encoding, so
//!   one `Command` always encodes to exactly one wire line.

use std::borrow::Cow;

/// Protocol line terminator.
pub const LINE_TERMINATOR: &str = "\r\n";

/// Real name sent during registration.
pub const DEFAULT_REALNAME: &str = "XDchat IRC Client";

/// Message attached to `QUIT` on disconnect.
pub const QUIT_MESSAGE: &str = "XDchat IRC Client";

/// Keep-alive probe keyword.
const PING_KEYWORD: &str = "PING";

/// Commands the client sends to the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Identity declaration (`NICK <name>`).
    Nick {
        /// Requested nickname
        nickname: String,
    },

    /// Registration metadata (`USER <name> 0 * :<realname>`).
    User {
        /// Username, the nickname in practice
        username: String,
        /// Free-form real name
        realname: String,
    },

    /// Channel join (`JOIN <channel>`).
    Join {
        /// Channel to join
        channel: String,
    },

    /// Channel message (`PRIVMSG <target> :<text>`).
    Privmsg {
        /// Channel the message is addressed to
        target: String,
        /// Message body
        text: String,
    },

    /// Session end notice (`QUIT :<message>`).
    Quit {
        /// Parting message
        message: String,
    },

    /// Keep-alive response (`PONG <token>`).
    Pong {
        /// Payload echoed from the probe
        token: String,
    },
}

impl Command {
    /// Registration sequence sent right after the socket opens, in order.
    pub fn registration(nickname: &str, channel: &str) -> [Command; 3] {
        [
            Command::Nick { nickname: nickname.to_string() },
            Command::User { username: nickname.to_string(), realname: DEFAULT_REALNAME.to_string() },
            Command::Join { channel: channel.to_string() },
        ]
    }

    /// Keyword of this command as it appears on the wire.
    pub fn keyword(&self) -> &'static str {
        match self {
            Command::Nick { .. } => "NICK",
            Command::User { .. } => "USER",
            Command::Join { .. } => "JOIN",
            Command::Privmsg { .. } => "PRIVMSG",
            Command::Quit { .. } => "QUIT",
            Command::Pong { .. } => "PONG",
        }
    }

    /// Encode into one CRLF-terminated wire line.
    pub fn encode(&self) -> String {
        let body = match self {
            Command::Nick { nickname } => format!("NICK {}", sanitize(nickname)),
            Command::User { username, realname } => {
                format!("USER {} 0 * :{}", sanitize(username), sanitize(realname))
            },
            Command::Join { channel } => format!("JOIN {}", sanitize(channel)),
            Command::Privmsg { target, text } => {
                format!("PRIVMSG {} :{}", sanitize(target), sanitize(text))
            },
            Command::Quit { message } => format!("QUIT :{}", sanitize(message)),
            Command::Pong { token } if token.is_empty() => "PONG".to_string(),
            Command::Pong { token } => format!("PONG {}", sanitize(token)),
        };

        debug_assert!(!body.contains(['\r', '\n']));
        body + LINE_TERMINATOR
    }
}

/// Replace characters that would terminate or corrupt a wire line.
fn sanitize(arg: &str) -> Cow<'_, str> {
    if arg.contains(['\r', '\n', '\0']) {
        Cow::Owned(arg.replace(['\r', '\n', '\0'], " "))
    } else {
        Cow::Borrowed(arg)
    }
}

/// Keep-alive token carried by an inbound `PING` line.
///
/// The first whitespace-delimited word must be exactly `PING`. The token is
/// everything after the keyword and the whitespace that follows it, so
/// `PING :abc123` yields `:abc123`. Returns `None` for any other line,
/// including `PINGX` and lines with a source prefix.
pub fn ping_token(line: &str) -> Option<&str> {
    let rest = line.strip_prefix(PING_KEYWORD)?;
    if rest.is_empty() {
        return Some("");
    }
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    Some(rest.trim_start())
}
