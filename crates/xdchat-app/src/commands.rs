//! Slash-command parsing.
//!
//! Input starting with `/` is a command. A doubled slash escapes it, so
//! `//shrug` is sent as the message `/shrug`. Anything else is a message for
//! the configured channel.

/// One line of user input, classified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `/connect`
    Connect,
    /// `/disconnect`
    Disconnect,
    /// `/nick <name>`
    Nick {
        /// Requested nickname
        nickname: String,
    },
    /// `/join <#channel>` or `/channel <#channel>`
    Join {
        /// Requested channel
        channel: String,
    },
    /// `/config`
    Config,
    /// `/about`
    About,
    /// `/help`
    Help,
    /// `/quit`
    Quit,
    /// Plain chat message.
    Message {
        /// Message text
        text: String,
    },
    /// Unrecognised `/command`.
    Unknown {
        /// Command word as typed
        input: String,
    },
    /// Recognised command with missing or extra arguments.
    InvalidArgs {
        /// Command word
        command: &'static str,
        /// Usage hint
        error: &'static str,
    },
}

/// Command reference shown by `/help`.
pub const HELP: &[&str] = &[
    "/connect            connect to the server",
    "/disconnect         disconnect from the server",
    "/nick <name>        change nickname (while disconnected)",
    "/join <#channel>    change channel (while disconnected)",
    "/config             show current settings",
    "/about              about XDchat",
    "/help               show this help",
    "/quit               disconnect and exit",
    "//text              send a message starting with '/'",
];

/// Classify one line of input.
pub fn parse(input: &str) -> Command {
    let Some(rest) = input.strip_prefix('/') else {
        return Command::Message { text: input.to_string() };
    };
    if rest.starts_with('/') {
        return Command::Message { text: rest.to_string() };
    }

    let mut words = rest.split_whitespace();
    let Some(word) = words.next() else {
        return Command::Unknown { input: input.to_string() };
    };
    let arg = words.next();
    let extra = words.next().is_some();

    match (word.to_ascii_lowercase().as_str(), arg, extra) {
        ("connect", None, _) => Command::Connect,
        ("disconnect", None, _) => Command::Disconnect,
        ("config" | "settings", None, _) => Command::Config,
        ("about", None, _) => Command::About,
        ("help", None, _) => Command::Help,
        ("quit" | "exit", ..) => Command::Quit,
        ("nick", Some(nickname), false) => Command::Nick { nickname: nickname.to_string() },
        ("nick", ..) => Command::InvalidArgs { command: "nick", error: "usage: /nick <name>" },
        ("join" | "channel", Some(channel), false) => {
            Command::Join { channel: channel.to_string() }
        },
        ("join" | "channel", ..) => {
            Command::InvalidArgs { command: "join", error: "usage: /join <#channel>" }
        },
        ("connect" | "disconnect" | "config" | "settings" | "about" | "help", ..) => {
            Command::InvalidArgs { command: "command", error: "takes no arguments" }
        },
        _ => Command::Unknown { input: word.to_string() },
    }
}
