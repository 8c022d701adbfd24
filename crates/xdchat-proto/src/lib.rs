//! Wire protocol for XDchat
//!
//! The subset of the IRC line protocol the client speaks. Everything here is
//! pure: no sockets, no runtime. The client crate feeds raw bytes into a
//! [`LineDecoder`] and writes the output of [`Command::encode`].
//!
//! # Components
//!
//! - [`Command`]: Outbound commands and their CRLF-terminated wire form
//! - [`LineDecoder`]: Carry-over buffer splitting a byte stream into lines
//! - [`ping_token`]: Keep-alive probe detection for inbound lines

#![forbid(unsafe_code)]

mod command;
mod decoder;
pub mod errors;

pub use command::{Command, DEFAULT_REALNAME, LINE_TERMINATOR, QUIT_MESSAGE, ping_token};
pub use decoder::{LineDecoder, MAX_LINE_LENGTH};
pub use errors::DecodeError;
