//! Client
//!
//! Connection lifecycle for the XDchat IRC client: one TCP session, one
//! registered identity, one joined channel.
//!
//! # Architecture
//!
//! A [`Session`] is the single serialization point for everything mutable: the
//! configuration, the socket's write half, the inbound reader task and the
//! [`ConnectionState`]. All transitions (user connect, user disconnect,
//! reader-detected failure) take the same lock, so they can never interleave.
//! The current state is also published through a watch channel so observers
//! can see `Connecting`/`Disconnecting` while a transition is in flight.
//!
//! # Components
//!
//! - [`Session::connect`] / [`Session::disconnect`]: Connection Manager
//! - Inbound Reader: background task per connection, decodes lines, answers
//!   keep-alive probes, tears down on failure
//! - [`Session::send`]: Outbound Dispatcher
//! - [`EventSink`]: Bounded, non-blocking queue carrying display lines and state changes
//!   to the presentation layer
//! - [`Connector`]: Transport seam, [`TcpConnector`] in production

#![forbid(unsafe_code)]

mod config;
mod dispatcher;
mod error;
mod event;
mod reader;
mod session;
mod state;
pub mod transport;

pub use config::{
    DEFAULT_CHANNEL, DEFAULT_PORT, DEFAULT_SERVER, SessionConfig, parse_port, validate_channel,
    validate_nickname, validate_server,
};
pub use error::{ConfigError, ConnectError, SendError, TransportError};
pub use event::{
    EVENT_QUEUE_CAPACITY, EventReceiver, EventSink, SessionEvent, channel, channel_with_capacity,
};
pub use reader::READ_CHUNK_SIZE;
pub use session::Session;
pub use state::{ConnectionState, LinkStatus};
pub use transport::{Connector, TcpConnector};
