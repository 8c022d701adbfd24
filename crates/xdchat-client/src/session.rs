//! Connection Manager.
//!
//! [`Session`] owns the connection lifecycle. Every transition runs with the
//! link lock held from start to finish, which makes the lock the single
//! serialization point for the socket, the reader task and the configuration.
//!
//! # Invariants
//!
//! - Single Socket: A write half is stored only once registration succeeded
//!   and is taken before the state leaves `Connected`. Under the lock,
//!   `Connected` holds if and only if a socket is held.
//! - Epoch Binding: Each successful connect bumps the epoch. A reader task only
//!   acts on the link while the epoch it was spawned with is still current.
//! - Exactly-Once Teardown: Whoever finds the state `Connected` under the lock
//!   performs the teardown; every later caller sees `Disconnected` and returns.
//! - Fail Fast: `send` and configuration changes check the published state
//!   before taking the lock, so a connect stuck in DNS or TCP never makes them
//!   wait. The check is repeated under the lock.

use std::sync::Arc;

use tokio::{
    io::{AsyncRead, AsyncWrite, AsyncWriteExt, WriteHalf},
    sync::{Mutex, watch},
    task::JoinHandle,
};
use xdchat_proto::{Command, QUIT_MESSAGE};

use crate::{
    ConfigError, ConnectError, ConnectionState, Connector, EventSink, LinkStatus, SessionConfig,
    SessionEvent, TransportError, config, reader,
};

/// Handle to one chat session.
///
/// Cheap to clone; clones share the same connection, lock and event sink.
pub struct Session<C: Connector> {
    connector: Arc<C>,
    shared: Arc<Shared<C::Stream>>,
}

impl<C: Connector> Clone for Session<C> {
    fn clone(&self) -> Self {
        Self { connector: Arc::clone(&self.connector), shared: Arc::clone(&self.shared) }
    }
}

/// State shared between session handles and the reader task.
pub(crate) struct Shared<S> {
    /// Everything a transition mutates.
    link: Mutex<Link<S>>,
    /// Published connection state, readable without the lock.
    state: watch::Sender<ConnectionState>,
    /// Output towards the presentation layer.
    pub(crate) sink: EventSink,
}

/// Mutable connection resources, guarded by [`Shared::link`].
pub(crate) struct Link<S> {
    /// Configuration used by the current or next connection.
    pub(crate) config: SessionConfig,
    /// Write half of the live socket. `Some` only while connected.
    pub(crate) writer: Option<WriteHalf<S>>,
    /// Inbound reader task of the live connection.
    reader: Option<JoinHandle<()>>,
    /// Incremented by every successful connect.
    epoch: u64,
}

impl<C: Connector> Session<C> {
    /// Create a disconnected session.
    pub fn new(connector: C, config: SessionConfig, sink: EventSink) -> Self {
        let (state, _) = watch::channel(ConnectionState::Disconnected);
        let link = Link { config, writer: None, reader: None, epoch: 0 };

        Self {
            connector: Arc::new(connector),
            shared: Arc::new(Shared { link: Mutex::new(link), state, sink }),
        }
    }

    /// Current connection state.
    pub fn state(&self) -> ConnectionState {
        self.shared.state()
    }

    /// Watch connection state changes.
    pub fn subscribe(&self) -> watch::Receiver<ConnectionState> {
        self.shared.state.subscribe()
    }

    /// Snapshot of the current configuration.
    pub async fn config(&self) -> SessionConfig {
        self.shared.link.lock().await.config.clone()
    }

    /// Consistent view of the link, taken under the session lock.
    pub async fn link_status(&self) -> LinkStatus {
        let link = self.shared.link.lock().await;
        LinkStatus {
            state: self.shared.state(),
            has_socket: link.writer.is_some(),
            reader_running: link.reader.as_ref().is_some_and(|task| !task.is_finished()),
            epoch: link.epoch,
        }
    }

    /// Open the connection, register, join the channel and start the reader.
    ///
    /// The state becomes `Connected` only after the socket is open and all
    /// three registration lines were written. On any error the socket is
    /// dropped and the state returns to `Disconnected`.
    ///
    /// # Errors
    ///
    /// - `ConnectError::InvalidState` if not `Disconnected`
    /// - `ConnectError::Connect` if resolving or connecting fails
    /// - `ConnectError::Registration` if a registration write fails
    pub async fn connect(&self) -> Result<(), ConnectError> {
        let mut link = self.shared.link.lock().await;

        let state = self.shared.state();
        if state != ConnectionState::Disconnected {
            return Err(ConnectError::InvalidState { state });
        }

        let config = link.config.clone();
        let addr = config.address();
        let mut pending = PendingConnect::start(&self.shared);

        tracing::info!("Connecting to {addr} as {}", config.nickname);

        let stream = self.connector.connect(&config.server, config.port).await.map_err(|source| {
            tracing::warn!("Connection to {addr} failed: {source}");
            ConnectError::Connect { addr: addr.clone(), source }
        })?;

        let (read_half, mut write_half) = tokio::io::split(stream);

        for command in Command::registration(&config.nickname, &config.channel) {
            if let Err(source) = write_command(&mut write_half, &command).await {
                tracing::warn!("Registration with {addr} failed at {}: {source}", command.keyword());
                return Err(ConnectError::Registration { command: command.keyword(), source });
            }
            tracing::debug!("Sent {}", command.keyword());
        }

        link.epoch += 1;
        let epoch = link.epoch;
        link.writer = Some(write_half);
        pending.complete();

        tracing::info!("Connected to {addr} (epoch {epoch})");
        let sink = &self.shared.sink;
        sink.notice(format!("=== Connected to {addr} ==="));
        sink.notice(format!("Nickname: {}", config.nickname));
        sink.notice(format!("Channel: {}", config.channel));

        link.reader = Some(tokio::spawn(reader::run(read_half, Arc::clone(&self.shared), epoch)));

        Ok(())
    }

    /// Close the connection.
    ///
    /// No-op unless `Connected`. Sends `QUIT` on a best-effort basis, closes
    /// the socket and stops the reader. Safe to race with itself and with a
    /// reader-initiated teardown: only the first caller does anything.
    pub async fn disconnect(&self) {
        let mut link = self.shared.link.lock().await;

        let state = self.shared.state();
        if state != ConnectionState::Connected {
            tracing::debug!("Disconnect ignored while {state}");
            return;
        }

        self.shared.close_link(&mut link, "=== Disconnected from server ===".to_string()).await;
    }

    /// Change the nickname. Only allowed while disconnected.
    ///
    /// Returns the updated configuration.
    ///
    /// # Errors
    ///
    /// - `ConfigError::Locked` if not `Disconnected` (nothing is changed)
    /// - `ConfigError::InvalidNickname` if validation fails
    pub async fn set_nickname(&self, nickname: &str) -> Result<SessionConfig, ConfigError> {
        self.shared.ensure_unlocked()?;
        let mut link = self.shared.link.lock().await;
        self.shared.ensure_unlocked()?;

        link.config.nickname = config::validate_nickname(nickname)?;
        tracing::info!("Nickname set to {}", link.config.nickname);
        Ok(link.config.clone())
    }

    /// Change the channel. Only allowed while disconnected.
    ///
    /// Returns the updated configuration.
    ///
    /// # Errors
    ///
    /// - `ConfigError::Locked` if not `Disconnected` (nothing is changed)
    /// - `ConfigError::InvalidChannel` if validation fails
    pub async fn set_channel(&self, channel: &str) -> Result<SessionConfig, ConfigError> {
        self.shared.ensure_unlocked()?;
        let mut link = self.shared.link.lock().await;
        self.shared.ensure_unlocked()?;

        link.config.channel = config::validate_channel(channel)?;
        tracing::info!("Channel set to {}", link.config.channel);
        Ok(link.config.clone())
    }

    /// State shared with the reader, used by the outbound dispatcher.
    pub(crate) fn shared(&self) -> &Shared<C::Stream> {
        &self.shared
    }
}

impl<S> Shared<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
{
    /// Published connection state.
    pub(crate) fn state(&self) -> ConnectionState {
        *self.state.borrow()
    }

    /// Publish a new state to watchers and to the event sink.
    fn publish(&self, state: ConnectionState) {
        let previous = self.state.send_replace(state);
        if previous != state {
            tracing::debug!("Connection state {previous} -> {state}");
            self.sink.emit(SessionEvent::State(state));
        }
    }

    /// Reject configuration changes unless disconnected.
    fn ensure_unlocked(&self) -> Result<(), ConfigError> {
        match self.state() {
            ConnectionState::Disconnected => Ok(()),
            state => Err(ConfigError::Locked { state }),
        }
    }

    /// Acquire the link lock.
    pub(crate) async fn lock(&self) -> tokio::sync::MutexGuard<'_, Link<S>> {
        self.link.lock().await
    }

    /// Write a keep-alive response on behalf of the reader of `epoch`.
    pub(crate) async fn write_for(&self, epoch: u64, command: &Command) -> Result<(), TransportError> {
        let mut link = self.link.lock().await;
        if link.epoch != epoch {
            return Err(TransportError::Closed);
        }
        let Some(writer) = link.writer.as_mut() else {
            return Err(TransportError::Closed);
        };
        write_command(writer, command).await.map_err(TransportError::Write)
    }

    /// Tear down after the reader of `epoch` stopped.
    ///
    /// Does nothing if the connection was already closed or replaced.
    pub(crate) async fn teardown(&self, epoch: u64, reason: String) {
        let mut link = self.link.lock().await;
        if link.epoch != epoch || self.state() != ConnectionState::Connected {
            tracing::debug!("Reader {epoch} stopped after teardown: {reason}");
            return;
        }

        // The handle belongs to the calling task; detach rather than abort.
        drop(link.reader.take());
        self.close_link(&mut link, reason).await;
    }

    /// Shared teardown path. Caller holds the lock and observed `Connected`.
    async fn close_link(&self, link: &mut Link<S>, notice: String) {
        self.publish(ConnectionState::Disconnecting);

        if let Some(mut writer) = link.writer.take() {
            let quit = Command::Quit { message: QUIT_MESSAGE.to_string() };
            if let Err(e) = write_command(&mut writer, &quit).await {
                tracing::debug!("QUIT not delivered: {e}");
            }
            if let Err(e) = writer.shutdown().await {
                tracing::debug!("Socket shutdown failed: {e}");
            }
        }

        if let Some(reader) = link.reader.take() {
            reader.abort();
        }

        self.publish(ConnectionState::Disconnected);
        tracing::info!("{notice}");
        self.sink.notice(notice);
    }
}

/// Resets the state to `Disconnected` unless the connect completed.
///
/// Covers early returns and a dropped `connect` future alike.
struct PendingConnect<'a, S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
{
    shared: &'a Shared<S>,
    completed: bool,
}

impl<'a, S> PendingConnect<'a, S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
{
    fn start(shared: &'a Shared<S>) -> Self {
        shared.publish(ConnectionState::Connecting);
        Self { shared, completed: false }
    }

    fn complete(&mut self) {
        self.completed = true;
        self.shared.publish(ConnectionState::Connected);
    }
}

impl<S> Drop for PendingConnect<'_, S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
{
    fn drop(&mut self) {
        if !self.completed {
            self.shared.publish(ConnectionState::Disconnected);
        }
    }
}

/// Write one encoded command and flush it.
pub(crate) async fn write_command<W>(writer: &mut W, command: &Command) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    writer.write_all(command.encode().as_bytes()).await?;
    writer.flush().await
}
