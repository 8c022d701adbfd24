//! Outbound Dispatcher.
//!
//! Turns user text into a `PRIVMSG` for the configured channel and echoes it
//! back to the event sink once the write succeeded. A failed write is reported
//! but does not close the connection; the inbound reader notices a dead socket
//! on its own.

use xdchat_proto::Command;

use crate::{ConnectionState, Connector, SendError, Session, SessionEvent, session};

impl<C: Connector> Session<C> {
    /// Send one chat message to the configured channel.
    ///
    /// Surrounding whitespace is trimmed. Empty text is accepted and ignored
    /// so long as the session is connected.
    ///
    /// # Errors
    ///
    /// - `SendError::NotConnected` unless `Connected` (no I/O is attempted)
    /// - `SendError::Write` if the socket write fails
    pub async fn send(&self, text: &str) -> Result<(), SendError> {
        let shared = self.shared();
        // A pending connect holds the lock; refuse without waiting for it.
        if shared.state() != ConnectionState::Connected {
            return Err(SendError::NotConnected);
        }

        let mut link = shared.lock().await;
        if shared.state() != ConnectionState::Connected {
            return Err(SendError::NotConnected);
        }

        let text = text.trim();
        if text.is_empty() {
            return Ok(());
        }

        let command = Command::Privmsg { target: link.config.channel.clone(), text: text.to_string() };
        let Some(writer) = link.writer.as_mut() else {
            return Err(SendError::NotConnected);
        };

        let written = session::write_command(writer, &command).await;
        match written {
            Ok(()) => {
                shared.sink.emit(SessionEvent::Echo {
                    nickname: link.config.nickname.clone(),
                    text: text.to_string(),
                });
                Ok(())
            },
            Err(e) => {
                tracing::warn!("Send failed: {e}");
                shared.sink.notice(format!("Send failed: {e}"));
                Err(SendError::Write(e))
            },
        }
    }
}
