//! Events delivered from the session to the presentation layer.
//!
//! The session emits from two contexts: the caller of `connect`/`send`/
//! `disconnect` and the inbound reader task. Both push into a bounded queue
//! that the presentation drains on its own schedule. Emitting never waits: when
//! the queue is full the event is dropped and counted, and the count is
//! reported as a notice as soon as there is room again. Dropped state changes
//! are recovered from [`crate::Session::state`], which is always current.

use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use tokio::sync::mpsc::{self, error::TrySendError};

use crate::ConnectionState;

/// Events buffered between the session and a stalled presentation layer.
pub const EVENT_QUEUE_CAPACITY: usize = 4096;

/// One unit of output from the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// Raw line received from the server, shown verbatim.
    Inbound(String),

    /// Local echo of a message this client sent.
    Echo {
        /// Nickname the message was sent under
        nickname: String,
        /// Message body
        text: String,
    },

    /// Informational line (connection banner, teardown, diagnostics).
    Notice(String),

    /// Connection state changed.
    State(ConnectionState),
}

impl SessionEvent {
    /// Text line to append to the display. `None` for state changes.
    pub fn display_line(&self) -> Option<String> {
        match self {
            SessionEvent::Inbound(line) | SessionEvent::Notice(line) => Some(line.clone()),
            SessionEvent::Echo { nickname, text } => Some(format!("<{nickname}> {text}")),
            SessionEvent::State(_) => None,
        }
    }
}

/// Receiving end drained by the presentation layer.
pub type EventReceiver = mpsc::Receiver<SessionEvent>;

/// Sending end shared by the session and its reader task.
#[derive(Debug, Clone)]
pub struct EventSink {
    tx: mpsc::Sender<SessionEvent>,
    /// Events lost to a full queue and not yet reported.
    dropped: Arc<AtomicUsize>,
}

impl EventSink {
    /// Queue an event. Never blocks; a closed receiver is ignored.
    pub fn emit(&self, event: SessionEvent) {
        let dropped = self.dropped.swap(0, Ordering::Relaxed);
        if dropped > 0 {
            let report = SessionEvent::Notice(format!("=== {dropped} events dropped, display fell behind ==="));
            if let Err(TrySendError::Full(_)) = self.tx.try_send(report) {
                self.dropped.fetch_add(dropped, Ordering::Relaxed);
                self.record_drop();
                return;
            }
        }

        match self.tx.try_send(event) {
            Ok(()) => {},
            Err(TrySendError::Full(_)) => self.record_drop(),
            Err(TrySendError::Closed(_)) => tracing::trace!("session event dropped: receiver closed"),
        }
    }

    /// Queue an informational line.
    pub fn notice(&self, text: impl Into<String>) {
        self.emit(SessionEvent::Notice(text.into()));
    }

    fn record_drop(&self) {
        if self.dropped.fetch_add(1, Ordering::Relaxed) == 0 {
            tracing::warn!("Event queue full, dropping session events");
        }
    }
}

/// Create a connected sink/receiver pair holding [`EVENT_QUEUE_CAPACITY`]
/// events.
pub fn channel() -> (EventSink, EventReceiver) {
    channel_with_capacity(EVENT_QUEUE_CAPACITY)
}

/// Create a connected sink/receiver pair holding `capacity` events.
///
/// # Panics
///
/// Panics if `capacity` is zero.
pub fn channel_with_capacity(capacity: usize) -> (EventSink, EventReceiver) {
    let (tx, rx) = mpsc::channel(capacity);
    (EventSink { tx, dropped: Arc::new(AtomicUsize::new(0)) }, rx)
}
