//! Driver trait for abstracting terminal I/O.
//!
//! The [`Driver`] trait decouples the application runtime from a specific
//! terminal library. Each frontend implements the trait, while the generic
//! [`crate::Runtime`] handles all orchestration with the session.

use std::future::Future;

use crate::{App, AppAction};

/// Abstracts terminal I/O for the application runtime.
///
/// Implementations provide platform-specific input and rendering while the
/// generic [`Runtime`](crate::Runtime) handles orchestration logic. This
/// ensures the same orchestration code runs in the terminal and in tests.
///
/// # Implementations
///
/// - **TUI**: crossterm for terminal events, ratatui for rendering
/// - **Tests**: scripted key sequences, renders captured as snapshots
pub trait Driver: Send {
    /// Platform-specific error type.
    type Error: std::error::Error + Send + 'static;

    /// Wait for the next input and apply it to `app`.
    ///
    /// Returns the resulting actions, or an empty list on a quiet tick. Must
    /// be cancel-safe: the runtime drops this future whenever a session event
    /// arrives first.
    ///
    /// # Errors
    ///
    /// Returns an error if reading input fails.
    fn poll_event(
        &mut self,
        app: &mut App,
    ) -> impl Future<Output = Result<Vec<AppAction>, Self::Error>> + Send;

    /// Render the application state.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    fn render(&mut self, app: &App) -> Result<(), Self::Error>;

    /// Release terminal resources.
    fn stop(&mut self);
}
