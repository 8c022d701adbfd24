//! Protocol error types.

use thiserror::Error;

/// Errors produced while splitting an inbound byte stream into lines.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// A partial line grew past the limit without a terminator.
    #[error("line exceeds {max} bytes without a terminator ({size} buffered)")]
    LineTooLong {
        /// Bytes buffered so far
        size: usize,
        /// Maximum allowed line length
        max: usize,
    },
}
