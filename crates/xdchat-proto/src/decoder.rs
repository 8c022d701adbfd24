//! Inbound line framing.
//!
//! TCP delivers an arbitrary byte stream: one read may hold several protocol
//! lines, or end in the middle of one. [`LineDecoder`] keeps the unterminated
//! tail between reads and yields complete lines in arrival order.
//!
//! # Invariants
//!
//! - Order: Lines are yielded in the order their terminators arrived.
//! - No Loss or Duplication: Every byte before the last `\n` belongs to exactly
//!   one yielded line (or to a skipped blank line). Bytes after it stay
//!   buffered until the next terminator or [`LineDecoder::finish`].
//! - Bounded Memory: A partial line larger than the configured maximum is
//!   rejected instead of buffered forever.

use bytes::BytesMut;

use crate::errors::DecodeError;

/// Default upper bound for a single unterminated line.
pub const MAX_LINE_LENGTH: usize = 64 * 1024;

/// Splits a byte stream into trimmed text lines.
///
/// Lines are split on `\n`; a trailing `\r` and surrounding whitespace are
/// trimmed. Invalid UTF-8 is replaced rather than rejected. Blank lines are
/// skipped.
#[derive(Debug)]
pub struct LineDecoder {
    /// Bytes received but not yet yielded.
    buf: BytesMut,
    /// Prefix of `buf` already known to contain no `\n`.
    scanned: usize,
    /// Maximum length of an unterminated line.
    max_line_length: usize,
}

impl Default for LineDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl LineDecoder {
    /// Create a decoder with the default line limit.
    pub fn new() -> Self {
        Self::with_max_line_length(MAX_LINE_LENGTH)
    }

    /// Create a decoder with a custom line limit.
    pub fn with_max_line_length(max_line_length: usize) -> Self {
        Self { buf: BytesMut::with_capacity(2048), scanned: 0, max_line_length }
    }

    /// Append a chunk read from the transport.
    pub fn extend(&mut self, chunk: &[u8]) {
        self.buf.extend_from_slice(chunk);
    }

    /// Number of bytes buffered and not yet yielded.
    pub fn buffered(&self) -> usize {
        self.buf.len()
    }

    /// Next complete line. `None` if only a partial line (or nothing) is
    /// buffered.
    ///
    /// # Errors
    ///
    /// - `DecodeError::LineTooLong` if the unterminated tail exceeds the line
    ///   limit. The buffer is discarded.
    pub fn next_line(&mut self) -> Result<Option<String>, DecodeError> {
        loop {
            let Some(offset) = self.buf[self.scanned..].iter().position(|&b| b == b'\n') else {
                self.scanned = self.buf.len();
                if self.buf.len() > self.max_line_length {
                    let size = self.buf.len();
                    self.buf.clear();
                    self.scanned = 0;
                    return Err(DecodeError::LineTooLong { size, max: self.max_line_length });
                }
                return Ok(None);
            };

            let end = self.scanned + offset;
            let raw = self.buf.split_to(end + 1);
            self.scanned = 0;

            if let Some(line) = decode(&raw[..end]) {
                return Ok(Some(line));
            }
        }
    }

    /// Drain the unterminated remainder at end of stream.
    ///
    /// Returns `None` if nothing but whitespace is left.
    pub fn finish(&mut self) -> Option<String> {
        let raw = self.buf.split();
        self.scanned = 0;
        decode(&raw)
    }
}

/// Lossy UTF-8 decode and trim. `None` for blank lines.
fn decode(raw: &[u8]) -> Option<String> {
    let text = String::from_utf8_lossy(raw);
    let trimmed = text.trim();
    if trimmed.is_empty() { None } else { Some(trimmed.to_string()) }
}
