//! Property-based tests for inbound line framing.
//!
//! These tests verify that the decoder yields the same lines no matter how the
//! byte stream is chunked by the transport.

use proptest::prelude::*;
use xdchat_proto::{Command, LineDecoder, ping_token};

/// Strategy for a single protocol line: printable, no terminators, trimmed.
fn arbitrary_line() -> impl Strategy<Value = String> {
    "[!-~][ -~]{0,40}[!-~]".prop_map(|s| s.trim().to_string())
}

/// Strategy for split points inside a buffer of the given length.
fn split_points(len: usize) -> impl Strategy<Value = Vec<usize>> {
    prop::collection::vec(0..=len, 0..8).prop_map(|mut points| {
        points.sort_unstable();
        points.dedup();
        points
    })
}

/// Feed `wire` to a decoder in the chunks defined by `points`.
fn decode_chunked(wire: &[u8], points: &[usize]) -> Vec<String> {
    let mut decoder = LineDecoder::new();
    let mut lines = Vec::new();
    let mut start = 0;

    for &point in points.iter().chain(std::iter::once(&wire.len())) {
        decoder.extend(&wire[start..point]);
        start = point;
        while let Some(line) = decoder.next_line().expect("lines are short") {
            lines.push(line);
        }
    }

    lines
}

proptest! {
    #[test]
    fn prop_chunking_preserves_lines(
        (lines, points) in prop::collection::vec(arbitrary_line(), 0..12)
            .prop_flat_map(|lines| {
                let len: usize = lines.iter().map(|l| l.len() + 2).sum();
                (Just(lines), split_points(len))
            })
    ) {
        let wire: String = lines.iter().map(|l| format!("{l}\r\n")).collect();
        let decoded = decode_chunked(wire.as_bytes(), &points);

        // PROPERTY: Same lines, same order, none merged or duplicated
        prop_assert_eq!(decoded, lines);
    }

    #[test]
    fn prop_every_ping_is_detected_once(
        (tokens, points) in prop::collection::vec("[a-zA-Z0-9]{1,12}", 1..6)
            .prop_flat_map(|tokens| {
                let len: usize = tokens.iter().map(|t| t.len() + 8).sum();
                (Just(tokens), split_points(len))
            })
    ) {
        let wire: String = tokens.iter().map(|t| format!("PING :{t}\r\n")).collect();
        let decoded = decode_chunked(wire.as_bytes(), &points);

        let pongs: Vec<String> = decoded
            .iter()
            .filter_map(|line| ping_token(line))
            .map(|token| Command::Pong { token: token.to_string() }.encode())
            .collect();
        let expected: Vec<String> = tokens.iter().map(|t| format!("PONG :{t}\r\n")).collect();

        prop_assert_eq!(pongs, expected);
    }
}
