// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Opaque pagination tokens.
//!
//! A token encodes the creation sequence number of the last record handed
//! out; the next window starts strictly after it. Tokens carry no other
//! state, so any number of traversals can run side by side.

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use tracing::warn;

/// Where a list window starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    /// No token: start from the first record.
    Start,
    /// Resume after the record with this sequence number.
    After(u64),
    /// Token could not be decoded; the remaining window is empty.
    Invalid,
}

/// Stateless encoder/decoder for list offset tokens.
pub struct PaginationCursor;

impl PaginationCursor {
    /// Encode the position after `seq` as an opaque token.
    pub fn encode(seq: u64) -> String {
        URL_SAFE_NO_PAD.encode(seq.to_string())
    }

    /// Decode an offset token.
    ///
    /// Garbage never fails the list call: it decodes to [`Position::Invalid`]
    /// and the caller serves an empty window.
    pub fn decode(token: Option<&str>) -> Position {
        let Some(token) = token else {
            return Position::Start;
        };

        let seq = URL_SAFE_NO_PAD
            .decode(token)
            .ok()
            .and_then(|bytes| String::from_utf8(bytes).ok())
            .and_then(|text| text.parse::<u64>().ok());

        match seq {
            Some(seq) => Position::After(seq),
            None => {
                warn!(token = %token, "Undecodable offset token, serving empty window");
                Position::Invalid
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_token_starts_at_beginning() {
        assert_eq!(PaginationCursor::decode(None), Position::Start);
    }

    #[test]
    fn test_token_is_opaque_and_resumable() {
        let token = PaginationCursor::encode(42);
        assert_ne!(token, "42");
        assert_eq!(PaginationCursor::decode(Some(&token)), Position::After(42));
    }

    #[test]
    fn test_garbage_token_is_invalid() {
        assert_eq!(
            PaginationCursor::decode(Some("%%not-base64%%")),
            Position::Invalid
        );
        let not_a_number = URL_SAFE_NO_PAD.encode("abc");
        assert_eq!(
            PaginationCursor::decode(Some(&not_a_number)),
            Position::Invalid
        );
    }
}
