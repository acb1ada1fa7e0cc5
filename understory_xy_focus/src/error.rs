// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types.
//!
//! "No candidate" is never an error: lookups return `Ok(None)`. The only
//! failure that reaches callers is a malformed override attribute, which is an
//! authoring bug in the document rather than a runtime condition.

/// Errors surfaced by navigation entry points.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum FocusError {
    /// The reference element's override attribute could not be parsed.
    #[error("invalid focus override attribute")]
    Override(#[from] OverrideParseError),
}

/// A syntax error in an override attribute.
///
/// Offsets are byte offsets into the attribute value.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum OverrideParseError {
    /// The input ended in the middle of the map.
    #[error("unexpected end of input")]
    UnexpectedEnd,
    /// A character that does not fit the grammar at this position.
    #[error("unexpected character {found:?} at offset {offset}")]
    UnexpectedChar {
        /// The offending character.
        found: char,
        /// Where it was found.
        offset: usize,
    },
    /// A quoted string without a closing quote.
    #[error("unterminated string starting at offset {offset}")]
    UnterminatedString {
        /// Offset of the opening quote.
        offset: usize,
    },
    /// Non-whitespace input after the closing brace.
    #[error("trailing input at offset {offset}")]
    TrailingInput {
        /// Offset of the first trailing character.
        offset: usize,
    },
}

/// A frame that was registered earlier can no longer be reached.
///
/// Hosts return this when a child frame's window was torn down or access to
/// it is denied. The coordinator reacts by pruning the frame; it is never
/// reported to callers of the navigation API.
#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum FrameError {
    /// The frame's execution context has gone away or refuses access.
    #[error("frame is no longer reachable")]
    Unreachable,
}

/// Errors from encoding or decoding cross-frame messages.
#[derive(Debug, thiserror::Error)]
pub enum WireError {
    /// The payload is not valid JSON for the envelope.
    #[error("malformed frame message")]
    Json(#[from] serde_json::Error),
}
