// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! JSON envelope for [`FrameMessage`]s.
//!
//! Hosts that bridge frames over a string or structured-clone channel (for
//! example `postMessage`) wrap each message in an object under a single
//! well-known key, so payloads from unrelated senders can share the channel:
//!
//! ```json
//! { "xyfocus": { "type": "dFocusExit", "direction": "left",
//!                "referenceRect": { "left": 0, "top": 0, "width": 50, "height": 50 } } }
//! ```
//!
//! ```rust
//! use understory_xy_focus::{Direction, FrameMessage, IntRect, wire};
//!
//! let msg = FrameMessage::FocusEnter {
//!     direction: Direction::Down,
//!     reference_rect: IntRect::new(0, 0, 10, 10).into(),
//! };
//! let json = wire::encode(&msg).unwrap();
//! assert_eq!(wire::decode(&json).unwrap(), Some(msg));
//!
//! // Someone else's traffic is ignored.
//! assert_eq!(wire::decode(r#"{"chat": "hi"}"#).unwrap(), None);
//! ```

use alloc::string::String;

use serde::Serialize;
use serde_json::Value;

use crate::error::WireError;
use crate::frames::FrameMessage;

/// Envelope key.
pub const ENVELOPE_KEY: &str = "xyfocus";

#[derive(Serialize)]
struct Envelope<'a> {
    #[serde(rename = "xyfocus")]
    message: &'a FrameMessage,
}

/// Serialize `message` inside the envelope.
pub fn encode(message: &FrameMessage) -> Result<String, WireError> {
    Ok(serde_json::to_string(&Envelope { message })?)
}

/// Decode a payload.
///
/// Returns `Ok(None)` for valid JSON that is not addressed to this engine
/// (not an object, or no envelope key), and an error for invalid JSON or a
/// malformed message under the envelope key.
pub fn decode(payload: &str) -> Result<Option<FrameMessage>, WireError> {
    let Value::Object(mut map) = serde_json::from_str::<Value>(payload)? else {
        return Ok(None);
    };
    let Some(inner) = map.remove(ENVELOPE_KEY) else {
        return Ok(None);
    };
    Ok(Some(serde_json::from_value(inner)?))
}
