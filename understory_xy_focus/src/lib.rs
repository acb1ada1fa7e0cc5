// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory XY Focus: directional focus navigation.
//!
//! Given a direction (left, right, up, down), this crate picks the element
//! keyboard or gamepad focus should move to next, using only the bounding
//! rectangles of focusable elements. On top of the geometric core it keeps:
//!
//! - **History** ([`NavigationHistory`]): a corridor on the axis perpendicular
//!   to travel, so repeated moves stay aligned with where they started.
//! - **Overrides** ([`OverrideMap`]): an attribute on the focused element can
//!   name the target for a direction with a selector, bypassing geometry.
//! - **Input modes** ([`InputMode`]): editable widgets that need the arrow
//!   keys can claim them (toggle mode), and subtrees can opt out entirely.
//! - **Frame hand-off** ([`FrameMessage`], [`FrameChannel`]): focus moves into
//!   and out of embedded documents that run their own context.
//! - **Events** ([`FocusChanging`], [`FocusChanged`]): listeners can veto or
//!   observe every move.
//!
//! The engine is generic over the host through the [`Document`] trait; it
//! never touches a concrete DOM. `understory_xy_dom` provides an in-memory
//! implementation.
//!
//! ## Scoring
//!
//! [`score`] ranks a candidate rectangle against the reference rectangle:
//! candidates behind the reference score zero; the rest are rewarded for a
//! short gap along the travel axis, for overlapping the reference on the
//! perpendicular axis, and above all for overlapping the history corridor.
//!
//! ```rust
//! use understory_xy_focus::{Direction, IntRect, score};
//!
//! let reference = IntRect::from_origin_size(0, 0, 50, 50);
//! let near = IntRect::from_origin_size(100, 0, 50, 50);
//! let far = IntRect::from_origin_size(200, 0, 50, 50);
//! let behind = IntRect::from_origin_size(-100, 0, 50, 50);
//!
//! let s = |r: &IntRect| score(Direction::Right, 1000.0, &IntRect::DEFAULT, &reference, r);
//! assert!(s(&near) > s(&far));
//! assert_eq!(s(&behind), 0.0);
//! ```
//!
//! ## Driving a context
//!
//! A host keeps one [`NavigationContext`] per document and forwards key
//! presses to [`NavigationContext::handle_key_down`]; the return value says
//! whether to suppress the key's default action. Messages arriving from other
//! frames go to [`NavigationContext::handle_message`] after decoding with
//! [`wire::decode`].
//!
//! ## Features
//!
//! - `std` *(default)*: enables `std` support in dependencies.
//! - `libm`: floating point support for `no_std` targets through `kurbo`.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod config;
mod context;
mod direction;
mod document;
mod error;
mod events;
mod frames;
mod geometry;
mod history;
mod input;
mod overrides;
mod resolver;
mod score;

pub mod keys;
pub mod wire;

pub use config::{ClassNames, DEFAULT_OVERRIDE_ATTRIBUTE, FocusConfig};
pub use context::NavigationContext;
pub use direction::{Axis, Direction, ParseDirectionError};
pub use document::{Document, ElementState};
pub use error::{FocusError, FrameError, OverrideParseError, WireError};
pub use events::{FocusChanged, FocusChanging, ListenerId, Outcome};
pub use frames::{FrameChannel, FrameMessage, FrameRegistry, WireRect};
pub use geometry::{IntRect, percent_in_shadow};
pub use history::{NavigationHistory, next_history_rect};
pub use input::{InputMode, TOGGLE_INPUT_TYPES};
pub use keys::{KeyAction, KeyCode, KeyCodeMap};
pub use overrides::OverrideMap;
pub use resolver::{FOCUSABLE_TAGS, FindResult, NavigationOptions, ReferenceObject};
pub use score::{
    PERCENT_IN_HISTORY_SHADOW_WEIGHT, PRIMARY_AXIS_DISTANCE_WEIGHT, SECONDARY_AXIS_DISTANCE_WEIGHT,
    score,
};
