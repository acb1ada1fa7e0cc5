// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cross-frame coordination.
//!
//! Each document (top level or embedded) owns its own
//! [`NavigationContext`](crate::NavigationContext). Contexts in different
//! frames cooperate through four fire-and-forget messages:
//!
//! - [`FrameMessage::Register`]: a child announces it runs a compatible engine.
//!   The parent records the child so its `IFRAME` becomes a focus candidate.
//! - [`FrameMessage::Unregister`]: the child is going away.
//! - [`FrameMessage::FocusEnter`]: the parent moved focus onto the child's
//!   `IFRAME`; the rectangle is already in the child's coordinate space.
//! - [`FrameMessage::FocusExit`]: the child found nothing further in the
//!   requested direction; the rectangle is in the child's coordinate space and
//!   the parent translates it by the `IFRAME` offset.
//!
//! Messages are not acknowledged and never retried. A frame that becomes
//! unreachable ([`FrameError::Unreachable`]) is pruned from the registry.

use hashbrown::HashSet;
use serde::{Deserialize, Serialize};

use crate::direction::Direction;
use crate::error::FrameError;
use crate::geometry::IntRect;

/// Cross-frame message.
///
/// The serde representation is the payload inside the wire envelope; see
/// [`wire`](crate::wire).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum FrameMessage {
    /// Child → parent: this frame hosts a compatible engine.
    #[serde(rename = "register")]
    Register,
    /// Child → parent: this frame is unloading.
    #[serde(rename = "unregister")]
    Unregister,
    /// Parent → child: focus entered the child.
    #[serde(rename = "dFocusEnter", rename_all = "camelCase")]
    FocusEnter {
        /// Direction of travel.
        direction: Direction,
        /// Reference rectangle in the child's coordinate space.
        reference_rect: WireRect,
    },
    /// Child → parent: focus leaves the child.
    #[serde(rename = "dFocusExit", rename_all = "camelCase")]
    FocusExit {
        /// Direction of travel.
        direction: Direction,
        /// Reference rectangle in the child's coordinate space.
        reference_rect: WireRect,
    },
}

/// Rectangle as carried on the wire.
///
/// `right` and `bottom` are optional; when absent they are derived from the
/// origin and size.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireRect {
    /// Left edge.
    pub left: i32,
    /// Top edge.
    pub top: i32,
    /// Width.
    pub width: i32,
    /// Height.
    pub height: i32,
    /// Right edge, if sent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right: Option<i32>,
    /// Bottom edge, if sent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bottom: Option<i32>,
}

impl From<IntRect> for WireRect {
    fn from(r: IntRect) -> Self {
        Self {
            left: r.left,
            top: r.top,
            width: r.width(),
            height: r.height(),
            right: Some(r.right),
            bottom: Some(r.bottom),
        }
    }
}

impl From<WireRect> for IntRect {
    fn from(r: WireRect) -> Self {
        Self::new(
            r.left,
            r.top,
            r.right.unwrap_or(r.left.saturating_add(r.width)),
            r.bottom.unwrap_or(r.top.saturating_add(r.height)),
        )
    }
}

/// Transport between a document and its parent and child frames.
pub trait FrameChannel<F> {
    /// Whether this document is embedded in a parent frame.
    fn is_embedded(&self) -> bool;

    /// Post to the parent frame. Does nothing when not embedded.
    fn send_to_parent(&mut self, message: FrameMessage);

    /// Post to a child frame.
    fn send_to_frame(&mut self, frame: F, message: FrameMessage) -> Result<(), FrameError>;

    /// Arrange for [`FrameMessage::Unregister`] to be delivered on behalf of
    /// `frame` when it unloads.
    fn attach_unload_hook(&mut self, frame: F) -> Result<(), FrameError>;
}

/// Child frames known to host a compatible engine.
#[derive(Clone, Debug)]
pub struct FrameRegistry<F> {
    frames: HashSet<F>,
}

impl<F> Default for FrameRegistry<F> {
    fn default() -> Self {
        Self {
            frames: HashSet::new(),
        }
    }
}

impl<F> FrameRegistry<F>
where
    F: Copy + Eq + core::hash::Hash + core::fmt::Debug,
{
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `frame`. Returns `false` if it was already present.
    pub fn register(&mut self, frame: F) -> bool {
        self.frames.insert(frame)
    }

    /// Forget `frame`. Returns `false` if it was not present.
    pub fn unregister(&mut self, frame: F) -> bool {
        self.frames.remove(&frame)
    }

    /// Whether `frame` is registered.
    pub fn contains(&self, frame: F) -> bool {
        self.frames.contains(&frame)
    }

    /// Number of registered frames.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Returns `true` if no frames are registered.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Registered frames, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = F> + '_ {
        self.frames.iter().copied()
    }

    /// Drop every frame for which `reachable` reports [`FrameError::Unreachable`].
    ///
    /// Returns the number of pruned frames.
    pub fn prune(&mut self, mut reachable: impl FnMut(F) -> Result<(), FrameError>) -> usize {
        let before = self.frames.len();
        self.frames.retain(|f| match reachable(*f) {
            Ok(()) => true,
            Err(FrameError::Unreachable) => {
                tracing::warn!(frame = ?f, "pruning unreachable frame");
                false
            }
        });
        before - self.frames.len()
    }
}
