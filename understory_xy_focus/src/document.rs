// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The host document seam.
//!
//! The engine never walks a concrete DOM. Everything it needs from the host
//! (tree structure, measurements, class lists, selector matching, focus) is
//! expressed by [`Document`]. Hosts backed by a browser DOM, a retained-mode
//! widget tree, or the in-memory tree from `understory_xy_dom` all implement
//! the same trait.

use core::fmt::Debug;
use core::hash::Hash;

use alloc::vec::Vec;
use kurbo::{Rect, Size};

use crate::error::FrameError;

bitflags::bitflags! {
    /// Computed state of an element relevant to focusability.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ElementState: u8 {
        /// Computed `display: none`.
        const DISPLAY_NONE      = 0b0000_0001;
        /// Computed `visibility: hidden`.
        const VISIBILITY_HIDDEN = 0b0000_0010;
        /// The element's own `disabled` state (form controls).
        const DISABLED          = 0b0000_0100;
        /// A custom control hosted on this element reports itself disabled.
        const CONTROL_DISABLED  = 0b0000_1000;
    }
}

/// Read and focus access to a document.
///
/// `Element` is a small copyable handle. `Frame` identifies the execution
/// context of an embedded child document (a child window), distinct from the
/// `IFRAME` element that hosts it.
pub trait Document {
    /// Element handle.
    type Element: Copy + Eq + Hash + Debug;
    /// Child frame handle.
    type Frame: Copy + Eq + Hash + Debug;

    /// The document body.
    fn body(&self) -> Self::Element;

    /// Parent element, or `None` for the root or a detached element.
    fn parent(&self, element: Self::Element) -> Option<Self::Element>;

    /// Whether `element` is still attached to the document.
    fn is_connected(&self, element: Self::Element) -> bool;

    /// All descendants of `root` (excluding `root`) in document order.
    fn descendants(&self, root: Self::Element) -> Vec<Self::Element>;

    /// First descendant of `scope` matching `selector`, in document order.
    fn query_selector(&self, scope: Self::Element, selector: &str) -> Option<Self::Element>;

    /// Uppercase tag name, for example `"BUTTON"`.
    fn tag_name(&self, element: Self::Element) -> &str;

    /// Attribute value by name.
    fn attribute(&self, element: Self::Element, name: &str) -> Option<&str>;

    /// Whether the element's class list contains `class`.
    fn has_class(&self, element: Self::Element, class: &str) -> bool;

    /// Add `class` to the element's class list.
    fn add_class(&mut self, element: Self::Element, class: &str);

    /// Remove `class` from the element's class list.
    fn remove_class(&mut self, element: Self::Element, class: &str);

    /// Computed state flags.
    fn state(&self, element: Self::Element) -> ElementState;

    /// Bounding rectangle in viewport coordinates.
    fn bounding_rect(&self, element: Self::Element) -> Rect;

    /// Size of the available screen area.
    fn viewport_size(&self) -> Size;

    /// The focused element, if any. Documents with nothing focused usually
    /// report the body.
    fn active_element(&self) -> Option<Self::Element>;

    /// Ask the host to focus `element`.
    ///
    /// Hosts may run their own handlers that move focus elsewhere, so callers
    /// must re-read [`Document::active_element`] to learn what happened.
    fn focus(&mut self, element: Self::Element);

    /// Dispatch a synthetic click on `element`.
    fn click(&mut self, element: Self::Element);

    /// Child frame hosted by an `IFRAME` element.
    ///
    /// Returns `Ok(None)` for elements that do not host a frame and
    /// [`FrameError::Unreachable`] when the frame has been torn down.
    fn content_frame(&self, element: Self::Element) -> Result<Option<Self::Frame>, FrameError>;

    /// The `IFRAME` element hosting `frame` in this document.
    fn frame_element(&self, frame: Self::Frame) -> Result<Option<Self::Element>, FrameError>;

    /// Whether `element` has the attribute `name`.
    fn has_attribute(&self, element: Self::Element, name: &str) -> bool {
        self.attribute(element, name).is_some()
    }

    /// Whether `element` or one of its ancestors carries `class`.
    fn is_within_class(&self, element: Self::Element, class: &str) -> bool {
        let mut current = Some(element);
        while let Some(e) = current {
            if self.has_class(e, class) {
                return true;
            }
            current = self.parent(e);
        }
        false
    }
}
