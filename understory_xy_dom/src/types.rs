// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types: element and frame identifiers, element data.

use alloc::string::{String, ToString};

use kurbo::Rect;
use smallvec::SmallVec;
use understory_xy_focus::ElementState;

/// Identifier for an element in a [`Dom`](crate::Dom) (generational).
///
/// Removing an element bumps the generation of its slot, so stale handles
/// never alias a newer element.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct ElementId(pub(crate) u32, pub(crate) u32);

impl ElementId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

/// Identifier for a child frame hosted by an `IFRAME` element.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct FrameId(pub u32);

/// Data stored per element.
///
/// Tags are stored upper case. The `id` is an ordinary attribute.
#[derive(Clone, Debug, PartialEq)]
pub struct ElementData {
    /// Tag name.
    pub tag: String,
    /// Class list.
    pub classes: SmallVec<[String; 2]>,
    /// Attributes in insertion order.
    pub attributes: SmallVec<[(String, String); 2]>,
    /// Computed state flags.
    pub state: ElementState,
    /// Bounding rectangle in viewport coordinates.
    pub rect: Rect,
}

impl ElementData {
    /// An element with tag `tag` and nothing else.
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_uppercase(),
            classes: SmallVec::new(),
            attributes: SmallVec::new(),
            state: ElementState::empty(),
            rect: Rect::ZERO,
        }
    }

    /// Set the `id` attribute.
    pub fn id(self, id: &str) -> Self {
        self.attr("id", id)
    }

    /// Add a class.
    pub fn class(mut self, class: &str) -> Self {
        if !self.has_class(class) {
            self.classes.push(class.to_string());
        }
        self
    }

    /// Set an attribute, replacing any previous value.
    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.set_attribute(name, value);
        self
    }

    /// Set state flags.
    pub fn state(mut self, state: ElementState) -> Self {
        self.state = state;
        self
    }

    /// Set the bounding rectangle from origin and size.
    pub fn bounds(mut self, x: f64, y: f64, width: f64, height: f64) -> Self {
        self.rect = Rect::new(x, y, x + width, y + height);
        self
    }

    /// Value of attribute `name`.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Set attribute `name` to `value`.
    pub fn set_attribute(&mut self, name: &str, value: &str) {
        match self.attributes.iter_mut().find(|(n, _)| n == name) {
            Some((_, v)) => *v = value.to_string(),
            None => self.attributes.push((name.to_string(), value.to_string())),
        }
    }

    /// Remove attribute `name`.
    pub fn remove_attribute(&mut self, name: &str) {
        self.attributes.retain(|(n, _)| n != name);
    }

    /// Whether the class list contains `class`.
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }
}
