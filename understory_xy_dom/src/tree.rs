// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Element tree: structure, mutation, focus, frames.

use alloc::vec::Vec;

use hashbrown::HashMap;
use kurbo::{Rect, Size};
use understory_xy_focus::{Document, ElementState, FrameError};

use crate::selector::Selector;
use crate::types::{ElementData, ElementId, FrameId};

#[derive(Clone, Debug)]
struct Node {
    generation: u32,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    data: ElementData,
}

#[derive(Copy, Clone, Debug)]
struct FrameSlot {
    element: ElementId,
    detached: bool,
}

/// An in-memory document.
///
/// The tree always has a `BODY` root sized to the viewport. Elements inserted
/// without a parent are detached: they exist but are not part of the
/// document, and are never found by traversal or selector queries.
///
/// ## Example
///
/// ```rust
/// use understory_xy_dom::{Dom, ElementData};
/// use understory_xy_focus::Document;
///
/// let mut dom = Dom::new(800.0, 600.0);
/// let body = dom.body();
/// let ok = dom.insert(Some(body), ElementData::new("button").id("ok").bounds(0.0, 0.0, 50.0, 20.0));
///
/// assert_eq!(dom.query_selector(body, "#ok"), Some(ok));
/// dom.focus(ok);
/// assert_eq!(dom.active_element(), Some(ok));
/// ```
#[derive(Clone)]
pub struct Dom {
    /// slots
    nodes: Vec<Option<Node>>,
    /// last generation per slot (persists across frees)
    generations: Vec<u32>,
    free_list: Vec<usize>,
    body: ElementId,
    viewport: Size,
    active: Option<ElementId>,
    redirects: HashMap<ElementId, Option<ElementId>>,
    clicks: Vec<ElementId>,
    frames: HashMap<FrameId, FrameSlot>,
    next_frame: u32,
}

impl core::fmt::Debug for Dom {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let alive = self.nodes.iter().filter(|n| n.is_some()).count();
        f.debug_struct("Dom")
            .field("nodes_alive", &alive)
            .field("free_list", &self.free_list.len())
            .field("viewport", &self.viewport)
            .field("active", &self.active)
            .field("frames", &self.frames.len())
            .finish_non_exhaustive()
    }
}

impl Dom {
    /// Create a document with a viewport of `width` × `height`.
    pub fn new(width: f64, height: f64) -> Self {
        let mut dom = Self {
            nodes: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            body: ElementId::new(0, 0),
            viewport: Size::new(width, height),
            active: None,
            redirects: HashMap::new(),
            clicks: Vec::new(),
            frames: HashMap::new(),
            next_frame: 0,
        };
        dom.body = dom.insert(None, ElementData::new("body").bounds(0.0, 0.0, width, height));
        dom
    }

    /// Insert an element as the last child of `parent`, or detached if `None`.
    pub fn insert(&mut self, parent: Option<ElementId>, data: ElementData) -> ElementId {
        let node = |generation| Node {
            generation,
            parent: None,
            children: Vec::new(),
            data,
        };
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.nodes[idx] = Some(node(generation));
            #[allow(
                clippy::cast_possible_truncation,
                reason = "ElementId uses 32-bit indices by design."
            )]
            (idx as u32, generation)
        } else {
            let generation = 1_u32;
            self.nodes.push(Some(node(generation)));
            self.generations.push(generation);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "ElementId uses 32-bit indices by design."
            )]
            ((self.nodes.len() - 1) as u32, generation)
        };
        let id = ElementId::new(idx, generation);
        if let Some(p) = parent
            && self.is_alive(p)
        {
            self.node_mut(p).children.push(id);
            self.node_mut(id).parent = Some(p);
        }
        id
    }

    /// Remove an element and its subtree.
    ///
    /// Focus inside the subtree is lost; frames hosted in the subtree become
    /// unreachable. The body cannot be removed.
    pub fn remove(&mut self, id: ElementId) {
        if !self.is_alive(id) || id == self.body {
            return;
        }
        if let Some(parent) = self.node(id).parent {
            self.node_mut(parent).children.retain(|c| *c != id);
        }
        self.remove_subtree(id);
    }

    fn remove_subtree(&mut self, id: ElementId) {
        let children = core::mem::take(&mut self.node_mut(id).children);
        for child in children {
            self.remove_subtree(child);
        }
        if self.active == Some(id) {
            self.active = None;
        }
        for slot in self.frames.values_mut() {
            if slot.element == id {
                slot.detached = true;
            }
        }
        self.nodes[id.idx()] = None;
        self.free_list.push(id.idx());
    }

    /// Returns true if `id` refers to a live element.
    pub fn is_alive(&self, id: ElementId) -> bool {
        self.nodes
            .get(id.idx())
            .and_then(|n| n.as_ref())
            .is_some_and(|n| n.generation == id.1)
    }

    /// Data of a live element.
    pub fn get(&self, id: ElementId) -> Option<&ElementData> {
        self.node_opt(id).map(|n| &n.data)
    }

    /// Mutable data of a live element.
    pub fn get_mut(&mut self, id: ElementId) -> Option<&mut ElementData> {
        self.node_opt_mut(id).map(|n| &mut n.data)
    }

    /// Children of `id` in document order, or an empty slice if stale.
    pub fn children_of(&self, id: ElementId) -> &[ElementId] {
        self.node_opt(id).map_or(&[], |n| &n.children)
    }

    /// Move `id` to viewport rectangle `rect`.
    pub fn set_rect(&mut self, id: ElementId, rect: Rect) {
        if let Some(data) = self.get_mut(id) {
            data.rect = rect;
        }
    }

    /// Replace the state flags of `id`.
    pub fn set_state(&mut self, id: ElementId, state: ElementState) {
        if let Some(data) = self.get_mut(id) {
            data.state = state;
        }
    }

    /// Set attribute `name` on `id`.
    pub fn set_attribute(&mut self, id: ElementId, name: &str, value: &str) {
        if let Some(data) = self.get_mut(id) {
            data.set_attribute(name, value);
        }
    }

    /// Remove attribute `name` from `id`.
    pub fn remove_attribute(&mut self, id: ElementId, name: &str) {
        if let Some(data) = self.get_mut(id) {
            data.remove_attribute(name);
        }
    }

    /// Set the active element directly, without focus redirects.
    pub fn set_active(&mut self, id: Option<ElementId>) {
        self.active = id.filter(|e| self.is_alive(*e));
    }

    /// When `from` is focused, focus `to` instead (`None` makes focus on
    /// `from` a no-op). Models a focus handler that moves focus elsewhere.
    pub fn redirect_focus(&mut self, from: ElementId, to: Option<ElementId>) {
        self.redirects.insert(from, to);
    }

    /// Elements clicked so far, oldest first.
    pub fn clicks(&self) -> &[ElementId] {
        &self.clicks
    }

    /// First element under the body matching `selector`.
    pub fn find(&self, selector: &str) -> Option<ElementId> {
        self.query_selector(self.body, selector)
    }

    /// Host a new child frame in `iframe`.
    pub fn attach_frame(&mut self, iframe: ElementId) -> FrameId {
        let id = FrameId(self.next_frame);
        self.next_frame += 1;
        self.frames.insert(
            id,
            FrameSlot {
                element: iframe,
                detached: false,
            },
        );
        id
    }

    /// Tear down `frame`. Later access reports [`FrameError::Unreachable`].
    pub fn detach_frame(&mut self, frame: FrameId) {
        if let Some(slot) = self.frames.get_mut(&frame) {
            slot.detached = true;
        }
    }

    fn node_opt(&self, id: ElementId) -> Option<&Node> {
        let n = self.nodes.get(id.idx())?.as_ref()?;
        (n.generation == id.1).then_some(n)
    }

    fn node_opt_mut(&mut self, id: ElementId) -> Option<&mut Node> {
        let n = self.nodes.get_mut(id.idx())?.as_mut()?;
        if n.generation != id.1 {
            return None;
        }
        Some(n)
    }

    /// Panics if `id` is stale.
    fn node(&self, id: ElementId) -> &Node {
        self.nodes[id.idx()].as_ref().expect("dangling ElementId")
    }

    /// Panics if `id` is stale.
    fn node_mut(&mut self, id: ElementId) -> &mut Node {
        self.nodes[id.idx()].as_mut().expect("dangling ElementId")
    }
}

impl Document for Dom {
    type Element = ElementId;
    type Frame = FrameId;

    fn body(&self) -> ElementId {
        self.body
    }

    fn parent(&self, element: ElementId) -> Option<ElementId> {
        self.node_opt(element).and_then(|n| n.parent)
    }

    fn is_connected(&self, element: ElementId) -> bool {
        let mut current = Some(element).filter(|e| self.is_alive(*e));
        while let Some(e) = current {
            if e == self.body {
                return true;
            }
            current = self.parent(e);
        }
        false
    }

    fn descendants(&self, root: ElementId) -> Vec<ElementId> {
        let mut out = Vec::new();
        let mut stack: Vec<ElementId> = self.children_of(root).iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.children_of(id).iter().rev());
        }
        out
    }

    fn query_selector(&self, scope: ElementId, selector: &str) -> Option<ElementId> {
        let selector = Selector::parse(selector)?;
        self.descendants(scope)
            .into_iter()
            .find(|e| self.get(*e).is_some_and(|d| selector.matches(d)))
    }

    fn tag_name(&self, element: ElementId) -> &str {
        self.get(element).map_or("", |d| d.tag.as_str())
    }

    fn attribute(&self, element: ElementId, name: &str) -> Option<&str> {
        self.get(element)?.attribute(name)
    }

    fn has_class(&self, element: ElementId, class: &str) -> bool {
        self.get(element).is_some_and(|d| d.has_class(class))
    }

    fn add_class(&mut self, element: ElementId, class: &str) {
        if let Some(data) = self.get_mut(element)
            && !data.has_class(class)
        {
            data.classes.push(class.into());
        }
    }

    fn remove_class(&mut self, element: ElementId, class: &str) {
        if let Some(data) = self.get_mut(element) {
            data.classes.retain(|c| c != class);
        }
    }

    fn state(&self, element: ElementId) -> ElementState {
        self.get(element).map_or(ElementState::empty(), |d| d.state)
    }

    fn bounding_rect(&self, element: ElementId) -> Rect {
        self.get(element).map_or(Rect::ZERO, |d| d.rect)
    }

    fn viewport_size(&self) -> Size {
        self.viewport
    }

    fn active_element(&self) -> Option<ElementId> {
        self.active
    }

    fn focus(&mut self, element: ElementId) {
        let target = match self.redirects.get(&element) {
            Some(redirect) => *redirect,
            None => Some(element),
        };
        let Some(target) = target else {
            return;
        };
        let blocked = ElementState::DISPLAY_NONE | ElementState::DISABLED;
        if self.is_connected(target) && !self.state(target).intersects(blocked) {
            self.active = Some(target);
        }
    }

    fn click(&mut self, element: ElementId) {
        if self.is_alive(element) {
            self.clicks.push(element);
        }
    }

    fn content_frame(&self, element: ElementId) -> Result<Option<FrameId>, FrameError> {
        match self.frames.iter().find(|(_, slot)| slot.element == element) {
            Some((_, slot)) if slot.detached => Err(FrameError::Unreachable),
            Some((id, _)) => Ok(Some(*id)),
            None => Ok(None),
        }
    }

    fn frame_element(&self, frame: FrameId) -> Result<Option<ElementId>, FrameError> {
        match self.frames.get(&frame) {
            Some(slot) if slot.detached => Err(FrameError::Unreachable),
            Some(slot) => Ok(Some(slot.element)),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn button(x: f64) -> ElementData {
        ElementData::new("button").bounds(x, 0.0, 50.0, 50.0)
    }

    #[test]
    fn descendants_are_in_document_order() {
        let mut dom = Dom::new(100.0, 100.0);
        let body = dom.body();
        let a = dom.insert(Some(body), button(0.0));
        let a1 = dom.insert(Some(a), button(0.0));
        let b = dom.insert(Some(body), button(0.0));
        let a2 = dom.insert(Some(a), button(0.0));
        assert_eq!(dom.descendants(body), [a, a1, a2, b]);
        assert_eq!(dom.descendants(a), [a1, a2]);
    }

    #[test]
    fn liveness_insert_remove_reuse() {
        let mut dom = Dom::new(100.0, 100.0);
        let body = dom.body();
        let a = dom.insert(Some(body), button(0.0));
        let child = dom.insert(Some(a), button(0.0));
        dom.focus(child);
        dom.remove(a);
        assert!(!dom.is_alive(a));
        assert!(!dom.is_alive(child));
        assert_eq!(dom.active_element(), None);

        let b = dom.insert(Some(body), button(0.0));
        assert!(dom.is_alive(b));
        assert!(!dom.is_alive(a) && !dom.is_alive(child));
        assert_eq!(dom.descendants(body), [b]);
    }

    #[test]
    fn detached_elements_are_not_connected() {
        let mut dom = Dom::new(100.0, 100.0);
        let loose = dom.insert(None, button(0.0));
        assert!(!dom.is_connected(loose));
        dom.focus(loose);
        assert_eq!(dom.active_element(), None);
        assert!(dom.is_connected(dom.body()));
    }

    #[test]
    fn focus_redirect_and_block() {
        let mut dom = Dom::new(100.0, 100.0);
        let body = dom.body();
        let a = dom.insert(Some(body), button(0.0));
        let b = dom.insert(Some(body), button(100.0));
        let hidden = dom.insert(Some(body), button(200.0).state(ElementState::DISPLAY_NONE));
        dom.redirect_focus(a, Some(b));
        dom.focus(a);
        assert_eq!(dom.active_element(), Some(b));
        dom.focus(hidden);
        assert_eq!(dom.active_element(), Some(b));
        dom.redirect_focus(b, None);
        dom.set_active(None);
        dom.focus(b);
        assert_eq!(dom.active_element(), None);
    }

    #[test]
    fn query_selector_searches_below_scope() {
        let mut dom = Dom::new(100.0, 100.0);
        let body = dom.body();
        let list = dom.insert(Some(body), ElementData::new("div").class("list"));
        let item = dom.insert(Some(list), button(0.0).id("first"));
        assert_eq!(dom.query_selector(body, "#first"), Some(item));
        assert_eq!(dom.query_selector(list, "#first"), Some(item));
        assert_eq!(dom.query_selector(item, "#first"), None);
        assert_eq!(dom.query_selector(body, ".list"), Some(list));
        assert_eq!(dom.query_selector(body, "div > button"), None);
    }

    #[test]
    fn frames_become_unreachable() {
        let mut dom = Dom::new(100.0, 100.0);
        let body = dom.body();
        let iframe = dom.insert(Some(body), ElementData::new("iframe"));
        let other = dom.insert(Some(body), button(0.0));
        let frame = dom.attach_frame(iframe);
        assert_eq!(dom.content_frame(iframe), Ok(Some(frame)));
        assert_eq!(dom.content_frame(other), Ok(None));
        assert_eq!(dom.frame_element(frame), Ok(Some(iframe)));
        dom.detach_frame(frame);
        assert_eq!(dom.content_frame(iframe), Err(FrameError::Unreachable));
        assert_eq!(dom.frame_element(frame), Err(FrameError::Unreachable));
    }

    #[test]
    fn classes_and_clicks() {
        let mut dom = Dom::new(100.0, 100.0);
        let body = dom.body();
        let a = dom.insert(Some(body), button(0.0));
        dom.add_class(a, "on");
        dom.add_class(a, "on");
        assert!(dom.has_class(a, "on"));
        assert_eq!(dom.get(a).map(|d| d.classes.len()), Some(1));
        dom.remove_class(a, "on");
        assert!(!dom.has_class(a, "on"));
        dom.click(a);
        assert_eq!(dom.clicks(), [a]);
    }
}
