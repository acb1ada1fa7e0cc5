// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Candidate resolution: reference lookup, overrides, filtering, scoring.

use crate::config::FocusConfig;
use crate::direction::Direction;
use crate::document::{Document, ElementState};
use crate::error::FocusError;
use crate::frames::FrameRegistry;
use crate::geometry::IntRect;
use crate::overrides::OverrideMap;
use crate::score::score;

/// Tags that are focusable without a `tabindex` attribute.
pub const FOCUSABLE_TAGS: [&str; 6] = ["A", "BUTTON", "IFRAME", "INPUT", "SELECT", "TEXTAREA"];

/// Options for a single lookup. Unset fields fall back to the context.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NavigationOptions<E> {
    /// Subtree to search. Defaults to the context's focus root.
    pub focus_root: Option<E>,
    /// Alignment corridor from previous moves. Defaults to [`IntRect::DEFAULT`].
    pub history_rect: Option<IntRect>,
    /// Element to navigate from. Defaults to the active element.
    pub reference_element: Option<E>,
    /// Rectangle to navigate from, used when there is no reference element.
    pub reference_rect: Option<IntRect>,
    /// Element that is never returned, in addition to the reference element.
    pub exclude: Option<E>,
}

impl<E> Default for NavigationOptions<E> {
    fn default() -> Self {
        Self {
            focus_root: None,
            history_rect: None,
            reference_element: None,
            reference_rect: None,
            exclude: None,
        }
    }
}

impl<E> NavigationOptions<E> {
    /// Navigate from `element`.
    pub fn from_element(element: E) -> Self {
        Self {
            reference_element: Some(element),
            ..Self::default()
        }
    }

    /// Navigate from `rect`.
    pub fn from_rect(rect: IntRect) -> Self {
        Self {
            reference_rect: Some(rect),
            ..Self::default()
        }
    }
}

/// The anchor distances are measured from.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ReferenceObject<E> {
    /// Reference element, if one was resolved.
    pub element: Option<E>,
    /// Reference rectangle.
    pub rect: IntRect,
}

/// Outcome of a successful lookup.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FindResult<E> {
    /// Element that should receive focus.
    pub target: E,
    /// Target bounds.
    pub target_rect: IntRect,
    /// Bounds the lookup navigated from.
    pub reference_rect: IntRect,
    /// Whether an override attribute chose the target.
    pub used_override: bool,
}

/// Borrowed view of the context state a lookup needs.
pub(crate) struct Resolver<'a, F> {
    pub(crate) config: &'a FocusConfig,
    pub(crate) frames: &'a FrameRegistry<F>,
}

impl<F> Resolver<'_, F>
where
    F: Copy + Eq + core::hash::Hash + core::fmt::Debug,
{
    /// Whether `element` may receive focus from spatial navigation.
    pub(crate) fn is_focusable<D>(&self, doc: &D, element: D::Element) -> bool
    where
        D: Document<Frame = F>,
    {
        let tag = doc.tag_name(element);
        let is_iframe = tag.eq_ignore_ascii_case("IFRAME");
        let eligible = doc.has_attribute(element, "tabindex")
            || FOCUSABLE_TAGS.iter().any(|t| t.eq_ignore_ascii_case(tag))
            || doc.has_class(element, &self.config.classes.focusable);
        if !eligible {
            return false;
        }

        if is_iframe && !self.frame_enabled(doc, element) {
            return false;
        }

        if doc.attribute(element, "tabindex").map(str::trim) == Some("-1") {
            return false;
        }
        let state = doc.state(element);
        !state.intersects(
            ElementState::DISPLAY_NONE
                | ElementState::VISIBILITY_HIDDEN
                | ElementState::DISABLED
                | ElementState::CONTROL_DISABLED,
        )
    }

    /// Whether the frame hosted by `iframe` runs a registered engine.
    pub(crate) fn frame_enabled<D>(&self, doc: &D, iframe: D::Element) -> bool
    where
        D: Document<Frame = F>,
    {
        match doc.content_frame(iframe) {
            Ok(Some(frame)) => self.frames.contains(frame),
            Ok(None) | Err(_) => false,
        }
    }

    /// Whether an ancestor of `element` is a toggle-mode container that has
    /// not been activated.
    fn in_inactive_toggle_container<D>(&self, doc: &D, element: D::Element) -> bool
    where
        D: Document<Frame = F>,
    {
        let classes = &self.config.classes;
        let mut current = doc.parent(element);
        while let Some(e) = current {
            if doc.has_class(e, &classes.toggle_mode) && !doc.has_class(e, &classes.toggle_mode_active)
            {
                return true;
            }
            current = doc.parent(e);
        }
        false
    }

    /// Resolve what to navigate from.
    ///
    /// An explicit element wins unless it opted out with `tabindex="-1"` or was
    /// detached; then an explicit rectangle; then the active element (unless it
    /// is the body); then [`IntRect::DEFAULT`].
    pub(crate) fn reference<D>(
        &self,
        doc: &D,
        element: Option<D::Element>,
        rect: Option<IntRect>,
    ) -> ReferenceObject<D::Element>
    where
        D: Document<Frame = F>,
    {
        let mut element = element.filter(|e| {
            doc.is_connected(*e) && doc.attribute(*e, "tabindex").map(str::trim) != Some("-1")
        });
        if element.is_none() && rect.is_none() {
            element = doc.active_element().filter(|e| *e != doc.body());
        }
        match (element, rect) {
            (Some(e), _) => ReferenceObject {
                element: Some(e),
                rect: IntRect::from_rect(doc.bounding_rect(e)),
            },
            (None, Some(r)) => ReferenceObject {
                element: None,
                rect: r,
            },
            (None, None) => ReferenceObject {
                element: None,
                rect: IntRect::DEFAULT,
            },
        }
    }

    /// Find the next focus target in `direction`.
    pub(crate) fn find_next<D>(
        &self,
        doc: &D,
        direction: Direction,
        focus_root: D::Element,
        options: &NavigationOptions<D::Element>,
    ) -> Result<Option<FindResult<D::Element>>, FocusError>
    where
        D: Document<Frame = F>,
    {
        let reference = self.reference(doc, options.reference_element, options.reference_rect);

        if let Some(element) = reference.element
            && let Some(result) = self.resolve_override(doc, direction, element, reference.rect)?
        {
            return Ok(result);
        }

        let history = options.history_rect.unwrap_or(IntRect::DEFAULT);
        let viewport = doc.viewport_size();
        let max_distance = viewport.width.max(viewport.height);

        let mut best: Option<(D::Element, IntRect, f64)> = None;
        for candidate in doc.descendants(focus_root) {
            if reference.element == Some(candidate)
                || options.exclude == Some(candidate)
                || !self.is_focusable(doc, candidate)
                || self.in_inactive_toggle_container(doc, candidate)
            {
                continue;
            }
            let rect = IntRect::from_rect(doc.bounding_rect(candidate));
            if rect.width() == 0 || rect.height() == 0 {
                continue;
            }
            let s = score(direction, max_distance, &history, &reference.rect, &rect);
            tracing::trace!(?candidate, score = s, "scored candidate");
            // Strict comparison keeps the first candidate in document order on ties.
            if s > best.map_or(0.0, |(_, _, b)| b) {
                best = Some((candidate, rect, s));
            }
        }

        Ok(best.map(|(target, target_rect, _)| FindResult {
            target,
            target_rect,
            reference_rect: reference.rect,
            used_override: false,
        }))
    }

    /// Apply the reference element's override attribute.
    ///
    /// The outer `Option` says whether the override decided the lookup; the
    /// inner one is the decision (`None` when the override points at the
    /// element that is already focused).
    fn resolve_override<D>(
        &self,
        doc: &D,
        direction: Direction,
        element: D::Element,
        reference_rect: IntRect,
    ) -> Result<Option<Option<FindResult<D::Element>>>, FocusError>
    where
        D: Document<Frame = F>,
    {
        let Some(raw) = doc.attribute(element, &self.config.override_attribute) else {
            return Ok(None);
        };
        let map = OverrideMap::parse(raw)?;
        let Some(selector) = map.selector(direction) else {
            return Ok(None);
        };

        let mut scope = Some(element);
        while let Some(s) = scope {
            if let Some(target) = doc.query_selector(s, selector) {
                if doc.active_element() == Some(target) {
                    tracing::debug!(%direction, selector, "override targets the focused element");
                    return Ok(Some(None));
                }
                tracing::debug!(%direction, selector, ?target, "override matched");
                return Ok(Some(Some(FindResult {
                    target,
                    target_rect: IntRect::from_rect(doc.bounding_rect(target)),
                    reference_rect,
                    used_override: true,
                })));
            }
            scope = doc.parent(s);
        }
        Ok(None)
    }
}
