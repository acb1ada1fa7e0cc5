// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Navigation history.
//!
//! Successive moves in one direction keep a corridor on the perpendicular
//! axis, so that moving right, right, left returns to the row the user
//! started on rather than drifting toward whatever element is nearest.

use crate::direction::Direction;
use crate::document::Document;
use crate::geometry::IntRect;
use crate::resolver::FindResult;

/// The corridor after moving in `direction` to `result`.
///
/// The perpendicular extent is the intersection of the target, the reference
/// and the `previous` corridor (`None` is unbounded). When the intersection is
/// empty the target's own extent is used. The travel axis is unbounded.
pub fn next_history_rect<E>(
    direction: Direction,
    result: &FindResult<E>,
    previous: Option<IntRect>,
) -> IntRect {
    let cross = direction.secondary_axis();
    let (target_min, target_max) = cross.extent(&result.target_rect);
    let (ref_min, ref_max) = cross.extent(&result.reference_rect);
    let (prev_min, prev_max) = previous.map_or(
        (IntRect::UNBOUNDED_MIN, IntRect::UNBOUNDED_MAX),
        |p| cross.extent(&p),
    );

    let mut min = target_min.max(ref_min).max(prev_min);
    let mut max = target_max.min(ref_max).min(prev_max);
    if max <= min {
        min = target_min;
        max = target_max;
    }

    let unbounded = IntRect::new(
        IntRect::UNBOUNDED_MIN,
        IntRect::UNBOUNDED_MIN,
        IntRect::UNBOUNDED_MAX,
        IntRect::UNBOUNDED_MAX,
    );
    cross.with_extent(unbounded, min, max)
}

/// What the engine remembers between moves.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NavigationHistory<E> {
    last_target: Option<E>,
    cached_last_target_rect: Option<IntRect>,
    history_rect: Option<IntRect>,
}

impl<E> Default for NavigationHistory<E> {
    fn default() -> Self {
        Self {
            last_target: None,
            cached_last_target_rect: None,
            history_rect: None,
        }
    }
}

impl<E: Copy + Eq> NavigationHistory<E> {
    /// Element the engine last moved focus to.
    pub fn last_target(&self) -> Option<E> {
        self.last_target
    }

    /// Current corridor, if any.
    pub fn history_rect(&self) -> Option<IntRect> {
        self.history_rect
    }

    /// Forget everything.
    pub fn invalidate(&mut self) {
        *self = Self::default();
    }

    /// Drop the history if it no longer describes the document.
    ///
    /// History is stale when the caller supplied its own reference rectangle,
    /// when focus moved without the engine, or when the last target moved
    /// (scrolling, relayout).
    pub fn revalidate<D>(&mut self, doc: &D, explicit_reference_rect: bool)
    where
        D: Document<Element = E>,
    {
        let moved = match (self.last_target, self.cached_last_target_rect) {
            (Some(target), Some(cached)) => {
                let now = IntRect::from_rect(doc.bounding_rect(target));
                now.left != cached.left || now.top != cached.top
            }
            _ => false,
        };
        let stale = explicit_reference_rect || doc.active_element() != self.last_target || moved;
        if stale && *self != Self::default() {
            tracing::debug!(explicit_reference_rect, "navigation history invalidated");
        }
        if stale {
            self.invalidate();
        }
    }

    /// Remember a completed move.
    pub fn record(&mut self, direction: Direction, result: &FindResult<E>) {
        self.history_rect = Some(next_history_rect(direction, result, self.history_rect));
        self.last_target = Some(result.target);
        self.cached_last_target_rect = Some(result.target_rect);
    }
}
