// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Integer rectangles and 1-D shadow math.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::Rect;

/// An axis-aligned rectangle in whole pixels.
///
/// Layout engines report fractional bounds; scoring works on floored integer
/// edges so that sub-pixel jitter between measurements does not change which
/// candidate wins. Only the four edges are stored, so `right == left + width()`
/// and `bottom == top + height()` always hold.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct IntRect {
    /// Left edge.
    pub left: i32,
    /// Top edge.
    pub top: i32,
    /// Right edge.
    pub right: i32,
    /// Bottom edge.
    pub bottom: i32,
}

impl IntRect {
    /// Sentinel used when there is no reference to navigate from.
    ///
    /// All edges are `-1` rather than `0` so that elements touching the top or
    /// left edge of the viewport still lie strictly after it.
    pub const DEFAULT: Self = Self {
        left: -1,
        top: -1,
        right: -1,
        bottom: -1,
    };

    /// Lower sentinel for an unbounded axis.
    pub const UNBOUNDED_MIN: i32 = i32::MIN;

    /// Upper sentinel for an unbounded axis.
    pub const UNBOUNDED_MAX: i32 = i32::MAX;

    /// Create a rectangle from its edges.
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Create a rectangle from an origin and a size.
    pub const fn from_origin_size(left: i32, top: i32, width: i32, height: i32) -> Self {
        Self::new(left, top, left + width, top + height)
    }

    /// Floor the edges of a fractional rectangle.
    ///
    /// Infinite edges saturate to the unbounded sentinels.
    pub fn from_rect(rect: Rect) -> Self {
        Self {
            left: floor_to_i32(rect.x0),
            top: floor_to_i32(rect.y0),
            right: floor_to_i32(rect.x1),
            bottom: floor_to_i32(rect.y1),
        }
    }

    /// Width derived from the edges. Saturates for unbounded rectangles.
    pub fn width(&self) -> i32 {
        self.right.saturating_sub(self.left)
    }

    /// Height derived from the edges. Saturates for unbounded rectangles.
    pub fn height(&self) -> i32 {
        self.bottom.saturating_sub(self.top)
    }

    /// Returns `true` if either dimension is zero or negative.
    pub fn is_empty(&self) -> bool {
        self.width() <= 0 || self.height() <= 0
    }

    /// Offset all edges, saturating at the unbounded sentinels.
    pub fn translated(&self, dx: i32, dy: i32) -> Self {
        Self {
            left: self.left.saturating_add(dx),
            top: self.top.saturating_add(dy),
            right: self.right.saturating_add(dx),
            bottom: self.bottom.saturating_add(dy),
        }
    }

    /// Convert back into a `kurbo` rectangle.
    pub fn to_rect(&self) -> Rect {
        Rect::new(
            f64::from(self.left),
            f64::from(self.top),
            f64::from(self.right),
            f64::from(self.bottom),
        )
    }
}

impl From<Rect> for IntRect {
    fn from(rect: Rect) -> Self {
        Self::from_rect(rect)
    }
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "Float to int casts saturate; NaN maps to zero."
)]
fn floor_to_i32(v: f64) -> i32 {
    v.floor() as i32
}

/// Fraction of the shorter of two intervals that the other one covers.
///
/// Returns `0.0` when `[min_ref, max_ref]` and `[min_pot, max_pot]` do not
/// overlap (intervals that merely touch do not overlap) or when the shorter
/// interval is empty. The result is in `[0, 1]`.
pub fn percent_in_shadow(min_ref: i32, max_ref: i32, min_pot: i32, max_pot: i32) -> f64 {
    if min_ref >= max_pot || max_ref <= min_pot {
        return 0.0;
    }
    // i64 keeps unbounded history intervals from overflowing.
    let overlap = i64::from(max_ref.min(max_pot)) - i64::from(min_ref.max(min_pot));
    let short_edge = (i64::from(max_pot) - i64::from(min_pot))
        .min(i64::from(max_ref) - i64::from(min_ref));
    if short_edge <= 0 {
        return 0.0;
    }
    overlap as f64 / short_edge as f64
}
