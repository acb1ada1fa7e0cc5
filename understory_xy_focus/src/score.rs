// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Candidate scoring.
//!
//! A candidate's score rewards, in decreasing order of weight:
//!
//! - overlap with the history corridor on the perpendicular axis,
//! - closeness along the axis of travel (boosted by perpendicular overlap
//!   with the reference),
//! - closeness along the perpendicular axis when there is no overlap at all.
//!
//! Distances are inverted against `max_distance` so that nearer candidates
//! produce larger positive numbers. Candidates behind the reference or
//! farther away than `max_distance` score exactly zero.

use crate::direction::Direction;
use crate::geometry::{IntRect, percent_in_shadow};

/// Weight applied to the inverted distance along the axis of travel.
pub const PRIMARY_AXIS_DISTANCE_WEIGHT: f64 = 30.0;

/// Weight applied to the inverted perpendicular distance.
pub const SECONDARY_AXIS_DISTANCE_WEIGHT: f64 = 20.0;

/// Weight applied to the overlap with the history corridor.
pub const PERCENT_IN_HISTORY_SHADOW_WEIGHT: f64 = 100_000.0;

/// Score `potential` as the next focus target when moving in `direction`
/// away from `reference`.
///
/// Returns `0.0` for candidates on the wrong side of the reference along the
/// axis of travel and for candidates more than `max_distance` away on either
/// axis. A candidate that overlaps the reference along the axis of travel has
/// a negative gap and so scores higher than any candidate past the reference.
pub fn score(
    direction: Direction,
    max_distance: f64,
    history: &IntRect,
    reference: &IntRect,
    potential: &IntRect,
) -> f64 {
    let behind = match direction {
        Direction::Left => potential.left >= reference.left,
        Direction::Right => potential.right <= reference.right,
        Direction::Up => potential.top >= reference.top,
        Direction::Down => potential.bottom <= reference.bottom,
    };
    if behind {
        return 0.0;
    }

    let primary_gap = match direction {
        Direction::Left => i64::from(reference.left) - i64::from(potential.right),
        Direction::Right => i64::from(potential.left) - i64::from(reference.right),
        Direction::Up => i64::from(reference.top) - i64::from(potential.bottom),
        Direction::Down => i64::from(potential.top) - i64::from(reference.bottom),
    };
    let axis = direction.secondary_axis();
    let (ref_min, ref_max) = axis.extent(reference);
    let (pot_min, pot_max) = axis.extent(potential);
    let shadow = percent_in_shadow(ref_min, ref_max, pot_min, pot_max);

    let mut secondary_gap = 0_i64;
    let mut history_shadow = 0.0;
    if shadow > 0.0 {
        let (hist_min, hist_max) = axis.extent(history);
        history_shadow = percent_in_shadow(hist_min, hist_max, pot_min, pot_max);
    } else if ref_max <= pot_min {
        secondary_gap = i64::from(pot_min) - i64::from(ref_max);
    } else {
        secondary_gap = i64::from(ref_min) - i64::from(pot_max);
    }

    let primary = max_distance - primary_gap as f64;
    let secondary = max_distance - secondary_gap as f64;
    if primary < 0.0 || secondary < 0.0 {
        return 0.0;
    }

    let primary = primary * (1.0 + shadow);
    primary * PRIMARY_AXIS_DISTANCE_WEIGHT
        + secondary * SECONDARY_AXIS_DISTANCE_WEIGHT
        + history_shadow * PERCENT_IN_HISTORY_SHADOW_WEIGHT
}
