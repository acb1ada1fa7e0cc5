// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Travel directions and axes.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::geometry::IntRect;

/// Direction of spatial focus travel.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Toward smaller x.
    Left,
    /// Toward larger x.
    Right,
    /// Toward smaller y.
    Up,
    /// Toward larger y.
    Down,
}

/// One of the two screen axes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    /// The x axis.
    Horizontal,
    /// The y axis.
    Vertical,
}

impl Direction {
    /// All four directions.
    pub const ALL: [Self; 4] = [Self::Left, Self::Right, Self::Up, Self::Down];

    /// Axis of travel.
    pub const fn primary_axis(self) -> Axis {
        match self {
            Self::Left | Self::Right => Axis::Horizontal,
            Self::Up | Self::Down => Axis::Vertical,
        }
    }

    /// Axis orthogonal to travel.
    pub const fn secondary_axis(self) -> Axis {
        match self.primary_axis() {
            Axis::Horizontal => Axis::Vertical,
            Axis::Vertical => Axis::Horizontal,
        }
    }

    /// Lowercase name, as used in override attributes and on the wire.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Up => "up",
            Self::Down => "down",
        }
    }

    /// Name with the first letter capitalized.
    pub const fn as_title_str(self) -> &'static str {
        match self {
            Self::Left => "Left",
            Self::Right => "Right",
            Self::Up => "Up",
            Self::Down => "Down",
        }
    }
}

impl Axis {
    /// The `(min, max)` extent of `rect` along this axis.
    pub const fn extent(self, rect: &IntRect) -> (i32, i32) {
        match self {
            Self::Horizontal => (rect.left, rect.right),
            Self::Vertical => (rect.top, rect.bottom),
        }
    }

    /// Replace the extent of `rect` along this axis.
    pub const fn with_extent(self, rect: IntRect, min: i32, max: i32) -> IntRect {
        match self {
            Self::Horizontal => IntRect::new(min, rect.top, max, rect.bottom),
            Self::Vertical => IntRect::new(rect.left, min, rect.right, max),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown direction name.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown direction name")]
pub struct ParseDirectionError;

impl FromStr for Direction {
    type Err = ParseDirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(s))
            .ok_or(ParseDirectionError)
    }
}
