// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Physical key codes and their mapping to logical actions.
//!
//! ```rust
//! use understory_xy_focus::{Direction, KeyAction, KeyCodeMap, keys};
//!
//! let mut map = KeyCodeMap::default();
//! assert_eq!(map.action_for(keys::ARROW_LEFT), None);
//!
//! map.left.push(keys::ARROW_LEFT);
//! assert_eq!(
//!     map.action_for(keys::ARROW_LEFT),
//!     Some(KeyAction::Navigate(Direction::Left))
//! );
//! ```

use serde::{Deserialize, Serialize};
use smallvec::{SmallVec, smallvec};

use crate::direction::Direction;

/// A platform key code.
pub type KeyCode = u32;

/// Enter.
pub const ENTER: KeyCode = 13;
/// Escape.
pub const ESCAPE: KeyCode = 27;
/// Left arrow.
pub const ARROW_LEFT: KeyCode = 37;
/// Up arrow.
pub const ARROW_UP: KeyCode = 38;
/// Right arrow.
pub const ARROW_RIGHT: KeyCode = 39;
/// Down arrow.
pub const ARROW_DOWN: KeyCode = 40;
/// Navigation up (remote controls and similar devices).
pub const NAVIGATION_UP: KeyCode = 138;
/// Navigation down.
pub const NAVIGATION_DOWN: KeyCode = 139;
/// Navigation left.
pub const NAVIGATION_LEFT: KeyCode = 140;
/// Navigation right.
pub const NAVIGATION_RIGHT: KeyCode = 141;
/// Navigation accept.
pub const NAVIGATION_ACCEPT: KeyCode = 142;
/// Navigation cancel.
pub const NAVIGATION_CANCEL: KeyCode = 143;
/// Gamepad A.
pub const GAMEPAD_A: KeyCode = 195;
/// Gamepad B.
pub const GAMEPAD_B: KeyCode = 196;
/// Gamepad D-pad up.
pub const GAMEPAD_DPAD_UP: KeyCode = 203;
/// Gamepad D-pad down.
pub const GAMEPAD_DPAD_DOWN: KeyCode = 204;
/// Gamepad D-pad left.
pub const GAMEPAD_DPAD_LEFT: KeyCode = 205;
/// Gamepad D-pad right.
pub const GAMEPAD_DPAD_RIGHT: KeyCode = 206;
/// Gamepad left thumbstick pushed up.
pub const GAMEPAD_LEFT_THUMBSTICK_UP: KeyCode = 211;
/// Gamepad left thumbstick pushed down.
pub const GAMEPAD_LEFT_THUMBSTICK_DOWN: KeyCode = 212;
/// Gamepad left thumbstick pushed right.
pub const GAMEPAD_LEFT_THUMBSTICK_RIGHT: KeyCode = 213;
/// Gamepad left thumbstick pushed left.
pub const GAMEPAD_LEFT_THUMBSTICK_LEFT: KeyCode = 214;

/// Logical action a key maps to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum KeyAction {
    /// Activate the focused element.
    Accept,
    /// Back out of the current interaction.
    Cancel,
    /// Move focus spatially.
    Navigate(Direction),
}

/// Codes per logical action. Several codes may map to the same action.
///
/// The lists are plain public fields so hosts can add or remove codes for
/// the devices they support.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyCodeMap {
    /// Codes that move left.
    pub left: SmallVec<[KeyCode; 4]>,
    /// Codes that move right.
    pub right: SmallVec<[KeyCode; 4]>,
    /// Codes that move up.
    pub up: SmallVec<[KeyCode; 4]>,
    /// Codes that move down.
    pub down: SmallVec<[KeyCode; 4]>,
    /// Codes that activate.
    pub accept: SmallVec<[KeyCode; 4]>,
    /// Codes that cancel.
    pub cancel: SmallVec<[KeyCode; 4]>,
}

impl Default for KeyCodeMap {
    /// Gamepad D-pad, left thumbstick, and navigation keys.
    fn default() -> Self {
        Self {
            left: smallvec![
                GAMEPAD_LEFT_THUMBSTICK_LEFT,
                GAMEPAD_DPAD_LEFT,
                NAVIGATION_LEFT
            ],
            right: smallvec![
                GAMEPAD_LEFT_THUMBSTICK_RIGHT,
                GAMEPAD_DPAD_RIGHT,
                NAVIGATION_RIGHT
            ],
            up: smallvec![GAMEPAD_LEFT_THUMBSTICK_UP, GAMEPAD_DPAD_UP, NAVIGATION_UP],
            down: smallvec![
                GAMEPAD_LEFT_THUMBSTICK_DOWN,
                GAMEPAD_DPAD_DOWN,
                NAVIGATION_DOWN
            ],
            accept: smallvec![GAMEPAD_A, NAVIGATION_ACCEPT],
            cancel: smallvec![GAMEPAD_B, NAVIGATION_CANCEL],
        }
    }
}

impl KeyCodeMap {
    /// A map with no codes at all.
    pub fn empty() -> Self {
        Self {
            left: SmallVec::new(),
            right: SmallVec::new(),
            up: SmallVec::new(),
            down: SmallVec::new(),
            accept: SmallVec::new(),
            cancel: SmallVec::new(),
        }
    }

    /// The default map plus keyboard arrows, Enter and Escape.
    pub fn with_arrow_keys() -> Self {
        let mut map = Self::default();
        map.left.push(ARROW_LEFT);
        map.right.push(ARROW_RIGHT);
        map.up.push(ARROW_UP);
        map.down.push(ARROW_DOWN);
        map.accept.push(ENTER);
        map.cancel.push(ESCAPE);
        map
    }

    /// Codes bound to a direction.
    pub fn codes_for(&self, direction: Direction) -> &[KeyCode] {
        match direction {
            Direction::Left => &self.left,
            Direction::Right => &self.right,
            Direction::Up => &self.up,
            Direction::Down => &self.down,
        }
    }

    /// Resolve a code. Lists are checked in the order accept, cancel, left,
    /// right, up, down; the first list containing `code` wins.
    pub fn action_for(&self, code: KeyCode) -> Option<KeyAction> {
        if self.accept.contains(&code) {
            return Some(KeyAction::Accept);
        }
        if self.cancel.contains(&code) {
            return Some(KeyAction::Cancel);
        }
        Direction::ALL
            .into_iter()
            .find(|d| self.codes_for(*d).contains(&code))
            .map(KeyAction::Navigate)
    }
}
