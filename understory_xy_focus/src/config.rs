// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Engine configuration.

use alloc::string::String;

use serde::{Deserialize, Serialize};

use crate::keys::KeyCodeMap;

/// Attribute holding per-direction override selectors.
pub const DEFAULT_OVERRIDE_ATTRIBUTE: &str = "data-xyfocus";

/// Class names the engine reads or writes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassNames {
    /// Opt-in marker making an arbitrary element focusable.
    pub focusable: String,
    /// Opt-out marker; applies to the element and its whole subtree.
    pub suspended: String,
    /// Marks an element whose own key handling competes with navigation.
    pub toggle_mode: String,
    /// Set while a toggle-mode element owns the direction keys.
    pub toggle_mode_active: String,
    /// Applied to the body on directional-input-first hosts.
    pub directional_host: String,
}

impl Default for ClassNames {
    fn default() -> Self {
        Self {
            focusable: "xyfocus-focusable".into(),
            suspended: "xyfocus-suspended".into(),
            toggle_mode: "xyfocus-togglemode".into(),
            toggle_mode_active: "xyfocus-togglemode-active".into(),
            directional_host: "xyfocus-directional-host".into(),
        }
    }
}

/// Configuration for a [`NavigationContext`](crate::NavigationContext).
///
/// Every field has a default, so partial configuration files deserialize.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FocusConfig {
    /// Class name contract.
    pub classes: ClassNames,
    /// Name of the override attribute.
    pub override_attribute: String,
    /// Key code bindings.
    pub key_codes: KeyCodeMap,
    /// Whether the host is driven primarily by directional input (gamepad,
    /// remote). Controls [`NavigationContext::apply_platform_marker`](crate::NavigationContext::apply_platform_marker).
    pub directional_host: bool,
}

impl Default for FocusConfig {
    fn default() -> Self {
        Self {
            classes: ClassNames::default(),
            override_attribute: DEFAULT_OVERRIDE_ATTRIBUTE.into(),
            key_codes: KeyCodeMap::default(),
            directional_host: false,
        }
    }
}
