// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Input modes.
//!
//! Editable widgets (text inputs, sliders, date pickers) use the direction
//! keys themselves. Such elements start in [`InputMode::ToggleModeRest`],
//! where direction keys still navigate; accept switches them to
//! [`InputMode::ToggleModeActive`], where the widget owns the keys until
//! cancel switches back.

use crate::config::ClassNames;
use crate::document::Document;

/// `INPUT` types that consume direction keys.
pub const TOGGLE_INPUT_TYPES: [&str; 14] = [
    "date",
    "datetime",
    "datetime-local",
    "email",
    "month",
    "number",
    "password",
    "range",
    "search",
    "tel",
    "text",
    "time",
    "url",
    "week",
];

/// How the focused element wants key input handled.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum InputMode {
    /// Plain element: accept clicks, directions navigate.
    Rest,
    /// Navigation is switched off for this subtree.
    Suspended,
    /// Toggle-capable element that does not own the direction keys yet.
    ToggleModeRest,
    /// Toggle-capable element that owns the direction keys.
    ToggleModeActive,
}

impl InputMode {
    /// Classify `element`.
    pub fn classify<D: Document>(doc: &D, element: D::Element, classes: &ClassNames) -> Self {
        if doc.is_within_class(element, &classes.suspended) {
            return Self::Suspended;
        }
        if !is_toggle_capable(doc, element, classes) {
            return Self::Rest;
        }
        if doc.has_class(element, &classes.toggle_mode_active) {
            Self::ToggleModeActive
        } else {
            Self::ToggleModeRest
        }
    }

    /// Whether direction keys should move focus.
    pub fn allows_navigation(self) -> bool {
        matches!(self, Self::Rest | Self::ToggleModeRest)
    }

    /// Apply the accept action to `element`. Returns whether it was handled.
    pub fn accept<D: Document>(self, doc: &mut D, element: D::Element, classes: &ClassNames) -> bool {
        match self {
            Self::Rest | Self::ToggleModeActive => {
                doc.click(element);
                true
            }
            Self::ToggleModeRest => {
                doc.add_class(element, &classes.toggle_mode_active);
                true
            }
            Self::Suspended => false,
        }
    }

    /// Apply the cancel action to `element`. Returns whether it was handled.
    pub fn cancel<D: Document>(self, doc: &mut D, element: D::Element, classes: &ClassNames) -> bool {
        match self {
            Self::ToggleModeActive => {
                doc.remove_class(element, &classes.toggle_mode_active);
                true
            }
            Self::Rest | Self::ToggleModeRest | Self::Suspended => false,
        }
    }
}

fn is_toggle_capable<D: Document>(doc: &D, element: D::Element, classes: &ClassNames) -> bool {
    if doc.has_class(element, &classes.toggle_mode) {
        return true;
    }
    let tag = doc.tag_name(element);
    if tag.eq_ignore_ascii_case("TEXTAREA") {
        return true;
    }
    if !tag.eq_ignore_ascii_case("INPUT") {
        return false;
    }
    // A missing type attribute means "text".
    let ty = doc.attribute(element, "type").unwrap_or("text");
    TOGGLE_INPUT_TYPES.iter().any(|t| t.eq_ignore_ascii_case(ty))
}
