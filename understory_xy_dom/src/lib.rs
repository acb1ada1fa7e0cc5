// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory XY DOM: an in-memory document for `understory_xy_focus`.
//!
//! [`Dom`] is a small element tree with just enough of a browser document to
//! drive directional navigation: tags, attributes, classes, state flags,
//! viewport rectangles, an active element, and `IFRAME`s hosting child
//! frames. It implements [`understory_xy_focus::Document`].
//!
//! [`Outbox`] implements [`understory_xy_focus::FrameChannel`] by recording
//! messages, so multi-frame setups can be wired up by hand.
//!
//! Useful for hosts without a real DOM and for tests.
//!
//! ```rust
//! use understory_xy_dom::{Dom, ElementData, Outbox};
//! use understory_xy_focus::{Direction, Document, NavigationContext, NavigationOptions};
//!
//! let mut dom = Dom::new(800.0, 600.0);
//! let body = dom.body();
//! let a = dom.insert(Some(body), ElementData::new("button").bounds(0.0, 0.0, 50.0, 50.0));
//! let b = dom.insert(Some(body), ElementData::new("button").bounds(100.0, 0.0, 50.0, 50.0));
//! dom.focus(a);
//!
//! let mut cx = NavigationContext::<Dom>::default();
//! let mut outbox = Outbox::top_level();
//! assert!(cx.xy_focus(&mut dom, &mut outbox, Direction::Right, None, None, true).unwrap());
//! assert_eq!(dom.active_element(), Some(b));
//! ```
//!
//! Selector support is limited to simple selectors; see [`Selector`].
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod channel;
mod selector;
mod tree;
mod types;

pub use channel::Outbox;
pub use selector::Selector;
pub use tree::Dom;
pub use types::{ElementData, ElementId, FrameId};
