// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Focus change notifications.
//!
//! Two events are raised around every focus move performed by the engine:
//!
//! - [`FocusChanging`] before focus moves. Listeners may set
//!   [`FocusChanging::default_prevented`] to veto the move.
//! - [`FocusChanged`] after focus actually moved.
//!
//! Listeners run in registration order. A listener returning
//! [`Outcome::Stop`] skips the remaining listeners for that event; like the
//! responder dispatcher, [`Outcome`] only controls propagation, and
//! "default prevented" lives on the event payload.
//!
//! Listeners receive the document mutably so they can react to the move, for
//! example by focusing a different element. The engine always re-reads the
//! active element after dispatch.

use alloc::boxed::Box;
use alloc::vec::Vec;

use crate::keys::KeyCode;

/// Propagation control returned by listeners.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Keep notifying later listeners.
    Continue,
    /// Skip later listeners.
    Stop,
}

/// Raised before the engine moves focus.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FocusChanging<E> {
    /// Element about to receive focus.
    pub next_focus_element: E,
    /// Key that triggered the move, or `None` for API calls.
    pub key_code: Option<KeyCode>,
    /// Set by a listener to cancel the move.
    pub default_prevented: bool,
}

/// Raised after the engine moved focus.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FocusChanged<E> {
    /// Element that had focus before the move.
    pub previous_focus_element: Option<E>,
    /// Key that triggered the move, or `None` for API calls.
    pub key_code: Option<KeyCode>,
}

/// Handle for removing a listener.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type ChangingListener<D, E> = Box<dyn FnMut(&mut D, &mut FocusChanging<E>) -> Outcome>;
type ChangedListener<D, E> = Box<dyn FnMut(&mut D, &FocusChanged<E>) -> Outcome>;

/// Registered listeners for both events.
pub(crate) struct Listeners<D, E> {
    next_id: u64,
    changing: Vec<(ListenerId, ChangingListener<D, E>)>,
    changed: Vec<(ListenerId, ChangedListener<D, E>)>,
}

impl<D, E> core::fmt::Debug for Listeners<D, E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Listeners")
            .field("changing", &self.changing.len())
            .field("changed", &self.changed.len())
            .finish_non_exhaustive()
    }
}

impl<D, E> Default for Listeners<D, E> {
    fn default() -> Self {
        Self {
            next_id: 0,
            changing: Vec::new(),
            changed: Vec::new(),
        }
    }
}

impl<D, E> Listeners<D, E> {
    fn allocate(&mut self) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        id
    }

    pub(crate) fn add_changing(
        &mut self,
        listener: impl FnMut(&mut D, &mut FocusChanging<E>) -> Outcome + 'static,
    ) -> ListenerId {
        let id = self.allocate();
        self.changing.push((id, Box::new(listener)));
        id
    }

    pub(crate) fn add_changed(
        &mut self,
        listener: impl FnMut(&mut D, &FocusChanged<E>) -> Outcome + 'static,
    ) -> ListenerId {
        let id = self.allocate();
        self.changed.push((id, Box::new(listener)));
        id
    }

    pub(crate) fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.changing.len() + self.changed.len();
        self.changing.retain(|(i, _)| *i != id);
        self.changed.retain(|(i, _)| *i != id);
        before != self.changing.len() + self.changed.len()
    }

    /// Notify listeners; returns `true` if the move was canceled.
    pub(crate) fn dispatch_changing(&mut self, doc: &mut D, event: &mut FocusChanging<E>) -> bool {
        for (_, listener) in &mut self.changing {
            if listener(doc, event) == Outcome::Stop {
                break;
            }
        }
        event.default_prevented
    }

    pub(crate) fn dispatch_changed(&mut self, doc: &mut D, event: &FocusChanged<E>) {
        for (_, listener) in &mut self.changed {
            if listener(doc, event) == Outcome::Stop {
                break;
            }
        }
    }
}
