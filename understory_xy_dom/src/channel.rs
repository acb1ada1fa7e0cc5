// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A frame channel that records what it is asked to send.

use alloc::vec::Vec;

use hashbrown::HashSet;
use understory_xy_focus::{FrameChannel, FrameError, FrameMessage};

use crate::types::FrameId;

/// Records outgoing frame messages instead of delivering them.
///
/// Hosts (and tests) drain the queues and route messages to the right
/// context themselves, which keeps delivery explicit and deterministic.
#[derive(Clone, Debug, Default)]
pub struct Outbox {
    embedded: bool,
    /// Messages sent to the parent frame, oldest first.
    pub to_parent: Vec<FrameMessage>,
    /// Messages sent to child frames, oldest first.
    pub to_frames: Vec<(FrameId, FrameMessage)>,
    /// Frames an unload hook was attached to.
    pub unload_hooks: Vec<FrameId>,
    unreachable: HashSet<FrameId>,
}

impl Outbox {
    /// An outbox for a top-level document.
    pub fn top_level() -> Self {
        Self::default()
    }

    /// An outbox for a document embedded in a parent frame.
    pub fn embedded() -> Self {
        Self {
            embedded: true,
            ..Self::default()
        }
    }

    /// Make sends and hooks targeting `frame` fail with
    /// [`FrameError::Unreachable`].
    pub fn mark_unreachable(&mut self, frame: FrameId) {
        self.unreachable.insert(frame);
    }

    fn check(&self, frame: FrameId) -> Result<(), FrameError> {
        if self.unreachable.contains(&frame) {
            Err(FrameError::Unreachable)
        } else {
            Ok(())
        }
    }
}

impl FrameChannel<FrameId> for Outbox {
    fn is_embedded(&self) -> bool {
        self.embedded
    }

    fn send_to_parent(&mut self, message: FrameMessage) {
        if self.embedded {
            self.to_parent.push(message);
        }
    }

    fn send_to_frame(&mut self, frame: FrameId, message: FrameMessage) -> Result<(), FrameError> {
        self.check(frame)?;
        self.to_frames.push((frame, message));
        Ok(())
    }

    fn attach_unload_hook(&mut self, frame: FrameId) -> Result<(), FrameError> {
        self.check(frame)?;
        self.unload_hooks.push(frame);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn top_level_drops_parent_messages() {
        let mut outbox = Outbox::top_level();
        outbox.send_to_parent(FrameMessage::Register);
        assert!(outbox.to_parent.is_empty());

        let mut outbox = Outbox::embedded();
        outbox.send_to_parent(FrameMessage::Register);
        assert_eq!(outbox.to_parent, [FrameMessage::Register]);
    }

    #[test]
    fn unreachable_frames_fail() {
        let mut outbox = Outbox::top_level();
        outbox.mark_unreachable(FrameId(3));
        assert_eq!(
            outbox.send_to_frame(FrameId(3), FrameMessage::Unregister),
            Err(FrameError::Unreachable)
        );
        assert_eq!(
            outbox.attach_unload_hook(FrameId(3)),
            Err(FrameError::Unreachable)
        );
        assert!(outbox.attach_unload_hook(FrameId(4)).is_ok());
        assert_eq!(outbox.unload_hooks, [FrameId(4)]);
    }
}
