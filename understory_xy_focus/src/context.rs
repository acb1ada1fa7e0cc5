// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The per-document navigation context.

use core::fmt;

use crate::config::FocusConfig;
use crate::direction::Direction;
use crate::document::Document;
use crate::error::{FocusError, FrameError};
use crate::events::{FocusChanged, FocusChanging, ListenerId, Listeners, Outcome};
use crate::frames::{FrameChannel, FrameMessage, FrameRegistry};
use crate::geometry::IntRect;
use crate::history::NavigationHistory;
use crate::input::InputMode;
use crate::keys::{KeyAction, KeyCode};
use crate::resolver::{FindResult, NavigationOptions, Resolver};

/// Navigation state for one document.
///
/// A context is owned by the host alongside its document. Every call takes the
/// document explicitly and recomputes from its current state; the context only
/// remembers history, configuration, registered child frames and listeners.
///
/// Embedded documents each own their own context and talk to their parent
/// through a [`FrameChannel`].
pub struct NavigationContext<D: Document> {
    config: FocusConfig,
    history: NavigationHistory<D::Element>,
    focus_root: Option<D::Element>,
    frames: FrameRegistry<D::Frame>,
    listeners: Listeners<D, D::Element>,
}

impl<D: Document> fmt::Debug for NavigationContext<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NavigationContext")
            .field("config", &self.config)
            .field("history", &self.history)
            .field("focus_root", &self.focus_root)
            .field("frames", &self.frames)
            .field("listeners", &self.listeners)
            .finish()
    }
}

impl<D: Document> Default for NavigationContext<D> {
    fn default() -> Self {
        Self::new(FocusConfig::default())
    }
}

impl<D: Document> NavigationContext<D> {
    /// Create a context with `config`.
    pub fn new(config: FocusConfig) -> Self {
        Self {
            config,
            history: NavigationHistory::default(),
            focus_root: None,
            frames: FrameRegistry::new(),
            listeners: Listeners::default(),
        }
    }

    /// Current configuration.
    pub fn config(&self) -> &FocusConfig {
        &self.config
    }

    /// Mutable configuration, for example to rebind key codes.
    pub fn config_mut(&mut self) -> &mut FocusConfig {
        &mut self.config
    }

    /// Restrict navigation to the subtree under `root`. `None` restores the
    /// default (the body).
    pub fn set_focus_root(&mut self, root: Option<D::Element>) {
        self.focus_root = root;
    }

    /// The subtree navigation searches.
    pub fn focus_root(&self, doc: &D) -> D::Element {
        self.focus_root.unwrap_or_else(|| doc.body())
    }

    /// History kept between moves.
    pub fn history(&self) -> &NavigationHistory<D::Element> {
        &self.history
    }

    /// Child frames known to host a compatible engine.
    pub fn frames(&self) -> &FrameRegistry<D::Frame> {
        &self.frames
    }

    /// Register a listener for [`FocusChanging`].
    ///
    /// Listeners get the document but not this context, so they cannot call
    /// [`move_focus`](Self::move_focus) or [`xy_focus`](Self::xy_focus)
    /// re-entrantly. To redirect a move, focus another element through the
    /// document and set `default_prevented`; the original move then reports
    /// failure because its target did not end up focused.
    pub fn add_focus_changing_listener(
        &mut self,
        listener: impl FnMut(&mut D, &mut FocusChanging<D::Element>) -> Outcome + 'static,
    ) -> ListenerId {
        self.listeners.add_changing(listener)
    }

    /// Register a listener for [`FocusChanged`].
    pub fn add_focus_changed_listener(
        &mut self,
        listener: impl FnMut(&mut D, &FocusChanged<D::Element>) -> Outcome + 'static,
    ) -> ListenerId {
        self.listeners.add_changed(listener)
    }

    /// Remove a listener. Returns `false` if `id` was not registered.
    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    fn resolver(&self) -> Resolver<'_, D::Frame> {
        Resolver {
            config: &self.config,
            frames: &self.frames,
        }
    }

    /// Whether `element` may receive focus from directional navigation.
    pub fn is_focusable(&self, doc: &D, element: D::Element) -> bool {
        self.resolver().is_focusable(doc, element)
    }

    fn find_next(
        &self,
        doc: &D,
        direction: Direction,
        options: &NavigationOptions<D::Element>,
    ) -> Result<Option<FindResult<D::Element>>, FocusError> {
        let root = options.focus_root.unwrap_or_else(|| self.focus_root(doc));
        self.resolver().find_next(doc, direction, root, options)
    }

    /// The element focus would move to in `direction`, without moving it.
    pub fn find_next_focus_element(
        &self,
        doc: &D,
        direction: Direction,
        options: &NavigationOptions<D::Element>,
    ) -> Result<Option<D::Element>, FocusError> {
        Ok(self.find_next(doc, direction, options)?.map(|r| r.target))
    }

    /// Move focus in `direction`.
    ///
    /// Returns the newly focused element, or `None` when there was no
    /// candidate or the move was canceled. History is neither consulted nor
    /// updated; see [`xy_focus`](Self::xy_focus) for the key-driven path.
    pub fn move_focus(
        &mut self,
        doc: &mut D,
        direction: Direction,
        options: &NavigationOptions<D::Element>,
    ) -> Result<Option<D::Element>, FocusError> {
        let Some(result) = self.find_next(doc, direction, options)? else {
            return Ok(None);
        };
        let previous = doc.active_element();
        if !self.try_set_focus(doc, result.target, None) {
            return Ok(None);
        }
        self.listeners.dispatch_changed(
            doc,
            &FocusChanged {
                previous_focus_element: previous,
                key_code: None,
            },
        );
        Ok(Some(result.target))
    }

    /// Raise [`FocusChanging`], then focus `element` unless a listener
    /// prevented it. Returns whether `element` is focused afterwards.
    fn try_set_focus(
        &mut self,
        doc: &mut D,
        element: D::Element,
        key_code: Option<KeyCode>,
    ) -> bool {
        let mut event = FocusChanging {
            next_focus_element: element,
            key_code,
            default_prevented: false,
        };
        if self.listeners.dispatch_changing(doc, &mut event) {
            tracing::debug!(?element, "focus change prevented");
        } else {
            doc.focus(element);
        }
        doc.active_element() == Some(element)
    }

    /// Drop registered frames that can no longer be reached.
    pub fn prune_frames(&mut self, doc: &D) -> usize {
        self.frames.prune(|frame| doc.frame_element(frame).map(|_| ()))
    }

    /// Key-driven move: consult and update history, hand off to child and
    /// parent frames.
    ///
    /// `reference_rect`, when given, replaces the active element as the
    /// starting point and resets history. With `allow_exit`, an embedded
    /// document that finds nothing forwards the request to its parent and
    /// reports success.
    pub fn xy_focus<C>(
        &mut self,
        doc: &mut D,
        channel: &mut C,
        direction: Direction,
        key_code: Option<KeyCode>,
        reference_rect: Option<IntRect>,
        allow_exit: bool,
    ) -> Result<bool, FocusError>
    where
        C: FrameChannel<D::Frame> + ?Sized,
    {
        let options = NavigationOptions {
            reference_rect,
            ..NavigationOptions::default()
        };
        self.xy_focus_with(doc, channel, direction, key_code, options, allow_exit)
    }

    /// [`xy_focus`](Self::xy_focus) with full lookup options. The history
    /// rect is always taken from the context.
    fn xy_focus_with<C>(
        &mut self,
        doc: &mut D,
        channel: &mut C,
        direction: Direction,
        key_code: Option<KeyCode>,
        options: NavigationOptions<D::Element>,
        allow_exit: bool,
    ) -> Result<bool, FocusError>
    where
        C: FrameChannel<D::Frame> + ?Sized,
    {
        let reference_rect = options.reference_rect;
        self.history.revalidate(&*doc, reference_rect.is_some());
        self.prune_frames(doc);

        let options = NavigationOptions {
            history_rect: self.history.history_rect(),
            ..options
        };
        let found = self.find_next(doc, direction, &options)?;
        let previous = doc.active_element();

        if let Some(result) = found
            && self.try_set_focus(doc, result.target, key_code)
        {
            self.history.record(direction, &result);
            let target = result.target;
            tracing::debug!(%direction, ?target, used_override = result.used_override, "moved focus");

            let classes = &self.config.classes;
            if doc.has_class(target, &classes.toggle_mode) {
                doc.remove_class(target, &classes.toggle_mode_active);
            }
            if doc.tag_name(target).eq_ignore_ascii_case("IFRAME") {
                self.enter_frame(doc, channel, direction, &result);
            }

            self.listeners.dispatch_changed(
                doc,
                &FocusChanged {
                    previous_focus_element: previous,
                    key_code,
                },
            );
            return Ok(true);
        }

        if allow_exit && channel.is_embedded() {
            // With nothing focused, leave from the whole document.
            let from = previous.unwrap_or_else(|| doc.body());
            let rect =
                reference_rect.unwrap_or_else(|| IntRect::from_rect(doc.bounding_rect(from)));
            tracing::debug!(%direction, ?rect, "forwarding focus to parent frame");
            channel.send_to_parent(FrameMessage::FocusExit {
                direction,
                reference_rect: rect.into(),
            });
            return Ok(true);
        }
        Ok(false)
    }

    /// Forward a move that landed on a registered `IFRAME` into its frame.
    fn enter_frame<C>(
        &mut self,
        doc: &D,
        channel: &mut C,
        direction: Direction,
        result: &FindResult<D::Element>,
    ) where
        C: FrameChannel<D::Frame> + ?Sized,
    {
        let frame = match doc.content_frame(result.target) {
            Ok(Some(frame)) if self.frames.contains(frame) => frame,
            Ok(_) => return,
            Err(FrameError::Unreachable) => {
                self.prune_frames(doc);
                return;
            }
        };
        // Child coordinates are relative to the `IFRAME`'s top-left corner.
        let rect = result.reference_rect.translated(
            result.target_rect.left.saturating_neg(),
            result.target_rect.top.saturating_neg(),
        );
        tracing::debug!(%direction, ?frame, ?rect, "forwarding focus into child frame");
        let message = FrameMessage::FocusEnter {
            direction,
            reference_rect: rect.into(),
        };
        if let Err(FrameError::Unreachable) = channel.send_to_frame(frame, message) {
            tracing::warn!(?frame, "pruning unreachable frame");
            self.frames.unregister(frame);
        }
    }

    /// Handle a key press on the active element.
    ///
    /// Returns `true` when the key was consumed and the host should suppress
    /// its default action.
    pub fn handle_key_down<C>(
        &mut self,
        doc: &mut D,
        channel: &mut C,
        key_code: KeyCode,
    ) -> Result<bool, FocusError>
    where
        C: FrameChannel<D::Frame> + ?Sized,
    {
        let Some(action) = self.config.key_codes.action_for(key_code) else {
            return Ok(false);
        };
        let active = doc.active_element().unwrap_or_else(|| doc.body());
        let mode = InputMode::classify(&*doc, active, &self.config.classes);
        tracing::trace!(key_code, ?action, ?mode, "key down");
        match action {
            KeyAction::Accept => Ok(mode.accept(doc, active, &self.config.classes)),
            KeyAction::Cancel => Ok(mode.cancel(doc, active, &self.config.classes)),
            KeyAction::Navigate(direction) if mode.allows_navigation() => {
                self.xy_focus(doc, channel, direction, Some(key_code), None, true)
            }
            KeyAction::Navigate(_) => Ok(false),
        }
    }

    /// Tell the parent frame this document hosts a compatible engine.
    pub fn announce_loaded<C>(&self, channel: &mut C)
    where
        C: FrameChannel<D::Frame> + ?Sized,
    {
        if channel.is_embedded() {
            channel.send_to_parent(FrameMessage::Register);
        }
    }

    /// Tell the parent frame this document is going away.
    pub fn announce_unloading<C>(&self, channel: &mut C)
    where
        C: FrameChannel<D::Frame> + ?Sized,
    {
        if channel.is_embedded() {
            channel.send_to_parent(FrameMessage::Unregister);
        }
    }

    /// Process a message received from `source`.
    ///
    /// `Register`, `Unregister` and `FocusExit` come from child frames;
    /// `FocusEnter` comes from the parent.
    pub fn handle_message<C>(
        &mut self,
        doc: &mut D,
        channel: &mut C,
        source: D::Frame,
        message: FrameMessage,
    ) -> Result<(), FocusError>
    where
        C: FrameChannel<D::Frame> + ?Sized,
    {
        match message {
            FrameMessage::Register => match channel.attach_unload_hook(source) {
                Ok(()) => {
                    tracing::debug!(?source, "registered child frame");
                    self.frames.register(source);
                }
                Err(FrameError::Unreachable) => {
                    tracing::warn!(?source, "ignoring registration from unreachable frame");
                }
            },
            FrameMessage::Unregister => {
                tracing::debug!(?source, "unregistered child frame");
                self.frames.unregister(source);
            }
            FrameMessage::FocusEnter {
                direction,
                reference_rect,
            } => {
                let rect = IntRect::from(reference_rect);
                if !self.xy_focus(doc, channel, direction, None, Some(rect), false)? {
                    let body = doc.body();
                    if self.is_focusable(doc, body) {
                        doc.focus(body);
                    } else {
                        self.xy_focus(doc, channel, direction, None, None, true)?;
                    }
                }
            }
            FrameMessage::FocusExit {
                direction,
                reference_rect,
            } => {
                let iframe = match doc.frame_element(source) {
                    Ok(Some(iframe)) => iframe,
                    Ok(None) => return Ok(()),
                    Err(FrameError::Unreachable) => {
                        tracing::warn!(frame = ?source, "pruning unreachable frame");
                        self.frames.unregister(source);
                        return Ok(());
                    }
                };
                if doc.active_element() != Some(iframe) {
                    tracing::debug!(?source, "ignoring focus exit from unfocused frame");
                    return Ok(());
                }
                let offset = IntRect::from_rect(doc.bounding_rect(iframe));
                let rect = IntRect::from(reference_rect).translated(offset.left, offset.top);
                // Leaving a frame never lands back on it.
                let options = NavigationOptions {
                    reference_rect: Some(rect),
                    exclude: Some(iframe),
                    ..NavigationOptions::default()
                };
                self.xy_focus_with(doc, channel, direction, None, options, true)?;
            }
        }
        Ok(())
    }

    /// Mark the body with the directional-host class when configured.
    pub fn apply_platform_marker(&self, doc: &mut D) {
        if self.config.directional_host {
            let body = doc.body();
            doc.add_class(body, &self.config.classes.directional_host);
        }
    }
}
