#![forbid(unsafe_code)]

//! Bottom sheet component.
//!
//! A panel that slides up from the bottom edge, resizes by dragging its
//! handle, snaps to the nearest configured breakpoint on release, and
//! dismisses through a backdrop click, Escape or [`BottomSheet::hide`].
//!
//! The sheet is headless. It is driven by [`BottomSheet::handle_event`] and
//! [`BottomSheet::tick`], measures through a [`Geometry`] and draws through
//! a [`StyleSink`]. Both are attached by [`BottomSheet::mount`].
//!
//! # Example
//!
//! ```
//! use sheetkit_core::event::{Event, PointerPhase, RawPointerEvent};
//! use sheetkit_core::geometry::FixedGeometry;
//! use sheetkit_core::listener::ListenerRegistry;
//! use sheetkit_widgets::bottom_sheet::{BottomSheet, RecordingSink};
//! use sheetkit_widgets::config::SheetConfig;
//! use web_time::{Duration, Instant};
//!
//! let mut sheet = BottomSheet::new(SheetConfig::default(), ListenerRegistry::new());
//! sheet.mount(RecordingSink::new(), FixedGeometry::new(1000.0, 500.0));
//! sheet.show();
//!
//! let now = Instant::now();
//! sheet.handle_event(&Event::handle(RawPointerEvent::mouse(PointerPhase::Down, 700.0)), now);
//! sheet.handle_event(&Event::document(RawPointerEvent::mouse(PointerPhase::Move, 520.0)), now);
//! sheet.handle_event(&Event::document(RawPointerEvent::mouse(PointerPhase::Up, 520.0)), now);
//! assert_eq!(sheet.current_breakpoint(), 0.7);
//!
//! sheet.hide(now);
//! assert!(sheet.is_open());
//! sheet.tick(now + Duration::from_millis(300));
//! assert!(!sheet.is_open());
//! ```
//!
//! # Invariants
//!
//! 1. A drag session exists iff drag-continuation listeners are attached.
//! 2. This sheet never holds more than one registration per listener kind.
//! 3. While a drag is active the live height stays within the breakpoint
//!    range; the settled breakpoint is always a member of the set.
//! 4. Unmounting releases every listener this sheet registered.
//!
//! # Failure Modes
//!
//! - Without a mounted surface, drags do not start and `hide` closes
//!   synchronously.
//! - Pointer events of a kind this sheet is not listening for are ignored.

pub mod animation;
pub mod backdrop;
pub mod style;

use sheetkit_core::breakpoint::BreakpointSet;
use sheetkit_core::drag::DragSession;
use sheetkit_core::event::{Event, KeyEvent, PointerEvent, PointerTarget};
use sheetkit_core::geometry::Geometry;
use sheetkit_core::input::{DragPhase, unify};
use sheetkit_core::listener::{ListenerGuard, ListenerKinds, ListenerRegistry, OwnerId};
use web_time::{Duration, Instant};

use crate::config::{SheetConfig, sanitize_duration, sanitize_initial_breakpoint};

pub use animation::{AnimationLifecycle, CloseOutcome, Easing, SheetPhase};
pub use backdrop::{backdrop_style, backdrop_visible, dismisses_on_click};
pub use style::{
    BackdropStyle, DRAGGING_CLASS, HANDLE_HIDDEN_CLASS, Height, RecordingSink, StyleCommand,
    StyleSink, Transform, Transition,
};

/// Observable state change, queued for [`BottomSheet::drain_notifications`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SheetNotification {
    /// The authoritative open flag changed.
    OpenChanged(bool),
    /// A drag ended and the sheet settled at this breakpoint.
    BreakpointSettled(f64),
}

#[derive(Debug)]
struct Surface<S, G> {
    sink: S,
    geometry: G,
}

/// Gesture-driven bottom sheet.
#[derive(Debug)]
pub struct BottomSheet<S, G> {
    config: SheetConfig,
    lifecycle: AnimationLifecycle,
    drag: Option<DragSession>,
    surface: Option<Surface<S, G>>,
    registry: ListenerRegistry,
    owner: OwnerId,
    persistent_listeners: Option<ListenerGuard>,
    drag_listeners: Option<ListenerGuard>,
    notifications: Vec<SheetNotification>,
}

impl<S: StyleSink, G: Geometry> BottomSheet<S, G> {
    /// Create a closed, unmounted sheet registering into `registry`.
    pub fn new(config: SheetConfig, registry: ListenerRegistry) -> Self {
        let config = sanitized(config);
        let owner = registry.allocate_owner();
        Self {
            lifecycle: AnimationLifecycle::new(config.initial_breakpoint),
            config,
            drag: None,
            surface: None,
            registry,
            owner,
            persistent_listeners: None,
            drag_listeners: None,
            notifications: Vec::new(),
        }
    }

    // ========================================================================
    // Mounting
    // ========================================================================

    /// Attach a style sink and geometry source and register listeners.
    ///
    /// Mounting again replaces the surface and returns the previous one;
    /// listeners are re-registered, never duplicated.
    pub fn mount(&mut self, sink: S, geometry: G) -> Option<(S, G)> {
        self.abort_drag();
        self.persistent_listeners = None;
        self.persistent_listeners = Some(self.registry.add(self.owner, ListenerKinds::PERSISTENT));

        let previous = self.surface.replace(Surface { sink, geometry });
        tracing::debug!(owner = ?self.owner, remount = previous.is_some(), "sheet mounted");
        self.apply_styles();
        previous.map(|s| (s.sink, s.geometry))
    }

    /// Release every listener and detach the surface.
    ///
    /// Safe to call when nothing is mounted.
    pub fn unmount(&mut self) -> Option<(S, G)> {
        self.abort_drag();
        self.persistent_listeners = None;
        let surface = self.surface.take()?;
        tracing::debug!(owner = ?self.owner, "sheet unmounted");
        Some((surface.sink, surface.geometry))
    }

    /// Whether a surface is attached.
    #[inline]
    pub fn is_mounted(&self) -> bool {
        self.surface.is_some()
    }

    /// The attached style sink.
    pub fn sink(&self) -> Option<&S> {
        self.surface.as_ref().map(|s| &s.sink)
    }

    /// The attached style sink, mutably.
    pub fn sink_mut(&mut self) -> Option<&mut S> {
        self.surface.as_mut().map(|s| &mut s.sink)
    }

    /// The attached geometry source.
    pub fn geometry(&self) -> Option<&G> {
        self.surface.as_ref().map(|s| &s.geometry)
    }

    /// The attached geometry source, mutably (e.g. on viewport resize).
    pub fn geometry_mut(&mut self) -> Option<&mut G> {
        self.surface.as_mut().map(|s| &mut s.geometry)
    }

    // ========================================================================
    // Open / close
    // ========================================================================

    /// Open at the configured initial breakpoint.
    pub fn show(&mut self) {
        let target = self.config.initial_breakpoint;
        if self.lifecycle.open_at(target) {
            self.notify(SheetNotification::OpenChanged(true));
        }
        tracing::debug!(breakpoint = target, "sheet shown");
        self.apply_styles();
    }

    /// Start closing. The open flag drops once the configured duration has
    /// elapsed, as observed by [`tick`](Self::tick).
    ///
    /// Any active drag is cancelled. Without a surface, or when the
    /// duration overflows the clock, the sheet closes at once.
    pub fn hide(&mut self, now: Instant) {
        let dragged = self.abort_drag();
        if self.surface.is_none() {
            if self.lifecycle.close_now() {
                tracing::debug!("sheet closed without surface");
                self.notify(SheetNotification::OpenChanged(false));
            }
            return;
        }
        match self.lifecycle.begin_close(now, self.config.duration) {
            CloseOutcome::Scheduled { deadline } => {
                tracing::debug!(
                    duration_ms = u64::try_from(self.config.duration.as_millis())
                        .unwrap_or(u64::MAX),
                    ?deadline,
                    "sheet close scheduled"
                );
                self.apply_styles();
            }
            CloseOutcome::Completed => {
                tracing::debug!("sheet closed at once; deadline out of range");
                self.notify(SheetNotification::OpenChanged(false));
                self.apply_styles();
            }
            CloseOutcome::Ignored => {
                if dragged {
                    self.apply_styles();
                }
            }
        }
    }

    /// Set the open flag immediately, without a deferred close.
    ///
    /// Opening keeps the current breakpoint.
    pub fn set_open(&mut self, open: bool) {
        let flipped = if open {
            let current = self.lifecycle.current_breakpoint();
            self.lifecycle.open_at(current)
        } else {
            self.abort_drag();
            self.lifecycle.close_now()
        };
        if flipped {
            self.notify(SheetNotification::OpenChanged(open));
        }
        self.apply_styles();
    }

    /// Fire due deferred work. Returns `true` if a close completed.
    pub fn tick(&mut self, now: Instant) -> bool {
        if !self.lifecycle.tick(now) {
            return false;
        }
        tracing::debug!("sheet close completed");
        self.notify(SheetNotification::OpenChanged(false));
        self.apply_styles();
        true
    }

    /// When [`tick`](Self::tick) next has work to do.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.lifecycle.next_deadline()
    }

    // ========================================================================
    // Input
    // ========================================================================

    /// Route an input event. Returns `true` if the event changed anything.
    pub fn handle_event(&mut self, event: &Event, now: Instant) -> bool {
        match event {
            Event::Pointer(pointer) => self.handle_pointer(pointer),
            Event::Key(key) => self.handle_key(key, now),
            Event::BackdropClick => self.handle_backdrop_click(now),
        }
    }

    fn handle_pointer(&mut self, event: &PointerEvent) -> bool {
        let kind = ListenerKinds::for_pointer(&event.raw);
        if self.registry.count(self.owner, kind) == 0 {
            return false;
        }
        let pointer = unify(&event.raw);
        match (pointer.phase, event.target) {
            (DragPhase::Start, PointerTarget::Handle) => self.begin_drag(pointer.y()),
            (DragPhase::Start, PointerTarget::Document) => false,
            (DragPhase::Move, _) => self.drag_to(pointer.y()),
            (DragPhase::End, _) => self.end_drag(pointer.y()),
            (DragPhase::Cancel, _) => self.cancel_drag(),
        }
    }

    fn handle_key(&mut self, key: &KeyEvent, now: Instant) -> bool {
        if !key.is_escape_press()
            || !self.registry.is_listening(self.owner, ListenerKinds::KEY_DOWN)
        {
            return false;
        }
        let cancelled = self.cancel_drag();
        if !self.lifecycle.is_open() {
            return cancelled;
        }
        tracing::debug!("escape dismiss");
        self.hide(now);
        true
    }

    fn handle_backdrop_click(&mut self, now: Instant) -> bool {
        if !self
            .registry
            .is_listening(self.owner, ListenerKinds::BACKDROP_CLICK)
        {
            return false;
        }
        if !dismisses_on_click(
            self.lifecycle.is_open(),
            self.config.show_backdrop,
            self.config.backdrop_dismiss,
        ) {
            return false;
        }
        tracing::debug!("backdrop dismiss");
        self.hide(now);
        true
    }

    fn begin_drag(&mut self, y: Option<f64>) -> bool {
        if !self.config.handle_visible {
            return false;
        }
        let (Some(surface), Some(y)) = (self.surface.as_mut(), y) else {
            return false;
        };
        let rendered = surface.geometry.rendered_height();
        self.drag = Some(DragSession::start(y, rendered));
        self.drag_listeners = None;
        self.drag_listeners = Some(
            self.registry
                .add(self.owner, ListenerKinds::DRAG_CONTINUATION),
        );
        surface.sink.add_class(DRAGGING_CLASS);
        tracing::debug!(start_y = y, start_height = rendered, "drag started");
        true
    }

    fn drag_to(&mut self, y: Option<f64>) -> bool {
        let (Some(session), Some(surface)) = (self.drag.as_mut(), self.surface.as_mut()) else {
            return false;
        };
        let viewport = surface.geometry.viewport_height();
        let Some(height) = session.update(y, viewport, &self.config.breakpoints) else {
            return false;
        };
        surface.sink.set_transition(Transition::None);
        surface.sink.set_height(Height::Pixels(height));
        tracing::trace!(height, "drag moved");
        true
    }

    fn end_drag(&mut self, y: Option<f64>) -> bool {
        let Some(session) = self.drag.take() else {
            return false;
        };
        self.drag_listeners = None;

        let fraction = match self.surface.as_mut() {
            Some(surface) => {
                surface.sink.remove_class(DRAGGING_CLASS);
                session.end(y, surface.geometry.viewport_height())
            }
            None => None,
        };
        let target = match fraction {
            Some(f) => self.config.breakpoints.snap(f),
            None => self.lifecycle.current_breakpoint(),
        };
        self.lifecycle.settle(target);
        tracing::debug!(fraction, breakpoint = target, "drag settled");
        self.notify(SheetNotification::BreakpointSettled(target));
        self.apply_styles();
        true
    }

    /// Abort the drag and restore the settled styles.
    fn cancel_drag(&mut self) -> bool {
        if !self.abort_drag() {
            return false;
        }
        tracing::debug!("drag cancelled");
        self.apply_styles();
        true
    }

    /// Drop the session and its listeners without restyling.
    fn abort_drag(&mut self) -> bool {
        let had_session = self.drag.take().is_some();
        self.drag_listeners = None;
        if had_session && let Some(surface) = self.surface.as_mut() {
            surface.sink.remove_class(DRAGGING_CLASS);
        }
        had_session
    }

    // ========================================================================
    // Configuration
    // ========================================================================

    /// Current configuration.
    pub fn config(&self) -> &SheetConfig {
        &self.config
    }

    /// Replace the whole configuration.
    ///
    /// The current breakpoint is kept; the new initial breakpoint applies
    /// from the next [`show`](Self::show).
    pub fn set_config(&mut self, config: SheetConfig) {
        self.config = sanitized(config);
        self.apply_styles();
    }

    /// Replace the breakpoint set.
    pub fn set_breakpoints(&mut self, breakpoints: impl Into<BreakpointSet>) {
        self.config.breakpoints = breakpoints.into();
        tracing::debug!(breakpoints = ?self.config.breakpoints.as_slice(), "breakpoints replaced");
    }

    /// Set the initial breakpoint and move the current breakpoint to it.
    pub fn set_initial_breakpoint(&mut self, fraction: f64) {
        let fraction = sanitize_initial_breakpoint(fraction);
        self.config.initial_breakpoint = fraction;
        self.lifecycle.set_current_breakpoint(fraction);
        self.apply_styles();
    }

    /// Show or hide the backdrop while open.
    pub fn set_show_backdrop(&mut self, show: bool) {
        self.config.show_backdrop = show;
        self.apply_styles();
    }

    /// Enable or disable dismissal by backdrop click.
    pub fn set_backdrop_dismiss(&mut self, dismiss: bool) {
        self.config.backdrop_dismiss = dismiss;
    }

    /// Set the open/close transform duration.
    ///
    /// A close already in progress keeps its original deadline.
    pub fn set_duration(&mut self, duration: Duration) {
        self.config.duration = sanitize_duration(duration);
        self.apply_styles();
    }

    /// Show or hide the drag handle.
    pub fn set_handle_visible(&mut self, visible: bool) {
        self.config.handle_visible = visible;
        self.apply_styles();
    }

    // ========================================================================
    // Observers
    // ========================================================================

    /// Authoritative open flag. True while closing.
    #[inline]
    pub fn is_open(&self) -> bool {
        self.lifecycle.is_open()
    }

    /// Lifecycle phase.
    #[inline]
    pub fn phase(&self) -> SheetPhase {
        self.lifecycle.phase()
    }

    /// Settled target height as a viewport fraction.
    #[inline]
    pub fn current_breakpoint(&self) -> f64 {
        self.lifecycle.current_breakpoint()
    }

    /// Whether a drag session is active.
    #[inline]
    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Whether the backdrop is currently visible.
    pub fn backdrop_visible(&self) -> bool {
        backdrop_visible(self.lifecycle.is_open(), self.config.show_backdrop)
    }

    /// Listener owner identity of this sheet.
    pub fn owner(&self) -> OwnerId {
        self.owner
    }

    /// Kinds this sheet currently has registered.
    pub fn active_listeners(&self) -> ListenerKinds {
        self.registry.active(self.owner)
    }

    /// Take all queued notifications, oldest first.
    pub fn drain_notifications(&mut self) -> Vec<SheetNotification> {
        std::mem::take(&mut self.notifications)
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn notify(&mut self, notification: SheetNotification) {
        self.notifications.push(notification);
    }

    /// Push the settled presentation to the sink. The live height stays
    /// untouched while a drag owns it.
    fn apply_styles(&mut self) {
        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        let sink = &mut surface.sink;
        let open = self.lifecycle.is_open();

        if self.drag.is_none() {
            sink.set_transition(Transition::animated(self.config.duration));
            sink.set_height(self.lifecycle.target_height());
        }
        sink.set_transform(self.lifecycle.target_transform());
        sink.set_backdrop(backdrop_style(
            open,
            self.config.show_backdrop,
            self.config.duration,
        ));
        if self.config.handle_visible {
            sink.remove_class(HANDLE_HIDDEN_CLASS);
        } else {
            sink.add_class(HANDLE_HIDDEN_CLASS);
        }
    }
}

fn sanitized(mut config: SheetConfig) -> SheetConfig {
    config.initial_breakpoint = sanitize_initial_breakpoint(config.initial_breakpoint);
    config.duration = sanitize_duration(config.duration);
    config
}

// ============================================================================
// Tests
// ============================================================================
