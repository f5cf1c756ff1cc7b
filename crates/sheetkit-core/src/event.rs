#![forbid(unsafe_code)]

//! Canonical input event types for sheet interaction.
//!
//! Hosts translate whatever their platform delivers (DOM events, winit
//! events, terminal mouse reports) into these types before handing them to a
//! sheet. Mouse and touch keep their distinct shapes here; the
//! [`unify`](crate::input::unify) function collapses them into a single
//! vertical coordinate.
//!
//! # Design Notes
//!
//! - Coordinates are client-space logical pixels, `y` growing downwards.
//! - A touch event carries both the active touch list and the changed touch
//!   list, matching what browsers report on `touchend`.
//! - Events are `Clone + PartialEq` for use in tests and replay.

/// Canonical input event routed into a sheet.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Pointer input, tagged with where it was delivered.
    Pointer(PointerEvent),

    /// A keyboard event.
    Key(KeyEvent),

    /// The backdrop behind the sheet was clicked or tapped.
    BackdropClick,
}

impl Event {
    /// Pointer event delivered to the drag handle.
    #[must_use]
    pub fn handle(raw: RawPointerEvent) -> Self {
        Self::Pointer(PointerEvent {
            target: PointerTarget::Handle,
            raw,
        })
    }

    /// Pointer event delivered at document level.
    #[must_use]
    pub fn document(raw: RawPointerEvent) -> Self {
        Self::Pointer(PointerEvent {
            target: PointerTarget::Document,
            raw,
        })
    }

    /// Escape key press.
    #[must_use]
    pub const fn escape() -> Self {
        Self::Key(KeyEvent::new(KeyCode::Escape))
    }
}

/// Where a pointer event was delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerTarget {
    /// The sheet's drag handle.
    Handle,
    /// The document (global listeners).
    Document,
}

/// A pointer event together with its delivery target.
#[derive(Debug, Clone, PartialEq)]
pub struct PointerEvent {
    /// Delivery target.
    pub target: PointerTarget,
    /// The raw event as reported by the platform.
    pub raw: RawPointerEvent,
}

/// Lifecycle phase of a raw pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerPhase {
    /// `mousedown` / `touchstart`.
    Down,
    /// `mousemove` / `touchmove`.
    Move,
    /// `mouseup` / `touchend`.
    Up,
    /// `touchcancel`, or the host lost pointer capture.
    Cancel,
}

/// A single touch point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchPoint {
    /// Platform touch identifier.
    pub id: u64,
    /// Client-space Y coordinate.
    pub client_y: f64,
}

impl TouchPoint {
    /// Create a touch point.
    #[must_use]
    pub const fn new(id: u64, client_y: f64) -> Self {
        Self { id, client_y }
    }
}

/// Raw pointer event from either input class.
#[derive(Debug, Clone, PartialEq)]
pub enum RawPointerEvent {
    /// Mouse event. `client_y` is `None` when the host could not resolve it.
    Mouse {
        phase: PointerPhase,
        client_y: Option<f64>,
    },
    /// Touch event.
    Touch {
        phase: PointerPhase,
        /// Touches currently on the surface.
        touches: Vec<TouchPoint>,
        /// Touches that changed in this event (the lifted finger on `Up`).
        changed_touches: Vec<TouchPoint>,
        /// Mouse-style coordinate some platforms attach to touch events.
        client_y: Option<f64>,
    },
}

impl RawPointerEvent {
    /// Mouse event at `y`.
    #[must_use]
    pub const fn mouse(phase: PointerPhase, y: f64) -> Self {
        Self::Mouse {
            phase,
            client_y: Some(y),
        }
    }

    /// Single-finger touch event at `y`.
    ///
    /// On `Up` and `Cancel` the finger is reported in `changed_touches`
    /// only, as browsers do.
    #[must_use]
    pub fn touch(phase: PointerPhase, y: f64) -> Self {
        let point = TouchPoint::new(0, y);
        match phase {
            PointerPhase::Up | PointerPhase::Cancel => Self::Touch {
                phase,
                touches: Vec::new(),
                changed_touches: vec![point],
                client_y: None,
            },
            PointerPhase::Down | PointerPhase::Move => Self::Touch {
                phase,
                touches: vec![point],
                changed_touches: vec![point],
                client_y: None,
            },
        }
    }

    /// Phase of this event regardless of input class.
    #[must_use]
    pub fn phase(&self) -> PointerPhase {
        match self {
            Self::Mouse { phase, .. } | Self::Touch { phase, .. } => *phase,
        }
    }

    /// Whether this event came from a touch surface.
    #[must_use]
    pub fn is_touch(&self) -> bool {
        matches!(self, Self::Touch { .. })
    }
}

/// A keyboard event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// The key code that was pressed.
    pub code: KeyCode,
    /// The type of key event.
    pub kind: KeyEventKind,
}

impl KeyEvent {
    /// Create a key press event.
    #[must_use]
    pub const fn new(code: KeyCode) -> Self {
        Self {
            code,
            kind: KeyEventKind::Press,
        }
    }

    /// Create a key event with a specific kind.
    #[must_use]
    pub const fn with_kind(mut self, kind: KeyEventKind) -> Self {
        self.kind = kind;
        self
    }

    /// True for an Escape press (repeats and releases excluded).
    #[must_use]
    pub fn is_escape_press(&self) -> bool {
        self.code == KeyCode::Escape && self.kind == KeyEventKind::Press
    }
}

/// Key codes the sheet cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// Escape key.
    Escape,
    /// Enter/Return key.
    Enter,
    /// A regular character key.
    Char(char),
}

/// The type of key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyEventKind {
    /// Key was pressed (default when not distinguished).
    #[default]
    Press,
    /// Key is being held (repeat event).
    Repeat,
    /// Key was released.
    Release,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touch_up_reports_changed_touch_only() {
        let ev = RawPointerEvent::touch(PointerPhase::Up, 120.0);
        match ev {
            RawPointerEvent::Touch {
                touches,
                changed_touches,
                ..
            } => {
                assert!(touches.is_empty());
                assert_eq!(changed_touches, vec![TouchPoint::new(0, 120.0)]);
            }
            RawPointerEvent::Mouse { .. } => panic!("expected touch event"),
        }
    }

    #[test]
    fn phase_accessor_covers_both_classes() {
        assert_eq!(
            RawPointerEvent::mouse(PointerPhase::Move, 1.0).phase(),
            PointerPhase::Move
        );
        assert_eq!(
            RawPointerEvent::touch(PointerPhase::Cancel, 1.0).phase(),
            PointerPhase::Cancel
        );
    }

    #[test]
    fn escape_repeat_is_not_a_press() {
        let key = KeyEvent::new(KeyCode::Escape).with_kind(KeyEventKind::Repeat);
        assert!(!key.is_escape_press());
        assert!(KeyEvent::new(KeyCode::Escape).is_escape_press());
        assert!(!KeyEvent::new(KeyCode::Char('q')).is_escape_press());
    }

    #[test]
    fn constructors_tag_targets() {
        let raw = RawPointerEvent::mouse(PointerPhase::Down, 5.0);
        assert!(matches!(
            Event::handle(raw.clone()),
            Event::Pointer(PointerEvent {
                target: PointerTarget::Handle,
                ..
            })
        ));
        assert!(matches!(
            Event::document(raw),
            Event::Pointer(PointerEvent {
                target: PointerTarget::Document,
                ..
            })
        ));
    }
}
