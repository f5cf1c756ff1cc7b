#![forbid(unsafe_code)]

//! Mouse/touch unification.
//!
//! [`unify`] turns a [`RawPointerEvent`] into a [`UnifiedPointer`]: a drag
//! phase plus an optional [`PointerReading`]. Everything downstream only
//! sees a plain vertical coordinate.
//!
//! # Coordinate resolution
//!
//! | Source | Phase | Coordinate |
//! |--------|-------|------------|
//! | Mouse | any | `client_y` |
//! | Touch | down / move | first entry of `touches` |
//! | Touch | up / cancel | first entry of `changed_touches`, else `client_y` |
//!
//! Non-finite coordinates are dropped. A missing reading is not an error;
//! the drag session treats it as zero movement.

use crate::event::{PointerPhase, RawPointerEvent};

/// Phase of a unified drag stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DragPhase {
    /// Pointer pressed.
    Start,
    /// Pointer moved while pressed.
    Move,
    /// Pointer released.
    End,
    /// Gesture aborted by the platform.
    Cancel,
}

impl From<PointerPhase> for DragPhase {
    fn from(phase: PointerPhase) -> Self {
        match phase {
            PointerPhase::Down => Self::Start,
            PointerPhase::Move => Self::Move,
            PointerPhase::Up => Self::End,
            PointerPhase::Cancel => Self::Cancel,
        }
    }
}

/// A resolved vertical coordinate, tagged with its input class.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerReading {
    Mouse(f64),
    Touch(f64),
}

impl PointerReading {
    /// The client-space Y coordinate.
    #[inline]
    #[must_use]
    pub fn y(self) -> f64 {
        match self {
            Self::Mouse(y) | Self::Touch(y) => y,
        }
    }
}

/// Canonical `(phase, y)` pair produced by [`unify`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnifiedPointer {
    pub phase: DragPhase,
    pub reading: Option<PointerReading>,
}

impl UnifiedPointer {
    /// Resolved Y coordinate, if any.
    #[inline]
    #[must_use]
    pub fn y(&self) -> Option<f64> {
        self.reading.map(PointerReading::y)
    }
}

/// Normalize a raw mouse or touch event.
#[must_use]
pub fn unify(raw: &RawPointerEvent) -> UnifiedPointer {
    let phase = raw.phase();
    let reading = match raw {
        RawPointerEvent::Mouse { client_y, .. } => finite(*client_y).map(PointerReading::Mouse),
        RawPointerEvent::Touch {
            touches,
            changed_touches,
            client_y,
            ..
        } => {
            let point = match phase {
                PointerPhase::Down | PointerPhase::Move => touches.first(),
                PointerPhase::Up | PointerPhase::Cancel => changed_touches.first(),
            };
            match point {
                Some(p) => finite(Some(p.client_y)).map(PointerReading::Touch),
                None => finite(*client_y).map(PointerReading::Mouse),
            }
        }
    };
    UnifiedPointer {
        phase: phase.into(),
        reading,
    }
}

fn finite(y: Option<f64>) -> Option<f64> {
    y.filter(|v| v.is_finite())
}
