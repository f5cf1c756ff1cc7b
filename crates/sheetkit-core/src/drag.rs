#![forbid(unsafe_code)]

//! Drag session: live height from pointer deltas.
//!
//! A [`DragSession`] exists only between pointer-down on the handle and the
//! matching pointer-up or cancel. Holders keep it in an `Option`; absence
//! means no drag is in progress. [`DragSession::end`] consumes the session
//! so it cannot outlive the gesture.
//!
//! Dragging up (decreasing `y`) grows the sheet:
//! `height = start_height - (y - start_y)`.
//!
//! # Invariants
//!
//! - [`update`](DragSession::update) results are clamped to the breakpoint
//!   set's pixel range.
//! - [`end`](DragSession::end) is unclamped; snapping bounds it afterwards.

use crate::breakpoint::BreakpointSet;

/// State for one drag gesture.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    start_y: f64,
    start_height: f64,
    last_height: f64,
}

impl DragSession {
    /// Begin a session at pointer `y` with the panel's rendered height in px.
    #[must_use]
    pub fn start(y: f64, rendered_height: f64) -> Self {
        Self {
            start_y: y,
            start_height: rendered_height,
            last_height: rendered_height,
        }
    }

    /// Pointer coordinate at drag start.
    #[inline]
    #[must_use]
    pub fn start_y(&self) -> f64 {
        self.start_y
    }

    /// Rendered height (px) at drag start.
    #[inline]
    #[must_use]
    pub fn start_height(&self) -> f64 {
        self.start_height
    }

    /// Most recent clamped live height.
    #[inline]
    #[must_use]
    pub fn last_height(&self) -> f64 {
        self.last_height
    }

    /// Unclamped height for pointer `y`; `None` counts as zero delta.
    #[must_use]
    pub fn candidate_height(&self, y: Option<f64>) -> f64 {
        let delta = y.map_or(0.0, |y| y - self.start_y);
        self.start_height - delta
    }

    /// Advance the session, returning the clamped live height in px.
    ///
    /// Returns `None` without touching state when the pointer has no
    /// resolvable coordinate or the viewport height is negative or not
    /// finite.
    pub fn update(
        &mut self,
        y: Option<f64>,
        viewport_height: f64,
        breakpoints: &BreakpointSet,
    ) -> Option<f64> {
        let y = y?;
        if !viewport_height.is_finite() || viewport_height < 0.0 {
            return None;
        }
        let (lo, hi) = breakpoints.pixel_range(viewport_height);
        let height = self.candidate_height(Some(y)).clamp(lo, hi);
        self.last_height = height;
        Some(height)
    }

    /// Finish the session, returning the final height as a viewport fraction.
    ///
    /// Returns `None` when the viewport height is zero or not finite.
    #[must_use]
    pub fn end(self, y: Option<f64>, viewport_height: f64) -> Option<f64> {
        if !viewport_height.is_finite() || viewport_height <= 0.0 {
            return None;
        }
        Some(self.candidate_height(y) / viewport_height)
    }
}
