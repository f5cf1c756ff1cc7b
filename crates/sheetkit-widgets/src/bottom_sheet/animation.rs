#![forbid(unsafe_code)]

//! Open/close lifecycle with deferred close completion.
//!
//! [`AnimationLifecycle`] owns the authoritative open flag and the current
//! breakpoint. Opening is immediate. Closing is split in two: the exit
//! transform starts at once, but the open flag only drops when a deferred
//! completion fires `duration` later, so content finishes sliding out before
//! the sheet stops counting as open.
//!
//! # State Machine
//!
//! ```text
//!            open_at                begin_close
//!  Closed ───────────▶ Open ─────────────────────▶ Closing
//!    ▲                  ▲                            │
//!    │                  └────────── open_at ─────────┤
//!    └──────────── tick (deadline reached) ──────────┘
//! ```
//!
//! # Invariants
//!
//! - `is_open()` is true in `Open` and `Closing`.
//! - At most one deferred completion is live. Every `open_at`,
//!   `begin_close` and `close_now` cancels the previous one; a cancelled
//!   completion that comes due is discarded.
//!
//! # Failure Modes
//!
//! - `begin_close` on a closed sheet is ignored.
//! - A zero duration completes on the next `tick` at or after `now`.

use sheetkit_core::cancellation::CancellationSource;
use sheetkit_core::timer::TimerQueue;
use web_time::{Duration, Instant};

use super::style::{Height, Transform};

/// Default transform duration for open/close.
pub const DEFAULT_DURATION: Duration = Duration::from_millis(300);

/// Fixed duration for height changes.
pub const HEIGHT_TRANSITION: Duration = Duration::from_millis(700);

// ============================================================================
// Phase
// ============================================================================

/// Lifecycle phase of a sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SheetPhase {
    /// Not open; collapsed and off-screen.
    #[default]
    Closed,
    /// Open and resting at the current breakpoint.
    Open,
    /// Exit transform running; still counts as open.
    Closing,
}

impl SheetPhase {
    /// Whether the authoritative open flag is set.
    #[inline]
    pub fn is_open(self) -> bool {
        !matches!(self, Self::Closed)
    }

    /// Whether the exit transition is running.
    #[inline]
    pub fn is_closing(self) -> bool {
        matches!(self, Self::Closing)
    }
}

// ============================================================================
// Easing
// ============================================================================

/// Timing curve for sheet transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    /// Standard ease-in-out, `cubic-bezier(0.4, 0, 0.2, 1)`.
    #[default]
    Standard,
}

impl Easing {
    /// Bezier control points `(x1, y1, x2, y2)`.
    #[must_use]
    pub const fn control_points(self) -> (f64, f64, f64, f64) {
        match self {
            Self::Standard => (0.4, 0.0, 0.2, 1.0),
        }
    }

    /// CSS timing function string.
    #[must_use]
    pub fn css(self) -> String {
        let (x1, y1, x2, y2) = self.control_points();
        format!("cubic-bezier({x1},{y1},{x2},{y2})")
    }
}

// ============================================================================
// Lifecycle
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Deferred {
    CompleteClose,
}

/// Result of a close request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseOutcome {
    /// Exit started; the flag drops at `deadline`.
    Scheduled { deadline: Instant },
    /// Deadline unrepresentable; closed at once.
    Completed,
    /// Already closed; nothing to do.
    Ignored,
}

/// Open flag, current breakpoint and the pending close completion.
#[derive(Debug)]
pub struct AnimationLifecycle {
    phase: SheetPhase,
    current_breakpoint: f64,
    pending_close: Option<CancellationSource>,
    timers: TimerQueue<Deferred>,
}

impl AnimationLifecycle {
    /// Create a closed lifecycle resting at `breakpoint`.
    #[must_use]
    pub fn new(breakpoint: f64) -> Self {
        Self {
            phase: SheetPhase::Closed,
            current_breakpoint: breakpoint,
            pending_close: None,
            timers: TimerQueue::new(),
        }
    }

    /// Current phase.
    #[inline]
    pub fn phase(&self) -> SheetPhase {
        self.phase
    }

    /// Authoritative open flag.
    #[inline]
    pub fn is_open(&self) -> bool {
        self.phase.is_open()
    }

    /// Settled target height as a viewport fraction.
    #[inline]
    pub fn current_breakpoint(&self) -> f64 {
        self.current_breakpoint
    }

    /// Overwrite the current breakpoint without touching the phase.
    pub fn set_current_breakpoint(&mut self, fraction: f64) {
        self.current_breakpoint = fraction;
    }

    /// Whether a close completion is live.
    #[inline]
    pub fn has_pending_close(&self) -> bool {
        self.pending_close.is_some()
    }

    /// Open at `fraction`. Returns `true` if the open flag flipped.
    pub fn open_at(&mut self, fraction: f64) -> bool {
        self.invalidate_pending();
        let flipped = !self.phase.is_open();
        self.phase = SheetPhase::Open;
        self.current_breakpoint = fraction;
        flipped
    }

    /// Record a post-drag snap target.
    pub fn settle(&mut self, fraction: f64) {
        self.current_breakpoint = fraction;
    }

    /// Start closing; completion comes due `duration` after `now`.
    ///
    /// Calling again while closing restarts the countdown. A deadline past
    /// the clock's range closes immediately.
    pub fn begin_close(&mut self, now: Instant, duration: Duration) -> CloseOutcome {
        if !self.phase.is_open() {
            return CloseOutcome::Ignored;
        }
        let Some(deadline) = now.checked_add(duration) else {
            self.close_now();
            return CloseOutcome::Completed;
        };
        self.invalidate_pending();
        let source = CancellationSource::new();
        self.timers
            .schedule(deadline, source.token(), Deferred::CompleteClose);
        self.pending_close = Some(source);
        self.phase = SheetPhase::Closing;
        CloseOutcome::Scheduled { deadline }
    }

    /// Close immediately. Returns `true` if the open flag flipped.
    pub fn close_now(&mut self) -> bool {
        self.invalidate_pending();
        let flipped = self.phase.is_open();
        self.phase = SheetPhase::Closed;
        flipped
    }

    /// Fire due completions. Returns `true` if a close completed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let mut completed = false;
        for deferred in self.timers.fire_due(now) {
            match deferred {
                Deferred::CompleteClose => {
                    if self.phase.is_closing() {
                        self.phase = SheetPhase::Closed;
                        self.pending_close = None;
                        completed = true;
                    }
                }
            }
        }
        completed
    }

    /// Deadline of the live close completion, if any.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.next_deadline()
    }

    /// Number of scheduled completions.
    pub fn scheduled_timers(&self) -> usize {
        self.timers.len()
    }

    /// Target panel height for the current phase.
    pub fn target_height(&self) -> Height {
        if self.phase.is_open() {
            Height::ViewportFraction(self.current_breakpoint)
        } else {
            Height::Zero
        }
    }

    /// Target transform for the current phase.
    pub fn target_transform(&self) -> Transform {
        match self.phase {
            SheetPhase::Open => Transform::Shown,
            SheetPhase::Closing | SheetPhase::Closed => Transform::Hidden,
        }
    }

    fn invalidate_pending(&mut self) {
        if let Some(source) = self.pending_close.take() {
            source.cancel();
            self.timers.prune_cancelled();
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
