#![forbid(unsafe_code)]

//! Breakpoint sets and nearest-breakpoint snapping.
//!
//! A breakpoint is an allowed settled height for the sheet, expressed as a
//! fraction of the viewport height.
//!
//! # Invariants
//!
//! 1. A [`BreakpointSet`] is never empty.
//! 2. Every member is finite, `> 0.0` and `<= 1.0`.
//! 3. Members are stored ascending with duplicates removed, so
//!    [`BreakpointSet::snap`] always scans in ascending order regardless of
//!    the order the values were supplied in.
//!
//! # Failure Modes
//!
//! Construction never fails. Invalid members are dropped; if nothing valid
//! remains the set degrades to [`FALLBACK_BREAKPOINTS`].

/// Nine-point scale used when no breakpoints are configured.
pub const DEFAULT_BREAKPOINTS: [f64; 9] = [0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 1.0];

/// Used when a configured list has no valid member.
pub const FALLBACK_BREAKPOINTS: [f64; 2] = [0.5, 1.0];

/// Ordered, non-empty set of height fractions in `(0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct BreakpointSet {
    values: Vec<f64>,
}

impl Default for BreakpointSet {
    fn default() -> Self {
        Self {
            values: DEFAULT_BREAKPOINTS.to_vec(),
        }
    }
}

impl BreakpointSet {
    /// Build a set from arbitrary values, dropping anything outside `(0, 1]`.
    ///
    /// Falls back to [`FALLBACK_BREAKPOINTS`] when no value survives.
    #[must_use]
    pub fn new(values: impl IntoIterator<Item = f64>) -> Self {
        Self::try_new(values).unwrap_or_else(Self::fallback)
    }

    /// Like [`new`](Self::new) but returns `None` instead of falling back.
    #[must_use]
    pub fn try_new(values: impl IntoIterator<Item = f64>) -> Option<Self> {
        let mut values: Vec<f64> = values.into_iter().filter(|v| is_valid(*v)).collect();
        if values.is_empty() {
            return None;
        }
        values.sort_by(f64::total_cmp);
        values.dedup();
        Some(Self { values })
    }

    /// The `{0.5, 1.0}` fallback set.
    #[must_use]
    pub fn fallback() -> Self {
        Self {
            values: FALLBACK_BREAKPOINTS.to_vec(),
        }
    }

    /// Members in ascending order.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// Number of members (always at least one).
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always `false`; present for API symmetry with `len`.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Smallest member.
    #[inline]
    #[must_use]
    pub fn min(&self) -> f64 {
        self.values[0]
    }

    /// Largest member.
    #[inline]
    #[must_use]
    pub fn max(&self) -> f64 {
        self.values[self.values.len() - 1]
    }

    /// Exact membership test.
    #[must_use]
    pub fn contains(&self, fraction: f64) -> bool {
        self.values.iter().any(|&b| b == fraction)
    }

    /// Pixel range `[min * viewport, max * viewport]` a live drag may occupy.
    #[must_use]
    pub fn pixel_range(&self, viewport_height: f64) -> (f64, f64) {
        (self.min() * viewport_height, self.max() * viewport_height)
    }

    /// Return the member closest to `candidate`.
    ///
    /// Scans ascending and keeps the first minimal match, so an exact tie
    /// between two members resolves to the lower one. A NaN candidate
    /// resolves to the smallest member.
    #[must_use]
    pub fn snap(&self, candidate: f64) -> f64 {
        let mut best = self.values[0];
        let mut best_dist = (best - candidate).abs();
        for &b in &self.values[1..] {
            let dist = (b - candidate).abs();
            if dist < best_dist {
                best = b;
                best_dist = dist;
            }
        }
        best
    }

    /// Iterate members in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.iter().copied()
    }
}

impl From<Vec<f64>> for BreakpointSet {
    fn from(values: Vec<f64>) -> Self {
        Self::new(values)
    }
}

impl FromIterator<f64> for BreakpointSet {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        Self::new(iter)
    }
}

/// Whether `fraction` may be a member of a breakpoint set.
#[inline]
#[must_use]
pub fn is_valid(fraction: f64) -> bool {
    fraction.is_finite() && fraction > 0.0 && fraction <= 1.0
}
