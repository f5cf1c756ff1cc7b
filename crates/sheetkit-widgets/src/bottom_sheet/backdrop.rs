#![forbid(unsafe_code)]

//! Backdrop visibility, derived from the open flag and configuration only.

use web_time::Duration;

use super::style::BackdropStyle;

/// `open && show_backdrop`.
#[inline]
#[must_use]
pub fn backdrop_visible(open: bool, show_backdrop: bool) -> bool {
    open && show_backdrop
}

/// Style for the backdrop given the current inputs.
#[must_use]
pub fn backdrop_style(open: bool, show_backdrop: bool, fade: Duration) -> BackdropStyle {
    let visible = backdrop_visible(open, show_backdrop);
    BackdropStyle {
        opacity: if visible { 1.0 } else { 0.0 },
        interactive: visible,
        fade,
    }
}

/// Whether a backdrop click should dismiss the sheet.
///
/// A hidden backdrop takes no pointer input, so it cannot dismiss.
#[inline]
#[must_use]
pub fn dismisses_on_click(open: bool, show_backdrop: bool, backdrop_dismiss: bool) -> bool {
    backdrop_dismiss && backdrop_visible(open, show_backdrop)
}
