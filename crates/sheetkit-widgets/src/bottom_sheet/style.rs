#![forbid(unsafe_code)]

//! Style commands and the sink that receives them.
//!
//! The sheet never renders. It tells a [`StyleSink`] what the panel should
//! look like: height, transform, transition, backdrop and marker classes.
//! A DOM host maps these onto inline CSS; a native host maps them onto its
//! own animation system.

use std::collections::BTreeSet;

use web_time::Duration;

use super::animation::{Easing, HEIGHT_TRANSITION};

/// Marker class present while a drag session is active.
pub const DRAGGING_CLASS: &str = "dragging";

/// Marker class present while the drag handle is hidden.
pub const HANDLE_HIDDEN_CLASS: &str = "handle-hidden";

/// Panel height.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Height {
    /// Collapsed.
    Zero,
    /// Fraction of the viewport height (`0.5` = `50vh`).
    ViewportFraction(f64),
    /// Absolute logical pixels; used during a drag.
    Pixels(f64),
}

impl Height {
    /// Resolve to pixels against a viewport height.
    #[must_use]
    pub fn to_pixels(self, viewport_height: f64) -> f64 {
        match self {
            Self::Zero => 0.0,
            Self::ViewportFraction(f) => f * viewport_height,
            Self::Pixels(px) => px,
        }
    }
}

/// Vertical placement of the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Transform {
    /// Resting on the bottom edge (`translateY(0%)`).
    Shown,
    /// Translated fully below the viewport (`translateY(100%)`).
    #[default]
    Hidden,
}

impl Transform {
    /// Vertical translation as a percentage of the panel's own height.
    #[must_use]
    pub const fn translate_y_percent(self) -> f64 {
        match self {
            Self::Shown => 0.0,
            Self::Hidden => 100.0,
        }
    }
}

/// Transition applied to subsequent height/transform changes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transition {
    /// Changes apply instantly.
    None,
    /// Transform and height ease independently.
    Animated {
        transform: Duration,
        height: Duration,
        easing: Easing,
    },
}

impl Transition {
    /// Standard sheet transition: transform over `duration`, height over
    /// [`HEIGHT_TRANSITION`], both on the standard curve.
    #[must_use]
    pub const fn animated(duration: Duration) -> Self {
        Self::Animated {
            transform: duration,
            height: HEIGHT_TRANSITION,
            easing: Easing::Standard,
        }
    }

    /// True when changes apply instantly.
    #[must_use]
    pub const fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

/// Backdrop presentation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackdropStyle {
    /// `1.0` when visible, `0.0` otherwise.
    pub opacity: f64,
    /// Whether the backdrop receives pointer input.
    pub interactive: bool,
    /// Opacity fade duration.
    pub fade: Duration,
}

impl BackdropStyle {
    /// Hidden, non-interactive backdrop.
    pub const HIDDEN: Self = Self {
        opacity: 0.0,
        interactive: false,
        fade: Duration::ZERO,
    };
}

/// Receiver of style commands from a sheet.
pub trait StyleSink {
    /// Set the panel height.
    fn set_height(&mut self, height: Height);

    /// Set the panel transform.
    fn set_transform(&mut self, transform: Transform);

    /// Set the transition for subsequent changes.
    fn set_transition(&mut self, transition: Transition);

    /// Set the backdrop presentation.
    fn set_backdrop(&mut self, backdrop: BackdropStyle);

    /// Add a marker class. Adding a present class is a no-op.
    fn add_class(&mut self, name: &str);

    /// Remove a marker class. Removing an absent class is a no-op.
    fn remove_class(&mut self, name: &str);
}

impl<S: StyleSink + ?Sized> StyleSink for Box<S> {
    fn set_height(&mut self, height: Height) {
        (**self).set_height(height);
    }

    fn set_transform(&mut self, transform: Transform) {
        (**self).set_transform(transform);
    }

    fn set_transition(&mut self, transition: Transition) {
        (**self).set_transition(transition);
    }

    fn set_backdrop(&mut self, backdrop: BackdropStyle) {
        (**self).set_backdrop(backdrop);
    }

    fn add_class(&mut self, name: &str) {
        (**self).add_class(name);
    }

    fn remove_class(&mut self, name: &str) {
        (**self).remove_class(name);
    }
}

/// A single command as received by a [`RecordingSink`].
#[derive(Debug, Clone, PartialEq)]
pub enum StyleCommand {
    Height(Height),
    Transform(Transform),
    Transition(Transition),
    Backdrop(BackdropStyle),
    AddClass(String),
    RemoveClass(String),
}

/// Headless sink that keeps the latest value of every property plus the
/// full command log.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordingSink {
    pub height: Height,
    pub transform: Transform,
    pub transition: Transition,
    pub backdrop: BackdropStyle,
    pub classes: BTreeSet<String>,
    pub log: Vec<StyleCommand>,
}

impl Default for RecordingSink {
    fn default() -> Self {
        Self {
            height: Height::Zero,
            transform: Transform::Hidden,
            transition: Transition::None,
            backdrop: BackdropStyle::HIDDEN,
            classes: BTreeSet::new(),
            log: Vec::new(),
        }
    }
}

impl RecordingSink {
    /// Create an empty recording sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `name` is currently present.
    #[must_use]
    pub fn has_class(&self, name: &str) -> bool {
        self.classes.contains(name)
    }

    /// Every height written, in order.
    pub fn heights(&self) -> impl Iterator<Item = Height> + '_ {
        self.log.iter().filter_map(|c| match c {
            StyleCommand::Height(h) => Some(*h),
            _ => None,
        })
    }

    /// Forget the command log, keeping current values.
    pub fn clear_log(&mut self) {
        self.log.clear();
    }
}

impl StyleSink for RecordingSink {
    fn set_height(&mut self, height: Height) {
        self.height = height;
        self.log.push(StyleCommand::Height(height));
    }

    fn set_transform(&mut self, transform: Transform) {
        self.transform = transform;
        self.log.push(StyleCommand::Transform(transform));
    }

    fn set_transition(&mut self, transition: Transition) {
        self.transition = transition;
        self.log.push(StyleCommand::Transition(transition));
    }

    fn set_backdrop(&mut self, backdrop: BackdropStyle) {
        self.backdrop = backdrop;
        self.log.push(StyleCommand::Backdrop(backdrop));
    }

    fn add_class(&mut self, name: &str) {
        self.classes.insert(name.to_owned());
        self.log.push(StyleCommand::AddClass(name.to_owned()));
    }

    fn remove_class(&mut self, name: &str) {
        self.classes.remove(name);
        self.log.push(StyleCommand::RemoveClass(name.to_owned()));
    }
}
