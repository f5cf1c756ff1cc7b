#![forbid(unsafe_code)]

//! Geometry source consumed by the sheet.

/// Live layout measurements, in logical pixels.
pub trait Geometry {
    /// Height of the viewport the sheet slides within.
    fn viewport_height(&self) -> f64;

    /// Current rendered height of the sheet panel.
    fn rendered_height(&self) -> f64;
}

/// Geometry with fixed, caller-updated measurements.
///
/// Useful for headless hosts and tests where layout is known up front.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FixedGeometry {
    pub viewport_height: f64,
    pub rendered_height: f64,
}

impl FixedGeometry {
    /// Create a geometry with the given viewport and panel heights.
    #[must_use]
    pub const fn new(viewport_height: f64, rendered_height: f64) -> Self {
        Self {
            viewport_height,
            rendered_height,
        }
    }
}

impl Geometry for FixedGeometry {
    fn viewport_height(&self) -> f64 {
        self.viewport_height
    }

    fn rendered_height(&self) -> f64 {
        self.rendered_height
    }
}

impl<G: Geometry + ?Sized> Geometry for &G {
    fn viewport_height(&self) -> f64 {
        (**self).viewport_height()
    }

    fn rendered_height(&self) -> f64 {
        (**self).rendered_height()
    }
}

impl<G: Geometry + ?Sized> Geometry for Box<G> {
    fn viewport_height(&self) -> f64 {
        (**self).viewport_height()
    }

    fn rendered_height(&self) -> f64 {
        (**self).rendered_height()
    }
}
