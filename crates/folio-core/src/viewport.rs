//! Logical drawing area of a particle field.

/// Width and height of the area a particle field simulates in.
///
/// Units are logical pixels: the surface decides how they map to real pixels
/// or terminal cells.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Horizontal extent.
    pub width: f32,
    /// Vertical extent.
    pub height: f32,
}

impl Viewport {
    /// Create a viewport, clamping negative extents to zero.
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    /// True while either side is zero, e.g. mid layout transition.
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Area in square logical pixels.
    pub fn area(&self) -> f64 {
        f64::from(self.width) * f64::from(self.height)
    }

    /// The shorter of the two sides.
    pub fn shorter_side(&self) -> f32 {
        self.width.min(self.height)
    }
}
