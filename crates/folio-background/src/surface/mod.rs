//! The drawing surface particle fields render onto.
//!
//! [`Surface`] is the small slice of a 2D canvas API the effects need: rect
//! and path fills, strokes, image blits and a save/restore-scoped affine
//! transform. [`PixelCanvas`] rasterises onto an RGB grid for the terminal,
//! [`Recorder`] just remembers what was asked of it.

mod path;
mod pixels;
mod recorder;

use glam::{Affine2, Vec2};

pub use path::{Path, PathCommand, Subpath};
pub use pixels::PixelCanvas;
pub use recorder::{DrawCommand, Recorder};

use crate::color::Rgba;
use crate::image::Sprite;
use folio_core::Viewport;

/// An axis aligned rectangle in user space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Horizontal extent.
    pub width: f32,
    /// Vertical extent.
    pub height: f32,
}

impl Rect {
    /// Create a rectangle from its top-left corner and size.
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// A rectangle covering a whole viewport.
    pub const fn covering(viewport: Viewport) -> Self {
        Self::new(0.0, 0.0, viewport.width, viewport.height)
    }

    /// A `size` x `size` square centred on the origin.
    pub const fn centred_square(size: f32) -> Self {
        Self::new(-size / 2.0, -size / 2.0, size, size)
    }

    /// Corners, clockwise from top-left.
    pub fn corners(&self) -> [Vec2; 4] {
        [
            Vec2::new(self.x, self.y),
            Vec2::new(self.x + self.width, self.y),
            Vec2::new(self.x + self.width, self.y + self.height),
            Vec2::new(self.x, self.y + self.height),
        ]
    }

    /// Whether a point lies inside (left/top inclusive).
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.x
            && point.y >= self.y
            && point.x < self.x + self.width
            && point.y < self.y + self.height
    }
}

/// A colour at a position along a gradient.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientStop {
    /// Position along the gradient, 0.0-1.0.
    pub offset: f32,
    /// Colour at that position.
    pub color: Rgba,
}

/// A gradient between two points, constant along lines perpendicular to it.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearGradient {
    /// Where offset 0.0 sits.
    pub start: Vec2,
    /// Where offset 1.0 sits.
    pub end: Vec2,
    /// Stops in ascending offset order.
    pub stops: Vec<GradientStop>,
}

impl LinearGradient {
    /// A gradient with no stops yet.
    pub fn new(start: Vec2, end: Vec2) -> Self {
        Self {
            start,
            end,
            stops: Vec::new(),
        }
    }

    /// Add a stop, keeping stops ordered by offset.
    #[must_use]
    pub fn with_stop(mut self, offset: f32, color: Rgba) -> Self {
        let offset = offset.clamp(0.0, 1.0);
        let index = self.stops.partition_point(|stop| stop.offset <= offset);
        self.stops.insert(index, GradientStop { offset, color });
        self
    }

    /// Colour at a user space point.
    pub fn color_at(&self, point: Vec2) -> Rgba {
        let (Some(first), Some(last)) = (self.stops.first(), self.stops.last()) else {
            return Rgba::WHITE.with_alpha(0.0);
        };

        let axis = self.end - self.start;
        let length_squared = axis.length_squared();
        let t = if length_squared > 0.0 {
            ((point - self.start).dot(axis) / length_squared).clamp(0.0, 1.0)
        } else {
            0.0
        };

        if t <= first.offset {
            return first.color;
        }
        for pair in self.stops.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if t <= b.offset {
                let span = b.offset - a.offset;
                let local = if span > 0.0 { (t - a.offset) / span } else { 1.0 };
                return a.color.lerp(b.color, local);
            }
        }
        last.color
    }
}

/// How a shape is filled.
#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    /// One colour everywhere.
    Solid(Rgba),
    /// A linear gradient.
    Linear(LinearGradient),
}

impl Paint {
    /// Colour at a user space point.
    pub fn color_at(&self, point: Vec2) -> Rgba {
        match self {
            Paint::Solid(color) => *color,
            Paint::Linear(gradient) => gradient.color_at(point),
        }
    }
}

impl From<Rgba> for Paint {
    fn from(color: Rgba) -> Self {
        Paint::Solid(color)
    }
}

impl From<LinearGradient> for Paint {
    fn from(gradient: LinearGradient) -> Self {
        Paint::Linear(gradient)
    }
}

/// A 2D canvas the particle fields draw onto.
///
/// Coordinates passed to drawing calls are in user space: the current
/// transform (built with [`Surface::translate`] and [`Surface::rotate`],
/// scoped with [`Surface::save`]/[`Surface::restore`]) maps them onto the
/// surface. No state survives beyond what the caller sets up each frame.
pub trait Surface {
    /// Logical size of the surface.
    fn size(&self) -> Viewport;

    /// Reset every pixel to the background.
    fn clear(&mut self);

    /// Fill a closed path.
    fn fill_path(&mut self, path: &Path, paint: &Paint);

    /// Stroke every segment of a path.
    fn stroke_path(&mut self, path: &Path, color: Rgba, width: f32);

    /// Draw an image scaled into `rect`.
    fn draw_image(&mut self, sprite: &Sprite, rect: Rect, alpha: f32);

    /// Push the current transform.
    fn save(&mut self);

    /// Pop back to the last saved transform.
    fn restore(&mut self);

    /// Move the origin.
    fn translate(&mut self, offset: Vec2);

    /// Rotate around the origin, in radians.
    fn rotate(&mut self, angle: f32);

    /// Fill a rectangle.
    fn fill_rect(&mut self, rect: Rect, paint: &Paint) {
        self.fill_path(&Path::polygon(&rect.corners()), paint);
    }

    /// Outline a rectangle.
    fn stroke_rect(&mut self, rect: Rect, color: Rgba, width: f32) {
        self.stroke_path(&Path::polygon(&rect.corners()), color, width);
    }
}

/// The current transform plus everything `save` pushed.
#[derive(Debug, Clone)]
pub(crate) struct TransformStack {
    current: Affine2,
    saved: Vec<Affine2>,
}

impl Default for TransformStack {
    fn default() -> Self {
        Self {
            current: Affine2::IDENTITY,
            saved: Vec::new(),
        }
    }
}

impl TransformStack {
    pub(crate) fn current(&self) -> Affine2 {
        self.current
    }

    pub(crate) fn save(&mut self) {
        self.saved.push(self.current);
    }

    /// Unbalanced restores leave the transform alone.
    pub(crate) fn restore(&mut self) {
        if let Some(previous) = self.saved.pop() {
            self.current = previous;
        }
    }

    pub(crate) fn translate(&mut self, offset: Vec2) {
        self.current = self.current * Affine2::from_translation(offset);
    }

    pub(crate) fn rotate(&mut self, angle: f32) {
        self.current = self.current * Affine2::from_angle(angle);
    }

    pub(crate) fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gradient_interpolates_between_stops() {
        let gradient = LinearGradient::new(Vec2::ZERO, Vec2::new(0.0, 100.0))
            .with_stop(1.0, Rgba::new(0, 0, 0, 0.5))
            .with_stop(0.0, Rgba::new(200, 0, 0, 0.9));

        assert_eq!(gradient.stops[0].offset, 0.0);
        assert_eq!(gradient.color_at(Vec2::new(40.0, -10.0)).r, 200);
        assert_eq!(gradient.color_at(Vec2::new(0.0, 50.0)).r, 100);
        assert!((gradient.color_at(Vec2::new(0.0, 50.0)).a - 0.7).abs() < 1e-5);
        assert_eq!(gradient.color_at(Vec2::new(0.0, 500.0)).r, 0);
    }

    #[test]
    fn test_transform_stack_scopes() {
        let mut stack = TransformStack::default();
        stack.save();
        stack.translate(Vec2::new(10.0, 5.0));
        stack.rotate(std::f32::consts::FRAC_PI_2);
        let moved = stack.current().transform_point2(Vec2::new(1.0, 0.0));
        assert!((moved - Vec2::new(10.0, 6.0)).length() < 1e-5);

        stack.restore();
        assert_eq!(stack.current(), Affine2::IDENTITY);
        stack.restore();
        assert_eq!(stack.current(), Affine2::IDENTITY);
    }

    #[test]
    fn test_rect_contains() {
        let rect = Rect::centred_square(10.0);
        assert!(rect.contains(Vec2::ZERO));
        assert!(rect.contains(Vec2::new(-5.0, -5.0)));
        assert!(!rect.contains(Vec2::new(5.0, 0.0)));
    }
}
