//! Software rasteriser over an RGB pixel grid.

use glam::{Affine2, Vec2};

use super::{Paint, Path, Rect, Surface, TransformStack};
use crate::color::Rgba;
use crate::image::Sprite;
use folio_core::Viewport;

/// An opaque RGB canvas with a logical-to-pixel scale.
///
/// Logical coordinates are divided by `scale` to find pixels, so a 200x100
/// canvas at scale 4.0 presents an 800x400 viewport to the effects. Strokes
/// thinner than a pixel and fills smaller than one still cover one pixel, at
/// their own alpha.
#[derive(Debug, Clone)]
pub struct PixelCanvas {
    width: usize,
    height: usize,
    scale: f32,
    background: [u8; 3],
    pixels: Vec<[u8; 3]>,
    transforms: TransformStack,
}

impl PixelCanvas {
    /// A canvas of `width` x `height` pixels, cleared to black.
    pub fn new(width: usize, height: usize, scale: f32) -> Self {
        let scale = if scale.is_finite() && scale > 0.0 { scale } else { 1.0 };
        Self {
            width,
            height,
            scale,
            background: [0, 0, 0],
            pixels: vec![[0, 0, 0]; width * height],
            transforms: TransformStack::default(),
        }
    }

    /// Change the pixel size. Contents are cleared.
    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.pixels = vec![self.background; width * height];
        self.transforms.reset();
    }

    /// Colour `clear` resets pixels to.
    pub fn set_background(&mut self, background: [u8; 3]) {
        self.background = background;
    }

    /// Width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Logical units per pixel.
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// A single pixel.
    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 3]> {
        (x < self.width && y < self.height).then(|| self.pixels[y * self.width + x])
    }

    /// Pixel rows, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[[u8; 3]]> {
        self.pixels.chunks_exact(self.width.max(1))
    }

    /// User space to pixel space.
    fn device_transform(&self) -> Affine2 {
        Affine2::from_scale(Vec2::splat(1.0 / self.scale)) * self.transforms.current()
    }

    fn blend(&mut self, x: i64, y: i64, color: Rgba) {
        if color.a <= 0.0 || x < 0 || y < 0 {
            return;
        }
        let (x, y) = (x as usize, y as usize);
        if x >= self.width || y >= self.height {
            return;
        }
        let index = y * self.width + x;
        self.pixels[index] = color.blend_over(self.pixels[index]);
    }

    /// Even-odd scanline fill of polygons given in pixel space.
    fn fill_polygons(&mut self, polygons: &[Vec<Vec2>], paint: &Paint, to_user: Affine2) {
        let (mut min, mut max) = (Vec2::splat(f32::INFINITY), Vec2::splat(f32::NEG_INFINITY));
        for point in polygons.iter().flatten() {
            min = min.min(*point);
            max = max.max(*point);
        }
        if !min.is_finite() || !max.is_finite() {
            return;
        }
        let extent = max - min;
        if extent.x < 1.0 && extent.y < 1.0 {
            let centre = (min + max) / 2.0;
            let color = paint.color_at(to_user.transform_point2(centre));
            self.blend(centre.x.floor() as i64, centre.y.floor() as i64, color);
            return;
        }
        let first_row = (min.y.floor() as i64).max(0);
        let last_row = (max.y.ceil() as i64).min(self.height as i64 - 1);

        let mut crossings: Vec<f32> = Vec::new();
        for row in first_row..=last_row {
            let sample_y = row as f32 + 0.5;
            crossings.clear();
            for polygon in polygons {
                for (i, a) in polygon.iter().enumerate() {
                    let b = polygon[(i + 1) % polygon.len()];
                    if (a.y <= sample_y) != (b.y <= sample_y) {
                        let t = (sample_y - a.y) / (b.y - a.y);
                        crossings.push(a.x + (b.x - a.x) * t);
                    }
                }
            }
            crossings.sort_by(f32::total_cmp);

            for span in crossings.chunks_exact(2) {
                let start = ((span[0] - 0.5).ceil() as i64).max(0);
                let end = ((span[1] - 0.5).ceil() as i64).min(self.width as i64);
                for column in start..end {
                    let color = match paint {
                        Paint::Solid(color) => *color,
                        Paint::Linear(_) => paint.color_at(
                            to_user.transform_point2(Vec2::new(column as f32 + 0.5, sample_y)),
                        ),
                    };
                    self.blend(column, row, color);
                }
            }
        }
    }

    /// Rasterise one segment in pixel space with a square brush.
    fn stroke_segment(&mut self, from: Vec2, to: Vec2, color: Rgba, brush: i64) {
        let delta = to - from;
        let steps = delta.abs().max_element().ceil().max(1.0) as i64;
        let mut last = None;
        for step in 0..=steps {
            let point = from + delta * (step as f32 / steps as f32);
            let pixel = (point.x.floor() as i64, point.y.floor() as i64);
            if last == Some(pixel) {
                continue;
            }
            last = Some(pixel);
            let reach = brush / 2;
            for dy in -reach..brush - reach {
                for dx in -reach..brush - reach {
                    self.blend(pixel.0 + dx, pixel.1 + dy, color);
                }
            }
        }
    }
}

impl Surface for PixelCanvas {
    fn size(&self) -> Viewport {
        Viewport::new(
            self.width as f32 * self.scale,
            self.height as f32 * self.scale,
        )
    }

    fn clear(&mut self) {
        self.pixels.fill(self.background);
        self.transforms.reset();
    }

    fn fill_path(&mut self, path: &Path, paint: &Paint) {
        let device = self.device_transform();
        let polygons: Vec<Vec<Vec2>> = path
            .subpaths()
            .into_iter()
            .filter(|subpath| subpath.points.len() > 2)
            .map(|subpath| {
                subpath
                    .points
                    .iter()
                    .map(|point| device.transform_point2(*point))
                    .collect()
            })
            .collect();
        if polygons.is_empty() {
            return;
        }
        self.fill_polygons(&polygons, paint, device.inverse());
    }

    fn stroke_path(&mut self, path: &Path, color: Rgba, width: f32) {
        let device = self.device_transform();
        let brush = ((width / self.scale).round() as i64).max(1);
        for subpath in path.subpaths() {
            let points: Vec<Vec2> = subpath
                .points
                .iter()
                .map(|point| device.transform_point2(*point))
                .collect();
            for pair in points.windows(2) {
                self.stroke_segment(pair[0], pair[1], color, brush);
            }
            if subpath.closed && points.len() > 2 {
                self.stroke_segment(points[points.len() - 1], points[0], color, brush);
            }
        }
    }

    fn draw_image(&mut self, sprite: &Sprite, rect: Rect, alpha: f32) {
        if rect.width <= 0.0 || rect.height <= 0.0 {
            return;
        }
        let device = self.device_transform();
        let to_user = device.inverse();
        let corners = rect.corners().map(|corner| device.transform_point2(corner));

        let (mut min, mut max) = (Vec2::splat(f32::INFINITY), Vec2::splat(f32::NEG_INFINITY));
        for corner in corners {
            min = min.min(corner);
            max = max.max(corner);
        }
        let first_column = (min.x.floor() as i64).max(0);
        let last_column = (max.x.ceil() as i64).min(self.width as i64 - 1);
        let first_row = (min.y.floor() as i64).max(0);
        let last_row = (max.y.ceil() as i64).min(self.height as i64 - 1);

        for row in first_row..=last_row {
            for column in first_column..=last_column {
                let user =
                    to_user.transform_point2(Vec2::new(column as f32 + 0.5, row as f32 + 0.5));
                if !rect.contains(user) {
                    continue;
                }
                let u = (user.x - rect.x) / rect.width;
                let v = (user.y - rect.y) / rect.height;
                if let Some(texel) = sprite.sample(u, v) {
                    self.blend(column, row, texel.fade(alpha));
                }
            }
        }
    }

    fn save(&mut self) {
        self.transforms.save();
    }

    fn restore(&mut self) {
        self.transforms.restore();
    }

    fn translate(&mut self, offset: Vec2) {
        self.transforms.translate(offset);
    }

    fn rotate(&mut self, angle: f32) {
        self.transforms.rotate(angle);
    }
}
