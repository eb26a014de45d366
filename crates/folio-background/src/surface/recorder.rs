//! A surface that records draw calls instead of rasterising them.

use glam::{Affine2, Vec2};

use super::{Paint, Path, Rect, Surface, TransformStack};
use crate::color::Rgba;
use crate::image::Sprite;
use folio_core::Viewport;

/// One recorded call, with the transform in effect at the time.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// The surface was cleared.
    Clear,
    /// A path was filled.
    FillPath {
        path: Path,
        paint: Paint,
        transform: Affine2,
    },
    /// A path was stroked.
    StrokePath {
        path: Path,
        color: Rgba,
        width: f32,
        transform: Affine2,
    },
    /// An image was drawn.
    DrawImage {
        rect: Rect,
        alpha: f32,
        transform: Affine2,
        size: (u32, u32),
    },
}

/// Keeps every draw call for inspection.
#[derive(Debug, Clone)]
pub struct Recorder {
    size: Viewport,
    transforms: TransformStack,
    commands: Vec<DrawCommand>,
}

impl Recorder {
    pub fn new(size: Viewport) -> Self {
        Self {
            size,
            transforms: TransformStack::default(),
            commands: Vec::new(),
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Forget everything recorded so far.
    pub fn reset(&mut self) {
        self.commands.clear();
        self.transforms.reset();
    }

    pub fn clears(&self) -> usize {
        self.commands
            .iter()
            .filter(|command| matches!(command, DrawCommand::Clear))
            .count()
    }

    pub fn fills(&self) -> impl Iterator<Item = (&Path, &Paint, Affine2)> {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::FillPath {
                path,
                paint,
                transform,
            } => Some((path, paint, *transform)),
            _ => None,
        })
    }

    pub fn strokes(&self) -> impl Iterator<Item = (&Path, Rgba, f32)> {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::StrokePath {
                path, color, width, ..
            } => Some((path, *color, *width)),
            _ => None,
        })
    }

    pub fn images(&self) -> impl Iterator<Item = (Rect, f32, Affine2)> {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::DrawImage {
                rect,
                alpha,
                transform,
                ..
            } => Some((*rect, *alpha, *transform)),
            _ => None,
        })
    }

    /// Where the user space origin sat for each image draw.
    pub fn image_origins(&self) -> Vec<Vec2> {
        self.images()
            .map(|(_, _, transform)| transform.transform_point2(Vec2::ZERO))
            .collect()
    }
}

impl Surface for Recorder {
    fn size(&self) -> Viewport {
        self.size
    }

    fn clear(&mut self) {
        self.transforms.reset();
        self.commands.push(DrawCommand::Clear);
    }

    fn fill_path(&mut self, path: &Path, paint: &Paint) {
        self.commands.push(DrawCommand::FillPath {
            path: path.clone(),
            paint: paint.clone(),
            transform: self.transforms.current(),
        });
    }

    fn stroke_path(&mut self, path: &Path, color: Rgba, width: f32) {
        self.commands.push(DrawCommand::StrokePath {
            path: path.clone(),
            color,
            width,
            transform: self.transforms.current(),
        });
    }

    fn draw_image(&mut self, sprite: &Sprite, rect: Rect, alpha: f32) {
        self.commands.push(DrawCommand::DrawImage {
            rect,
            alpha,
            transform: self.transforms.current(),
            size: (sprite.width(), sprite.height()),
        });
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_transform_per_call() {
        let mut recorder = Recorder::new(Viewport::new(100.0, 100.0));
        recorder.clear();
        recorder.save();
        recorder.translate(Vec2::new(10.0, 20.0));
        recorder.fill_rect(Rect::centred_square(4.0), &Rgba::WHITE.into());
        recorder.restore();
        recorder.stroke_path(&Path::circle(Vec2::ZERO, 1.0), Rgba::WHITE, 0.5);

        assert_eq!(recorder.clears(), 1);
        let (_, _, transform) = recorder.fills().next().unwrap();
        assert_eq!(transform.transform_point2(Vec2::ZERO), Vec2::new(10.0, 20.0));
        assert_eq!(recorder.strokes().count(), 1);
        assert!(matches!(
            recorder.commands().last(),
            Some(DrawCommand::StrokePath { transform, .. }) if *transform == Affine2::IDENTITY
        ));
    }
}
