//! Settled snow along the bottom edge.

use glam::Vec2;

use crate::color::Rgba;
use crate::surface::{LinearGradient, Path, Surface};
use folio_core::Viewport;

/// Horizontal extent covered by one height sample.
pub const BUCKET_WIDTH: f32 = 2.0;

/// Share of a settling flake's size added to its own bucket.
const SETTLE_FACTOR: f32 = 0.9;
/// Neighbour shares, relative to the settle increment.
const LEFT_SPREAD: f32 = 0.3;
const RIGHT_SPREAD: f32 = 0.9;

const OUTLINE: Rgba = Rgba::new(200, 200, 255, 0.3);

/// Height map of accumulated snow, one sample per two logical pixels.
///
/// Every sample stays within `0.0..=max_height`.
#[derive(Debug, Clone, PartialEq)]
pub struct SnowPile {
    heights: Vec<f32>,
    max_height: f32,
}

impl SnowPile {
    /// An empty pile spanning `width`.
    pub fn new(width: f32, max_height: f32) -> Self {
        let mut pile = Self {
            heights: Vec::new(),
            max_height: max_height.max(0.0),
        };
        pile.resize(width);
        pile
    }

    /// Re-bucket for a new width. All accumulated snow is dropped.
    pub fn resize(&mut self, width: f32) {
        let buckets = if width.is_finite() && width > 0.0 {
            (width / BUCKET_WIDTH).ceil() as usize
        } else {
            0
        };
        self.heights = vec![0.0; buckets];
    }

    pub fn heights(&self) -> &[f32] {
        &self.heights
    }

    pub fn max_height(&self) -> f32 {
        self.max_height
    }

    fn bucket(&self, x: f32) -> Option<usize> {
        let index = (x / BUCKET_WIDTH).floor();
        (index >= 0.0 && index < self.heights.len() as f32).then_some(index as usize)
    }

    /// Snow depth under `x`; zero outside the pile.
    pub fn height_at(&self, x: f32) -> f32 {
        self.bucket(x).map_or(0.0, |index| self.heights[index])
    }

    /// Settle a flake of `size` at `x`.
    ///
    /// The bucket under `x` grows by `size * 0.9`, its left neighbour by 30% of
    /// that and its right neighbour by 90% of it. Flakes outside the pile are
    /// lost.
    pub fn accumulate(&mut self, x: f32, size: f32) {
        let Some(index) = self.bucket(x) else {
            return;
        };
        let increment = size.max(0.0) * SETTLE_FACTOR;
        self.raise(index, increment);
        if index > 0 {
            self.raise(index - 1, increment * LEFT_SPREAD);
        }
        if index + 1 < self.heights.len() {
            self.raise(index + 1, increment * RIGHT_SPREAD);
        }
    }

    fn raise(&mut self, index: usize, amount: f32) {
        let height = &mut self.heights[index];
        *height = (*height + amount).clamp(0.0, self.max_height);
    }

    /// Closed outline of the pile against the bottom edge.
    pub fn silhouette(&self, viewport: Viewport) -> Path {
        let mut path = Path::new();
        if self.heights.is_empty() {
            return path;
        }
        path.move_to(Vec2::new(0.0, viewport.height));
        for (i, height) in self.heights.iter().enumerate() {
            path.line_to(Vec2::new(i as f32 * BUCKET_WIDTH, viewport.height - height));
        }
        path.line_to(Vec2::new(viewport.width, viewport.height));
        path.close();
        path
    }

    /// Fill the silhouette with a white gradient and outline it.
    pub fn draw(&self, surface: &mut dyn Surface, viewport: Viewport) {
        if self.heights.is_empty() {
            return;
        }
        let gradient = LinearGradient::new(
            Vec2::new(0.0, viewport.height - self.max_height),
            Vec2::new(0.0, viewport.height),
        )
        .with_stop(0.0, Rgba::WHITE.with_alpha(0.9))
        .with_stop(0.5, Rgba::WHITE.with_alpha(0.7))
        .with_stop(1.0, Rgba::WHITE.with_alpha(0.5));

        let outline = self.silhouette(viewport);
        surface.fill_path(&outline, &gradient.into());
        surface.stroke_path(&outline, OUTLINE, 1.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::Recorder;
    use rand::{Rng, SeedableRng, rngs::StdRng};

    #[test]
    fn test_bucket_count_rounds_up() {
        assert_eq!(SnowPile::new(1200.0, 100.0).heights().len(), 600);
        assert_eq!(SnowPile::new(5.0, 100.0).heights().len(), 3);
        assert!(SnowPile::new(0.0, 100.0).heights().is_empty());
    }

    #[test]
    fn test_accumulate_spreads_to_three_buckets() {
        let mut pile = SnowPile::new(20.0, 100.0);
        pile.accumulate(9.0, 10.0);

        let heights = pile.heights();
        assert!((heights[4] - 9.0).abs() < 1e-5);
        assert!((heights[3] - 2.7).abs() < 1e-5);
        assert!((heights[5] - 8.1).abs() < 1e-5);
        assert_eq!(heights.iter().filter(|h| **h > 0.0).count(), 3);
    }

    #[test]
    fn test_accumulate_at_edges() {
        let mut pile = SnowPile::new(6.0, 100.0);
        pile.accumulate(0.0, 10.0);
        assert!((pile.heights()[0] - 9.0).abs() < 1e-5);
        assert!((pile.heights()[1] - 8.1).abs() < 1e-5);
        assert_eq!(pile.heights()[2], 0.0);

        pile.accumulate(5.9, 10.0);
        assert!((pile.heights()[1] - 10.8).abs() < 1e-5);
        assert!((pile.heights()[2] - 9.0).abs() < 1e-5);

        let before = pile.clone();
        pile.accumulate(-1.0, 10.0);
        pile.accumulate(6.0, 10.0);
        pile.accumulate(f32::NAN, 10.0);
        assert_eq!(pile, before);
    }

    #[test]
    fn test_heights_stay_within_bounds() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut pile = SnowPile::new(100.0, 25.0);
        for _ in 0..5000 {
            let x = rng.gen_range(-10.0..110.0);
            let size = rng.gen_range(-2.0..8.0);
            pile.accumulate(x, size);
        }
        assert!(pile.heights().iter().all(|h| (0.0..=25.0).contains(h)));
        assert!(pile.heights().iter().any(|h| *h == 25.0));
    }

    #[test]
    fn test_resize_resets() {
        let mut pile = SnowPile::new(10.0, 100.0);
        pile.accumulate(4.0, 3.0);
        pile.resize(30.0);
        assert_eq!(pile.heights().len(), 15);
        assert!(pile.heights().iter().all(|h| *h == 0.0));
    }

    #[test]
    fn test_draw_fills_and_outlines() {
        let viewport = Viewport::new(10.0, 50.0);
        let mut pile = SnowPile::new(viewport.width, 100.0);
        pile.accumulate(4.0, 2.0);
        let mut recorder = Recorder::new(viewport);
        pile.draw(&mut recorder, viewport);

        assert_eq!(recorder.fills().count(), 1);
        assert_eq!(recorder.strokes().count(), 1);
        let subpaths = pile.silhouette(viewport).subpaths();
        assert_eq!(subpaths.len(), 1);
        assert_eq!(subpaths[0].points.len(), 7);
        assert!(subpaths[0].closed);
    }
}
