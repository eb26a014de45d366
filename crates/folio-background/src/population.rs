//! How many particles a viewport gets and how they split across kinds.

use folio_core::{MAX_PARTICLES, Viewport};

/// `max(floor, floor(area / divisor))`, capped at [`MAX_PARTICLES`].
pub fn particle_count(viewport: Viewport, density_divisor: f32, floor: usize) -> usize {
    let floor = floor.min(MAX_PARTICLES);
    if density_divisor.is_nan() || density_divisor <= 0.0 {
        return floor;
    }
    let scaled = (viewport.area() / f64::from(density_divisor)).floor();
    floor.max(scaled as usize).min(MAX_PARTICLES)
}

/// Split `total` by `ratios`, one count per ratio plus a final remainder.
///
/// Each ratio gets `floor(total * ratio)`; the last entry absorbs rounding so
/// the counts always sum to `total`.
pub fn split(total: usize, ratios: &[f32]) -> Vec<usize> {
    let mut counts = Vec::with_capacity(ratios.len() + 1);
    let mut left = total;
    for ratio in ratios {
        let share = (total as f32 * ratio.clamp(0.0, 1.0)).floor() as usize;
        let share = share.min(left);
        left -= share;
        counts.push(share);
    }
    counts.push(left);
    counts
}
