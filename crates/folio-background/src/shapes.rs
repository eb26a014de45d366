//! Procedural outlines for the polygon kinds.

use std::f32::consts::{FRAC_PI_6, TAU};

use glam::Vec2;
use rand::Rng;

/// Arms on every snowflake.
pub const SNOWFLAKE_ARMS: usize = 6;

/// Evenly spaced vertices with each radius scaled by `1 + jitter`.
fn jittered_ring<R: Rng + ?Sized>(rng: &mut R, radius: f32, sides: usize, jitter: f32) -> Vec<Vec2> {
    (0..sides)
        .map(|i| {
            let angle = i as f32 / sides as f32 * TAU;
            let distance = radius + radius * rng.gen_range(-jitter..jitter);
            Vec2::from_angle(angle) * distance
        })
        .collect()
}

/// A lumpy rock: 5-8 vertices, radius varied by up to 20%.
pub fn asteroid<R: Rng + ?Sized>(rng: &mut R, radius: f32) -> Vec<Vec2> {
    let sides = rng.gen_range(5..=8);
    jittered_ring(rng, radius, sides, 0.2)
}

/// A crystal: 4-7 vertices, radius varied by up to 15%.
pub fn ice_crystal<R: Rng + ?Sized>(rng: &mut R, radius: f32) -> Vec<Vec2> {
    let sides = rng.gen_range(4..=7);
    jittered_ring(rng, radius, sides, 0.15)
}

/// Spoke end points for a six armed snowflake.
///
/// Each arm contributes its tip (80-120% of `radius`) followed by two short
/// branches at ±30° and 30% of the arm length. Drawn as spokes from the
/// centre.
pub fn snowflake<R: Rng + ?Sized>(rng: &mut R, radius: f32) -> Vec<Vec2> {
    let mut vertices = Vec::with_capacity(SNOWFLAKE_ARMS * 3);
    for i in 0..SNOWFLAKE_ARMS {
        let angle = i as f32 / SNOWFLAKE_ARMS as f32 * TAU;
        let length = radius * rng.gen_range(0.8..1.2);
        let branch = length * 0.3;
        vertices.push(Vec2::from_angle(angle) * length);
        vertices.push(Vec2::from_angle(angle - FRAC_PI_6) * branch);
        vertices.push(Vec2::from_angle(angle + FRAC_PI_6) * branch);
    }
    vertices
}
