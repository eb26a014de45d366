//! The particle record shared by every field.

use glam::Vec2;
use rand::Rng;

/// A linear depth ramp: `floor + span * depth`.
///
/// Depth 0.0 is far away, 1.0 is right in front of the viewer. Every ramp in
/// the engine has a non-negative span, so nearer particles are never smaller,
/// slower or fainter than farther ones.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepthRamp {
    /// Value at depth 0.0.
    pub floor: f32,
    /// Added at depth 1.0.
    pub span: f32,
}

impl DepthRamp {
    pub const fn new(floor: f32, span: f32) -> Self {
        Self { floor, span }
    }

    /// Value at `depth`, clamped to 0.0-1.0.
    pub fn at(self, depth: f32) -> f32 {
        self.floor + self.span * depth.clamp(0.0, 1.0)
    }
}

/// Rotation state for kinds that spin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spin {
    /// Current angle in radians. Never wrapped.
    pub rotation: f32,
    /// Radians added each tick.
    pub angular_velocity: f32,
}

impl Spin {
    /// Random starting angle, angular velocity in `±max_velocity / 2`.
    pub fn random<R: Rng + ?Sized>(rng: &mut R, max_velocity: f32) -> Self {
        Self {
            rotation: rng.gen_range(0.0..std::f32::consts::TAU),
            angular_velocity: (rng.gen_range(0.0..1.0) - 0.5) * max_velocity,
        }
    }

    pub fn advance(&mut self) {
        self.rotation += self.angular_velocity;
    }
}

/// Sinusoidal horizontal wander.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Drift {
    /// Current phase in radians.
    pub phase: f32,
    /// Phase added each tick.
    pub speed: f32,
}

impl Drift {
    /// Random phase, speed drawn from `floor + r * span`.
    pub fn random<R: Rng + ?Sized>(rng: &mut R, floor: f32, span: f32) -> Self {
        Self {
            phase: rng.gen_range(0.0..std::f32::consts::TAU),
            speed: floor + rng.gen_range(0.0..1.0) * span,
        }
    }

    /// Move the phase on one tick and return its sine.
    pub fn advance(&mut self) -> f32 {
        self.phase += self.speed;
        self.phase.sin()
    }
}

/// Kind specific data carried by a [`Particle`].
pub trait ParticleKind {
    /// Ambient kinds never take part in the proximity graph.
    fn is_ambient(&self) -> bool;
}

/// One simulated particle.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle<K> {
    /// Position in viewport coordinates.
    pub position: Vec2,
    /// Simulated distance from the viewer, 0.0 (far) to 1.0 (near).
    pub depth: f32,
    /// Displacement per tick before depth scaling.
    pub velocity: Vec2,
    /// Size, fixed at creation.
    pub radius: f32,
    /// Opacity, fixed at creation.
    pub opacity: f32,
    /// Variant and its own state.
    pub kind: K,
}

impl<K> Particle<K> {
    /// Straight line distance to another particle.
    pub fn distance(&self, other: &Particle<K>) -> f32 {
        self.position.distance(other.position)
    }
}
