//! User-tunable settings for each background effect.
//!
//! These are the on-disk shape of the `[cosmic]`, `[snow]` and `[flurry]`
//! config tables. Every field has a default so partial tables work.

use serde::{Deserialize, Serialize};

use crate::Intensity;

/// Upper bound on any effect's population. The link pass is quadratic.
pub const MAX_PARTICLES: usize = 2000;

/// Smallest accepted viewport area per particle.
pub const MIN_DENSITY_DIVISOR: f32 = 1000.0;

/// Settings for the cosmic mesh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CosmicSettings {
    /// Viewport area per particle. Lower means more particles.
    pub density_divisor: f32,
    /// Population never drops below this.
    pub min_particles: usize,
    /// Share of the population that are asteroids.
    pub asteroid_ratio: f32,
    /// Drift speed before depth scaling.
    pub base_speed: f32,
    /// Accent hue in degrees.
    pub accent_hue: f32,
    /// Accent saturation, 0.0-1.0.
    pub accent_saturation: f32,
    /// Accent lightness, 0.0-1.0.
    pub accent_lightness: f32,
    /// Path or `http(s)` URL of an image that floats among the stars.
    pub floating_image: Option<String>,
}

impl Default for CosmicSettings {
    fn default() -> Self {
        Self {
            density_divisor: 25000.0,
            min_particles: 30,
            asteroid_ratio: 0.1,
            base_speed: 0.4,
            accent_hue: 250.0,
            accent_saturation: 0.6,
            accent_lightness: 0.6,
            floating_image: None,
        }
    }
}

/// Settings for the snow mesh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnowSettings {
    /// Density, kind ratios and fall speed preset.
    pub intensity: Intensity,
    /// 0.0-1.0, scales horizontal drift.
    pub wind_strength: f32,
    /// Population never drops below this.
    pub min_particles: usize,
    /// The settled pile never grows taller than this.
    pub max_pile_height: f32,
}

impl Default for SnowSettings {
    fn default() -> Self {
        Self {
            intensity: Intensity::Medium,
            wind_strength: 0.3,
            min_particles: 50,
            max_pile_height: 100.0,
        }
    }
}

/// How a flurry flake is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlakeShape {
    /// Filled dot.
    Circle,
    /// Six pointed asterisk.
    Star,
}

/// Settings for the flurry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlurrySettings {
    /// Number of flakes in the air at once.
    pub density: usize,
    /// Smallest flake size.
    pub min_size: f32,
    /// Largest flake size.
    pub max_size: f32,
    /// Slowest fall speed.
    pub min_speed: f32,
    /// Fastest fall speed.
    pub max_speed: f32,
    /// Hex colours, one is picked per flake.
    pub colors: Vec<String>,
    /// Shapes, one is picked per flake.
    pub shapes: Vec<FlakeShape>,
    /// The settled pile never grows taller than this.
    pub max_pile_height: f32,
}

impl Default for FlurrySettings {
    fn default() -> Self {
        Self {
            density: 100,
            min_size: 2.0,
            max_size: 6.0,
            min_speed: 0.5,
            max_speed: 2.0,
            colors: vec!["#FFFFFF".into(), "#E6F3FF".into(), "#CCE7FF".into()],
            shapes: vec![FlakeShape::Circle, FlakeShape::Star],
            max_pile_height: 100.0,
        }
    }
}
