//! Selectable background effects and snow intensity presets.

use serde::{Deserialize, Serialize};

/// Background effect shown behind the profile card.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EffectKind {
    /// No background.
    None,
    /// Drifting stars and asteroids joined by faint lines.
    #[default]
    CosmicMesh,
    /// Snowflakes, ice crystals and frost settling into a pile.
    SnowMesh,
    /// Plain flakes in a handful of colours settling into a pile.
    Flurry,
}

impl EffectKind {
    /// Every effect, in cycling order.
    pub const ALL: [Self; 4] = [Self::None, Self::CosmicMesh, Self::SnowMesh, Self::Flurry];

    /// The effect after this one.
    pub fn next(self) -> Self {
        match self {
            Self::None => Self::CosmicMesh,
            Self::CosmicMesh => Self::SnowMesh,
            Self::SnowMesh => Self::Flurry,
            Self::Flurry => Self::None,
        }
    }

    /// Human readable name.
    pub fn name(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::CosmicMesh => "cosmic mesh",
            Self::SnowMesh => "snow mesh",
            Self::Flurry => "flurry",
        }
    }
}

/// How hard it snows.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intensity {
    /// Sparse, slow snow.
    Light,
    /// The default.
    #[default]
    Medium,
    /// Dense, fast snow.
    Heavy,
}

/// Numbers behind an [`Intensity`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntensityPreset {
    /// Viewport area per particle. Lower means more particles.
    pub density_divisor: f32,
    /// Share of the population that are snowflakes.
    pub snowflake_ratio: f32,
    /// Share of the population that are ice crystals. Frost takes the rest.
    pub ice_crystal_ratio: f32,
    /// Fall speed before depth scaling.
    pub base_fall_speed: f32,
}

impl Intensity {
    /// The preset for this intensity.
    pub const fn preset(self) -> IntensityPreset {
        match self {
            Self::Light => IntensityPreset {
                density_divisor: 35000.0,
                snowflake_ratio: 0.7,
                ice_crystal_ratio: 0.2,
                base_fall_speed: 0.5,
            },
            Self::Medium => IntensityPreset {
                density_divisor: 20000.0,
                snowflake_ratio: 0.6,
                ice_crystal_ratio: 0.25,
                base_fall_speed: 0.8,
            },
            Self::Heavy => IntensityPreset {
                density_divisor: 12000.0,
                snowflake_ratio: 0.5,
                ice_crystal_ratio: 0.3,
                base_fall_speed: 1.2,
            },
        }
    }

    /// Cycle light -> medium -> heavy -> light.
    pub fn next(self) -> Self {
        match self {
            Self::Light => Self::Medium,
            Self::Medium => Self::Heavy,
            Self::Heavy => Self::Light,
        }
    }

    /// Human readable name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Medium => "medium",
            Self::Heavy => "heavy",
        }
    }
}
