//! Core types shared by the folio crates.
//!
//! Everything in here is plain data: the viewport the particle fields live in,
//! the selectable effects and their intensity presets, the colour themes used
//! by the profile card, and the serde-able settings each effect is built from.

mod effect;
mod settings;
mod theme;
mod viewport;

pub use effect::{EffectKind, Intensity, IntensityPreset};
pub use settings::{
    CosmicSettings, FlakeShape, FlurrySettings, MAX_PARTICLES, MIN_DENSITY_DIVISOR, SnowSettings,
};
pub use theme::ColorTheme;
pub use viewport::Viewport;
