//! Particle field backgrounds for the folio profile card.
//!
//! Each field keeps a store of particles that is rebuilt whenever the
//! viewport changes, stepped once per frame, linked to its neighbours by
//! faint lines and drawn onto a [`Surface`]. Three fields are provided: a
//! cosmic mesh of stars and asteroids, an ice-age snow mesh that piles up
//! along the bottom edge, and a simpler flurry of flakes.
//!
//! A [`FrameDriver`] owns one field and ticks it; [`BackgroundState`]
//! adapts that to a ratatui frame by rasterising onto a [`PixelCanvas`] and
//! emitting half block cells.

mod color;
mod driver;
mod effect;
mod effects;
mod error;
mod image;
mod particle;
mod pile;
mod population;
mod proximity;
mod shapes;
mod state;
pub mod surface;

pub use color::{Rgba, hsl_to_rgb};
pub use driver::{CancelToken, FrameDriver, Tick};
pub use effect::{Effect, EffectSettings, build};
pub use effects::{CosmicKind, CosmicMesh, Flake, Flurry, SnowKind, SnowMesh};
pub use error::BackgroundError;
pub use self::image::{ImageEvent, ImageLoader, Sprite, load};
pub use particle::{DepthRamp, Drift, Particle, ParticleKind, Spin};
pub use pile::SnowPile;
pub use population::{particle_count, split};
pub use proximity::{Link, LinkStyle, draw_links, links};
pub use state::{BackgroundState, half_block_lines};
pub use surface::{PixelCanvas, Recorder, Surface};
