//! The particle fields.

mod cosmic;
mod flurry;
mod snow;

pub use cosmic::{CosmicKind, CosmicMesh};
pub use flurry::{Flake, Flurry};
pub use snow::{SnowKind, SnowMesh};
