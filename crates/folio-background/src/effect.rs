//! The interface every particle field implements.

use rand::rngs::StdRng;

use crate::effects::{CosmicMesh, Flurry, SnowMesh};
use crate::image::ImageEvent;
use crate::surface::Surface;
use folio_core::{CosmicSettings, EffectKind, FlurrySettings, SnowSettings, Viewport};

/// Settings for every effect, so any of them can be built on demand.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EffectSettings {
    pub cosmic: CosmicSettings,
    pub snow: SnowSettings,
    pub flurry: FlurrySettings,
}

/// A particle field: a store that is rebuilt on resize, stepped once per
/// frame and drawn onto a [`Surface`].
///
/// Callers never step or draw an effect whose viewport has zero area.
pub trait Effect: Send {
    /// Which field this is.
    fn kind(&self) -> EffectKind;

    /// Throw the store away and populate it for `viewport`.
    fn rebuild(&mut self, viewport: Viewport, rng: &mut StdRng);

    /// Advance the simulation one tick.
    fn step(&mut self, viewport: Viewport, rng: &mut StdRng);

    /// Draw one frame.
    fn draw(&self, surface: &mut dyn Surface, viewport: Viewport);

    /// Number of particles in the store.
    fn population(&self) -> usize;

    /// Image the field wants loaded, if any.
    fn image_source(&self) -> Option<&str> {
        None
    }

    /// Consume a finished image load.
    fn on_image(&mut self, _event: &ImageEvent) {}
}

/// Build the effect for `kind`. [`EffectKind::None`] has no effect.
pub fn build(kind: EffectKind, settings: &EffectSettings) -> Option<Box<dyn Effect>> {
    match kind {
        EffectKind::None => None,
        EffectKind::CosmicMesh => Some(Box::new(CosmicMesh::new(settings.cosmic.clone()))),
        EffectKind::SnowMesh => Some(Box::new(SnowMesh::new(settings.snow.clone()))),
        EffectKind::Flurry => Some(Box::new(Flurry::new(&settings.flurry))),
    }
}
