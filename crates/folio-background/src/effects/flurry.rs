//! Plain falling flakes that settle into a pile.

use std::f32::consts::PI;

use glam::Vec2;
use rand::{Rng, rngs::StdRng, seq::SliceRandom};
use tracing::debug;

use crate::color::Rgba;
use crate::effect::Effect;
use crate::pile::SnowPile;
use crate::surface::{Path, Surface};
use folio_core::{EffectKind, FlakeShape, FlurrySettings, MAX_PARTICLES, Viewport};

/// One falling flake.
#[derive(Debug, Clone, PartialEq)]
pub struct Flake {
    pub position: Vec2,
    pub size: f32,
    /// Pixels fallen per tick.
    pub speed: f32,
    pub color: Rgba,
    pub shape: FlakeShape,
}

/// Ranges and palette, with the config's strings already parsed.
#[derive(Debug, Clone)]
struct Palette {
    sizes: (f32, f32),
    speeds: (f32, f32),
    colors: Vec<Rgba>,
    shapes: Vec<FlakeShape>,
}

/// The flurry field.
#[derive(Debug)]
pub struct Flurry {
    density: usize,
    max_pile_height: f32,
    palette: Palette,
    flakes: Vec<Flake>,
    pile: SnowPile,
}

fn between(rng: &mut StdRng, (low, high): (f32, f32)) -> f32 {
    low + rng.gen_range(0.0..1.0) * (high - low)
}

impl Flurry {
    pub fn new(settings: &FlurrySettings) -> Self {
        let mut colors: Vec<Rgba> = settings
            .colors
            .iter()
            .filter_map(|hex| Rgba::from_hex(hex))
            .collect();
        if colors.is_empty() {
            colors.push(Rgba::WHITE);
        }
        let mut shapes = settings.shapes.clone();
        if shapes.is_empty() {
            shapes.push(FlakeShape::Circle);
        }

        Self {
            density: settings.density,
            max_pile_height: settings.max_pile_height,
            palette: Palette {
                sizes: (settings.min_size, settings.max_size),
                speeds: (settings.min_speed, settings.max_speed),
                colors,
                shapes,
            },
            flakes: Vec::new(),
            pile: SnowPile::new(0.0, settings.max_pile_height),
        }
    }

    pub fn flakes(&self) -> &[Flake] {
        &self.flakes
    }

    pub fn pile(&self) -> &SnowPile {
        &self.pile
    }

    /// A flake somewhere in the band just above the top edge.
    fn spawn(&self, viewport: Viewport, rng: &mut StdRng) -> Flake {
        let x = rng.gen_range(0.0..=viewport.width);
        let y = rng.gen_range(0.0..1.0) * viewport.height - viewport.height;
        let size = between(rng, self.palette.sizes);
        let speed = between(rng, self.palette.speeds);
        let shape = self
            .palette
            .shapes
            .choose(rng)
            .copied()
            .unwrap_or(FlakeShape::Circle);
        let color = self
            .palette
            .colors
            .choose(rng)
            .copied()
            .unwrap_or(Rgba::WHITE);
        Flake {
            position: Vec2::new(x, y),
            size,
            speed,
            color: color.with_alpha(0.3 + rng.gen_range(0.0..1.0) * 0.4),
            shape,
        }
    }

    fn draw_flake(surface: &mut dyn Surface, flake: &Flake) {
        match flake.shape {
            FlakeShape::Star => {
                let mut path = Path::new();
                for i in 0..3 {
                    let arm = Vec2::from_angle(i as f32 * PI / 3.0) * flake.size;
                    path.move_to(flake.position - arm).line_to(flake.position + arm);
                }
                surface.stroke_path(&path, flake.color, (flake.size / 3.0).max(1.0));
            }
            FlakeShape::Circle => {
                let path = Path::circle(flake.position, flake.size);
                surface.fill_path(&path, &flake.color.into());
            }
        }
    }
}

impl Effect for Flurry {
    fn kind(&self) -> EffectKind {
        EffectKind::Flurry
    }

    fn rebuild(&mut self, viewport: Viewport, rng: &mut StdRng) {
        self.pile = SnowPile::new(viewport.width, self.max_pile_height);
        self.flakes = (0..self.density.min(MAX_PARTICLES))
            .map(|_| self.spawn(viewport, rng))
            .collect();
        debug!(flakes = self.flakes.len(), width = viewport.width, "rebuilt flurry");
    }

    fn step(&mut self, viewport: Viewport, rng: &mut StdRng) {
        for index in 0..self.flakes.len() {
            let flake = &mut self.flakes[index];
            flake.position.y += flake.speed;
            flake.position.x += (flake.position.y / (flake.size * 20.0)).sin() * 0.3;

            let floor = viewport.height - self.pile.height_at(flake.position.x);
            if flake.position.y + flake.size >= floor {
                let (x, size) = (flake.position.x, flake.size);
                self.pile.accumulate(x, size);
                self.flakes[index] = self.spawn(viewport, rng);
            }
        }
    }

    fn draw(&self, surface: &mut dyn Surface, viewport: Viewport) {
        surface.clear();
        for flake in &self.flakes {
            Self::draw_flake(surface, flake);
        }
        self.pile.draw(surface, viewport);
    }

    fn population(&self) -> usize {
        self.flakes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::Recorder;
    use rand::SeedableRng;

    #[test]
    fn test_rebuild_spawns_above_the_top() {
        let viewport = Viewport::new(300.0, 200.0);
        let mut rng = StdRng::seed_from_u64(21);
        let mut flurry = Flurry::new(&FlurrySettings::default());
        flurry.rebuild(viewport, &mut rng);

        assert_eq!(flurry.population(), 100);
        for flake in flurry.flakes() {
            assert!((-200.0..0.0).contains(&flake.position.y));
            assert!((2.0..=6.0).contains(&flake.size));
            assert!((0.5..=2.0).contains(&flake.speed));
            assert!((0.3..=0.7).contains(&flake.color.a));
        }
    }

    #[test]
    fn test_landing_flake_grows_pile_and_respawns() {
        let viewport = Viewport::new(100.0, 100.0);
        let mut rng = StdRng::seed_from_u64(22);
        let mut flurry = Flurry::new(&FlurrySettings {
            density: 1,
            ..FlurrySettings::default()
        });
        flurry.rebuild(viewport, &mut rng);
        flurry.flakes[0].position = Vec2::new(50.0, 97.0);
        flurry.flakes[0].size = 2.0;
        flurry.flakes[0].speed = 1.0;

        flurry.step(viewport, &mut rng);

        assert_eq!(flurry.population(), 1);
        assert!(flurry.flakes()[0].position.y < 0.0);
        assert_eq!(flurry.pile().heights().iter().filter(|h| **h > 0.0).count(), 3);
    }

    #[test]
    fn test_density_is_capped() {
        let mut rng = StdRng::seed_from_u64(23);
        let mut flurry = Flurry::new(&FlurrySettings {
            density: MAX_PARTICLES * 10,
            ..FlurrySettings::default()
        });
        flurry.rebuild(Viewport::new(100.0, 100.0), &mut rng);
        assert_eq!(flurry.population(), MAX_PARTICLES);
    }

    #[test]
    fn test_bad_palette_falls_back() {
        let flurry = Flurry::new(&FlurrySettings {
            colors: vec!["not a colour".to_string(), "#aé".to_string()],
            shapes: Vec::new(),
            ..FlurrySettings::default()
        });
        assert_eq!(flurry.palette.colors, vec![Rgba::WHITE]);
        assert_eq!(flurry.palette.shapes, vec![FlakeShape::Circle]);
    }

    #[test]
    fn test_star_is_three_strokes() {
        let viewport = Viewport::new(100.0, 100.0);
        let mut recorder = Recorder::new(viewport);
        let flake = Flake {
            position: Vec2::new(10.0, 10.0),
            size: 6.0,
            speed: 1.0,
            color: Rgba::WHITE.with_alpha(0.5),
            shape: FlakeShape::Star,
        };
        Flurry::draw_flake(&mut recorder, &flake);

        let (path, color, width) = recorder.strokes().next().unwrap();
        assert_eq!(path.subpaths().len(), 3);
        assert_eq!(color.a, 0.5);
        assert_eq!(width, 2.0);
    }

    #[test]
    fn test_draw_clears_then_draws_pile_last() {
        let viewport = Viewport::new(100.0, 100.0);
        let mut rng = StdRng::seed_from_u64(23);
        let mut flurry = Flurry::new(&FlurrySettings::default());
        flurry.rebuild(viewport, &mut rng);

        let mut recorder = Recorder::new(viewport);
        flurry.draw(&mut recorder, viewport);
        assert_eq!(recorder.clears(), 1);
        let circles = flurry
            .flakes()
            .iter()
            .filter(|f| f.shape == FlakeShape::Circle)
            .count();
        // every circle plus the pile
        assert_eq!(recorder.fills().count(), circles + 1);
    }
}
