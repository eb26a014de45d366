//! Drifting stars and asteroids joined by a faint mesh.

use std::sync::Arc;

use glam::Vec2;
use rand::{Rng, rngs::StdRng};
use tracing::{debug, warn};

use crate::color::{Rgba, hsl_to_rgb};
use crate::effect::Effect;
use crate::image::{ImageEvent, Sprite};
use crate::particle::{DepthRamp, Particle, ParticleKind, Spin};
use crate::population::{particle_count, split};
use crate::proximity::{LinkStyle, draw_links, links};
use crate::shapes;
use crate::surface::{Path, Rect, Surface};
use folio_core::{CosmicSettings, EffectKind, Viewport};

const STAR_BASE_RADIUS: f32 = 1.5;
const ASTEROID_RADIUS_FACTOR: f32 = 3.5;
const ASTEROID_MAX_SPIN: f32 = 0.005;

const IMAGE_SIZE: f32 = 60.0 * 1.5;
const IMAGE_DEPTH: f32 = 0.8;
const IMAGE_SPEED_FACTOR: f32 = 0.3;
const IMAGE_SPIN: f32 = 0.002;

const SIZE_RAMP: DepthRamp = DepthRamp::new(0.2, 0.8);
const OPACITY_RAMP: DepthRamp = DepthRamp::new(0.3, 0.7);
const SPEED_RAMP: DepthRamp = DepthRamp::new(0.3, 0.7);
const IMAGE_SPEED_RAMP: DepthRamp = DepthRamp::new(0.2, 0.5);

/// Variants of the cosmic field.
#[derive(Debug, Clone, PartialEq)]
pub enum CosmicKind {
    Star,
    Asteroid {
        spin: Spin,
        outline: Vec<Vec2>,
    },
    /// A single slow, spinning picture. Drawn as a placeholder square until
    /// its sprite arrives.
    FloatingImage {
        spin: Spin,
        sprite: Option<Arc<Sprite>>,
    },
}

impl ParticleKind for CosmicKind {
    fn is_ambient(&self) -> bool {
        matches!(self, CosmicKind::FloatingImage { .. })
    }
}

/// Colours derived once from the accent.
#[derive(Debug, Clone, Copy)]
struct Palette {
    star: Rgba,
    asteroid: Rgba,
}

impl Palette {
    fn from_settings(settings: &CosmicSettings) -> Self {
        let (h, s, l) = (
            settings.accent_hue,
            settings.accent_saturation,
            settings.accent_lightness,
        );
        Self {
            star: hsl_to_rgb(h, s, l + 0.1, 1.0),
            asteroid: hsl_to_rgb(h, 0.2, l * 0.8, 1.0),
        }
    }
}

/// The cosmic mesh.
#[derive(Debug)]
pub struct CosmicMesh {
    settings: CosmicSettings,
    palette: Palette,
    links: LinkStyle,
    particles: Vec<Particle<CosmicKind>>,
    /// Survives rebuilds so a resize doesn't bring the placeholder back.
    sprite: Option<Arc<Sprite>>,
}

impl CosmicMesh {
    pub fn new(settings: CosmicSettings) -> Self {
        let links = LinkStyle {
            divisor: 7.0,
            min_coeff: 0.5,
            max_coeff: 0.5,
            dampening: 0.08,
            cutoff: 0.005,
            width: 0.2,
            color: hsl_to_rgb(
                settings.accent_hue,
                settings.accent_saturation,
                settings.accent_lightness,
                1.0,
            ),
        };
        Self {
            palette: Palette::from_settings(&settings),
            settings,
            links,
            particles: Vec::new(),
            sprite: None,
        }
    }

    pub fn particles(&self) -> &[Particle<CosmicKind>] {
        &self.particles
    }

    fn random_position(rng: &mut StdRng, viewport: Viewport) -> Vec2 {
        Vec2::new(
            rng.gen_range(0.0..=viewport.width),
            rng.gen_range(0.0..=viewport.height),
        )
    }

    fn random_velocity(rng: &mut StdRng, speed: f32) -> Vec2 {
        Vec2::new(
            (rng.gen_range(0.0..1.0) - 0.5) * speed,
            (rng.gen_range(0.0..1.0) - 0.5) * speed,
        )
    }

    fn floating_image(&self, rng: &mut StdRng, viewport: Viewport) -> Particle<CosmicKind> {
        Particle {
            position: Vec2::new(viewport.width / 2.0, viewport.height / 2.0),
            depth: IMAGE_DEPTH,
            velocity: Self::random_velocity(rng, self.settings.base_speed * IMAGE_SPEED_FACTOR),
            radius: IMAGE_SIZE / 2.0,
            opacity: 1.0,
            kind: CosmicKind::FloatingImage {
                spin: Spin {
                    rotation: 0.0,
                    angular_velocity: IMAGE_SPIN,
                },
                sprite: self.sprite.clone(),
            },
        }
    }

    fn asteroid(&self, rng: &mut StdRng, viewport: Viewport) -> Particle<CosmicKind> {
        let depth = rng.gen_range(0.0..1.0);
        let radius = STAR_BASE_RADIUS * ASTEROID_RADIUS_FACTOR * SIZE_RAMP.at(depth);
        let outline = shapes::asteroid(rng, radius);
        Particle {
            position: Self::random_position(rng, viewport),
            depth,
            velocity: Self::random_velocity(rng, self.settings.base_speed),
            radius,
            opacity: OPACITY_RAMP.at(depth),
            kind: CosmicKind::Asteroid {
                spin: Spin::random(rng, ASTEROID_MAX_SPIN),
                outline,
            },
        }
    }

    fn star(&self, rng: &mut StdRng, viewport: Viewport) -> Particle<CosmicKind> {
        let depth = rng.gen_range(0.0..1.0);
        Particle {
            position: Self::random_position(rng, viewport),
            depth,
            velocity: Self::random_velocity(rng, self.settings.base_speed),
            radius: STAR_BASE_RADIUS * SIZE_RAMP.at(depth),
            opacity: OPACITY_RAMP.at(depth),
            kind: CosmicKind::Star,
        }
    }

    fn draw_particle(&self, surface: &mut dyn Surface, particle: &Particle<CosmicKind>) {
        match &particle.kind {
            CosmicKind::Star => {
                let color = self.palette.star.fade(particle.opacity * 0.7);
                surface.fill_path(&Path::circle(particle.position, particle.radius), &color.into());
            }
            CosmicKind::Asteroid { spin, outline } => {
                let color = self.palette.asteroid.fade(particle.opacity * 0.8);
                surface.save();
                surface.translate(particle.position);
                surface.rotate(spin.rotation);
                surface.fill_path(&Path::polygon(outline), &color.into());
                surface.restore();
            }
            CosmicKind::FloatingImage { spin, sprite } => {
                let frame = Rect::centred_square(particle.radius * 2.0);
                surface.save();
                surface.translate(particle.position);
                surface.rotate(spin.rotation);
                match sprite {
                    Some(sprite) => surface.draw_image(sprite, frame, particle.opacity),
                    None => {
                        let white = Rgba::WHITE.fade(particle.opacity);
                        surface.fill_rect(frame, &white.fade(0.5).into());
                        surface.stroke_rect(frame, white.fade(0.8), 1.0);
                    }
                }
                surface.restore();
            }
        }
    }
}

impl Effect for CosmicMesh {
    fn kind(&self) -> EffectKind {
        EffectKind::CosmicMesh
    }

    fn rebuild(&mut self, viewport: Viewport, rng: &mut StdRng) {
        self.particles.clear();
        let total = particle_count(
            viewport,
            self.settings.density_divisor,
            self.settings.min_particles,
        );
        let counts = split(total, &[self.settings.asteroid_ratio]);
        let (asteroids, mut stars) = (counts[0], counts[1]);

        if self.settings.floating_image.is_some() && stars > 0 {
            stars -= 1;
            let image = self.floating_image(rng, viewport);
            self.particles.push(image);
        }
        for _ in 0..asteroids {
            let asteroid = self.asteroid(rng, viewport);
            self.particles.push(asteroid);
        }
        for _ in 0..stars {
            let star = self.star(rng, viewport);
            self.particles.push(star);
        }
        debug!(
            particles = self.particles.len(),
            asteroids,
            stars,
            width = viewport.width,
            height = viewport.height,
            "rebuilt cosmic mesh"
        );
    }

    fn step(&mut self, viewport: Viewport, _rng: &mut StdRng) {
        for particle in &mut self.particles {
            let speed = match particle.kind {
                CosmicKind::FloatingImage { .. } => IMAGE_SPEED_RAMP.at(particle.depth),
                _ => SPEED_RAMP.at(particle.depth),
            };
            particle.position += particle.velocity * speed;

            match &mut particle.kind {
                CosmicKind::Asteroid { spin, .. } | CosmicKind::FloatingImage { spin, .. } => {
                    spin.advance()
                }
                CosmicKind::Star => {}
            }

            // Only flip when heading into the wall, so a particle that
            // overshoots isn't turned back out of the viewport.
            let (position, radius) = (particle.position, particle.radius);
            let velocity = &mut particle.velocity;
            if (position.x + radius > viewport.width && velocity.x > 0.0)
                || (position.x - radius < 0.0 && velocity.x < 0.0)
            {
                velocity.x = -velocity.x;
            }
            if (position.y + radius > viewport.height && velocity.y > 0.0)
                || (position.y - radius < 0.0 && velocity.y < 0.0)
            {
                velocity.y = -velocity.y;
            }
        }
    }

    fn draw(&self, surface: &mut dyn Surface, viewport: Viewport) {
        surface.clear();
        draw_links(surface, &links(&self.particles, viewport, &self.links), &self.links);
        for particle in &self.particles {
            self.draw_particle(surface, particle);
        }
    }

    fn population(&self) -> usize {
        self.particles.len()
    }

    fn image_source(&self) -> Option<&str> {
        self.settings.floating_image.as_deref()
    }

    fn on_image(&mut self, event: &ImageEvent) {
        if self.image_source() != Some(event.source()) {
            return;
        }
        match event {
            ImageEvent::Loaded { sprite, .. } => {
                debug!(source = event.source(), "floating image ready");
                self.sprite = Some(Arc::clone(sprite));
                for particle in &mut self.particles {
                    if let CosmicKind::FloatingImage { sprite: slot, .. } = &mut particle.kind {
                        *slot = Some(Arc::clone(sprite));
                    }
                }
            }
            ImageEvent::Failed { reason, .. } => {
                warn!(source = event.source(), %reason, "keeping placeholder for floating image");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::Recorder;
    use rand::SeedableRng;

    fn mesh(image: Option<&str>) -> CosmicMesh {
        CosmicMesh::new(CosmicSettings {
            floating_image: image.map(str::to_string),
            ..CosmicSettings::default()
        })
    }

    fn count(mesh: &CosmicMesh, predicate: fn(&CosmicKind) -> bool) -> usize {
        mesh.particles().iter().filter(|p| predicate(&p.kind)).count()
    }

    #[test]
    fn test_population_on_1000_by_800() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut mesh = mesh(None);
        mesh.rebuild(Viewport::new(1000.0, 800.0), &mut rng);

        assert_eq!(mesh.population(), 32);
        assert_eq!(count(&mesh, |k| matches!(k, CosmicKind::Asteroid { .. })), 3);
        assert_eq!(count(&mesh, |k| matches!(k, CosmicKind::Star)), 29);
    }

    #[test]
    fn test_floating_image_takes_a_star_slot() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut mesh = mesh(Some("logo.png"));
        mesh.rebuild(Viewport::new(1000.0, 800.0), &mut rng);

        assert_eq!(mesh.population(), 32);
        assert_eq!(count(&mesh, |k| matches!(k, CosmicKind::Asteroid { .. })), 3);
        assert_eq!(count(&mesh, |k| matches!(k, CosmicKind::Star)), 28);
        let image = &mesh.particles()[0];
        assert!(image.kind.is_ambient());
        assert_eq!(image.position, Vec2::new(500.0, 400.0));
        assert_eq!(image.radius, 45.0);
    }

    #[test]
    fn test_size_and_opacity_follow_depth() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut mesh = mesh(None);
        mesh.rebuild(Viewport::new(1600.0, 1200.0), &mut rng);

        let mut stars: Vec<_> = mesh
            .particles()
            .iter()
            .filter(|p| p.kind == CosmicKind::Star)
            .collect();
        stars.sort_by(|a, b| a.depth.total_cmp(&b.depth));
        for pair in stars.windows(2) {
            assert!(pair[1].radius >= pair[0].radius);
            assert!(pair[1].opacity >= pair[0].opacity);
        }
    }

    #[test]
    fn test_bounce_flips_once_per_contact() {
        let viewport = Viewport::new(100.0, 100.0);
        let mut rng = StdRng::seed_from_u64(3);
        let mut mesh = mesh(None);
        mesh.particles = vec![Particle {
            position: Vec2::new(98.0, 50.0),
            depth: 1.0,
            velocity: Vec2::new(1.0, 0.0),
            radius: 1.5,
            opacity: 1.0,
            kind: CosmicKind::Star,
        }];

        let mut flips = 0;
        let mut heading = 1.0_f32;
        for _ in 0..10 {
            mesh.step(viewport, &mut rng);
            let particle = &mesh.particles()[0];
            if particle.velocity.x.signum() != heading {
                flips += 1;
                heading = particle.velocity.x.signum();
            }
            assert!(particle.position.x <= viewport.width + 1.0);
        }
        assert_eq!(flips, 1);
        assert!(mesh.particles()[0].velocity.x < 0.0);
    }

    #[test]
    fn test_particles_stay_near_viewport() {
        let viewport = Viewport::new(300.0, 200.0);
        let mut rng = StdRng::seed_from_u64(9);
        let mut mesh = mesh(None);
        mesh.rebuild(viewport, &mut rng);
        for _ in 0..2000 {
            mesh.step(viewport, &mut rng);
        }
        for particle in mesh.particles() {
            let reach = particle.radius + particle.velocity.abs().max_element();
            assert!(particle.position.x >= -reach && particle.position.x <= viewport.width + reach);
            assert!(particle.position.y >= -reach && particle.position.y <= viewport.height + reach);
        }
    }

    #[test]
    fn test_image_replaces_placeholder() {
        let viewport = Viewport::new(400.0, 400.0);
        let mut rng = StdRng::seed_from_u64(2);
        let mut mesh = mesh(Some("logo.png"));
        mesh.rebuild(viewport, &mut rng);

        let mut recorder = Recorder::new(viewport);
        mesh.draw(&mut recorder, viewport);
        assert_eq!(recorder.images().count(), 0);

        let sprite = Arc::new(Sprite::from_rgba(1, 1, vec![[255, 0, 0, 255]]).unwrap());
        mesh.on_image(&ImageEvent::Loaded {
            source: "other.png".to_string(),
            sprite: Arc::clone(&sprite),
        });
        recorder.reset();
        mesh.draw(&mut recorder, viewport);
        assert_eq!(recorder.images().count(), 0);

        mesh.on_image(&ImageEvent::Loaded {
            source: "logo.png".to_string(),
            sprite,
        });
        recorder.reset();
        mesh.draw(&mut recorder, viewport);
        assert_eq!(recorder.image_origins(), vec![Vec2::new(200.0, 200.0)]);

        mesh.rebuild(viewport, &mut rng);
        recorder.reset();
        mesh.draw(&mut recorder, viewport);
        assert_eq!(recorder.images().count(), 1);
    }

    #[test]
    fn test_failed_image_keeps_placeholder() {
        let viewport = Viewport::new(400.0, 400.0);
        let mut rng = StdRng::seed_from_u64(2);
        let mut mesh = mesh(Some("missing.png"));
        mesh.rebuild(viewport, &mut rng);
        mesh.on_image(&ImageEvent::Failed {
            source: "missing.png".to_string(),
            reason: "not found".to_string(),
        });
        mesh.step(viewport, &mut rng);

        let mut recorder = Recorder::new(viewport);
        mesh.draw(&mut recorder, viewport);
        assert_eq!(recorder.clears(), 1);
        assert_eq!(recorder.images().count(), 0);
        assert_eq!(recorder.fills().count(), mesh.population());
    }
}
