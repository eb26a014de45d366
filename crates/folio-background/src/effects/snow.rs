//! Ice-age snowfall: snowflakes, ice crystals and frost over a growing pile.

use glam::Vec2;
use rand::{Rng, rngs::StdRng};
use tracing::debug;

use crate::color::Rgba;
use crate::effect::Effect;
use crate::particle::{DepthRamp, Drift, Particle, ParticleKind, Spin};
use crate::pile::SnowPile;
use crate::population::{particle_count, split};
use crate::proximity::{LinkStyle, draw_links, links};
use crate::shapes;
use crate::surface::{LinearGradient, Path, Rect, Surface};
use folio_core::{EffectKind, SnowSettings, Viewport};

const SNOWFLAKE: Rgba = Rgba::new(255, 255, 255, 1.0);
const ICE: Rgba = Rgba::new(173, 216, 230, 1.0);
const FROST: Rgba = Rgba::new(240, 248, 255, 1.0);
const SKY: Rgba = Rgba::new(135, 206, 235, 1.0);
const MIDNIGHT: Rgba = Rgba::new(25, 25, 112, 1.0);

/// Share of the wind strength a drift swing reaches.
const DRIFT_SHARE: f32 = 0.5;

const LINKS: LinkStyle = LinkStyle {
    divisor: 8.0,
    min_coeff: 0.4,
    max_coeff: 0.6,
    dampening: 0.1,
    cutoff: 0.01,
    width: 0.15,
    color: SKY.with_alpha(0.15),
};

/// Variants of the snow field.
#[derive(Debug, Clone, PartialEq)]
pub enum SnowKind {
    /// Six spokes with branches, stroked from the centre.
    Snowflake {
        spin: Spin,
        drift: Drift,
        spokes: Vec<Vec2>,
    },
    /// A filled, outlined polygon.
    IceCrystal {
        spin: Spin,
        drift: Drift,
        outline: Vec<Vec2>,
    },
    /// A tiny glowing dot. Ambient.
    Frost { drift: Drift },
}

impl SnowKind {
    fn flavor(&self) -> Flavor {
        match self {
            SnowKind::Snowflake { .. } => Flavor::Snowflake,
            SnowKind::IceCrystal { .. } => Flavor::IceCrystal,
            SnowKind::Frost { .. } => Flavor::Frost,
        }
    }

    fn drift_mut(&mut self) -> &mut Drift {
        match self {
            SnowKind::Snowflake { drift, .. }
            | SnowKind::IceCrystal { drift, .. }
            | SnowKind::Frost { drift } => drift,
        }
    }

    fn spin_mut(&mut self) -> Option<&mut Spin> {
        match self {
            SnowKind::Snowflake { spin, .. } | SnowKind::IceCrystal { spin, .. } => Some(spin),
            SnowKind::Frost { .. } => None,
        }
    }
}

impl ParticleKind for SnowKind {
    fn is_ambient(&self) -> bool {
        matches!(self, SnowKind::Frost { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flavor {
    Snowflake,
    IceCrystal,
    Frost,
}

/// Creation constants for one flavor.
struct Profile {
    perspective: DepthRamp,
    base_radius: f32,
    opacity: DepthRamp,
    /// Horizontal speed as a share of the wind.
    wind_share: f32,
    /// Fall speed multiplier is `fall.floor + r * fall.span`.
    fall: DepthRamp,
    max_spin: f32,
    drift: DepthRamp,
}

impl Flavor {
    const fn profile(self) -> Profile {
        match self {
            Flavor::Snowflake => Profile {
                perspective: DepthRamp::new(0.3, 0.7),
                base_radius: 1.5,
                opacity: DepthRamp::new(0.4, 0.6),
                wind_share: 0.5,
                fall: DepthRamp::new(0.5, 0.5),
                max_spin: 0.02,
                drift: DepthRamp::new(0.005, 0.01),
            },
            Flavor::IceCrystal => Profile {
                perspective: DepthRamp::new(0.2, 0.8),
                base_radius: 3.0,
                opacity: DepthRamp::new(0.3, 0.5),
                wind_share: 0.3,
                fall: DepthRamp::new(0.3, 0.4),
                max_spin: 0.01,
                drift: DepthRamp::new(0.003, 0.007),
            },
            Flavor::Frost => Profile {
                perspective: DepthRamp::new(0.4, 0.6),
                base_radius: 0.8,
                opacity: DepthRamp::new(0.2, 0.4),
                wind_share: 0.2,
                fall: DepthRamp::new(0.2, 0.3),
                max_spin: 0.0,
                drift: DepthRamp::new(0.002, 0.005),
            },
        }
    }
}

/// Where a new particle starts vertically.
#[derive(Debug, Clone, Copy)]
enum Entry {
    Anywhere,
    AboveTop,
}

/// The snow mesh.
#[derive(Debug)]
pub struct SnowMesh {
    settings: SnowSettings,
    particles: Vec<Particle<SnowKind>>,
    pile: SnowPile,
}

impl SnowMesh {
    pub fn new(settings: SnowSettings) -> Self {
        let pile = SnowPile::new(0.0, settings.max_pile_height);
        Self {
            settings,
            particles: Vec::new(),
            pile,
        }
    }

    pub fn particles(&self) -> &[Particle<SnowKind>] {
        &self.particles
    }

    pub fn pile(&self) -> &SnowPile {
        &self.pile
    }

    fn spawn(
        settings: &SnowSettings,
        flavor: Flavor,
        entry: Entry,
        viewport: Viewport,
        rng: &mut StdRng,
    ) -> Particle<SnowKind> {
        let profile = flavor.profile();
        let base_fall_speed = settings.intensity.preset().base_fall_speed;
        let wind = settings.wind_strength;

        let depth = rng.gen_range(0.0..1.0);
        let perspective = profile.perspective.at(depth);
        let radius = profile.base_radius * perspective;

        let x = rng.gen_range(0.0..=viewport.width);
        let y = match entry {
            Entry::Anywhere => rng.gen_range(0.0..=viewport.height),
            Entry::AboveTop => -radius,
        };
        let velocity = Vec2::new(
            (rng.gen_range(0.0..1.0) - 0.5) * wind * profile.wind_share,
            base_fall_speed * perspective * profile.fall.at(rng.gen_range(0.0..1.0)),
        );
        let kind = match flavor {
            Flavor::Snowflake => SnowKind::Snowflake {
                spin: Spin::random(rng, profile.max_spin),
                drift: Drift::random(rng, profile.drift.floor, profile.drift.span),
                spokes: shapes::snowflake(rng, radius),
            },
            Flavor::IceCrystal => SnowKind::IceCrystal {
                spin: Spin::random(rng, profile.max_spin),
                drift: Drift::random(rng, profile.drift.floor, profile.drift.span),
                outline: shapes::ice_crystal(rng, radius),
            },
            Flavor::Frost => SnowKind::Frost {
                drift: Drift::random(rng, profile.drift.floor, profile.drift.span),
            },
        };

        Particle {
            position: Vec2::new(x, y),
            depth,
            velocity,
            radius,
            opacity: profile.opacity.at(depth),
            kind,
        }
    }

    fn draw_particle(surface: &mut dyn Surface, particle: &Particle<SnowKind>) {
        match &particle.kind {
            SnowKind::Snowflake { spin, spokes, .. } => {
                let mut path = Path::new();
                for spoke in spokes {
                    path.move_to(Vec2::ZERO).line_to(*spoke);
                }
                surface.save();
                surface.translate(particle.position);
                surface.rotate(spin.rotation);
                surface.stroke_path(&path, SNOWFLAKE.fade(particle.opacity), 0.5);
                surface.restore();
            }
            SnowKind::IceCrystal { spin, outline, .. } => {
                let path = Path::polygon(outline);
                surface.save();
                surface.translate(particle.position);
                surface.rotate(spin.rotation);
                surface.fill_path(&path, &ICE.fade(particle.opacity * 0.8).into());
                surface.stroke_path(&path, ICE.fade(particle.opacity * 1.2 * 0.8), 0.3);
                surface.restore();
            }
            SnowKind::Frost { .. } => {
                let color = FROST.fade(particle.opacity * 0.6);
                let glow = Path::circle(particle.position, particle.radius * 2.0);
                surface.fill_path(&glow, &color.fade(0.25).into());
                let core = Path::circle(particle.position, particle.radius);
                surface.fill_path(&core, &color.into());
            }
        }
    }
}

impl Effect for SnowMesh {
    fn kind(&self) -> EffectKind {
        EffectKind::SnowMesh
    }

    fn rebuild(&mut self, viewport: Viewport, rng: &mut StdRng) {
        let preset = self.settings.intensity.preset();
        let total = particle_count(viewport, preset.density_divisor, self.settings.min_particles);
        let counts = split(total, &[preset.snowflake_ratio, preset.ice_crystal_ratio]);

        self.pile = SnowPile::new(viewport.width, self.settings.max_pile_height);
        self.particles.clear();
        for (flavor, count) in [Flavor::Snowflake, Flavor::IceCrystal, Flavor::Frost]
            .into_iter()
            .zip(counts)
        {
            for _ in 0..count {
                let particle = Self::spawn(&self.settings, flavor, Entry::Anywhere, viewport, rng);
                self.particles.push(particle);
            }
        }
        debug!(
            particles = self.particles.len(),
            intensity = self.settings.intensity.name(),
            width = viewport.width,
            height = viewport.height,
            "rebuilt snow mesh"
        );
    }

    fn step(&mut self, viewport: Viewport, rng: &mut StdRng) {
        let wind = self.settings.wind_strength;
        for index in 0..self.particles.len() {
            let particle = &mut self.particles[index];
            let sway = particle.kind.drift_mut().advance() * wind * DRIFT_SHARE;
            particle.position.x += particle.velocity.x + sway;
            particle.position.y += particle.velocity.y;
            if let Some(spin) = particle.kind.spin_mut() {
                spin.advance();
            }

            let radius = particle.radius;
            if particle.position.x > viewport.width + radius {
                particle.position.x = -radius;
            } else if particle.position.x < -radius {
                particle.position.x = viewport.width + radius;
            }

            let floor = viewport.height - self.pile.height_at(particle.position.x);
            if particle.position.y + radius >= floor {
                let (x, flavor) = (particle.position.x, particle.kind.flavor());
                self.pile.accumulate(x, radius);
                self.particles[index] =
                    Self::spawn(&self.settings, flavor, Entry::AboveTop, viewport, rng);
            }
        }
    }

    fn draw(&self, surface: &mut dyn Surface, viewport: Viewport) {
        let haze = LinearGradient::new(Vec2::ZERO, Vec2::new(0.0, viewport.height))
            .with_stop(0.0, MIDNIGHT.with_alpha(0.02))
            .with_stop(1.0, SKY.with_alpha(0.01));
        surface.fill_rect(Rect::covering(viewport), &haze.into());

        draw_links(surface, &links(&self.particles, viewport, &LINKS), &LINKS);
        for particle in &self.particles {
            Self::draw_particle(surface, particle);
        }
        self.pile.draw(surface, viewport);
    }

    fn population(&self) -> usize {
        self.particles.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{DrawCommand, Paint, Recorder};
    use folio_core::Intensity;
    use rand::SeedableRng;

    fn mesh(intensity: Intensity) -> SnowMesh {
        SnowMesh::new(SnowSettings {
            intensity,
            ..SnowSettings::default()
        })
    }

    fn tally(mesh: &SnowMesh) -> [usize; 3] {
        let mut counts = [0; 3];
        for particle in mesh.particles() {
            counts[particle.kind.flavor() as usize] += 1;
        }
        counts
    }

    #[test]
    fn test_light_population_on_1200_by_600() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut mesh = mesh(Intensity::Light);
        mesh.rebuild(Viewport::new(1200.0, 600.0), &mut rng);

        assert_eq!(mesh.population(), 50);
        assert_eq!(tally(&mesh), [35, 10, 5]);
        assert_eq!(mesh.pile().heights().len(), 600);
    }

    #[test]
    fn test_heavy_population_scales_with_area() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut mesh = mesh(Intensity::Heavy);
        mesh.rebuild(Viewport::new(1200.0, 1000.0), &mut rng);

        assert_eq!(mesh.population(), 100);
        assert_eq!(tally(&mesh), [50, 30, 20]);
    }

    #[test]
    fn test_size_and_opacity_follow_depth() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut mesh = mesh(Intensity::Heavy);
        mesh.rebuild(Viewport::new(2000.0, 1500.0), &mut rng);

        for flavor in [Flavor::Snowflake, Flavor::IceCrystal, Flavor::Frost] {
            let mut same: Vec<_> = mesh
                .particles()
                .iter()
                .filter(|p| p.kind.flavor() == flavor)
                .collect();
            same.sort_by(|a, b| a.depth.total_cmp(&b.depth));
            for pair in same.windows(2) {
                assert!(pair[1].radius >= pair[0].radius);
                assert!(pair[1].opacity >= pair[0].opacity);
            }
        }
    }

    #[test]
    fn test_settled_particle_is_recycled_into_pile() {
        let viewport = Viewport::new(100.0, 100.0);
        let mut rng = StdRng::seed_from_u64(6);
        let mut mesh = SnowMesh::new(SnowSettings {
            wind_strength: 0.0,
            ..SnowSettings::default()
        });
        mesh.rebuild(viewport, &mut rng);
        mesh.particles.truncate(1);
        let particle = &mut mesh.particles[0];
        particle.position = Vec2::new(41.0, 99.0);
        particle.velocity = Vec2::new(0.0, 1.0);
        let (radius, flavor) = (particle.radius, particle.kind.flavor());

        mesh.step(viewport, &mut rng);

        assert_eq!(mesh.population(), 1);
        let replacement = &mesh.particles()[0];
        assert_eq!(replacement.kind.flavor(), flavor);
        assert!(replacement.position.y < 0.0);

        let heights = mesh.pile().heights();
        let increment = radius * 0.9;
        assert!((heights[20] - increment).abs() < 1e-5);
        assert!((heights[19] - increment * 0.3).abs() < 1e-5);
        assert!((heights[21] - increment * 0.9).abs() < 1e-5);
        assert_eq!(heights.iter().filter(|h| **h > 0.0).count(), 3);
    }

    #[test]
    fn test_pile_raises_the_floor() {
        let viewport = Viewport::new(100.0, 100.0);
        let mut rng = StdRng::seed_from_u64(6);
        let mut mesh = SnowMesh::new(SnowSettings {
            wind_strength: 0.0,
            ..SnowSettings::default()
        });
        mesh.rebuild(viewport, &mut rng);
        for _ in 0..20 {
            mesh.pile.accumulate(50.0, 10.0);
        }
        mesh.particles.truncate(1);
        mesh.particles[0].position = Vec2::new(50.0, 10.0);
        mesh.particles[0].velocity = Vec2::new(0.0, 1.0);

        mesh.step(viewport, &mut rng);
        assert!(mesh.particles()[0].position.y < 0.0);
    }

    #[test]
    fn test_horizontal_wrap() {
        let viewport = Viewport::new(100.0, 100.0);
        let mut rng = StdRng::seed_from_u64(6);
        let mut mesh = SnowMesh::new(SnowSettings {
            wind_strength: 0.0,
            ..SnowSettings::default()
        });
        mesh.rebuild(viewport, &mut rng);
        mesh.particles.truncate(1);
        let radius = mesh.particles[0].radius;
        mesh.particles[0].position = Vec2::new(100.0 + radius, 10.0);
        mesh.particles[0].velocity = Vec2::new(0.5, 0.0);

        mesh.step(viewport, &mut rng);
        assert_eq!(mesh.particles()[0].position.x, -radius);
    }

    #[test]
    fn test_rebuild_resets_pile_and_store() {
        let mut rng = StdRng::seed_from_u64(12);
        let mut mesh = mesh(Intensity::Medium);
        mesh.rebuild(Viewport::new(400.0, 300.0), &mut rng);
        for _ in 0..500 {
            mesh.step(Viewport::new(400.0, 300.0), &mut rng);
        }
        assert!(mesh.pile().heights().iter().any(|h| *h > 0.0));

        let smaller = Viewport::new(200.0, 150.0);
        mesh.rebuild(smaller, &mut rng);
        assert_eq!(mesh.population(), 50);
        assert_eq!(mesh.pile().heights().len(), 100);
        assert!(mesh.pile().heights().iter().all(|h| *h == 0.0));
        assert!(mesh.particles().iter().all(|p| {
            p.position.x <= smaller.width && p.position.y <= smaller.height
        }));
    }

    #[test]
    fn test_pile_never_exceeds_max() {
        let viewport = Viewport::new(60.0, 200.0);
        let mut rng = StdRng::seed_from_u64(13);
        let mut mesh = SnowMesh::new(SnowSettings {
            intensity: Intensity::Heavy,
            max_pile_height: 20.0,
            ..SnowSettings::default()
        });
        mesh.rebuild(viewport, &mut rng);
        for _ in 0..3000 {
            mesh.step(viewport, &mut rng);
        }
        assert!(mesh.pile().heights().iter().all(|h| (0.0..=20.0).contains(h)));
    }

    #[test]
    fn test_draw_fades_instead_of_clearing() {
        let viewport = Viewport::new(300.0, 200.0);
        let mut rng = StdRng::seed_from_u64(1);
        let mut mesh = mesh(Intensity::Light);
        mesh.rebuild(viewport, &mut rng);

        let mut recorder = Recorder::new(viewport);
        mesh.draw(&mut recorder, viewport);
        assert_eq!(recorder.clears(), 0);
        assert!(matches!(
            recorder.commands().first(),
            Some(DrawCommand::FillPath { paint: Paint::Linear(_), .. })
        ));
        assert!(matches!(
            recorder.commands().last(),
            Some(DrawCommand::StrokePath { .. })
        ));
    }
}
