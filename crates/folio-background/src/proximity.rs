//! Faint lines between nearby particles.

use glam::Vec2;

use crate::color::Rgba;
use crate::particle::{Particle, ParticleKind};
use crate::surface::{Path, Surface};
use folio_core::Viewport;

/// How a field links its particles.
///
/// Two particles link when closer than
/// `shorter_side / divisor * (min_coeff + max_coeff * average_depth)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinkStyle {
    pub divisor: f32,
    pub min_coeff: f32,
    pub max_coeff: f32,
    /// Final multiplier on link opacity.
    pub dampening: f32,
    /// Links at or below this opacity are skipped.
    pub cutoff: f32,
    /// Stroke width.
    pub width: f32,
    /// Stroke colour; its alpha is scaled by each link's opacity.
    pub color: Rgba,
}

/// A line to draw between two particles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Link {
    pub from: Vec2,
    pub to: Vec2,
    pub opacity: f32,
}

/// Every visible link, checking all non-ambient pairs.
pub fn links<K: ParticleKind>(
    particles: &[Particle<K>],
    viewport: Viewport,
    style: &LinkStyle,
) -> Vec<Link> {
    let mut found = Vec::new();
    if viewport.is_empty() || style.divisor <= 0.0 {
        return found;
    }
    let base = viewport.shorter_side() / style.divisor;

    for (i, a) in particles.iter().enumerate() {
        if a.kind.is_ambient() {
            continue;
        }
        for b in &particles[i + 1..] {
            if b.kind.is_ambient() {
                continue;
            }
            let threshold = base * (style.min_coeff + style.max_coeff * (a.depth + b.depth) / 2.0);
            let distance = a.distance(b);
            if distance >= threshold {
                continue;
            }
            let falloff = (1.0 - distance / threshold).max(0.0);
            let opacity = falloff * (a.opacity + b.opacity) / 2.0 * style.dampening;
            if opacity > style.cutoff {
                found.push(Link {
                    from: a.position,
                    to: b.position,
                    opacity,
                });
            }
        }
    }
    found
}

/// Stroke links one by one in `style.color`.
pub fn draw_links(surface: &mut dyn Surface, links: &[Link], style: &LinkStyle) {
    for link in links {
        let mut path = Path::new();
        path.move_to(link.from).line_to(link.to);
        surface.stroke_path(&path, style.color.fade(link.opacity), style.width);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::Recorder;

    #[derive(Debug, Clone, PartialEq)]
    enum Dot {
        Solid,
        Ambient,
    }

    impl ParticleKind for Dot {
        fn is_ambient(&self) -> bool {
            *self == Dot::Ambient
        }
    }

    const STYLE: LinkStyle = LinkStyle {
        divisor: 7.0,
        min_coeff: 0.5,
        max_coeff: 0.5,
        dampening: 0.08,
        cutoff: 0.005,
        width: 0.2,
        color: Rgba::WHITE,
    };

    fn dot(x: f32, y: f32, kind: Dot) -> Particle<Dot> {
        Particle {
            position: Vec2::new(x, y),
            depth: 1.0,
            velocity: Vec2::ZERO,
            radius: 1.0,
            opacity: 1.0,
            kind,
        }
    }

    #[test]
    fn test_close_pair_links() {
        // shorter side 700 -> base 100, depth 1.0 -> threshold 100
        let viewport = Viewport::new(700.0, 700.0);
        let particles = [dot(0.0, 0.0, Dot::Solid), dot(50.0, 0.0, Dot::Solid)];
        let found = links(&particles, viewport, &STYLE);

        assert_eq!(found.len(), 1);
        assert!((found[0].opacity - 0.04).abs() < 1e-6);
    }

    #[test]
    fn test_far_pair_does_not_link() {
        let viewport = Viewport::new(700.0, 700.0);
        let particles = [dot(0.0, 0.0, Dot::Solid), dot(100.0, 0.0, Dot::Solid)];
        assert!(links(&particles, viewport, &STYLE).is_empty());
    }

    #[test]
    fn test_ambient_never_links() {
        let viewport = Viewport::new(700.0, 700.0);
        let particles = [
            dot(0.0, 0.0, Dot::Ambient),
            dot(1.0, 0.0, Dot::Solid),
            dot(2.0, 0.0, Dot::Ambient),
        ];
        assert!(links(&particles, viewport, &STYLE).is_empty());
    }

    #[test]
    fn test_faint_links_are_cut() {
        // 95 of 100 -> falloff 0.05 -> opacity 0.004, under the cutoff
        let viewport = Viewport::new(700.0, 700.0);
        let particles = [dot(0.0, 0.0, Dot::Solid), dot(95.0, 0.0, Dot::Solid)];
        assert!(links(&particles, viewport, &STYLE).is_empty());
    }

    #[test]
    fn test_draw_scales_alpha() {
        let viewport = Viewport::new(700.0, 700.0);
        let mut recorder = Recorder::new(viewport);
        let link = Link {
            from: Vec2::ZERO,
            to: Vec2::ONE,
            opacity: 0.5,
        };
        draw_links(&mut recorder, &[link], &STYLE);

        let (_, color, width) = recorder.strokes().next().unwrap();
        assert_eq!(color.a, 0.5);
        assert_eq!(width, 0.2);
    }
}
