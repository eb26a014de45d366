//! Colour types and conversions for the particle fields.

use ratatui::style::Color;

/// An sRGB colour with straight (non-premultiplied) alpha.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Opacity, 0.0-1.0.
    pub a: f32,
}

impl Rgba {
    /// Opaque white.
    pub const WHITE: Self = Self::new(255, 255, 255, 1.0);

    /// Create a colour. Alpha is clamped to 0.0-1.0.
    pub const fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
        let a = if a < 0.0 {
            0.0
        } else if a > 1.0 {
            1.0
        } else {
            a
        };
        Self { r, g, b, a }
    }

    /// Same colour, different alpha.
    pub const fn with_alpha(self, a: f32) -> Self {
        Self::new(self.r, self.g, self.b, a)
    }

    /// Same colour with alpha multiplied by `factor`.
    pub const fn fade(self, factor: f32) -> Self {
        self.with_alpha(self.a * factor)
    }

    /// Parse `#RRGGBB` or `#RGB` (the `#` is optional).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim().trim_start_matches('#');
        if !hex.is_ascii() {
            return None;
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).ok();
        match hex.len() {
            6 => Some(Self::new(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
                1.0,
            )),
            3 => {
                let short = |i: usize| channel(&hex[i..=i]).map(|v| v * 17);
                Some(Self::new(short(0)?, short(1)?, short(2)?, 1.0))
            }
            _ => None,
        }
    }

    /// Linear interpolation between two colours, alpha included.
    pub fn lerp(self, other: Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        let channel = |a: u8, b: u8| (f32::from(a) + (f32::from(b) - f32::from(a)) * t).round() as u8;
        Self::new(
            channel(self.r, other.r),
            channel(self.g, other.g),
            channel(self.b, other.b),
            self.a + (other.a - self.a) * t,
        )
    }

    /// Composite this colour over an opaque pixel.
    pub fn blend_over(self, dst: [u8; 3]) -> [u8; 3] {
        let mix = |s: u8, d: u8| {
            (f32::from(s) * self.a + f32::from(d) * (1.0 - self.a)).round() as u8
        };
        [mix(self.r, dst[0]), mix(self.g, dst[1]), mix(self.b, dst[2])]
    }
}

impl From<Rgba> for Color {
    fn from(c: Rgba) -> Self {
        Color::Rgb(c.r, c.g, c.b)
    }
}

/// Convert HSL (hue in degrees, saturation and lightness 0.0-1.0) to a colour.
pub fn hsl_to_rgb(h: f32, s: f32, l: f32, alpha: f32) -> Rgba {
    let s = s.clamp(0.0, 1.0);
    let l = l.clamp(0.0, 1.0);
    if s == 0.0 {
        let v = (l * 255.0) as u8;
        return Rgba::new(v, v, v, alpha);
    }

    let q = if l < 0.5 {
        l * (1.0 + s)
    } else {
        l + s - l * s
    };
    let p = 2.0 * l - q;

    let h = h.rem_euclid(360.0) / 360.0;

    let r = hue_to_rgb(p, q, h + 1.0 / 3.0);
    let g = hue_to_rgb(p, q, h);
    let b = hue_to_rgb(p, q, h - 1.0 / 3.0);

    Rgba::new(
        (r * 255.0) as u8,
        (g * 255.0) as u8,
        (b * 255.0) as u8,
        alpha,
    )
}

fn hue_to_rgb(p: f32, q: f32, mut t: f32) -> f32 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }

    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 1.0 / 2.0 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}
