//! Colour themes for the profile card.

use ratatui::style::Color;
use serde::{Deserialize, Serialize};

/// Foreground colour of the profile card text.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorTheme {
    /// Soft violet matching the cosmic accent.
    #[default]
    Violet,
    /// Icy blue.
    Ice,
    /// Terminal green.
    Green,
    /// Warm amber.
    Amber,
    /// Plain white.
    White,
}

impl ColorTheme {
    /// The colour to draw text with.
    pub fn color(self) -> Color {
        match self {
            Self::Violet => Color::Rgb(153, 138, 230),
            Self::Ice => Color::Rgb(173, 216, 230),
            Self::Green => Color::Rgb(80, 220, 120),
            Self::Amber => Color::Rgb(255, 191, 0),
            Self::White => Color::Rgb(240, 240, 240),
        }
    }

    /// Cycle to the next theme.
    pub fn next(self) -> Self {
        match self {
            Self::Violet => Self::Ice,
            Self::Ice => Self::Green,
            Self::Green => Self::Amber,
            Self::Amber => Self::White,
            Self::White => Self::Violet,
        }
    }
}
