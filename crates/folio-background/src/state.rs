//! Background animation state for the terminal.

use ratatui::{
    Frame,
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
};
use tracing::debug;

use crate::driver::{FrameDriver, Tick};
use crate::effect::{EffectSettings, build};
use crate::surface::PixelCanvas;
use folio_core::EffectKind;

/// Upper half block: foreground paints the top pixel, background the bottom.
const HALF_BLOCK: &str = "▀";

/// Background animation state.
pub struct BackgroundState {
    /// Driver for the current effect, `None` for [`EffectKind::None`].
    driver: Option<FrameDriver>,
    /// Pixels the effect draws on, two per terminal cell.
    canvas: PixelCanvas,
    kind: EffectKind,
    settings: EffectSettings,
    seed: Option<u64>,
    paused: bool,
    /// Last known terminal width.
    last_width: u16,
    /// Last known terminal height.
    last_height: u16,
    /// The canvas holds a drawn frame for the current size and effect.
    has_frame: bool,
}

impl BackgroundState {
    /// Create a new background state. `pixel_scale` is logical units per
    /// pixel; a seed makes every field reproducible.
    pub fn new(
        kind: EffectKind,
        settings: EffectSettings,
        pixel_scale: f32,
        seed: Option<u64>,
    ) -> Self {
        let mut state = Self {
            driver: None,
            canvas: PixelCanvas::new(0, 0, pixel_scale),
            kind,
            settings,
            seed,
            paused: false,
            last_width: 0,
            last_height: 0,
            has_frame: false,
        };
        state.restart();
        state
    }

    pub fn kind(&self) -> EffectKind {
        self.kind
    }

    pub fn settings(&self) -> &EffectSettings {
        &self.settings
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Switch to another effect.
    pub fn set_effect(&mut self, kind: EffectKind) {
        if kind != self.kind {
            self.kind = kind;
            self.restart();
        }
    }

    /// Replace the settings. The running effect only starts over when its
    /// own settings changed.
    pub fn set_settings(&mut self, settings: EffectSettings) {
        let changed = match self.kind {
            EffectKind::None => false,
            EffectKind::CosmicMesh => settings.cosmic != self.settings.cosmic,
            EffectKind::SnowMesh => settings.snow != self.settings.snow,
            EffectKind::Flurry => settings.flurry != self.settings.flurry,
        };
        self.settings = settings;
        if changed {
            self.restart();
        }
    }

    /// Fresh field, same effect and size.
    pub fn regenerate(&mut self) {
        if let Some(driver) = &mut self.driver {
            driver.regenerate();
        }
        self.has_frame = false;
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
        if let Some(driver) = &mut self.driver {
            driver.set_paused(self.paused);
        }
    }

    /// Cancel the running driver and build one for the current effect.
    fn restart(&mut self) {
        if let Some(old) = self.driver.take() {
            old.cancel();
        }
        self.driver = build(self.kind, &self.settings).map(|effect| {
            let mut driver = FrameDriver::new(effect, self.seed);
            driver.set_paused(self.paused);
            driver
        });
        self.has_frame = false;
        debug!(effect = self.kind.name(), "background restarted");
    }

    /// Render the background to the frame.
    ///
    /// With `advance` false the last drawn frame is shown again without
    /// ticking the effect. A terminal resize always ticks.
    pub fn render(&mut self, frame: &mut Frame, advance: bool) {
        let Some(driver) = &mut self.driver else {
            return;
        };
        let area = frame.area();
        let (width, height) = (area.width, area.height);

        let resized = width != self.last_width || height != self.last_height;
        if resized {
            self.canvas
                .resize(usize::from(width), usize::from(height) * 2);
            self.last_width = width;
            self.last_height = height;
            self.has_frame = false;
        }

        if advance || !self.has_frame {
            self.has_frame = driver.tick(Some(&mut self.canvas)) == Tick::Drawn;
        }
        if self.has_frame {
            frame.render_widget(Paragraph::new(half_block_lines(&self.canvas)), area);
        }
    }
}

/// Pair canvas rows into half block cells.
pub fn half_block_lines(canvas: &PixelCanvas) -> Vec<Line<'static>> {
    let rows: Vec<&[[u8; 3]]> = canvas.rows().collect();
    rows.chunks(2)
        .map(|pair| {
            let upper = pair[0];
            let lower = pair.get(1).copied().unwrap_or(upper);
            let spans: Vec<Span> = upper
                .iter()
                .zip(lower)
                .map(|(top, bottom)| {
                    let style = Style::new()
                        .fg(Color::Rgb(top[0], top[1], top[2]))
                        .bg(Color::Rgb(bottom[0], bottom[1], bottom[2]));
                    Span::styled(HALF_BLOCK, style)
                })
                .collect();
            Line::from(spans)
        })
        .collect()
}
