mod card;
mod logging;
mod typewriter;

use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    DefaultTerminal, Frame,
    layout::{Constraint, Layout},
    style::Stylize,
    text::{Line, Span},
};
use tracing::info;

use folio_background::{BackgroundState, EffectSettings};
use folio_config::Config;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let config = Config::load()?;
    logging::init(&config.logging)?;

    let terminal = ratatui::init();
    let mut app = App::new(config.clone());
    let result = app.run(terminal);
    ratatui::restore();
    result?;

    if app.config != config {
        app.config.save()?;
        info!("saved settings changed during the session");
    }
    Ok(())
}

fn effect_settings(config: &Config) -> EffectSettings {
    EffectSettings {
        cosmic: config.cosmic.clone(),
        snow: config.snow.clone(),
        flurry: config.flurry.clone(),
    }
}

/// The main application which holds the state and logic of the application.
pub struct App {
    /// Is the application running?
    running: bool,
    /// Settings, including anything changed with keys.
    config: Config,
    /// The animated background.
    background: BackgroundState,
    /// When the card first appeared, for the typewriter.
    started: Instant,
    /// When the background last advanced.
    last_tick: Option<Instant>,
}

impl App {
    /// Construct a new instance of [`App`].
    pub fn new(config: Config) -> Self {
        let background = BackgroundState::new(
            config.effect,
            effect_settings(&config),
            config.pixel_scale,
            config.seed,
        );
        Self {
            running: false,
            config,
            background,
            started: Instant::now(),
            last_tick: None,
        }
    }

    /// Run the application's main loop.
    pub fn run(&mut self, mut terminal: DefaultTerminal) -> color_eyre::Result<()> {
        info!(effect = self.config.effect.name(), "starting");
        self.running = true;
        while self.running {
            terminal.draw(|frame| self.render(frame))?;
            self.handle_crossterm_events()?;
        }
        Ok(())
    }

    fn frame_interval(&self) -> Duration {
        Duration::from_millis(1000 / u64::from(self.config.frame_rate.max(1)))
    }

    /// Time left until the background should advance again.
    fn until_next_tick(&self, now: Instant) -> Duration {
        match self.last_tick {
            Some(last) => self
                .frame_interval()
                .saturating_sub(now.saturating_duration_since(last)),
            None => Duration::ZERO,
        }
    }

    /// Whether a frame interval has passed, recording the tick if so.
    fn take_tick(&mut self, now: Instant) -> bool {
        let due = self.until_next_tick(now).is_zero();
        if due {
            self.last_tick = Some(now);
        }
        due
    }

    /// Renders the user interface.
    fn render(&mut self, frame: &mut Frame) {
        let advance = self.take_tick(Instant::now());
        self.background.render(frame, advance);

        let color = self.config.color_theme.color();
        let [body, help_area] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(frame.area());

        let elapsed_ms = u64::try_from(self.started.elapsed().as_millis()).unwrap_or(u64::MAX);
        let title = typewriter::typed(&self.config.profile.titles, elapsed_ms);
        card::render(frame, body, &self.config.profile, title, color);

        let paused = if self.background.is_paused() {
            " resume  "
        } else {
            " pause  "
        };
        let help = Line::from(vec![
            "q".bold().fg(color),
            " quit  ".dark_gray(),
            "e".bold().fg(color),
            Span::raw(format!(" {}  ", self.config.effect.name())).dark_gray(),
            "i".bold().fg(color),
            Span::raw(format!(" {} snow  ", self.config.snow.intensity.name())).dark_gray(),
            "c".bold().fg(color),
            " color  ".dark_gray(),
            "r".bold().fg(color),
            " regenerate  ".dark_gray(),
            "p".bold().fg(color),
            paused.dark_gray(),
        ])
        .centered();
        frame.render_widget(help, help_area);
    }

    /// Reads the crossterm events and updates the state of [`App`].
    /// Polls until the next background frame is due, so key repeat redraws
    /// the card without speeding up the animation.
    fn handle_crossterm_events(&mut self) -> color_eyre::Result<()> {
        if event::poll(self.until_next_tick(Instant::now()))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => self.on_key_event(key),
                Event::Mouse(_) => {}
                // The background picks up the new size on its next frame.
                Event::Resize(_, _) => {}
                _ => {}
            }
        }
        Ok(())
    }

    /// Handles the key events and updates the state of [`App`].
    fn on_key_event(&mut self, key: KeyEvent) {
        match (key.modifiers, key.code) {
            (_, KeyCode::Esc | KeyCode::Char('q'))
            | (KeyModifiers::CONTROL, KeyCode::Char('c') | KeyCode::Char('C')) => self.quit(),
            (_, KeyCode::Char('e')) => self.cycle_effect(),
            (_, KeyCode::Char('i')) => self.cycle_intensity(),
            (_, KeyCode::Char('c')) => self.cycle_color_theme(),
            (_, KeyCode::Char('r')) => self.background.regenerate(),
            (_, KeyCode::Char('p')) => self.background.toggle_pause(),
            _ => {}
        }
    }

    /// Cycle through the background effects.
    fn cycle_effect(&mut self) {
        self.config.effect = self.config.effect.next();
        self.background.set_effect(self.config.effect);
    }

    /// Cycle through snow intensities.
    fn cycle_intensity(&mut self) {
        self.config.snow.intensity = self.config.snow.intensity.next();
        self.background.set_settings(effect_settings(&self.config));
    }

    /// Cycle through available color themes.
    fn cycle_color_theme(&mut self) {
        self.config.color_theme = self.config.color_theme.next();
    }

    /// Set running to false to quit the application.
    fn quit(&mut self) {
        self.running = false;
    }
}
