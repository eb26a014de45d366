//! Configuration file handling for folio.
//!
//! The config lives at `<config dir>/folio/config.toml` (override with
//! `FOLIO_CONFIG`). A missing file is not an error: every field falls back to
//! its default, so users only write the keys they care about.

mod error;
mod profile;

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use folio_core::{
    ColorTheme, CosmicSettings, EffectKind, FlurrySettings, MAX_PARTICLES, MIN_DENSITY_DIVISOR,
    SnowSettings,
};
use serde::{Deserialize, Serialize};

pub use error::ConfigError;
pub use profile::{Link, Profile};

/// Environment variable that points at an alternative config file.
pub const CONFIG_PATH_ENV: &str = "FOLIO_CONFIG";

const CONFIG_FILE_NAME: &str = "config.toml";
const LOG_FILE_NAME: &str = "folio.log";

/// Log verbosity, named after `tracing` levels.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Errors only.
    Error,
    /// Warnings and errors.
    #[default]
    Warn,
    /// Informational.
    Info,
    /// Debugging.
    Debug,
    /// Everything.
    Trace,
    /// No log file at all.
    Off,
}

impl LogLevel {
    /// The `EnvFilter` directive for this level.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
            Self::Off => "off",
        }
    }
}

/// Where and how much to log.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Logging {
    /// Maximum level written to the log file.
    pub level: LogLevel,
    /// Log file location. Defaults to the platform data directory.
    pub path: Option<PathBuf>,
}

impl Logging {
    /// The configured log path, or the platform default.
    pub fn resolved_path(&self) -> Option<PathBuf> {
        self.path.clone().or_else(default_log_path)
    }
}

/// Everything a user can configure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Background effect behind the profile card.
    pub effect: EffectKind,
    /// Profile card text colour.
    pub color_theme: ColorTheme,
    /// Target frames per second.
    pub frame_rate: u32,
    /// Logical background pixels per rendered pixel.
    pub pixel_scale: f32,
    /// Fixed random seed, for reproducible fields.
    pub seed: Option<u64>,
    /// Profile card contents.
    pub profile: Profile,
    /// Cosmic mesh settings.
    pub cosmic: CosmicSettings,
    /// Snow mesh settings.
    pub snow: SnowSettings,
    /// Flurry settings.
    pub flurry: FlurrySettings,
    /// Log file settings.
    pub logging: Logging,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            effect: EffectKind::default(),
            color_theme: ColorTheme::default(),
            frame_rate: 30,
            pixel_scale: 4.0,
            seed: None,
            profile: Profile::default(),
            cosmic: CosmicSettings::default(),
            snow: SnowSettings::default(),
            flurry: FlurrySettings::default(),
            logging: Logging::default(),
        }
    }
}

impl Config {
    /// Load the config from its default location, falling back to defaults
    /// when no file exists yet.
    pub fn load() -> Result<Self, ConfigError> {
        let path = config_path().ok_or(ConfigError::NoConfigDir)?;
        Self::load_from(&path)
    }

    /// Load the config from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse config from TOML text.
    pub fn parse(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)?;
        Ok(config.sanitised())
    }

    /// Save the config to its default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = config_path().ok_or(ConfigError::NoConfigDir)?;
        self.save_to(&path)
    }

    /// Save the config to an explicit path, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Clamp values that would otherwise stall or blow up the renderer.
    fn sanitised(mut self) -> Self {
        self.frame_rate = self.frame_rate.clamp(1, 120);
        if !(self.pixel_scale.is_finite() && self.pixel_scale > 0.0) {
            self.pixel_scale = Self::default().pixel_scale;
        }
        self.snow.wind_strength = self.snow.wind_strength.clamp(0.0, 1.0);
        self.cosmic.asteroid_ratio = self.cosmic.asteroid_ratio.clamp(0.0, 1.0);
        self.cosmic.density_divisor = self.cosmic.density_divisor.max(MIN_DENSITY_DIVISOR);
        self.cosmic.min_particles = self.cosmic.min_particles.min(MAX_PARTICLES);
        self.snow.min_particles = self.snow.min_particles.min(MAX_PARTICLES);
        self.flurry.density = self.flurry.density.min(MAX_PARTICLES);
        if self.flurry.max_size < self.flurry.min_size {
            std::mem::swap(&mut self.flurry.min_size, &mut self.flurry.max_size);
        }
        if self.flurry.max_speed < self.flurry.min_speed {
            std::mem::swap(&mut self.flurry.min_speed, &mut self.flurry.max_speed);
        }
        self
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "folio")
}

/// Path of the config file: `FOLIO_CONFIG` if set, else the platform default.
pub fn config_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os(CONFIG_PATH_ENV) {
        return Some(PathBuf::from(path));
    }
    project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

/// Default log file location.
pub fn default_log_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.data_local_dir().join(LOG_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use folio_core::{FlakeShape, Intensity};

    use super::*;

    #[test]
    fn test_empty_file_gives_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_config() {
        let config = Config::parse(
            r#"
            effect = "snow-mesh"
            frame_rate = 60

            [snow]
            intensity = "heavy"

            [profile]
            name = "Ada"
            "#,
        )
        .unwrap();
        assert_eq!(config.effect, EffectKind::SnowMesh);
        assert_eq!(config.frame_rate, 60);
        assert_eq!(config.snow.intensity, Intensity::Heavy);
        assert_eq!(config.profile.name, "Ada");
        assert!(!config.profile.titles.is_empty());
        assert_eq!(config.cosmic, CosmicSettings::default());
    }

    #[test]
    fn test_out_of_range_values_are_clamped() {
        let config = Config::parse(
            r#"
            frame_rate = 0
            pixel_scale = -2.0

            [snow]
            wind_strength = 4.0

            [flurry]
            min_size = 8.0
            max_size = 1.0
            "#,
        )
        .unwrap();
        assert_eq!(config.frame_rate, 1);
        assert_eq!(config.pixel_scale, 4.0);
        assert_eq!(config.snow.wind_strength, 1.0);
        assert_eq!(config.flurry.min_size, 1.0);
        assert_eq!(config.flurry.max_size, 8.0);
    }

    #[test]
    fn test_populations_are_bounded() {
        let config = Config::parse(
            r#"
            [cosmic]
            density_divisor = 0.000001
            min_particles = 1000000000

            [snow]
            min_particles = 1000000000

            [flurry]
            density = 1000000000
            "#,
        )
        .unwrap();
        assert_eq!(config.cosmic.density_divisor, MIN_DENSITY_DIVISOR);
        assert_eq!(config.cosmic.min_particles, MAX_PARTICLES);
        assert_eq!(config.snow.min_particles, MAX_PARTICLES);
        assert_eq!(config.flurry.density, MAX_PARTICLES);
    }

    #[test]
    fn test_invalid_toml_is_a_parse_error() {
        let error = Config::parse("effect = [").unwrap_err();
        assert!(matches!(error, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE_NAME);

        let mut config = Config::default();
        config.effect = EffectKind::Flurry;
        config.seed = Some(7);
        config.flurry.shapes = vec![FlakeShape::Star];
        config.cosmic.floating_image = Some("portrait.png".into());
        config.logging.level = LogLevel::Debug;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }
}
