//! Errors from reading and writing the config file.

use std::fmt;

/// Errors that can occur while loading or saving config.
#[derive(Debug)]
pub enum ConfigError {
    /// The platform has no discoverable config directory.
    NoConfigDir,
    /// Reading or writing the file failed.
    Io(std::io::Error),
    /// The file is not valid config TOML.
    Parse(toml::de::Error),
    /// The config could not be turned into TOML.
    Serialize(toml::ser::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NoConfigDir => write!(f, "Could not determine a config directory"),
            ConfigError::Io(e) => write!(f, "Config file IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Invalid config file: {}", e),
            ConfigError::Serialize(e) => write!(f, "Failed to serialize config: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
            ConfigError::Serialize(e) => Some(e),
            ConfigError::NoConfigDir => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError::Parse(e)
    }
}

impl From<toml::ser::Error> for ConfigError {
    fn from(e: toml::ser::Error) -> Self {
        ConfigError::Serialize(e)
    }
}
