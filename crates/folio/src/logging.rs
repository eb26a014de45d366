//! Log file setup.
//!
//! The terminal belongs to the UI, so logs only ever go to a file.

use std::fs;

use tracing_subscriber::{
    EnvFilter, Layer as _, filter::LevelFilter, layer::SubscriberExt as _,
    util::SubscriberInitExt as _,
};

use folio_config::{LogLevel, Logging};

/// Environment variable holding filter directives that replace the
/// configured level, e.g. `FOLIO_LOG=folio_background=trace`.
pub const LOG_ENV: &str = "FOLIO_LOG";

/// Targets the configured level applies to.
const TARGETS: [&str; 4] = ["folio", "folio_background", "folio_config", "folio_core"];

/// Filter for the configured level, or for explicit directives.
fn filter(level: LogLevel, directives: Option<&str>) -> color_eyre::Result<EnvFilter> {
    if let Some(directives) = directives {
        return Ok(EnvFilter::builder()
            .with_default_directive(LevelFilter::ERROR.into())
            .parse_lossy(directives));
    }
    let mut filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::OFF.into())
        .parse_lossy("");
    for target in TARGETS {
        filter = filter.add_directive(format!("{target}={}", level.as_str()).parse()?);
    }
    Ok(filter)
}

/// Start logging to the configured file. Returns whether logging is on.
pub fn init(logging: &Logging) -> color_eyre::Result<bool> {
    let directives = std::env::var(LOG_ENV).ok();
    if logging.level == LogLevel::Off && directives.is_none() {
        return Ok(false);
    }
    let Some(path) = logging.resolved_path() else {
        return Ok(false);
    };
    if let Some(directory) = path.parent() {
        fs::create_dir_all(directory)?;
    }
    let file = fs::File::create(&path)?;

    let logfile_layer = tracing_subscriber::fmt::layer()
        .with_writer(file)
        .with_ansi(false)
        .with_filter(filter(logging.level, directives.as_deref())?);
    tracing_subscriber::registry().with(logfile_layer).try_init()?;

    tracing::info!(path = %path.display(), "logging started");
    Ok(true)
}
