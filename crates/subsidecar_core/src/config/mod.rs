//! Configuration: settings schema, language filter, TOML persistence.
//!
//! Settings persistence is atomic (write to a temp file, then rename) so a
//! crash mid-save never leaves a truncated config behind.

mod languages;
mod settings;

pub use languages::LanguageFilter;
pub use settings::Settings;

use std::fs;
use std::io;
use std::path::Path;

use thiserror::Error;

/// Errors that can occur during config operations.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Read(#[from] io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Result type for config operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Load settings from a TOML file, falling back to defaults when absent.
pub fn load_or_default(path: &Path) -> ConfigResult<Settings> {
    if !path.exists() {
        return Ok(Settings::default());
    }
    let raw = fs::read_to_string(path)?;
    Ok(toml::from_str(&raw)?)
}

/// Save settings atomically.
pub fn save(path: &Path, settings: &Settings) -> ConfigResult<()> {
    let raw = toml::to_string_pretty(settings)?;
    let tmp = path.with_extension("toml.tmp");
    fs::write(&tmp, raw)?;
    fs::rename(&tmp, path)?;
    Ok(())
}
