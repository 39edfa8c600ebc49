// In crates/app-config/src/lib.rs

use config::{Config, Environment, File};
use std::path::Path;

pub mod error;
pub mod types;

// Re-export the most important types for easy access.
pub use error::{Error, Result};
pub use types::{AppSettings, InputSettings, InstrumentAliases, OutputSettings, Settings};

const CONFIG_DIR: &str = "config";

/// Loads the application settings from `config/`.
///
/// The environment is taken from `APP_ENVIRONMENT`, defaulting to "development".
pub fn load_settings() -> Result<Settings> {
    let environment = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "development".into());
    load_settings_from(Path::new(CONFIG_DIR), &environment)
}

/// Loads the settings from `dir`, layering:
/// 1. `base.toml`,
/// 2. the environment-specific file (e.g., `production.toml`),
/// 3. environment variables such as `APP_OUTPUT__REPORTS_DIR=out`.
///
/// Every layer is optional; missing keys fall back to the defaults.
pub fn load_settings_from(dir: &Path, environment: &str) -> Result<Settings> {
    let settings = Config::builder()
        .add_source(File::from(dir.join("base")).required(false))
        .add_source(File::from(dir.join(environment)).required(false))
        .add_source(
            Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let mut settings: Settings = settings.try_deserialize()?;
    settings.app.environment = environment.to_string();
    Ok(settings)
}

/// Loads the instrument aliases from `config/instruments.toml`.
pub fn load_instrument_aliases() -> Result<InstrumentAliases> {
    load_instrument_aliases_from(&Path::new(CONFIG_DIR).join("instruments.toml"))
}

/// A missing file means no aliases.
pub fn load_instrument_aliases_from(path: &Path) -> Result<InstrumentAliases> {
    if !path.exists() {
        return Ok(InstrumentAliases::default());
    }
    let content = std::fs::read_to_string(path)?;

    let aliases: InstrumentAliases = toml::from_str(&content)?;
    Ok(aliases)
}
