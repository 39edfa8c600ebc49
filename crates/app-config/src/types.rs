// In crates/app-config/src/types.rs

use analytics::AnalysisSettings;
use ledger::LedgerSettings;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// The application's general settings.
    pub app: AppSettings,
    /// Where ledgers are discovered.
    pub input: InputSettings,
    /// Where reports are written.
    pub output: OutputSettings,
    /// Column mapping for the ledger export.
    pub ledger: LedgerSettings,
    /// Thresholds for recommendations and the truth table.
    pub analysis: AnalysisSettings,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct AppSettings {
    /// The environment the application is running in (e.g., "development", "production").
    pub environment: String,
    /// The log level for the application.
    pub log_level: String,
    /// Size of the batch worker pool. `0` lets rayon pick one thread per core.
    pub worker_threads: usize,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            log_level: "info".to_string(),
            worker_threads: 0,
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct InputSettings {
    pub dir: PathBuf,
}

impl Default for InputSettings {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("backtests"),
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct OutputSettings {
    pub reports_dir: PathBuf,
    /// Write CSV reports after `analyze`.
    pub export: bool,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            reports_dir: PathBuf::from("reports"),
            export: true,
        }
    }
}

// --- Structs for instruments.toml ---

/// File-stem to instrument-name overrides.
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct InstrumentAliases {
    #[serde(default)]
    pub aliases: BTreeMap<String, String>,
}
