// In app/src/batch.rs

use analytics::{AnalyticsEngine, InstrumentAnalysis};
use anyhow::{Context, Result};
use itertools::Itertools;
use ledger::{LedgerLoader, ReportExporter, instrument_name, is_workbook};
use rayon::ThreadPoolBuilder;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// A ledger file queued for analysis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LedgerFile {
    pub path: PathBuf,
    /// Display name, unique within the batch.
    pub instrument: String,
    /// Prefix of the report file names.
    pub report_base: String,
}

#[derive(Debug, Serialize)]
pub struct BatchFailure {
    pub path: PathBuf,
    pub error: String,
}

#[derive(Debug, Default, Serialize)]
pub struct BatchOutcome {
    /// Sorted by instrument name.
    pub analyses: Vec<(LedgerFile, InstrumentAnalysis)>,
    pub failures: Vec<BatchFailure>,
}

/// Returns the explicit files if any, else every `*.csv` and `*.xlsx` in `dir`
/// sorted by name.
pub fn discover_files(files: &[PathBuf], dir: &Path) -> Result<Vec<PathBuf>> {
    if !files.is_empty() {
        return Ok(files.to_vec());
    }

    let entries = fs::read_dir(dir)
        .with_context(|| format!("Failed to read input directory {}", dir.display()))?;
    let mut found = Vec::new();
    for entry in entries {
        let path = entry?.path();
        let is_ledger = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
            || is_workbook(&path);
        if path.is_file() && is_ledger {
            found.push(path);
        }
    }
    found.sort();

    tracing::info!(dir = %dir.display(), files = found.len(), "Discovered ledger files.");
    Ok(found)
}

/// Names each file, suffixing the file stem onto names that occur more than once.
///
/// Reports are always based on the file stem so two runs of one instrument
/// never overwrite each other.
pub fn resolve_names(paths: &[PathBuf], aliases: &BTreeMap<String, String>) -> Vec<LedgerFile> {
    let named: Vec<(PathBuf, String, String)> = paths
        .iter()
        .map(|path| {
            let stem = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            let name = instrument_name(&stem, aliases);
            (path.clone(), stem, name)
        })
        .collect();
    let counts = named.iter().map(|(_, _, name)| name.as_str()).counts();

    named
        .iter()
        .map(|(path, stem, name)| {
            let instrument = if counts[name.as_str()] > 1 {
                format!("{name} ({stem})")
            } else {
                name.clone()
            };
            LedgerFile {
                path: path.clone(),
                instrument,
                report_base: stem.clone(),
            }
        })
        .collect()
}

/// Analyzes every file on a dedicated rayon pool.
///
/// A file that fails to load or analyze is recorded in `failures` and does
/// not affect the others. `worker_threads == 0` uses one thread per core.
pub fn run_batch(
    files: Vec<LedgerFile>,
    loader: &LedgerLoader,
    engine: &AnalyticsEngine,
    worker_threads: usize,
) -> Result<BatchOutcome> {
    tracing::info!(files = files.len(), worker_threads, "Configuring Rayon thread pool.");
    let pool = ThreadPoolBuilder::new()
        .num_threads(worker_threads)
        .build()
        .context("Failed to build Rayon thread pool")?;

    let results: Vec<(LedgerFile, ledger::Result<InstrumentAnalysis>)> = pool.install(|| {
        files
            .into_par_iter()
            .map(|file| {
                let result = analyze_file(&file, loader, engine);
                (file, result)
            })
            .collect()
    });

    let mut outcome = BatchOutcome::default();
    for (file, result) in results {
        match result {
            Ok(analysis) => outcome.analyses.push((file, analysis)),
            Err(e) => {
                tracing::error!(path = %file.path.display(), error = %e, "Ledger analysis failed.");
                outcome.failures.push(BatchFailure {
                    path: file.path,
                    error: e.to_string(),
                });
            }
        }
    }
    outcome
        .analyses
        .sort_by(|(a, _), (b, _)| a.instrument.cmp(&b.instrument));

    tracing::info!(
        succeeded = outcome.analyses.len(),
        failed = outcome.failures.len(),
        "Finished batch."
    );
    Ok(outcome)
}

/// Writes the CSV reports of every analysis.
///
/// An instrument whose export fails moves to `failures`; the rest are still
/// written.
pub fn export_reports(outcome: &mut BatchOutcome, exporter: &ReportExporter) {
    let analyses = std::mem::take(&mut outcome.analyses);
    for (file, analysis) in analyses {
        match exporter.export_analysis(&file.report_base, &analysis) {
            Ok(_) => outcome.analyses.push((file, analysis)),
            Err(e) => {
                tracing::error!(instrument = %file.instrument, error = %e, "Report export failed.");
                outcome.failures.push(BatchFailure {
                    path: file.path,
                    error: format!("Failed to export reports: {e}"),
                });
            }
        }
    }
}

fn analyze_file(
    file: &LedgerFile,
    loader: &LedgerLoader,
    engine: &AnalyticsEngine,
) -> ledger::Result<InstrumentAnalysis> {
    let events = loader.load_path(&file.path)?;
    Ok(engine.analyze(&file.instrument, &events)?)
}
