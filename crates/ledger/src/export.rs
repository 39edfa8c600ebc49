// In crates/ledger/src/export.rs

use crate::error::Result;
use analytics::aggregate::format_float;
use analytics::{GroupTable, InstrumentAnalysis, TruthMatrix};
use csv::Writer;
use std::fs;
use std::path::{Path, PathBuf};

const BIAS_HEADERS: [&str; 8] = [
    "Long_Count",
    "Short_Count",
    "Unknown_Count",
    "Ambiguous_Count",
    "Total_Count",
    "Long_Pct",
    "Short_Pct",
    "Instrument",
];

const DRAWDOWN_HEADERS: [&str; 5] = [
    "Timestamp",
    "Cumulative_PnL",
    "Running_Max",
    "Drawdown_Abs",
    "Drawdown_Pct",
];

const BEST_DAY_HEADERS: [&str; 6] = [
    "Month",
    "Weekday",
    "Total_PnL",
    "Win_Rate",
    "Trade_Count",
    "Recommended",
];

const TRUTH_TABLE_FILE: &str = "truth_table.csv";

/// Writes analysis results as flat CSV files into one directory.
#[derive(Debug, Clone)]
pub struct ReportExporter {
    dir: PathBuf,
}

impl ReportExporter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Writes the per-instrument reports, each named `<base>_<kind>_analysis.csv`.
    /// Returns the paths written.
    pub fn export_analysis(&self, base: &str, analysis: &InstrumentAnalysis) -> Result<Vec<PathBuf>> {
        fs::create_dir_all(&self.dir)?;

        let written = vec![
            self.write_table(&self.report_path(base, "daily"), &analysis.daily)?,
            self.write_table(&self.report_path(base, "monthly"), &analysis.monthly)?,
            self.write_table(&self.report_path(base, "weekly"), &analysis.weekday_month)?,
            self.write_bias(&self.report_path(base, "bias"), analysis)?,
            self.write_drawdown(&self.report_path(base, "drawdown"), analysis)?,
            self.write_best_days(&self.report_path(base, "best_day"), analysis)?,
        ];

        tracing::info!(
            instrument = %analysis.instrument,
            files = written.len(),
            dir = %self.dir.display(),
            "Exported analysis reports."
        );
        Ok(written)
    }

    /// Writes the weekday × instrument grid to `truth_table.csv`.
    pub fn export_truth_matrix(&self, matrix: &TruthMatrix) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(TRUTH_TABLE_FILE);
        let mut writer = Writer::from_path(&path)?;

        let mut headers = vec!["Weekday".to_string()];
        headers.extend(matrix.instruments.iter().cloned());
        writer.write_record(&headers)?;

        for row in &matrix.rows {
            let mut record = vec![row.weekday.name().to_string()];
            record.extend(row.verdicts.iter().map(|v| v.symbol().to_string()));
            writer.write_record(&record)?;
        }
        writer.flush()?;

        tracing::info!(path = %path.display(), "Exported truth table.");
        Ok(path)
    }

    fn report_path(&self, base: &str, kind: &str) -> PathBuf {
        self.dir.join(format!("{base}_{kind}_analysis.csv"))
    }

    fn write_table(&self, path: &Path, table: &GroupTable) -> Result<PathBuf> {
        let mut writer = Writer::from_path(path)?;
        writer.write_record(table.headers())?;
        for row in &table.rows {
            writer.write_record(table.record(row))?;
        }
        writer.flush()?;
        Ok(path.to_path_buf())
    }

    fn write_bias(&self, path: &Path, analysis: &InstrumentAnalysis) -> Result<PathBuf> {
        let bias = &analysis.bias;
        let mut writer = Writer::from_path(path)?;
        writer.write_record(BIAS_HEADERS)?;
        writer.write_record([
            bias.long_count.to_string(),
            bias.short_count.to_string(),
            bias.unknown_count.to_string(),
            bias.ambiguous_count.to_string(),
            bias.total_count.to_string(),
            format_float(bias.long_pct),
            format_float(bias.short_pct),
            analysis.instrument.clone(),
        ])?;
        writer.flush()?;
        Ok(path.to_path_buf())
    }

    fn write_drawdown(&self, path: &Path, analysis: &InstrumentAnalysis) -> Result<PathBuf> {
        let mut writer = Writer::from_path(path)?;
        writer.write_record(DRAWDOWN_HEADERS)?;
        for point in &analysis.drawdown.points {
            writer.write_record([
                point.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
                point.cumulative_pnl.normalize().to_string(),
                point.running_max.normalize().to_string(),
                point.drawdown_abs.normalize().to_string(),
                point.drawdown_pct.map(format_float).unwrap_or_default(),
            ])?;
        }
        writer.flush()?;
        Ok(path.to_path_buf())
    }

    fn write_best_days(&self, path: &Path, analysis: &InstrumentAnalysis) -> Result<PathBuf> {
        let mut writer = Writer::from_path(path)?;
        writer.write_record(BEST_DAY_HEADERS)?;
        for slot in &analysis.best_day_per_month {
            let recommended = analysis
                .recommendations
                .iter()
                .any(|pick| pick.month == slot.month);
            writer.write_record([
                slot.month.name().to_string(),
                slot.weekday.name().to_string(),
                slot.summary.total_pnl.normalize().to_string(),
                format_float(slot.summary.win_rate),
                slot.summary.count.to_string(),
                recommended.to_string(),
            ])?;
        }
        writer.flush()?;
        Ok(path.to_path_buf())
    }
}
