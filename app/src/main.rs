// In app/src/main.rs

use analytics::{AnalyticsEngine, TruthMatrix};
use anyhow::{Context, Result};
use app_config::Settings;
use clap::{Parser, Subcommand};
use ledger::{LedgerLoader, ReportExporter};
use std::path::PathBuf;
use tracing_subscriber::prelude::*;

mod batch;
mod render;

use crate::batch::{BatchOutcome, discover_files, export_reports, resolve_names, run_batch};

// --- Command-Line Interface Definition ---

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about,
    long_about = "Analyzes exported backtest trade lists by day, month and weekday."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Runs the full analysis for each ledger and exports the CSV reports.
    Analyze {
        /// Ledger files to analyze. Defaults to every CSV and XLSX in the input directory.
        files: Vec<PathBuf>,

        /// Directory to scan when no files are given.
        #[arg(short, long)]
        dir: Option<PathBuf>,

        /// Print the analyses as JSON instead of tables.
        #[arg(long)]
        json: bool,

        /// Skip writing the CSV reports.
        #[arg(long)]
        no_export: bool,
    },

    /// Builds the weekday truth table across instruments.
    Truth {
        files: Vec<PathBuf>,

        #[arg(short, long)]
        dir: Option<PathBuf>,

        /// Skip writing `truth_table.csv`.
        #[arg(long)]
        no_export: bool,
    },

    /// Shows the headers, row counts and column mapping of one ledger.
    Inspect {
        file: PathBuf,
    },
}

// --- Main Application Entry Point ---

fn main() -> Result<()> {
    // Load environment variables from a .env file, if it exists.
    dotenvy::dotenv().ok();

    let settings = app_config::load_settings().context("Failed to load configuration")?;
    init_tracing(&settings.app.log_level);

    let cli = Cli::parse();
    tracing::info!(environment = %settings.app.environment, "Starting backtest analyzer");

    match cli.command {
        Commands::Analyze {
            files,
            dir,
            json,
            no_export,
        } => handle_analyze(&settings, files, dir, json, no_export)?,
        Commands::Truth {
            files,
            dir,
            no_export,
        } => handle_truth(&settings, files, dir, no_export)?,
        Commands::Inspect { file } => handle_inspect(&settings, file)?,
    }

    Ok(())
}

fn init_tracing(log_level: &str) {
    let level = log_level.parse::<tracing::Level>().unwrap_or(tracing::Level::INFO);
    // Logs go to stderr so `--json` output stays machine-readable.
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(tracing_subscriber::filter::Targets::new().with_default(level));
    tracing_subscriber::registry().with(fmt_layer).init();
}

/// Discovers, names and analyzes the ledgers for one command.
fn run(settings: &Settings, files: Vec<PathBuf>, dir: Option<PathBuf>) -> Result<BatchOutcome> {
    let dir = dir.unwrap_or_else(|| settings.input.dir.clone());
    let paths = discover_files(&files, &dir)?;
    if paths.is_empty() {
        anyhow::bail!("No ledger files found in {}", dir.display());
    }

    let aliases = app_config::load_instrument_aliases().context("Failed to load instrument aliases")?;
    let ledgers = resolve_names(&paths, &aliases.aliases);

    let loader = LedgerLoader::new(settings.ledger.clone());
    let engine = AnalyticsEngine::new(settings.analysis.clone());
    run_batch(ledgers, &loader, &engine, settings.app.worker_threads)
}

// --- "Analyze" Subcommand Logic ---

fn handle_analyze(
    settings: &Settings,
    files: Vec<PathBuf>,
    dir: Option<PathBuf>,
    json: bool,
    no_export: bool,
) -> Result<()> {
    let mut outcome = run(settings, files, dir)?;

    if settings.output.export && !no_export {
        export_reports(&mut outcome, &ReportExporter::new(&settings.output.reports_dir));
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(());
    }

    println!("{}", render::summary_table(&outcome.analyses));
    for (_, analysis) in &outcome.analyses {
        println!("\n=== {} ===", analysis.instrument);
        println!("{}", render::drawdown_line(analysis));
        println!("{}", render::group_table(&analysis.monthly));
        println!("{}", render::best_days_table(analysis));
        if analysis.recommendations.is_empty() {
            println!("No month passes the recommendation filter.");
        }
    }
    if !outcome.failures.is_empty() {
        println!("\n{}", render::failures_table(&outcome.failures));
    }
    Ok(())
}

// --- "Truth" Subcommand Logic ---

fn handle_truth(
    settings: &Settings,
    files: Vec<PathBuf>,
    dir: Option<PathBuf>,
    no_export: bool,
) -> Result<()> {
    let outcome = run(settings, files, dir)?;

    let matrix = TruthMatrix::build(
        outcome
            .analyses
            .iter()
            .map(|(file, analysis)| (file.instrument.as_str(), &analysis.weekday)),
        settings.analysis.truth_min_win_rate,
    );

    println!("{}", render::truth_table(&matrix));
    for (_, analysis) in &outcome.analyses {
        println!("\n=== {} by weekday ===", analysis.instrument);
        println!(
            "{}",
            render::weekday_detail_table(analysis, settings.analysis.truth_min_win_rate)
        );
    }
    if !outcome.failures.is_empty() {
        println!("\n{}", render::failures_table(&outcome.failures));
    }

    if settings.output.export && !no_export {
        let path = ReportExporter::new(&settings.output.reports_dir)
            .export_truth_matrix(&matrix)
            .context("Failed to export truth table")?;
        println!("\nTruth table written to {}", path.display());
    }
    Ok(())
}

// --- "Inspect" Subcommand Logic ---

fn handle_inspect(settings: &Settings, file: PathBuf) -> Result<()> {
    let loader = LedgerLoader::new(settings.ledger.clone());
    let inspection = loader
        .inspect(&file)
        .with_context(|| format!("Failed to inspect {}", file.display()))?;

    println!("{}", render::inspection_table(&inspection));
    println!("Data rows: {}", inspection.rows);
    match inspection.exit_rows {
        Some(exits) => println!("Exit rows: {exits}"),
        None => println!("Exit rows: unknown (type column '{}' not found)", settings.ledger.type_column),
    }
    if inspection.missing_columns.is_empty() {
        println!("Column mapping: OK");
    } else {
        println!("Missing columns: {}", inspection.missing_columns.join(", "));
    }
    Ok(())
}
