// In crates/core-types/src/error.rs

use thiserror::Error;

/// Failures that end the analysis of a single instrument.
///
/// None of these are retried: the engine is a pure computation, so the batch
/// runner reports the instrument as failed and moves on to the next one.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    #[error("No exit trades found in the ledger")]
    EmptyResult,

    #[error("Invalid timestamp '{value}' on row {row}")]
    InvalidTimestamp { row: usize, value: String },

    #[error("Trades are not sorted by timestamp (first out-of-order index: {index})")]
    UnsortedInput { index: usize },

    #[error("Required column '{0}' is missing from the ledger")]
    MissingColumn(String),

    #[error("Exit trade on row {row} has no value for '{column}'")]
    MissingValue { row: usize, column: &'static str },
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
