// In crates/ledger/src/error.rs

use core_types::AnalysisError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error("Failed to read or write CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to read workbook: {0}")]
    Workbook(#[from] calamine::Error),

    #[error("Worksheet '{0}' not found in workbook")]
    MissingSheet(String),

    #[error("Failed to access file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid number '{value}' in column '{column}' on row {row}")]
    InvalidNumber {
        row: usize,
        column: String,
        value: String,
    },

    #[error("Unsupported delimiter '{0}': must be a single ASCII character")]
    InvalidDelimiter(char),

    #[error("Unsupported decimal separator '{0}': must be '.' or ','")]
    InvalidDecimalSeparator(char),
}

pub type Result<T> = std::result::Result<T, Error>;
