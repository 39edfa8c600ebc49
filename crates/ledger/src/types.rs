// In crates/ledger/src/types.rs

use serde::{Deserialize, Serialize};

/// Maps the export's column headers onto the trade-event fields.
///
/// Header names are matched exactly (surrounding whitespace ignored). The
/// mapping happens once, at load time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerSettings {
    pub type_column: String,
    pub timestamp_column: String,
    pub pnl_value_column: String,
    pub pnl_pct_column: String,
    pub delimiter: char,
    /// `.` or `,`. The other one is accepted as a thousands separator.
    pub decimal_separator: char,
    /// Worksheet read from `.xlsx` workbooks.
    pub sheet_name: String,
}

impl Default for LedgerSettings {
    fn default() -> Self {
        Self {
            type_column: "Type".to_string(),
            timestamp_column: "Date and time".to_string(),
            pnl_value_column: "Net P&L JPY".to_string(),
            pnl_pct_column: "Net P&L %".to_string(),
            delimiter: ',',
            decimal_separator: '.',
            sheet_name: "List of trades".to_string(),
        }
    }
}

impl LedgerSettings {
    pub fn required_columns(&self) -> [&str; 4] {
        [
            &self.type_column,
            &self.timestamp_column,
            &self.pnl_value_column,
            &self.pnl_pct_column,
        ]
    }
}
