// In crates/ledger/src/lib.rs

//! File I/O around the analytics engine: loading exported trade lists
//! (CSV or the `.xlsx` workbook),
//! naming instruments and writing the CSV reports.

pub mod error;
pub mod export;
pub mod loader;
pub mod naming;
pub mod types;

pub use error::{Error, Result};
pub use export::ReportExporter;
pub use loader::{LedgerInspection, LedgerLoader, is_workbook};
pub use naming::{UNKNOWN_INSTRUMENT, extract_asset_name, instrument_name};
pub use types::LedgerSettings;
