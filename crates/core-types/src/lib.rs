// In crates/core-types/src/lib.rs

pub mod calendar;
pub mod error;
pub mod types;

// Re-export the most important types for easy access from other crates.
pub use calendar::{DayOfWeek, MonthName, MonthPeriod, parse_timestamp};
pub use error::{AnalysisError, Result};
pub use types::{Direction, ExitTrade, TradeEvent};
