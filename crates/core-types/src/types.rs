// In crates/core-types/src/types.rs

use crate::calendar::{DayOfWeek, MonthName, MonthPeriod};
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One row of the exported trade ledger, after schema mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeEvent {
    /// 1-based row number in the source file, for diagnostics.
    pub row: usize,
    /// The event type, e.g. "Entry Long" or "Exit Short".
    pub kind: String,
    pub timestamp: NaiveDateTime,
    /// Net P&L in the account currency. Always present on exit rows.
    pub net_pnl_value: Option<Decimal>,
    /// Net P&L in percent.
    pub net_pnl_pct: Option<Decimal>,
}

impl TradeEvent {
    /// Exit rows close a trade and carry its realized P&L.
    /// The match is case-sensitive, following the export's casing.
    pub fn is_exit(&self) -> bool {
        self.kind.contains("Exit")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Long,
    Short,
    Unknown,
}

impl Direction {
    /// Classifies an event type by case-insensitive substring match.
    ///
    /// A type naming both sides is ambiguous and classified as `Unknown`.
    pub fn from_kind(kind: &str) -> Self {
        match side_matches(kind) {
            (true, false) => Direction::Long,
            (false, true) => Direction::Short,
            _ => Direction::Unknown,
        }
    }

    /// True when the event type mentions both "long" and "short".
    pub fn is_ambiguous(kind: &str) -> bool {
        side_matches(kind) == (true, true)
    }
}

fn side_matches(kind: &str) -> (bool, bool) {
    let lowered = kind.to_lowercase();
    (lowered.contains("long"), lowered.contains("short"))
}

/// A completed trade with its calendar keys and classification attached.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExitTrade {
    pub row: usize,
    pub kind: String,
    pub timestamp: NaiveDateTime,
    pub pnl: Decimal,
    pub pnl_pct: Decimal,
    pub is_win: bool,
    pub date: NaiveDate,
    pub weekday: DayOfWeek,
    pub month_period: MonthPeriod,
    pub month_name: MonthName,
    pub year: i32,
    pub direction: Direction,
    pub ambiguous_direction: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_is_case_insensitive() {
        assert_eq!(Direction::from_kind("Exit Long"), Direction::Long);
        assert_eq!(Direction::from_kind("exit SHORT"), Direction::Short);
        assert_eq!(Direction::from_kind("Exit"), Direction::Unknown);
    }

    #[test]
    fn both_sides_is_ambiguous() {
        let kind = "Exit Long (reverse to Short)";
        assert_eq!(Direction::from_kind(kind), Direction::Unknown);
        assert!(Direction::is_ambiguous(kind));
        assert!(!Direction::is_ambiguous("Exit Long"));
    }

    #[test]
    fn exit_match_is_case_sensitive() {
        let event = |kind: &str| TradeEvent {
            row: 1,
            kind: kind.to_string(),
            timestamp: NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            net_pnl_value: None,
            net_pnl_pct: None,
        };

        assert!(event("Exit Long").is_exit());
        assert!(!event("exit long").is_exit());
        assert!(!event("Entry Short").is_exit());
    }
}
