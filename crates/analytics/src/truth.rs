use crate::aggregate::{BucketKey, GroupSummary, GroupTable};
use core_types::DayOfWeek;
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;

/// Whether a weekday is worth trading for an instrument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TruthVerdict {
    /// Profitable with a good win rate.
    Yes,
    ProfitOnly,
    WinRateOnly,
    No,
    /// No trades on that weekday.
    NotApplicable,
}

impl TruthVerdict {
    /// Classifies one weekday. `None` means the weekday had no trades.
    pub fn classify(summary: Option<&GroupSummary>, min_win_rate: f64) -> Self {
        let Some(summary) = summary else {
            return TruthVerdict::NotApplicable;
        };
        let profitable = summary.total_pnl > Decimal::ZERO;
        let good_win_rate = summary.win_rate > min_win_rate;

        match (profitable, good_win_rate) {
            (true, true) => TruthVerdict::Yes,
            (true, false) => TruthVerdict::ProfitOnly,
            (false, true) => TruthVerdict::WinRateOnly,
            (false, false) => TruthVerdict::No,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            TruthVerdict::Yes => "YES",
            TruthVerdict::ProfitOnly => "P&L+",
            TruthVerdict::WinRateOnly => "WR+",
            TruthVerdict::No => "NO",
            TruthVerdict::NotApplicable => "N/A",
        }
    }
}

impl fmt::Display for TruthVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TruthRow {
    pub weekday: DayOfWeek,
    /// One verdict per instrument, in `TruthMatrix::instruments` order.
    pub verdicts: Vec<TruthVerdict>,
}

/// Weekday × instrument grid of verdicts. Every cell is filled.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TruthMatrix {
    pub instruments: Vec<String>,
    pub rows: Vec<TruthRow>,
}

impl TruthMatrix {
    /// Builds the grid from each instrument's weekday table.
    pub fn build<'a, I>(weekday_tables: I, min_win_rate: f64) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a GroupTable)>,
    {
        let tables: Vec<(&str, &GroupTable)> = weekday_tables.into_iter().collect();
        let instruments = tables.iter().map(|(name, _)| name.to_string()).collect();

        let rows = DayOfWeek::ALL
            .iter()
            .map(|&weekday| TruthRow {
                weekday,
                verdicts: tables
                    .iter()
                    .map(|(_, table)| {
                        TruthVerdict::classify(table.get(&BucketKey::Weekday(weekday)), min_win_rate)
                    })
                    .collect(),
            })
            .collect();

        Self { instruments, rows }
    }

    pub fn verdict(&self, instrument: &str, weekday: DayOfWeek) -> Option<TruthVerdict> {
        let column = self.instruments.iter().position(|name| name == instrument)?;
        self.rows
            .iter()
            .find(|row| row.weekday == weekday)
            .and_then(|row| row.verdicts.get(column).copied())
    }
}
