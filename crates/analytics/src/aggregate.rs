//! Grouped summaries over exit trades.
//!
//! A grouping is described by a [`GroupKey`] dimension and a list of
//! [`Metric`]s. Every emitted row carries the full [`GroupSummary`]; the metric
//! list decides which columns a table projects when it is rendered or exported.

use chrono::NaiveDate;
use core_types::{DayOfWeek, Direction, ExitTrade, MonthName, MonthPeriod};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// The supported grouping dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum GroupKey {
    Date,
    /// Year and month, e.g. `2024-01`.
    Month,
    Weekday,
    /// Calendar month name crossed with weekday, pooled across years.
    MonthWeekday,
}

impl GroupKey {
    pub fn bucket_of(self, trade: &ExitTrade) -> BucketKey {
        match self {
            GroupKey::Date => BucketKey::Date(trade.date),
            GroupKey::Month => BucketKey::Month(trade.month_period),
            GroupKey::Weekday => BucketKey::Weekday(trade.weekday),
            GroupKey::MonthWeekday => BucketKey::MonthWeekday(trade.month_name, trade.weekday),
        }
    }

    pub fn headers(self) -> &'static [&'static str] {
        match self {
            GroupKey::Date => &["Date"],
            GroupKey::Month => &["Month"],
            GroupKey::Weekday => &["Weekday"],
            GroupKey::MonthWeekday => &["Month", "Weekday"],
        }
    }
}

/// The value of a group key for one group.
///
/// Ordering is lexicographic over the components, each in calendar order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum BucketKey {
    Date(NaiveDate),
    Month(MonthPeriod),
    Weekday(DayOfWeek),
    MonthWeekday(MonthName, DayOfWeek),
}

impl BucketKey {
    /// One label per key column, matching [`GroupKey::headers`].
    pub fn labels(&self) -> Vec<String> {
        match self {
            BucketKey::Date(date) => vec![date.format("%Y-%m-%d").to_string()],
            BucketKey::Month(period) => vec![period.to_string()],
            BucketKey::Weekday(day) => vec![day.to_string()],
            BucketKey::MonthWeekday(month, day) => vec![month.to_string(), day.to_string()],
        }
    }

    pub fn weekday(&self) -> Option<DayOfWeek> {
        match self {
            BucketKey::Weekday(day) | BucketKey::MonthWeekday(_, day) => Some(*day),
            _ => None,
        }
    }
}

impl fmt::Display for BucketKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.labels().join(" / "))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Field {
    PnlValue,
    PnlPct,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Statistic {
    Sum,
    Mean,
    Count,
    /// Sample standard deviation (n - 1). Undefined for fewer than two trades.
    Std,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Metric {
    pub field: Field,
    pub statistic: Statistic,
}

impl Metric {
    pub const fn new(field: Field, statistic: Statistic) -> Self {
        Self { field, statistic }
    }

    pub fn header(&self) -> &'static str {
        match (self.field, self.statistic) {
            (_, Statistic::Count) => "Trade_Count",
            (Field::PnlValue, Statistic::Sum) => "Total_PnL",
            (Field::PnlValue, Statistic::Mean) => "Avg_PnL",
            (Field::PnlValue, Statistic::Std) => "Std_PnL",
            (Field::PnlPct, Statistic::Sum) => "Total_PnL_Pct",
            (Field::PnlPct, Statistic::Mean) => "Avg_PnL_Pct",
            (Field::PnlPct, Statistic::Std) => "Std_PnL_Pct",
        }
    }
}

/// A single projected cell of a summary row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MetricValue {
    Amount(Decimal),
    Count(usize),
    Float(Option<f64>),
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::Amount(value) => write!(f, "{}", value.round_dp(8).normalize()),
            MetricValue::Count(count) => write!(f, "{count}"),
            MetricValue::Float(Some(value)) => f.write_str(&format_float(*value)),
            // Undefined values render as an empty cell.
            MetricValue::Float(None) => Ok(()),
        }
    }
}

/// Formats a float with at most six decimals and no trailing zeros.
pub fn format_float(value: f64) -> String {
    let text = format!("{value:.6}");
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text == "-0" { "0".to_string() } else { text.to_string() }
}

/// The statistics of one group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupSummary {
    pub key: BucketKey,
    pub total_pnl: Decimal,
    pub mean_pnl: Decimal,
    pub count: usize,
    pub std_pnl: Option<f64>,
    pub total_pnl_pct: Decimal,
    pub mean_pnl_pct: Decimal,
    pub std_pnl_pct: Option<f64>,
    /// Percentage of trades with positive P&L. Zero for an empty group.
    pub win_rate: f64,
    /// Percentage of trades classified as long.
    pub long_pct: f64,
}

impl GroupSummary {
    pub fn value(&self, metric: Metric) -> MetricValue {
        match (metric.field, metric.statistic) {
            (_, Statistic::Count) => MetricValue::Count(self.count),
            (Field::PnlValue, Statistic::Sum) => MetricValue::Amount(self.total_pnl),
            (Field::PnlValue, Statistic::Mean) => MetricValue::Amount(self.mean_pnl),
            (Field::PnlValue, Statistic::Std) => MetricValue::Float(self.std_pnl),
            (Field::PnlPct, Statistic::Sum) => MetricValue::Amount(self.total_pnl_pct),
            (Field::PnlPct, Statistic::Mean) => MetricValue::Amount(self.mean_pnl_pct),
            (Field::PnlPct, Statistic::Std) => MetricValue::Float(self.std_pnl_pct),
        }
    }
}

/// The rows of one grouping, in ascending key order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupTable {
    pub key: GroupKey,
    pub metrics: Vec<Metric>,
    pub rows: Vec<GroupSummary>,
}

impl GroupTable {
    pub fn headers(&self) -> Vec<&'static str> {
        let mut headers = self.key.headers().to_vec();
        headers.extend(self.metrics.iter().map(Metric::header));
        headers.push("Win_Rate");
        headers
    }

    /// Renders one row as text cells, in the same order as [`GroupTable::headers`].
    pub fn record(&self, row: &GroupSummary) -> Vec<String> {
        let mut cells = row.key.labels();
        cells.extend(self.metrics.iter().map(|m| row.value(*m).to_string()));
        cells.push(format_float(row.win_rate));
        cells
    }

    pub fn get(&self, key: &BucketKey) -> Option<&GroupSummary> {
        self.rows.iter().find(|row| &row.key == key)
    }

    pub fn total_count(&self) -> usize {
        self.rows.iter().map(|row| row.count).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Groups `trades` by `key` and summarizes every group.
///
/// Rows are emitted in ascending key order, so two runs over the same input
/// produce the same table.
pub fn aggregate(trades: &[ExitTrade], key: GroupKey, metrics: &[Metric]) -> GroupTable {
    let mut groups: BTreeMap<BucketKey, Vec<&ExitTrade>> = BTreeMap::new();
    for trade in trades {
        groups.entry(key.bucket_of(trade)).or_default().push(trade);
    }

    let rates = win_rates(trades, key);
    let rows = groups
        .into_iter()
        .map(|(bucket, members)| {
            let win_rate = rates.get(&bucket).copied().unwrap_or(0.0);
            GroupSummary {
                win_rate,
                ..summarize(bucket, &members)
            }
        })
        .collect();

    GroupTable {
        key,
        metrics: metrics.to_vec(),
        rows,
    }
}

/// Win rate per group, in percent.
pub fn win_rates(trades: &[ExitTrade], key: GroupKey) -> BTreeMap<BucketKey, f64> {
    let mut tallies: BTreeMap<BucketKey, (usize, usize)> = BTreeMap::new();
    for trade in trades {
        let (wins, total) = tallies.entry(key.bucket_of(trade)).or_default();
        *total += 1;
        if trade.is_win {
            *wins += 1;
        }
    }

    tallies
        .into_iter()
        .map(|(bucket, (wins, total))| (bucket, percentage(wins, total)))
        .collect()
}

/// `part / whole * 100`, guarded to zero for an empty whole.
pub fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

fn summarize(key: BucketKey, members: &[&ExitTrade]) -> GroupSummary {
    let count = members.len();
    let total_pnl: Decimal = members.iter().map(|t| t.pnl).sum();
    let total_pnl_pct: Decimal = members.iter().map(|t| t.pnl_pct).sum();
    let (mean_pnl, mean_pnl_pct) = if count > 0 {
        let n = Decimal::from(count);
        (total_pnl / n, total_pnl_pct / n)
    } else {
        (Decimal::ZERO, Decimal::ZERO)
    };

    let pnls: Vec<f64> = members.iter().map(|t| t.pnl.to_f64().unwrap_or(0.0)).collect();
    let pcts: Vec<f64> = members
        .iter()
        .map(|t| t.pnl_pct.to_f64().unwrap_or(0.0))
        .collect();
    let longs = members
        .iter()
        .filter(|t| t.direction == Direction::Long)
        .count();

    GroupSummary {
        key,
        total_pnl,
        mean_pnl,
        count,
        std_pnl: sample_std(&pnls),
        total_pnl_pct,
        mean_pnl_pct,
        std_pnl_pct: sample_std(&pcts),
        win_rate: 0.0,
        long_pct: percentage(longs, count),
    }
}

fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
    Some(variance.sqrt())
}
