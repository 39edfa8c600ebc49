use crate::aggregate::{Field, GroupKey, Metric, Statistic, aggregate, percentage};
use crate::best_slot::{best_day_per_month, recommend};
use crate::bias::analyze_bias;
use crate::derive::derive_trades;
use crate::drawdown::compute_drawdown;
use crate::filter::filter_exits;
use crate::types::{AnalysisSettings, InstrumentAnalysis};
use core_types::{Result, TradeEvent};
use rust_decimal::Decimal;

const PNL_SUM: Metric = Metric::new(Field::PnlValue, Statistic::Sum);
const PNL_MEAN: Metric = Metric::new(Field::PnlValue, Statistic::Mean);
const PNL_STD: Metric = Metric::new(Field::PnlValue, Statistic::Std);
const COUNT: Metric = Metric::new(Field::PnlValue, Statistic::Count);
const PCT_SUM: Metric = Metric::new(Field::PnlPct, Statistic::Sum);
const PCT_MEAN: Metric = Metric::new(Field::PnlPct, Statistic::Mean);
const PCT_STD: Metric = Metric::new(Field::PnlPct, Statistic::Std);

pub const DAILY_METRICS: &[Metric] = &[PNL_SUM, PNL_MEAN, COUNT, PCT_SUM, PCT_MEAN];
pub const MONTHLY_METRICS: &[Metric] =
    &[PNL_SUM, PNL_MEAN, PNL_STD, COUNT, PCT_SUM, PCT_MEAN, PCT_STD];
pub const WEEKDAY_MONTH_METRICS: &[Metric] =
    &[PNL_SUM, PNL_MEAN, COUNT, PNL_STD, PCT_SUM, PCT_MEAN, PCT_STD];
pub const WEEKDAY_METRICS: &[Metric] = &[PNL_SUM, PNL_MEAN, COUNT, PCT_SUM, PCT_MEAN];

/// A stateless calculator that turns one instrument's ledger into its full
/// set of aggregates.
#[derive(Debug, Default, Clone)]
pub struct AnalyticsEngine {
    settings: AnalysisSettings,
}

impl AnalyticsEngine {
    pub fn new(settings: AnalysisSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &AnalysisSettings {
        &self.settings
    }

    /// Runs every stage for one instrument.
    ///
    /// Any stage error discards the whole result; there is no partial analysis.
    pub fn analyze(&self, instrument: &str, events: &[TradeEvent]) -> Result<InstrumentAnalysis> {
        let exits = filter_exits(events)?;
        let mut trades = derive_trades(&exits)?;
        // Stable, so trades sharing a timestamp keep their ledger order.
        trades.sort_by_key(|t| t.timestamp);

        let daily = aggregate(&trades, GroupKey::Date, DAILY_METRICS);
        let monthly = aggregate(&trades, GroupKey::Month, MONTHLY_METRICS);
        let weekday_month = aggregate(&trades, GroupKey::MonthWeekday, WEEKDAY_MONTH_METRICS);
        let weekday = aggregate(&trades, GroupKey::Weekday, WEEKDAY_METRICS);

        let drawdown = compute_drawdown(&trades)?;
        let bias = analyze_bias(&trades);
        let best_day_per_month = best_day_per_month(&weekday_month);
        let recommendations = recommend(&best_day_per_month, &self.settings.recommendation);

        let total_pnl: Decimal = trades.iter().map(|t| t.pnl).sum();
        let wins = trades.iter().filter(|t| t.is_win).count();

        tracing::info!(
            instrument,
            trades = trades.len(),
            %total_pnl,
            recommendations = recommendations.len(),
            "Instrument analysis complete."
        );

        Ok(InstrumentAnalysis {
            instrument: instrument.to_string(),
            total_events: events.len(),
            total_trades: trades.len(),
            total_pnl,
            win_rate: percentage(wins, trades.len()),
            daily,
            monthly,
            weekday_month,
            weekday,
            drawdown,
            bias,
            best_day_per_month,
            recommendations,
        })
    }
}
