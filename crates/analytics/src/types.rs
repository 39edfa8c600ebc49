// In crates/analytics/src/types.rs

use crate::aggregate::GroupTable;
use crate::best_slot::{BestSlot, RecommendationFilter};
use crate::bias::BiasSummary;
use crate::drawdown::DrawdownSummary;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Tunable thresholds for the derived verdicts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisSettings {
    pub recommendation: RecommendationFilter,
    /// A weekday has a "good" win rate strictly above this, in percent.
    pub truth_min_win_rate: f64,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            recommendation: RecommendationFilter::default(),
            truth_min_win_rate: 50.0,
        }
    }
}

/// Everything the engine derives for one instrument.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InstrumentAnalysis {
    pub instrument: String,
    /// Ledger rows received, entries included.
    pub total_events: usize,
    pub total_trades: usize,
    pub total_pnl: Decimal,
    pub win_rate: f64,

    pub daily: GroupTable,
    pub monthly: GroupTable,
    pub weekday_month: GroupTable,
    pub weekday: GroupTable,

    pub drawdown: DrawdownSummary,
    pub bias: BiasSummary,
    pub best_day_per_month: Vec<BestSlot>,
    pub recommendations: Vec<BestSlot>,
}
