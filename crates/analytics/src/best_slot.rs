use crate::aggregate::{BucketKey, GroupSummary, GroupTable};
use core_types::{DayOfWeek, MonthName};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The best weekday of one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BestSlot {
    pub month: MonthName,
    pub weekday: DayOfWeek,
    pub summary: GroupSummary,
}

/// Thresholds a best slot must clear to be recommended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendationFilter {
    /// Total P&L must be strictly above this.
    pub min_total_pnl: Decimal,
    /// Win rate must be strictly above this, in percent.
    pub min_win_rate: f64,
    /// Trade count must be at least this.
    pub min_trades: usize,
}

impl Default for RecommendationFilter {
    fn default() -> Self {
        Self {
            min_total_pnl: Decimal::ZERO,
            min_win_rate: 50.0,
            min_trades: 5,
        }
    }
}

impl RecommendationFilter {
    pub fn passes(&self, summary: &GroupSummary) -> bool {
        summary.total_pnl > self.min_total_pnl
            && summary.win_rate > self.min_win_rate
            && summary.count >= self.min_trades
    }
}

/// Picks, for each month, the weekday with the highest total P&L.
///
/// Ties keep the row met first in `table`. Tables built by `aggregate` are
/// sorted Monday first, so a tie goes to the earliest weekday. Rows not keyed
/// by month and weekday are ignored.
pub fn best_day_per_month(table: &GroupTable) -> Vec<BestSlot> {
    let mut best: BTreeMap<MonthName, BestSlot> = BTreeMap::new();

    for row in &table.rows {
        let BucketKey::MonthWeekday(month, weekday) = row.key else {
            continue;
        };
        let replace = best
            .get(&month)
            .is_none_or(|current| row.total_pnl > current.summary.total_pnl);
        if replace {
            best.insert(
                month,
                BestSlot {
                    month,
                    weekday,
                    summary: row.clone(),
                },
            );
        }
    }

    best.into_values().collect()
}

/// Keeps the best slots that pass `filter`.
pub fn recommend(slots: &[BestSlot], filter: &RecommendationFilter) -> Vec<BestSlot> {
    slots
        .iter()
        .filter(|slot| filter.passes(&slot.summary))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::{GroupKey, aggregate};
    use crate::testing::{summary, trade};
    use rust_decimal_macros::dec;

    #[test]
    fn picks_highest_total_per_month() {
        let trades = vec![
            // January: Monday +10, Tuesday +30
            trade("Exit Long", "2024-01-01 10:00", dec!(10), dec!(0.1)),
            trade("Exit Long", "2024-01-02 10:00", dec!(30), dec!(0.3)),
            // February: Thursday -5
            trade("Exit Long", "2024-02-01 10:00", dec!(-5), dec!(-0.05)),
        ];
        let table = aggregate(&trades, GroupKey::MonthWeekday, &[]);
        let slots = best_day_per_month(&table);

        assert_eq!(slots.len(), 2);
        assert_eq!(slots[0].month, MonthName::January);
        assert_eq!(slots[0].weekday, DayOfWeek::Tuesday);
        assert_eq!(slots[1].month, MonthName::February);
        assert_eq!(slots[1].weekday, DayOfWeek::Thursday);
    }

    #[test]
    fn ties_go_to_the_earliest_weekday() {
        let trades = vec![
            trade("Exit Long", "2024-01-05 10:00", dec!(20), dec!(0.2)), // Friday
            trade("Exit Long", "2024-01-02 10:00", dec!(20), dec!(0.2)), // Tuesday
        ];
        let table = aggregate(&trades, GroupKey::MonthWeekday, &[]);
        let slots = best_day_per_month(&table);

        assert_eq!(slots[0].weekday, DayOfWeek::Tuesday);
    }

    #[test]
    fn ignores_rows_without_month_and_weekday() {
        let trades = vec![trade("Exit Long", "2024-01-05 10:00", dec!(20), dec!(0.2))];
        let table = aggregate(&trades, GroupKey::Date, &[]);
        assert!(best_day_per_month(&table).is_empty());
    }

    #[test]
    fn recommendation_filter_keeps_only_strong_months() {
        let strong = BestSlot {
            month: MonthName::March,
            weekday: DayOfWeek::Wednesday,
            summary: summary(dec!(500), 60.0, 8),
        };
        let weak = BestSlot {
            month: MonthName::April,
            weekday: DayOfWeek::Monday,
            summary: summary(dec!(200), 40.0, 3),
        };

        let picks = recommend(&[strong.clone(), weak], &RecommendationFilter::default());
        assert_eq!(picks, vec![strong]);
    }

    #[test]
    fn recommendation_thresholds_are_configurable() {
        let slot = BestSlot {
            month: MonthName::April,
            weekday: DayOfWeek::Monday,
            summary: summary(dec!(200), 40.0, 3),
        };
        let lenient = RecommendationFilter {
            min_total_pnl: dec!(100),
            min_win_rate: 30.0,
            min_trades: 3,
        };

        assert_eq!(recommend(&[slot.clone()], &lenient), vec![slot]);
    }

    #[test]
    fn thresholds_are_exclusive_for_pnl_and_win_rate() {
        let filter = RecommendationFilter::default();
        assert!(!filter.passes(&summary(dec!(0), 80.0, 10)));
        assert!(!filter.passes(&summary(dec!(10), 50.0, 10)));
        assert!(filter.passes(&summary(dec!(10), 50.1, 5)));
    }
}
