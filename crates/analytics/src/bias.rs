use crate::aggregate::percentage;
use core_types::{Direction, ExitTrade};
use serde::Serialize;

/// Long/short split of the exit trades.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BiasSummary {
    pub long_count: usize,
    pub short_count: usize,
    pub unknown_count: usize,
    /// Exits whose type names both sides. Included in `unknown_count`.
    pub ambiguous_count: usize,
    pub total_count: usize,
    pub long_pct: f64,
    pub short_pct: f64,
}

pub fn analyze_bias(trades: &[ExitTrade]) -> BiasSummary {
    let mut summary = BiasSummary {
        total_count: trades.len(),
        ..BiasSummary::default()
    };

    for trade in trades {
        match trade.direction {
            Direction::Long => summary.long_count += 1,
            Direction::Short => summary.short_count += 1,
            Direction::Unknown => summary.unknown_count += 1,
        }
        if trade.ambiguous_direction {
            summary.ambiguous_count += 1;
        }
    }

    summary.long_pct = percentage(summary.long_count, summary.total_count);
    summary.short_pct = percentage(summary.short_count, summary.total_count);
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::trade;
    use approx::assert_relative_eq;
    use rust_decimal_macros::dec;

    #[test]
    fn splits_long_and_short() {
        let trades = vec![
            trade("Exit Long", "2024-01-01 10:00", dec!(1), dec!(0)),
            trade("Exit Long", "2024-01-02 10:00", dec!(1), dec!(0)),
            trade("Exit Short", "2024-01-03 10:00", dec!(1), dec!(0)),
            trade("Exit Short", "2024-01-04 10:00", dec!(1), dec!(0)),
        ];
        let bias = analyze_bias(&trades);

        assert_eq!(bias.long_count, 2);
        assert_eq!(bias.short_count, 2);
        assert_relative_eq!(bias.long_pct + bias.short_pct, 100.0);
    }

    #[test]
    fn unknown_directions_keep_total_below_hundred() {
        let trades = vec![
            trade("Exit Long", "2024-01-01 10:00", dec!(1), dec!(0)),
            trade("Exit", "2024-01-02 10:00", dec!(1), dec!(0)),
            trade("Exit Long/Short", "2024-01-03 10:00", dec!(1), dec!(0)),
        ];
        let bias = analyze_bias(&trades);

        assert_eq!(bias.unknown_count, 2);
        assert_eq!(bias.ambiguous_count, 1);
        assert!(bias.long_pct + bias.short_pct < 100.0);
    }

    #[test]
    fn empty_input_is_all_zero() {
        let bias = analyze_bias(&[]);
        assert_eq!(bias, BiasSummary::default());
    }
}
