use chrono::NaiveDateTime;
use core_types::{AnalysisError, ExitTrade, Result};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;

/// The equity state after one trade.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DrawdownPoint {
    pub timestamp: NaiveDateTime,
    pub cumulative_pnl: Decimal,
    /// Highest cumulative P&L seen so far, this point included.
    pub running_max: Decimal,
    /// `cumulative_pnl - running_max`, never positive.
    pub drawdown_abs: Decimal,
    /// `drawdown_abs / running_max * 100`. `None` while the running max is zero
    /// or when the ratio does not fit a `Decimal`.
    pub drawdown_pct: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DrawdownSummary {
    pub points: Vec<DrawdownPoint>,
    /// The most negative absolute drawdown.
    pub max_drawdown_abs: Decimal,
    /// The most negative defined percentage drawdown.
    pub max_drawdown_pct: Option<f64>,
    pub current_drawdown_abs: Decimal,
    pub current_drawdown_pct: Option<f64>,
}

/// Builds the cumulative P&L and drawdown curve.
///
/// `trades` must already be sorted by timestamp; the engine does not re-sort
/// and rejects out-of-order input with `UnsortedInput`.
pub fn compute_drawdown(trades: &[ExitTrade]) -> Result<DrawdownSummary> {
    if let Some(index) = trades
        .windows(2)
        .position(|pair| pair[1].timestamp < pair[0].timestamp)
    {
        return Err(AnalysisError::UnsortedInput { index: index + 1 });
    }

    let mut points = Vec::with_capacity(trades.len());
    let mut cumulative_pnl = Decimal::ZERO;
    let mut running_max: Option<Decimal> = None;

    for trade in trades {
        cumulative_pnl += trade.pnl;
        let peak = running_max.map_or(cumulative_pnl, |max| max.max(cumulative_pnl));
        running_max = Some(peak);

        let drawdown_abs = cumulative_pnl - peak;
        let drawdown_pct = drawdown_abs
            .checked_div(peak)
            .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
            .and_then(|pct| pct.to_f64());

        points.push(DrawdownPoint {
            timestamp: trade.timestamp,
            cumulative_pnl,
            running_max: peak,
            drawdown_abs,
            drawdown_pct,
        });
    }

    let max_drawdown_abs = points
        .iter()
        .map(|p| p.drawdown_abs)
        .min()
        .unwrap_or(Decimal::ZERO);
    let max_drawdown_pct = points
        .iter()
        .filter_map(|p| p.drawdown_pct)
        .fold(None, |min: Option<f64>, pct| Some(min.map_or(pct, |m| m.min(pct))));
    let (current_drawdown_abs, current_drawdown_pct) = points
        .last()
        .map_or((Decimal::ZERO, None), |p| (p.drawdown_abs, p.drawdown_pct));

    Ok(DrawdownSummary {
        points,
        max_drawdown_abs,
        max_drawdown_pct,
        current_drawdown_abs,
        current_drawdown_pct,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::trade;
    use approx::assert_relative_eq;
    use rust_decimal_macros::dec;

    #[test]
    fn single_winning_trade_has_no_drawdown() {
        let trades = vec![trade("Exit Long", "2024-01-01 10:00", dec!(100), dec!(1))];
        let summary = compute_drawdown(&trades).unwrap();

        let point = &summary.points[0];
        assert_eq!(point.running_max, dec!(100));
        assert_eq!(point.drawdown_abs, Decimal::ZERO);
        assert_eq!(point.drawdown_pct, Some(0.0));
    }

    #[test]
    fn tracks_peak_and_trough() {
        let trades = vec![
            trade("Exit Long", "2024-01-01 10:00", dec!(100), dec!(1)),
            trade("Exit Long", "2024-01-02 10:00", dec!(-40), dec!(-0.4)),
            trade("Exit Long", "2024-01-03 10:00", dec!(20), dec!(0.2)),
        ];
        let summary = compute_drawdown(&trades).unwrap();

        let maxes: Vec<Decimal> = summary.points.iter().map(|p| p.running_max).collect();
        assert_eq!(maxes, vec![dec!(100), dec!(100), dec!(100)]);
        assert_eq!(summary.max_drawdown_abs, dec!(-40));
        assert_relative_eq!(summary.max_drawdown_pct.unwrap(), -40.0);
        assert_eq!(summary.current_drawdown_abs, dec!(-20));
        assert_relative_eq!(summary.current_drawdown_pct.unwrap(), -20.0);
    }

    #[test]
    fn zero_running_max_leaves_percentage_undefined() {
        let trades = vec![
            trade("Exit Long", "2024-01-01 10:00", dec!(50), dec!(0.5)),
            trade("Exit Long", "2024-01-02 10:00", dec!(-50), dec!(-0.5)),
            trade("Exit Short", "2024-01-03 10:00", dec!(-50), dec!(-0.5)),
        ];
        // Start from a flat book so the first peak is zero.
        let flat = vec![trade("Exit Long", "2023-12-31 10:00", dec!(0), dec!(0))];
        let all: Vec<_> = flat.into_iter().chain(trades).collect();

        let summary = compute_drawdown(&all).unwrap();
        assert_eq!(summary.points[0].drawdown_pct, None);
        assert_eq!(summary.points[1].drawdown_pct, Some(0.0));
        assert_relative_eq!(summary.points[3].drawdown_pct.unwrap(), -200.0);
        assert_eq!(summary.max_drawdown_abs, dec!(-100));
    }

    #[test]
    fn losing_from_the_start_keeps_first_point_as_peak() {
        let trades = vec![
            trade("Exit Long", "2024-01-01 10:00", dec!(-10), dec!(-0.1)),
            trade("Exit Long", "2024-01-02 10:00", dec!(-10), dec!(-0.1)),
        ];
        let summary = compute_drawdown(&trades).unwrap();

        assert_eq!(summary.points[0].running_max, dec!(-10));
        assert_eq!(summary.points[0].drawdown_abs, Decimal::ZERO);
        assert_eq!(summary.points[1].drawdown_abs, dec!(-10));
    }

    #[test]
    fn overflowing_percentage_is_undefined() {
        let trades = vec![
            trade("Exit Long", "2024-01-01 10:00", dec!(0.0000000000000000000000000001), dec!(0)),
            trade("Exit Long", "2024-01-02 10:00", dec!(-70000000000000000000000000000), dec!(0)),
        ];
        let summary = compute_drawdown(&trades).unwrap();

        assert_eq!(summary.points[0].drawdown_pct, Some(0.0));
        assert_eq!(summary.points[1].drawdown_pct, None);
        assert!(summary.points[1].drawdown_abs < Decimal::ZERO);
        assert_eq!(summary.max_drawdown_pct, Some(0.0));
    }

    #[test]
    fn rejects_unsorted_input() {
        let trades = vec![
            trade("Exit Long", "2024-01-02 10:00", dec!(1), dec!(0)),
            trade("Exit Long", "2024-01-01 10:00", dec!(1), dec!(0)),
        ];
        assert_eq!(
            compute_drawdown(&trades),
            Err(AnalysisError::UnsortedInput { index: 1 })
        );
    }

    #[test]
    fn empty_input_yields_empty_curve() {
        let summary = compute_drawdown(&[]).unwrap();
        assert!(summary.points.is_empty());
        assert_eq!(summary.max_drawdown_abs, Decimal::ZERO);
        assert_eq!(summary.max_drawdown_pct, None);
        assert_eq!(summary.current_drawdown_pct, None);
    }
}
