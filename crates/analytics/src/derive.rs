use chrono::Datelike;
use core_types::{
    AnalysisError, DayOfWeek, Direction, ExitTrade, MonthName, MonthPeriod, Result, TradeEvent,
};
use rust_decimal::Decimal;

/// Attaches the win flag, calendar keys and direction to each exit row.
///
/// Row count is preserved. A missing P&L value fails the whole batch, since
/// dropping the row would silently skew every aggregate.
pub fn derive_trades(exits: &[&TradeEvent]) -> Result<Vec<ExitTrade>> {
    let trades = exits
        .iter()
        .map(|event| derive_trade(event))
        .collect::<Result<Vec<_>>>()?;

    let ambiguous = trades.iter().filter(|t| t.ambiguous_direction).count();
    if ambiguous > 0 {
        tracing::warn!(
            ambiguous,
            "Some exit types name both long and short; classified as unknown direction."
        );
    }

    Ok(trades)
}

fn derive_trade(event: &TradeEvent) -> Result<ExitTrade> {
    let pnl = event.net_pnl_value.ok_or(AnalysisError::MissingValue {
        row: event.row,
        column: "net_pnl_value",
    })?;
    let pnl_pct = event.net_pnl_pct.ok_or(AnalysisError::MissingValue {
        row: event.row,
        column: "net_pnl_pct",
    })?;
    let date = event.timestamp.date();

    Ok(ExitTrade {
        row: event.row,
        kind: event.kind.clone(),
        timestamp: event.timestamp,
        pnl,
        pnl_pct,
        is_win: pnl > Decimal::ZERO,
        date,
        weekday: DayOfWeek::of(date),
        month_period: MonthPeriod::of(date),
        month_name: MonthName::of(date),
        year: date.year(),
        direction: Direction::from_kind(&event.kind),
        ambiguous_direction: Direction::is_ambiguous(&event.kind),
    })
}
