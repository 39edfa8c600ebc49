use core_types::{AnalysisError, Result, TradeEvent};

/// Narrows the ledger to the exit rows, one per completed trade.
///
/// An empty result is terminal for the instrument: there is nothing to analyze.
pub fn filter_exits(events: &[TradeEvent]) -> Result<Vec<&TradeEvent>> {
    let exits: Vec<&TradeEvent> = events.iter().filter(|e| e.is_exit()).collect();
    if exits.is_empty() {
        return Err(AnalysisError::EmptyResult);
    }

    tracing::debug!(
        total_events = events.len(),
        exit_events = exits.len(),
        "Filtered exit trades."
    );
    Ok(exits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn event(row: usize, kind: &str) -> TradeEvent {
        TradeEvent {
            row,
            kind: kind.to_string(),
            timestamp: NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap(),
            net_pnl_value: Some(dec!(10)),
            net_pnl_pct: Some(dec!(0.1)),
        }
    }

    #[test]
    fn keeps_only_exit_rows() {
        let events = vec![
            event(1, "Entry Long"),
            event(2, "Exit Long"),
            event(3, "Entry Short"),
            event(4, "Exit Short"),
        ];

        let exits = filter_exits(&events).unwrap();
        let rows: Vec<usize> = exits.iter().map(|e| e.row).collect();
        assert_eq!(rows, vec![2, 4]);
    }

    #[test]
    fn no_exits_is_an_empty_result() {
        let events = vec![event(1, "Entry Long"), event(2, "exit long")];
        assert_eq!(filter_exits(&events), Err(AnalysisError::EmptyResult));
    }
}
