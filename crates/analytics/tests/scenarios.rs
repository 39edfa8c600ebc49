use analytics::engine::DAILY_METRICS;
use analytics::{
    AnalysisSettings, AnalyticsEngine, BestSlot, BucketKey, GroupKey, GroupSummary,
    RecommendationFilter, TruthMatrix, TruthVerdict, aggregate, analyze_bias, compute_drawdown,
    derive_trades, filter_exits, recommend,
};
use approx::assert_relative_eq;
use chrono::NaiveDate;
use core_types::{DayOfWeek, ExitTrade, MonthName, TradeEvent, parse_timestamp};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn event(row: usize, kind: &str, timestamp: &str, pnl: Decimal, pct: Decimal) -> TradeEvent {
    TradeEvent {
        row,
        kind: kind.to_string(),
        timestamp: parse_timestamp(timestamp).unwrap(),
        net_pnl_value: Some(pnl),
        net_pnl_pct: Some(pct),
    }
}

fn exit_trades(events: &[TradeEvent]) -> Vec<ExitTrade> {
    let exits = filter_exits(events).unwrap();
    derive_trades(&exits).unwrap()
}

fn three_trade_ledger() -> Vec<TradeEvent> {
    vec![
        event(1, "Entry Long", "2024-01-01 08:00", dec!(100), dec!(1.0)),
        event(2, "Exit Long", "2024-01-01 12:00", dec!(100), dec!(1.0)),
        event(3, "Entry Short", "2024-01-02 08:00", dec!(-50), dec!(-0.5)),
        event(4, "Exit Short", "2024-01-02 12:00", dec!(-50), dec!(-0.5)),
        event(5, "Entry Long", "2024-01-02 13:00", dec!(30), dec!(0.3)),
        event(6, "Exit Long", "2024-01-02 17:00", dec!(30), dec!(0.3)),
    ]
}

/// A larger ledger spanning several months, weekdays and both directions.
fn mixed_ledger() -> Vec<TradeEvent> {
    let pnls = [
        dec!(120), dec!(-40), dec!(15), dec!(-75), dec!(60), dec!(0), dec!(-5), dec!(210),
        dec!(-130), dec!(45), dec!(-20), dec!(80),
    ];
    let start = NaiveDate::from_ymd_opt(2024, 1, 29).unwrap();

    pnls.iter()
        .enumerate()
        .map(|(i, pnl)| {
            let day = start + chrono::Days::new(i as u64 * 3);
            let kind = match i % 3 {
                0 => "Exit Long",
                1 => "Exit Short",
                _ => "Exit Signal",
            };
            event(
                i + 1,
                kind,
                &format!("{} 10:00", day.format("%Y-%m-%d")),
                *pnl,
                *pnl / dec!(100),
            )
        })
        .collect()
}

#[test]
fn daily_summary_matches_worked_example() {
    let trades = exit_trades(&three_trade_ledger());
    let daily = aggregate(&trades, GroupKey::Date, DAILY_METRICS);

    let day = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    let row = daily.get(&BucketKey::Date(day)).unwrap();
    assert_eq!(row.count, 2);
    assert_eq!(row.total_pnl, dec!(-20));
    assert_relative_eq!(row.win_rate, 50.0);
}

#[test]
fn daily_counts_sum_to_trade_count() {
    let trades = exit_trades(&mixed_ledger());
    let daily = aggregate(&trades, GroupKey::Date, DAILY_METRICS);

    assert_eq!(daily.total_count(), trades.len());
}

#[test]
fn every_grouping_partitions_the_trades() {
    let trades = exit_trades(&mixed_ledger());
    for key in [
        GroupKey::Date,
        GroupKey::Month,
        GroupKey::Weekday,
        GroupKey::MonthWeekday,
    ] {
        assert_eq!(aggregate(&trades, key, &[]).total_count(), trades.len(), "{key:?}");
    }
}

#[test]
fn aggregation_is_idempotent() {
    let trades = exit_trades(&mixed_ledger());
    let first = aggregate(&trades, GroupKey::MonthWeekday, DAILY_METRICS);
    let second = aggregate(&trades, GroupKey::MonthWeekday, DAILY_METRICS);

    assert_eq!(first, second);
}

#[test]
fn drawdown_invariants_hold() {
    let mut trades = exit_trades(&mixed_ledger());
    trades.sort_by_key(|t| t.timestamp);
    let summary = compute_drawdown(&trades).unwrap();

    assert!(summary.points.iter().all(|p| p.drawdown_abs <= Decimal::ZERO));
    assert!(
        summary
            .points
            .windows(2)
            .all(|w| w[0].running_max <= w[1].running_max)
    );
    let deepest = summary.points.iter().map(|p| p.drawdown_abs).min().unwrap();
    assert_eq!(summary.max_drawdown_abs, deepest);
}

#[test]
fn single_trade_drawdown() {
    let ledger = vec![event(1, "Exit Long", "2024-01-01 10:00", dec!(100), dec!(1))];
    let summary = compute_drawdown(&exit_trades(&ledger)).unwrap();

    assert_eq!(summary.points[0].drawdown_abs, Decimal::ZERO);
    assert_eq!(summary.points[0].running_max, dec!(100));
    assert_eq!(summary.points[0].drawdown_pct, Some(0.0));
}

#[test]
fn bias_percentages_never_exceed_hundred() {
    let trades = exit_trades(&mixed_ledger());
    let bias = analyze_bias(&trades);

    // A third of the ledger is "Exit Signal", which names no side.
    assert_eq!(bias.unknown_count, 4);
    assert!(bias.long_pct + bias.short_pct < 100.0);

    let sided = exit_trades(&three_trade_ledger());
    let bias = analyze_bias(&sided);
    assert_relative_eq!(bias.long_pct + bias.short_pct, 100.0);
}

fn slot(month: MonthName, total_pnl: Decimal, win_rate: f64, count: usize) -> BestSlot {
    BestSlot {
        month,
        weekday: DayOfWeek::Wednesday,
        summary: GroupSummary {
            key: BucketKey::MonthWeekday(month, DayOfWeek::Wednesday),
            total_pnl,
            mean_pnl: total_pnl / Decimal::from(count),
            count,
            std_pnl: None,
            total_pnl_pct: Decimal::ZERO,
            mean_pnl_pct: Decimal::ZERO,
            std_pnl_pct: None,
            win_rate,
            long_pct: 100.0,
        },
    }
}

#[test]
fn recommendation_list_keeps_only_passing_months() {
    let month_a = slot(MonthName::May, dec!(500), 60.0, 8);
    let month_b = slot(MonthName::June, dec!(200), 40.0, 3);

    let picks = recommend(&[month_a, month_b], &RecommendationFilter::default());
    assert_eq!(picks.len(), 1);
    assert_eq!(picks[0].month, MonthName::May);
}

#[test]
fn truth_matrix_is_total() {
    let engine = AnalyticsEngine::new(AnalysisSettings::default());
    let first = engine.analyze("GBPJPY", &mixed_ledger()).unwrap();
    let second = engine.analyze("EURUSD", &three_trade_ledger()).unwrap();

    let matrix = TruthMatrix::build(
        [
            (first.instrument.as_str(), &first.weekday),
            (second.instrument.as_str(), &second.weekday),
        ],
        50.0,
    );

    for analysis in [&first, &second] {
        for day in DayOfWeek::ALL {
            let verdict = matrix.verdict(&analysis.instrument, day).unwrap();
            let traded = analysis.weekday.get(&BucketKey::Weekday(day)).is_some();
            assert_eq!(verdict == TruthVerdict::NotApplicable, !traded, "{day}");
        }
    }

    // The three-trade ledger only trades Monday and Tuesday.
    assert_eq!(
        matrix.verdict("EURUSD", DayOfWeek::Sunday),
        Some(TruthVerdict::NotApplicable)
    );
    assert_eq!(matrix.verdict("EURUSD", DayOfWeek::Monday), Some(TruthVerdict::Yes));
    assert_eq!(matrix.verdict("EURUSD", DayOfWeek::Tuesday), Some(TruthVerdict::No));
}

#[test]
fn engine_rejects_missing_pnl_on_exit() {
    let mut ledger = three_trade_ledger();
    ledger[3].net_pnl_value = None;

    let err = AnalyticsEngine::default().analyze("GBPJPY", &ledger).unwrap_err();
    assert_eq!(
        err,
        core_types::AnalysisError::MissingValue {
            row: 4,
            column: "net_pnl_value"
        }
    );
}
