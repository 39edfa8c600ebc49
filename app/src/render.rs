// In app/src/render.rs

use crate::batch::{BatchFailure, LedgerFile};
use analytics::aggregate::format_float;
use analytics::{BestSlot, BucketKey, GroupTable, InstrumentAnalysis, TruthMatrix, TruthVerdict};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color, ContentArrangement, Table};
use ledger::LedgerInspection;
use rust_decimal::Decimal;

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn pnl_cell(value: Decimal) -> Cell {
    let color = if value > Decimal::ZERO {
        Color::Green
    } else if value < Decimal::ZERO {
        Color::Red
    } else {
        Color::Reset
    };
    Cell::new(value.round_dp(2)).fg(color)
}

fn pct(value: f64) -> String {
    format!("{value:.1}%")
}

/// One line per instrument with the headline numbers.
pub fn summary_table(analyses: &[(LedgerFile, InstrumentAnalysis)]) -> Table {
    let mut table = new_table();
    table.set_header(vec![
        "Instrument",
        "Trades",
        "Total P&L",
        "Win Rate",
        "Max DD",
        "Max DD %",
        "Long",
        "Short",
    ]);

    for (_, analysis) in analyses {
        let drawdown = &analysis.drawdown;
        table.add_row(vec![
            Cell::new(&analysis.instrument),
            Cell::new(analysis.total_trades),
            pnl_cell(analysis.total_pnl),
            Cell::new(pct(analysis.win_rate)),
            pnl_cell(drawdown.max_drawdown_abs),
            Cell::new(drawdown.max_drawdown_pct.map(pct).unwrap_or_else(|| "-".to_string())),
            Cell::new(pct(analysis.bias.long_pct)),
            Cell::new(pct(analysis.bias.short_pct)),
        ]);
    }
    table
}

/// The best weekday of each month, marking the ones that pass the filter.
pub fn best_days_table(analysis: &InstrumentAnalysis) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Month", "Best Day", "Total P&L", "Win Rate", "Trades", "Pick"]);

    for slot in &analysis.best_day_per_month {
        let picked = is_recommended(slot, &analysis.recommendations);
        table.add_row(vec![
            Cell::new(slot.month),
            Cell::new(slot.weekday),
            pnl_cell(slot.summary.total_pnl),
            Cell::new(pct(slot.summary.win_rate)),
            Cell::new(slot.summary.count),
            if picked {
                Cell::new("YES").fg(Color::Green)
            } else {
                Cell::new("")
            },
        ]);
    }
    table
}

fn is_recommended(slot: &BestSlot, picks: &[BestSlot]) -> bool {
    picks.iter().any(|pick| pick.month == slot.month)
}

/// Any aggregate table, projected onto its own headers.
pub fn group_table(group: &GroupTable) -> Table {
    let mut table = new_table();
    table.set_header(group.headers());
    for row in &group.rows {
        table.add_row(group.record(row));
    }
    table
}

fn verdict_cell(verdict: TruthVerdict) -> Cell {
    let color = match verdict {
        TruthVerdict::Yes => Color::Green,
        TruthVerdict::ProfitOnly | TruthVerdict::WinRateOnly => Color::Yellow,
        TruthVerdict::No => Color::Red,
        TruthVerdict::NotApplicable => Color::DarkGrey,
    };
    Cell::new(verdict).fg(color)
}

pub fn truth_table(matrix: &TruthMatrix) -> Table {
    let mut table = new_table();
    let mut header = vec!["Weekday".to_string()];
    header.extend(matrix.instruments.iter().cloned());
    table.set_header(header);

    for row in &matrix.rows {
        let mut cells = vec![Cell::new(row.weekday)];
        cells.extend(row.verdicts.iter().copied().map(verdict_cell));
        table.add_row(cells);
    }
    table
}

/// The traded weekdays of one instrument with their long share and verdict.
pub fn weekday_detail_table(analysis: &InstrumentAnalysis, min_win_rate: f64) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Weekday", "Total P&L", "Win Rate", "Trades", "Long %", "Verdict"]);

    for row in analysis.weekday.rows.iter().filter(|row| row.count > 0) {
        let BucketKey::Weekday(weekday) = &row.key else {
            continue;
        };
        table.add_row(vec![
            Cell::new(weekday),
            pnl_cell(row.total_pnl),
            Cell::new(pct(row.win_rate)),
            Cell::new(row.count),
            Cell::new(pct(row.long_pct)),
            verdict_cell(TruthVerdict::classify(Some(row), min_win_rate)),
        ]);
    }
    table
}

pub fn inspection_table(inspection: &LedgerInspection) -> Table {
    let mut table = new_table();
    table.set_header(vec!["#", "Column"]);
    for (i, header) in inspection.headers.iter().enumerate() {
        let missing = inspection.missing_columns.contains(header);
        table.add_row(vec![Cell::new(i + 1), Cell::new(header).fg(if missing {
            Color::Red
        } else {
            Color::Reset
        })]);
    }
    table
}

pub fn failures_table(failures: &[BatchFailure]) -> Table {
    let mut table = new_table();
    table.set_header(vec!["File", "Error"]);
    for failure in failures {
        table.add_row(vec![
            Cell::new(failure.path.display()),
            Cell::new(&failure.error).fg(Color::Red),
        ]);
    }
    table
}

/// A short one-line description of the drawdown state.
pub fn drawdown_line(analysis: &InstrumentAnalysis) -> String {
    let drawdown = &analysis.drawdown;
    let current_pct = drawdown
        .current_drawdown_pct
        .map(|p| format!(" ({}%)", format_float(p)))
        .unwrap_or_default();
    format!(
        "Max drawdown {} | current drawdown {}{}",
        drawdown.max_drawdown_abs.round_dp(2),
        drawdown.current_drawdown_abs.round_dp(2),
        current_pct
    )
}
