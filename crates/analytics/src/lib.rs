//! # Backtest Analytics Engine
//!
//! Turns an exported trade ledger into time-bucketed performance aggregates,
//! a drawdown curve, long/short bias and the weekday truth table.
//!
//! Every function here is a pure computation over an in-memory table. File
//! discovery, loading and rendering live in the `ledger` crate and the app.
//!
//! Pipeline: [`filter_exits`] → [`derive_trades`] → {[`aggregate`],
//! [`compute_drawdown`], [`analyze_bias`]} → [`best_day_per_month`] /
//! [`TruthMatrix`]. [`AnalyticsEngine`] runs the whole pipeline for one
//! instrument.

pub mod aggregate;
pub mod best_slot;
pub mod bias;
pub mod derive;
pub mod drawdown;
pub mod engine;
pub mod filter;
pub mod truth;
pub mod types;

pub use aggregate::{
    BucketKey, Field, GroupKey, GroupSummary, GroupTable, Metric, MetricValue, Statistic,
    aggregate, win_rates,
};
pub use best_slot::{BestSlot, RecommendationFilter, best_day_per_month, recommend};
pub use bias::{BiasSummary, analyze_bias};
pub use derive::derive_trades;
pub use drawdown::{DrawdownPoint, DrawdownSummary, compute_drawdown};
pub use engine::AnalyticsEngine;
pub use filter::filter_exits;
pub use truth::{TruthMatrix, TruthRow, TruthVerdict};
pub use types::{AnalysisSettings, InstrumentAnalysis};
