use crate::seasonality::{FavorableMonths, Heatmap, MonthlyAverages};
use chrono::NaiveDate;
use core_types::CompoundPolicy;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Descriptive statistics of the analysed closes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceSummary {
    pub observations: usize,
    pub first_date: NaiveDate,
    pub last_date: NaiveDate,
    pub first_close: Decimal,
    pub last_close: Decimal,
    pub min_close: Decimal,
    pub max_close: Decimal,
    /// Buy-and-hold return over the whole series; `None` when the first close is zero.
    pub total_return_pct: Option<Decimal>,
}

/// Hypothetical outcome of buying only in favorable months.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategyOutcome {
    pub notional: Decimal,
    pub simple_return_pct: Decimal,
    pub simple_profit: Decimal,
    pub compound_policy: CompoundPolicy,
    pub compound_factor: Decimal,
    pub compound_return_pct: Decimal,
    pub compound_profit: Decimal,
    pub compound_steps: usize,
}

/// Everything derived from one price series in one analysis pass.
///
/// This is the data transfer object handed to the reporting layer; nothing in
/// it is updated after construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonalityReport {
    /// Ticker or file name the series came from.
    pub label: String,
    pub summary: PriceSummary,
    pub daily_returns: Vec<(NaiveDate, Option<Decimal>)>,
    pub monthly: MonthlyAverages,
    pub favorable: FavorableMonths,
    /// The month used as "now" for `upcoming`.
    pub current_month: u32,
    pub upcoming: Vec<u32>,
    pub strategy: StrategyOutcome,
    pub heatmap: Heatmap,
}
