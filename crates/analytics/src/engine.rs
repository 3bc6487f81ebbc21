use crate::error::AnalyticsError;
use crate::report::{PriceSummary, SeasonalityReport, StrategyOutcome};
use crate::seasonality::{
    MonthlyAverages, classify_favorable_months, compound_return, daily_returns, heatmap, monthly_average,
    profit_from_pct, simple_return, upcoming_favorable_months,
};
use chrono::{Datelike, NaiveDate};
use core_types::{CompoundPolicy, PriceSeries};
use rust_decimal::Decimal;

/// Inputs to the analysis that are not part of the price data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisPolicy {
    /// Capital the profit estimates are scaled to.
    pub notional: Decimal,
    pub compound_policy: CompoundPolicy,
}

impl Default for AnalysisPolicy {
    fn default() -> Self {
        Self {
            notional: Decimal::from(100_000),
            compound_policy: CompoundPolicy::default(),
        }
    }
}

/// A stateless calculator that turns a price series into a `SeasonalityReport`.
#[derive(Debug, Default)]
pub struct SeasonalityAnalyzer {
    policy: AnalysisPolicy,
}

impl SeasonalityAnalyzer {
    pub fn new(policy: AnalysisPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &AnalysisPolicy {
        &self.policy
    }

    /// The main entry point for the seasonality pipeline.
    ///
    /// # Arguments
    ///
    /// * `label` - Ticker or file name, carried into the report.
    /// * `series` - Daily closes, sorted with unique dates.
    /// * `today` - Reference date; its month decides which favorable months are upcoming.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `SeasonalityReport`, or `NotEnoughData` when
    /// the series yields no daily return at all.
    pub fn analyze(
        &self,
        label: &str,
        series: &PriceSeries,
        today: NaiveDate,
    ) -> Result<SeasonalityReport, AnalyticsError> {
        let returns = daily_returns(series);
        let dates: Vec<NaiveDate> = series.dates().collect();

        let monthly = monthly_average(&returns, &dates)?;
        if monthly.is_empty() {
            return Err(AnalyticsError::NotEnoughData(format!(
                "{label}: {} observation(s) produce no daily returns",
                series.len()
            )));
        }

        let favorable = classify_favorable_months(&monthly);
        let current_month = today.month();
        let upcoming = upcoming_favorable_months(&favorable.buy, current_month)?;
        let strategy = self.strategy_outcome(series, &monthly, &favorable.buy)?;
        let grid = heatmap(series)?;

        tracing::info!(
            %label,
            observations = series.len(),
            buy_months = ?favorable.buy,
            sell_months = ?favorable.sell,
            "Seasonality computed"
        );

        Ok(SeasonalityReport {
            label: label.to_string(),
            summary: summarize(series),
            daily_returns: dates.into_iter().zip(returns).collect(),
            monthly,
            favorable,
            current_month,
            upcoming,
            strategy,
            heatmap: grid,
        })
    }

    fn strategy_outcome(
        &self,
        series: &PriceSeries,
        monthly: &MonthlyAverages,
        buy_months: &[u32],
    ) -> Result<StrategyOutcome, AnalyticsError> {
        let notional = self.policy.notional;

        let simple_return_pct = simple_return(monthly, buy_months)?;
        let compound = compound_return(series, buy_months, self.policy.compound_policy)?;

        let compound_profit = notional
            .checked_mul(compound.factor)
            .and_then(|value| value.checked_sub(notional))
            .ok_or_else(|| AnalyticsError::Calculation("compound profit overflow".to_string()))?;

        Ok(StrategyOutcome {
            notional,
            simple_return_pct,
            simple_profit: profit_from_pct(notional, simple_return_pct)?,
            compound_policy: self.policy.compound_policy,
            compound_factor: compound.factor,
            compound_return_pct: compound.return_pct,
            compound_profit,
            compound_steps: compound.steps,
        })
    }
}

fn summarize(series: &PriceSeries) -> PriceSummary {
    let first = series.first();
    let last = series.last();
    let (min_close, max_close) = series
        .closes()
        .fold((first.close, first.close), |(lo, hi), c| (lo.min(c), hi.max(c)));

    // None when the first close is zero or the change does not fit a Decimal.
    let total_return_pct = last
        .close
        .checked_sub(first.close)
        .and_then(|change| change.checked_div(first.close))
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED));

    PriceSummary {
        observations: series.len(),
        first_date: first.date,
        last_date: last.date,
        first_close: first.close,
        last_close: last.close,
        min_close,
        max_close,
        total_return_pct,
    }
}
