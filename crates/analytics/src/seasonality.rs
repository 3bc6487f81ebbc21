//! Pure seasonality computations over a daily price series.
//!
//! Every function here is stateless: inputs in, values out. Missing daily
//! returns (the first observation, or a zero previous close) are `None` and
//! are ignored by every aggregate.

use crate::error::AnalyticsError;
use chrono::{Datelike, NaiveDate};
use core_types::{CompoundPolicy, PriceSeries};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Mean daily return (in percent) keyed by calendar month, 1 = January.
/// Only months that have at least one return are present.
pub type MonthlyAverages = BTreeMap<u32, Decimal>;

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Months split by the sign of their average return.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavorableMonths {
    /// Months with a strictly positive average, ascending.
    pub buy: Vec<u32>,
    /// Months with a zero or negative average, ascending.
    pub sell: Vec<u32>,
}

/// Result of the first-of-month compound simulation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompoundOutcome {
    pub factor: Decimal,
    pub return_pct: Decimal,
    /// Number of price ratios multiplied into `factor`.
    pub steps: usize,
}

/// Percentage change from the previous close, one entry per observation.
///
/// The first entry is always `None`, as is any entry whose previous close is zero.
pub fn daily_returns(series: &PriceSeries) -> Vec<Option<Decimal>> {
    let closes: Vec<Decimal> = series.closes().collect();
    let mut returns = Vec::with_capacity(closes.len());
    returns.push(None);
    returns.extend(closes.windows(2).map(|w| pct_change(w[0], w[1])));
    returns
}

fn pct_change(previous: Decimal, current: Decimal) -> Option<Decimal> {
    if previous.is_zero() {
        return None;
    }
    let change = current.checked_sub(previous)?;
    change.checked_div(previous)?.checked_mul(HUNDRED)
}

/// Groups returns by the calendar month of their date, across all years, and
/// averages each group ignoring missing values.
pub fn monthly_average(
    returns: &[Option<Decimal>],
    dates: &[NaiveDate],
) -> Result<MonthlyAverages, AnalyticsError> {
    if returns.len() != dates.len() {
        return Err(AnalyticsError::LengthMismatch {
            returns: returns.len(),
            dates: dates.len(),
        });
    }

    let mut groups: BTreeMap<u32, (Decimal, u32)> = BTreeMap::new();
    for (ret, date) in returns.iter().zip(dates) {
        let Some(ret) = ret else { continue };
        let entry = groups.entry(date.month()).or_insert((Decimal::ZERO, 0));
        entry.0 = entry
            .0
            .checked_add(*ret)
            .ok_or_else(|| AnalyticsError::Calculation(format!("overflow summing month {}", date.month())))?;
        entry.1 += 1;
    }

    Ok(groups
        .into_iter()
        .map(|(month, (sum, count))| (month, sum / Decimal::from(count)))
        .collect())
}

/// Buy months have a strictly positive average; everything else, including an
/// exact zero, is a sell month.
pub fn classify_favorable_months(monthly: &MonthlyAverages) -> FavorableMonths {
    let (buy, sell): (Vec<_>, Vec<_>) = monthly.iter().partition(|(_, avg)| **avg > Decimal::ZERO);
    FavorableMonths {
        buy: buy.into_iter().map(|(m, _)| *m).collect(),
        sell: sell.into_iter().map(|(m, _)| *m).collect(),
    }
}

/// Sum of the average returns of the buy months.
///
/// This treats every favorable month as an independent single-month trade
/// earning its historical average; it is not a compounding simulation.
pub fn simple_return(monthly: &MonthlyAverages, buy_months: &[u32]) -> Result<Decimal, AnalyticsError> {
    buy_months
        .iter()
        .filter_map(|m| monthly.get(m))
        .try_fold(Decimal::ZERO, |acc, avg| {
            acc.checked_add(*avg)
                .ok_or_else(|| AnalyticsError::Calculation("simple return overflow".to_string()))
        })
}

/// Profit on `notional` for a percentage return.
pub fn profit_from_pct(notional: Decimal, pct: Decimal) -> Result<Decimal, AnalyticsError> {
    notional
        .checked_mul(pct)
        .and_then(|v| v.checked_div(HUNDRED))
        .ok_or_else(|| AnalyticsError::Calculation(format!("profit of {pct}% on {notional} overflows")))
}

/// First observed close of every (year, month) present in the series.
pub fn first_of_month_prices(series: &PriceSeries) -> BTreeMap<(i32, u32), Decimal> {
    let mut firsts = BTreeMap::new();
    for point in series.points() {
        firsts
            .entry((point.date.year(), point.date.month()))
            .or_insert(point.close);
    }
    firsts
}

/// Simulates holding through the buy months using first-of-month prices.
///
/// Qualifying observations are the first closes of each (year, month) whose
/// month is a buy month, in date order. Years with fewer than two qualifying
/// observations are left out entirely. With
/// [`CompoundPolicy::CarryAcrossYears`] consecutive qualifying observations
/// are linked even across a year boundary; with
/// [`CompoundPolicy::ResetEachYear`] only observations in the same year are
/// linked. Either way the factor accumulates over the whole period.
/// A ratio whose previous price is zero is skipped.
pub fn compound_return(
    series: &PriceSeries,
    buy_months: &[u32],
    policy: CompoundPolicy,
) -> Result<CompoundOutcome, AnalyticsError> {
    let buy: BTreeSet<u32> = buy_months.iter().copied().collect();

    let mut by_year: BTreeMap<i32, Vec<Decimal>> = BTreeMap::new();
    for ((year, month), price) in first_of_month_prices(series) {
        if buy.contains(&month) {
            by_year.entry(year).or_default().push(price);
        }
    }
    by_year.retain(|_, prices| prices.len() >= 2);

    let mut factor = Decimal::ONE;
    let mut steps = 0usize;
    let mut previous: Option<Decimal> = None;

    for (year, prices) in by_year {
        if policy == CompoundPolicy::ResetEachYear {
            previous = None;
        }
        for price in prices {
            if let Some(prev) = previous {
                if !prev.is_zero() {
                    let ratio = price
                        .checked_div(prev)
                        .ok_or_else(|| AnalyticsError::Calculation(format!("ratio overflow in {year}")))?;
                    factor = factor
                        .checked_mul(ratio)
                        .ok_or_else(|| AnalyticsError::Calculation(format!("compound factor overflow in {year}")))?;
                    steps += 1;
                }
            }
            previous = Some(price);
        }
    }

    let return_pct = (factor - Decimal::ONE)
        .checked_mul(HUNDRED)
        .ok_or_else(|| AnalyticsError::Calculation("compound return overflow".to_string()))?;

    Ok(CompoundOutcome {
        factor,
        return_pct,
        steps,
    })
}

/// Buy months on or after `current_month`, ascending. There is no wrap-around:
/// January is never "upcoming" once the year has started.
///
/// Fails when `current_month` or any buy month lies outside 1..=12.
pub fn upcoming_favorable_months(buy_months: &[u32], current_month: u32) -> Result<Vec<u32>, AnalyticsError> {
    if let Some(bad) = std::iter::once(&current_month)
        .chain(buy_months)
        .find(|m| !(1..=12).contains(*m))
    {
        return Err(AnalyticsError::InvalidMonth(*bad));
    }
    let mut upcoming: Vec<u32> = buy_months.iter().copied().filter(|m| *m >= current_month).collect();
    upcoming.sort_unstable();
    upcoming.dedup();
    Ok(upcoming)
}

/// Year × month grid of mean daily returns. A cell exists only where that
/// (year, month) has at least one return.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heatmap {
    pub cells: BTreeMap<i32, BTreeMap<u32, Decimal>>,
}

impl Heatmap {
    pub fn years(&self) -> impl Iterator<Item = i32> + '_ {
        self.cells.keys().copied()
    }

    pub fn get(&self, year: i32, month: u32) -> Option<Decimal> {
        self.cells.get(&year).and_then(|row| row.get(&month)).copied()
    }
}

pub fn heatmap(series: &PriceSeries) -> Result<Heatmap, AnalyticsError> {
    let returns = daily_returns(series);
    let mut sums: BTreeMap<(i32, u32), (Decimal, u32)> = BTreeMap::new();
    for (ret, point) in returns.iter().zip(series.points()) {
        let Some(ret) = ret else { continue };
        let entry = sums
            .entry((point.date.year(), point.date.month()))
            .or_insert((Decimal::ZERO, 0));
        entry.0 = entry.0.checked_add(*ret).ok_or_else(|| {
            AnalyticsError::Calculation(format!(
                "overflow summing {}-{:02}",
                point.date.year(),
                point.date.month()
            ))
        })?;
        entry.1 += 1;
    }

    let mut cells: BTreeMap<i32, BTreeMap<u32, Decimal>> = BTreeMap::new();
    for ((year, month), (sum, count)) in sums {
        cells.entry(year).or_default().insert(month, sum / Decimal::from(count));
    }
    Ok(Heatmap { cells })
}
