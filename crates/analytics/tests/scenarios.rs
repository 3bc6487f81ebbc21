//! End-to-end scenarios for the seasonality pipeline.

use analytics::{AnalysisPolicy, SeasonalityAnalyzer};
use chrono::{Datelike, Duration, NaiveDate};
use core_types::{CompoundPolicy, PricePoint, PriceSeries};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

/// Every calendar day of `month`, linearly from `from` to `to`.
fn linear_month(year: i32, month: u32, from: Decimal, to: Decimal) -> Vec<PricePoint> {
    let first = d(year, month, 1);
    let days: Vec<NaiveDate> = (0..)
        .map(|i| first + Duration::days(i))
        .take_while(|date| date.month() == month)
        .collect();
    let step = (to - from) / Decimal::from(days.len() - 1);
    days.into_iter()
        .enumerate()
        .map(|(i, date)| PricePoint::new(date, from + step * Decimal::from(i)))
        .collect()
}

fn rising_january_falling_february() -> PriceSeries {
    let mut points = Vec::new();
    for year in [2022, 2023] {
        points.extend(linear_month(year, 1, dec!(100), dec!(110)));
        points.extend(linear_month(year, 2, dec!(100), dec!(90)));
    }
    PriceSeries::new(points).unwrap()
}

#[test]
fn january_is_a_buy_and_february_a_sell() {
    let report = SeasonalityAnalyzer::default()
        .analyze("SCENARIO", &rising_january_falling_february(), d(2024, 3, 10))
        .unwrap();

    assert!(report.monthly[&1] > Decimal::ZERO);
    assert!(report.monthly[&2] < Decimal::ZERO);
    assert_eq!(report.favorable.buy, vec![1]);
    assert_eq!(report.favorable.sell, vec![2]);
    // From March onward January is already behind us.
    assert_eq!(report.current_month, 3);
    assert!(report.upcoming.is_empty());
    // Only data for two months, so the twelve-month table has holes.
    assert_eq!(report.monthly.len(), 2);
}

#[test]
fn january_is_upcoming_at_the_start_of_the_year() {
    let report = SeasonalityAnalyzer::default()
        .analyze("SCENARIO", &rising_january_falling_february(), d(2024, 1, 1))
        .unwrap();
    assert_eq!(report.upcoming, vec![1]);
}

#[test]
fn lone_favorable_month_never_compounds() {
    let series = rising_january_falling_february();
    let strategy_for = |policy| {
        let analyzer = SeasonalityAnalyzer::new(AnalysisPolicy {
            notional: dec!(100000),
            compound_policy: policy,
        });
        let report = analyzer.analyze("S", &series, d(2024, 1, 1)).unwrap();
        report.strategy
    };

    // With only January favorable, each year has one qualifying month and
    // contributes nothing, whatever the policy.
    let carry = strategy_for(CompoundPolicy::CarryAcrossYears);
    let reset = strategy_for(CompoundPolicy::ResetEachYear);
    assert_eq!(carry.compound_steps, 0);
    assert_eq!(reset.compound_steps, 0);
    assert_eq!(carry.compound_profit, Decimal::ZERO);
    assert_eq!(carry.simple_profit, carry.notional * carry.simple_return_pct / dec!(100));
}

#[test]
fn heatmap_has_a_row_per_year() {
    let report = SeasonalityAnalyzer::default()
        .analyze("S", &rising_january_falling_february(), d(2024, 1, 1))
        .unwrap();
    let years: Vec<i32> = report.heatmap.years().collect();
    assert_eq!(years, vec![2022, 2023]);
    assert!(report.heatmap.get(2023, 1).unwrap() > Decimal::ZERO);
    assert!(report.heatmap.get(2022, 2).unwrap() < Decimal::ZERO);
}
