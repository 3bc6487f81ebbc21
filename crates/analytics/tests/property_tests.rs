//! Property-based tests for the seasonality computations.
//!
//! These tests verify invariants that should hold for all valid inputs,
//! using randomly generated price series.

use analytics::seasonality::{
    classify_favorable_months, daily_returns, monthly_average, profit_from_pct, simple_return,
};
use chrono::{Duration, NaiveDate};
use core_types::{PricePoint, PriceSeries};
use proptest::prelude::*;
use rust_decimal::Decimal;

fn make_series(cents: &[i64]) -> PriceSeries {
    let base = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
    let points = cents
        .iter()
        .enumerate()
        .map(|(i, c)| PricePoint::new(base + Duration::days(i as i64 * 3), Decimal::new(*c, 2)))
        .collect();
    PriceSeries::new(points).unwrap()
}

/// Strictly positive prices between 0.01 and 10000.00.
fn prices_strategy(min_len: usize, max_len: usize) -> impl Strategy<Value = Vec<i64>> {
    prop::collection::vec(1i64..1_000_000, min_len..max_len)
}

/// (month, day, return in hundredths of a percent) triples; days stop at 28 so
/// every month/day pair exists in every year.
fn observations_strategy() -> impl Strategy<Value = Vec<(u32, u32, i64)>> {
    prop::collection::vec((1u32..=12, 1u32..=28, -5_000i64..5_000), 1..120)
}

proptest! {
    #[test]
    fn daily_returns_match_the_definition(cents in prices_strategy(1, 150)) {
        let series = make_series(&cents);
        let returns = daily_returns(&series);
        prop_assert_eq!(returns.len(), cents.len());
        prop_assert!(returns[0].is_none());

        let tolerance = Decimal::new(1, 18);
        for i in 1..cents.len() {
            let prev = Decimal::new(cents[i - 1], 2);
            let cur = Decimal::new(cents[i], 2);
            let expected = (cur / prev - Decimal::ONE) * Decimal::ONE_HUNDRED;
            let actual = returns[i].expect("positive prices always give a return");
            prop_assert!((actual - expected).abs() < tolerance, "{} vs {}", actual, expected);
        }
    }

    #[test]
    fn year_distribution_does_not_matter(
        obs in observations_strategy(),
        years_a in prop::collection::vec(1990i32..2030, 120),
        years_b in prop::collection::vec(1990i32..2030, 120),
    ) {
        let returns: Vec<Option<Decimal>> = obs.iter().map(|(_, _, r)| Some(Decimal::new(*r, 2))).collect();
        let dates_with = |years: &[i32]| -> Vec<NaiveDate> {
            obs.iter()
                .zip(years)
                .map(|((m, day, _), y)| NaiveDate::from_ymd_opt(*y, *m, *day).unwrap())
                .collect()
        };

        let a = monthly_average(&returns, &dates_with(&years_a)).unwrap();
        let b = monthly_average(&returns, &dates_with(&years_b)).unwrap();
        prop_assert_eq!(&a, &b);

        // Each average is the plain mean of that month's values.
        for (month, avg) in &a {
            let values: Vec<Decimal> = obs
                .iter()
                .filter(|(m, _, _)| m == month)
                .map(|(_, _, r)| Decimal::new(*r, 2))
                .collect();
            let mean = values.iter().copied().sum::<Decimal>() / Decimal::from(values.len());
            prop_assert_eq!(*avg, mean);
        }
    }

    #[test]
    fn classification_is_a_total_partition(cents in prices_strategy(2, 400)) {
        let series = make_series(&cents);
        let returns = daily_returns(&series);
        let dates: Vec<NaiveDate> = series.dates().collect();
        let monthly = monthly_average(&returns, &dates).unwrap();
        let favorable = classify_favorable_months(&monthly);

        prop_assert_eq!(favorable.buy.len() + favorable.sell.len(), monthly.len());
        for (month, avg) in &monthly {
            let in_buy = favorable.buy.contains(month);
            let in_sell = favorable.sell.contains(month);
            prop_assert!(in_buy != in_sell);
            prop_assert_eq!(in_buy, *avg > Decimal::ZERO);
        }

        let expected: Decimal = favorable.buy.iter().map(|m| monthly[m]).sum();
        let pct = simple_return(&monthly, &favorable.buy).unwrap();
        prop_assert_eq!(pct, expected);
        let notional = Decimal::from(100_000);
        prop_assert_eq!(profit_from_pct(notional, pct).unwrap(), notional * pct / Decimal::ONE_HUNDRED);
    }
}
