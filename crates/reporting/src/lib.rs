//! # Reporting
//!
//! Presentation of a [`SeasonalityReport`]: terminal tables, the monthly
//! return export (CSV) and a plain-text document report. Nothing here
//! computes returns; all numbers come from `analytics`.

pub mod error;
pub mod export;
pub mod tables;

pub use error::ReportError;
pub use export::{read_monthly_csv, write_monthly_csv, write_monthly_csv_path, write_text_report};
pub use tables::{comparison_tables, heatmap_table, monthly_table, render_report, summary_table};

use analytics::{MonthlyAverages, SeasonalityReport};
use core_types::{MissingMonthPolicy, MonthSide, month_name};
use rust_decimal::Decimal;

/// One line of the twelve-month table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthlyRow {
    pub month: u32,
    pub month_name: &'static str,
    pub avg_return_pct: Decimal,
    pub side: MonthSide,
    /// `false` when the month had no data and was filled in as 0%.
    pub observed: bool,
}

/// Expands monthly averages into table rows according to `policy`.
///
/// With [`MissingMonthPolicy::Omit`] only months with data appear; with
/// [`MissingMonthPolicy::Zero`] all twelve months appear and months without
/// data show 0%, which also places them on the sell side.
pub fn monthly_rows(monthly: &MonthlyAverages, policy: MissingMonthPolicy) -> Vec<MonthlyRow> {
    (1..=12u32)
        .filter_map(|month| {
            let name = month_name(month)?;
            let (avg, observed) = match (monthly.get(&month), policy) {
                (Some(avg), _) => (*avg, true),
                (None, MissingMonthPolicy::Zero) => (Decimal::ZERO, false),
                (None, MissingMonthPolicy::Omit) => return None,
            };
            let side = if avg > Decimal::ZERO { MonthSide::Buy } else { MonthSide::Sell };
            Some(MonthlyRow {
                month,
                month_name: name,
                avg_return_pct: avg,
                side,
                observed,
            })
        })
        .collect()
}

/// Comma-separated month names, or "none".
pub fn month_list(months: &[u32]) -> String {
    if months.is_empty() {
        return "none".to_string();
    }
    months
        .iter()
        .filter_map(|m| month_name(*m))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Convenience for callers holding a whole report.
pub fn report_rows(report: &SeasonalityReport, policy: MissingMonthPolicy) -> Vec<MonthlyRow> {
    monthly_rows(&report.monthly, policy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample() -> MonthlyAverages {
        [(1, dec!(0.4)), (3, dec!(-0.2))].into_iter().collect()
    }

    #[test]
    fn omit_keeps_only_observed_months() {
        let rows = monthly_rows(&sample(), MissingMonthPolicy::Omit);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].month_name, "January");
        assert_eq!(rows[0].side, MonthSide::Buy);
        assert_eq!(rows[1].side, MonthSide::Sell);
        assert!(rows.iter().all(|r| r.observed));
    }

    #[test]
    fn zero_fills_all_twelve_months() {
        let rows = monthly_rows(&sample(), MissingMonthPolicy::Zero);
        assert_eq!(rows.len(), 12);
        let february = &rows[1];
        assert_eq!(february.avg_return_pct, Decimal::ZERO);
        assert!(!february.observed);
        assert_eq!(february.side, MonthSide::Sell);
    }

    #[test]
    fn month_lists_read_naturally() {
        assert_eq!(month_list(&[1, 12]), "January, December");
        assert_eq!(month_list(&[]), "none");
    }
}
