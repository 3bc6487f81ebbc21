use crate::{month_list, monthly_rows};
use analytics::{Heatmap, SeasonalityReport};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, Color, ContentArrangement, Table};
use core_types::{MissingMonthPolicy, MonthSide, month_name};
use rust_decimal::Decimal;
use std::collections::BTreeSet;
use std::fmt::Write as _;

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn pct(value: Decimal) -> String {
    format!("{:.4}", value.round_dp(4))
}

fn money(value: Decimal) -> String {
    format!("{:.2}", value.round_dp(2))
}

fn signed_cell(value: Decimal) -> Cell {
    let cell = Cell::new(pct(value)).set_alignment(CellAlignment::Right);
    if value > Decimal::ZERO {
        cell.fg(Color::Green)
    } else if value < Decimal::ZERO {
        cell.fg(Color::Red)
    } else {
        cell
    }
}

fn short_month(month: u32) -> &'static str {
    month_name(month).map(|name| &name[..3]).unwrap_or("?")
}

/// Closing-price overview of the analysed period.
pub fn summary_table(report: &SeasonalityReport) -> Table {
    let s = &report.summary;
    let mut table = new_table();
    table.set_header(vec!["Metric", "Value"]);
    table.add_row(vec!["Series".to_string(), report.label.clone()]);
    table.add_row(vec!["Observations".to_string(), s.observations.to_string()]);
    table.add_row(vec!["Period".to_string(), format!("{} to {}", s.first_date, s.last_date)]);
    table.add_row(vec!["First close".to_string(), s.first_close.to_string()]);
    table.add_row(vec!["Last close".to_string(), s.last_close.to_string()]);
    table.add_row(vec!["Low / high".to_string(), format!("{} / {}", s.min_close, s.max_close)]);
    table.add_row(vec![
        "Buy and hold (%)".to_string(),
        s.total_return_pct.map(pct).unwrap_or_else(|| "n/a".to_string()),
    ]);
    table
}

/// Average daily return per calendar month with its buy/sell side.
pub fn monthly_table(report: &SeasonalityReport, policy: MissingMonthPolicy) -> Table {
    let mut table = new_table();
    table.set_header(vec!["#", "Month", "Avg daily return (%)", "Side"]);
    for row in monthly_rows(&report.monthly, policy) {
        let side = match (row.side, row.observed) {
            (_, false) => Cell::new("no data"),
            (MonthSide::Buy, true) => Cell::new("BUY").fg(Color::Green),
            (MonthSide::Sell, true) => Cell::new("SELL").fg(Color::Red),
        };
        table.add_row(vec![
            Cell::new(row.month),
            Cell::new(row.month_name),
            signed_cell(row.avg_return_pct),
            side,
        ]);
    }
    table
}

/// Year × month grid of mean daily returns.
///
/// Under [`MissingMonthPolicy::Omit`] only months seen in some year get a
/// column and empty cells show "-"; under [`MissingMonthPolicy::Zero`] all
/// twelve columns are shown and empty cells show 0.
pub fn heatmap_table(heatmap: &Heatmap, policy: MissingMonthPolicy) -> Table {
    let months: Vec<u32> = match policy {
        MissingMonthPolicy::Zero => (1..=12).collect(),
        MissingMonthPolicy::Omit => heatmap
            .cells
            .values()
            .flat_map(|row| row.keys().copied())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect(),
    };

    let mut table = new_table();
    let mut header = vec!["Year".to_string()];
    header.extend(months.iter().map(|m| short_month(*m).to_string()));
    table.set_header(header);

    for year in heatmap.years() {
        let mut row = vec![Cell::new(year)];
        for &month in &months {
            row.push(match (heatmap.get(year, month), policy) {
                (Some(value), _) => signed_cell(value),
                (None, MissingMonthPolicy::Zero) => signed_cell(Decimal::ZERO),
                (None, MissingMonthPolicy::Omit) => Cell::new("-").set_alignment(CellAlignment::Center),
            });
        }
        table.add_row(row);
    }
    table
}

/// Side-by-side monthly averages and strategy estimates for several series.
///
/// Returns the monthly grid and the strategy summary as two tables.
pub fn comparison_tables(reports: &[SeasonalityReport], policy: MissingMonthPolicy) -> (Table, Table) {
    let months: Vec<u32> = match policy {
        MissingMonthPolicy::Zero => (1..=12).collect(),
        MissingMonthPolicy::Omit => reports
            .iter()
            .flat_map(|r| r.monthly.keys().copied())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect(),
    };

    let mut grid = new_table();
    let mut header = vec!["Month".to_string()];
    header.extend(reports.iter().map(|r| r.label.clone()));
    grid.set_header(header);
    for month in months {
        let mut row = vec![Cell::new(month_name(month).unwrap_or("?"))];
        for report in reports {
            row.push(match (report.monthly.get(&month), policy) {
                (Some(value), _) => signed_cell(*value),
                (None, MissingMonthPolicy::Zero) => signed_cell(Decimal::ZERO),
                (None, MissingMonthPolicy::Omit) => Cell::new("-").set_alignment(CellAlignment::Center),
            });
        }
        grid.add_row(row);
    }

    let mut strategies = new_table();
    strategies.set_header(vec![
        "Series",
        "Observations",
        "Buy months",
        "Simple (%)",
        "Compound (%)",
    ]);
    for report in reports {
        strategies.add_row(vec![
            Cell::new(&report.label),
            Cell::new(report.summary.observations),
            Cell::new(month_list(&report.favorable.buy)),
            signed_cell(report.strategy.simple_return_pct),
            signed_cell(report.strategy.compound_return_pct),
        ]);
    }

    (grid, strategies)
}

/// The complete human-readable report, as printed by the CLI and written by
/// the text export.
pub fn render_report(report: &SeasonalityReport, policy: MissingMonthPolicy) -> String {
    let strategy = &report.strategy;
    let mut out = String::new();

    // Writing to a String cannot fail.
    let _ = writeln!(out, "Seasonality report: {}", report.label);
    let _ = writeln!(out, "{}", summary_table(report));
    let _ = writeln!(out, "\nAverage daily return by calendar month");
    let _ = writeln!(out, "{}", monthly_table(report, policy));
    let _ = writeln!(out, "\nFavorable buy months:  {}", month_list(&report.favorable.buy));
    let _ = writeln!(out, "Favorable sell months: {}", month_list(&report.favorable.sell));
    let _ = writeln!(
        out,
        "Upcoming favorable months (from {}): {}",
        month_name(report.current_month).unwrap_or("?"),
        month_list(&report.upcoming)
    );
    let _ = writeln!(out, "\nStrategy estimate on a notional of {}", money(strategy.notional));
    let _ = writeln!(
        out,
        "  Simple return:   {}% (profit {})",
        pct(strategy.simple_return_pct),
        money(strategy.simple_profit)
    );
    let _ = writeln!(
        out,
        "  Compound return: {}% (profit {}, {} step(s), {})",
        pct(strategy.compound_return_pct),
        money(strategy.compound_profit),
        strategy.compound_steps,
        strategy.compound_policy
    );
    let _ = writeln!(out, "\nYear x month average daily return (%)");
    let _ = writeln!(out, "{}", heatmap_table(&report.heatmap, policy));
    out
}
