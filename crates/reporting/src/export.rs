use crate::error::ReportError;
use crate::tables::render_report;
use crate::{MonthlyRow, report_rows};
use analytics::{MonthlyAverages, SeasonalityReport};
use core_types::{MissingMonthPolicy, month_name};
use rust_decimal::Decimal;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use std::str::FromStr;

pub const CSV_HEADER: [&str; 3] = ["month", "month_name", "avg_return_pct"];

/// Writes the monthly table as `month,month_name,avg_return_pct`.
///
/// Values are written at full precision so that reading the file back
/// reproduces them exactly.
pub fn write_monthly_csv<W: Write>(writer: W, rows: &[MonthlyRow]) -> Result<(), ReportError> {
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(CSV_HEADER)?;
    for row in rows {
        writer.write_record([
            row.month.to_string(),
            row.month_name.to_string(),
            row.avg_return_pct.normalize().to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_monthly_csv_path(
    path: &Path,
    report: &SeasonalityReport,
    policy: MissingMonthPolicy,
) -> Result<(), ReportError> {
    let file = File::create(path).map_err(|source| ReportError::Write {
        path: path.display().to_string(),
        source,
    })?;
    let rows = report_rows(report, policy);
    write_monthly_csv(file, &rows)?;
    tracing::info!(path = %path.display(), rows = rows.len(), "Monthly returns exported");
    Ok(())
}

/// Reads a file produced by [`write_monthly_csv`] back into monthly averages.
///
/// The month name column is checked against the month number; a repeated
/// month is an error.
pub fn read_monthly_csv<R: Read>(reader: R) -> Result<MonthlyAverages, ReportError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut monthly = MonthlyAverages::new();
    for record in reader.records() {
        let record = record?;
        let line = record.position().map(|p| p.line()).unwrap_or_default();
        let invalid = |message: String| ReportError::InvalidRow { line, message };

        let month: u32 = record
            .get(0)
            .unwrap_or_default()
            .parse()
            .map_err(|_| invalid(format!("bad month '{}'", record.get(0).unwrap_or_default())))?;
        let expected_name =
            month_name(month).ok_or_else(|| invalid(format!("month {month} is out of range")))?;
        let name = record.get(1).unwrap_or_default();
        if !name.eq_ignore_ascii_case(expected_name) {
            return Err(invalid(format!("month {month} is labelled '{name}'")));
        }
        let raw_value = record.get(2).unwrap_or_default();
        let value = Decimal::from_str(raw_value)
            .map_err(|_| invalid(format!("bad return '{raw_value}'")))?;

        if monthly.insert(month, value).is_some() {
            return Err(invalid(format!("month {month} appears twice")));
        }
    }
    Ok(monthly)
}

/// Writes the full text report (the same tables as the terminal output).
pub fn write_text_report(
    path: &Path,
    report: &SeasonalityReport,
    policy: MissingMonthPolicy,
) -> Result<(), ReportError> {
    let mut file = File::create(path).map_err(|source| ReportError::Write {
        path: path.display().to_string(),
        source,
    })?;
    file.write_all(render_report(report, policy).as_bytes())?;
    tracing::info!(path = %path.display(), "Text report written");
    Ok(())
}
