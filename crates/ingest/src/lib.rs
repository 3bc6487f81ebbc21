//! # CSV ingest
//!
//! Turns an uploaded price file into a validated [`PriceSeries`].
//!
//! Only two columns matter: a date column and a closing-price column. Both are
//! located by header name (or given explicitly); every other column is
//! ignored. Rows whose date or price cannot be parsed are skipped and reported
//! back to the caller rather than failing the whole file.

pub mod error;
mod parse;

pub use error::IngestError;
pub use parse::{parse_date, parse_price};

use core_types::{PricePoint, PriceSeries};
use csv::StringRecord;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Header names recognised as the date column, in priority order.
const DATE_HEADERS: &[&str] = &["date", "datetime", "timestamp", "time", "day"];

/// Header names recognised as the price column, in priority order.
const PRICE_HEADERS: &[&str] = &[
    "close",
    "adj close",
    "adj_close",
    "adjclose",
    "close price",
    "closing price",
    "price",
    "last",
];

/// Column selection and dialect for a price file.
#[derive(Debug, Clone)]
pub struct CsvOptions {
    /// Explicit date column header. Auto-detected when `None`.
    pub date_column: Option<String>,
    /// Explicit price column header. Auto-detected when `None`.
    pub price_column: Option<String>,
    pub delimiter: u8,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            date_column: None,
            price_column: None,
            delimiter: b',',
        }
    }
}

/// A data row that was skipped during ingest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowError {
    /// 1-based line number in the file (the header is line 1).
    pub line: u64,
    pub message: String,
}

/// The outcome of a successful ingest.
#[derive(Debug, Clone)]
pub struct LoadedSeries {
    pub series: PriceSeries,
    pub date_column: String,
    pub price_column: String,
    pub skipped: Vec<RowError>,
}

/// Loads a price file from disk.
pub fn load_csv_path(path: &Path, options: &CsvOptions) -> Result<LoadedSeries, IngestError> {
    let file = File::open(path).map_err(|source| IngestError::Open {
        path: path.display().to_string(),
        source,
    })?;
    let loaded = load_csv_reader(file, options)?;
    tracing::info!(
        path = %path.display(),
        rows = loaded.series.len(),
        skipped = loaded.skipped.len(),
        "Loaded price file"
    );
    Ok(loaded)
}

/// Loads a price file from any reader.
pub fn load_csv_reader<R: Read>(reader: R, options: &CsvOptions) -> Result<LoadedSeries, IngestError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(options.delimiter)
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    if headers.is_empty() || headers.iter().all(str::is_empty) {
        return Err(IngestError::EmptyFile);
    }

    let date_idx = match &options.date_column {
        Some(name) => find_column(&headers, &[name.as_str()])
            .ok_or_else(|| missing(name, &headers))?,
        // Price exports almost always lead with the date.
        None => find_column(&headers, DATE_HEADERS).unwrap_or(0),
    };
    let price_idx = match &options.price_column {
        Some(name) => find_column(&headers, &[name.as_str()])
            .ok_or_else(|| missing(name, &headers))?,
        None => find_column(&headers, PRICE_HEADERS).ok_or_else(|| missing("close", &headers))?,
    };
    if date_idx == price_idx {
        return Err(missing("price", &headers));
    }

    let mut points = Vec::new();
    let mut skipped = Vec::new();
    let mut record = StringRecord::new();
    let mut line = 1u64;

    while reader.read_record(&mut record)? {
        line = record.position().map(|p| p.line()).unwrap_or(line + 1);
        match parse_row(&record, date_idx, price_idx) {
            Ok(point) => points.push(point),
            Err(message) => {
                tracing::debug!(line, %message, "Skipping row");
                skipped.push(RowError { line, message });
            }
        }
    }

    if points.is_empty() {
        return if skipped.is_empty() {
            Err(IngestError::EmptyFile)
        } else {
            Err(IngestError::NoValidRows { skipped: skipped.len() })
        };
    }

    Ok(LoadedSeries {
        series: PriceSeries::new(points)?,
        date_column: headers[date_idx].to_string(),
        price_column: headers[price_idx].to_string(),
        skipped,
    })
}

fn parse_row(record: &StringRecord, date_idx: usize, price_idx: usize) -> Result<PricePoint, String> {
    let raw_date = record.get(date_idx).ok_or("missing date field")?;
    let raw_price = record.get(price_idx).ok_or("missing price field")?;
    let date = parse_date(raw_date).ok_or_else(|| format!("unparseable date '{raw_date}'"))?;
    let close = parse_price(raw_price).ok_or_else(|| format!("unparseable price '{raw_price}'"))?;
    Ok(PricePoint::new(date, close))
}

fn find_column(headers: &StringRecord, candidates: &[&str]) -> Option<usize> {
    let normalized: Vec<String> = headers.iter().map(|h| h.trim().to_lowercase()).collect();
    candidates.iter().find_map(|candidate| {
        let candidate = candidate.trim().to_lowercase();
        normalized.iter().position(|h| *h == candidate)
    })
}

fn missing(column: &str, headers: &StringRecord) -> IngestError {
    IngestError::MissingColumn(column.to_string(), headers.iter().collect::<Vec<_>>().join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn load(text: &str) -> Result<LoadedSeries, IngestError> {
        load_csv_reader(text.as_bytes(), &CsvOptions::default())
    }

    #[test]
    fn detects_columns_and_ignores_extras() {
        let loaded = load(
            "Date,Open,High,Low,Close,Volume\n\
             2024-01-03,1,1,1,101.5,10\n\
             2024-01-02,1,1,1,100,10\n",
        )
        .unwrap();
        assert_eq!(loaded.date_column, "Date");
        assert_eq!(loaded.price_column, "Close");
        assert_eq!(loaded.series.len(), 2);
        assert_eq!(loaded.series.first().date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert_eq!(loaded.series.last().close, dec!(101.5));
    }

    #[test]
    fn explicit_price_column_wins() {
        let text = "Date,Close,Adj Close\n2024-01-02,10,9\n2024-01-03,11,10\n";
        let options = CsvOptions {
            price_column: Some("adj close".to_string()),
            ..CsvOptions::default()
        };
        let loaded = load_csv_reader(text.as_bytes(), &options).unwrap();
        assert_eq!(loaded.series.first().close, dec!(9));
    }

    #[test]
    fn bad_rows_are_skipped_and_reported() {
        let loaded = load("date,price\n2024-01-02,10\nnot-a-date,11\n2024-01-04,\n2024-01-05,\"1,234.5\"\n")
            .unwrap();
        assert_eq!(loaded.series.len(), 2);
        assert_eq!(loaded.series.last().close, dec!(1234.5));
        assert_eq!(loaded.skipped.len(), 2);
        assert_eq!(loaded.skipped[0].line, 3);
    }

    #[test]
    fn empty_input_is_a_format_error() {
        assert!(matches!(load(""), Err(IngestError::EmptyFile)));
        assert!(matches!(load("Date,Close\n"), Err(IngestError::EmptyFile)));
    }

    #[test]
    fn missing_price_column_is_reported() {
        let err = load("Date,Volume\n2024-01-02,5\n").unwrap_err();
        match err {
            IngestError::MissingColumn(column, available) => {
                assert_eq!(column, "close");
                assert_eq!(available, "Date, Volume");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn all_rows_unparseable() {
        let err = load("Date,Close\nfoo,bar\nbaz,qux\n").unwrap_err();
        assert!(matches!(err, IngestError::NoValidRows { skipped: 2 }));
    }

    #[test]
    fn loads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prices.csv");
        std::fs::write(&path, "Date,Close\n2024-02-01,5\n2024-02-02,6\n").unwrap();
        let loaded = load_csv_path(&path, &CsvOptions::default()).unwrap();
        assert_eq!(loaded.series.len(), 2);

        let err = load_csv_path(&dir.path().join("nope.csv"), &CsvOptions::default()).unwrap_err();
        assert!(matches!(err, IngestError::Open { .. }));
    }
}
