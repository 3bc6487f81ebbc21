use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use std::str::FromStr;

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d-%m-%Y", "%m/%d/%Y", "%d.%m.%Y", "%Y%m%d"];

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

/// Parses a calendar date from the layouts common in price exports.
///
/// Timestamps keep only their date part; an offset such as `-05:00` is
/// ignored rather than converted, so a close stamped at local midnight stays
/// on its trading day.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Some(date) = DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
    {
        return Some(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    if let Some(dt) = DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
    {
        return Some(dt.date());
    }

    // "2024-01-02 00:00:00-05:00" and similar.
    raw.get(..10)
        .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
}

/// Parses a price, tolerating thousands separators and scientific notation.
/// Blank cells and textual not-a-number markers yield `None`.
pub fn parse_price(raw: &str) -> Option<Decimal> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| *c != ',' && *c != '_' && !c.is_whitespace())
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    match cleaned.to_ascii_lowercase().as_str() {
        "nan" | "null" | "none" | "n/a" | "na" | "-" => return None,
        _ => {}
    }
    Decimal::from_str(&cleaned)
        .or_else(|_| Decimal::from_scientific(&cleaned))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn accepts_common_date_layouts() {
        assert_eq!(parse_date("2024-03-15"), Some(d(2024, 3, 15)));
        assert_eq!(parse_date("2024/03/15"), Some(d(2024, 3, 15)));
        assert_eq!(parse_date("15-03-2024"), Some(d(2024, 3, 15)));
        assert_eq!(parse_date("03/15/2024"), Some(d(2024, 3, 15)));
        assert_eq!(parse_date("2024-03-15T16:00:00Z"), Some(d(2024, 3, 15)));
        assert_eq!(parse_date("2024-03-15 00:00:00-04:00"), Some(d(2024, 3, 15)));
        assert_eq!(parse_date("yesterday"), None);
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn prices_tolerate_formatting() {
        assert_eq!(parse_price(" 1,250.75 "), Some(dec!(1250.75)));
        assert_eq!(parse_price("1.5e2"), Some(dec!(150)));
        assert_eq!(parse_price("NaN"), None);
        assert_eq!(parse_price("abc"), None);
        assert_eq!(parse_price(""), None);
    }
}
