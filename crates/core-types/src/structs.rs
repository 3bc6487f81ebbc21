use crate::error::CoreError;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single daily closing price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: Decimal,
}

impl PricePoint {
    pub fn new(date: NaiveDate, close: Decimal) -> Self {
        Self { date, close }
    }
}

/// A date-ordered series of daily closes with unique dates.
///
/// The series is never empty. Prices are not checked for positivity; a zero
/// close simply yields missing returns downstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Builds a series from points in any order. Points are sorted by date and,
    /// when a date repeats, the last occurrence in the input wins.
    pub fn new(mut points: Vec<PricePoint>) -> Result<Self, CoreError> {
        if points.is_empty() {
            return Err(CoreError::EmptySeries);
        }

        // Stable sort keeps input order among equal dates.
        points.sort_by_key(|p| p.date);

        let mut deduped: Vec<PricePoint> = Vec::with_capacity(points.len());
        for point in points {
            match deduped.last_mut() {
                Some(last) if last.date == point.date => *last = point,
                _ => deduped.push(point),
            }
        }

        Ok(Self { points: deduped })
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> &PricePoint {
        &self.points[0]
    }

    pub fn last(&self) -> &PricePoint {
        &self.points[self.points.len() - 1]
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.points.iter().map(|p| p.date)
    }

    pub fn closes(&self) -> impl Iterator<Item = Decimal> + '_ {
        self.points.iter().map(|p| p.close)
    }

    /// Returns the sub-series whose dates fall inside `range` (inclusive).
    pub fn within(&self, range: &DateRange) -> Result<Self, CoreError> {
        let points: Vec<PricePoint> = self
            .points
            .iter()
            .copied()
            .filter(|p| range.contains(p.date))
            .collect();
        Self::new(points)
    }
}

/// An inclusive calendar range whose start is strictly before its end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, CoreError> {
        if start >= end {
            return Err(CoreError::InvalidRange {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn series_is_sorted_and_deduplicated() {
        let series = PriceSeries::new(vec![
            PricePoint::new(d(2024, 1, 3), dec!(3)),
            PricePoint::new(d(2024, 1, 1), dec!(1)),
            PricePoint::new(d(2024, 1, 3), dec!(4)),
            PricePoint::new(d(2024, 1, 2), dec!(2)),
        ])
        .unwrap();

        let closes: Vec<_> = series.closes().collect();
        assert_eq!(closes, vec![dec!(1), dec!(2), dec!(4)]);
        assert_eq!(series.first().date, d(2024, 1, 1));
        assert_eq!(series.last().date, d(2024, 1, 3));
    }

    #[test]
    fn empty_series_is_rejected() {
        assert_eq!(PriceSeries::new(vec![]), Err(CoreError::EmptySeries));
    }

    #[test]
    fn range_requires_start_before_end() {
        assert!(DateRange::new(d(2024, 1, 1), d(2024, 1, 1)).is_err());
        assert!(DateRange::new(d(2024, 2, 1), d(2024, 1, 1)).is_err());
        assert!(DateRange::new(d(2024, 1, 1), d(2024, 1, 2)).is_ok());
    }

    #[test]
    fn within_filters_inclusively() {
        let series = PriceSeries::new(
            (1..=10)
                .map(|day| PricePoint::new(d(2024, 3, day), Decimal::from(day)))
                .collect(),
        )
        .unwrap();
        let range = DateRange::new(d(2024, 3, 3), d(2024, 3, 5)).unwrap();
        let sub = series.within(&range).unwrap();
        assert_eq!(sub.len(), 3);

        let outside = DateRange::new(d(2025, 1, 1), d(2025, 2, 1)).unwrap();
        assert_eq!(series.within(&outside), Err(CoreError::EmptySeries));
    }
}
