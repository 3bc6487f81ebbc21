use crate::MarketDataSource;
use crate::error::ApiError;
use crate::normalize_ticker;
use async_trait::async_trait;
use core_types::{DateRange, PriceSeries};
use std::collections::HashMap;
use std::sync::Mutex;

type CacheKey = (String, DateRange);

/// A read-through, in-memory cache in front of another [`MarketDataSource`].
///
/// Entries are keyed by the normalized ticker and the exact requested range.
/// Failed fetches are not cached.
pub struct CachedSource<S> {
    inner: S,
    entries: Mutex<HashMap<CacheKey, PriceSeries>>,
}

impl<S: MarketDataSource> CachedSource<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Drops every cached series.
    pub fn clear(&self) {
        let mut entries = self.lock();
        let dropped = entries.len();
        entries.clear();
        tracing::info!(dropped, "Market data cache cleared");
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<CacheKey, PriceSeries>> {
        // A poisoned map still holds complete entries; keep serving them.
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl<S: MarketDataSource> MarketDataSource for CachedSource<S> {
    async fn fetch_daily(&self, ticker: &str, range: &DateRange) -> Result<PriceSeries, ApiError> {
        let key = (normalize_ticker(ticker)?, *range);

        let cached = self.lock().get(&key).cloned();
        if let Some(hit) = cached {
            tracing::debug!(ticker = %key.0, "Market data cache hit");
            return Ok(hit);
        }

        tracing::debug!(ticker = %key.0, "Market data cache miss");
        let series = self.inner.fetch_daily(&key.0, range).await?;
        self.lock().insert(key, series.clone());
        Ok(series)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use core_types::PricePoint;
    use rust_decimal_macros::dec;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Counts calls and answers with a fixed two-day series, or NotFound for "MISSING".
    #[derive(Default)]
    struct CountingSource {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl MarketDataSource for CountingSource {
        async fn fetch_daily(&self, ticker: &str, range: &DateRange) -> Result<PriceSeries, ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if ticker == "MISSING" {
                return Err(ApiError::NotFound(ticker.to_string()));
            }
            PriceSeries::new(vec![
                PricePoint::new(range.start(), dec!(10)),
                PricePoint::new(range.end(), dec!(11)),
            ])
            .map_err(|e| ApiError::InvalidData(e.to_string()))
        }
    }

    fn range(end_day: u32) -> DateRange {
        DateRange::new(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, end_day).unwrap(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn identical_requests_hit_the_cache() {
        let cache = CachedSource::new(CountingSource::default());

        let first = cache.fetch_daily("abc", &range(10)).await.unwrap();
        let second = cache.fetch_daily(" ABC ", &range(10)).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(cache.inner().calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn different_ranges_are_separate_entries() {
        let cache = CachedSource::new(CountingSource::default());
        cache.fetch_daily("ABC", &range(10)).await.unwrap();
        cache.fetch_daily("ABC", &range(11)).await.unwrap();
        assert_eq!(cache.inner().calls.load(Ordering::SeqCst), 2);
        assert_eq!(cache.len(), 2);
    }

    #[tokio::test]
    async fn clear_forces_a_refetch() {
        let cache = CachedSource::new(CountingSource::default());
        cache.fetch_daily("ABC", &range(10)).await.unwrap();
        cache.clear();
        assert!(cache.is_empty());
        cache.fetch_daily("ABC", &range(10)).await.unwrap();
        assert_eq!(cache.inner().calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn failures_are_not_cached() {
        let cache = CachedSource::new(CountingSource::default());
        assert!(cache.fetch_daily("missing", &range(10)).await.is_err());
        assert!(cache.fetch_daily("missing", &range(10)).await.is_err());
        assert_eq!(cache.inner().calls.load(Ordering::SeqCst), 2);
        assert!(cache.is_empty());
    }
}
