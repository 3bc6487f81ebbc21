use crate::error::ApiError;
use async_trait::async_trait;
use core_types::{DateRange, PriceSeries};

pub mod cache;
pub mod error;
pub mod responses;
pub mod yahoo;

// --- Public API ---
pub use cache::CachedSource;
pub use responses::{ApiErrorResponse, ChartResponse};
pub use yahoo::YahooClient;

/// The abstract interface for a daily price provider.
/// The CLI depends only on this trait, so the HTTP client, the cache and test
/// doubles are interchangeable.
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// Fetches daily closes for `ticker` over `range` (inclusive).
    ///
    /// An empty answer is reported as [`ApiError::NotFound`], never as an
    /// empty series.
    async fn fetch_daily(&self, ticker: &str, range: &DateRange) -> Result<PriceSeries, ApiError>;
}

/// Trims and upper-cases a ticker, rejecting blanks and embedded whitespace.
pub fn normalize_ticker(ticker: &str) -> Result<String, ApiError> {
    let trimmed = ticker.trim();
    if trimmed.is_empty() || trimmed.chars().any(char::is_whitespace) {
        return Err(ApiError::InvalidTicker(ticker.to_string()));
    }
    Ok(trimmed.to_uppercase())
}
