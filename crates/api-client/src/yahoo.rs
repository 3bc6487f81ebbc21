use crate::MarketDataSource;
use crate::error::ApiError;
use crate::normalize_ticker;
use crate::responses::ChartResponse;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveTime};
use configuration::MarketDataSettings;
use core_types::{DateRange, PricePoint, PriceSeries};
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use std::time::Duration;

/// Decimal places kept from the API's floating-point closes.
const PRICE_SCALE: u32 = 6;

/// A concrete implementation of [`MarketDataSource`] for a Yahoo-compatible chart API.
#[derive(Clone)]
pub struct YahooClient {
    client: reqwest::Client,
    base_url: String,
}

impl YahooClient {
    pub fn new(settings: &MarketDataSettings) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .user_agent(settings.user_agent.clone())
            .build()?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl MarketDataSource for YahooClient {
    async fn fetch_daily(&self, ticker: &str, range: &DateRange) -> Result<PriceSeries, ApiError> {
        let ticker = normalize_ticker(ticker)?;
        let url = format!("{}/v8/finance/chart/{}", self.base_url, ticker);

        tracing::info!(%ticker, start = %range.start(), end = %range.end(), "Fetching daily prices");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("period1", unix_midnight(range.start()).to_string()),
                // period2 is exclusive, so ask for the day after `end`.
                ("period2", unix_midnight(range.end().succ_opt().unwrap_or(range.end())).to_string()),
                ("interval", "1d".to_string()),
                ("events", "history".to_string()),
            ])
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        match serde_json::from_str::<ChartResponse>(&text) {
            Ok(chart) => series_from_chart(chart, &ticker, range),
            Err(e) if status.is_success() => Err(ApiError::Deserialization(e.to_string())),
            Err(_) => Err(ApiError::ApiError(format!(
                "HTTP {} for {}: {}",
                status,
                ticker,
                text.chars().take(200).collect::<String>()
            ))),
        }
    }
}

/// Converts a decoded chart payload into a series restricted to `range`.
///
/// Bars with a `null` close are dropped. Timestamps are shifted by the
/// exchange's GMT offset before taking the calendar date.
pub fn series_from_chart(
    chart: ChartResponse,
    ticker: &str,
    range: &DateRange,
) -> Result<PriceSeries, ApiError> {
    if let Some(err) = chart.chart.error {
        return if err.code.eq_ignore_ascii_case("not found") {
            Err(ApiError::NotFound(format!("{ticker} ({})", err.description)))
        } else {
            Err(ApiError::ApiError(format!("{}: {}", err.code, err.description)))
        };
    }

    let result = chart
        .chart
        .result
        .and_then(|results| results.into_iter().next())
        .ok_or_else(|| ApiError::NotFound(ticker.to_string()))?;

    let closes = result
        .indicators
        .quote
        .into_iter()
        .next()
        .map(|q| q.close)
        .unwrap_or_default();

    if closes.len() != result.timestamp.len() {
        return Err(ApiError::InvalidData(format!(
            "{} timestamps but {} closes",
            result.timestamp.len(),
            closes.len()
        )));
    }

    let offset = result.meta.gmtoffset;
    let mut points = Vec::with_capacity(closes.len());
    for (&ts, close) in result.timestamp.iter().zip(closes) {
        let Some(close) = close else { continue };
        let date = ts
            .checked_add(offset)
            .and_then(|local| DateTime::from_timestamp(local, 0))
            .ok_or_else(|| ApiError::InvalidData(format!("Invalid timestamp: {ts} (offset {offset})")))?
            .date_naive();
        if !range.contains(date) {
            continue;
        }
        let close = Decimal::from_f64(close)
            .ok_or_else(|| ApiError::InvalidData(format!("Invalid close: {close}")))?
            .round_dp(PRICE_SCALE);
        points.push(PricePoint::new(date, close));
    }

    if points.is_empty() {
        return Err(ApiError::NotFound(format!(
            "{} between {} and {}",
            ticker,
            range.start(),
            range.end()
        )));
    }

    tracing::debug!(%ticker, rows = points.len(), "Decoded chart response");
    PriceSeries::new(points).map_err(|e| ApiError::InvalidData(e.to_string()))
}

fn unix_midnight(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp()
}
