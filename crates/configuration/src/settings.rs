use core_types::{CompoundPolicy, MissingMonthPolicy};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::path::PathBuf;

/// The root configuration structure for the entire application.
///
/// Every section is optional in `config.toml`; missing sections fall back to
/// their `Default` implementation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub analysis: AnalysisSettings,
    #[serde(default)]
    pub market_data: MarketDataSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Parameters for the seasonality computation and its presentation.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AnalysisSettings {
    /// The hypothetical capital used for profit estimates.
    pub notional: Decimal,
    /// How first-of-month prices are chained across calendar years.
    pub compound_policy: CompoundPolicy,
    /// Whether months without data are hidden or shown as 0% in twelve-month tables.
    pub missing_months: MissingMonthPolicy,
}

/// Connection parameters for the remote daily price endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MarketDataSettings {
    /// Base URL of a Yahoo-compatible chart API (e.g., "https://query1.finance.yahoo.com").
    pub base_url: String,
    pub timeout_secs: u64,
    pub user_agent: String,
    /// Keep fetched series in memory for identical (ticker, start, end) requests.
    pub cache_enabled: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default filter directive; `RUST_LOG` takes precedence when set.
    pub level: String,
    /// When set, logs are also written to a daily-rolling file in this directory.
    pub directory: Option<PathBuf>,
}

// --- Default Implementations ---

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            notional: Decimal::from(100_000),
            compound_policy: CompoundPolicy::default(),
            missing_months: MissingMonthPolicy::default(),
        }
    }
}

impl Default for MarketDataSettings {
    fn default() -> Self {
        Self {
            base_url: "https://query1.finance.yahoo.com".to_string(),
            timeout_secs: 30,
            user_agent: concat!("seasonal/", env!("CARGO_PKG_VERSION")).to_string(),
            cache_enabled: true,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            directory: None,
        }
    }
}
