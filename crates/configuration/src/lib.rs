use crate::error::ConfigError;
use crate::settings::Config;
use std::path::Path;

// Declare the modules that make up this crate.
#[cfg(feature = "clap")]
pub mod cli;
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
#[cfg(feature = "clap")]
pub use cli::AnalysisOverrides;
pub use settings::{AnalysisSettings, LoggingSettings, MarketDataSettings};

/// Prefix for environment overrides, e.g. `SEASONAL__ANALYSIS__NOTIONAL=50000`.
pub const ENV_PREFIX: &str = "SEASONAL";

/// Loads the application configuration.
///
/// The TOML file at `path` is optional. Environment variables prefixed with
/// `SEASONAL__` are layered on top, and the result is validated.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::from(path).required(false))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__"),
        )
        .build()?;

    let config = builder.try_deserialize::<Config>()?;
    validate(&config)?;

    tracing::debug!(path = %path.display(), "Configuration loaded");
    Ok(config)
}

/// Parses a configuration from TOML text without consulting the environment.
pub fn parse_config(toml: &str) -> Result<Config, ConfigError> {
    let config = config::Config::builder()
        .add_source(config::File::from_str(toml, config::FileFormat::Toml))
        .build()?
        .try_deserialize::<Config>()?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.analysis.notional <= rust_decimal::Decimal::ZERO {
        return Err(ConfigError::ValidationError(format!(
            "analysis.notional must be positive, got {}",
            config.analysis.notional
        )));
    }
    if config.market_data.base_url.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "market_data.base_url must not be empty".to_string(),
        ));
    }
    if config.market_data.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "market_data.timeout_secs must be at least 1".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::{CompoundPolicy, MissingMonthPolicy};
    use rust_decimal_macros::dec;

    #[test]
    fn empty_file_yields_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config.analysis.notional, dec!(100000));
        assert_eq!(config.analysis.compound_policy, CompoundPolicy::CarryAcrossYears);
        assert_eq!(config.analysis.missing_months, MissingMonthPolicy::Omit);
        assert!(config.market_data.cache_enabled);
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn sections_override_defaults() {
        let config = parse_config(
            r#"
            [analysis]
            notional = 2500
            compound_policy = "reset_each_year"
            missing_months = "zero"

            [market_data]
            timeout_secs = 5
            "#,
        )
        .unwrap();
        assert_eq!(config.analysis.notional, dec!(2500));
        assert_eq!(config.analysis.compound_policy, CompoundPolicy::ResetEachYear);
        assert_eq!(config.analysis.missing_months, MissingMonthPolicy::Zero);
        assert_eq!(config.market_data.timeout_secs, 5);
        assert!(config.market_data.base_url.starts_with("https://"));
    }

    #[test]
    fn non_positive_notional_is_rejected() {
        let err = parse_config("[analysis]\nnotional = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn missing_file_is_not_an_error() {
        let config = load_config(Path::new("definitely-not-here.toml")).unwrap();
        assert!(config.analysis.notional > rust_decimal::Decimal::ZERO);
    }
}
