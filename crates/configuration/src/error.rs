use thiserror::Error;

/// Failures while assembling the `Config` from `config.toml` and `SEASONAL__*` variables.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not read settings: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("invalid setting: {0}")]
    ValidationError(String),
}
