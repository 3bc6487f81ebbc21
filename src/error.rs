use analytics::AnalyticsError;
use api_client::error::ApiError;
use configuration::error::ConfigError;
use core_types::CoreError;
use ingest::IngestError;
use reporting::ReportError;
use thiserror::Error;

/// Every failure a command can end with. Each variant maps to one short,
/// user-facing category so the CLI never shows a raw backtrace.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Input format error: {0}")]
    InputFormat(#[from] IngestError),

    #[error("Range error: {0}")]
    Range(#[from] CoreError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Market data error: {0}")]
    Fetch(ApiError),

    #[error("Analysis error: {0}")]
    Analysis(#[from] AnalyticsError),

    #[error("Export error: {0}")]
    Export(#[from] ReportError),

    #[error("Output error: {0}")]
    Output(#[from] serde_json::Error),

    #[error("{0}")]
    Usage(String),
}

impl From<ApiError> for AppError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::NotFound(what) => AppError::NotFound(format!("no price data for {what}")),
            other => AppError::Fetch(other),
        }
    }
}
