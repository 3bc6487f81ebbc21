use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("Invalid input for {0}: {1}")]
    InvalidInput(String, String),

    #[error("Price series is empty")]
    EmptySeries,

    #[error("Invalid date range: start {start} must be before end {end}")]
    InvalidRange { start: String, end: String },
}
