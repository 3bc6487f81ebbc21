use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum AnalyticsError {
    #[error("Not enough data to perform calculation: {0}")]
    NotEnoughData(String),

    #[error("Input length mismatch: {returns} returns but {dates} dates")]
    LengthMismatch { returns: usize, dates: usize },

    #[error("Invalid month number: {0}")]
    InvalidMonth(u32),

    #[error("Error in calculation: {0}")]
    Calculation(String),
}
