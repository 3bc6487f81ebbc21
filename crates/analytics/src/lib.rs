//! # Seasonality analytics
//!
//! Computes how a stock's average daily return varies by calendar month and
//! what a "buy only in favorable months" strategy would have returned.
//!
//! ## Architectural Principles
//!
//! - **Pure logic:** This crate has no knowledge of files, networks or
//!   terminals. It depends only on `core-types`.
//! - **Stateless calculation:** `SeasonalityAnalyzer` holds only its
//!   `AnalysisPolicy`. It takes a `PriceSeries` and produces a
//!   `SeasonalityReport`; the individual steps are free functions in
//!   [`seasonality`].
//!
//! ## Public API
//!
//! - `SeasonalityAnalyzer`: runs the whole pipeline.
//! - `SeasonalityReport`: the derived values of one analysis pass.
//! - `AnalyticsError`: the specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod engine;
pub mod error;
pub mod report;
pub mod seasonality;

// Re-export the key components to create a clean, public-facing API.
pub use engine::{AnalysisPolicy, SeasonalityAnalyzer};
pub use error::AnalyticsError;
pub use report::{PriceSummary, SeasonalityReport, StrategyOutcome};
pub use seasonality::{FavorableMonths, Heatmap, MonthlyAverages};
