use crate::error::ConfigError;
use crate::settings::AnalysisSettings;
use core_types::{CompoundPolicy, MissingMonthPolicy};
use rust_decimal::Decimal;

/// Command-line flags that take precedence over `[analysis]` in the config file.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct AnalysisOverrides {
    /// Hypothetical capital for profit estimates (e.g., 100000).
    #[arg(long, global = true)]
    pub notional: Option<Decimal>,

    /// Cross-year handling of the compound simulation: "carry_across_years" or "reset_each_year".
    #[arg(long, global = true)]
    pub compound_policy: Option<CompoundPolicy>,

    /// Rendering of months without data: "omit" or "zero".
    #[arg(long, global = true)]
    pub missing_months: Option<MissingMonthPolicy>,
}

impl AnalysisOverrides {
    pub fn apply(&self, settings: &mut AnalysisSettings) -> Result<(), ConfigError> {
        if let Some(notional) = self.notional {
            if notional <= Decimal::ZERO {
                return Err(ConfigError::ValidationError(format!(
                    "--notional must be positive, got {notional}"
                )));
            }
            settings.notional = notional;
        }
        if let Some(policy) = self.compound_policy {
            settings.compound_policy = policy;
        }
        if let Some(policy) = self.missing_months {
            settings.missing_months = policy;
        }
        Ok(())
    }
}
