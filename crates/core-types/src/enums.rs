use crate::error::CoreError;
use chrono::Month;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which side of the seasonal strategy a calendar month falls on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MonthSide {
    Buy,
    Sell,
}

/// How the compound-return simulation links first-of-month prices across
/// calendar years.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompoundPolicy {
    /// One running chain over every qualifying month in date order.
    #[default]
    CarryAcrossYears,
    /// Only months within the same year are linked; the factor still
    /// accumulates across years.
    ResetEachYear,
}

/// How months without any observations are shown when all twelve months are
/// rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingMonthPolicy {
    #[default]
    Omit,
    Zero,
}

impl FromStr for CompoundPolicy {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "carry_across_years" | "carry" => Ok(Self::CarryAcrossYears),
            "reset_each_year" | "reset" => Ok(Self::ResetEachYear),
            other => Err(CoreError::InvalidInput(
                "compound policy".to_string(),
                other.to_string(),
            )),
        }
    }
}

impl fmt::Display for CompoundPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CarryAcrossYears => write!(f, "carry_across_years"),
            Self::ResetEachYear => write!(f, "reset_each_year"),
        }
    }
}

impl FromStr for MissingMonthPolicy {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "omit" => Ok(Self::Omit),
            "zero" => Ok(Self::Zero),
            other => Err(CoreError::InvalidInput(
                "missing month policy".to_string(),
                other.to_string(),
            )),
        }
    }
}

impl fmt::Display for MissingMonthPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Omit => write!(f, "omit"),
            Self::Zero => write!(f, "zero"),
        }
    }
}

/// English name of a calendar month number (1 = January). Returns `None`
/// outside 1..=12.
pub fn month_name(month: u32) -> Option<&'static str> {
    u8::try_from(month)
        .ok()
        .and_then(|m| Month::try_from(m).ok())
        .map(|m| m.name())
}
