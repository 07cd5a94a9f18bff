use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::TaxError;

/// How an OSVČ claims expenses against income.
///
/// The flat modes (paušální výdaje) deduct a percentage of income up to a
/// cap; `Actual` uses the documented expense total supplied by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseMode {
    /// Rentals.
    Flat30,
    /// Most services and liberal professions.
    Flat40,
    /// Trades and sales; the usual choice for app store income.
    Flat60,
    /// Agriculture and craft trades.
    Flat80,
    Actual,
}

impl ExpenseMode {
    pub const ALL: [ExpenseMode; 5] = [
        Self::Flat30,
        Self::Flat40,
        Self::Flat60,
        Self::Flat80,
        Self::Actual,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Flat30 => "flat30",
            Self::Flat40 => "flat40",
            Self::Flat60 => "flat60",
            Self::Flat80 => "flat80",
            Self::Actual => "actual",
        }
    }

    pub fn is_flat(&self) -> bool {
        !matches!(self, Self::Actual)
    }
}

impl fmt::Display for ExpenseMode {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExpenseMode {
    type Err = TaxError;

    /// Accepts the short names (`flat60`) and the Czech-style aliases
    /// (`pausal_60`), case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "flat30" | "pausal_30" => Ok(Self::Flat30),
            "flat40" | "pausal_40" => Ok(Self::Flat40),
            "flat60" | "pausal_60" => Ok(Self::Flat60),
            "flat80" | "pausal_80" => Ok(Self::Flat80),
            "actual" => Ok(Self::Actual),
            _ => Err(TaxError::InvalidExpenseMode(s.to_string())),
        }
    }
}
