use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::TaxError;
use crate::models::ExpenseMode;

/// A flat-rate expense tier: `min(income * rate, cap)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseTier {
    pub rate: Decimal,
    pub cap: Decimal,
}

/// The four statutory flat-rate expense tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseTable {
    pub flat30: ExpenseTier,
    pub flat40: ExpenseTier,
    pub flat60: ExpenseTier,
    pub flat80: ExpenseTier,
}

impl ExpenseTable {
    /// Returns the tier for a flat mode, or `None` for [`ExpenseMode::Actual`].
    pub fn tier(
        &self,
        mode: ExpenseMode,
    ) -> Option<&ExpenseTier> {
        match mode {
            ExpenseMode::Flat30 => Some(&self.flat30),
            ExpenseMode::Flat40 => Some(&self.flat40),
            ExpenseMode::Flat60 => Some(&self.flat60),
            ExpenseMode::Flat80 => Some(&self.flat80),
            ExpenseMode::Actual => None,
        }
    }
}

/// Year-specific rates, thresholds, caps and credits.
///
/// A `RuleSet` is identified by `(year, version)`. Once a result has been
/// computed against it, its values must not change; corrections are shipped
/// as a new version instead. Engines only ever borrow it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSet {
    pub year: i32,
    pub version: String,
    pub effective_from: NaiveDate,
    pub description: Option<String>,

    // Corporate (DPPO) and dividends
    pub corporate_tax_rate: Decimal,
    pub dividend_withholding_rate: Decimal,

    // Personal income tax (DPFO)
    pub personal_tax_rate: Decimal,
    pub personal_tax_rate_high: Decimal,
    pub solidarity_threshold: Decimal,
    pub basic_tax_credit: Decimal,

    // Employment insurance
    pub employee_social_rate: Decimal,
    pub employer_social_rate: Decimal,
    pub employee_health_rate: Decimal,
    pub employer_health_rate: Decimal,
    pub social_max_base: Decimal,

    // OSVČ
    pub expenses: ExpenseTable,
    pub health_base_rate: Decimal,
    pub health_contrib_rate: Decimal,
    pub health_min_base: Option<Decimal>,
    pub social_base_rate: Decimal,
    pub social_contrib_rate: Decimal,
    /// Rozhodná částka for secondary self-employment.
    pub social_secondary_threshold: Decimal,
    pub social_min_base: Option<Decimal>,
}

impl RuleSet {
    /// The surtax rate applied on top of the base rate above the threshold.
    pub fn solidarity_surtax_rate(&self) -> Decimal {
        self.personal_tax_rate_high - self.personal_tax_rate
    }

    /// Validates the ruleset values.
    ///
    /// # Errors
    ///
    /// Returns [`TaxError::InvalidConfiguration`] naming the first offending
    /// field if:
    /// - the version tag is empty
    /// - any rate is outside `[0, 1]`
    /// - the high personal rate is below the base rate
    /// - any threshold, cap, credit or minimum base is negative
    pub fn validate(&self) -> Result<(), TaxError> {
        if self.version.trim().is_empty() {
            return Err(self.invalid("version tag must not be empty".to_string()));
        }

        let mut rates = vec![
            ("corporate_tax_rate", self.corporate_tax_rate),
            ("dividend_withholding_rate", self.dividend_withholding_rate),
            ("personal_tax_rate", self.personal_tax_rate),
            ("personal_tax_rate_high", self.personal_tax_rate_high),
            ("employee_social_rate", self.employee_social_rate),
            ("employer_social_rate", self.employer_social_rate),
            ("employee_health_rate", self.employee_health_rate),
            ("employer_health_rate", self.employer_health_rate),
            ("health_base_rate", self.health_base_rate),
            ("health_contrib_rate", self.health_contrib_rate),
            ("social_base_rate", self.social_base_rate),
            ("social_contrib_rate", self.social_contrib_rate),
        ];
        for mode in ExpenseMode::ALL {
            if let Some(tier) = self.expenses.tier(mode) {
                rates.push((mode.as_str(), tier.rate));
            }
        }
        for (name, rate) in rates {
            if rate < Decimal::ZERO || rate > Decimal::ONE {
                return Err(self.invalid(format!("{name} must be between 0 and 1, got {rate}")));
            }
        }

        if self.personal_tax_rate_high < self.personal_tax_rate {
            return Err(self.invalid(format!(
                "personal_tax_rate_high {} is below personal_tax_rate {}",
                self.personal_tax_rate_high, self.personal_tax_rate
            )));
        }

        let mut amounts = vec![
            ("solidarity_threshold", Some(self.solidarity_threshold)),
            ("basic_tax_credit", Some(self.basic_tax_credit)),
            ("social_max_base", Some(self.social_max_base)),
            ("social_secondary_threshold", Some(self.social_secondary_threshold)),
            ("health_min_base", self.health_min_base),
            ("social_min_base", self.social_min_base),
        ];
        for mode in ExpenseMode::ALL {
            if let Some(tier) = self.expenses.tier(mode) {
                amounts.push((mode.as_str(), Some(tier.cap)));
            }
        }
        for (name, amount) in amounts {
            if let Some(amount) = amount {
                if amount < Decimal::ZERO {
                    return Err(self.invalid(format!("{name} must be non-negative, got {amount}")));
                }
            }
        }

        Ok(())
    }

    fn invalid(
        &self,
        reason: String,
    ) -> TaxError {
        TaxError::InvalidConfiguration(format!(
            "ruleset {}/{}: {reason}",
            self.year, self.version
        ))
    }
}
