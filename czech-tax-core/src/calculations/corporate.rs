//! Corporate income tax (DPPO) and dividend withholding.
//!
//! Extracting profit from a company as a dividend is taxed twice: the
//! company pays corporate tax on its profit, then the after-tax profit paid
//! out is subject to withholding. At 21% / 15% the combined effective rate
//! converges on `0.21 + 0.79 * 0.15 = 32.85%`.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use czech_tax_core::calculations::CorporateTaxEngine;
//! use czech_tax_core::rules::RuleSetRegistry;
//!
//! let registry = RuleSetRegistry::with_builtin();
//! let engine = CorporateTaxEngine::new(registry.resolve(2025).unwrap());
//!
//! let result = engine.full_cycle(dec!(1000000));
//!
//! assert_eq!(result.total_tax, dec!(328500));
//! assert_eq!(result.net_dividend, dec!(671500));
//! assert_eq!(result.effective_rate, dec!(0.3285));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::calculations::common::round_czk;
use crate::models::RuleSet;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorporateTaxResult {
    /// Company profit as supplied.
    pub profit_before_tax: Decimal,
    /// Tax rounded to whole CZK; zero for a loss.
    pub corporate_tax: Decimal,
    pub profit_after_tax: Decimal,
    /// `corporate_tax / profit_before_tax`, zero for a loss.
    pub effective_rate: Decimal,
    /// Version of the ruleset the figures were computed with.
    pub ruleset_version: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DividendTaxResult {
    /// Dividend before withholding.
    pub gross_dividend: Decimal,
    /// Withholding tax rounded to whole CZK.
    pub withholding_tax: Decimal,
    /// Amount paid out to the shareholder.
    pub net_dividend: Decimal,
    /// Version of the ruleset the figures were computed with.
    pub ruleset_version: String,
}

/// Corporate tax followed by withholding on the whole after-tax profit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FullCycleResult {
    /// Company profit as supplied.
    pub profit_before_tax: Decimal,
    pub corporate_tax: Decimal,
    /// Profit left for distribution.
    pub profit_after_tax: Decimal,
    /// Withholding on the distributed after-tax profit.
    pub dividend_withholding: Decimal,
    /// What reaches the shareholder.
    pub net_dividend: Decimal,
    /// Corporate tax plus withholding.
    pub total_tax: Decimal,
    /// `total_tax / profit_before_tax`, zero when there is no profit.
    pub effective_rate: Decimal,
    /// Version of the ruleset the figures were computed with.
    pub ruleset_version: String,
}

/// Calculator for corporate tax and the dividend cycle.
#[derive(Debug, Clone, Copy)]
pub struct CorporateTaxEngine<'a> {
    rules: &'a RuleSet,
}

impl<'a> CorporateTaxEngine<'a> {
    pub fn new(rules: &'a RuleSet) -> Self {
        Self { rules }
    }

    /// Calculates corporate income tax on a profit.
    ///
    /// A loss or zero profit owes nothing; losses are not carried back.
    pub fn corporate_tax(
        &self,
        profit_before_tax: Decimal,
    ) -> CorporateTaxResult {
        if profit_before_tax <= Decimal::ZERO {
            warn!(profit = %profit_before_tax, "profit is zero or negative; no corporate tax is due");
            return CorporateTaxResult {
                profit_before_tax,
                corporate_tax: Decimal::ZERO,
                profit_after_tax: profit_before_tax,
                effective_rate: Decimal::ZERO,
                ruleset_version: self.rules.version.clone(),
            };
        }

        let tax = round_czk(profit_before_tax * self.rules.corporate_tax_rate);

        CorporateTaxResult {
            profit_before_tax,
            corporate_tax: tax,
            profit_after_tax: profit_before_tax - tax,
            effective_rate: tax / profit_before_tax,
            ruleset_version: self.rules.version.clone(),
        }
    }

    /// Calculates withholding tax on a gross dividend.
    pub fn dividend_withholding(
        &self,
        gross_dividend: Decimal,
    ) -> DividendTaxResult {
        let withholding_tax = if gross_dividend <= Decimal::ZERO {
            warn!(gross_dividend = %gross_dividend, "dividend is zero or negative; nothing is withheld");
            Decimal::ZERO
        } else {
            round_czk(gross_dividend * self.rules.dividend_withholding_rate)
        };

        DividendTaxResult {
            gross_dividend,
            withholding_tax,
            net_dividend: gross_dividend - withholding_tax,
            ruleset_version: self.rules.version.clone(),
        }
    }

    /// Runs corporate tax, then withholding on the after-tax profit.
    pub fn full_cycle(
        &self,
        profit_before_tax: Decimal,
    ) -> FullCycleResult {
        let corporate = self.corporate_tax(profit_before_tax);
        let dividend = self.dividend_withholding(corporate.profit_after_tax);

        let total_tax = corporate.corporate_tax + dividend.withholding_tax;
        let effective_rate = if profit_before_tax > Decimal::ZERO {
            total_tax / profit_before_tax
        } else {
            Decimal::ZERO
        };

        FullCycleResult {
            profit_before_tax,
            corporate_tax: corporate.corporate_tax,
            profit_after_tax: corporate.profit_after_tax,
            dividend_withholding: dividend.withholding_tax,
            net_dividend: dividend.net_dividend,
            total_tax,
            effective_rate,
            ruleset_version: self.rules.version.clone(),
        }
    }
}
