//! Built-in rulesets shipped with the crate.
//!
//! These are ordinary [`RuleSet`] values; nothing reads them implicitly.
//! Callers opt in through [`RuleSetRegistry::with_builtin`] or by loading
//! [`BuiltinRuleSets`] as a source.
//!
//! [`RuleSetRegistry::with_builtin`]: crate::rules::RuleSetRegistry::with_builtin

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal_macros::dec;

use crate::TaxError;
use crate::models::{ExpenseTable, ExpenseTier, RuleSet};
use crate::rules::RuleSetSource;

/// The year a [`RuleSetRegistry::with_builtin`] registry falls back to.
///
/// [`RuleSetRegistry::with_builtin`]: crate::rules::RuleSetRegistry::with_builtin
pub const DEFAULT_YEAR: i32 = 2026;

fn expense_table() -> ExpenseTable {
    ExpenseTable {
        flat30: ExpenseTier {
            rate: dec!(0.30),
            cap: dec!(600000),
        },
        flat40: ExpenseTier {
            rate: dec!(0.40),
            cap: dec!(800000),
        },
        flat60: ExpenseTier {
            rate: dec!(0.60),
            cap: dec!(2000000),
        },
        flat80: ExpenseTier {
            rate: dec!(0.80),
            cap: dec!(1600000),
        },
    }
}

fn january_first(year: i32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, 1, 1).unwrap_or_default()
}

pub fn rules_2025() -> RuleSet {
    RuleSet {
        year: 2025,
        version: "1.0".to_string(),
        effective_from: january_first(2025),
        description: Some("Statutory rates for tax year 2025".to_string()),
        corporate_tax_rate: dec!(0.21),
        dividend_withholding_rate: dec!(0.15),
        personal_tax_rate: dec!(0.15),
        personal_tax_rate_high: dec!(0.23),
        solidarity_threshold: dec!(1935552),
        basic_tax_credit: dec!(30840),
        employee_social_rate: dec!(0.065),
        employer_social_rate: dec!(0.248),
        employee_health_rate: dec!(0.045),
        employer_health_rate: dec!(0.09),
        social_max_base: dec!(2110416),
        expenses: expense_table(),
        health_base_rate: dec!(0.50),
        health_contrib_rate: dec!(0.135),
        health_min_base: None,
        social_base_rate: dec!(0.55),
        social_contrib_rate: dec!(0.292),
        social_secondary_threshold: dec!(105520),
        social_min_base: None,
    }
}

pub fn rules_2026() -> RuleSet {
    RuleSet {
        year: 2026,
        effective_from: january_first(2026),
        description: Some("Statutory rates for tax year 2026".to_string()),
        solidarity_threshold: dec!(2000000),
        social_max_base: dec!(2200000),
        ..rules_2025()
    }
}

/// Every built-in ruleset, oldest first.
pub fn builtin() -> Vec<RuleSet> {
    vec![rules_2025(), rules_2026()]
}

/// A [`RuleSetSource`] yielding the built-in rulesets.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinRuleSets;

#[async_trait]
impl RuleSetSource for BuiltinRuleSets {
    fn source_name(&self) -> &str {
        "builtin"
    }

    async fn load(&self) -> Result<Vec<RuleSet>, TaxError> {
        Ok(builtin())
    }
}
