//! Dividend versus salary comparison for an owner-manager.
//!
//! The whole profit is treated as the gross salary in the salary scenario.
//! Employer contributions are reported but not netted against the profit.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calculations::common::round_czk;
use crate::calculations::corporate::CorporateTaxEngine;
use crate::calculations::salary::PersonalIncomeEngine;
use crate::models::RuleSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayoutOption {
    Dividend,
    Salary,
}

impl PayoutOption {
    /// Czech name used in the reasoning text.
    pub fn czech_name(&self) -> &'static str {
        match self {
            Self::Dividend => "dividenda",
            Self::Salary => "mzda",
        }
    }
}

impl fmt::Display for PayoutOption {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Self::Dividend => f.write_str("dividend"),
            Self::Salary => f.write_str("salary"),
        }
    }
}

/// Profit paid out through corporate tax and dividend withholding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DividendScenario {
    /// Net dividend reaching the owner.
    pub net_amount: Decimal,
    /// Corporate tax plus withholding.
    pub total_tax: Decimal,
    /// `total_tax / profit`.
    pub effective_rate: Decimal,
}

/// Profit paid out as one gross salary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryScenario {
    /// Net salary after employee deductions.
    pub net_amount: Decimal,
    /// Employee insurance, income tax and surtax.
    pub total_tax: Decimal,
    /// `total_tax / profit`.
    pub effective_rate: Decimal,
    /// Gross salary plus employer insurance.
    pub employer_cost: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayoutComparison {
    /// Profit available for payout.
    pub profit: Decimal,
    /// Other taxable income of the recipient.
    pub other_income: Decimal,
    pub dividend: DividendScenario,
    pub salary: SalaryScenario,
    /// Option with the larger net amount; salary on a tie.
    pub better_option: PayoutOption,
    /// Absolute difference between the two net amounts.
    pub savings: Decimal,
    /// Czech-language summary of the outcome.
    pub reasoning: String,
    /// Version of the ruleset the figures were computed with.
    pub ruleset_version: String,
}

/// Compares paying a profit out as a dividend against paying it as salary.
#[derive(Debug, Clone, Copy)]
pub struct PayoutComparator<'a> {
    rules: &'a RuleSet,
}

impl<'a> PayoutComparator<'a> {
    pub fn new(rules: &'a RuleSet) -> Self {
        Self { rules }
    }

    /// Runs both scenarios and recommends the one with the larger net
    /// amount. A tie goes to salary.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use czech_tax_core::calculations::{PayoutComparator, PayoutOption};
    /// use czech_tax_core::rules::RuleSetRegistry;
    ///
    /// let registry = RuleSetRegistry::with_builtin();
    /// let comparison = PayoutComparator::new(registry.resolve(2025).unwrap())
    ///     .compare(dec!(1000000), dec!(0));
    ///
    /// assert_eq!(comparison.dividend.net_amount, dec!(671500));
    /// assert_eq!(comparison.salary.net_amount, dec!(740000));
    /// assert_eq!(comparison.better_option, PayoutOption::Salary);
    /// assert_eq!(comparison.savings, dec!(68500));
    /// ```
    pub fn compare(
        &self,
        profit: Decimal,
        other_income: Decimal,
    ) -> PayoutComparison {
        let dividend = CorporateTaxEngine::new(self.rules).full_cycle(profit);
        let salary = PersonalIncomeEngine::new(self.rules).salary_tax(profit, other_income);

        let (better_option, savings) = if dividend.net_dividend > salary.net_salary {
            (PayoutOption::Dividend, dividend.net_dividend - salary.net_salary)
        } else {
            (PayoutOption::Salary, salary.net_salary - dividend.net_dividend)
        };

        debug!(
            profit = %profit,
            dividend_net = %dividend.net_dividend,
            salary_net = %salary.net_salary,
            better = %better_option,
            "payout options compared"
        );

        PayoutComparison {
            profit,
            other_income: salary.other_income,
            dividend: DividendScenario {
                net_amount: dividend.net_dividend,
                total_tax: dividend.total_tax,
                effective_rate: dividend.effective_rate,
            },
            salary: SalaryScenario {
                net_amount: salary.net_salary,
                total_tax: salary.total_deductions,
                effective_rate: salary.effective_rate,
                employer_cost: salary.employer_cost,
            },
            better_option,
            savings,
            reasoning: format!(
                "Při zisku {} Kč je výhodnější {}. Úspora: {} Kč.",
                format_czk(profit),
                better_option.czech_name(),
                format_czk(savings)
            ),
            ruleset_version: self.rules.version.clone(),
        }
    }
}

/// Formats an amount as whole CZK with thousands separated by spaces.
///
/// ```
/// use rust_decimal_macros::dec;
/// use czech_tax_core::calculations::format_czk;
///
/// assert_eq!(format_czk(dec!(1234567.5)), "1 234 568");
/// assert_eq!(format_czk(dec!(-950)), "-950");
/// ```
pub fn format_czk(amount: Decimal) -> String {
    let rounded = round_czk(amount);
    let digits = rounded.abs().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if rounded.is_sign_negative() && !rounded.is_zero() {
        grouped.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(ch);
    }
    grouped
}
