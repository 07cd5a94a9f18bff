//! Personal income tax on employment income.
//!
//! # Pipeline
//!
//! | Step | Figure | Rule |
//! |------|--------|------|
//! | 1 | Social insurance | `round(min(gross, cap) * employee social rate)` |
//! | 2 | Health insurance | `round(gross * employee health rate)`, no cap |
//! | 3 | Income tax | `round(gross * base rate)` |
//! | 4 | Solidarity surtax | `round(min(excess, gross) * (high rate - base rate))` where `excess = gross + other income - threshold` |
//! | 5 | Net salary | gross minus steps 1-4 |
//! | 6 | Employer cost | `gross + round(social base * employer social rate) + round(gross * employer health rate)` |
//!
//! Each figure is rounded to whole CZK where it is computed, never at the end.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::calculations::common::round_czk;
use crate::models::RuleSet;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryTaxResult {
    pub gross_salary: Decimal,
    pub other_income: Decimal,
    /// Gross salary capped at the social insurance maximum base.
    pub social_base: Decimal,
    pub social_insurance: Decimal,
    pub health_insurance: Decimal,
    pub income_tax: Decimal,
    pub solidarity_surtax: Decimal,
    /// Employee insurance plus income tax plus surtax.
    pub total_deductions: Decimal,
    pub net_salary: Decimal,
    pub employer_social: Decimal,
    pub employer_health: Decimal,
    pub employer_cost: Decimal,
    /// `total_deductions / gross_salary`.
    pub effective_rate: Decimal,
    pub ruleset_version: String,
}

/// Calculator for salary taxation and employer cost.
#[derive(Debug, Clone, Copy)]
pub struct PersonalIncomeEngine<'a> {
    rules: &'a RuleSet,
}

impl<'a> PersonalIncomeEngine<'a> {
    pub fn new(rules: &'a RuleSet) -> Self {
        Self { rules }
    }

    /// Calculates employee deductions, net pay and employer cost for one
    /// salary.
    ///
    /// `other_income` is the person's other taxable income, taken as given;
    /// it only moves the point at which the solidarity surtax starts.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use czech_tax_core::calculations::PersonalIncomeEngine;
    /// use czech_tax_core::rules::RuleSetRegistry;
    ///
    /// let registry = RuleSetRegistry::with_builtin();
    /// let engine = PersonalIncomeEngine::new(registry.resolve(2025).unwrap());
    ///
    /// let result = engine.salary_tax(dec!(50000), dec!(0));
    ///
    /// assert_eq!(result.net_salary, dec!(37000));
    /// assert_eq!(result.employer_cost, dec!(66900));
    /// ```
    pub fn salary_tax(
        &self,
        gross_salary: Decimal,
        other_income: Decimal,
    ) -> SalaryTaxResult {
        if gross_salary <= Decimal::ZERO {
            warn!(gross_salary = %gross_salary, "gross salary is zero or negative; nothing is due");
            return self.no_salary(gross_salary, other_income);
        }

        let social_base = gross_salary.min(self.rules.social_max_base);
        let social_insurance = round_czk(social_base * self.rules.employee_social_rate);
        let health_insurance = round_czk(gross_salary * self.rules.employee_health_rate);
        let income_tax = round_czk(gross_salary * self.rules.personal_tax_rate);
        let solidarity_surtax = self.solidarity_surtax(gross_salary, other_income);

        let total_deductions = social_insurance + health_insurance + income_tax + solidarity_surtax;

        let employer_social = round_czk(social_base * self.rules.employer_social_rate);
        let employer_health = round_czk(gross_salary * self.rules.employer_health_rate);

        SalaryTaxResult {
            gross_salary,
            other_income,
            social_base,
            social_insurance,
            health_insurance,
            income_tax,
            solidarity_surtax,
            total_deductions,
            net_salary: gross_salary - total_deductions,
            employer_social,
            employer_health,
            employer_cost: gross_salary + employer_social + employer_health,
            effective_rate: total_deductions / gross_salary,
            ruleset_version: self.rules.version.clone(),
        }
    }

    /// Surtax on the part of this salary lying above the solidarity
    /// threshold once other income is counted first.
    fn solidarity_surtax(
        &self,
        gross_salary: Decimal,
        other_income: Decimal,
    ) -> Decimal {
        let total_income = gross_salary + other_income;
        if total_income <= self.rules.solidarity_threshold {
            return Decimal::ZERO;
        }

        let excess = total_income - self.rules.solidarity_threshold;
        let taxable_excess = excess.min(gross_salary);
        debug!(
            total_income = %total_income,
            threshold = %self.rules.solidarity_threshold,
            taxable_excess = %taxable_excess,
            "solidarity surtax applies"
        );

        round_czk(taxable_excess * self.rules.solidarity_surtax_rate())
    }

    fn no_salary(
        &self,
        gross_salary: Decimal,
        other_income: Decimal,
    ) -> SalaryTaxResult {
        SalaryTaxResult {
            gross_salary,
            other_income,
            social_base: Decimal::ZERO,
            social_insurance: Decimal::ZERO,
            health_insurance: Decimal::ZERO,
            income_tax: Decimal::ZERO,
            solidarity_surtax: Decimal::ZERO,
            total_deductions: Decimal::ZERO,
            net_salary: gross_salary,
            employer_social: Decimal::ZERO,
            employer_health: Decimal::ZERO,
            employer_cost: gross_salary,
            effective_rate: Decimal::ZERO,
            ruleset_version: self.rules.version.clone(),
        }
    }
}
