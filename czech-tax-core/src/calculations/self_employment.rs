//! Self-employed (OSVČ) income tax, health and social insurance.
//!
//! # Pipeline
//!
//! | Step | Figure | Rule |
//! |------|--------|------|
//! | 1 | Expenses | flat modes: `min(income * rate, cap)`; actual: documented total |
//! | 2 | Profit | `max(income - expenses, 0)` |
//! | 3 | Tax base | profit floored to a multiple of 100 CZK |
//! | 4 | DPFO | base rate up to the solidarity threshold, high rate above; rounded; minus the basic credit, floored at 0 |
//! | 5 | VZP | base `round(profit * 50%)` raised to the minimum; `round(base * 13.5%)`; advance `round(contribution / 12)` |
//! | 6 | ČSSZ | secondary activity pays only above the threshold; base `round(profit * 55%)` raised to the minimum; `round(base * 29.2%)` |
//! | 7 | Totals | tax due, insurance due, and their sum |
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use czech_tax_core::calculations::SelfEmploymentEngine;
//! use czech_tax_core::models::ExpenseMode;
//! use czech_tax_core::rules::RuleSetRegistry;
//!
//! let registry = RuleSetRegistry::with_builtin();
//! let engine = SelfEmploymentEngine::new(registry.resolve(2025).unwrap());
//!
//! let expenses = engine.calculate_expenses(dec!(1000000), ExpenseMode::Flat60, None);
//! let dpfo = engine.calculate_dpfo(dec!(1000000), expenses, true);
//! let vzp = engine.calculate_vzp(dpfo.profit);
//! let cssz = engine.calculate_cssz(dpfo.profit, true);
//!
//! assert_eq!(dpfo.tax_due, dec!(29160));
//! assert_eq!(vzp.contribution, dec!(27000));
//! assert_eq!(cssz.contribution, dec!(64240));
//! ```

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::calculations::common::{floor_to_hundreds, max, round_czk};
use crate::models::{ExpenseMode, IncomeRecord, RuleSet};

const MONTHS: Decimal = dec!(12);

/// Per-taxpayer choices that shape an OSVČ computation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OsvcInput {
    pub expense_mode: ExpenseMode,

    /// Documented expenses; only read in [`ExpenseMode::Actual`].
    pub actual_expenses: Option<Decimal>,

    /// Self-employment alongside employment (OSVČ vedlejší). Social insurance
    /// is only due above the secondary-activity threshold.
    pub is_secondary: bool,

    /// Subtract the basic personal credit (sleva na poplatníka).
    pub apply_basic_credit: bool,
}

impl Default for OsvcInput {
    fn default() -> Self {
        Self {
            expense_mode: ExpenseMode::Flat60,
            actual_expenses: None,
            is_secondary: true,
            apply_basic_credit: true,
        }
    }
}

/// Personal income tax (DPFO).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DpfoResult {
    pub total_income: Decimal,
    pub expenses: Decimal,
    /// Základ daně.
    pub profit: Decimal,
    /// Profit floored to hundreds.
    pub tax_base: Decimal,
    pub tax_before_credits: Decimal,
    pub tax_credits: Decimal,
    pub tax_due: Decimal,
    /// `tax_due / profit`, zero without profit.
    pub effective_rate: Decimal,
}

/// Health insurance (VZP).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VzpResult {
    pub profit: Decimal,
    pub assessment_base: Decimal,
    pub contribution: Decimal,
    pub monthly_advance: Decimal,
}

/// Social insurance (ČSSZ).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsszResult {
    pub profit: Decimal,
    /// Rozhodná částka.
    pub threshold: Decimal,
    pub above_threshold: bool,
    pub assessment_base: Decimal,
    pub contribution: Decimal,
    pub monthly_advance: Decimal,
}

/// Full result of an OSVČ tax year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OsvcComputation {
    pub total_income: Decimal,
    pub total_expenses: Decimal,
    pub profit: Decimal,
    pub dpfo: DpfoResult,
    pub vzp: VzpResult,
    pub cssz: CsszResult,
    pub total_tax_due: Decimal,
    pub total_insurance_due: Decimal,
    pub total_due: Decimal,
    pub ruleset_version: String,
    /// Number of income records summed into `total_income`.
    pub included_entries: usize,
}

/// Flat view of an [`OsvcComputation`], one column per figure, for storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OsvcSummary {
    pub total_income: Decimal,
    pub total_expenses: Decimal,
    pub profit: Decimal,
    pub health_base: Decimal,
    pub health_due: Decimal,
    pub social_threshold_hit: bool,
    pub social_base: Decimal,
    pub social_due: Decimal,
    pub income_tax_base: Decimal,
    pub income_tax_before_credits: Decimal,
    pub income_tax_credits: Decimal,
    pub income_tax_due: Decimal,
    pub total_due: Decimal,
    pub ruleset_version: String,
    pub included_entries: usize,
}

impl OsvcComputation {
    pub fn summary(&self) -> OsvcSummary {
        OsvcSummary {
            total_income: self.total_income,
            total_expenses: self.total_expenses,
            profit: self.profit,
            health_base: self.vzp.assessment_base,
            health_due: self.vzp.contribution,
            social_threshold_hit: self.cssz.above_threshold,
            social_base: self.cssz.assessment_base,
            social_due: self.cssz.contribution,
            income_tax_base: self.dpfo.tax_base,
            income_tax_before_credits: self.dpfo.tax_before_credits,
            income_tax_credits: self.dpfo.tax_credits,
            income_tax_due: self.dpfo.tax_due,
            total_due: self.total_due,
            ruleset_version: self.ruleset_version.clone(),
            included_entries: self.included_entries,
        }
    }
}

/// Calculator for OSVČ obligations.
#[derive(Debug, Clone, Copy)]
pub struct SelfEmploymentEngine<'a> {
    rules: &'a RuleSet,
}

impl<'a> SelfEmploymentEngine<'a> {
    pub fn new(rules: &'a RuleSet) -> Self {
        Self { rules }
    }

    /// Runs the whole pipeline over a year's income records.
    pub fn calculate(
        &self,
        input: &OsvcInput,
        income: &[IncomeRecord],
    ) -> OsvcComputation {
        let total_income = IncomeRecord::total_czk(income);
        let expenses =
            self.calculate_expenses(total_income, input.expense_mode, input.actual_expenses);

        let dpfo = self.calculate_dpfo(total_income, expenses, input.apply_basic_credit);
        let vzp = self.calculate_vzp(dpfo.profit);
        let cssz = self.calculate_cssz(dpfo.profit, input.is_secondary);

        let total_tax_due = dpfo.tax_due;
        let total_insurance_due = vzp.contribution + cssz.contribution;

        debug!(
            entries = income.len(),
            total_income = %total_income,
            mode = %input.expense_mode,
            total_due = %(total_tax_due + total_insurance_due),
            "osvc computation finished"
        );

        OsvcComputation {
            total_income,
            total_expenses: expenses,
            profit: dpfo.profit,
            dpfo,
            vzp,
            cssz,
            total_tax_due,
            total_insurance_due,
            total_due: total_tax_due + total_insurance_due,
            ruleset_version: self.rules.version.clone(),
            included_entries: income.len(),
        }
    }

    /// Resolves the expense deduction for an expense mode.
    ///
    /// Flat modes take `min(income * rate, cap)`. `Actual` takes the
    /// documented total; a missing total counts as zero.
    pub fn calculate_expenses(
        &self,
        total_income: Decimal,
        mode: ExpenseMode,
        actual_expenses: Option<Decimal>,
    ) -> Decimal {
        let expenses = match self.rules.expenses.tier(mode) {
            Some(tier) => (total_income * tier.rate).min(tier.cap),
            None => actual_expenses.unwrap_or_else(|| {
                warn!("actual expense mode without documented expenses; using zero");
                Decimal::ZERO
            }),
        };

        if expenses < Decimal::ZERO {
            warn!(expenses = %expenses, mode = %mode, "negative expenses treated as zero");
            return Decimal::ZERO;
        }
        expenses
    }

    /// Calculates personal income tax on income less expenses.
    pub fn calculate_dpfo(
        &self,
        total_income: Decimal,
        expenses: Decimal,
        apply_basic_credit: bool,
    ) -> DpfoResult {
        let profit = max(total_income - expenses, Decimal::ZERO);
        let tax_base = floor_to_hundreds(profit);
        let tax_before_credits = round_czk(self.progressive_tax(tax_base));

        let tax_credits = if apply_basic_credit {
            self.rules.basic_tax_credit
        } else {
            Decimal::ZERO
        };
        let tax_due = max(tax_before_credits - tax_credits, Decimal::ZERO);

        let effective_rate = if profit > Decimal::ZERO {
            tax_due / profit
        } else {
            Decimal::ZERO
        };

        DpfoResult {
            total_income,
            expenses,
            profit,
            tax_base,
            tax_before_credits,
            tax_credits,
            tax_due,
            effective_rate,
        }
    }

    /// Calculates health insurance on profit.
    pub fn calculate_vzp(
        &self,
        profit: Decimal,
    ) -> VzpResult {
        let profit = self.non_negative_profit(profit);
        let assessment_base = raise_to_minimum(
            round_czk(profit * self.rules.health_base_rate),
            self.rules.health_min_base,
        );
        let contribution = round_czk(assessment_base * self.rules.health_contrib_rate);

        VzpResult {
            profit,
            assessment_base,
            contribution,
            monthly_advance: round_czk(contribution / MONTHS),
        }
    }

    /// Calculates social insurance on profit.
    ///
    /// Primary self-employment always pays. Secondary self-employment pays
    /// only when profit is strictly above the threshold.
    pub fn calculate_cssz(
        &self,
        profit: Decimal,
        is_secondary: bool,
    ) -> CsszResult {
        let profit = self.non_negative_profit(profit);
        let threshold = self.rules.social_secondary_threshold;
        let above_threshold = !is_secondary || profit > threshold;

        if !above_threshold {
            debug!(profit = %profit, threshold = %threshold, "secondary activity below threshold; no social insurance");
            return CsszResult {
                profit,
                threshold,
                above_threshold,
                assessment_base: Decimal::ZERO,
                contribution: Decimal::ZERO,
                monthly_advance: Decimal::ZERO,
            };
        }

        let assessment_base = raise_to_minimum(
            round_czk(profit * self.rules.social_base_rate),
            self.rules.social_min_base,
        );
        let contribution = round_czk(assessment_base * self.rules.social_contrib_rate);

        CsszResult {
            profit,
            threshold,
            above_threshold,
            assessment_base,
            contribution,
            monthly_advance: round_czk(contribution / MONTHS),
        }
    }

    fn progressive_tax(
        &self,
        tax_base: Decimal,
    ) -> Decimal {
        let threshold = self.rules.solidarity_threshold;
        if tax_base <= threshold {
            return tax_base * self.rules.personal_tax_rate;
        }

        debug!(tax_base = %tax_base, threshold = %threshold, "tax base above solidarity threshold");
        threshold * self.rules.personal_tax_rate
            + (tax_base - threshold) * self.rules.personal_tax_rate_high
    }

    fn non_negative_profit(
        &self,
        profit: Decimal,
    ) -> Decimal {
        if profit < Decimal::ZERO {
            warn!(profit = %profit, "negative profit treated as zero");
            return Decimal::ZERO;
        }
        profit
    }
}

fn raise_to_minimum(
    base: Decimal,
    minimum: Option<Decimal>,
) -> Decimal {
    match minimum {
        Some(min) if base < min => min,
        _ => base,
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::models::IncomeSource;
    use crate::rules::defaults::{rules_2025, rules_2026};

    fn init_test_tracing() -> tracing::subscriber::DefaultGuard {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    fn payout(amount_czk: Decimal) -> IncomeRecord {
        IncomeRecord {
            payout_date: NaiveDate::from_ymd_opt(2025, 6, 30).unwrap(),
            source: IncomeSource::AppstoreSubscription,
            currency: "EUR".to_string(),
            amount: amount_czk / dec!(25),
            amount_czk,
            reference: None,
        }
    }

    // =========================================================================
    // calculate_expenses tests
    // =========================================================================

    #[test]
    fn flat_expenses_use_mode_rate() {
        let rules = rules_2025();
        let engine = SelfEmploymentEngine::new(&rules);

        assert_eq!(engine.calculate_expenses(dec!(1000000), ExpenseMode::Flat30, None), dec!(300000));
        assert_eq!(engine.calculate_expenses(dec!(1000000), ExpenseMode::Flat40, None), dec!(400000));
        assert_eq!(engine.calculate_expenses(dec!(1000000), ExpenseMode::Flat60, None), dec!(600000));
        assert_eq!(engine.calculate_expenses(dec!(1000000), ExpenseMode::Flat80, None), dec!(800000));
    }

    #[test]
    fn flat_expenses_are_capped() {
        let rules = rules_2025();
        let engine = SelfEmploymentEngine::new(&rules);

        assert_eq!(engine.calculate_expenses(dec!(4000000), ExpenseMode::Flat60, None), dec!(2000000));
        assert_eq!(engine.calculate_expenses(dec!(4000000), ExpenseMode::Flat40, None), dec!(800000));
        assert_eq!(engine.calculate_expenses(dec!(4000000), ExpenseMode::Flat30, None), dec!(600000));
        assert_eq!(engine.calculate_expenses(dec!(4000000), ExpenseMode::Flat80, None), dec!(1600000));
    }

    #[test]
    fn actual_expenses_pass_through() {
        let rules = rules_2025();
        let engine = SelfEmploymentEngine::new(&rules);

        let expenses =
            engine.calculate_expenses(dec!(1000000), ExpenseMode::Actual, Some(dec!(123456.78)));

        assert_eq!(expenses, dec!(123456.78));
    }

    #[test]
    fn actual_mode_without_total_is_zero() {
        let _guard = init_test_tracing();
        let rules = rules_2025();
        let engine = SelfEmploymentEngine::new(&rules);

        assert_eq!(engine.calculate_expenses(dec!(1000000), ExpenseMode::Actual, None), dec!(0));
    }

    #[test]
    fn flat_mode_ignores_actual_total() {
        let rules = rules_2025();
        let engine = SelfEmploymentEngine::new(&rules);

        let expenses =
            engine.calculate_expenses(dec!(100000), ExpenseMode::Flat60, Some(dec!(99999)));

        assert_eq!(expenses, dec!(60000));
    }

    #[test]
    fn negative_income_yields_zero_expenses() {
        let _guard = init_test_tracing();
        let rules = rules_2025();
        let engine = SelfEmploymentEngine::new(&rules);

        assert_eq!(engine.calculate_expenses(dec!(-50000), ExpenseMode::Flat60, None), dec!(0));
    }

    // =========================================================================
    // calculate_dpfo tests
    // =========================================================================

    #[test]
    fn dpfo_standard_case() {
        let rules = rules_2025();
        let result = SelfEmploymentEngine::new(&rules).calculate_dpfo(dec!(1000000), dec!(600000), true);

        assert_eq!(
            result,
            DpfoResult {
                total_income: dec!(1000000),
                expenses: dec!(600000),
                profit: dec!(400000),
                tax_base: dec!(400000),
                tax_before_credits: dec!(60000),
                tax_credits: dec!(30840),
                tax_due: dec!(29160),
                effective_rate: dec!(0.0729),
            }
        );
    }

    #[test]
    fn dpfo_floors_tax_base_to_hundreds() {
        let rules = rules_2025();
        let result = SelfEmploymentEngine::new(&rules).calculate_dpfo(dec!(400199), dec!(0), false);

        assert_eq!(result.profit, dec!(400199));
        assert_eq!(result.tax_base, dec!(400100));
        assert_eq!(result.tax_before_credits, dec!(60015));
    }

    #[test]
    fn dpfo_progressive_above_threshold() {
        let rules = rules_2025();

        // 1935552 × 0.15 = 290332.8, 1064448 × 0.23 = 244823.04
        let result = SelfEmploymentEngine::new(&rules).calculate_dpfo(dec!(3000000), dec!(0), true);

        assert_eq!(result.tax_before_credits, dec!(535156));
        assert_eq!(result.tax_due, dec!(504316));
    }

    #[test]
    fn dpfo_threshold_follows_ruleset_year() {
        let rules = rules_2026();

        // 2000000 × 0.15 + 1000000 × 0.23
        let result = SelfEmploymentEngine::new(&rules).calculate_dpfo(dec!(3000000), dec!(0), false);

        assert_eq!(result.tax_before_credits, dec!(530000));
    }

    #[test]
    fn dpfo_credit_never_makes_tax_negative() {
        let rules = rules_2025();
        let result = SelfEmploymentEngine::new(&rules).calculate_dpfo(dec!(100099), dec!(0), true);

        assert_eq!(result.tax_base, dec!(100000));
        assert_eq!(result.tax_before_credits, dec!(15000));
        assert_eq!(result.tax_due, dec!(0));
        assert_eq!(result.effective_rate, dec!(0));
    }

    #[test]
    fn dpfo_without_basic_credit() {
        let rules = rules_2025();
        let result = SelfEmploymentEngine::new(&rules).calculate_dpfo(dec!(1000000), dec!(600000), false);

        assert_eq!(result.tax_credits, dec!(0));
        assert_eq!(result.tax_due, dec!(60000));
    }

    #[test]
    fn dpfo_expenses_above_income_give_zero_profit() {
        let rules = rules_2025();
        let result = SelfEmploymentEngine::new(&rules).calculate_dpfo(dec!(100000), dec!(250000), true);

        assert_eq!(result.profit, dec!(0));
        assert_eq!(result.tax_base, dec!(0));
        assert_eq!(result.tax_due, dec!(0));
        assert_eq!(result.effective_rate, dec!(0));
    }

    // =========================================================================
    // calculate_vzp tests
    // =========================================================================

    #[test]
    fn vzp_standard_case() {
        let rules = rules_2025();
        let result = SelfEmploymentEngine::new(&rules).calculate_vzp(dec!(400000));

        assert_eq!(result.assessment_base, dec!(200000));
        assert_eq!(result.contribution, dec!(27000));
        assert_eq!(result.monthly_advance, dec!(2250));
    }

    #[test]
    fn vzp_rounds_each_step() {
        let rules = rules_2025();

        // 6172.5 → 6173; × 0.135 = 833.355 → 833; / 12 = 69.42 → 69
        let result = SelfEmploymentEngine::new(&rules).calculate_vzp(dec!(12345));

        assert_eq!(result.assessment_base, dec!(6173));
        assert_eq!(result.contribution, dec!(833));
        assert_eq!(result.monthly_advance, dec!(69));
    }

    #[test]
    fn vzp_applies_minimum_base() {
        let rules = RuleSet {
            health_min_base: Some(dec!(258000)),
            ..rules_2025()
        };
        let engine = SelfEmploymentEngine::new(&rules);

        assert_eq!(engine.calculate_vzp(dec!(100000)).assessment_base, dec!(258000));
        assert_eq!(engine.calculate_vzp(dec!(100000)).contribution, dec!(34830));
        assert_eq!(engine.calculate_vzp(dec!(600000)).assessment_base, dec!(300000));
    }

    #[test]
    fn vzp_negative_profit_is_zero() {
        let _guard = init_test_tracing();
        let rules = rules_2025();
        let result = SelfEmploymentEngine::new(&rules).calculate_vzp(dec!(-10000));

        assert_eq!(result.profit, dec!(0));
        assert_eq!(result.contribution, dec!(0));
    }

    // =========================================================================
    // calculate_cssz tests
    // =========================================================================

    #[test]
    fn cssz_standard_case() {
        let rules = rules_2025();
        let result = SelfEmploymentEngine::new(&rules).calculate_cssz(dec!(400000), true);

        assert!(result.above_threshold);
        assert_eq!(result.assessment_base, dec!(220000));
        assert_eq!(result.contribution, dec!(64240));
        // 5353.33
        assert_eq!(result.monthly_advance, dec!(5353));
    }

    #[test]
    fn cssz_secondary_at_threshold_pays_nothing() {
        let rules = rules_2025();
        let result = SelfEmploymentEngine::new(&rules).calculate_cssz(dec!(105520), true);

        assert!(!result.above_threshold);
        assert_eq!(result.threshold, dec!(105520));
        assert_eq!(result.assessment_base, dec!(0));
        assert_eq!(result.contribution, dec!(0));
        assert_eq!(result.monthly_advance, dec!(0));
    }

    #[test]
    fn cssz_secondary_one_crown_above_threshold_pays() {
        let rules = rules_2025();

        // 105521 × 0.55 = 58036.55 → 58037; × 0.292 = 16946.804
        let result = SelfEmploymentEngine::new(&rules).calculate_cssz(dec!(105521), true);

        assert!(result.above_threshold);
        assert_eq!(result.assessment_base, dec!(58037));
        assert_eq!(result.contribution, dec!(16947));
    }

    #[test]
    fn cssz_primary_always_pays() {
        let rules = rules_2025();
        let result = SelfEmploymentEngine::new(&rules).calculate_cssz(dec!(50000), false);

        assert!(result.above_threshold);
        assert_eq!(result.assessment_base, dec!(27500));
        assert_eq!(result.contribution, dec!(8030));
    }

    #[test]
    fn cssz_applies_minimum_base() {
        let rules = RuleSet {
            social_min_base: Some(dec!(140000)),
            ..rules_2025()
        };
        let result = SelfEmploymentEngine::new(&rules).calculate_cssz(dec!(150000), true);

        assert_eq!(result.assessment_base, dec!(140000));
        assert_eq!(result.contribution, dec!(40880));
    }

    #[test]
    fn cssz_minimum_base_ignored_below_threshold() {
        let rules = RuleSet {
            social_min_base: Some(dec!(140000)),
            ..rules_2025()
        };
        let result = SelfEmploymentEngine::new(&rules).calculate_cssz(dec!(50000), true);

        assert_eq!(result.assessment_base, dec!(0));
    }

    // =========================================================================
    // calculate tests
    // =========================================================================

    #[test]
    fn calculate_full_pipeline() {
        let rules = rules_2025();
        let income = vec![payout(dec!(400000)), payout(dec!(350000)), payout(dec!(250000))];

        let result = SelfEmploymentEngine::new(&rules).calculate(&OsvcInput::default(), &income);

        assert_eq!(result.total_income, dec!(1000000));
        assert_eq!(result.total_expenses, dec!(600000));
        assert_eq!(result.profit, dec!(400000));
        assert_eq!(result.total_tax_due, dec!(29160));
        assert_eq!(result.total_insurance_due, dec!(91240));
        assert_eq!(result.total_due, dec!(120400));
        assert_eq!(result.included_entries, 3);
        assert_eq!(result.ruleset_version, "1.0");
    }

    #[test]
    fn calculate_with_actual_expenses() {
        let rules = rules_2025();
        let input = OsvcInput {
            expense_mode: ExpenseMode::Actual,
            actual_expenses: Some(dec!(250000)),
            ..OsvcInput::default()
        };

        let result = SelfEmploymentEngine::new(&rules).calculate(&input, &[payout(dec!(500000))]);

        assert_eq!(result.profit, dec!(250000));
        assert_eq!(result.dpfo.tax_due, dec!(6660));
        assert_eq!(result.vzp.contribution, dec!(16875));
        assert_eq!(result.cssz.contribution, dec!(40150));
    }

    #[test]
    fn calculate_small_secondary_income() {
        let rules = rules_2025();

        // profit 80000 is below the ČSSZ threshold and the credit wipes out DPFO
        let result =
            SelfEmploymentEngine::new(&rules).calculate(&OsvcInput::default(), &[payout(dec!(200000))]);

        assert_eq!(result.profit, dec!(80000));
        assert_eq!(result.total_tax_due, dec!(0));
        assert!(!result.cssz.above_threshold);
        assert_eq!(result.total_insurance_due, dec!(5400));
    }

    #[test]
    fn calculate_without_income() {
        let rules = rules_2025();
        let result = SelfEmploymentEngine::new(&rules).calculate(&OsvcInput::default(), &[]);

        assert_eq!(result.total_income, dec!(0));
        assert_eq!(result.total_due, dec!(0));
        assert_eq!(result.included_entries, 0);
    }

    #[test]
    fn summary_flattens_computation() {
        let rules = rules_2025();
        let result =
            SelfEmploymentEngine::new(&rules).calculate(&OsvcInput::default(), &[payout(dec!(1000000))]);

        let summary = result.summary();

        assert_eq!(summary.health_base, dec!(200000));
        assert_eq!(summary.health_due, dec!(27000));
        assert!(summary.social_threshold_hit);
        assert_eq!(summary.social_base, dec!(220000));
        assert_eq!(summary.social_due, dec!(64240));
        assert_eq!(summary.income_tax_base, dec!(400000));
        assert_eq!(summary.income_tax_before_credits, dec!(60000));
        assert_eq!(summary.income_tax_credits, dec!(30840));
        assert_eq!(summary.income_tax_due, dec!(29160));
        assert_eq!(summary.total_due, dec!(120400));
        assert_eq!(summary.included_entries, 1);
    }
}
