//! Tax depreciation schedules (daňové odpisy).
//!
//! # Methods
//!
//! | Method | First year | Later years |
//! |--------|-----------|-------------|
//! | Linear | `acquisition * first rate / 100` | `acquisition * later rate / 100` |
//! | Accelerated | `acquisition / first coefficient` | `2 * remaining / (later coefficient - years elapsed)` |
//!
//! Every amount is clamped to the value still to be written off, then rounded
//! half-up to 0.01 CZK, so a schedule lands exactly on
//! `acquisition - residual`. Generation stops once nothing remains, or after
//! `legal years + 2` years; the last permitted year charges whatever is left.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use czech_tax_core::calculations::DepreciationEngine;
//! use czech_tax_core::models::{DepreciableAsset, DepreciationGroup, DepreciationMethod};
//!
//! let asset = DepreciableAsset {
//!     acquisition_value: dec!(100000),
//!     residual_value: dec!(0),
//!     group: DepreciationGroup::Group2,
//!     method: DepreciationMethod::Accelerated,
//!     start_year: 2025,
//! };
//!
//! let schedule = DepreciationEngine::new().calculate_schedule(&asset).unwrap();
//!
//! let amounts: Vec<_> = schedule.entries.iter().map(|e| e.amount).collect();
//! assert_eq!(amounts, vec![dec!(20000), dec!(32000), dec!(24000), dec!(16000), dec!(8000)]);
//! assert!(schedule.is_complete());
//! ```

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::TaxError;
use crate::calculations::common::round_half_up;
use crate::models::{
    DepreciableAsset, DepreciationGroup, DepreciationMethod, DepreciationSchedule, ProfitTrend,
    YearlyDepreciation,
};

/// Assets acquired below this value (drobný majetek) may be expensed in full
/// instead of depreciated.
pub const IMMEDIATE_EXPENSE_LIMIT: Decimal = dec!(80000);

/// Extra years allowed beyond the legal period before generation stops.
const SAFETY_MARGIN_YEARS: u32 = 2;

const ASSET_TYPE_GROUPS: [(&str, Option<DepreciationGroup>); 9] = [
    ("computer", Some(DepreciationGroup::Group1)),
    ("laptop", Some(DepreciationGroup::Group1)),
    ("phone", Some(DepreciationGroup::Group1)),
    ("printer", Some(DepreciationGroup::Group1)),
    ("car", Some(DepreciationGroup::Group2)),
    ("furniture", Some(DepreciationGroup::Group2)),
    ("machinery", Some(DepreciationGroup::Group2)),
    ("building", Some(DepreciationGroup::Group5)),
    ("land", None),
];

/// One method's side of a [`MethodComparison`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodSummary {
    pub schedule: DepreciationSchedule,
    pub first_year_deduction: Decimal,
    pub total_years: u32,
}

/// Linear and accelerated schedules for the same asset side by side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodComparison {
    pub linear: MethodSummary,
    pub accelerated: MethodSummary,
    /// Absolute difference between the two first-year deductions.
    pub first_year_difference: Decimal,
    /// The method with the larger first-year deduction.
    pub front_loaded: DepreciationMethod,
    pub recommendation: DepreciationMethod,
}

/// Generator for depreciation schedules.
///
/// Depreciation rates are fixed by statute per group rather than per tax
/// year, so the engine carries no ruleset.
#[derive(Debug, Clone, Copy, Default)]
pub struct DepreciationEngine;

impl DepreciationEngine {
    pub fn new() -> Self {
        Self
    }

    /// Generates the full schedule for an asset.
    ///
    /// # Errors
    ///
    /// Returns [`TaxError::DepreciationInvariant`] if accumulated depreciation
    /// ever exceeds the depreciable base. No partial schedule is returned.
    pub fn calculate_schedule(
        &self,
        asset: &DepreciableAsset,
    ) -> Result<DepreciationSchedule, TaxError> {
        let base = asset.depreciable_base();
        if base <= Decimal::ZERO {
            warn!(
                acquisition_value = %asset.acquisition_value,
                residual_value = %asset.residual_value,
                "nothing to depreciate"
            );
        }

        let last_permitted = asset.group.legal_years() + SAFETY_MARGIN_YEARS - 1;
        let mut entries = Vec::new();
        let mut accumulated = Decimal::ZERO;
        let mut remaining = base;
        let mut years_elapsed: u32 = 0;
        let mut year = asset.start_year;

        while remaining > Decimal::ZERO && years_elapsed <= last_permitted {
            let (computed, rate_or_coefficient) = self.raw_amount(asset, years_elapsed, remaining);

            let amount = if years_elapsed == last_permitted {
                warn!(
                    year,
                    remaining = %remaining,
                    group = %asset.group,
                    "safety bound reached; charging the remaining value"
                );
                remaining
            } else {
                round_half_up(computed.min(remaining))
            };

            accumulated += amount;
            if accumulated > base {
                return Err(TaxError::DepreciationInvariant {
                    year,
                    accumulated,
                    base,
                });
            }
            remaining = base - accumulated;

            entries.push(YearlyDepreciation {
                year,
                amount,
                rate_or_coefficient,
                accumulated,
                remaining_value: remaining,
                is_first_year: years_elapsed == 0,
                is_final_year: remaining <= Decimal::ZERO,
            });

            years_elapsed += 1;
            year += 1;
        }

        debug!(
            method = %asset.method,
            group = %asset.group,
            years = years_elapsed,
            total = %accumulated,
            "depreciation schedule generated"
        );

        Ok(DepreciationSchedule {
            asset: asset.clone(),
            entries,
            total_depreciation: accumulated,
            total_years: years_elapsed,
        })
    }

    /// Computes a single year of depreciation without generating the rest of
    /// the schedule.
    ///
    /// `year_number` is 1-based. `remaining_value` is the value still to be
    /// written off before this year; it defaults to the full depreciable base.
    pub fn calculate_yearly_depreciation(
        &self,
        asset: &DepreciableAsset,
        year_number: u32,
        remaining_value: Option<Decimal>,
    ) -> YearlyDepreciation {
        let base = asset.depreciable_base();
        let remaining = remaining_value.unwrap_or(base).max(Decimal::ZERO);
        let years_elapsed = year_number.saturating_sub(1);

        let (computed, rate_or_coefficient) = self.raw_amount(asset, years_elapsed, remaining);
        let amount = round_half_up(computed.min(remaining));
        let remaining_after = remaining - amount;

        YearlyDepreciation {
            year: asset.start_year + years_elapsed as i32,
            amount,
            rate_or_coefficient,
            accumulated: (base - remaining_after).max(Decimal::ZERO),
            remaining_value: remaining_after,
            is_first_year: years_elapsed == 0,
            is_final_year: remaining_after <= Decimal::ZERO,
        }
    }

    /// Whether an asset is cheap enough to be expensed immediately.
    pub fn can_expense_immediately(
        &self,
        acquisition_value: Decimal,
    ) -> bool {
        acquisition_value < IMMEDIATE_EXPENSE_LIMIT
    }

    /// Recommends a method from the expected profit trend.
    ///
    /// Falling profits favour front-loaded deductions and rising profits
    /// favour spreading them. With stable profits, the short-lived groups 1
    /// and 2 default to accelerated.
    pub fn suggest_method(
        &self,
        group: DepreciationGroup,
        trend: ProfitTrend,
    ) -> DepreciationMethod {
        match trend {
            ProfitTrend::Decreasing => DepreciationMethod::Accelerated,
            ProfitTrend::Increasing => DepreciationMethod::Linear,
            ProfitTrend::Stable => match group {
                DepreciationGroup::Group1 | DepreciationGroup::Group2 => {
                    DepreciationMethod::Accelerated
                }
                _ => DepreciationMethod::Linear,
            },
        }
    }

    /// Guesses the depreciation group from a free-text asset description.
    ///
    /// Returns `None` for unrecognised assets and for land, which is not
    /// depreciable.
    pub fn group_for_asset_type(
        &self,
        asset_type: &str,
    ) -> Option<DepreciationGroup> {
        let asset_type = asset_type.to_lowercase();
        ASSET_TYPE_GROUPS
            .iter()
            .find(|(keyword, _)| asset_type.contains(keyword))
            .and_then(|(_, group)| *group)
    }

    /// Runs both methods for the asset and recommends one.
    ///
    /// The asset's own `method` is ignored.
    pub fn compare_methods(
        &self,
        asset: &DepreciableAsset,
        trend: ProfitTrend,
    ) -> Result<MethodComparison, TaxError> {
        let linear = self.summarize(asset, DepreciationMethod::Linear)?;
        let accelerated = self.summarize(asset, DepreciationMethod::Accelerated)?;

        let front_loaded = if accelerated.first_year_deduction >= linear.first_year_deduction {
            DepreciationMethod::Accelerated
        } else {
            DepreciationMethod::Linear
        };
        let first_year_difference =
            (accelerated.first_year_deduction - linear.first_year_deduction).abs();

        Ok(MethodComparison {
            linear,
            accelerated,
            first_year_difference,
            front_loaded,
            recommendation: self.suggest_method(asset.group, trend),
        })
    }

    fn summarize(
        &self,
        asset: &DepreciableAsset,
        method: DepreciationMethod,
    ) -> Result<MethodSummary, TaxError> {
        let asset = DepreciableAsset {
            method,
            ..asset.clone()
        };
        let schedule = self.calculate_schedule(&asset)?;

        Ok(MethodSummary {
            first_year_deduction: schedule.first_year_amount(),
            total_years: schedule.total_years,
            schedule,
        })
    }

    /// Unclamped, unrounded amount for a year, with the rate or coefficient
    /// that produced it.
    fn raw_amount(
        &self,
        asset: &DepreciableAsset,
        years_elapsed: u32,
        remaining: Decimal,
    ) -> (Decimal, Decimal) {
        let is_first = years_elapsed == 0;

        match asset.method {
            DepreciationMethod::Linear => {
                let (first, later) = asset.group.linear_rates();
                let rate = if is_first { first } else { later };
                (asset.acquisition_value * rate / Decimal::ONE_HUNDRED, rate)
            }
            DepreciationMethod::Accelerated => {
                let (first, later) = asset.group.accelerated_coefficients();
                if is_first {
                    return (asset.acquisition_value / first, first);
                }

                let mut divisor = later - Decimal::from(years_elapsed);
                if divisor <= Decimal::ZERO {
                    divisor = Decimal::ONE;
                }
                (Decimal::TWO * remaining / divisor, later)
            }
        }
    }
}
