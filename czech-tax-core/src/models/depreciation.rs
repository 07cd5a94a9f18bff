use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::TaxError;
use crate::calculations::common::round_half_up;

/// Statutory depreciation group (odpisová skupina).
///
/// Serialized as its number, 1 through 6.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum DepreciationGroup {
    Group1,
    Group2,
    Group3,
    Group4,
    Group5,
    Group6,
}

impl DepreciationGroup {
    pub const ALL: [DepreciationGroup; 6] = [
        Self::Group1,
        Self::Group2,
        Self::Group3,
        Self::Group4,
        Self::Group5,
        Self::Group6,
    ];

    pub fn number(&self) -> u8 {
        match self {
            Self::Group1 => 1,
            Self::Group2 => 2,
            Self::Group3 => 3,
            Self::Group4 => 4,
            Self::Group5 => 5,
            Self::Group6 => 6,
        }
    }

    /// Legal depreciation period in years.
    pub fn legal_years(&self) -> u32 {
        match self {
            Self::Group1 => 3,
            Self::Group2 => 5,
            Self::Group3 => 10,
            Self::Group4 => 20,
            Self::Group5 => 30,
            Self::Group6 => 50,
        }
    }

    /// Linear rates in percent as `(first year, subsequent years)`.
    ///
    /// For each group the first-year rate plus `legal_years - 1` subsequent
    /// rates sum to exactly 100.
    pub fn linear_rates(&self) -> (Decimal, Decimal) {
        match self {
            Self::Group1 => (dec!(20), dec!(40)),
            Self::Group2 => (dec!(11), dec!(22.25)),
            Self::Group3 => (dec!(5.5), dec!(10.5)),
            Self::Group4 => (dec!(2.15), dec!(5.15)),
            Self::Group5 => (dec!(1.4), dec!(3.4)),
            Self::Group6 => (dec!(1.02), dec!(2.02)),
        }
    }

    /// Accelerated coefficients as `(first year, subsequent years)`.
    pub fn accelerated_coefficients(&self) -> (Decimal, Decimal) {
        match self {
            Self::Group1 => (dec!(3), dec!(4)),
            Self::Group2 => (dec!(5), dec!(6)),
            Self::Group3 => (dec!(10), dec!(11)),
            Self::Group4 => (dec!(20), dec!(21)),
            Self::Group5 => (dec!(30), dec!(31)),
            Self::Group6 => (dec!(50), dec!(51)),
        }
    }
}

impl TryFrom<u8> for DepreciationGroup {
    type Error = TaxError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Group1),
            2 => Ok(Self::Group2),
            3 => Ok(Self::Group3),
            4 => Ok(Self::Group4),
            5 => Ok(Self::Group5),
            6 => Ok(Self::Group6),
            other => Err(TaxError::InvalidDepreciationGroup(other)),
        }
    }
}

impl From<DepreciationGroup> for u8 {
    fn from(group: DepreciationGroup) -> Self {
        group.number()
    }
}

impl fmt::Display for DepreciationGroup {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DepreciationMethod {
    /// Rovnoměrné odpisy.
    Linear,
    /// Zrychlené odpisy.
    Accelerated,
}

impl DepreciationMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::Accelerated => "accelerated",
        }
    }
}

impl fmt::Display for DepreciationMethod {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DepreciationMethod {
    type Err = TaxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "linear" => Ok(Self::Linear),
            "accelerated" => Ok(Self::Accelerated),
            _ => Err(TaxError::InvalidDepreciationMethod(s.to_string())),
        }
    }
}

/// Expected direction of company profit over the depreciation period.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfitTrend {
    Increasing,
    Decreasing,
    #[default]
    Stable,
}

impl FromStr for ProfitTrend {
    type Err = TaxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "increasing" => Ok(Self::Increasing),
            "decreasing" => Ok(Self::Decreasing),
            "stable" => Ok(Self::Stable),
            _ => Err(TaxError::InvalidProfitTrend(s.to_string())),
        }
    }
}

/// Asset parameters as supplied by the asset registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepreciableAsset {
    pub acquisition_value: Decimal,
    pub residual_value: Decimal,
    pub group: DepreciationGroup,
    pub method: DepreciationMethod,
    pub start_year: i32,
}

impl DepreciableAsset {
    /// Amount to be written off over the whole schedule: acquisition minus
    /// residual value, rounded half-up to 2 decimal places, never negative.
    pub fn depreciable_base(&self) -> Decimal {
        round_half_up(self.acquisition_value - self.residual_value).max(Decimal::ZERO)
    }
}

/// One year of a depreciation schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearlyDepreciation {
    pub year: i32,
    pub amount: Decimal,
    /// Linear rate in percent, or the accelerated coefficient.
    pub rate_or_coefficient: Decimal,
    pub accumulated: Decimal,
    pub remaining_value: Decimal,
    pub is_first_year: bool,
    pub is_final_year: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepreciationSchedule {
    pub asset: DepreciableAsset,
    pub entries: Vec<YearlyDepreciation>,
    pub total_depreciation: Decimal,
    pub total_years: u32,
}

impl DepreciationSchedule {
    pub fn is_complete(&self) -> bool {
        self.total_depreciation >= self.asset.depreciable_base()
    }

    pub fn first_year_amount(&self) -> Decimal {
        self.entries
            .first()
            .map(|e| e.amount)
            .unwrap_or(Decimal::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn linear_rates_sum_to_one_hundred_percent_over_legal_period() {
        for group in DepreciationGroup::ALL {
            let (first, subsequent) = group.linear_rates();
            let total = first + subsequent * Decimal::from(group.legal_years() - 1);

            assert_eq!(total, dec!(100), "group {group}");
        }
    }

    #[test]
    fn group_parses_from_number() {
        for group in DepreciationGroup::ALL {
            assert_eq!(DepreciationGroup::try_from(group.number()), Ok(group));
        }
    }

    #[test]
    fn group_rejects_out_of_range_numbers() {
        assert_eq!(
            DepreciationGroup::try_from(0),
            Err(TaxError::InvalidDepreciationGroup(0))
        );
        assert_eq!(
            DepreciationGroup::try_from(7),
            Err(TaxError::InvalidDepreciationGroup(7))
        );
    }

    #[test]
    fn method_rejects_unknown_name() {
        assert_eq!(
            "declining".parse::<DepreciationMethod>(),
            Err(TaxError::InvalidDepreciationMethod("declining".to_string()))
        );
        assert_eq!("Linear".parse::<DepreciationMethod>(), Ok(DepreciationMethod::Linear));
    }

    #[test]
    fn profit_trend_defaults_to_stable() {
        assert_eq!(ProfitTrend::default(), ProfitTrend::Stable);
        assert!("sideways".parse::<ProfitTrend>().is_err());
    }

    #[test]
    fn depreciable_base_never_negative() {
        let asset = DepreciableAsset {
            acquisition_value: dec!(1000),
            residual_value: dec!(5000),
            group: DepreciationGroup::Group1,
            method: DepreciationMethod::Linear,
            start_year: 2025,
        };

        assert_eq!(asset.depreciable_base(), Decimal::ZERO);
    }

    #[test]
    fn depreciable_base_rounds_to_cents() {
        let asset = DepreciableAsset {
            acquisition_value: dec!(123456.78),
            residual_value: dec!(12345.675),
            group: DepreciationGroup::Group1,
            method: DepreciationMethod::Linear,
            start_year: 2025,
        };

        // 111111.105 rounds half-up
        assert_eq!(asset.depreciable_base(), dec!(111111.11));
    }
}
