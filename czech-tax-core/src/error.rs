use rust_decimal::Decimal;
use thiserror::Error;

/// Errors surfaced by the rule registry and the computation engines.
///
/// Every error is fatal to the single call that raised it; no engine returns
/// a partial result alongside an error.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TaxError {
    /// A ruleset is missing for the requested year, fails validation, or
    /// conflicts with one already registered.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("unrecognised expense mode '{0}'")]
    InvalidExpenseMode(String),

    #[error("unrecognised depreciation method '{0}'")]
    InvalidDepreciationMethod(String),

    /// Depreciation groups run from 1 to 6.
    #[error("depreciation group must be between 1 and 6, got {0}")]
    InvalidDepreciationGroup(u8),

    #[error("unrecognised profit trend '{0}'")]
    InvalidProfitTrend(String),

    /// Cumulative depreciation ran past the depreciable base.
    #[error(
        "depreciation schedule overshot its base in year {year}: accumulated {accumulated} > base {base}"
    )]
    DepreciationInvariant {
        year: i32,
        accumulated: Decimal,
        base: Decimal,
    },
}
