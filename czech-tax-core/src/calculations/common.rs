//! Common utility functions for tax calculations.
//!
//! Czech tax law fixes the rounding applied at each statutory step, so every
//! engine rounds through these helpers rather than calling `round_dp` ad hoc.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds a decimal value to exactly two decimal places using half-up rounding.
///
/// Values at exactly 0.005 are rounded up to 0.01 (away from zero). Used for
/// depreciation amounts, which are booked to the haléř.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use czech_tax_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(123.454)), dec!(123.45));
/// assert_eq!(round_half_up(dec!(123.455)), dec!(123.46));
/// assert_eq!(round_half_up(dec!(-123.455)), dec!(-123.46)); // Away from zero
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Rounds a decimal value to whole CZK using half-up rounding.
///
/// This is the rounding applied to every tax and insurance figure.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use czech_tax_core::calculations::common::round_czk;
///
/// assert_eq!(round_czk(dec!(49999.95)), dec!(50000));
/// assert_eq!(round_czk(dec!(25925.49)), dec!(25925));
/// assert_eq!(round_czk(dec!(0.5)), dec!(1));
/// ```
pub fn round_czk(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Floors a decimal value down to the nearest multiple of 100 CZK.
///
/// The personal income tax base is always floored, never rounded.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use czech_tax_core::calculations::common::floor_to_hundreds;
///
/// assert_eq!(floor_to_hundreds(dec!(400099.99)), dec!(400000));
/// assert_eq!(floor_to_hundreds(dec!(99)), dec!(0));
/// ```
pub fn floor_to_hundreds(value: Decimal) -> Decimal {
    (value / Decimal::ONE_HUNDRED).floor() * Decimal::ONE_HUNDRED
}

/// Returns the maximum of two decimal values.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use czech_tax_core::calculations::common::max;
///
/// assert_eq!(max(dec!(100.00), dec!(200.00)), dec!(200.00));
/// assert_eq!(max(dec!(-100.00), dec!(-200.00)), dec!(-100.00));
/// ```
pub fn max(
    a: Decimal,
    b: Decimal,
) -> Decimal {
    if a > b { a } else { b }
}
