//! Small numeric helpers shared by the calculator and its callers.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds a monetary value to one decimal digit, half away from zero.
///
/// The calculator itself never rounds; this is applied when a result is
/// rendered for a client.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::common::round_one_decimal;
///
/// assert_eq!(round_one_decimal(dec!(29000)), dec!(29000.0));
/// assert_eq!(round_one_decimal(dec!(1234.45)), dec!(1234.5));
/// assert_eq!(round_one_decimal(dec!(-0.05)), dec!(-0.1));
/// ```
pub fn round_one_decimal(value: Decimal) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(1);
    rounded
}

/// Returns the larger of two values.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::common::max;
///
/// assert_eq!(max(dec!(-25000), dec!(0)), dec!(0));
/// assert_eq!(max(dec!(4000), dec!(0)), dec!(4000));
/// ```
pub fn max(
    a: Decimal,
    b: Decimal,
) -> Decimal {
    if a > b { a } else { b }
}

/// Returns the smaller of two values.
pub fn min(
    a: Decimal,
    b: Decimal,
) -> Decimal {
    if a < b { a } else { b }
}
