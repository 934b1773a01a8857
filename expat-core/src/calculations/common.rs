//! Shared arithmetic helpers for the calculators.
//!
//! Calculators keep amounts exact; rounding to cents is applied only where
//! a value is shown to the user or echoed back into an input field.
//! Multiplication and division are checked, so oversized input becomes an
//! [`AmountOverflow`] error instead of a panic.

use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;

/// Rounds a decimal value to exactly two decimal places using half-up rounding.
///
/// Values at exactly 0.005 are rounded away from zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use expat_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(123.454)), dec!(123.45));
/// assert_eq!(round_half_up(dec!(123.455)), dec!(123.46));
/// assert_eq!(round_half_up(dec!(-123.455)), dec!(-123.46));
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// A calculation left the range a [`Decimal`] can hold.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("amount is too large to calculate with")]
pub struct AmountOverflow;

/// `a × b`, failing instead of overflowing.
pub fn mul(
    a: Decimal,
    b: Decimal,
) -> Result<Decimal, AmountOverflow> {
    a.checked_mul(b).ok_or(AmountOverflow)
}

/// `a + b`, failing instead of overflowing.
pub fn add(
    a: Decimal,
    b: Decimal,
) -> Result<Decimal, AmountOverflow> {
    a.checked_add(b).ok_or(AmountOverflow)
}

/// `amount × rate / 100`, where `rate` is a percentage.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use expat_core::calculations::common::percent_of;
///
/// assert_eq!(percent_of(dec!(80000), dec!(1.45)), Ok(dec!(1160)));
/// ```
pub fn percent_of(
    amount: Decimal,
    rate: Decimal,
) -> Result<Decimal, AmountOverflow> {
    Ok(mul(amount, rate)? / Decimal::ONE_HUNDRED)
}

/// `part / whole × 100`, or zero when `whole` is zero.
pub fn ratio_percent(
    part: Decimal,
    whole: Decimal,
) -> Result<Decimal, AmountOverflow> {
    if whole.is_zero() {
        return Ok(Decimal::ZERO);
    }
    let ratio = part.checked_div(whole).ok_or(AmountOverflow)?;
    mul(ratio, Decimal::ONE_HUNDRED)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    // =========================================================================
    // round_half_up tests
    // =========================================================================

    #[test]
    fn round_half_up_rounds_down_below_midpoint() {
        assert_eq!(round_half_up(dec!(123.454)), dec!(123.45));
    }

    #[test]
    fn round_half_up_rounds_up_at_midpoint() {
        assert_eq!(round_half_up(dec!(123.455)), dec!(123.46));
    }

    #[test]
    fn round_half_up_handles_negative_values() {
        assert_eq!(round_half_up(dec!(-123.455)), dec!(-123.46));
    }

    #[test]
    fn round_half_up_handles_large_values() {
        assert_eq!(round_half_up(dec!(999999.999)), dec!(1000000.00));
    }

    // =========================================================================
    // percent_of / ratio_percent tests
    // =========================================================================

    #[test]
    fn percent_of_applies_fractional_rate() {
        assert_eq!(percent_of(dec!(14000), dec!(10.5)), Ok(dec!(1470)));
    }

    #[test]
    fn percent_of_zero_amount_is_zero() {
        assert_eq!(percent_of(dec!(0), dec!(33)), Ok(dec!(0)));
    }

    #[test]
    fn ratio_percent_guards_zero_whole() {
        assert_eq!(ratio_percent(dec!(100), dec!(0)), Ok(dec!(0)));
    }

    #[test]
    fn ratio_percent_computes_share() {
        assert_eq!(ratio_percent(dec!(17320), dec!(80000)), Ok(dec!(21.65)));
    }

    #[test]
    fn percent_of_reports_overflow() {
        assert_eq!(percent_of(Decimal::MAX, dec!(33)), Err(AmountOverflow));
    }

    #[test]
    fn ratio_percent_reports_overflow() {
        assert_eq!(ratio_percent(Decimal::MAX, dec!(0.01)), Err(AmountOverflow));
    }

    #[test]
    fn add_reports_overflow() {
        assert_eq!(add(Decimal::MAX, dec!(1)), Err(AmountOverflow));
        assert_eq!(add(dec!(1), dec!(2)), Ok(dec!(3)));
    }
}
