//! Decimal helpers for rate arithmetic.

use rust_decimal::{Decimal, RoundingStrategy};
use std::cmp::Ordering;

/// Fractional digits kept on every rebased rate.
pub const RATE_DECIMAL_PLACES: u32 = 6;

/// Round exact halves toward zero.
pub fn round_half_down(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointTowardZero)
}

/// Divide and round the exact quotient to `dp` places, halves toward zero.
///
/// `Decimal` division already rounds to 28 significant digits, so rounding that
/// quotient again can land on a false midpoint. The candidate is instead
/// checked against the operands: with `t` the truncated quotient and `m` the
/// midpoint above it, the exact quotient is past the midpoint iff `m * d < n`.
///
/// Returns `None` on division by zero or overflow.
pub fn div_half_down(numerator: Decimal, denominator: Decimal, dp: u32) -> Option<Decimal> {
    if denominator.is_zero() {
        return None;
    }

    let negative = numerator.is_sign_negative() != denominator.is_sign_negative();
    let n = numerator.abs();
    let d = denominator.abs();

    let quotient = n.checked_div(d)?;
    let truncated = quotient.round_dp_with_strategy(dp, RoundingStrategy::ToZero);
    let midpoint = truncated.checked_add(Decimal::new(5, dp + 1))?;

    let rounded = match midpoint.checked_mul(d)?.cmp(&n) {
        Ordering::Less => truncated.checked_add(Decimal::new(1, dp))?,
        Ordering::Equal | Ordering::Greater => truncated,
    };

    if negative && !rounded.is_zero() {
        Some(-rounded)
    } else {
        Some(rounded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_exact_half_rounds_toward_zero() {
        assert_eq!(div_half_down(dec!(1), dec!(8), 2), Some(dec!(0.12)));
        assert_eq!(div_half_down(dec!(-1), dec!(8), 2), Some(dec!(-0.12)));
        assert_eq!(round_half_down(dec!(2.5), 0), dec!(2));
    }

    #[test]
    fn test_above_half_rounds_up() {
        assert_eq!(div_half_down(dec!(2), dec!(3), 6), Some(dec!(0.666667)));
        assert_eq!(div_half_down(dec!(1), dec!(3), 6), Some(dec!(0.333333)));
    }

    #[test]
    fn test_cross_rate_from_provider_quotes() {
        assert_eq!(
            div_half_down(dec!(1.569095), dec!(83.979299), RATE_DECIMAL_PLACES),
            Some(dec!(0.018684))
        );
        assert_eq!(
            div_half_down(dec!(1), dec!(83.979299), RATE_DECIMAL_PLACES),
            Some(dec!(0.011908))
        );
        assert_eq!(
            div_half_down(dec!(83.979299), dec!(1.569095), RATE_DECIMAL_PLACES),
            Some(dec!(53.520851))
        );
    }

    #[test]
    fn test_midpoint_check_overflow_is_none() {
        // MAX / 8 rounds up to an integer whose product with 8 exceeds MAX.
        assert_eq!(div_half_down(Decimal::MAX, dec!(8), RATE_DECIMAL_PLACES), None);
    }

    #[test]
    fn test_self_division_is_one() {
        let rate = dec!(83.979299);
        assert_eq!(div_half_down(rate, rate, RATE_DECIMAL_PLACES), Some(Decimal::ONE));
    }

    #[test]
    fn test_division_by_zero() {
        assert_eq!(div_half_down(dec!(1), Decimal::ZERO, 6), None);
    }
}
