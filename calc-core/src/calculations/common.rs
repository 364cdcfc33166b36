//! Common numeric helpers shared by every calculator.
//!
//! Rounding, guarded division and clamping live here so each formula site
//! applies the same zero-denominator rules.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds a decimal value to exactly two decimal places using half-up rounding.
///
/// Values at exactly 0.005 are rounded away from zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use calc_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(599.5505)), dec!(599.55));
/// assert_eq!(round_half_up(dec!(123.455)), dec!(123.46));
/// assert_eq!(round_half_up(dec!(-123.455)), dec!(-123.46)); // Away from zero
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    round_to(value, 2)
}

/// Rounds to `dp` decimal places, half away from zero.
pub fn round_to(
    value: Decimal,
    dp: u32,
) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

/// Divides `numerator` by `denominator`, returning zero when the denominator is zero.
///
/// # Examples
///
/// ```
/// use rust_decimal::Decimal;
/// use rust_decimal_macros::dec;
/// use calc_core::calculations::common::safe_div;
///
/// assert_eq!(safe_div(dec!(10), dec!(4)), dec!(2.5));
/// assert_eq!(safe_div(dec!(10), Decimal::ZERO), Decimal::ZERO);
/// ```
pub fn safe_div(
    numerator: Decimal,
    denominator: Decimal,
) -> Decimal {
    numerator.checked_div(denominator).unwrap_or(Decimal::ZERO)
}

/// Expresses `part` as a percentage of `total` (`part / total * 100`).
///
/// A zero total yields 0%.
pub fn percentage_of(
    part: Decimal,
    total: Decimal,
) -> Decimal {
    if total.is_zero() {
        return Decimal::ZERO;
    }
    safe_div(part * Decimal::ONE_HUNDRED, total)
}

/// Converts a percentage (e.g. `6.5`) into a fraction (`0.065`).
pub fn percent_to_fraction(percent: Decimal) -> Decimal {
    percent / Decimal::ONE_HUNDRED
}

/// Returns the larger of two values, treating anything below `floor` as `floor`.
pub fn at_least(
    value: Decimal,
    floor: Decimal,
) -> Decimal {
    if value > floor { value } else { floor }
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
        let result = round_half_up(dec!(123.454));

        assert_eq!(result, dec!(123.45));
    }

    #[test]
    fn round_half_up_rounds_up_at_midpoint() {
        let result = round_half_up(dec!(123.455));

        assert_eq!(result, dec!(123.46));
    }

    #[test]
    fn round_half_up_handles_negative_values() {
        let result = round_half_up(dec!(-123.455));

        assert_eq!(result, dec!(-123.46));
    }

    #[test]
    fn round_half_up_handles_large_values() {
        let result = round_half_up(dec!(999999.999));

        assert_eq!(result, dec!(1000000.00));
    }

    // =========================================================================
    // round_to tests
    // =========================================================================

    #[test]
    fn round_to_whole_units() {
        assert_eq!(round_to(dec!(1234.5), 0), dec!(1235));
        assert_eq!(round_to(dec!(1234.49), 0), dec!(1234));
    }

    #[test]
    fn round_to_one_place() {
        assert_eq!(round_to(dec!(33.333), 1), dec!(33.3));
        assert_eq!(round_to(dec!(66.666), 1), dec!(66.7));
    }

    // =========================================================================
    // safe_div / percentage_of tests
    // =========================================================================

    #[test]
    fn safe_div_returns_zero_for_zero_denominator() {
        assert_eq!(safe_div(dec!(5), dec!(0)), dec!(0));
    }

    #[test]
    fn percentage_of_computes_share() {
        assert_eq!(percentage_of(dec!(25), dec!(200)), dec!(12.5));
    }

    #[test]
    fn percentage_of_zero_total_is_zero() {
        assert_eq!(percentage_of(dec!(25), dec!(0)), dec!(0));
        assert_eq!(percentage_of(dec!(0), dec!(0)), dec!(0));
    }

    #[test]
    fn percentage_of_negative_part_is_negative() {
        assert_eq!(percentage_of(dec!(-50), dec!(200)), dec!(-25));
    }

    // =========================================================================
    // percent_to_fraction / at_least tests
    // =========================================================================

    #[test]
    fn percent_to_fraction_divides_by_hundred() {
        assert_eq!(percent_to_fraction(dec!(6.5)), dec!(0.065));
    }

    #[test]
    fn at_least_clamps_below_floor() {
        assert_eq!(at_least(dec!(-10), Decimal::ZERO), dec!(0));
        assert_eq!(at_least(dec!(10), Decimal::ZERO), dec!(10));
    }
}
