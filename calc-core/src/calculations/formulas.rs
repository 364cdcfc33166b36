//! Closed-form financial formulas shared by the calculators.
//!
//! Every function here is pure and total: zero rates, zero periods and
//! zero totals resolve to defined values instead of panicking.
//!
//! | Formula | Definition |
//! |---------|------------|
//! | Amortized payment | `P * r(1+r)^n / ((1+r)^n - 1)`, `P / n` when `r = 0` |
//! | Future value | `P * (1+r)^n` |
//! | Future value of contributions | `C * ((1+r)^n - 1) / r`, `C * n` when `r = 0` |
//! | After-tax rate | `r * (1 - t)` |
//! | Inflation adjustment | `V / (1+i)^years` |
//! | Percentage split | `part / total * 100`, 0 when `total = 0` |

use rust_decimal::{Decimal, MathematicalOps};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::calculations::common::{
    at_least, percent_to_fraction, percentage_of, round_half_up, round_to, safe_div,
};

const MONTHS_PER_YEAR: u32 = 12;

/// Converts an annual percentage rate (e.g. `6`) into a monthly fraction (`0.005`).
pub fn monthly_rate(annual_rate_percent: Decimal) -> Decimal {
    percent_to_fraction(annual_rate_percent) / Decimal::from(MONTHS_PER_YEAR)
}

/// Computes the growth factor `(1 + rate)^periods`.
///
/// Saturates at [`Decimal::MAX`] when the power overflows.
pub fn compound_factor(
    rate: Decimal,
    periods: u32,
) -> Decimal {
    match (Decimal::ONE + rate).checked_powi(i64::from(periods)) {
        Some(factor) => factor,
        None => {
            warn!(%rate, periods, "compound factor overflowed; saturating");
            Decimal::MAX
        }
    }
}

/// Calculates the fixed monthly payment that repays `principal` over `years`.
///
/// A zero rate reduces to straight-line repayment (`P / n`); a zero term
/// yields zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use calc_core::calculations::common::round_half_up;
/// use calc_core::calculations::formulas::amortized_payment;
///
/// let payment = amortized_payment(dec!(100000), dec!(6), 30);
/// assert_eq!(round_half_up(payment), dec!(599.55));
///
/// let interest_free = amortized_payment(dec!(12000), dec!(0), 1);
/// assert_eq!(interest_free, dec!(1000));
/// ```
pub fn amortized_payment(
    principal: Decimal,
    annual_rate_percent: Decimal,
    years: u32,
) -> Decimal {
    let periods = years.saturating_mul(MONTHS_PER_YEAR);
    if periods == 0 {
        return Decimal::ZERO;
    }

    let rate = monthly_rate(annual_rate_percent);
    if rate.is_zero() {
        return principal / Decimal::from(periods);
    }

    // P*r / (1 - (1+r)^-n) is the same quantity as the textbook form but
    // stays finite when the growth factor saturates.
    let factor = compound_factor(rate, periods);
    let discount = Decimal::ONE - safe_div(Decimal::ONE, factor);
    if discount.is_zero() {
        return principal / Decimal::from(periods);
    }
    safe_div(principal.saturating_mul(rate), discount)
}

/// One year of an amortization schedule, rounded to cents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmortizationYear {
    /// 1-based year number.
    pub year: u32,
    pub principal_paid: Decimal,
    pub interest_paid: Decimal,
    pub ending_balance: Decimal,
}

/// Builds the year-by-year amortization schedule for a fixed-payment loan.
///
/// The final payment is trimmed so the balance closes at exactly zero.
pub fn amortization_schedule(
    principal: Decimal,
    annual_rate_percent: Decimal,
    years: u32,
) -> Vec<AmortizationYear> {
    let payment = amortized_payment(principal, annual_rate_percent, years);
    let rate = monthly_rate(annual_rate_percent);
    let periods = years.saturating_mul(MONTHS_PER_YEAR);

    let mut schedule = Vec::with_capacity(years as usize);
    let mut balance = principal;
    let mut year_principal = Decimal::ZERO;
    let mut year_interest = Decimal::ZERO;

    for month in 1..=periods {
        let interest = balance * rate;
        let mut principal_part = payment - interest;
        if month == periods || principal_part > balance {
            principal_part = balance;
        }
        balance = at_least(balance - principal_part, Decimal::ZERO);
        year_principal += principal_part;
        year_interest += interest;

        if month % MONTHS_PER_YEAR == 0 {
            schedule.push(AmortizationYear {
                year: month / MONTHS_PER_YEAR,
                principal_paid: round_half_up(year_principal),
                interest_paid: round_half_up(year_interest),
                ending_balance: round_half_up(balance),
            });
            year_principal = Decimal::ZERO;
            year_interest = Decimal::ZERO;
        }
    }

    schedule
}

/// Future value of a lump sum: `principal * (1 + rate)^periods`.
///
/// `rate` is the per-period fraction (monthly or annual, matching `periods`).
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use calc_core::calculations::formulas::future_value;
///
/// assert_eq!(future_value(dec!(1000), dec!(0.10), 2), dec!(1210));
/// ```
pub fn future_value(
    principal: Decimal,
    rate: Decimal,
    periods: u32,
) -> Decimal {
    principal.saturating_mul(compound_factor(rate, periods))
}

/// Future value of a level contribution made at the end of every period.
pub fn future_value_of_contributions(
    contribution: Decimal,
    rate: Decimal,
    periods: u32,
) -> Decimal {
    if rate.is_zero() {
        return contribution.saturating_mul(Decimal::from(periods));
    }
    let growth = compound_factor(rate, periods) - Decimal::ONE;
    safe_div(contribution.saturating_mul(growth), rate)
}

/// Reduces a growth rate by a tax on returns: `rate * (1 - tax)`.
///
/// Both arguments are percentages; the result is a percentage.
pub fn after_tax_rate(
    rate_percent: Decimal,
    tax_rate_percent: Decimal,
) -> Decimal {
    rate_percent * (Decimal::ONE - percent_to_fraction(tax_rate_percent))
}

/// Expresses a future nominal amount in today's money.
pub fn inflation_adjusted(
    value: Decimal,
    inflation_percent: Decimal,
    years: u32,
) -> Decimal {
    safe_div(value, compound_factor(percent_to_fraction(inflation_percent), years))
}

/// Splits a total into percentage shares rounded to `dp` places.
///
/// The rounding remainder is assigned to the last share so the shares sum to
/// exactly 100 whenever the total is non-zero. A zero total yields all zeros.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use calc_core::calculations::formulas::percentage_split;
///
/// let shares = percentage_split(&[dec!(1), dec!(1), dec!(1)], 1);
/// assert_eq!(shares, vec![dec!(33.3), dec!(33.3), dec!(33.4)]);
///
/// let empty = percentage_split(&[dec!(0), dec!(0)], 1);
/// assert_eq!(empty, vec![dec!(0), dec!(0)]);
/// ```
pub fn percentage_split(
    parts: &[Decimal],
    dp: u32,
) -> Vec<Decimal> {
    let total: Decimal = parts.iter().copied().sum();
    if total.is_zero() {
        return vec![Decimal::ZERO; parts.len()];
    }

    let mut shares: Vec<Decimal> = parts
        .iter()
        .map(|part| round_to(percentage_of(*part, total), dp))
        .collect();

    if let Some((last, rest)) = shares.split_last_mut() {
        let allocated: Decimal = rest.iter().copied().sum();
        *last = Decimal::ONE_HUNDRED - allocated;
    }
    shares
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    // =========================================================================
    // monthly_rate / compound_factor tests
    // =========================================================================

    #[test]
    fn monthly_rate_converts_annual_percent() {
        assert_eq!(monthly_rate(dec!(6)), dec!(0.005));
    }

    #[test]
    fn compound_factor_zero_periods_is_one() {
        assert_eq!(compound_factor(dec!(0.05), 0), dec!(1));
    }

    #[test]
    fn compound_factor_saturates_on_overflow() {
        assert_eq!(compound_factor(dec!(10), 100), Decimal::MAX);
    }

    // =========================================================================
    // amortized_payment tests
    // =========================================================================

    #[test]
    fn amortized_payment_standard_thirty_year_mortgage() {
        let payment = amortized_payment(dec!(100000), dec!(6), 30);

        assert_eq!(round_half_up(payment), dec!(599.55));
    }

    #[test]
    fn amortized_payment_fifteen_year_mortgage() {
        let payment = amortized_payment(dec!(200000), dec!(5), 15);

        assert_eq!(round_half_up(payment), dec!(1581.59));
    }

    #[test]
    fn amortized_payment_zero_rate_is_straight_line() {
        let payment = amortized_payment(dec!(36000), dec!(0), 3);

        assert_eq!(payment, dec!(1000));
    }

    #[test]
    fn amortized_payment_zero_term_is_zero() {
        let payment = amortized_payment(dec!(36000), dec!(5), 0);

        assert_eq!(payment, dec!(0));
    }

    #[test]
    fn amortized_payment_zero_principal_is_zero() {
        let payment = amortized_payment(dec!(0), dec!(5), 30);

        assert_eq!(payment, dec!(0));
    }

    // =========================================================================
    // amortization_schedule tests
    // =========================================================================

    #[test]
    fn amortization_schedule_has_one_row_per_year() {
        let schedule = amortization_schedule(dec!(100000), dec!(6), 30);

        assert_eq!(schedule.len(), 30);
        assert_eq!(schedule[0].year, 1);
        assert_eq!(schedule[29].year, 30);
    }

    #[test]
    fn amortization_schedule_closes_at_zero() {
        let schedule = amortization_schedule(dec!(100000), dec!(6), 30);

        assert_eq!(schedule[29].ending_balance, dec!(0));
    }

    #[test]
    fn amortization_schedule_principal_sums_to_loan() {
        let schedule = amortization_schedule(dec!(50000), dec!(4.5), 10);
        let principal: Decimal = schedule.iter().map(|y| y.principal_paid).sum();

        // Per-year rounding can drift by at most a cent per row.
        assert!((principal - dec!(50000)).abs() <= dec!(0.10));
    }

    #[test]
    fn amortization_schedule_zero_rate_has_no_interest() {
        let schedule = amortization_schedule(dec!(24000), dec!(0), 2);

        assert_eq!(schedule[0].interest_paid, dec!(0));
        assert_eq!(schedule[0].principal_paid, dec!(12000));
        assert_eq!(schedule[0].ending_balance, dec!(12000));
        assert_eq!(schedule[1].ending_balance, dec!(0));
    }

    #[test]
    fn amortization_schedule_first_year_interest_for_standard_loan() {
        let schedule = amortization_schedule(dec!(100000), dec!(6), 30);

        assert_eq!(schedule[0].interest_paid, dec!(5966.59));
        assert_eq!(schedule[0].principal_paid, dec!(1228.01));
    }

    // =========================================================================
    // future value tests
    // =========================================================================

    #[test]
    fn future_value_compounds_annually() {
        assert_eq!(future_value(dec!(1000), dec!(0.05), 1), dec!(1050));
    }

    #[test]
    fn future_value_zero_rate_is_principal() {
        assert_eq!(future_value(dec!(1000), dec!(0), 40), dec!(1000));
    }

    #[test]
    fn future_value_of_contributions_zero_rate_is_sum() {
        assert_eq!(future_value_of_contributions(dec!(500), dec!(0), 12), dec!(6000));
    }

    #[test]
    fn future_value_of_contributions_grows() {
        let value = future_value_of_contributions(dec!(100), dec!(0.10), 2);

        assert_eq!(value, dec!(210));
    }

    // =========================================================================
    // after_tax_rate / inflation_adjusted tests
    // =========================================================================

    #[test]
    fn after_tax_rate_reduces_by_tax() {
        assert_eq!(after_tax_rate(dec!(8), dec!(25)), dec!(6));
    }

    #[test]
    fn after_tax_rate_zero_tax_is_unchanged() {
        assert_eq!(after_tax_rate(dec!(7), dec!(0)), dec!(7));
    }

    #[test]
    fn inflation_adjusted_deflates_value() {
        let real = inflation_adjusted(dec!(1210), dec!(10), 2);

        assert_eq!(real, dec!(1000));
    }

    #[test]
    fn inflation_adjusted_zero_years_is_unchanged() {
        assert_eq!(inflation_adjusted(dec!(500), dec!(3), 0), dec!(500));
    }

    // =========================================================================
    // percentage_split tests
    // =========================================================================

    #[test]
    fn percentage_split_sums_to_hundred() {
        let shares = percentage_split(&[dec!(10), dec!(20), dec!(30)], 1);
        let total: Decimal = shares.iter().copied().sum();

        assert_eq!(shares, vec![dec!(16.7), dec!(33.3), dec!(50.0)]);
        assert_eq!(total, dec!(100));
    }

    #[test]
    fn percentage_split_zero_total_yields_zeros() {
        let shares = percentage_split(&[dec!(0), dec!(0), dec!(0)], 1);

        assert_eq!(shares, vec![dec!(0), dec!(0), dec!(0)]);
    }

    #[test]
    fn percentage_split_empty_input_is_empty() {
        let shares = percentage_split(&[], 1);

        assert!(shares.is_empty());
    }

    #[test]
    fn percentage_split_single_part_is_hundred() {
        let shares = percentage_split(&[dec!(42)], 1);

        assert_eq!(shares, vec![dec!(100)]);
    }
}
