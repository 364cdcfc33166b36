//! Display formatting for currency, percentages and plain quantities.
//!
//! Output follows US English conventions: `,` groups thousands, `.` separates
//! decimals, the currency symbol is `$` and the sign precedes it (`-$1,234`).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculations::common::round_to;

/// Precision used for a currency amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CurrencyStyle {
    /// Whole dollars, used for totals and summaries.
    Whole,
    /// Dollars and cents, used for per-unit and per-period costs.
    Cents,
}

impl CurrencyStyle {
    pub fn decimal_places(&self) -> u32 {
        match self {
            Self::Whole => 0,
            Self::Cents => 2,
        }
    }
}

/// Precision used for a percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PercentStyle {
    /// Shares of a total (breakdowns, allocations): one decimal place.
    Share,
    /// Interest, tax and growth rates: two decimal places.
    Rate,
}

impl PercentStyle {
    pub fn decimal_places(&self) -> u32 {
        match self {
            Self::Share => 1,
            Self::Rate => 2,
        }
    }
}

/// Formats a money amount, e.g. `$1,235` or `$1,234.57`.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use calc_core::presentation::format::{CurrencyStyle, format_currency};
///
/// assert_eq!(format_currency(dec!(1234.567), CurrencyStyle::Whole), "$1,235");
/// assert_eq!(format_currency(dec!(1234.567), CurrencyStyle::Cents), "$1,234.57");
/// assert_eq!(format_currency(dec!(-50), CurrencyStyle::Whole), "-$50");
/// ```
pub fn format_currency(
    value: Decimal,
    style: CurrencyStyle,
) -> String {
    let dp = style.decimal_places();
    let rounded = round_to(value, dp);
    format!("{}${}", sign_of(rounded), group_digits(rounded.abs(), dp))
}

/// Formats a percentage given in points, e.g. `12.5%` or `6.50%`.
pub fn format_percent(
    value: Decimal,
    style: PercentStyle,
) -> String {
    let dp = style.decimal_places();
    let rounded = round_to(value, dp);
    format!("{}{}%", sign_of(rounded), group_digits(rounded.abs(), dp))
}

/// Formats a plain quantity with thousands grouping and `dp` decimals.
pub fn format_number(
    value: Decimal,
    dp: u32,
) -> String {
    let rounded = round_to(value, dp);
    format!("{}{}", sign_of(rounded), group_digits(rounded.abs(), dp))
}

fn sign_of(rounded: Decimal) -> &'static str {
    if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    }
}

/// Renders a non-negative value with exactly `dp` decimals and grouped thousands.
fn group_digits(
    value: Decimal,
    dp: u32,
) -> String {
    let text = format!("{:.*}", dp as usize, value);
    let (whole, fraction) = match text.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (text.as_str(), None),
    };

    let mut grouped = String::with_capacity(text.len() + whole.len() / 3);
    for (index, digit) in whole.chars().enumerate() {
        if index > 0 && (whole.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    if let Some(fraction) = fraction {
        grouped.push('.');
        grouped.push_str(fraction);
    }
    grouped
}
