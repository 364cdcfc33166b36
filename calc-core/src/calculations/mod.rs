//! Shared calculation logic.
//!
//! `common` holds rounding and guarded arithmetic; `formulas` holds the
//! closed-form financial formulas every calculator is built from.

pub mod common;
pub mod formulas;

pub use formulas::{
    AmortizationYear, after_tax_rate, amortization_schedule, amortized_payment, future_value,
    future_value_of_contributions, inflation_adjusted, percentage_split,
};
