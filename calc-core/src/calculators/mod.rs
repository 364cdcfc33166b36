//! The calculator gallery.
//!
//! Every calculator follows the same contract: an input record that declares
//! its fields, a pure `calculate` over a snapshot of that record, and a
//! result record that renders itself as a [`Report`](crate::presentation::Report).

use std::fmt;

use crate::models::{EntryStore, FieldError, FieldSpec, FieldValue};
use crate::presentation::Presentable;

pub mod business_profit;
pub mod commute_cost;
pub mod loan;
pub mod net_worth;
pub mod recipe_scaler;
pub mod retirement;
pub mod tariff_impact;
pub mod wealth_level;
pub mod work_hours;

pub use business_profit::{BusinessProfitCalculator, BusinessProfitInput, BusinessProfitResult};
pub use commute_cost::{CommuteCostCalculator, CommuteCostInput, CommuteCostResult};
pub use loan::{LoanCalculator, LoanInput, LoanResult};
pub use net_worth::{NetWorthCalculator, NetWorthInput, NetWorthResult};
pub use recipe_scaler::{RecipeScalerCalculator, RecipeScalerInput, RecipeScalerResult};
pub use retirement::{RetirementCalculator, RetirementInput, RetirementResult};
pub use tariff_impact::{TariffImpactCalculator, TariffImpactInput, TariffImpactResult};
pub use wealth_level::{
    NOT_YET_CLASSIFIED, WealthLevelCalculator, WealthLevelInput, WealthLevelResult,
    calculate_wealth_level,
};
pub use work_hours::{WorkHoursCalculator, WorkHoursInput, WorkHoursResult};

/// A calculator's input record.
///
/// `Default` is the declared default snapshot a calculator is mounted with
/// and reset to.
pub trait CalculatorInput: Clone + Default + fmt::Debug + PartialEq {
    /// Scalar field declarations in display order.
    fn fields() -> &'static [FieldSpec];

    fn get(
        &self,
        field: &str,
    ) -> Result<FieldValue, FieldError>;

    /// Sets one scalar field. Only the value kind is checked.
    fn set(
        &mut self,
        field: &str,
        value: FieldValue,
    ) -> Result<(), FieldError>;

    /// Field declarations of the list entries, empty when there is no list.
    fn entry_fields() -> &'static [FieldSpec] {
        &[]
    }

    fn entries(&self) -> Option<&dyn EntryStore> {
        None
    }

    fn entries_mut(&mut self) -> Option<&mut dyn EntryStore> {
        None
    }
}

/// A pure input-to-result transformation.
pub trait Calculator {
    type Input: CalculatorInput;
    type Output: Presentable + Clone + fmt::Debug + PartialEq;

    /// Route name the calculator is mounted under.
    const SLUG: &'static str;

    /// Human-readable name.
    const TITLE: &'static str;

    fn calculate(
        &self,
        input: &Self::Input,
    ) -> Self::Output;
}

/// Builds the `UnknownField` error for a field name.
pub(crate) fn unknown(field: &str) -> FieldError {
    FieldError::UnknownField(field.to_string())
}
