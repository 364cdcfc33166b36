//! Input state holder for a mounted calculator.
//!
//! A [`CalculatorState`] owns one calculator's input record from mount to
//! unmount. Edits go through field names so a host can drive any calculator
//! from form events or input files; results are only produced by an explicit
//! [`calculate`](CalculatorState::calculate).

use tracing::debug;

use crate::calculators::{Calculator, CalculatorInput};
use crate::models::{EntryId, EntryStore, FieldError, FieldValue, find_spec};
use crate::normalize::normalize;

/// Input record plus the last computed result of one calculator.
#[derive(Debug, Clone)]
pub struct CalculatorState<C: Calculator> {
    calculator: C,
    input: C::Input,
    defaults: C::Input,
    result: Option<C::Output>,
}

impl<C: Calculator + Default> Default for CalculatorState<C> {
    fn default() -> Self {
        Self::new(C::default())
    }
}

impl<C: Calculator> CalculatorState<C> {
    /// Mounts `calculator` with its declared default input.
    pub fn new(calculator: C) -> Self {
        Self::with_defaults(calculator, C::Input::default())
    }

    /// Mounts `calculator` with a custom default snapshot, which `reset`
    /// restores.
    pub fn with_defaults(
        calculator: C,
        defaults: C::Input,
    ) -> Self {
        Self {
            calculator,
            input: defaults.clone(),
            defaults,
            result: None,
        }
    }

    pub fn input(&self) -> &C::Input {
        &self.input
    }

    /// The result of the last `calculate`, if any since mount or reset.
    pub fn result(&self) -> Option<&C::Output> {
        self.result.as_ref()
    }

    /// Sets one field to an already typed value. Numbers are clamped into
    /// the field's declared range, never rejected.
    ///
    /// # Errors
    ///
    /// [`FieldError::UnknownField`] or [`FieldError::KindMismatch`]; the
    /// input is unchanged on error.
    pub fn update(
        &mut self,
        field: &str,
        value: FieldValue,
    ) -> Result<(), FieldError> {
        let spec = find_spec(C::Input::fields(), field)?;
        self.input.set(field, spec.clamp_value(value))
    }

    /// Normalizes raw text for `field` and sets it.
    pub fn update_raw(
        &mut self,
        field: &str,
        raw: &str,
    ) -> Result<(), FieldError> {
        let spec = find_spec(C::Input::fields(), field)?;
        self.update(field, normalize(raw, spec))
    }

    /// Restores the default snapshot and clears the last result.
    pub fn reset(&mut self) {
        debug!(calculator = C::SLUG, "resetting input to defaults");
        self.input = self.defaults.clone();
        self.result = None;
    }

    fn store_mut(&mut self) -> Result<&mut dyn EntryStore, FieldError> {
        self.input.entries_mut().ok_or(FieldError::NoEntries)
    }

    /// Appends a blank list entry and returns its id.
    pub fn add_entry(&mut self) -> Result<EntryId, FieldError> {
        Ok(self.store_mut()?.add())
    }

    pub fn remove_entry(
        &mut self,
        id: EntryId,
    ) -> Result<(), FieldError> {
        self.store_mut()?.remove(id)
    }

    /// Sets one entry field; numbers are clamped like in [`update`](Self::update).
    pub fn update_entry(
        &mut self,
        id: EntryId,
        field: &str,
        value: FieldValue,
    ) -> Result<(), FieldError> {
        let store = self.store_mut()?;
        let spec = find_spec(C::Input::entry_fields(), field)?;
        store.update(id, field, spec.clamp_value(value))
    }

    /// Normalizes raw text for an entry field and sets it.
    pub fn update_entry_raw(
        &mut self,
        id: EntryId,
        field: &str,
        raw: &str,
    ) -> Result<(), FieldError> {
        if self.input.entries().is_none() {
            return Err(FieldError::NoEntries);
        }
        let spec = find_spec(C::Input::entry_fields(), field)?;
        self.update_entry(id, field, normalize(raw, spec))
    }

    /// Ids of the list entries in display order; empty without a list.
    pub fn entry_ids(&self) -> Vec<EntryId> {
        self.input
            .entries()
            .map(|store| store.ids())
            .unwrap_or_default()
    }

    /// Runs the calculator over the current input and stores the new result.
    pub fn calculate(&mut self) -> &C::Output {
        debug!(calculator = C::SLUG, "calculating");
        self.result.insert(self.calculator.calculate(&self.input))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::calculators::{
        BusinessProfitCalculator, BusinessProfitInput, CommuteCostCalculator, LoanCalculator,
        LoanInput, RetirementCalculator,
    };

    // =========================================================================
    // update tests
    // =========================================================================

    #[test]
    fn update_raw_normalizes_and_clamps() {
        let mut state = CalculatorState::new(LoanCalculator);

        state.update_raw("loan_amount", "$250,000").unwrap();
        state.update_raw("annual_rate", "45%").unwrap();
        state.update_raw("term_years", "").unwrap();

        assert_eq!(state.input().loan_amount, dec!(250000));
        assert_eq!(state.input().annual_rate, dec!(30));
        assert_eq!(state.input().term_years, 1);
    }

    #[test]
    fn update_raw_unknown_field_leaves_input_unchanged() {
        let mut state = CalculatorState::new(LoanCalculator);

        let result = state.update_raw("balloon", "5");

        assert_eq!(result, Err(FieldError::UnknownField("balloon".to_string())));
        assert_eq!(state.input(), &LoanInput::default());
    }

    #[test]
    fn update_kind_mismatch_is_rejected() {
        let mut state = CalculatorState::new(LoanCalculator);

        let result = state.update("loan_amount", FieldValue::from("lots"));

        assert!(matches!(result, Err(FieldError::KindMismatch { .. })));
    }

    // =========================================================================
    // range tests
    // =========================================================================

    #[test]
    fn update_clamps_oversized_loan_before_calculate() {
        let mut state = CalculatorState::new(LoanCalculator);

        state.update("loan_amount", FieldValue::from(Decimal::MAX)).unwrap();
        state.update("term_years", FieldValue::from(u32::MAX)).unwrap();
        let payments = state.calculate().number_of_payments;

        assert_eq!(state.input().loan_amount, dec!(100000000));
        assert_eq!(state.input().term_years, 50);
        assert_eq!(payments, 600);
    }

    #[test]
    fn update_clamps_retirement_age_far_above_range() {
        let mut state = CalculatorState::new(RetirementCalculator);

        state
            .update("retirement_age", FieldValue::from(dec!(5000000000)))
            .unwrap();
        let years = state.calculate().years_to_retirement;

        assert_eq!(state.input().retirement_age, 100);
        assert_eq!(years, 70);
    }

    #[test]
    fn update_clamps_negative_counts_to_minimum() {
        let mut state = CalculatorState::new(CommuteCostCalculator);

        state.update("days_per_week", FieldValue::from(Decimal::MIN)).unwrap();
        state.update("weeks_per_year", FieldValue::from(u32::MAX)).unwrap();

        assert_eq!(state.input().days_per_week, 0);
        assert_eq!(state.input().weeks_per_year, 52);
        assert_eq!(state.calculate().commute_days, 0);
    }

    #[test]
    fn update_entry_clamps_revenue() {
        let mut state = CalculatorState::new(BusinessProfitCalculator);

        state
            .update_entry(EntryId(1), "revenue", FieldValue::from(Decimal::MAX))
            .unwrap();

        let stream = state.input().streams.get(EntryId(1)).unwrap();
        assert_eq!(stream.revenue, dec!(100000000));
        assert_eq!(
            state.calculate().annual_gross_revenue,
            dec!(1200096000)
        );
    }

    // =========================================================================
    // calculate / reset tests
    // =========================================================================

    #[test]
    fn calculate_stores_fresh_result() {
        let mut state = CalculatorState::new(LoanCalculator);
        assert!(state.result().is_none());

        state.update("loan_amount", FieldValue::from(dec!(100000))).unwrap();
        state.update("annual_rate", FieldValue::from(dec!(6))).unwrap();
        let payment = state.calculate().monthly_payment;

        assert_eq!(payment, dec!(599.55));
        assert_eq!(state.result().map(|r| r.monthly_payment), Some(dec!(599.55)));
    }

    #[test]
    fn edits_do_not_change_stored_result() {
        let mut state = CalculatorState::new(LoanCalculator);
        let before = state.calculate().clone();

        state.update_raw("loan_amount", "1").unwrap();

        assert_eq!(state.result(), Some(&before));
    }

    #[test]
    fn reset_restores_default_revenue_streams() {
        let mut state = CalculatorState::new(BusinessProfitCalculator);
        state.add_entry().unwrap();
        state.remove_entry(EntryId(1)).unwrap();
        state.update_raw("monthly_expenses", "99").unwrap();
        state.calculate();

        state.reset();

        assert_eq!(state.input(), &BusinessProfitInput::default());
        assert_eq!(state.entry_ids(), vec![EntryId(1), EntryId(2)]);
        assert!(state.result().is_none());
    }

    #[test]
    fn reset_restores_entry_id_counter() {
        let mut state = CalculatorState::new(BusinessProfitCalculator);
        state.add_entry().unwrap();
        state.add_entry().unwrap();

        state.reset();

        assert_eq!(state.add_entry(), Ok(EntryId(3)));
    }

    // =========================================================================
    // entry tests
    // =========================================================================

    #[test]
    fn update_entry_raw_normalizes_revenue() {
        let mut state = CalculatorState::new(BusinessProfitCalculator);
        let id = state.add_entry().unwrap();

        state.update_entry_raw(id, "revenue", "2,500").unwrap();
        state.update_entry_raw(id, "name", " Licensing ").unwrap();

        let stream = state.input().streams.get(id).unwrap();
        assert_eq!(stream.revenue, dec!(2500));
        assert_eq!(stream.name, "Licensing");
        assert_eq!(state.calculate().annual_gross_revenue, dec!(270000));
    }

    #[test]
    fn update_entry_missing_id_fails() {
        let mut state = CalculatorState::new(BusinessProfitCalculator);

        let result = state.update_entry(EntryId(7), "revenue", FieldValue::from(dec!(1)));

        assert_eq!(result, Err(FieldError::EntryNotFound(EntryId(7))));
    }

    #[test]
    fn entry_operations_without_list_report_no_entries() {
        let mut state = CalculatorState::new(LoanCalculator);

        assert_eq!(state.add_entry(), Err(FieldError::NoEntries));
        assert_eq!(state.remove_entry(EntryId(1)), Err(FieldError::NoEntries));
        assert_eq!(
            state.update_entry_raw(EntryId(1), "name", "x"),
            Err(FieldError::NoEntries)
        );
        assert!(state.entry_ids().is_empty());
    }

    #[test]
    fn with_defaults_resets_to_custom_snapshot() {
        let defaults = LoanInput {
            loan_amount: dec!(50000),
            ..LoanInput::default()
        };
        let mut state = CalculatorState::with_defaults(LoanCalculator, defaults.clone());
        state.update_raw("loan_amount", "75000").unwrap();

        state.reset();

        assert_eq!(state.input(), &defaults);
    }
}
