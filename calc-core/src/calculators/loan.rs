//! Fixed-rate loan / mortgage payment calculator.
//!
//! | Output | Definition |
//! |--------|------------|
//! | Monthly payment | amortized payment over `term_years * 12` months |
//! | Total of payments | monthly payment × number of payments |
//! | Total interest | total of payments − loan amount |
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use calc_core::calculators::{Calculator, LoanCalculator, LoanInput};
//!
//! let input = LoanInput {
//!     loan_amount: dec!(100000),
//!     annual_rate: dec!(6),
//!     term_years: 30,
//! };
//!
//! let result = LoanCalculator.calculate(&input);
//!
//! assert_eq!(result.monthly_payment, dec!(599.55));
//! assert_eq!(result.number_of_payments, 360);
//! ```

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{Calculator, CalculatorInput, unknown};
use crate::calculations::common::{at_least, round_half_up};
use crate::calculations::formulas::{AmortizationYear, amortization_schedule, amortized_payment};
use crate::models::{FieldError, FieldKind, FieldSpec, FieldValue};
use crate::presentation::{Presentable, Report, ReportTable, ReportValue};

const FIELDS: &[FieldSpec] = &[
    FieldSpec::number(
        "loan_amount",
        "Loan amount",
        FieldKind::Currency,
        dec!(0),
        dec!(100000000),
        "Amount borrowed, after any down payment",
    ),
    FieldSpec::number(
        "annual_rate",
        "Interest rate",
        FieldKind::Percent,
        dec!(0),
        dec!(30),
        "Nominal annual interest rate",
    ),
    FieldSpec::number(
        "term_years",
        "Loan term (years)",
        FieldKind::Integer,
        dec!(1),
        dec!(50),
        "Years until the loan is fully repaid",
    ),
];

/// Input values for the loan calculator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanInput {
    pub loan_amount: Decimal,
    /// Annual interest rate in percent.
    pub annual_rate: Decimal,
    pub term_years: u32,
}

impl Default for LoanInput {
    fn default() -> Self {
        Self {
            loan_amount: dec!(300000),
            annual_rate: dec!(6.5),
            term_years: 30,
        }
    }
}

impl CalculatorInput for LoanInput {
    fn fields() -> &'static [FieldSpec] {
        FIELDS
    }

    fn get(
        &self,
        field: &str,
    ) -> Result<FieldValue, FieldError> {
        match field {
            "loan_amount" => Ok(self.loan_amount.into()),
            "annual_rate" => Ok(self.annual_rate.into()),
            "term_years" => Ok(self.term_years.into()),
            _ => Err(unknown(field)),
        }
    }

    fn set(
        &mut self,
        field: &str,
        value: FieldValue,
    ) -> Result<(), FieldError> {
        match field {
            "loan_amount" => self.loan_amount = value.into_number(field)?,
            "annual_rate" => self.annual_rate = value.into_number(field)?,
            "term_years" => self.term_years = value.into_count(field)?,
            _ => return Err(unknown(field)),
        }
        Ok(())
    }
}

/// Result of the loan calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanResult {
    pub monthly_payment: Decimal,
    /// Unrounded payment times the number of payments, rounded once. It can
    /// differ from `monthly_payment * number_of_payments` by less than half a
    /// cent per payment.
    pub total_paid: Decimal,
    pub total_interest: Decimal,
    pub number_of_payments: u32,
    /// Year-by-year breakdown of principal, interest and balance.
    pub schedule: Vec<AmortizationYear>,
}

/// Calculator for fixed-rate amortizing loans.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoanCalculator;

impl Calculator for LoanCalculator {
    type Input = LoanInput;
    type Output = LoanResult;

    const SLUG: &'static str = "loan";
    const TITLE: &'static str = "Loan Payment Calculator";

    fn calculate(
        &self,
        input: &LoanInput,
    ) -> LoanResult {
        let payment = amortized_payment(input.loan_amount, input.annual_rate, input.term_years);
        let number_of_payments = input.term_years.saturating_mul(12);
        let total_paid = round_half_up(payment.saturating_mul(Decimal::from(number_of_payments)));
        let total_interest = at_least(total_paid - input.loan_amount, Decimal::ZERO);

        debug!(
            amount = %input.loan_amount,
            rate = %input.annual_rate,
            years = input.term_years,
            %payment,
            "calculated loan payment"
        );

        LoanResult {
            monthly_payment: round_half_up(payment),
            total_paid,
            total_interest: round_half_up(total_interest),
            number_of_payments,
            schedule: amortization_schedule(
                input.loan_amount,
                input.annual_rate,
                input.term_years,
            ),
        }
    }
}

impl Presentable for LoanResult {
    fn report(&self) -> Report {
        let mut schedule =
            ReportTable::new("Amortization schedule", &["Year", "Principal", "Interest", "Balance"]);
        for year in &self.schedule {
            schedule.push_row(vec![
                ReportValue::count(year.year),
                ReportValue::dollars(year.principal_paid),
                ReportValue::dollars(year.interest_paid),
                ReportValue::dollars(year.ending_balance),
            ]);
        }

        Report::new(LoanCalculator::TITLE)
            .row("Monthly payment", ReportValue::cents(self.monthly_payment))
            .row("Total of payments", ReportValue::dollars(self.total_paid))
            .row("Total interest", ReportValue::dollars(self.total_interest))
            .row("Number of payments", ReportValue::count(self.number_of_payments))
            .table(schedule)
    }
}
