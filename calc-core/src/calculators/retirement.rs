//! Retirement savings projection.
//!
//! Savings and contributions compound monthly until the retirement age. The
//! after-tax balance grows at the return reduced by the tax on growth; the
//! inflation-adjusted balance expresses that amount in today's money.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{Calculator, CalculatorInput, unknown};
use crate::calculations::common::round_half_up;
use crate::calculations::formulas::{
    after_tax_rate, future_value, future_value_of_contributions, inflation_adjusted, monthly_rate,
};
use crate::models::{FieldError, FieldKind, FieldSpec, FieldValue};
use crate::presentation::{Presentable, Report, ReportTable, ReportValue};

const FIELDS: &[FieldSpec] = &[
    FieldSpec::number(
        "current_age",
        "Current age",
        FieldKind::Integer,
        dec!(16),
        dec!(100),
        "",
    ),
    FieldSpec::number(
        "retirement_age",
        "Retirement age",
        FieldKind::Integer,
        dec!(16),
        dec!(100),
        "Age at which contributions stop",
    ),
    FieldSpec::number(
        "current_savings",
        "Current savings",
        FieldKind::Currency,
        dec!(0),
        dec!(100000000),
        "Amount already invested for retirement",
    ),
    FieldSpec::number(
        "monthly_contribution",
        "Monthly contribution",
        FieldKind::Currency,
        dec!(0),
        dec!(1000000),
        "Added at the end of every month",
    ),
    FieldSpec::number(
        "annual_return",
        "Expected annual return",
        FieldKind::Percent,
        dec!(0),
        dec!(30),
        "Average yearly growth before tax",
    ),
    FieldSpec::number(
        "tax_rate",
        "Tax on growth",
        FieldKind::Percent,
        dec!(0),
        dec!(60),
        "Share of investment growth lost to tax each year",
    ),
    FieldSpec::number(
        "inflation_rate",
        "Inflation rate",
        FieldKind::Percent,
        dec!(0),
        dec!(20),
        "Used to express the final balance in today's dollars",
    ),
];

/// Input values for the retirement projection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetirementInput {
    pub current_age: u32,
    pub retirement_age: u32,
    pub current_savings: Decimal,
    pub monthly_contribution: Decimal,
    pub annual_return: Decimal,
    pub tax_rate: Decimal,
    pub inflation_rate: Decimal,
}

impl Default for RetirementInput {
    fn default() -> Self {
        Self {
            current_age: 30,
            retirement_age: 65,
            current_savings: dec!(50000),
            monthly_contribution: dec!(500),
            annual_return: dec!(7),
            tax_rate: dec!(15),
            inflation_rate: dec!(2.5),
        }
    }
}

impl CalculatorInput for RetirementInput {
    fn fields() -> &'static [FieldSpec] {
        FIELDS
    }

    fn get(
        &self,
        field: &str,
    ) -> Result<FieldValue, FieldError> {
        match field {
            "current_age" => Ok(self.current_age.into()),
            "retirement_age" => Ok(self.retirement_age.into()),
            "current_savings" => Ok(self.current_savings.into()),
            "monthly_contribution" => Ok(self.monthly_contribution.into()),
            "annual_return" => Ok(self.annual_return.into()),
            "tax_rate" => Ok(self.tax_rate.into()),
            "inflation_rate" => Ok(self.inflation_rate.into()),
            _ => Err(unknown(field)),
        }
    }

    fn set(
        &mut self,
        field: &str,
        value: FieldValue,
    ) -> Result<(), FieldError> {
        match field {
            "current_age" => self.current_age = value.into_count(field)?,
            "retirement_age" => self.retirement_age = value.into_count(field)?,
            "current_savings" => self.current_savings = value.into_number(field)?,
            "monthly_contribution" => self.monthly_contribution = value.into_number(field)?,
            "annual_return" => self.annual_return = value.into_number(field)?,
            "tax_rate" => self.tax_rate = value.into_number(field)?,
            "inflation_rate" => self.inflation_rate = value.into_number(field)?,
            _ => return Err(unknown(field)),
        }
        Ok(())
    }
}

/// Balance at the end of one projected year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectionYear {
    /// Age at the end of the year.
    pub age: u32,
    /// Savings plus contributions made so far.
    pub contributions: Decimal,
    /// After-tax balance.
    pub balance: Decimal,
    /// `balance` in today's dollars.
    pub real_balance: Decimal,
}

/// Result of the retirement projection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetirementResult {
    pub years_to_retirement: u32,
    pub total_contributions: Decimal,
    /// Balance if growth were untaxed.
    pub nominal_balance: Decimal,
    pub after_tax_balance: Decimal,
    pub inflation_adjusted_balance: Decimal,
    /// After-tax balance minus contributions.
    pub total_growth: Decimal,
    pub projection: Vec<ProjectionYear>,
}

/// Calculator for retirement savings growth.
#[derive(Debug, Clone, Copy, Default)]
pub struct RetirementCalculator;

impl RetirementCalculator {
    /// Balance after `months` of monthly compounding at `annual_rate` percent.
    fn balance_after(
        &self,
        input: &RetirementInput,
        annual_rate: Decimal,
        months: u32,
    ) -> Decimal {
        let rate = monthly_rate(annual_rate);
        future_value(input.current_savings, rate, months)
            + future_value_of_contributions(input.monthly_contribution, rate, months)
    }

    fn contributions_after(
        &self,
        input: &RetirementInput,
        months: u32,
    ) -> Decimal {
        input
            .current_savings
            .saturating_add(input.monthly_contribution.saturating_mul(Decimal::from(months)))
    }

    fn projection(
        &self,
        input: &RetirementInput,
        net_rate: Decimal,
        years: u32,
    ) -> Vec<ProjectionYear> {
        (1..=years)
            .map(|year| {
                let months = year.saturating_mul(12);
                let balance = self.balance_after(input, net_rate, months);
                ProjectionYear {
                    age: input.current_age.saturating_add(year),
                    contributions: round_half_up(self.contributions_after(input, months)),
                    balance: round_half_up(balance),
                    real_balance: round_half_up(inflation_adjusted(
                        balance,
                        input.inflation_rate,
                        year,
                    )),
                }
            })
            .collect()
    }
}

impl Calculator for RetirementCalculator {
    type Input = RetirementInput;
    type Output = RetirementResult;

    const SLUG: &'static str = "retirement";
    const TITLE: &'static str = "Retirement Savings Calculator";

    fn calculate(
        &self,
        input: &RetirementInput,
    ) -> RetirementResult {
        let years = input.retirement_age.saturating_sub(input.current_age);
        let months = years.saturating_mul(12);
        let net_rate = after_tax_rate(input.annual_return, input.tax_rate);

        let contributions = self.contributions_after(input, months);
        let nominal = self.balance_after(input, input.annual_return, months);
        let after_tax = self.balance_after(input, net_rate, months);
        let real = inflation_adjusted(after_tax, input.inflation_rate, years);

        debug!(years, %net_rate, %after_tax, "projected retirement balance");

        RetirementResult {
            years_to_retirement: years,
            total_contributions: round_half_up(contributions),
            nominal_balance: round_half_up(nominal),
            after_tax_balance: round_half_up(after_tax),
            inflation_adjusted_balance: round_half_up(real),
            total_growth: round_half_up(after_tax - contributions),
            projection: self.projection(input, net_rate, years),
        }
    }
}

impl Presentable for RetirementResult {
    fn report(&self) -> Report {
        let mut projection = ReportTable::new(
            "Projection by year",
            &["Age", "Contributions", "Balance", "Today's dollars"],
        );
        for year in &self.projection {
            projection.push_row(vec![
                ReportValue::count(year.age),
                ReportValue::dollars(year.contributions),
                ReportValue::dollars(year.balance),
                ReportValue::dollars(year.real_balance),
            ]);
        }

        Report::new(RetirementCalculator::TITLE)
            .row("Years to retirement", ReportValue::count(self.years_to_retirement))
            .row("Total contributions", ReportValue::dollars(self.total_contributions))
            .row("Balance before tax", ReportValue::dollars(self.nominal_balance))
            .row("Balance after tax", ReportValue::dollars(self.after_tax_balance))
            .row(
                "In today's dollars",
                ReportValue::dollars(self.inflation_adjusted_balance),
            )
            .row("Investment growth", ReportValue::dollars(self.total_growth))
            .table(projection)
    }
}
