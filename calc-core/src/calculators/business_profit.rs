//! Business profit from monthly revenue streams and expenses.
//!
//! Monthly figures are annualised; expense and profit percentages are taken
//! of annual gross revenue and fall back to 0% when there is no revenue.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{Calculator, CalculatorInput, unknown};
use crate::calculations::common::{percentage_of, round_half_up};
use crate::calculations::formulas::percentage_split;
use crate::models::{
    Entry, EntryList, EntryStore, FieldError, FieldKind, FieldSpec, FieldValue, RevenueStream,
};
use crate::presentation::{Presentable, Report, ReportTable, ReportValue};

const MONTHS_PER_YEAR: Decimal = dec!(12);

const FIELDS: &[FieldSpec] = &[FieldSpec::number(
    "monthly_expenses",
    "Monthly expenses",
    FieldKind::Currency,
    dec!(0),
    dec!(100000000),
    "Rent, payroll, supplies and every other recurring cost",
)];

/// Input values for the business profit calculator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessProfitInput {
    pub streams: EntryList<RevenueStream>,
    pub monthly_expenses: Decimal,
}

impl Default for BusinessProfitInput {
    fn default() -> Self {
        let mut streams = EntryList::new();
        streams.push_with(|id| RevenueStream {
            id,
            name: "Product sales".to_string(),
            revenue: dec!(12000),
        });
        streams.push_with(|id| RevenueStream {
            id,
            name: "Consulting".to_string(),
            revenue: dec!(8000),
        });

        Self {
            streams,
            monthly_expenses: dec!(14000),
        }
    }
}

impl CalculatorInput for BusinessProfitInput {
    fn fields() -> &'static [FieldSpec] {
        FIELDS
    }

    fn get(
        &self,
        field: &str,
    ) -> Result<FieldValue, FieldError> {
        match field {
            "monthly_expenses" => Ok(self.monthly_expenses.into()),
            _ => Err(unknown(field)),
        }
    }

    fn set(
        &mut self,
        field: &str,
        value: FieldValue,
    ) -> Result<(), FieldError> {
        match field {
            "monthly_expenses" => self.monthly_expenses = value.into_number(field)?,
            _ => return Err(unknown(field)),
        }
        Ok(())
    }

    fn entry_fields() -> &'static [FieldSpec] {
        RevenueStream::fields()
    }

    fn entries(&self) -> Option<&dyn EntryStore> {
        Some(&self.streams)
    }

    fn entries_mut(&mut self) -> Option<&mut dyn EntryStore> {
        Some(&mut self.streams)
    }
}

/// One revenue stream's contribution to gross revenue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamShare {
    pub name: String,
    pub annual_revenue: Decimal,
    /// Percentage of annual gross revenue.
    pub share: Decimal,
}

/// Result of the business profit calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessProfitResult {
    pub annual_gross_revenue: Decimal,
    pub annual_expenses: Decimal,
    /// Negative when expenses exceed revenue.
    pub annual_profit: Decimal,
    pub expenses_percentage: Decimal,
    pub profit_percentage: Decimal,
    pub streams: Vec<StreamShare>,
}

/// Calculator for annual business profit.
#[derive(Debug, Clone, Copy, Default)]
pub struct BusinessProfitCalculator;

impl Calculator for BusinessProfitCalculator {
    type Input = BusinessProfitInput;
    type Output = BusinessProfitResult;

    const SLUG: &'static str = "business-profit";
    const TITLE: &'static str = "Business Profit Calculator";

    fn calculate(
        &self,
        input: &BusinessProfitInput,
    ) -> BusinessProfitResult {
        let annual: Vec<Decimal> = input
            .streams
            .iter()
            .map(|stream| stream.revenue * MONTHS_PER_YEAR)
            .collect();
        let gross: Decimal = annual.iter().copied().sum();
        let expenses = input.monthly_expenses * MONTHS_PER_YEAR;
        let profit = gross - expenses;

        debug!(%gross, %expenses, streams = annual.len(), "calculated business profit");

        let shares = percentage_split(&annual, 1);
        let streams = input
            .streams
            .iter()
            .zip(annual.iter().zip(shares))
            .map(|(stream, (revenue, share))| StreamShare {
                name: stream.name.clone(),
                annual_revenue: round_half_up(*revenue),
                share,
            })
            .collect();

        BusinessProfitResult {
            annual_gross_revenue: round_half_up(gross),
            annual_expenses: round_half_up(expenses),
            annual_profit: round_half_up(profit),
            expenses_percentage: round_half_up(percentage_of(expenses, gross)),
            profit_percentage: round_half_up(percentage_of(profit, gross)),
            streams,
        }
    }
}

impl Presentable for BusinessProfitResult {
    fn report(&self) -> Report {
        let mut streams =
            ReportTable::new("Revenue streams", &["Stream", "Annual revenue", "Share"]);
        for stream in &self.streams {
            streams.push_row(vec![
                ReportValue::text(stream.name.as_str()),
                ReportValue::dollars(stream.annual_revenue),
                ReportValue::share(stream.share),
            ]);
        }

        Report::new(BusinessProfitCalculator::TITLE)
            .row("Annual gross revenue", ReportValue::dollars(self.annual_gross_revenue))
            .row("Annual expenses", ReportValue::dollars(self.annual_expenses))
            .row("Annual profit", ReportValue::dollars(self.annual_profit))
            .row("Expenses share of revenue", ReportValue::share(self.expenses_percentage))
            .row("Profit margin", ReportValue::share(self.profit_percentage))
            .table(streams)
    }
}
