//! Household cost of an import tariff.
//!
//! The tariff is levied on imported goods spend. Businesses pass part of it on
//! to consumers through prices and absorb the rest.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{Calculator, CalculatorInput, unknown};
use crate::calculations::common::{percent_to_fraction, percentage_of, round_half_up};
use crate::models::{FieldError, FieldKind, FieldSpec, FieldValue};
use crate::presentation::{Presentable, Report, ReportTable, ReportValue};

/// Pass-through rates shown in the scenario table.
const SCENARIO_PASS_THROUGH: [Decimal; 5] = [dec!(0), dec!(25), dec!(50), dec!(75), dec!(100)];

const FIELDS: &[FieldSpec] = &[
    FieldSpec::number(
        "imported_goods_spend",
        "Annual spend on imported goods",
        FieldKind::Currency,
        dec!(0),
        dec!(10000000),
        "Yearly household spending on goods subject to the tariff",
    ),
    FieldSpec::number(
        "tariff_rate",
        "Tariff rate",
        FieldKind::Percent,
        dec!(0),
        dec!(200),
        "",
    ),
    FieldSpec::number(
        "pass_through_rate",
        "Pass-through rate",
        FieldKind::Percent,
        dec!(0),
        dec!(100),
        "Share of the tariff passed on to consumers through higher prices",
    ),
    FieldSpec::number(
        "annual_household_spending",
        "Total annual household spending",
        FieldKind::Currency,
        dec!(0),
        dec!(100000000),
        "All household spending, used for the overall price increase",
    ),
];

/// Input values for the tariff impact calculator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TariffImpactInput {
    pub imported_goods_spend: Decimal,
    pub tariff_rate: Decimal,
    pub pass_through_rate: Decimal,
    pub annual_household_spending: Decimal,
}

impl Default for TariffImpactInput {
    fn default() -> Self {
        Self {
            imported_goods_spend: dec!(12000),
            tariff_rate: dec!(25),
            pass_through_rate: dec!(60),
            annual_household_spending: dec!(60000),
        }
    }
}

impl CalculatorInput for TariffImpactInput {
    fn fields() -> &'static [FieldSpec] {
        FIELDS
    }

    fn get(
        &self,
        field: &str,
    ) -> Result<FieldValue, FieldError> {
        match field {
            "imported_goods_spend" => Ok(self.imported_goods_spend.into()),
            "tariff_rate" => Ok(self.tariff_rate.into()),
            "pass_through_rate" => Ok(self.pass_through_rate.into()),
            "annual_household_spending" => Ok(self.annual_household_spending.into()),
            _ => Err(unknown(field)),
        }
    }

    fn set(
        &mut self,
        field: &str,
        value: FieldValue,
    ) -> Result<(), FieldError> {
        match field {
            "imported_goods_spend" => self.imported_goods_spend = value.into_number(field)?,
            "tariff_rate" => self.tariff_rate = value.into_number(field)?,
            "pass_through_rate" => self.pass_through_rate = value.into_number(field)?,
            "annual_household_spending" => {
                self.annual_household_spending = value.into_number(field)?
            }
            _ => return Err(unknown(field)),
        }
        Ok(())
    }
}

/// Consumer cost at one pass-through rate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassThroughScenario {
    pub pass_through_rate: Decimal,
    pub annual_consumer_cost: Decimal,
    pub monthly_consumer_cost: Decimal,
}

/// Result of the tariff impact calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TariffImpactResult {
    pub added_tariff_cost: Decimal,
    /// Part of the tariff paid by the household through prices.
    pub consumer_cost: Decimal,
    pub business_absorbed: Decimal,
    /// Consumer cost as a percentage of total household spending.
    pub effective_price_increase: Decimal,
    pub monthly_consumer_cost: Decimal,
    pub scenarios: Vec<PassThroughScenario>,
}

/// Calculator for the household impact of tariffs.
#[derive(Debug, Clone, Copy, Default)]
pub struct TariffImpactCalculator;

impl TariffImpactCalculator {
    fn consumer_share(
        &self,
        added_cost: Decimal,
        pass_through_rate: Decimal,
    ) -> Decimal {
        added_cost * percent_to_fraction(pass_through_rate)
    }
}

impl Calculator for TariffImpactCalculator {
    type Input = TariffImpactInput;
    type Output = TariffImpactResult;

    const SLUG: &'static str = "tariff-impact";
    const TITLE: &'static str = "Tariff Impact Calculator";

    fn calculate(
        &self,
        input: &TariffImpactInput,
    ) -> TariffImpactResult {
        let added_cost = input.imported_goods_spend * percent_to_fraction(input.tariff_rate);
        let consumer = self.consumer_share(added_cost, input.pass_through_rate);

        debug!(%added_cost, %consumer, "calculated tariff impact");

        let scenarios = SCENARIO_PASS_THROUGH
            .iter()
            .map(|rate| {
                let annual = self.consumer_share(added_cost, *rate);
                PassThroughScenario {
                    pass_through_rate: *rate,
                    annual_consumer_cost: round_half_up(annual),
                    monthly_consumer_cost: round_half_up(annual / dec!(12)),
                }
            })
            .collect();

        TariffImpactResult {
            added_tariff_cost: round_half_up(added_cost),
            consumer_cost: round_half_up(consumer),
            business_absorbed: round_half_up(added_cost - consumer),
            effective_price_increase: round_half_up(percentage_of(
                consumer,
                input.annual_household_spending,
            )),
            monthly_consumer_cost: round_half_up(consumer / dec!(12)),
            scenarios,
        }
    }
}

impl Presentable for TariffImpactResult {
    fn report(&self) -> Report {
        let mut scenarios = ReportTable::new(
            "Pass-through scenarios",
            &["Pass-through", "Annual cost", "Monthly cost"],
        );
        for scenario in &self.scenarios {
            scenarios.push_row(vec![
                ReportValue::rate(scenario.pass_through_rate),
                ReportValue::dollars(scenario.annual_consumer_cost),
                ReportValue::cents(scenario.monthly_consumer_cost),
            ]);
        }

        Report::new(TariffImpactCalculator::TITLE)
            .row("Added tariff cost", ReportValue::dollars(self.added_tariff_cost))
            .row("Paid by your household", ReportValue::dollars(self.consumer_cost))
            .row("Absorbed by businesses", ReportValue::dollars(self.business_absorbed))
            .row(
                "Effective price increase",
                ReportValue::rate(self.effective_price_increase),
            )
            .row("Monthly cost", ReportValue::cents(self.monthly_consumer_cost))
            .table(scenarios)
    }
}
