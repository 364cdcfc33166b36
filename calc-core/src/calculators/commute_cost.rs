//! Yearly cost of driving to work.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{Calculator, CalculatorInput, unknown};
use crate::calculations::common::{round_half_up, round_to, safe_div};
use crate::models::{FieldError, FieldKind, FieldSpec, FieldValue};
use crate::presentation::{Presentable, Report, ReportTable, ReportValue};

const FIELDS: &[FieldSpec] = &[
    FieldSpec::number(
        "one_way_miles",
        "One-way distance (miles)",
        FieldKind::Decimal,
        dec!(0),
        dec!(500),
        "",
    ),
    FieldSpec::number(
        "days_per_week",
        "Commute days per week",
        FieldKind::Integer,
        dec!(0),
        dec!(7),
        "",
    ),
    FieldSpec::number(
        "weeks_per_year",
        "Working weeks per year",
        FieldKind::Integer,
        dec!(0),
        dec!(52),
        "52 minus vacation and holiday weeks",
    ),
    FieldSpec::number(
        "mpg",
        "Fuel economy (mpg)",
        FieldKind::Decimal,
        dec!(0),
        dec!(200),
        "",
    ),
    FieldSpec::number(
        "fuel_price",
        "Fuel price per gallon",
        FieldKind::Currency,
        dec!(0),
        dec!(20),
        "",
    ),
    FieldSpec::number(
        "parking_per_day",
        "Parking per day",
        FieldKind::Currency,
        dec!(0),
        dec!(500),
        "",
    ),
    FieldSpec::number(
        "tolls_per_day",
        "Tolls per day",
        FieldKind::Currency,
        dec!(0),
        dec!(500),
        "Round-trip tolls",
    ),
    FieldSpec::number(
        "maintenance_per_mile",
        "Maintenance per mile",
        FieldKind::Currency,
        dec!(0),
        dec!(5),
        "Tires, oil, repairs and depreciation spread per mile",
    ),
];

/// Input values for the commute cost calculator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommuteCostInput {
    pub one_way_miles: Decimal,
    pub days_per_week: u32,
    pub weeks_per_year: u32,
    pub mpg: Decimal,
    pub fuel_price: Decimal,
    pub parking_per_day: Decimal,
    pub tolls_per_day: Decimal,
    pub maintenance_per_mile: Decimal,
}

impl Default for CommuteCostInput {
    fn default() -> Self {
        Self {
            one_way_miles: dec!(15),
            days_per_week: 5,
            weeks_per_year: 48,
            mpg: dec!(28),
            fuel_price: dec!(3.50),
            parking_per_day: dec!(0),
            tolls_per_day: dec!(0),
            maintenance_per_mile: dec!(0.10),
        }
    }
}

impl CalculatorInput for CommuteCostInput {
    fn fields() -> &'static [FieldSpec] {
        FIELDS
    }

    fn get(
        &self,
        field: &str,
    ) -> Result<FieldValue, FieldError> {
        match field {
            "one_way_miles" => Ok(self.one_way_miles.into()),
            "days_per_week" => Ok(self.days_per_week.into()),
            "weeks_per_year" => Ok(self.weeks_per_year.into()),
            "mpg" => Ok(self.mpg.into()),
            "fuel_price" => Ok(self.fuel_price.into()),
            "parking_per_day" => Ok(self.parking_per_day.into()),
            "tolls_per_day" => Ok(self.tolls_per_day.into()),
            "maintenance_per_mile" => Ok(self.maintenance_per_mile.into()),
            _ => Err(unknown(field)),
        }
    }

    fn set(
        &mut self,
        field: &str,
        value: FieldValue,
    ) -> Result<(), FieldError> {
        match field {
            "one_way_miles" => self.one_way_miles = value.into_number(field)?,
            "days_per_week" => self.days_per_week = value.into_count(field)?,
            "weeks_per_year" => self.weeks_per_year = value.into_count(field)?,
            "mpg" => self.mpg = value.into_number(field)?,
            "fuel_price" => self.fuel_price = value.into_number(field)?,
            "parking_per_day" => self.parking_per_day = value.into_number(field)?,
            "tolls_per_day" => self.tolls_per_day = value.into_number(field)?,
            "maintenance_per_mile" => self.maintenance_per_mile = value.into_number(field)?,
            _ => return Err(unknown(field)),
        }
        Ok(())
    }
}

/// Result of the commute cost calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommuteCostResult {
    pub commute_days: u32,
    pub annual_miles: Decimal,
    /// Zero when fuel economy is zero.
    pub annual_fuel_cost: Decimal,
    pub annual_maintenance_cost: Decimal,
    pub annual_parking_and_tolls: Decimal,
    pub total_annual_cost: Decimal,
    pub monthly_cost: Decimal,
    pub cost_per_day: Decimal,
    pub cost_per_mile: Decimal,
}

/// Calculator for commuting costs.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommuteCostCalculator;

impl Calculator for CommuteCostCalculator {
    type Input = CommuteCostInput;
    type Output = CommuteCostResult;

    const SLUG: &'static str = "commute-cost";
    const TITLE: &'static str = "Commute Cost Calculator";

    fn calculate(
        &self,
        input: &CommuteCostInput,
    ) -> CommuteCostResult {
        let commute_days = input.days_per_week.saturating_mul(input.weeks_per_year);
        let days = Decimal::from(commute_days);
        let annual_miles = input.one_way_miles * dec!(2) * days;

        let fuel = safe_div(annual_miles * input.fuel_price, input.mpg);
        let maintenance = annual_miles * input.maintenance_per_mile;
        let parking_and_tolls = (input.parking_per_day + input.tolls_per_day) * days;
        let total = fuel + maintenance + parking_and_tolls;

        debug!(commute_days, %annual_miles, %total, "calculated commute cost");

        CommuteCostResult {
            commute_days,
            annual_miles: round_half_up(annual_miles),
            annual_fuel_cost: round_half_up(fuel),
            annual_maintenance_cost: round_half_up(maintenance),
            annual_parking_and_tolls: round_half_up(parking_and_tolls),
            total_annual_cost: round_half_up(total),
            monthly_cost: round_half_up(total / dec!(12)),
            cost_per_day: round_half_up(safe_div(total, days)),
            cost_per_mile: round_to(safe_div(total, annual_miles), 3),
        }
    }
}

impl Presentable for CommuteCostResult {
    fn report(&self) -> Report {
        let mut breakdown = ReportTable::new("Annual cost breakdown", &["Item", "Cost"]);
        for (item, cost) in [
            ("Fuel", self.annual_fuel_cost),
            ("Maintenance", self.annual_maintenance_cost),
            ("Parking & tolls", self.annual_parking_and_tolls),
        ] {
            breakdown.push_row(vec![ReportValue::text(item), ReportValue::dollars(cost)]);
        }

        Report::new(CommuteCostCalculator::TITLE)
            .row("Commute days per year", ReportValue::count(self.commute_days))
            .row("Miles per year", ReportValue::number(self.annual_miles, 0))
            .row("Total annual cost", ReportValue::dollars(self.total_annual_cost))
            .row("Monthly cost", ReportValue::cents(self.monthly_cost))
            .row("Cost per day", ReportValue::cents(self.cost_per_day))
            .row("Cost per mile", ReportValue::cents(self.cost_per_mile))
            .table(breakdown)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn calculate_default_commute() {
        let result = CommuteCostCalculator.calculate(&CommuteCostInput::default());

        assert_eq!(result.commute_days, 240);
        assert_eq!(result.annual_miles, dec!(7200));
        assert_eq!(result.annual_fuel_cost, dec!(900));
        assert_eq!(result.annual_maintenance_cost, dec!(720));
        assert_eq!(result.annual_parking_and_tolls, dec!(0));
        assert_eq!(result.total_annual_cost, dec!(1620));
        assert_eq!(result.monthly_cost, dec!(135));
        assert_eq!(result.cost_per_day, dec!(6.75));
        assert_eq!(result.cost_per_mile, dec!(0.225));
    }

    #[test]
    fn calculate_includes_parking_and_tolls() {
        let input = CommuteCostInput {
            parking_per_day: dec!(10),
            tolls_per_day: dec!(2.50),
            ..CommuteCostInput::default()
        };

        let result = CommuteCostCalculator.calculate(&input);

        assert_eq!(result.annual_parking_and_tolls, dec!(3000));
        assert_eq!(result.total_annual_cost, dec!(4620));
    }

    #[test]
    fn calculate_zero_mpg_has_no_fuel_cost() {
        let input = CommuteCostInput {
            mpg: dec!(0),
            ..CommuteCostInput::default()
        };

        let result = CommuteCostCalculator.calculate(&input);

        assert_eq!(result.annual_fuel_cost, dec!(0));
        assert_eq!(result.total_annual_cost, dec!(720));
    }

    #[test]
    fn calculate_no_commute_days_is_all_zero() {
        let input = CommuteCostInput {
            days_per_week: 0,
            ..CommuteCostInput::default()
        };

        let result = CommuteCostCalculator.calculate(&input);

        assert_eq!(result.total_annual_cost, dec!(0));
        assert_eq!(result.cost_per_day, dec!(0));
        assert_eq!(result.cost_per_mile, dec!(0));
    }

    #[test]
    fn calculate_saturates_commute_days() {
        let input = CommuteCostInput {
            days_per_week: u32::MAX,
            weeks_per_year: u32::MAX,
            ..CommuteCostInput::default()
        };

        let result = CommuteCostCalculator.calculate(&input);

        assert_eq!(result.commute_days, u32::MAX);
        assert_eq!(result.annual_miles, dec!(30) * Decimal::from(u32::MAX));
    }

    #[test]
    fn report_rounds_per_mile_to_cents() {
        let report = CommuteCostCalculator
            .calculate(&CommuteCostInput::default())
            .report();

        assert_eq!(report.value_of("Cost per mile"), Some("$0.23".to_string()));
        assert_eq!(report.value_of("Miles per year"), Some("7,200".to_string()));
    }
}
