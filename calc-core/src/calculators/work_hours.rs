//! Work hours and pay from a daily shift.
//!
//! Times are minutes past midnight. An end time before the start time is an
//! overnight shift that wraps midnight.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{Calculator, CalculatorInput, unknown};
use crate::calculations::common::round_half_up;
use crate::models::{FieldError, FieldKind, FieldSpec, FieldValue};
use crate::normalize::format_time_of_day;
use crate::presentation::{Presentable, Report, ReportValue};

const MINUTES_PER_DAY: u32 = 24 * 60;
const WEEKS_PER_YEAR: u32 = 52;

const FIELDS: &[FieldSpec] = &[
    FieldSpec::number(
        "start_time",
        "Start time",
        FieldKind::Time,
        dec!(0),
        dec!(1439),
        "HH:MM, 24-hour clock",
    ),
    FieldSpec::number(
        "end_time",
        "End time",
        FieldKind::Time,
        dec!(0),
        dec!(1439),
        "An end before the start is treated as the next day",
    ),
    FieldSpec::number(
        "break_minutes",
        "Unpaid break (minutes)",
        FieldKind::Integer,
        dec!(0),
        dec!(720),
        "",
    ),
    FieldSpec::number(
        "days_per_week",
        "Days per week",
        FieldKind::Integer,
        dec!(0),
        dec!(7),
        "",
    ),
    FieldSpec::number(
        "hourly_rate",
        "Hourly rate",
        FieldKind::Currency,
        dec!(0),
        dec!(10000),
        "",
    ),
];

/// Length of a shift in minutes. Equal times mean no shift.
///
/// # Examples
///
/// ```
/// use calc_core::calculators::work_hours::shift_minutes;
///
/// assert_eq!(shift_minutes(9 * 60, 17 * 60), 480);
/// assert_eq!(shift_minutes(22 * 60, 6 * 60), 480);
/// ```
pub fn shift_minutes(
    start: u32,
    end: u32,
) -> u32 {
    let start = start % MINUTES_PER_DAY;
    let end = end % MINUTES_PER_DAY;
    if end >= start {
        end - start
    } else {
        end + MINUTES_PER_DAY - start
    }
}

/// Paid minutes in a shift after the unpaid break, never negative.
pub fn paid_minutes(
    start: u32,
    end: u32,
    break_minutes: u32,
) -> u32 {
    shift_minutes(start, end).saturating_sub(break_minutes)
}

/// Input values for the work hours calculator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkHoursInput {
    pub start_time: u32,
    pub end_time: u32,
    pub break_minutes: u32,
    pub days_per_week: u32,
    pub hourly_rate: Decimal,
}

impl Default for WorkHoursInput {
    fn default() -> Self {
        Self {
            start_time: 9 * 60,
            end_time: 17 * 60 + 30,
            break_minutes: 30,
            days_per_week: 5,
            hourly_rate: dec!(25),
        }
    }
}

impl CalculatorInput for WorkHoursInput {
    fn fields() -> &'static [FieldSpec] {
        FIELDS
    }

    fn get(
        &self,
        field: &str,
    ) -> Result<FieldValue, FieldError> {
        match field {
            "start_time" => Ok(self.start_time.into()),
            "end_time" => Ok(self.end_time.into()),
            "break_minutes" => Ok(self.break_minutes.into()),
            "days_per_week" => Ok(self.days_per_week.into()),
            "hourly_rate" => Ok(self.hourly_rate.into()),
            _ => Err(unknown(field)),
        }
    }

    fn set(
        &mut self,
        field: &str,
        value: FieldValue,
    ) -> Result<(), FieldError> {
        match field {
            "start_time" => self.start_time = value.into_count(field)?,
            "end_time" => self.end_time = value.into_count(field)?,
            "break_minutes" => self.break_minutes = value.into_count(field)?,
            "days_per_week" => self.days_per_week = value.into_count(field)?,
            "hourly_rate" => self.hourly_rate = value.into_number(field)?,
            _ => return Err(unknown(field)),
        }
        Ok(())
    }
}

/// Result of the work hours calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkHoursResult {
    pub shift: String,
    pub daily_hours: Decimal,
    pub weekly_hours: Decimal,
    pub daily_pay: Decimal,
    pub weekly_pay: Decimal,
    /// Weekly pay over 52 weeks.
    pub annual_pay: Decimal,
}

/// Calculator for hours worked and the resulting pay.
#[derive(Debug, Clone, Copy, Default)]
pub struct WorkHoursCalculator;

impl Calculator for WorkHoursCalculator {
    type Input = WorkHoursInput;
    type Output = WorkHoursResult;

    const SLUG: &'static str = "work-hours";
    const TITLE: &'static str = "Work Hours Calculator";

    fn calculate(
        &self,
        input: &WorkHoursInput,
    ) -> WorkHoursResult {
        let minutes = paid_minutes(input.start_time, input.end_time, input.break_minutes);
        let daily_hours = Decimal::from(minutes) / dec!(60);
        let weekly_hours = daily_hours * Decimal::from(input.days_per_week);
        let weekly_pay = weekly_hours * input.hourly_rate;

        debug!(minutes, %weekly_hours, "calculated work hours");

        WorkHoursResult {
            shift: format!(
                "{}-{}",
                format_time_of_day(input.start_time),
                format_time_of_day(input.end_time)
            ),
            daily_hours: round_half_up(daily_hours),
            weekly_hours: round_half_up(weekly_hours),
            daily_pay: round_half_up(daily_hours * input.hourly_rate),
            weekly_pay: round_half_up(weekly_pay),
            annual_pay: round_half_up(weekly_pay * Decimal::from(WEEKS_PER_YEAR)),
        }
    }
}

impl Presentable for WorkHoursResult {
    fn report(&self) -> Report {
        Report::new(WorkHoursCalculator::TITLE)
            .row("Shift", ReportValue::text(self.shift.as_str()))
            .row("Hours per day", ReportValue::number(self.daily_hours, 2))
            .row("Hours per week", ReportValue::number(self.weekly_hours, 2))
            .row("Daily pay", ReportValue::cents(self.daily_pay))
            .row("Weekly pay", ReportValue::cents(self.weekly_pay))
            .row("Annual pay", ReportValue::dollars(self.annual_pay))
    }
}
