//! Result presentation model.
//!
//! A calculator result turns itself into a [`Report`]: an ordered list of
//! labelled rows plus optional tables. The same report feeds on-screen
//! display and every export format, so exported content cannot drift from
//! what is shown.

pub mod format;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub use format::{CurrencyStyle, PercentStyle, format_currency, format_number, format_percent};

/// A value in a report, carrying the precision it is displayed with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportValue {
    Currency(Decimal, CurrencyStyle),
    Percent(Decimal, PercentStyle),
    /// Plain quantity shown with the given number of decimals.
    Number(Decimal, u32),
    Text(String),
}

impl ReportValue {
    /// Whole-dollar amount.
    pub fn dollars(value: Decimal) -> Self {
        Self::Currency(value, CurrencyStyle::Whole)
    }

    /// Dollars-and-cents amount.
    pub fn cents(value: Decimal) -> Self {
        Self::Currency(value, CurrencyStyle::Cents)
    }

    /// Share of a total.
    pub fn share(value: Decimal) -> Self {
        Self::Percent(value, PercentStyle::Share)
    }

    /// Interest, tax or growth rate.
    pub fn rate(value: Decimal) -> Self {
        Self::Percent(value, PercentStyle::Rate)
    }

    pub fn number(
        value: Decimal,
        dp: u32,
    ) -> Self {
        Self::Number(value, dp)
    }

    pub fn count(value: u32) -> Self {
        Self::Number(Decimal::from(value), 0)
    }

    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// The display string for this value.
    pub fn formatted(&self) -> String {
        match self {
            Self::Currency(value, style) => format_currency(*value, *style),
            Self::Percent(value, style) => format_percent(*value, *style),
            Self::Number(value, dp) => format_number(*value, *dp),
            Self::Text(text) => text.clone(),
        }
    }
}

/// One labelled line of a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRow {
    pub label: String,
    pub value: ReportValue,
}

impl ReportRow {
    pub fn formatted_value(&self) -> String {
        self.value.formatted()
    }
}

/// A titled table (schedules, projections, per-entry breakdowns).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportTable {
    pub title: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<ReportValue>>,
}

impl ReportTable {
    pub fn new(
        title: impl Into<String>,
        columns: &[&str],
    ) -> Self {
        Self {
            title: title.into(),
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push_row(
        &mut self,
        row: Vec<ReportValue>,
    ) {
        self.rows.push(row);
    }
}

/// The rendered form of a calculator result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub title: String,
    pub rows: Vec<ReportRow>,
    pub tables: Vec<ReportTable>,
}

impl Report {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            rows: Vec::new(),
            tables: Vec::new(),
        }
    }

    /// Appends a row; rows keep the order they are added in.
    pub fn row(
        mut self,
        label: impl Into<String>,
        value: ReportValue,
    ) -> Self {
        self.rows.push(ReportRow {
            label: label.into(),
            value,
        });
        self
    }

    pub fn table(
        mut self,
        table: ReportTable,
    ) -> Self {
        self.tables.push(table);
        self
    }

    /// Finds the formatted value of the row with `label`.
    pub fn value_of(
        &self,
        label: &str,
    ) -> Option<String> {
        self.rows
            .iter()
            .find(|row| row.label == label)
            .map(ReportRow::formatted_value)
    }
}

/// Implemented by every calculator result.
pub trait Presentable {
    fn report(&self) -> Report;
}
