use std::fmt;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::entry::EntryId;

/// Errors raised when addressing or assigning calculator fields.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FieldError {
    /// The calculator does not declare a field with this name.
    #[error("unknown field '{0}'")]
    UnknownField(String),

    /// The value's kind does not match the field (e.g. text into a number field).
    #[error("field '{field}' expects a {expected} value, got {actual}")]
    KindMismatch {
        field: String,
        expected: &'static str,
        actual: &'static str,
    },

    /// The calculator has no list-valued field.
    #[error("this calculator has no list entries")]
    NoEntries,

    /// No list entry carries the given id.
    #[error("no entry with id {0}")]
    EntryNotFound(EntryId),
}

/// How a field is entered and normalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldKind {
    /// Money amount; separators and currency symbols are stripped.
    Currency,
    /// Percentage expressed in points (`6.5` means 6.5%).
    Percent,
    /// Plain decimal quantity.
    Decimal,
    /// Whole number (ages, counts); digits only.
    Integer,
    /// Time of day (`HH:MM`), stored as minutes past midnight.
    Time,
    /// Free text.
    Text,
    /// On/off switch.
    Toggle,
}

impl FieldKind {
    pub fn is_numeric(&self) -> bool {
        !matches!(self, Self::Text | Self::Toggle)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Currency => "currency",
            Self::Percent => "percent",
            Self::Decimal => "decimal",
            Self::Integer => "integer",
            Self::Time => "time",
            Self::Text => "text",
            Self::Toggle => "toggle",
        }
    }
}

/// Declaration of a single input field: name, label, kind, and domain range.
///
/// `min`/`max` are only meaningful for numeric kinds; normalized values are
/// always clamped into `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub min: Decimal,
    pub max: Decimal,
    /// Explanatory text shown next to the field.
    pub help: &'static str,
}

impl FieldSpec {
    pub const fn number(
        name: &'static str,
        label: &'static str,
        kind: FieldKind,
        min: Decimal,
        max: Decimal,
        help: &'static str,
    ) -> Self {
        Self {
            name,
            label,
            kind,
            min,
            max,
            help,
        }
    }

    pub const fn text(
        name: &'static str,
        label: &'static str,
        help: &'static str,
    ) -> Self {
        Self {
            name,
            label,
            kind: FieldKind::Text,
            min: Decimal::ZERO,
            max: Decimal::ZERO,
            help,
        }
    }

    pub const fn toggle(
        name: &'static str,
        label: &'static str,
        help: &'static str,
    ) -> Self {
        Self {
            name,
            label,
            kind: FieldKind::Toggle,
            min: Decimal::ZERO,
            max: Decimal::ZERO,
            help,
        }
    }

    /// Clamps a value into this field's declared range.
    pub fn clamp(
        &self,
        value: Decimal,
    ) -> Decimal {
        value.max(self.min).min(self.max)
    }

    /// Clamps a number into this field's range. Text, flags and values for
    /// non-numeric fields pass through unchanged.
    pub fn clamp_value(
        &self,
        value: FieldValue,
    ) -> FieldValue {
        match (self.kind, value) {
            (FieldKind::Text | FieldKind::Toggle, value) => value,
            (_, FieldValue::Number(number)) => FieldValue::Number(self.clamp(number)),
            (_, value) => value,
        }
    }
}

/// Looks up a field declaration by name.
pub fn find_spec<'a>(
    specs: &'a [FieldSpec],
    name: &str,
) -> Result<&'a FieldSpec, FieldError> {
    specs
        .iter()
        .find(|spec| spec.name == name)
        .ok_or_else(|| FieldError::UnknownField(name.to_string()))
}

/// A typed field value as held by an input record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldValue {
    Number(Decimal),
    Text(String),
    Flag(bool),
}

impl FieldValue {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Number(_) => "number",
            Self::Text(_) => "text",
            Self::Flag(_) => "flag",
        }
    }

    fn mismatch(
        &self,
        field: &str,
        expected: &'static str,
    ) -> FieldError {
        FieldError::KindMismatch {
            field: field.to_string(),
            expected,
            actual: self.kind_name(),
        }
    }

    pub fn into_number(
        self,
        field: &str,
    ) -> Result<Decimal, FieldError> {
        match self {
            Self::Number(value) => Ok(value),
            other => Err(other.mismatch(field, "number")),
        }
    }

    /// Converts a number into a whole count, truncating any fraction.
    /// Negative values become 0 and oversized values saturate.
    pub fn into_count(
        self,
        field: &str,
    ) -> Result<u32, FieldError> {
        let value = self.into_number(field)?;
        if value.is_sign_negative() {
            return Ok(0);
        }
        Ok(value.trunc().to_u32().unwrap_or(u32::MAX))
    }

    pub fn into_text(
        self,
        field: &str,
    ) -> Result<String, FieldError> {
        match self {
            Self::Text(text) => Ok(text),
            other => Err(other.mismatch(field, "text")),
        }
    }

    pub fn into_flag(
        self,
        field: &str,
    ) -> Result<bool, FieldError> {
        match self {
            Self::Flag(flag) => Ok(flag),
            other => Err(other.mismatch(field, "flag")),
        }
    }
}

impl From<Decimal> for FieldValue {
    fn from(value: Decimal) -> Self {
        Self::Number(value)
    }
}

impl From<u32> for FieldValue {
    fn from(value: u32) -> Self {
        Self::Number(Decimal::from(value))
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl fmt::Display for FieldValue {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Self::Number(value) => write!(f, "{value}"),
            Self::Text(text) => f.write_str(text),
            Self::Flag(flag) => write!(f, "{}", if *flag { "yes" } else { "no" }),
        }
    }
}
