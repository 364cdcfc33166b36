//! Coercion of raw form text into typed field values.
//!
//! Nothing here rejects input. Empty or unparsable numbers become 0, every
//! number is clamped into its field's range, and malformed times become
//! midnight.

use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;
use tracing::warn;

use crate::models::{FieldKind, FieldSpec, FieldValue};

static NON_NUMERIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^0-9.\-]").expect("separator pattern is valid"));

static PLAIN_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^-?(\d+\.?\d*|\.\d+)$").expect("plain number pattern is valid")
});

static TIME_OF_DAY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(\d{1,2})(?::(\d{2}))?\s*$").expect("time pattern is valid")
});

const MINUTES_PER_DAY: u32 = 24 * 60;

/// Keeps only ASCII digits. Used for age/count fields while typing.
pub fn filter_digits(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

/// Parses loosely formatted numeric text (`"1,234.5"`, `"$2,000"`, `"6.5%"`).
///
/// Empty input and input that still does not parse after stripping
/// separators both yield 0. A well-formed number too large for `Decimal`
/// saturates to `Decimal::MAX` or `Decimal::MIN` so the field clamp still
/// picks the nearest bound.
pub fn parse_number(raw: &str) -> Decimal {
    let stripped = NON_NUMERIC.replace_all(raw, "");
    if stripped.is_empty() {
        return Decimal::ZERO;
    }
    stripped.parse().unwrap_or_else(|e| {
        if PLAIN_NUMBER.is_match(&stripped) {
            warn!(input = %raw, "number out of range, saturating: {}", e);
            if stripped.starts_with('-') {
                Decimal::MIN
            } else {
                Decimal::MAX
            }
        } else {
            warn!(input = %raw, "unparsable number, using 0: {}", e);
            Decimal::ZERO
        }
    })
}

/// Parses `HH:MM` (or a bare hour) into minutes past midnight.
///
/// Anything malformed or out of range yields 0.
pub fn parse_time_of_day(raw: &str) -> u32 {
    let Some(captures) = TIME_OF_DAY.captures(raw) else {
        if !raw.trim().is_empty() {
            warn!(input = %raw, "unparsable time of day, using 00:00");
        }
        return 0;
    };

    let hours: u32 = captures[1].parse().unwrap_or(0);
    let minutes: u32 = captures
        .get(2)
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0);

    if hours >= 24 || minutes >= 60 {
        warn!(input = %raw, "time of day out of range, using 00:00");
        return 0;
    }
    hours * 60 + minutes
}

/// Formats minutes past midnight as `HH:MM`.
pub fn format_time_of_day(minutes: u32) -> String {
    let minutes = minutes % MINUTES_PER_DAY;
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// Interprets common truthy spellings; everything else is `false`.
pub fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "true" | "yes" | "y" | "1" | "on" | "checked"
    )
}

/// Normalizes a numeric field: parse, then clamp into `[min, max]`.
///
/// Integer fields drop any fraction and keep digits only, so signs are
/// dropped as well.
pub fn normalize_number(
    raw: &str,
    spec: &FieldSpec,
) -> Decimal {
    let parsed = match spec.kind {
        FieldKind::Integer => {
            let whole = raw.split('.').next().unwrap_or_default();
            parse_number(&filter_digits(whole))
        }
        FieldKind::Time => Decimal::from(parse_time_of_day(raw)),
        _ => parse_number(raw),
    };
    spec.clamp(parsed)
}

/// Normalizes raw text into the value kind `spec` declares.
pub fn normalize(
    raw: &str,
    spec: &FieldSpec,
) -> FieldValue {
    match spec.kind {
        FieldKind::Text => FieldValue::Text(raw.trim().to_string()),
        FieldKind::Toggle => FieldValue::Flag(parse_flag(raw)),
        _ => FieldValue::Number(normalize_number(raw, spec)),
    }
}
