//! Field catalogue of a mounted calculator.

use calc_core::normalize::format_time_of_day;
use calc_core::{CalculatorSession, FieldKind, FieldSpec, FieldValue};

/// Renders a field value the way a user would type it back in.
///
/// Time fields are held as minutes past midnight but typed as `HH:MM`.
pub fn display_value(
    spec: &FieldSpec,
    value: FieldValue,
) -> String {
    match (spec.kind, value) {
        (FieldKind::Time, value) => match value.into_count(spec.name) {
            Ok(minutes) => format_time_of_day(minutes),
            Err(_) => String::new(),
        },
        (_, FieldValue::Number(number)) => number.normalize().to_string(),
        (_, value) => value.to_string(),
    }
}

fn range_text(spec: &FieldSpec) -> String {
    match spec.kind {
        FieldKind::Text | FieldKind::Toggle => String::new(),
        FieldKind::Time => "00:00..23:59".to_string(),
        _ => format!("{}..{}", spec.min.normalize(), spec.max.normalize()),
    }
}

fn describe(
    out: &mut String,
    spec: &FieldSpec,
    default: Option<String>,
) {
    out.push_str(&format!(
        "  {:<24} {:<10} {:<22}",
        spec.name,
        spec.kind.as_str(),
        range_text(spec)
    ));
    if let Some(default) = default {
        out.push_str(&format!(" default {default}"));
    }
    let line_end = out.trim_end().len();
    out.truncate(line_end);
    out.push('\n');

    out.push_str(&format!("      {}", spec.label));
    if !spec.help.is_empty() {
        out.push_str(&format!(": {}", spec.help));
    }
    out.push('\n');
}

/// Lists every field with kind, range, default value and help text.
pub fn field_catalogue(session: &dyn CalculatorSession) -> String {
    let mut out = format!("{} ({})\n\nFields:\n", session.title(), session.slug());
    for spec in session.fields() {
        let default = session
            .field_value(spec.name)
            .ok()
            .map(|value| display_value(spec, value));
        describe(&mut out, spec, default);
    }

    if !session.entry_fields().is_empty() {
        out.push_str(&format!(
            "\nEntry fields (default entries: {}):\n",
            session.entry_ids().len()
        ));
        for spec in session.entry_fields() {
            describe(&mut out, spec, None);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use calc_core::CalculatorRegistry;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn display_value_formats_time_as_clock() {
        let registry = CalculatorRegistry::with_builtin_calculators();
        let session = registry.mount("work-hours").unwrap();
        let spec = &session.fields()[0];

        let shown = display_value(spec, session.field_value(spec.name).unwrap());

        assert_eq!(shown, "09:00");
    }

    #[test]
    fn display_value_drops_trailing_zeros() {
        let spec = FieldSpec::number("price", "Price", FieldKind::Currency, dec!(0), dec!(10), "");

        assert_eq!(display_value(&spec, FieldValue::from(dec!(3.50))), "3.5");
    }

    #[test]
    fn field_catalogue_lists_scalar_and_entry_fields() {
        let registry = CalculatorRegistry::with_builtin_calculators();
        let session = registry.mount("business-profit").unwrap();

        let catalogue = field_catalogue(session.as_ref());

        assert!(catalogue.starts_with("Business Profit Calculator (business-profit)\n"));
        assert!(catalogue.contains("monthly_expenses"));
        assert!(catalogue.contains("default 14000"));
        assert!(catalogue.contains("Entry fields (default entries: 2):"));
        assert!(catalogue.contains("revenue"));
    }
}
