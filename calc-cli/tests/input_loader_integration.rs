use std::path::Path;

use calc_cli::config::AppConfig;
use calc_cli::export::{self, ExportFormat};
use calc_cli::input_loader::{self, InputLoadError};
use calc_core::{CalculatorRegistry, CalculatorSession, EntryId, FieldError};
use pretty_assertions::assert_eq;

fn fixture_path(name: &str) -> &'static Path {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
        .leak()
}

fn mount(slug: &str) -> Box<dyn CalculatorSession> {
    CalculatorRegistry::with_builtin_calculators()
        .mount(slug)
        .unwrap()
}

fn mount_with_fixture(
    slug: &str,
    fixture: &str,
) -> Box<dyn CalculatorSession> {
    let mut session = mount(slug);
    let records = input_loader::load_from_file(fixture_path(fixture)).unwrap();
    input_loader::apply(session.as_mut(), &records).unwrap();
    session
}

// =============================================================================
// loading and applying fixtures
// =============================================================================

#[test]
fn business_profit_fixture_updates_and_adds_streams() {
    let mut session = mount_with_fixture("business-profit", "business_profit.csv");

    let report = session.calculate();

    assert_eq!(
        session.entry_ids(),
        vec![EntryId(1), EntryId(2), EntryId(3)]
    );
    assert_eq!(
        report.value_of("Annual gross revenue"),
        Some("$276,000".to_string())
    );
    assert_eq!(
        report.value_of("Annual expenses"),
        Some("$180,000".to_string())
    );
    assert_eq!(report.value_of("Annual profit"), Some("$96,000".to_string()));
    assert_eq!(report.value_of("Profit margin"), Some("34.8%".to_string()));
}

#[test]
fn business_profit_fixture_with_new_ids_keeps_every_stream() {
    let mut session = mount_with_fixture("business-profit", "business_profit_new_ids.csv");

    let report = session.calculate();

    assert_eq!(
        session.entry_ids(),
        vec![EntryId(1), EntryId(2), EntryId(3), EntryId(4)]
    );
    assert_eq!(
        report.value_of("Annual gross revenue"),
        Some("$249,600".to_string())
    );
}

#[test]
fn recipe_fixture_adds_ingredient_and_promotes_unit() {
    let mut session = mount_with_fixture("recipe-scaler", "recipe_scaler.csv");

    let report = session.calculate();

    assert_eq!(report.value_of("Scale factor"), Some("2.00".to_string()));
    assert_eq!(report.value_of("Sugar"), Some("0.75 cup".to_string()));
    assert_eq!(session.entry_ids().len(), 6);
}

#[test]
fn unknown_field_fixture_reports_row_and_keeps_earlier_rows() {
    let mut session = mount("loan");
    let records = input_loader::load_from_file(fixture_path("unknown_field.csv")).unwrap();

    let error = input_loader::apply(session.as_mut(), &records).unwrap_err();

    assert!(matches!(
        error,
        InputLoadError::Field {
            row: 2,
            source: FieldError::UnknownField(ref name)
        } if name == "balloon_payment"
    ));
    assert_eq!(
        session.field_value("loan_amount").unwrap().to_string(),
        "250000"
    );
}

#[test]
fn malformed_fixture_reports_row() {
    let result = input_loader::load_from_file(fixture_path("malformed.csv"));

    assert!(matches!(result, Err(InputLoadError::Parse { row: 2, .. })));
}

#[test]
fn missing_file_is_read_error() {
    let result = input_loader::load_from_file(fixture_path("does_not_exist.csv"));

    assert!(matches!(result, Err(InputLoadError::Read { .. })));
}

// =============================================================================
// snapshots and export
// =============================================================================

#[test]
fn snapshot_reproduces_the_same_report() {
    let mut original = mount_with_fixture("business-profit", "business_profit.csv");
    let snapshot = input_loader::to_snapshot_csv(original.as_ref()).unwrap();

    let mut restored = mount("business-profit");
    let records = input_loader::load_from_str(&snapshot).unwrap();
    input_loader::apply(restored.as_mut(), &records).unwrap();

    assert_eq!(restored.calculate(), original.calculate());
}

#[test]
fn csv_export_matches_displayed_report() {
    let mut session = mount("loan");
    session.update_raw("loan_amount", "100,000").unwrap();
    session.update_raw("annual_rate", "6").unwrap();
    let report = session.calculate();

    let csv = export::render(&report, ExportFormat::Csv).unwrap();

    assert_eq!(
        csv,
        "label,value\n\
         Monthly payment,$599.55\n\
         Total of payments,\"$215,838\"\n\
         Total interest,\"$115,838\"\n\
         Number of payments,360\n"
    );
}

#[test]
fn text_export_lists_every_row() {
    let mut session = mount("work-hours");
    let report = session.calculate();

    let text = export::render(&report, ExportFormat::Text).unwrap();

    for row in &report.rows {
        assert!(text.contains(&format!("{}: {}", row.label, row.formatted_value())));
    }
}

#[test]
fn config_fixture_is_loaded() {
    let config = AppConfig::load(fixture_path("calc.toml")).unwrap();

    assert_eq!(config.logging.level, "warn");
    assert_eq!(config.export.format, ExportFormat::Csv);
}

#[test]
fn csv_export_has_one_row_per_report_row_for_every_calculator() {
    let registry = CalculatorRegistry::with_builtin_calculators();

    for slug in registry.available() {
        let mut session = registry.mount(slug).unwrap();
        let report = session.calculate();
        let rendered = export::render(&report, ExportFormat::Csv).unwrap();

        let exported: Vec<(String, String)> = csv::Reader::from_reader(rendered.as_bytes())
            .records()
            .map(|record| {
                let record = record.unwrap();
                (record[0].to_string(), record[1].to_string())
            })
            .collect();
        let displayed: Vec<(String, String)> = report
            .rows
            .iter()
            .map(|row| (row.label.clone(), row.formatted_value()))
            .collect();

        assert_eq!(exported, displayed, "calculator '{slug}'");
    }
}
