//! Plain-text and CSV export of calculator reports.
//!
//! Both formats are rendered from the same [`Report`] that is shown on
//! screen, so an export always carries exactly the displayed values.
//!
//! ## CSV layout
//!
//! ```csv
//! label,value
//! Monthly payment,$599.55
//! Total of payments,"$215,838"
//! ```
//!
//! Lines end in `\n`; a field is quoted only when it contains a comma, a
//! quote or a line break. Report tables are exported separately with
//! [`table_to_csv`].

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use calc_core::{Report, ReportTable};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Output format of an exported report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Text,
    Csv,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Text => "txt",
            Self::Csv => "csv",
        }
    }
}

/// Errors that can occur while exporting a report.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    /// The in-memory CSV buffer could not be flushed.
    #[error("failed to flush CSV output: {0}")]
    Flush(#[source] io::Error),

    #[error("CSV output is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),

    #[error("cannot write report to '{}': {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Renders a report as plain text: the title, one `label: value` line per
/// row, then each table with aligned columns.
pub fn to_text(report: &Report) -> String {
    let mut out = String::new();
    out.push_str(&report.title);
    out.push('\n');
    out.push_str(&"=".repeat(report.title.chars().count()));
    out.push('\n');

    for row in &report.rows {
        out.push_str(&format!("{}: {}\n", row.label, row.formatted_value()));
    }

    for table in &report.tables {
        out.push('\n');
        out.push_str(&table_to_text(table));
    }
    out
}

fn table_to_text(table: &ReportTable) -> String {
    let cells: Vec<Vec<String>> = table
        .rows
        .iter()
        .map(|row| row.iter().map(|value| value.formatted()).collect())
        .collect();

    let mut widths: Vec<usize> = table.columns.iter().map(|c| c.chars().count()).collect();
    for row in &cells {
        for (index, cell) in row.iter().enumerate() {
            if let Some(width) = widths.get_mut(index) {
                *width = (*width).max(cell.chars().count());
            }
        }
    }

    let render_line = |line: &[String]| -> String {
        let padded: Vec<String> = line
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{cell:>width$}"))
            .collect();
        format!("{}\n", padded.join("  ").trim_end())
    };

    let mut out = format!("{}\n", table.title);
    out.push_str(&render_line(&table.columns));
    for row in &cells {
        out.push_str(&render_line(row));
    }
    out
}

fn csv_writer() -> csv::Writer<Vec<u8>> {
    csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new())
}

fn finish(writer: csv::Writer<Vec<u8>>) -> Result<String, ExportError> {
    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::Flush(e.into_error()))?;
    Ok(String::from_utf8(bytes)?)
}

/// Renders the report rows as CSV with a `label,value` header.
pub fn to_csv(report: &Report) -> Result<String, ExportError> {
    let mut writer = csv_writer();
    writer.write_record(["label", "value"])?;
    for row in &report.rows {
        writer.write_record([row.label.as_str(), row.formatted_value().as_str()])?;
    }
    finish(writer)
}

/// Renders one report table as CSV, with its column names as the header.
pub fn table_to_csv(table: &ReportTable) -> Result<String, ExportError> {
    let mut writer = csv_writer();
    writer.write_record(&table.columns)?;
    for row in &table.rows {
        writer.write_record(row.iter().map(|value| value.formatted()))?;
    }
    finish(writer)
}

/// Renders a report in `format`.
pub fn render(
    report: &Report,
    format: ExportFormat,
) -> Result<String, ExportError> {
    match format {
        ExportFormat::Text => Ok(to_text(report)),
        ExportFormat::Csv => to_csv(report),
    }
}

/// Default file name for a calculator's export, e.g. `loan.csv`.
pub fn default_file_name(
    slug: &str,
    format: ExportFormat,
) -> String {
    format!("{slug}.{}", format.extension())
}

/// Writes `report` to `path`, creating missing parent directories.
pub fn write_report(
    report: &Report,
    format: ExportFormat,
    path: &Path,
) -> Result<(), ExportError> {
    let contents = render(report, format)?;
    let write_error = |source| ExportError::Write {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(write_error)?;
    }
    fs::write(path, contents).map_err(write_error)?;

    info!(path = %path.display(), ?format, "exported report");
    Ok(())
}

/// File-name form of a table title: lowercase words joined by `-`.
fn table_file_stem(title: &str) -> String {
    title
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(str::to_ascii_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

/// Writes each report table as CSV next to `path`, named
/// `<stem>-<table>.csv` (e.g. `loan-amortization-schedule.csv`). Returns the
/// written paths.
pub fn write_table_files(
    report: &Report,
    path: &Path,
) -> Result<Vec<PathBuf>, ExportError> {
    let stem = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "report".to_string());

    let mut written = Vec::with_capacity(report.tables.len());
    for table in &report.tables {
        let table_path =
            path.with_file_name(format!("{stem}-{}.csv", table_file_stem(&table.title)));
        fs::write(&table_path, table_to_csv(table)?).map_err(|source| ExportError::Write {
            path: table_path.clone(),
            source,
        })?;
        info!(path = %table_path.display(), table = %table.title, "exported table");
        written.push(table_path);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use calc_core::ReportValue;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn sample_report() -> Report {
        let mut table = ReportTable::new("Schedule", &["Year", "Balance"]);
        table.push_row(vec![ReportValue::count(1), ReportValue::dollars(dec!(98772))]);
        table.push_row(vec![ReportValue::count(2), ReportValue::dollars(dec!(0))]);

        Report::new("Loan")
            .row("Monthly payment", ReportValue::cents(dec!(599.55)))
            .row("Total interest", ReportValue::dollars(dec!(115838.19)))
            .table(table)
    }

    // =========================================================================
    // to_csv tests
    // =========================================================================

    #[test]
    fn to_csv_quotes_values_with_commas() {
        let csv = to_csv(&sample_report()).unwrap();

        assert_eq!(
            csv,
            "label,value\nMonthly payment,$599.55\nTotal interest,\"$115,838\"\n"
        );
    }

    #[test]
    fn to_csv_empty_report_has_header_only() {
        let csv = to_csv(&Report::new("Empty")).unwrap();

        assert_eq!(csv, "label,value\n");
    }

    #[test]
    fn table_to_csv_uses_column_header() {
        let report = sample_report();

        let csv = table_to_csv(&report.tables[0]).unwrap();

        assert_eq!(csv, "Year,Balance\n1,\"$98,772\"\n2,$0\n");
    }

    // =========================================================================
    // to_text tests
    // =========================================================================

    #[test]
    fn to_text_lists_rows_then_tables() {
        let text = to_text(&sample_report());

        assert_eq!(
            text,
            "Loan\n\
             ====\n\
             Monthly payment: $599.55\n\
             Total interest: $115,838\n\
             \n\
             Schedule\n\
             Year  Balance\n   \
             1  $98,772\n   \
             2       $0\n"
        );
    }

    // =========================================================================
    // write_report tests
    // =========================================================================

    #[test]
    fn write_report_creates_parent_directories() {
        let dir = std::env::temp_dir().join(format!("calc-export-{}", std::process::id()));
        let path = dir.join("nested").join("loan.csv");

        write_report(&sample_report(), ExportFormat::Csv, &path).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("label,value\n"));
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn write_table_files_names_files_after_tables() {
        let dir = std::env::temp_dir().join(format!("calc-tables-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("loan.csv");

        let written = write_table_files(&sample_report(), &path).unwrap();

        assert_eq!(written, vec![dir.join("loan-schedule.csv")]);
        assert_eq!(
            fs::read_to_string(&written[0]).unwrap(),
            "Year,Balance\n1,\"$98,772\"\n2,$0\n"
        );
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn table_file_stem_joins_words() {
        assert_eq!(table_file_stem("Amortization schedule"), "amortization-schedule");
        assert_eq!(table_file_stem("Pass-through scenarios"), "pass-through-scenarios");
    }

    #[test]
    fn default_file_name_uses_format_extension() {
        assert_eq!(default_file_name("loan", ExportFormat::Csv), "loan.csv");
        assert_eq!(default_file_name("loan", ExportFormat::Text), "loan.txt");
    }
}
