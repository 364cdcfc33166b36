//! CSV loader for calculator input snapshots.
//!
//! ## CSV Format
//!
//! | Column | Required | Notes |
//! |---------|----------|-----------------------------------------------------|
//! | `entry` | no | Empty for a scalar field, else a list entry id |
//! | `field` | yes | Field name as listed by `calc fields <slug>` |
//! | `value` | yes | Raw text, normalized like form input (`"$2,000"`) |
//!
//! An `entry` id that exists before the file is applied updates that entry.
//! Any other id adds a new entry; later rows with the same file id update the
//! entry it created, even when that new entry's id is also used in the file.
//!
//! ### Example
//!
//! ```csv
//! entry,field,value
//! ,monthly_expenses,"15,500"
//! 1,revenue,13000
//! 3,name,Licensing
//! 3,revenue,2500
//! ```

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

use calc_core::{CalculatorSession, EntryId, FieldError};
use serde::Deserialize;
use tracing::debug;

use crate::catalogue::display_value;
use crate::export::ExportError;

#[derive(Debug, Deserialize)]
struct CsvRow {
    entry: Option<u32>,
    field: String,
    value: String,
}

/// One assignment read from an input snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputRecord {
    /// 1-based data row number (header = row 0).
    pub row: usize,
    /// List entry id as written in the file; `None` for scalar fields.
    pub entry: Option<u32>,
    pub field: String,
    pub value: String,
}

/// Errors that can occur while loading or applying an input snapshot.
#[derive(Debug, thiserror::Error)]
pub enum InputLoadError {
    /// The CSV is structurally invalid or a cell has the wrong type.
    #[error("CSV parse error on row {row}: {source}")]
    Parse {
        row: usize,
        #[source]
        source: csv::Error,
    },

    /// The calculator rejected the assignment on this row.
    #[error("row {row}: {source}")]
    Field {
        row: usize,
        #[source]
        source: FieldError,
    },

    #[error("cannot read '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Parse snapshot CSV text into records, in file order.
///
/// # Errors
///
/// [`InputLoadError::Parse`] with the 1-based row number of the first bad row.
pub fn load_from_str(input: &str) -> Result<Vec<InputRecord>, InputLoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(false)
        .from_reader(input.as_bytes());

    reader
        .deserialize::<CsvRow>()
        .enumerate()
        .map(|(idx, result)| {
            let row = idx + 1;
            let parsed = result.map_err(|source| InputLoadError::Parse { row, source })?;
            Ok(InputRecord {
                row,
                entry: parsed.entry,
                field: parsed.field,
                value: parsed.value,
            })
        })
        .collect()
}

/// Read a snapshot file from disk and delegate to [`load_from_str`].
pub fn load_from_file(path: &Path) -> Result<Vec<InputRecord>, InputLoadError> {
    let contents = std::fs::read_to_string(path).map_err(|source| InputLoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    load_from_str(&contents)
}

/// Apply records to a mounted calculator, in order. Returns the number of
/// assignments made.
///
/// Stops at the first rejected row; rows before it stay applied.
pub fn apply(
    session: &mut dyn CalculatorSession,
    records: &[InputRecord],
) -> Result<usize, InputLoadError> {
    let existing = session.entry_ids();
    let mut entry_ids: HashMap<u32, EntryId> = HashMap::new();

    for record in records {
        let field_error = |source| InputLoadError::Field {
            row: record.row,
            source,
        };

        match record.entry {
            None => session
                .update_raw(&record.field, &record.value)
                .map_err(field_error)?,
            Some(file_id) => {
                let id = match entry_ids.get(&file_id) {
                    Some(id) => *id,
                    None => {
                        let id = if existing.contains(&EntryId(file_id)) {
                            EntryId(file_id)
                        } else {
                            session.add_entry().map_err(field_error)?
                        };
                        debug!(file_id, %id, "mapped snapshot entry");
                        entry_ids.insert(file_id, id);
                        id
                    }
                };
                session
                    .update_entry_raw(id, &record.field, &record.value)
                    .map_err(field_error)?;
            }
        }
    }
    Ok(records.len())
}

/// Write the session's current input as snapshot CSV, loadable with
/// [`load_from_str`] and [`apply`].
pub fn to_snapshot_csv(session: &dyn CalculatorSession) -> Result<String, ExportError> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    writer.write_record(["entry", "field", "value"])?;

    for spec in session.fields() {
        if let Ok(value) = session.field_value(spec.name) {
            writer.write_record(["", spec.name, display_value(spec, value).as_str()])?;
        }
    }
    for id in session.entry_ids() {
        let entry = id.to_string();
        for spec in session.entry_fields() {
            if let Ok(value) = session.entry_value(id, spec.name) {
                writer.write_record([
                    entry.as_str(),
                    spec.name,
                    display_value(spec, value).as_str(),
                ])?;
            }
        }
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::Flush(e.into_error()))?;
    Ok(String::from_utf8(bytes)?)
}
