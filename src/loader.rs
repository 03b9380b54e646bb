//! Source file loading utilities.
//!
//! Fills every bundle slot declared in a [`SourceManifest`], fail-soft per
//! source: a file that is absent or does not parse leaves its slot empty and
//! records the outcome in the bundle statuses instead of aborting the load.

use std::path::Path;

use calamine::{Data, Reader, Xlsx, open_workbook};
use log::{info, warn};

use crate::bundle::{DatasetBundle, DatasetRole, SourceStatus};
use crate::config::{SourceManifest, TableFormat};
use crate::error::{ProfileReaderError, Result};
use crate::key::infer_key;
use crate::table::{Cell, Table};

/// Load every manifest entry into a [`DatasetBundle`]
///
/// Never fails: sources that cannot be read are recorded as `Missing` or
/// `Failed` and their slots stay empty, so downstream resolution sees a
/// smaller bundle rather than an error. The bundle-wide subject key is
/// deduced from the first subject table, in fixed role order, that has a
/// recognizable key column.
#[must_use]
pub fn load_bundle(manifest: &SourceManifest) -> DatasetBundle {
    let mut bundle = DatasetBundle {
        catalog: None,
        pilot_cohort: None,
        labs: None,
        wearables: None,
        microbiome: None,
        metabolomics: None,
        genomics: None,
        medications: None,
        surveys: None,
        subject_key: None,
        statuses: Vec::with_capacity(DatasetRole::ALL.len()),
    };

    for role in DatasetRole::ALL {
        let status = match manifest.get(role) {
            None => SourceStatus::Missing,
            Some(spec) if !spec.path.exists() => {
                warn!("{role} source not found: {}", spec.path.display());
                SourceStatus::Missing
            }
            Some(spec) => match read_table(&spec.path, spec.format) {
                Ok(table) => {
                    info!(
                        "Loaded {role} from {}: {} rows, {} columns",
                        spec.path.display(),
                        table.num_rows(),
                        table.num_columns()
                    );
                    let status = SourceStatus::Loaded {
                        rows: table.num_rows(),
                        columns: table.num_columns(),
                    };
                    *bundle.slot_mut(role) = Some(table);
                    status
                }
                Err(e) => {
                    warn!("Failed to load {role} from {}: {e}", spec.path.display());
                    SourceStatus::Failed {
                        reason: e.to_string(),
                    }
                }
            },
        };
        bundle.statuses.push((role, status));
    }

    let subject_key: Option<String> = DatasetRole::SUBJECT_ROLES
        .iter()
        .find_map(|&role| bundle.table(role).and_then(infer_key))
        .map(ToString::to_string);

    match &subject_key {
        Some(key) => info!("Deduced subject key column: {key}"),
        None => warn!("No subject key column found in any loaded source"),
    }
    bundle.subject_key = subject_key;

    bundle
}

/// Read one source file into a table
pub fn read_table(path: &Path, format: TableFormat) -> Result<Table> {
    match format {
        TableFormat::Csv => read_csv_table(path),
        TableFormat::Xlsx => read_xlsx_table(path),
    }
}

/// Read a CSV file with a header row into a table
///
/// Rows whose width differs from the header are a parse error; a source
/// either loads whole or not at all.
pub fn read_csv_table(path: &Path) -> Result<Table> {
    let mut reader = csv::Reader::from_path(path)?;

    let mut columns: Vec<String> = reader.headers()?.iter().map(ToString::to_string).collect();
    // Excel exports prefix the first header with a byte-order mark
    if let Some(first) = columns.first_mut() {
        *first = first.trim_start_matches('\u{feff}').to_string();
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(Cell::from_field).collect());
    }

    Table::with_inferred_types(columns, rows)
}

/// Read the first sheet of an Excel workbook into a table
///
/// The first row is taken as the header; unnamed header cells get a
/// positional name.
pub fn read_xlsx_table(path: &Path) -> Result<Table> {
    let mut workbook: Xlsx<_> = open_workbook(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| ProfileReaderError::MalformedTable("workbook has no sheets".to_string()))??;

    let mut sheet_rows = range.rows();
    let Some(header) = sheet_rows.next() else {
        return Err(ProfileReaderError::MalformedTable(
            "sheet has no header row".to_string(),
        ));
    };

    let columns: Vec<String> = header
        .iter()
        .enumerate()
        .map(|(i, cell)| {
            convert_cell(cell)
                .display_string()
                .unwrap_or_else(|| format!("column_{i}"))
        })
        .collect();

    let rows: Vec<Vec<Cell>> = sheet_rows
        .map(|row| row.iter().map(convert_cell).collect())
        .collect();

    Table::with_inferred_types(columns, rows)
}

/// Map a workbook cell onto the tagged cell model
fn convert_cell(data: &Data) -> Cell {
    match data {
        Data::Empty | Data::Error(_) => Cell::Null,
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Float(f) => Cell::Number(*f),
        Data::Bool(b) => Cell::Text(b.to_string()),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::from_field(s),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map_or(Cell::Null, |d| Cell::Text(d.date().to_string())),
    }
}
