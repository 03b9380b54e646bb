//! Subject resolution and cross-source merging.
//!
//! One subject identifier is located in every keyed source, the matching
//! rows are sliced out per source, and the slices are stacked into a single
//! merged table whose `__source` column records where each row came from.

use log::{debug, info};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::bundle::{DatasetBundle, DatasetRole, SourceSlices};
use crate::config::{IdMatchPolicy, ProfileReaderConfig};
use crate::key::infer_key;
use crate::signals::{SignalMap, extract_signals};
use crate::table::{Cell, Table};

/// Provenance column appended to the merged table
pub const SOURCE_COLUMN: &str = "__source";

/// Everything known about one subject after resolution
#[derive(Debug, Clone, PartialEq)]
pub struct SubjectProfile {
    /// Identifier the profile was resolved for
    pub subject_id: String,
    /// Per-source row slices the merge was built from
    pub slices: SourceSlices,
    /// All matched rows in one table, with provenance in [`SOURCE_COLUMN`]
    pub merged: Table,
    /// Signals extracted from the per-source slices
    pub signals: SignalMap,
}

impl SubjectProfile {
    /// Row counts per contributing source, in fixed role order
    #[must_use]
    pub fn source_row_counts(&self) -> Vec<(DatasetRole, usize)> {
        self.slices
            .contributing()
            .map(|(role, table)| (role, table.num_rows()))
            .collect()
    }
}

/// Resolve a subject across every loaded source
///
/// Returns `None` when no source holds a row for the identifier; signal
/// extraction only runs for subjects that matched somewhere.
#[must_use]
pub fn resolve_profile(
    bundle: &DatasetBundle,
    subject_id: &str,
    config: &ProfileReaderConfig,
) -> Option<SubjectProfile> {
    let slices = slice_sources(bundle, subject_id, config);
    let merged = merge_slices(&slices)?;

    info!(
        "Subject {subject_id}: {} rows merged from {} sources",
        merged.num_rows(),
        slices.contributing().count()
    );

    let signals = extract_signals(&slices, config);

    Some(SubjectProfile {
        subject_id: subject_id.to_string(),
        slices,
        merged,
        signals,
    })
}

/// Slice each keyed source down to the subject's rows
///
/// Every loaded subject table gets a slice when a key column can be
/// determined for it: the bundle-wide key when the table has that column,
/// otherwise the table's own inferred key. Tables without any key are
/// skipped and their slot stays `None`.
#[must_use]
pub fn slice_sources(
    bundle: &DatasetBundle,
    subject_id: &str,
    config: &ProfileReaderConfig,
) -> SourceSlices {
    let mut slices = SourceSlices::default();

    for (role, table) in bundle.subject_tables() {
        let Some(col) = key_column(table, bundle.subject_key()) else {
            debug!("No key column found for {role}, skipping source");
            continue;
        };

        let mut matched: SmallVec<[usize; 16]> = SmallVec::new();
        for (i, row) in table.rows().enumerate() {
            if matches_id(&row[col], subject_id, config.id_match) {
                matched.push(i);
            }
        }

        debug!("{role}: {} rows match subject {subject_id}", matched.len());
        slices.set(role, table.select_rows(&matched));
    }

    slices
}

/// Stack the non-empty slices into one provenance-tagged table
///
/// Columns are the union of the contributing slices' columns in first
/// appearance order, with [`SOURCE_COLUMN`] appended last; cells a slice
/// does not have are null. Row order is fixed role order, then original row
/// order within each source. A source column named like the provenance
/// column is superseded by it.
///
/// # Returns
/// * `Option<Table>` - The merged table, or `None` when no slice
///   contributed any rows
#[must_use]
pub fn merge_slices(slices: &SourceSlices) -> Option<Table> {
    let parts: Vec<(DatasetRole, &Table)> = slices.contributing().collect();
    if parts.is_empty() {
        return None;
    }

    let mut columns: Vec<String> = Vec::new();
    let mut positions: FxHashMap<&str, usize> = FxHashMap::default();
    for (_, table) in &parts {
        for name in table.column_names() {
            if name != SOURCE_COLUMN && !positions.contains_key(name.as_str()) {
                positions.insert(name.as_str(), columns.len());
                columns.push(name.clone());
            }
        }
    }
    let source_idx = columns.len();
    columns.push(SOURCE_COLUMN.to_string());

    let mut rows: Vec<Vec<Cell>> = Vec::new();
    for (role, table) in &parts {
        let mapping: Vec<Option<usize>> = table
            .column_names()
            .iter()
            .map(|name| positions.get(name.as_str()).copied())
            .collect();

        for row in table.rows() {
            let mut out = vec![Cell::Null; columns.len()];
            for (j, cell) in row.iter().enumerate() {
                if let Some(pos) = mapping[j] {
                    out[pos] = cell.clone();
                }
            }
            out[source_idx] = Cell::Text(role.as_str().to_string());
            rows.push(out);
        }
    }

    Some(Table::from_raw(columns, rows))
}

/// Key column of a table: the bundle-wide key when present, else the
/// table's own inferred key
fn key_column(table: &Table, bundle_key: Option<&str>) -> Option<usize> {
    if let Some(key) = bundle_key {
        if let Some(idx) = table.column_index(key) {
            return Some(idx);
        }
    }
    infer_key(table).and_then(|key| table.column_index(key))
}

/// Whether a key cell refers to the subject under the given policy
fn matches_id(cell: &Cell, subject_id: &str, policy: IdMatchPolicy) -> bool {
    match policy {
        IdMatchPolicy::Strict => cell.as_text() == Some(subject_id),
        IdMatchPolicy::Coerced => match cell {
            Cell::Null => false,
            Cell::Text(s) => {
                s == subject_id
                    || match (s.trim().parse::<f64>(), subject_id.trim().parse::<f64>()) {
                        (Ok(a), Ok(b)) => a == b,
                        _ => false,
                    }
            }
            Cell::Number(n) => subject_id.trim().parse::<f64>().is_ok_and(|v| v == *n),
        },
    }
}
