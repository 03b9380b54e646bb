//! Signal extraction from per-subject slices.
//!
//! Each source family reduces its slice to a handful of normalized signals
//! keyed by stable names. Extraction reads the per-source slices, never the
//! merged table, and silently skips anything it cannot locate: signals are
//! best-effort summaries, not validated measurements.

pub mod genomics;
pub mod labs;
pub mod medications;
pub mod omics;
pub mod surveys;
pub mod wearables;

use std::collections::BTreeMap;

use serde::Serialize;

use crate::bundle::{DatasetRole, SourceSlices};
use crate::config::ProfileReaderConfig;
use crate::table::Table;

/// A derived signal value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SignalValue {
    /// A single numeric reading or average
    Number(f64),
    /// A single textual value
    Text(String),
    /// Distinct textual values in first occurrence order
    List(Vec<String>),
    /// Values grouped by the column they came from
    Flags(BTreeMap<String, Vec<String>>),
}

/// Signals keyed by stable name, ordered for deterministic output
pub type SignalMap = BTreeMap<String, SignalValue>;

/// How one canonical metric is located in a slice
///
/// Matching tries each exact alias in order, then falls back to the first
/// column whose normalized name contains the normalized canonical name.
#[derive(Debug, Clone, Copy)]
pub struct SignalRule {
    /// Canonical metric name; also the signal name or its suffix
    pub name: &'static str,
    /// Exact column spellings, highest priority first
    pub aliases: &'static [&'static str],
}

impl SignalRule {
    /// Locate the rule's column using the given name normalizer
    #[must_use]
    pub fn find_column(&self, table: &Table, normalize: fn(&str) -> String) -> Option<usize> {
        for alias in self.aliases {
            if let Some(idx) = table.column_index(alias) {
                return Some(idx);
            }
        }

        let needle = normalize(self.name);
        table.find_column(|name| normalize(name).contains(&needle))
    }
}

/// Lowercase a column name and strip separators, so `Omega-3 Index`,
/// `omega3_index` and `OMEGA 3 INDEX` all compare equal
#[must_use]
pub fn normalize_compact(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_'))
        .collect()
}

/// Lowercase-only normalization for families matched by loose fragments
#[must_use]
pub fn normalize_plain(name: &str) -> String {
    name.to_lowercase()
}

/// Extract every signal family from the per-source slices
///
/// Families whose slice is absent or empty contribute nothing.
#[must_use]
pub fn extract_signals(slices: &SourceSlices, config: &ProfileReaderConfig) -> SignalMap {
    let mut signals = SignalMap::new();

    if let Some(table) = present(slices, DatasetRole::Labs) {
        labs::extract(table, config, &mut signals);
    }
    if let Some(table) = present(slices, DatasetRole::Wearables) {
        wearables::extract(table, &mut signals);
    }
    if let Some(table) = present(slices, DatasetRole::Microbiome) {
        omics::extract(table, "microbiome", omics::MICROBIOME_METRICS, &mut signals);
    }
    if let Some(table) = present(slices, DatasetRole::Metabolomics) {
        omics::extract(table, "metabol", omics::METABOLOMIC_METRICS, &mut signals);
    }
    if let Some(table) = present(slices, DatasetRole::Genomics) {
        genomics::extract(table, &mut signals);
    }
    if let Some(table) = present(slices, DatasetRole::Medications) {
        medications::extract(table, &mut signals);
    }
    if let Some(table) = present(slices, DatasetRole::Surveys) {
        surveys::extract(table, &mut signals);
    }

    signals
}

fn present(slices: &SourceSlices, role: DatasetRole) -> Option<&Table> {
    slices.get(role).filter(|table| !table.is_empty())
}
