//! Context assembly for generative backends.
//!
//! Backends receive a bounded, serializable view of the profile rather than
//! the raw tables: full signals, the medication list, survey answers, and
//! small row samples of the merged table and reference catalog.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::resolve::{SOURCE_COLUMN, SubjectProfile};
use crate::signals::{SignalMap, SignalValue};
use crate::table::{Cell, Table};

/// Rows sampled from the merged table
pub const MERGED_SAMPLE_ROWS: usize = 20;
/// Rows sampled from the reference catalog
pub const CATALOG_SAMPLE_ROWS: usize = 80;
/// Columns sampled per table
pub const SAMPLE_COLUMNS: usize = 8;

/// Everything a generative backend gets to work from
#[derive(Debug, Clone, Serialize)]
pub struct GenerationRequest {
    /// Identifier the profile was resolved for
    pub subject_id: String,
    /// Full extracted signal map
    pub signals: SignalMap,
    /// Medication list from the signals, empty when not extracted
    pub current_meds: Vec<String>,
    /// Survey-derived signals only
    pub survey_preferences: BTreeMap<String, SignalValue>,
    /// Sample rows of the merged table, provenance column excluded
    pub merged_sample: Vec<Map<String, Value>>,
    /// Sample rows of the reference catalog
    pub catalog_sample: Vec<Map<String, Value>>,
}

impl GenerationRequest {
    /// Assemble the bounded context for one resolved profile
    #[must_use]
    pub fn from_profile(profile: &SubjectProfile, catalog: Option<&Table>) -> Self {
        let current_meds = match profile.signals.get("current_meds") {
            Some(SignalValue::List(meds)) => meds.clone(),
            _ => Vec::new(),
        };

        let survey_preferences = profile
            .signals
            .iter()
            .filter(|(key, _)| key.starts_with("survey_"))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        let merged_sample = sample_rows(&profile.merged, MERGED_SAMPLE_ROWS, true);
        let catalog_sample = catalog
            .map(|table| sample_rows(table, CATALOG_SAMPLE_ROWS, false))
            .unwrap_or_default();

        Self {
            subject_id: profile.subject_id.clone(),
            signals: profile.signals.clone(),
            current_meds,
            survey_preferences,
            merged_sample,
            catalog_sample,
        }
    }
}

/// Sample leading rows and columns of a table as JSON objects
fn sample_rows(table: &Table, max_rows: usize, exclude_source: bool) -> Vec<Map<String, Value>> {
    let columns: Vec<(usize, &String)> = table
        .column_names()
        .iter()
        .enumerate()
        .filter(|(_, name)| !(exclude_source && name.as_str() == SOURCE_COLUMN))
        .take(SAMPLE_COLUMNS)
        .collect();

    table
        .rows()
        .take(max_rows)
        .map(|row| {
            columns
                .iter()
                .map(|&(col, name)| (name.clone(), cell_to_json(&row[col])))
                .collect()
        })
        .collect()
}

fn cell_to_json(cell: &Cell) -> Value {
    match cell {
        Cell::Null => Value::Null,
        Cell::Number(n) => serde_json::Number::from_f64(*n).map_or(Value::Null, Value::Number),
        Cell::Text(s) => Value::String(s.clone()),
    }
}
