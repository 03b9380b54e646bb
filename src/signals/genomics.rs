//! Genomic flag collection.
//!
//! Genomic exports are wide and panel-specific, so nothing is averaged:
//! columns whose names mention variants are sampled into a per-column map
//! of distinct values, capped hard in both dimensions.

use std::collections::BTreeMap;

use itertools::Itertools;

use crate::signals::{SignalMap, SignalValue};
use crate::table::{Cell, Table};

/// Name fragments that mark a column as variant-bearing
pub const VARIANT_KEYWORDS: [&str; 5] = ["variant", "risk", "allele", "mutation", "snp"];

/// Variant columns sampled per slice
pub const MAX_FLAG_COLUMNS: usize = 20;
/// Distinct values kept per column
pub const MAX_FLAG_VALUES: usize = 5;

pub(crate) fn extract(table: &Table, signals: &mut SignalMap) {
    let mut flags: BTreeMap<String, Vec<String>> = BTreeMap::new();

    let variant_columns = table
        .column_names()
        .iter()
        .enumerate()
        .filter(|(_, name)| {
            let lc = name.to_lowercase();
            VARIANT_KEYWORDS.iter().any(|kw| lc.contains(kw))
        })
        .take(MAX_FLAG_COLUMNS);

    for (col, name) in variant_columns {
        let values: Vec<String> = table
            .column(col)
            .filter_map(Cell::display_string)
            .unique()
            .take(MAX_FLAG_VALUES)
            .collect();

        if !values.is_empty() {
            flags.insert(name.clone(), values);
        }
    }

    // An empty map still records that genomic data was seen
    signals.insert("genomic_flags".to_string(), SignalValue::Flags(flags));
}
