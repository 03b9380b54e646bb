//! Current medication and compound listing.

use itertools::Itertools;

use crate::signals::{SignalMap, SignalValue};
use crate::table::{Cell, Table};

/// Name fragments that mark the medication name column
pub const NAME_KEYWORDS: [&str; 3] = ["med", "drug", "peptide"];

/// Distinct entries kept
pub const MAX_ENTRIES: usize = 20;

/// List distinct entries from the first medication-named column as
/// `current_meds`
pub(crate) fn extract(table: &Table, signals: &mut SignalMap) {
    let Some(col) = table.find_column(|name| {
        let lc = name.to_lowercase();
        NAME_KEYWORDS.iter().any(|kw| lc.contains(kw))
    }) else {
        return;
    };

    let entries: Vec<String> = table
        .column(col)
        .filter_map(Cell::display_string)
        .unique()
        .take(MAX_ENTRIES)
        .collect();

    signals.insert("current_meds".to_string(), SignalValue::List(entries));
}
