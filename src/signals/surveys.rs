//! Intake survey answer collection.
//!
//! Survey exports are one column per question. Columns touching a topic of
//! interest are carried over verbatim as `survey_<column>` signals, keeping
//! the answers available to downstream consumers without interpretation.

use itertools::Itertools;

use crate::signals::{SignalMap, SignalValue};
use crate::table::{Cell, Table};

/// Question topics worth carrying into the signal map
pub const TOPIC_KEYWORDS: [&str; 8] = [
    "allergy",
    "goal",
    "avoid",
    "preference",
    "nootropic",
    "caffeine",
    "sleep",
    "diet",
];

/// Distinct answers kept per question
pub const MAX_ANSWERS: usize = 10;

pub(crate) fn extract(table: &Table, signals: &mut SignalMap) {
    for keyword in TOPIC_KEYWORDS {
        for (col, name) in table.column_names().iter().enumerate() {
            if !name.to_lowercase().contains(keyword) {
                continue;
            }

            let answers: Vec<String> = table
                .column(col)
                .filter_map(Cell::display_string)
                .unique()
                .take(MAX_ANSWERS)
                .collect();

            if !answers.is_empty() {
                signals.insert(format!("survey_{name}"), SignalValue::List(answers));
            }
        }
    }
}
