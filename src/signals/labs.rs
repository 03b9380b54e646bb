//! Laboratory marker extraction.
//!
//! Lab panels are longitudinal. When the slice carries a date column the
//! most recent parseable numeric reading wins per marker; without one, the
//! last valid reading in table order is taken.

use chrono::NaiveDate;

use crate::config::ProfileReaderConfig;
use crate::signals::{SignalMap, SignalRule, SignalValue, normalize_compact};
use crate::table::Table;

/// Lab markers reduced to one numeric signal each, named after the marker
pub const LAB_MARKERS: &[SignalRule] = &[
    SignalRule { name: "Vitamin D", aliases: &["Vitamin D"] },
    SignalRule { name: "Omega-3 Index", aliases: &["Omega-3 Index"] },
    SignalRule { name: "LDL", aliases: &["LDL"] },
    SignalRule { name: "HDL", aliases: &["HDL"] },
    SignalRule { name: "CRP", aliases: &["CRP"] },
    SignalRule { name: "HbA1c", aliases: &["HbA1c"] },
    SignalRule { name: "Ferritin", aliases: &["Ferritin"] },
];

pub(crate) fn extract(table: &Table, config: &ProfileReaderConfig, signals: &mut SignalMap) {
    let recency = recency_order(table, &config.date_formats);

    for rule in LAB_MARKERS {
        let Some(col) = rule.find_column(table, normalize_compact) else {
            continue;
        };

        let value = match &recency {
            Some(order) => order
                .iter()
                .find_map(|&row| table.cell(row, col).as_number()),
            None => (0..table.num_rows())
                .rev()
                .find_map(|row| table.cell(row, col).as_number()),
        };

        if let Some(v) = value {
            signals.insert(rule.name.to_string(), SignalValue::Number(v));
        }
    }
}

/// Row order, most recent first, keyed on the first date-named column
///
/// `None` when the slice has no such column. Unparseable date cells sort
/// after parseable ones by their raw text; full ties keep table order.
fn recency_order(table: &Table, formats: &[String]) -> Option<Vec<usize>> {
    let date_col = table.find_column(|name| name.to_lowercase().contains("date"))?;

    let mut keyed: Vec<(usize, Option<NaiveDate>, Option<String>)> = (0..table.num_rows())
        .map(|row| {
            let cell = table.cell(row, date_col);
            (row, cell.as_date(formats), cell.display_string())
        })
        .collect();

    keyed.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| b.2.cmp(&a.2)));

    Some(keyed.into_iter().map(|(row, _, _)| row).collect())
}
