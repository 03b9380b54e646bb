//! Wearable metric averaging.
//!
//! Wearable slices are day-granularity time series in row order; each known
//! metric is reduced to the mean of its trailing valid readings.

use crate::signals::{SignalMap, SignalRule, SignalValue, normalize_compact};
use crate::table::{Cell, Table};

/// Trailing valid readings that feed each average
pub const AVERAGE_WINDOW: usize = 14;

/// Wearable metrics reduced to a `wearable_<name>_avg` signal
pub const WEARABLE_METRICS: &[SignalRule] = &[
    SignalRule { name: "sleep_hours", aliases: &["sleep_hours"] },
    SignalRule { name: "total_sleep", aliases: &["total_sleep"] },
    SignalRule { name: "hrv", aliases: &["hrv"] },
    SignalRule { name: "rhr", aliases: &["rhr"] },
    SignalRule { name: "resting_hr", aliases: &["resting_hr"] },
    SignalRule { name: "steps", aliases: &["steps"] },
    SignalRule { name: "vo2max", aliases: &["vo2max"] },
];

pub(crate) fn extract(table: &Table, signals: &mut SignalMap) {
    for rule in WEARABLE_METRICS {
        let Some(col) = rule.find_column(table, normalize_compact) else {
            continue;
        };

        let values: Vec<f64> = table.column(col).filter_map(Cell::as_number).collect();
        if values.is_empty() {
            continue;
        }

        let window = &values[values.len().saturating_sub(AVERAGE_WINDOW)..];
        let mean = window.iter().sum::<f64>() / window.len() as f64;
        signals.insert(
            format!("wearable_{}_avg", rule.name),
            SignalValue::Number(mean),
        );
    }
}
