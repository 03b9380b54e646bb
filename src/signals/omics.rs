//! Panel averages for the microbiome and metabolomics families.
//!
//! Both families reduce the same way: every metric with a matching column
//! becomes the mean of all its valid readings, under a family prefix. Panel
//! vendors vary column names too much for exact aliases, so these rules
//! match on loose lowercase fragments.

use crate::signals::{SignalMap, SignalRule, SignalValue, normalize_plain};
use crate::table::{Cell, Table};

/// Microbiome metrics, reduced to `microbiome_<name>_avg`
pub const MICROBIOME_METRICS: &[SignalRule] = &[
    SignalRule { name: "diversity", aliases: &[] },
    SignalRule { name: "shannon", aliases: &[] },
    SignalRule { name: "butyrate", aliases: &[] },
    SignalRule { name: "scfa", aliases: &[] },
    SignalRule { name: "inflammation", aliases: &[] },
];

/// Metabolomic metrics, reduced to `metabol_<name>_avg`
pub const METABOLOMIC_METRICS: &[SignalRule] = &[
    SignalRule { name: "vitamin", aliases: &[] },
    SignalRule { name: "omega", aliases: &[] },
    SignalRule { name: "glucose", aliases: &[] },
    SignalRule { name: "carnitine", aliases: &[] },
    SignalRule { name: "amino", aliases: &[] },
];

pub(crate) fn extract(
    table: &Table,
    prefix: &str,
    metrics: &[SignalRule],
    signals: &mut SignalMap,
) {
    for rule in metrics {
        let Some(col) = rule.find_column(table, normalize_plain) else {
            continue;
        };

        let values: Vec<f64> = table.column(col).filter_map(Cell::as_number).collect();
        if values.is_empty() {
            continue;
        }

        let mean = values.iter().sum::<f64>() / values.len() as f64;
        signals.insert(
            format!("{prefix}_{}_avg", rule.name),
            SignalValue::Number(mean),
        );
    }
}
