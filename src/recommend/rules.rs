//! Rule-based recommendation heuristics.
//!
//! The fallback engine: a fixed set of informational, non-medical heuristics
//! over the extracted signals, plus keyword picks from the reference catalog.
//! Thresholds and texts are deliberately conservative; every report carries
//! the disclaimer note.

use itertools::Itertools;
use serde::Serialize;

use crate::signals::{SignalMap, SignalValue};
use crate::table::{Cell, Table};

const VITAMIN_D_LOW: f64 = 25.0;
const OMEGA3_INDEX_LOW: f64 = 6.0;
const CRP_HIGH: f64 = 3.0;
const HRV_LOW: f64 = 30.0;

/// Catalog picks allowed for sleep and recovery alone
const RECOVERY_PICK_CAP: usize = 5;
/// Catalog picks allowed in total
const TOTAL_PICK_CAP: usize = 8;

/// Catalog columns whose text is searched for indication keywords
const CATALOG_TEXT_KEYWORDS: [&str; 4] = ["indication", "function", "description", "mechanism"];

const DISCLAIMER: &str = "These are informational ideas, not medical advice. Please consult a \
                          qualified clinician before starting peptides or supplements.";

/// Grouped rule-based suggestions
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Recommendations {
    /// Supplement suggestions from biomarker thresholds
    pub supplement_stack: Vec<String>,
    /// Compound names picked from the reference catalog
    pub peptides: Vec<String>,
    /// Cognitive support suggestions, filtered by stated sensitivities
    pub nootropics: Vec<String>,
    /// Framing notes attached to every report
    pub notes: Vec<String>,
}

/// Evaluate the heuristic rules over a signal map
///
/// # Arguments
/// * `signals` - Extracted signals for one subject
/// * `catalog` - Reference catalog for compound picks, if loaded
#[must_use]
pub fn rule_based(signals: &SignalMap, catalog: Option<&Table>) -> Recommendations {
    let mut recs = Recommendations::default();

    if number(signals, "Vitamin D").is_some_and(|v| v < VITAMIN_D_LOW) {
        recs.supplement_stack
            .push("Vitamin D3 + K2 (informational; confirm dosage with clinician)".to_string());
    }
    if number(signals, "Omega-3 Index").is_some_and(|v| v < OMEGA3_INDEX_LOW) {
        recs.supplement_stack
            .push("Omega-3 (EPA/DHA) fish oil (informational)".to_string());
    }
    if number(signals, "CRP").is_some_and(|v| v > CRP_HIGH) {
        recs.supplement_stack
            .push("Anti-inflammatory focus: curcumin, magnesium glycinate (informational)".to_string());
    }

    let hrv = number(signals, "wearable_hrv_avg");
    if hrv.is_some_and(|v| v < HRV_LOW) {
        recs.supplement_stack.push(
            "Sleep + stress support: magnesium glycinate, L-theanine, ashwagandha (informational)"
                .to_string(),
        );
    }

    // Stated caffeine sensitivity suppresses the stimulating picks
    let caffeine_sensitive = collected_values(signals, "caffeine")
        .iter()
        .any(|v| v.contains("sensitive") || v.contains("avoid"));
    if !caffeine_sensitive {
        recs.nootropics.push("L-tyrosine (focus/alertness)".to_string());
        recs.nootropics.push("Rhodiola rosea (fatigue)".to_string());
    }
    recs.nootropics.push("Citicoline (memory/attention)".to_string());

    if let Some(catalog) = catalog.filter(|t| !t.is_empty()) {
        pick_from_catalog(catalog, signals, hrv, &mut recs.peptides);
    }

    recs.notes.push(DISCLAIMER.to_string());
    recs
}

/// Pick compounds out of the catalog by indication keywords
fn pick_from_catalog(
    catalog: &Table,
    signals: &SignalMap,
    hrv: Option<f64>,
    picks: &mut Vec<String>,
) {
    let lower: Vec<String> = catalog
        .column_names()
        .iter()
        .map(|name| name.to_lowercase())
        .collect();

    let text_cols: Vec<usize> = lower
        .iter()
        .enumerate()
        .filter(|(_, lc)| CATALOG_TEXT_KEYWORDS.iter().any(|kw| lc.contains(kw)))
        .map(|(i, _)| i)
        .collect();

    let name_col = lower
        .iter()
        .position(|lc| lc == "name")
        .or_else(|| lower.iter().position(|lc| lc == "peptide"))
        .unwrap_or(0);

    if hrv.is_some_and(|v| v < HRV_LOW) {
        for row in 0..catalog.num_rows() {
            if picks.len() >= RECOVERY_PICK_CAP {
                break;
            }
            if row_matches(catalog, row, &text_cols, &["sleep", "recovery", "stress"]) {
                picks.push(pick_name(catalog, row, name_col));
            }
        }
    }

    let goals = collected_values(signals, "goal");
    let cognition_goal = goals
        .iter()
        .any(|g| g.contains("focus") || g.contains("cognition") || g.contains("memory"));
    if cognition_goal {
        for row in 0..catalog.num_rows() {
            if picks.len() >= TOTAL_PICK_CAP {
                break;
            }
            if row_matches(catalog, row, &text_cols, &["cognition", "memory", "neuro", "brain"]) {
                picks.push(pick_name(catalog, row, name_col));
            }
        }
    }
}

/// Whether any searched cell of the row mentions one of the keywords
fn row_matches(table: &Table, row: usize, text_cols: &[usize], keywords: &[&str]) -> bool {
    let blob = if text_cols.is_empty() {
        table
            .row(row)
            .iter()
            .filter_map(Cell::display_string)
            .join(" ")
    } else {
        text_cols
            .iter()
            .filter_map(|&col| table.cell(row, col).display_string())
            .join(" ")
    }
    .to_lowercase();

    keywords.iter().any(|kw| blob.contains(kw))
}

fn pick_name(table: &Table, row: usize, name_col: usize) -> String {
    table
        .cell(row, name_col)
        .display_string()
        .unwrap_or_else(|| "Unknown".to_string())
}

/// Numeric signal under the exact key, if present
fn number(signals: &SignalMap, key: &str) -> Option<f64> {
    match signals.get(key) {
        Some(SignalValue::Number(n)) => Some(*n),
        _ => None,
    }
}

/// Lowercased values of every signal whose key mentions the fragment
fn collected_values(signals: &SignalMap, key_fragment: &str) -> Vec<String> {
    let mut values = Vec::new();
    for (key, value) in signals {
        if !key.to_lowercase().contains(key_fragment) {
            continue;
        }
        match value {
            SignalValue::Number(n) => values.push(n.to_string()),
            SignalValue::Text(s) => values.push(s.to_lowercase()),
            SignalValue::List(items) => {
                values.extend(items.iter().map(|s| s.to_lowercase()));
            }
            SignalValue::Flags(map) => {
                values.extend(map.values().flatten().map(|s| s.to_lowercase()));
            }
        }
    }
    values
}
