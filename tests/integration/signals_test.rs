use std::collections::BTreeMap;

use crate::utils::{data_root, sample_bundle, write_source};
use profile_reader::{
    DatasetRole, ProfileReaderConfig, SignalValue, SourceManifest, load_bundle, resolve_profile,
};

#[test]
fn lab_signals_prefer_the_most_recent_dated_row() {
    let root = data_root();
    let bundle = sample_bundle(root.path());
    let config = ProfileReaderConfig::default();

    let profile = resolve_profile(&bundle, "u001", &config).unwrap();

    // Two draws; the March values win over the January ones
    assert_eq!(
        profile.signals.get("Vitamin D"),
        Some(&SignalValue::Number(22.0))
    );
    assert_eq!(profile.signals.get("CRP"), Some(&SignalValue::Number(4.0)));
    // Markers without a column stay absent
    assert!(profile.signals.get("HbA1c").is_none());
}

#[test]
fn wearable_averages_use_the_trailing_window() {
    let root = data_root();
    let rows: Vec<Vec<String>> = (1..=20)
        .map(|i| vec!["u001".to_string(), i.to_string()])
        .collect();
    let refs: Vec<Vec<&str>> = rows
        .iter()
        .map(|row| row.iter().map(String::as_str).collect())
        .collect();
    let slices: Vec<&[&str]> = refs.iter().map(Vec::as_slice).collect();
    write_source(root.path(), "wearable_daily_aggregates.csv", &["USERID", "hrv"], &slices);

    let bundle = load_bundle(&SourceManifest::default_layout(root.path()));
    let profile = resolve_profile(&bundle, "u001", &ProfileReaderConfig::default()).unwrap();

    // Mean of the last 14 readings, 7 through 20
    assert_eq!(
        profile.signals.get("wearable_hrv_avg"),
        Some(&SignalValue::Number(13.5))
    );
}

#[test]
fn invalid_readings_are_excluded_from_averages() {
    let root = data_root();
    write_source(
        root.path(),
        "wearable_daily_aggregates.csv",
        &["USERID", "hrv"],
        &[
            &["u001", "40"],
            &["u001", "NA"],
            &["u001", "error"],
            &["u001", "60"],
        ],
    );

    let bundle = load_bundle(&SourceManifest::default_layout(root.path()));
    let profile = resolve_profile(&bundle, "u001", &ProfileReaderConfig::default()).unwrap();

    assert_eq!(
        profile.signals.get("wearable_hrv_avg"),
        Some(&SignalValue::Number(50.0))
    );
}

#[test]
fn omics_columns_reduce_to_prefixed_averages() {
    let root = data_root();
    write_source(
        root.path(),
        "microbiome_summary.csv",
        &["USERID", "Shannon Diversity Index"],
        &[&["u001", "3.0"], &["u001", "3.5"]],
    );
    write_source(
        root.path(),
        "metabolomics_summary.csv",
        &["USERID", "Glucose_fasting"],
        &[&["u001", "5.0"]],
    );

    let bundle = load_bundle(&SourceManifest::default_layout(root.path()));
    let profile = resolve_profile(&bundle, "u001", &ProfileReaderConfig::default()).unwrap();

    // One column satisfies both the shannon and diversity metrics
    assert_eq!(
        profile.signals.get("microbiome_shannon_avg"),
        Some(&SignalValue::Number(3.25))
    );
    assert_eq!(
        profile.signals.get("microbiome_diversity_avg"),
        Some(&SignalValue::Number(3.25))
    );
    assert_eq!(
        profile.signals.get("metabol_glucose_avg"),
        Some(&SignalValue::Number(5.0))
    );
}

#[test]
fn flags_medications_and_surveys_are_collected_verbatim() {
    let root = data_root();
    write_source(
        root.path(),
        "genomic_summary.csv",
        &["USERID", "APOE_variant"],
        &[&["u001", "e3/e4"]],
    );
    write_source(
        root.path(),
        "medication_history.csv",
        &["USERID", "medication_name"],
        &[&["u001", "Metformin"], &["u001", "BPC-157"]],
    );
    write_source(
        root.path(),
        "surveys_adherence_logs.csv",
        &["USERID", "sleep_quality"],
        &[&["u001", "Poor"]],
    );

    let bundle = load_bundle(&SourceManifest::default_layout(root.path()));
    let profile = resolve_profile(&bundle, "u001", &ProfileReaderConfig::default()).unwrap();

    let mut flags = BTreeMap::new();
    flags.insert("APOE_variant".to_string(), vec!["e3/e4".to_string()]);
    assert_eq!(
        profile.signals.get("genomic_flags"),
        Some(&SignalValue::Flags(flags))
    );
    assert_eq!(
        profile.signals.get("current_meds"),
        Some(&SignalValue::List(vec![
            "Metformin".to_string(),
            "BPC-157".to_string()
        ]))
    );
    assert_eq!(
        profile.signals.get("survey_sleep_quality"),
        Some(&SignalValue::List(vec!["Poor".to_string()]))
    );
}

#[test]
fn subject_known_only_to_surveys_gets_survey_signals_alone() {
    let root = data_root();
    // Labs exist but hold other subjects
    write_source(
        root.path(),
        "structured_lab_results.csv",
        &["USERID", "Vitamin_D"],
        &[&["u001", "22.0"]],
    );
    write_source(
        root.path(),
        "surveys_adherence_logs.csv",
        &["USERID", "goal_primary"],
        &[&["u009", "improve focus"]],
    );

    let bundle = load_bundle(&SourceManifest::default_layout(root.path()));
    let profile = resolve_profile(&bundle, "u009", &ProfileReaderConfig::default()).unwrap();

    assert_eq!(profile.source_row_counts(), vec![(DatasetRole::Surveys, 1)]);
    assert_eq!(
        profile.signals.get("survey_goal_primary"),
        Some(&SignalValue::List(vec!["improve focus".to_string()]))
    );
    assert!(profile.signals.get("Vitamin D").is_none());
    assert!(
        profile
            .signals
            .keys()
            .all(|key| !key.starts_with("wearable_"))
    );
}

#[test]
fn resolving_twice_yields_identical_profiles() {
    let root = data_root();
    let bundle = sample_bundle(root.path());
    let config = ProfileReaderConfig::default();

    let first = resolve_profile(&bundle, "u001", &config).unwrap();
    let second = resolve_profile(&bundle, "u001", &config).unwrap();

    assert_eq!(first, second);
}
