use crate::utils::{data_root, sample_bundle, write_source};
use profile_reader::{
    Cell, DatasetRole, IdMatchPolicy, ProfileReaderConfig, SOURCE_COLUMN, SourceManifest,
    load_bundle, resolve_profile,
};

#[test]
fn merged_rows_equal_the_sum_of_source_slices() {
    let root = data_root();
    let bundle = sample_bundle(root.path());
    let config = ProfileReaderConfig::default();

    let profile = resolve_profile(&bundle, "u001", &config).expect("u001 resolves");

    let total: usize = profile.source_row_counts().iter().map(|(_, n)| n).sum();
    assert_eq!(profile.merged.num_rows(), total);
    // 1 cohort + 2 labs + 2 wearables + 1 survey
    assert_eq!(profile.merged.num_rows(), 6);
}

#[test]
fn provenance_column_is_last_and_tags_each_row() {
    let root = data_root();
    let bundle = sample_bundle(root.path());
    let config = ProfileReaderConfig::default();

    let profile = resolve_profile(&bundle, "u001", &config).unwrap();
    let merged = &profile.merged;

    assert_eq!(
        merged.column_names().last().map(String::as_str),
        Some(SOURCE_COLUMN)
    );

    let src = merged.column_index(SOURCE_COLUMN).unwrap();
    let tags: Vec<&Cell> = (0..merged.num_rows()).map(|r| merged.cell(r, src)).collect();
    let expected = ["pilot_cohort", "labs", "labs", "wearables", "wearables", "surveys"];
    assert_eq!(tags.len(), expected.len());
    for (tag, want) in tags.iter().zip(expected) {
        assert_eq!(*tag, &Cell::Text(want.to_string()));
    }
}

#[test]
fn merged_columns_are_the_union_with_null_fill() {
    let root = data_root();
    let bundle = sample_bundle(root.path());
    let config = ProfileReaderConfig::default();

    let profile = resolve_profile(&bundle, "u001", &config).unwrap();
    let merged = &profile.merged;

    // The shared key column appears exactly once
    let key_count = merged
        .column_names()
        .iter()
        .filter(|name| name.as_str() == "USERID")
        .count();
    assert_eq!(key_count, 1);

    // Row 0 is the cohort row, which has no lab columns
    let vitamin_d = merged.column_index("Vitamin_D").unwrap();
    assert_eq!(merged.cell(0, vitamin_d), &Cell::Null);

    // And the lab rows have no wearable columns
    let hrv = merged.column_index("hrv").unwrap();
    assert_eq!(merged.cell(1, hrv), &Cell::Null);
    assert_eq!(merged.cell(3, hrv), &Cell::Number(24.0));
}

#[test]
fn unknown_subject_resolves_to_none() {
    let root = data_root();
    let bundle = sample_bundle(root.path());
    let config = ProfileReaderConfig::default();

    assert!(resolve_profile(&bundle, "ghost", &config).is_none());
}

#[test]
fn subject_absent_from_a_source_leaves_an_empty_slice() {
    let root = data_root();
    let bundle = sample_bundle(root.path());
    let config = ProfileReaderConfig::default();

    let profile = resolve_profile(&bundle, "u002", &config).expect("u002 resolves");

    assert_eq!(
        profile.source_row_counts(),
        vec![(DatasetRole::PilotCohort, 1), (DatasetRole::Labs, 1)]
    );
    // The wearables file loaded and is keyed, so the slice exists but is empty
    let wearables = profile.slices.get(DatasetRole::Wearables).unwrap();
    assert!(wearables.is_empty());
}

#[test]
fn sources_with_their_own_key_column_still_contribute() {
    let root = data_root();
    write_source(
        root.path(),
        "pilot_user_data.csv",
        &["USERID", "Name"],
        &[&["u001", "Alice"]],
    );
    // Keyed differently from the bundle-wide key, found by the heuristic
    write_source(
        root.path(),
        "microbiome_summary.csv",
        &["panel_user_identifier", "shannon_index"],
        &[&["u001", "3.1"], &["u777", "2.2"]],
    );

    let bundle = load_bundle(&SourceManifest::default_layout(root.path()));
    let config = ProfileReaderConfig::default();

    assert_eq!(bundle.subject_key(), Some("USERID"));
    let profile = resolve_profile(&bundle, "u001", &config).unwrap();
    let microbiome = profile.slices.get(DatasetRole::Microbiome).unwrap();
    assert_eq!(microbiome.num_rows(), 1);
}

#[test]
fn coerced_matching_bridges_numeric_identifiers() {
    let root = data_root();
    // An all-digit key column loads as numbers
    write_source(
        root.path(),
        "pilot_user_data.csv",
        &["USERID", "Name"],
        &[&["1001", "Alice"], &["1002", "Omar"]],
    );
    let bundle = load_bundle(&SourceManifest::default_layout(root.path()));

    let strict = ProfileReaderConfig::default();
    assert!(resolve_profile(&bundle, "1001", &strict).is_none());

    let coerced = ProfileReaderConfig {
        id_match: IdMatchPolicy::Coerced,
        ..ProfileReaderConfig::default()
    };
    let profile = resolve_profile(&bundle, "1001", &coerced).expect("coerced match");
    assert_eq!(profile.merged.num_rows(), 1);
}
