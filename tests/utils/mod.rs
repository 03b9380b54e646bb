use std::fs;
use std::path::Path;

use profile_reader::{DatasetBundle, DatasetRole, SourceManifest, TableFormat, load_bundle};
use tempfile::TempDir;

/// Fresh root directory with the conventional `data/` subfolder
#[must_use]
pub fn data_root() -> TempDir {
    let dir = TempDir::new().expect("create temp dir");
    fs::create_dir(dir.path().join("data")).expect("create data dir");
    dir
}

/// Write a CSV file from a header and rows
pub fn write_csv(path: &Path, header: &[&str], rows: &[&[&str]]) {
    let mut writer = csv::Writer::from_path(path).expect("open csv for writing");
    writer.write_record(header).expect("write header");
    for row in rows {
        writer.write_record(*row).expect("write row");
    }
    writer.flush().expect("flush csv");
}

/// Write one of the conventional sources under `data/`
pub fn write_source(root: &Path, file: &str, header: &[&str], rows: &[&[&str]]) {
    write_csv(&root.join("data").join(file), header, rows);
}

/// Manifest over `root` with the catalog redirected to a CSV file
///
/// Most tests feed the catalog from CSV so fixture rows stay inline; the
/// checked-in workbook covers the spreadsheet path.
#[must_use]
pub fn csv_catalog_manifest(root: &Path) -> SourceManifest {
    SourceManifest::default_layout(root).with_source(
        DatasetRole::ReferenceCatalog,
        root.join("catalog.csv"),
        TableFormat::Csv,
    )
}

/// Copy the checked-in catalog workbook to `root/main.xlsx`
pub fn copy_catalog_workbook(root: &Path) {
    let fixture = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/main.xlsx");
    fs::copy(&fixture, root.join("main.xlsx")).expect("copy workbook fixture");
}

/// Write a small compound catalog at `root/catalog.csv`
pub fn write_catalog(root: &Path) {
    write_csv(
        &root.join("catalog.csv"),
        &["Name", "Indication"],
        &[
            &["BPC-157", "Recovery and gut repair"],
            &["DSIP", "Deep sleep support"],
            &["Semax", "Cognition and memory"],
            &["TB-500", "Tissue recovery"],
        ],
    );
}

/// Standard multi-source fixture with subjects `u001` and `u002`
///
/// `u001` appears in the cohort, labs, wearables and surveys; `u002` only
/// in the cohort and labs. Lab values for `u001` are chosen so the low
/// vitamin D, high CRP and low HRV rules all fire.
#[must_use]
pub fn sample_bundle(root: &Path) -> DatasetBundle {
    write_source(
        root,
        "pilot_user_data.csv",
        &["USERID", "Name", "Age"],
        &[&["u001", "Alice Hart", "34"], &["u002", "Omar Reyes", "41"]],
    );
    write_source(
        root,
        "structured_lab_results.csv",
        &["USERID", "test_date", "Vitamin_D", "CRP"],
        &[
            &["u001", "2024-01-05", "18.0", "1.2"],
            &["u001", "2024-03-10", "22.0", "4.0"],
            &["u002", "2024-03-10", "41.0", "0.8"],
        ],
    );
    write_source(
        root,
        "wearable_daily_aggregates.csv",
        &["USERID", "day", "hrv", "steps"],
        &[
            &["u001", "2024-03-01", "24", "8000"],
            &["u001", "2024-03-02", "28", "9500"],
        ],
    );
    write_source(
        root,
        "surveys_adherence_logs.csv",
        &["USERID", "primary_goal", "caffeine_response"],
        &[&["u001", "Better focus and memory", "OK"]],
    );
    write_catalog(root);

    load_bundle(&csv_catalog_manifest(root))
}
