//! Configuration for loading and resolving profile data.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::bundle::DatasetRole;

/// How subject identifiers are compared against key column cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdMatchPolicy {
    /// Exact equality on textual cells only; a numeric key column never
    /// matches a textual identifier
    #[default]
    Strict,
    /// Additionally match when both sides parse as the same number, so
    /// identifiers like `1001` match whether the column loaded as text
    /// or as numbers
    Coerced,
}

/// Configuration for the profile reader
#[derive(Debug, Clone)]
pub struct ProfileReaderConfig {
    /// Identifier comparison policy used when slicing subject rows
    pub id_match: IdMatchPolicy,
    /// Date format strings to try, in order, when interpreting cells as dates
    pub date_formats: Vec<String>,
}

impl Default for ProfileReaderConfig {
    fn default() -> Self {
        Self {
            id_match: IdMatchPolicy::default(),
            date_formats: vec![
                "%Y-%m-%d".to_string(), // ISO format: 2023-01-15
                "%d-%m-%Y".to_string(), // European: 15-01-2023
                "%m/%d/%Y".to_string(), // US: 01/15/2023
                "%d/%m/%Y".to_string(), // UK: 15/01/2023
                "%d.%m.%Y".to_string(), // German/Danish: 15.01.2023
                "%Y%m%d".to_string(),   // Compact: 20230115
            ],
        }
    }
}

/// On-disk format of a source file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableFormat {
    /// Comma-separated values with a header row
    Csv,
    /// Excel workbook; the first sheet is read
    Xlsx,
}

/// One source file and the role it fills
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceSpec {
    /// Role the table plays in the bundle
    pub role: DatasetRole,
    /// Path of the source file
    pub path: PathBuf,
    /// How the file is parsed
    pub format: TableFormat,
}

/// Declares which file fills each dataset role
///
/// Roles without an entry are left as empty bundle slots. The conventional
/// layout under a data directory is available via [`SourceManifest::default_layout`]
/// and individual entries can be overridden with [`SourceManifest::with_source`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceManifest {
    /// Source entries, at most one per role
    pub sources: Vec<SourceSpec>,
}

impl SourceManifest {
    /// The conventional file layout under `root`
    ///
    /// The reference catalog is the workbook `main.xlsx` at the root and
    /// every subject source is a CSV under `data/`.
    #[must_use]
    pub fn default_layout(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        let csv = |role: DatasetRole, file: &str| SourceSpec {
            role,
            path: root.join("data").join(file),
            format: TableFormat::Csv,
        };

        Self {
            sources: vec![
                SourceSpec {
                    role: DatasetRole::ReferenceCatalog,
                    path: root.join("main.xlsx"),
                    format: TableFormat::Xlsx,
                },
                csv(DatasetRole::PilotCohort, "pilot_user_data.csv"),
                csv(DatasetRole::Labs, "structured_lab_results.csv"),
                csv(DatasetRole::Wearables, "wearable_daily_aggregates.csv"),
                csv(DatasetRole::Microbiome, "microbiome_summary.csv"),
                csv(DatasetRole::Metabolomics, "metabolomics_summary.csv"),
                csv(DatasetRole::Genomics, "genomic_summary.csv"),
                csv(DatasetRole::Medications, "medication_history.csv"),
                csv(DatasetRole::Surveys, "surveys_adherence_logs.csv"),
            ],
        }
    }

    /// Entry for a role, if the manifest declares one
    #[must_use]
    pub fn get(&self, role: DatasetRole) -> Option<&SourceSpec> {
        self.sources.iter().find(|spec| spec.role == role)
    }

    /// Replace or add the entry for a role
    #[must_use]
    pub fn with_source(mut self, role: DatasetRole, path: impl Into<PathBuf>, format: TableFormat) -> Self {
        self.sources.retain(|spec| spec.role != role);
        self.sources.push(SourceSpec {
            role,
            path: path.into(),
            format,
        });
        self
    }
}
