//! Dataset roles and the loaded bundle they are assembled into.
//!
//! Every source file plays one fixed role in the pipeline. A load pass
//! produces a [`DatasetBundle`]: one optional [`Table`] per role plus a
//! per-role [`SourceStatus`] describing how the slot was filled. The bundle
//! is immutable once built and holds no interior mutability, so it can be
//! shared across threads behind an `Arc`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::table::Table;

/// Role a source table plays in the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatasetRole {
    /// Compound reference catalog, not keyed by subject
    ReferenceCatalog,
    /// Pilot cohort enrollment records
    PilotCohort,
    /// Laboratory panel results
    Labs,
    /// Wearable device time series
    Wearables,
    /// Gut microbiome panels
    Microbiome,
    /// Metabolomics panels
    Metabolomics,
    /// Genomic variant annotations
    Genomics,
    /// Current medication and compound intake
    Medications,
    /// Intake survey answers
    Surveys,
}

impl DatasetRole {
    /// Every role, in load order
    pub const ALL: [DatasetRole; 9] = [
        DatasetRole::ReferenceCatalog,
        DatasetRole::PilotCohort,
        DatasetRole::Labs,
        DatasetRole::Wearables,
        DatasetRole::Microbiome,
        DatasetRole::Metabolomics,
        DatasetRole::Genomics,
        DatasetRole::Medications,
        DatasetRole::Surveys,
    ];

    /// Subject-keyed roles, in the fixed order key deduction, slicing and
    /// merging iterate them
    pub const SUBJECT_ROLES: [DatasetRole; 8] = [
        DatasetRole::PilotCohort,
        DatasetRole::Labs,
        DatasetRole::Wearables,
        DatasetRole::Microbiome,
        DatasetRole::Metabolomics,
        DatasetRole::Genomics,
        DatasetRole::Medications,
        DatasetRole::Surveys,
    ];

    /// Convert `DatasetRole` to static string
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            DatasetRole::ReferenceCatalog => "reference_catalog",
            DatasetRole::PilotCohort => "pilot_cohort",
            DatasetRole::Labs => "labs",
            DatasetRole::Wearables => "wearables",
            DatasetRole::Microbiome => "microbiome",
            DatasetRole::Metabolomics => "metabolomics",
            DatasetRole::Genomics => "genomics",
            DatasetRole::Medications => "medications",
            DatasetRole::Surveys => "surveys",
        }
    }
}

impl fmt::Display for DatasetRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a bundle slot was filled during loading
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceStatus {
    /// Source parsed into a table
    Loaded {
        /// Data rows in the table
        rows: usize,
        /// Columns in the table
        columns: usize,
    },
    /// Source file absent on disk
    Missing,
    /// Source present but unreadable; the slot stays empty
    Failed {
        /// Human-readable load error
        reason: String,
    },
}

impl fmt::Display for SourceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceStatus::Loaded { rows, columns } => {
                write!(f, "loaded ({rows} rows, {columns} columns)")
            }
            SourceStatus::Missing => f.write_str("missing"),
            SourceStatus::Failed { reason } => write!(f, "failed: {reason}"),
        }
    }
}

/// All loaded sources plus the bundle-wide subject key
///
/// Slots for sources that were missing or failed to parse are `None`; the
/// pipeline degrades instead of aborting, so a bundle always exists even
/// when every slot is empty.
#[derive(Debug, Clone)]
pub struct DatasetBundle {
    pub(crate) catalog: Option<Table>,
    pub(crate) pilot_cohort: Option<Table>,
    pub(crate) labs: Option<Table>,
    pub(crate) wearables: Option<Table>,
    pub(crate) microbiome: Option<Table>,
    pub(crate) metabolomics: Option<Table>,
    pub(crate) genomics: Option<Table>,
    pub(crate) medications: Option<Table>,
    pub(crate) surveys: Option<Table>,
    /// Subject key column deduced from the first keyed subject table
    pub(crate) subject_key: Option<String>,
    /// Per-role load outcome, in [`DatasetRole::ALL`] order
    pub(crate) statuses: Vec<(DatasetRole, SourceStatus)>,
}

impl DatasetBundle {
    /// Table loaded for a role, if its slot was filled
    #[must_use]
    pub fn table(&self, role: DatasetRole) -> Option<&Table> {
        match role {
            DatasetRole::ReferenceCatalog => self.catalog.as_ref(),
            DatasetRole::PilotCohort => self.pilot_cohort.as_ref(),
            DatasetRole::Labs => self.labs.as_ref(),
            DatasetRole::Wearables => self.wearables.as_ref(),
            DatasetRole::Microbiome => self.microbiome.as_ref(),
            DatasetRole::Metabolomics => self.metabolomics.as_ref(),
            DatasetRole::Genomics => self.genomics.as_ref(),
            DatasetRole::Medications => self.medications.as_ref(),
            DatasetRole::Surveys => self.surveys.as_ref(),
        }
    }

    pub(crate) fn slot_mut(&mut self, role: DatasetRole) -> &mut Option<Table> {
        match role {
            DatasetRole::ReferenceCatalog => &mut self.catalog,
            DatasetRole::PilotCohort => &mut self.pilot_cohort,
            DatasetRole::Labs => &mut self.labs,
            DatasetRole::Wearables => &mut self.wearables,
            DatasetRole::Microbiome => &mut self.microbiome,
            DatasetRole::Metabolomics => &mut self.metabolomics,
            DatasetRole::Genomics => &mut self.genomics,
            DatasetRole::Medications => &mut self.medications,
            DatasetRole::Surveys => &mut self.surveys,
        }
    }

    /// The reference catalog table, if loaded
    #[must_use]
    pub fn catalog(&self) -> Option<&Table> {
        self.catalog.as_ref()
    }

    /// Bundle-wide subject key column name, if any subject table had one
    #[must_use]
    pub fn subject_key(&self) -> Option<&str> {
        self.subject_key.as_deref()
    }

    /// Per-role load outcomes, in [`DatasetRole::ALL`] order
    #[must_use]
    pub fn statuses(&self) -> &[(DatasetRole, SourceStatus)] {
        &self.statuses
    }

    /// Iterate the subject-keyed tables that loaded, in fixed role order
    pub fn subject_tables(&self) -> impl Iterator<Item = (DatasetRole, &Table)> {
        DatasetRole::SUBJECT_ROLES
            .iter()
            .filter_map(|&role| self.table(role).map(|table| (role, table)))
    }
}

/// Per-subject row slices, one slot per subject-keyed role
///
/// A slot is `None` when the source was absent or no key column could be
/// determined for it, and an empty table when the source was keyed but held
/// no rows for the subject.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceSlices {
    pub pilot_cohort: Option<Table>,
    pub labs: Option<Table>,
    pub wearables: Option<Table>,
    pub microbiome: Option<Table>,
    pub metabolomics: Option<Table>,
    pub genomics: Option<Table>,
    pub medications: Option<Table>,
    pub surveys: Option<Table>,
}

impl SourceSlices {
    /// Slice for a role; the catalog role never has one
    #[must_use]
    pub fn get(&self, role: DatasetRole) -> Option<&Table> {
        match role {
            DatasetRole::ReferenceCatalog => None,
            DatasetRole::PilotCohort => self.pilot_cohort.as_ref(),
            DatasetRole::Labs => self.labs.as_ref(),
            DatasetRole::Wearables => self.wearables.as_ref(),
            DatasetRole::Microbiome => self.microbiome.as_ref(),
            DatasetRole::Metabolomics => self.metabolomics.as_ref(),
            DatasetRole::Genomics => self.genomics.as_ref(),
            DatasetRole::Medications => self.medications.as_ref(),
            DatasetRole::Surveys => self.surveys.as_ref(),
        }
    }

    pub(crate) fn set(&mut self, role: DatasetRole, slice: Table) {
        match role {
            DatasetRole::ReferenceCatalog => {}
            DatasetRole::PilotCohort => self.pilot_cohort = Some(slice),
            DatasetRole::Labs => self.labs = Some(slice),
            DatasetRole::Wearables => self.wearables = Some(slice),
            DatasetRole::Microbiome => self.microbiome = Some(slice),
            DatasetRole::Metabolomics => self.metabolomics = Some(slice),
            DatasetRole::Genomics => self.genomics = Some(slice),
            DatasetRole::Medications => self.medications = Some(slice),
            DatasetRole::Surveys => self.surveys = Some(slice),
        }
    }

    /// Iterate all subject-keyed slots in fixed role order
    pub fn iter(&self) -> impl Iterator<Item = (DatasetRole, Option<&Table>)> {
        DatasetRole::SUBJECT_ROLES
            .iter()
            .map(|&role| (role, self.get(role)))
    }

    /// Slices that are present and hold at least one row, in fixed role order
    pub fn contributing(&self) -> impl Iterator<Item = (DatasetRole, &Table)> {
        self.iter()
            .filter_map(|(role, slice)| slice.filter(|t| !t.is_empty()).map(|t| (role, t)))
    }
}
