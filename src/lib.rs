//! A Rust library for resolving one subject across heterogeneous tabular
//! datasets, merging the matched records, and reducing them to normalized
//! signals and recommendations.

pub mod bundle;
pub mod config;
pub mod error;
pub mod key;
pub mod loader;
pub mod recommend;
pub mod resolve;
pub mod signals;
pub mod table;

// Re-export the most common types for easier use
// Core types
pub use bundle::{DatasetBundle, DatasetRole, SourceSlices, SourceStatus};
pub use config::{IdMatchPolicy, ProfileReaderConfig, SourceManifest, SourceSpec, TableFormat};
pub use error::{ProfileReaderError, Result};
pub use table::{Cell, Table};

// Loading and resolution
pub use key::{SUBJECT_KEY_ALIASES, infer_key};
pub use loader::{load_bundle, read_table};
pub use resolve::{SOURCE_COLUMN, SubjectProfile, merge_slices, resolve_profile, slice_sources};

// Signal extraction
pub use signals::{SignalMap, SignalValue, extract_signals};

// Recommendation engines
pub use recommend::{
    GenerationRequest, GenerativeBackend, RecommendationReport, Recommendations, build_report,
};
