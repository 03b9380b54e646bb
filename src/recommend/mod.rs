//! Recommendation engines and their dispatch.
//!
//! Reports come from one of three engines: `no_data` when the subject
//! matched nothing, a generative backend when one is supplied and succeeds,
//! and the rule-based heuristics otherwise. A backend failure falls back to
//! the rules instead of surfacing an error.

pub mod context;
pub mod rules;

pub use context::GenerationRequest;
pub use rules::{Recommendations, rule_based};

use log::{info, warn};
use serde::Serialize;

use crate::bundle::DatasetBundle;
use crate::config::ProfileReaderConfig;
use crate::resolve::resolve_profile;
use crate::signals::SignalMap;

/// A pluggable text-generating recommendation engine
///
/// Implementations own their transport and prompting; the pipeline only
/// supplies the bounded [`GenerationRequest`] context and treats any error
/// as a signal to fall back.
pub trait GenerativeBackend {
    /// Human-readable backend name for logs
    fn name(&self) -> &str {
        "generative"
    }

    /// Produce recommendation text from the request context
    fn generate(&self, request: &GenerationRequest) -> anyhow::Result<String>;
}

/// Outcome of a recommendation run
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "engine", rename_all = "snake_case")]
pub enum RecommendationReport {
    /// The subject matched no source at all
    NoData {
        /// Always empty; kept so every engine reports the same shape
        profile_signals: SignalMap,
        /// Human-readable explanation
        message: String,
    },
    /// Heuristic recommendations derived from the extracted signals
    RuleBased {
        /// Signals the rules were evaluated over
        profile_signals: SignalMap,
        /// Grouped suggestions
        recommendations: Recommendations,
    },
    /// Free-text recommendations from a generative backend
    Generative {
        /// Signals the context was built from
        profile_signals: SignalMap,
        /// Backend output, verbatim
        recommendations_text: String,
    },
}

/// Resolve a subject and build its recommendation report
///
/// The subject is resolved first; when no source holds rows for the
/// identifier the report short-circuits to `no_data` and no engine runs.
#[must_use]
pub fn build_report(
    bundle: &DatasetBundle,
    subject_id: &str,
    config: &ProfileReaderConfig,
    backend: Option<&dyn GenerativeBackend>,
) -> RecommendationReport {
    let Some(profile) = resolve_profile(bundle, subject_id, config) else {
        info!("Subject {subject_id} not found in any source, skipping engines");
        return RecommendationReport::NoData {
            profile_signals: SignalMap::new(),
            message: format!("User {subject_id} not found in any data source."),
        };
    };

    if let Some(backend) = backend {
        let request = GenerationRequest::from_profile(&profile, bundle.catalog());
        match backend.generate(&request) {
            Ok(text) => {
                info!("Recommendations generated by backend '{}'", backend.name());
                return RecommendationReport::Generative {
                    profile_signals: profile.signals,
                    recommendations_text: text,
                };
            }
            Err(e) => {
                warn!(
                    "Backend '{}' failed, falling back to rules: {e:#}",
                    backend.name()
                );
            }
        }
    }

    let recommendations = rules::rule_based(&profile.signals, bundle.catalog());
    RecommendationReport::RuleBased {
        profile_signals: profile.signals,
        recommendations,
    }
}
