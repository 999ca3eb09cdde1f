//! Task x developer fit scoring.

mod cohort;
mod explainer;
mod scorer;

pub use cohort::CohortStats;
pub use scorer::{MatchScorer, Scorer};

use serde::{Deserialize, Serialize};

/// Fit between one task and one developer.
///
/// Derived and never persisted; identical inputs always produce an
/// identical score.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchScore {
    /// Weighted combination of the three sub-scores (0 - 100).
    pub overall_score: f64,
    /// Proficiency-weighted overlap with the task's skills (0 - 100).
    pub skill_match: f64,
    /// Cohort-normalized volume and trend on the task's skills (0 - 100).
    pub experience_match: f64,
    /// How much the task would stretch the developer (0 - 100).
    pub growth_opportunity: f64,
    /// Human-readable summary.
    pub reasoning: String,
    pub strengths: Vec<String>,
    pub gaps: Vec<String>,
}

impl MatchScore {
    /// A zero score carrying the reason it could not be computed.
    pub fn zero(reason: impl Into<String>) -> Self {
        let reason = reason.into();
        Self {
            reasoning: format!("No match: {reason}"),
            gaps: vec![reason],
            ..Default::default()
        }
    }
}
