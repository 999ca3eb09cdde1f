//! Classifier-derived task requirements.

use crate::error::{EngineError, EngineResult};
use crate::types::{normalize_skill, Confidence};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Estimated complexity of a task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Complexity {
    Low,
    #[default]
    Medium,
    High,
    #[serde(alias = "critical")]
    VeryHigh,
    #[serde(other)]
    Unknown,
}

impl Complexity {
    /// Hours implied by complexity alone, `None` when unknown.
    pub fn default_hours(&self) -> Option<f64> {
        match self {
            Self::Low => Some(4.0),
            Self::Medium => Some(8.0),
            Self::High => Some(16.0),
            Self::VeryHigh => Some(24.0),
            Self::Unknown => None,
        }
    }
}

/// Structured requirements of one task version.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskSignals {
    #[serde(default)]
    pub required_skills: Vec<String>,
    #[serde(default)]
    pub preferred_skills: Vec<String>,
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default)]
    pub complexity: Complexity,
    #[serde(default)]
    pub estimated_effort: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Trust weight of the extraction.
    #[serde(default)]
    pub confidence: Confidence,
}

impl TaskSignals {
    /// Normalized required skills.
    pub fn required(&self) -> BTreeSet<String> {
        self.required_skills
            .iter()
            .filter_map(|s| normalize_skill(s))
            .collect()
    }

    /// Normalized preferred skills, excluding anything already required.
    pub fn preferred(&self) -> BTreeSet<String> {
        let required = self.required();
        self.preferred_skills
            .iter()
            .filter_map(|s| normalize_skill(s))
            .filter(|s| !required.contains(s))
            .collect()
    }

    /// Every skill the task exercises.
    pub fn all_skills(&self) -> BTreeSet<String> {
        let mut all = self.required();
        all.extend(self.preferred());
        all
    }

    pub fn normalized_domain(&self) -> Option<String> {
        self.domain.as_deref().and_then(normalize_skill)
    }

    /// True when the signals name no skills at all.
    pub fn is_empty(&self) -> bool {
        self.all_skills().is_empty()
    }

    /// Reject blank skill names; they indicate a malformed classifier result.
    pub fn validate(&self) -> EngineResult<()> {
        for (field, skills) in [
            ("required_skills", &self.required_skills),
            ("preferred_skills", &self.preferred_skills),
        ] {
            if skills.iter().any(|s| normalize_skill(s).is_none()) {
                return Err(EngineError::invalid_input(
                    field,
                    "skill names must not be blank",
                ));
            }
        }
        if let Some(domain) = &self.domain {
            if normalize_skill(domain).is_none() {
                return Err(EngineError::invalid_input(
                    "domain",
                    "must not be blank when present",
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preferred_excludes_required_duplicates() {
        let signals = TaskSignals {
            required_skills: vec!["Rust".into(), "rust".into()],
            preferred_skills: vec!["RUST".into(), "Tokio".into()],
            ..Default::default()
        };
        assert_eq!(signals.required().len(), 1);
        assert_eq!(
            signals.preferred().into_iter().collect::<Vec<_>>(),
            vec!["tokio"]
        );
        assert_eq!(signals.all_skills().len(), 2);
    }

    #[test]
    fn complexity_aliases_and_unknown_values() {
        let critical: Complexity = serde_json::from_str("\"critical\"").unwrap();
        assert_eq!(critical, Complexity::VeryHigh);
        let odd: Complexity = serde_json::from_str("\"epic\"").unwrap();
        assert_eq!(odd, Complexity::Unknown);
        assert_eq!(odd.default_hours(), None);
    }

    #[test]
    fn defaults_to_full_confidence() {
        let signals: TaskSignals = serde_json::from_str(r#"{"required_skills": ["go"]}"#).unwrap();
        assert_eq!(signals.confidence.value(), 1.0);
        assert_eq!(signals.complexity, Complexity::Medium);
    }

    #[test]
    fn rejects_blank_skill_names() {
        let signals = TaskSignals {
            required_skills: vec![" ".into()],
            ..Default::default()
        };
        assert!(signals.validate().is_err());
    }

    #[test]
    fn rejects_out_of_range_confidence_on_deserialize() {
        let parsed: Result<TaskSignals, _> = serde_json::from_str(r#"{"confidence": 3.0}"#);
        assert!(parsed.is_err());
    }
}
