//! Fixture builders for unit tests in this crate.

use crate::model::{
    Developer, FrameworkSkill, LanguageSkill, SkillFingerprint, Task, TaskSignals, Trend,
};
use crate::Confidence;

pub(crate) fn language(
    name: &str,
    proficiency: f64,
    commits: u64,
    lines: u64,
    trend: Trend,
) -> LanguageSkill {
    LanguageSkill {
        name: name.into(),
        proficiency,
        lines_of_code: lines,
        commits_count: commits,
        trend,
    }
}

pub(crate) fn framework(name: &str, proficiency: f64, usage: u64) -> FrameworkSkill {
    FrameworkSkill {
        name: name.into(),
        category: "framework".into(),
        proficiency,
        usage_count: usage,
    }
}

pub(crate) fn signals(required: &[&str], preferred: &[&str], confidence: f64) -> TaskSignals {
    TaskSignals {
        required_skills: required.iter().map(|s| s.to_string()).collect(),
        preferred_skills: preferred.iter().map(|s| s.to_string()).collect(),
        confidence: Confidence::new(confidence).expect("test confidence in range"),
        ..Default::default()
    }
}

/// Developer named after its upper-cased id, at the default capacity.
pub(crate) fn developer(id: &str, fingerprint: SkillFingerprint) -> Developer {
    Developer {
        id: id.into(),
        name: id.to_uppercase(),
        fingerprint,
        capacity_hours: None,
    }
}

/// Medium-complexity (8h) task requiring `required`.
pub(crate) fn task(id: &str, required: &[&str]) -> Task {
    Task {
        id: id.into(),
        title: format!("task {id}"),
        signals: signals(required, &[], 1.0),
        priority: None,
    }
}
