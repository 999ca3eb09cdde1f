//! Team-wide skill coverage and bus-factor analysis.

use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::model::SkillProfile;
use crate::types::{mean, normalize_skill, round2};
use crate::workload::Roster;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoverageStatus {
    /// Nobody on the team is an expert.
    Gap,
    /// Experts exist but too few to survive someone leaving.
    AtRisk,
    WellCovered,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillCoverage {
    pub skill: String,
    pub average_score: f64,
    /// Developer ids at or above the expert threshold.
    pub experts: Vec<String>,
    pub practitioners: usize,
    pub bus_factor: usize,
    pub status: CoverageStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamSkillGaps {
    pub team_size: usize,
    pub skills: Vec<SkillCoverage>,
    pub gaps: Vec<String>,
    pub at_risk: Vec<String>,
    pub well_covered: Vec<String>,
    pub recommendations: Vec<String>,
}

/// Classify coverage of each target skill across the whole roster.
///
/// Target skills keep their first-seen order after normalization.
pub fn team_skill_gaps(
    config: &EngineConfig,
    target_skills: &[String],
    roster: &Roster,
) -> EngineResult<TeamSkillGaps> {
    if target_skills.is_empty() {
        return Err(EngineError::invalid_input(
            "target_skills",
            "at least one skill is required",
        ));
    }
    let mut seen = BTreeSet::new();
    let mut targets = Vec::new();
    for raw in target_skills {
        let skill = normalize_skill(raw).ok_or_else(|| {
            EngineError::invalid_input("target_skills", "skill names must not be blank")
        })?;
        if seen.insert(skill.clone()) {
            targets.push(skill);
        }
    }

    let policy = &config.benchmark;
    let profiles: Vec<(&str, SkillProfile)> = roster
        .developers()
        .iter()
        .map(|d| {
            (
                d.id.as_str(),
                SkillProfile::new(&d.fingerprint, config.skill_match.tool_proficiency),
            )
        })
        .collect();

    let mut result = TeamSkillGaps {
        team_size: roster.len(),
        skills: Vec::with_capacity(targets.len()),
        gaps: Vec::new(),
        at_risk: Vec::new(),
        well_covered: Vec::new(),
        recommendations: Vec::new(),
    };

    for skill in targets {
        let scores: Vec<(&str, f64)> = profiles
            .iter()
            .map(|(id, p)| (*id, p.proficiency(&skill)))
            .collect();
        let experts: Vec<String> = scores
            .iter()
            .filter(|(_, s)| *s >= policy.expert_threshold)
            .map(|(id, _)| id.to_string())
            .collect();
        let practitioners = scores
            .iter()
            .filter(|(_, s)| *s >= policy.practitioner_threshold)
            .count();
        let values: Vec<f64> = scores.iter().map(|(_, s)| *s).collect();

        let status = if experts.is_empty() {
            CoverageStatus::Gap
        } else if experts.len() < policy.min_experts {
            CoverageStatus::AtRisk
        } else {
            CoverageStatus::WellCovered
        };

        match status {
            CoverageStatus::Gap => {
                result.recommendations.push(if practitioners > 0 {
                    format!("Grow one of {practitioners} {skill} practitioner(s) into an expert")
                } else {
                    format!("Hire or train for {skill}: nobody on the team practices it")
                });
                result.gaps.push(skill.clone());
            }
            CoverageStatus::AtRisk => {
                result.recommendations.push(format!(
                    "Spread {skill} knowledge beyond {}: bus factor is {}",
                    experts.join(", "),
                    experts.len()
                ));
                result.at_risk.push(skill.clone());
            }
            CoverageStatus::WellCovered => result.well_covered.push(skill.clone()),
        }

        result.skills.push(SkillCoverage {
            average_score: round2(mean(&values)),
            bus_factor: experts.len(),
            experts,
            practitioners,
            status,
            skill,
        });
    }

    tracing::debug!(
        target: "skillmatch::benchmark",
        skills = result.skills.len(),
        gaps = result.gaps.len(),
        at_risk = result.at_risk.len(),
        "Analyzed team skill gaps"
    );

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{SkillFingerprint, Trend};
    use crate::test_support::{developer, framework, language};

    fn roster() -> Roster {
        Roster::new(
            vec![
                developer(
                    "a",
                    SkillFingerprint {
                        languages: vec![language("rust", 90.0, 1, 1, Trend::Stable)],
                        frameworks: vec![framework("react", 75.0, 3)],
                        ..Default::default()
                    },
                ),
                developer(
                    "b",
                    SkillFingerprint {
                        languages: vec![language("rust", 80.0, 1, 1, Trend::Stable)],
                        frameworks: vec![framework("react", 45.0, 3)],
                        ..Default::default()
                    },
                ),
            ],
            vec![],
        )
        .unwrap()
    }

    fn skills(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn classifies_gap_at_risk_and_covered() {
        let result = team_skill_gaps(
            &EngineConfig::default(),
            &skills(&["Rust", "react", "kafka", "rust"]),
            &roster(),
        )
        .unwrap();

        assert_eq!(result.skills.len(), 3);
        assert_eq!(result.well_covered, vec!["rust".to_string()]);
        assert_eq!(result.at_risk, vec!["react".to_string()]);
        assert_eq!(result.gaps, vec!["kafka".to_string()]);

        let react = &result.skills[1];
        assert_eq!(react.experts, vec!["a".to_string()]);
        assert_eq!(react.practitioners, 2);
        assert_eq!(react.bus_factor, 1);
        assert_eq!(react.average_score, 60.0);
        assert!(result.recommendations[0].contains("bus factor is 1"));
        assert!(result.recommendations[1].starts_with("Hire or train for kafka"));
    }

    #[test]
    fn empty_target_list_is_invalid() {
        assert!(matches!(
            team_skill_gaps(&EngineConfig::default(), &[], &roster()),
            Err(EngineError::InvalidInput { .. })
        ));
    }
}
