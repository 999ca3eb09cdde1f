//! Single-task candidate ranking.

use crate::config::EngineConfig;
use crate::error::EngineResult;
use crate::model::{SkillProfile, TaskSignals};
use crate::score::{CohortStats, MatchScore, MatchScorer, Scorer};
use crate::workload::{Roster, WorkloadStatus};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// One ranked developer for a task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub developer_id: String,
    pub developer_name: String,
    pub match_score: MatchScore,
    /// 1-based position in the ranking.
    pub rank: usize,
    pub workload_status: WorkloadStatus,
}

/// Ranked candidates for one task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskMatchResult {
    pub task_signals: TaskSignals,
    pub candidates: Vec<Candidate>,
    pub recommendations: Vec<String>,
    pub warnings: Vec<String>,
}

/// Order by overall score desc, then growth desc, then developer id asc.
pub(crate) fn candidate_order(
    a_score: &MatchScore,
    a_id: &str,
    b_score: &MatchScore,
    b_id: &str,
) -> Ordering {
    b_score
        .overall_score
        .total_cmp(&a_score.overall_score)
        .then_with(|| {
            b_score
                .growth_opportunity
                .total_cmp(&a_score.growth_opportunity)
        })
        .then_with(|| a_id.cmp(b_id))
}

/// Rank every roster developer against one task's signals.
pub fn match_task(
    config: &EngineConfig,
    signals: TaskSignals,
    roster: &Roster,
    cohort: &CohortStats,
) -> EngineResult<TaskMatchResult> {
    signals.validate()?;

    let scorer = MatchScorer::new(config, cohort);
    let mut candidates: Vec<Candidate> = roster
        .developers()
        .iter()
        .map(|dev| {
            let profile = SkillProfile::new(&dev.fingerprint, config.skill_match.tool_proficiency);
            let load = roster.load_context(dev, &config.workload);
            Candidate {
                developer_id: dev.id.clone(),
                developer_name: dev.display_name().to_string(),
                match_score: scorer.score(&signals, &profile, &load),
                rank: 0,
                workload_status: load.status,
            }
        })
        .collect();

    candidates.sort_by(|a, b| {
        candidate_order(&a.match_score, &a.developer_id, &b.match_score, &b.developer_id)
    });
    for (idx, candidate) in candidates.iter_mut().enumerate() {
        candidate.rank = idx + 1;
    }

    let mut warnings = Vec::new();
    if roster.is_empty() {
        warnings.push("workspace has no developers to rank".to_string());
    }
    if signals.is_empty() {
        warnings.push("task signals name no skills; every candidate scores zero".to_string());
    }
    if signals.confidence.value() < config.skill_match.low_confidence {
        warnings.push(format!(
            "signal confidence {} is low; treat the ranking as tentative",
            signals.confidence
        ));
    }

    let recommendations = recommend(config, &candidates);

    tracing::debug!(
        target: "skillmatch::scorer",
        candidates = candidates.len(),
        top = candidates.first().map(|c| c.developer_id.as_str()).unwrap_or("-"),
        "Ranked candidates"
    );

    Ok(TaskMatchResult {
        task_signals: signals,
        candidates,
        recommendations,
        warnings,
    })
}

fn recommend(config: &EngineConfig, candidates: &[Candidate]) -> Vec<String> {
    let min_viable = config.assignment.min_viable_score;
    let viable: Vec<&Candidate> = candidates
        .iter()
        .filter(|c| c.match_score.overall_score >= min_viable)
        .collect();

    let Some(top) = viable.first() else {
        if !candidates.is_empty() {
            return vec![format!(
                "No candidate reaches the minimum viable score of {min_viable:.1}; consider pairing or training"
            )];
        }
        return Vec::new();
    };

    let mut out = vec![format!(
        "Assign to {} (score {:.2})",
        top.developer_name, top.match_score.overall_score
    )];

    if top.workload_status == WorkloadStatus::Over {
        if let Some(alt) = viable
            .iter()
            .find(|c| c.workload_status != WorkloadStatus::Over)
        {
            out.push(format!(
                "{} is over capacity; {} (score {:.2}) has room",
                top.developer_name, alt.developer_name, alt.match_score.overall_score
            ));
        }
    }

    if let Some(stretch) = viable
        .iter()
        .skip(1)
        .filter(|c| c.match_score.growth_opportunity >= config.growth.high_growth)
        .max_by(|a, b| {
            a.match_score
                .growth_opportunity
                .total_cmp(&b.match_score.growth_opportunity)
                .then_with(|| b.developer_id.cmp(&a.developer_id))
        })
    {
        out.push(format!(
            "For a developmental assignment, consider {} (growth {:.2})",
            stretch.developer_name, stretch.match_score.growth_opportunity
        ));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{SkillFingerprint, Trend};
    use crate::test_support::{developer, framework, language, signals};
    use crate::workload::WorkloadSnapshot;

    fn rank(signals: TaskSignals, roster: &Roster) -> TaskMatchResult {
        let config = EngineConfig::default();
        let cohort = CohortStats::from_roster(roster, config.skill_match.tool_proficiency);
        match_task(&config, signals, roster, &cohort).unwrap()
    }

    #[test]
    fn low_confidence_warning_follows_policy() {
        let roster = Roster::new(
            vec![developer(
                "a",
                SkillFingerprint {
                    languages: vec![language("rust", 70.0, 10, 1_000, Trend::Stable)],
                    ..Default::default()
                },
            )],
            vec![],
        )
        .unwrap();
        let tentative = |result: &TaskMatchResult| {
            result.warnings.iter().any(|w| w.contains("tentative"))
        };
        assert!(!tentative(&rank(signals(&["rust"], &[], 0.6), &roster)));

        let mut config = EngineConfig::default();
        config.skill_match.low_confidence = 0.7;
        let cohort = CohortStats::from_roster(&roster, config.skill_match.tool_proficiency);
        let strict = match_task(&config, signals(&["rust"], &[], 0.6), &roster, &cohort).unwrap();
        assert!(tentative(&strict));
        assert!(strict.candidates[0]
            .match_score
            .reasoning
            .contains("low signal confidence"));
    }

    #[test]
    fn covering_both_required_skills_outranks_one_strong_skill() {
        let a = developer(
            "a",
            SkillFingerprint {
                languages: vec![language("python", 90.0, 500, 50_000, Trend::Stable)],
                frameworks: vec![framework("django", 0.0, 0)],
                ..Default::default()
            },
        );
        let b = developer(
            "b",
            SkillFingerprint {
                languages: vec![language("python", 40.0, 100, 10_000, Trend::Stable)],
                frameworks: vec![framework("django", 80.0, 40)],
                ..Default::default()
            },
        );
        let roster = Roster::new(vec![a, b], vec![]).unwrap();
        let result = rank(signals(&["python", "django"], &[], 0.9), &roster);

        let order: Vec<&str> = result
            .candidates
            .iter()
            .map(|c| c.developer_id.as_str())
            .collect();
        assert_eq!(order, vec!["b", "a"]);
        assert_eq!(result.candidates[0].rank, 1);
        assert_eq!(result.candidates[0].match_score.overall_score, 48.75);
        assert_eq!(result.recommendations[0], "Assign to B (score 48.75)");
    }

    #[test]
    fn ties_break_by_developer_id() {
        let fp = SkillFingerprint {
            languages: vec![language("go", 60.0, 10, 100, Trend::Stable)],
            ..Default::default()
        };
        let roster = Roster::new(
            vec![developer("zed", fp.clone()), developer("amy", fp)],
            vec![],
        )
        .unwrap();
        let result = rank(signals(&["go"], &[], 1.0), &roster);
        assert_eq!(result.candidates[0].developer_id, "amy");
        assert_eq!(result.candidates[1].developer_id, "zed");
    }

    #[test]
    fn warns_on_empty_signals_and_low_confidence() {
        let roster = Roster::new(
            vec![developer(
                "a",
                SkillFingerprint {
                    languages: vec![language("go", 60.0, 10, 100, Trend::Stable)],
                    ..Default::default()
                },
            )],
            vec![],
        )
        .unwrap();
        let result = rank(signals(&[], &[], 0.2), &roster);
        assert_eq!(result.warnings.len(), 2);
        assert_eq!(result.candidates[0].match_score.overall_score, 0.0);
        assert!(result.recommendations[0].starts_with("No candidate reaches"));
    }

    #[test]
    fn over_capacity_top_candidate_suggests_alternative() {
        let strong = SkillFingerprint {
            languages: vec![language("rust", 95.0, 900, 90_000, Trend::Stable)],
            ..Default::default()
        };
        let decent = SkillFingerprint {
            languages: vec![language("rust", 70.0, 100, 10_000, Trend::Stable)],
            ..Default::default()
        };
        let roster = Roster::new(
            vec![developer("a", strong), developer("b", decent)],
            vec![WorkloadSnapshot {
                developer_id: "a".into(),
                current_tasks: 8,
                current_estimated_hours: 60.0,
            }],
        )
        .unwrap();
        let result = rank(signals(&["rust"], &[], 1.0), &roster);
        assert_eq!(result.candidates[0].developer_id, "a");
        assert_eq!(result.candidates[0].workload_status, WorkloadStatus::Over);
        assert!(result.recommendations[1].contains("B (score"));
    }

    #[test]
    fn rejects_blank_skill_names() {
        let roster = Roster::default();
        let config = EngineConfig::default();
        let cohort = CohortStats::default();
        let mut bad = signals(&["rust"], &[], 1.0);
        bad.required_skills.push("   ".into());
        assert!(match_task(&config, bad, &roster, &cohort).is_err());
    }
}
