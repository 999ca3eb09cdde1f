//! Scoring of caller-proposed allocations.

use super::{
    Placement, ScenarioBuilder, ScenarioKind, UnassignedReason, UnassignedTask, WhatIfScenario,
};
use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::model::{validate_tasks, SkillProfile, Task};
use crate::score::{CohortStats, MatchScorer, Scorer};
use crate::workload::Roster;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A human-proposed pairing to be scored as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposedAssignment {
    pub task_id: String,
    pub developer_id: String,
}

/// Score a proposed allocation against the roster's committed workload.
///
/// Fails atomically on any unresolvable reference; weak pairings and
/// overloaded developers only produce warnings.
pub fn simulate(
    config: &EngineConfig,
    scenario_name: &str,
    tasks: &[Task],
    proposals: &[ProposedAssignment],
    roster: &Roster,
    cohort: &CohortStats,
) -> EngineResult<WhatIfScenario> {
    if scenario_name.trim().is_empty() {
        return Err(EngineError::invalid_input(
            "scenario_name",
            "must not be blank",
        ));
    }
    validate_tasks(tasks)?;

    let task_index: BTreeMap<&str, usize> = tasks
        .iter()
        .enumerate()
        .map(|(idx, t)| (t.id.as_str(), idx))
        .collect();

    let mut chosen: BTreeMap<usize, usize> = BTreeMap::new();
    for proposal in proposals {
        let Some(&t) = task_index.get(proposal.task_id.as_str()) else {
            return Err(EngineError::UnknownTask(proposal.task_id.clone()));
        };
        let Some(d) = roster.position(&proposal.developer_id) else {
            return Err(EngineError::UnknownDeveloper(proposal.developer_id.clone()));
        };
        if chosen.insert(t, d).is_some() {
            return Err(EngineError::DuplicateAssignment(proposal.task_id.clone()));
        }
    }

    let scorer = MatchScorer::new(config, cohort);
    let developers = roster.developers();
    let min_viable = config.assignment.min_viable_score;
    let mut placements = Vec::with_capacity(chosen.len());
    let mut weak = Vec::new();

    for (&t, &d) in &chosen {
        let task = &tasks[t];
        let dev = &developers[d];
        let profile = SkillProfile::new(&dev.fingerprint, config.skill_match.tool_proficiency);
        let load = roster.load_context(dev, &config.workload);
        let score = scorer.score(&task.signals, &profile, &load);
        if score.overall_score < min_viable {
            weak.push(format!(
                "{} -> {} scores {:.2}, below the minimum viable score of {:.1}",
                task.id, dev.id, score.overall_score, min_viable
            ));
        }
        placements.push(Placement {
            task: t,
            developer: d,
            score,
        });
    }

    let unassigned: Vec<UnassignedTask> = tasks
        .iter()
        .enumerate()
        .filter(|(idx, _)| !chosen.contains_key(idx))
        .map(|(_, t)| UnassignedTask {
            task_id: t.id.clone(),
            reason: UnassignedReason::NotProposed,
        })
        .collect();

    tracing::debug!(
        target: "skillmatch::whatif",
        scenario = scenario_name,
        proposals = proposals.len(),
        weak = weak.len(),
        "Simulated proposal"
    );

    let builder = weak.into_iter().fold(
        ScenarioBuilder::new(config, tasks, roster, scenario_name, ScenarioKind::Proposed),
        ScenarioBuilder::with_warning,
    );
    Ok(builder.build(placements, unassigned))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{SkillFingerprint, Trend};
    use crate::test_support::{developer, language, task};
    use crate::workload::WorkloadStatus;

    fn roster() -> Roster {
        Roster::new(
            vec![
                developer(
                    "ana",
                    SkillFingerprint {
                        languages: vec![language("rust", 85.0, 300, 30_000, Trend::Stable)],
                        ..Default::default()
                    },
                ),
                developer(
                    "bo",
                    SkillFingerprint {
                        languages: vec![language("go", 75.0, 200, 20_000, Trend::Growing)],
                        ..Default::default()
                    },
                ),
            ],
            vec![],
        )
        .unwrap()
    }

    fn proposal(task: &str, dev: &str) -> ProposedAssignment {
        ProposedAssignment {
            task_id: task.into(),
            developer_id: dev.into(),
        }
    }

    fn run(tasks: &[Task], proposals: &[ProposedAssignment]) -> EngineResult<WhatIfScenario> {
        let config = EngineConfig::default();
        let roster = roster();
        let cohort = CohortStats::from_roster(&roster, 50.0);
        simulate(&config, "manual", tasks, proposals, &roster, &cohort)
    }

    #[test]
    fn scores_proposal_and_reports_unproposed_tasks() {
        let tasks = vec![task("T1", &["rust"]), task("T2", &["go"]), task("T3", &["sql"])];
        let scenario = run(&tasks, &[proposal("T2", "bo"), proposal("T1", "ana")]).unwrap();

        assert_eq!(scenario.kind, ScenarioKind::Proposed);
        let ids: Vec<&str> = scenario.assignments.iter().map(|a| a.task_id.as_str()).collect();
        assert_eq!(ids, vec!["T1", "T2"]);
        assert_eq!(scenario.team_impact.unassigned[0].task_id, "T3");
        assert_eq!(
            scenario.team_impact.assigned_tasks + scenario.team_impact.unassigned_tasks,
            tasks.len()
        );
    }

    #[test]
    fn weak_pairs_warn_instead_of_failing() {
        let tasks = vec![task("T1", &["rust"])];
        let scenario = run(&tasks, &[proposal("T1", "bo")]).unwrap();
        assert!(scenario
            .team_impact
            .warnings
            .iter()
            .any(|w| w.starts_with("T1 -> bo scores")));
    }

    #[test]
    fn overload_warns_instead_of_failing() {
        let mut tasks = Vec::new();
        let mut proposals = Vec::new();
        for i in 0..6 {
            let id = format!("T{i}");
            tasks.push(task(&id, &["rust"]));
            proposals.push(proposal(&id, "ana"));
        }
        let scenario = run(&tasks, &proposals).unwrap();
        assert_eq!(scenario.workload_impacts[0].workload_status, WorkloadStatus::Over);
        assert!(scenario
            .team_impact
            .warnings
            .iter()
            .any(|w| w.contains("ana would be over capacity")));
    }

    #[test]
    fn rejects_unresolvable_references() {
        let tasks = vec![task("T1", &["rust"])];
        assert_eq!(
            run(&tasks, &[proposal("T9", "ana")]).unwrap_err(),
            EngineError::UnknownTask("T9".into())
        );
        assert_eq!(
            run(&tasks, &[proposal("T1", "zoe")]).unwrap_err(),
            EngineError::UnknownDeveloper("zoe".into())
        );
        assert_eq!(
            run(&tasks, &[proposal("T1", "ana"), proposal("T1", "bo")]).unwrap_err(),
            EngineError::DuplicateAssignment("T1".into())
        );
    }

    #[test]
    fn repeated_simulation_is_identical() {
        let tasks = vec![task("T1", &["rust", "go"]), task("T2", &["go"])];
        let proposals = [proposal("T1", "ana"), proposal("T2", "bo")];
        assert_eq!(run(&tasks, &proposals).unwrap(), run(&tasks, &proposals).unwrap());
    }
}
