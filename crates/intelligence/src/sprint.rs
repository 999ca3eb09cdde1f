//! Sprint capacity, suggestions, and completion prediction.

use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::model::{validate_tasks, Developer, Task};
use crate::optimize;
use crate::score::CohortStats;
use crate::types::round2;
use crate::whatif::WhatIfScenario;
use crate::workload::{Roster, WorkloadStatus};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Tasks and participants for one sprint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SprintPlan {
    pub sprint_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub tasks: Vec<Task>,
    /// Participants; every roster developer when absent.
    #[serde(default)]
    pub developer_ids: Option<Vec<String>>,
    /// Per-developer capacity for this sprint, overriding the roster.
    #[serde(default)]
    pub capacity_overrides: BTreeMap<String, f64>,
    /// Passed through to the optimizer for suggestions.
    #[serde(default)]
    pub max_per_developer: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeveloperCapacity {
    pub developer_id: String,
    pub developer_name: String,
    pub capacity_hours: f64,
    pub committed_hours: f64,
    pub available_hours: f64,
    pub workload_status: WorkloadStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SprintCapacity {
    pub sprint_id: String,
    pub developers: Vec<DeveloperCapacity>,
    pub total_capacity_hours: f64,
    pub total_committed_hours: f64,
    pub total_available_hours: f64,
    pub planned_hours: f64,
    /// Committed plus planned hours as a percentage of total capacity.
    pub projected_utilization: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SprintOutlook {
    OnTrack,
    AtRisk,
    OffTrack,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SprintPrediction {
    pub sprint_id: String,
    pub planned_hours: f64,
    pub available_hours: f64,
    pub completion_ratio: f64,
    pub predicted_completed: Vec<String>,
    pub at_risk: Vec<String>,
    pub outlook: SprintOutlook,
    pub warnings: Vec<String>,
}

impl SprintPlan {
    fn validate(&self) -> EngineResult<()> {
        if self.sprint_id.trim().is_empty() {
            return Err(EngineError::invalid_input("sprint_id", "must not be blank"));
        }
        for (id, hours) in &self.capacity_overrides {
            if !hours.is_finite() || *hours <= 0.0 {
                return Err(EngineError::invalid_input(
                    format!("capacity_overrides[{id}]"),
                    format!("must be positive, got {hours}"),
                ));
            }
        }
        validate_tasks(&self.tasks)
    }

    /// The sprint's participants with capacity overrides applied.
    ///
    /// An override must name a participant; one for a developer left out by
    /// `developer_ids` is rejected rather than ignored.
    fn participants(&self, roster: &Roster) -> EngineResult<Roster> {
        for id in self.capacity_overrides.keys() {
            if !roster.contains(id) {
                return Err(EngineError::UnknownDeveloper(id.clone()));
            }
        }
        let scoped = match &self.developer_ids {
            Some(ids) => roster.restrict(ids)?,
            None => roster.clone(),
        };
        if let Some(id) = self.capacity_overrides.keys().find(|id| !scoped.contains(id)) {
            return Err(EngineError::invalid_input(
                format!("capacity_overrides[{id}]"),
                "developer is not a sprint participant",
            ));
        }
        if self.capacity_overrides.is_empty() {
            return Ok(scoped);
        }
        let developers: Vec<Developer> = scoped
            .developers()
            .iter()
            .map(|d| {
                let mut d = d.clone();
                if let Some(hours) = self.capacity_overrides.get(&d.id) {
                    d.capacity_hours = Some(*hours);
                }
                d
            })
            .collect();
        let workloads = developers.iter().map(|d| scoped.snapshot(&d.id)).collect();
        Roster::new(developers, workloads)
    }

    fn planned_hours(&self, config: &EngineConfig) -> f64 {
        self.tasks
            .iter()
            .map(|t| t.estimated_hours(&config.workload))
            .sum()
    }
}

/// Per-participant capacity for a sprint.
pub fn sprint_capacity(
    config: &EngineConfig,
    plan: &SprintPlan,
    roster: &Roster,
) -> EngineResult<SprintCapacity> {
    plan.validate()?;
    let participants = plan.participants(roster)?;
    let policy = &config.workload;

    let developers: Vec<DeveloperCapacity> = participants
        .developers()
        .iter()
        .map(|d| {
            let capacity = d.capacity(policy);
            let committed = participants.snapshot(&d.id).current_estimated_hours;
            DeveloperCapacity {
                developer_id: d.id.clone(),
                developer_name: d.display_name().to_string(),
                capacity_hours: round2(capacity),
                committed_hours: round2(committed),
                available_hours: round2((policy.high_ratio * capacity - committed).max(0.0)),
                workload_status: WorkloadStatus::classify(committed, capacity, policy),
            }
        })
        .collect();

    let total_capacity: f64 = developers.iter().map(|d| d.capacity_hours).sum();
    let total_committed: f64 = developers.iter().map(|d| d.committed_hours).sum();
    let total_available: f64 = developers.iter().map(|d| d.available_hours).sum();
    let planned = plan.planned_hours(config);
    let projected = if total_capacity > 0.0 {
        (total_committed + planned) / total_capacity * 100.0
    } else {
        0.0
    };

    tracing::debug!(
        target: "skillmatch::sprint",
        sprint = %plan.sprint_id,
        participants = developers.len(),
        available = total_available,
        planned,
        "Computed sprint capacity"
    );

    Ok(SprintCapacity {
        sprint_id: plan.sprint_id.clone(),
        developers,
        total_capacity_hours: round2(total_capacity),
        total_committed_hours: round2(total_committed),
        total_available_hours: round2(total_available),
        planned_hours: round2(planned),
        projected_utilization: round2(projected),
    })
}

/// Optimized allocation of the sprint's tasks among its participants.
///
/// Scores are normalized against the whole roster, not just participants.
pub fn sprint_suggestions(
    config: &EngineConfig,
    plan: &SprintPlan,
    roster: &Roster,
) -> EngineResult<WhatIfScenario> {
    plan.validate()?;
    let participants = plan.participants(roster)?;
    let cohort = CohortStats::from_roster(roster, config.skill_match.tool_proficiency);
    let name = if plan.name.trim().is_empty() {
        format!("sprint {}", plan.sprint_id)
    } else {
        plan.name.clone()
    };
    optimize::optimize(
        config,
        &name,
        &plan.tasks,
        &participants,
        &cohort,
        plan.max_per_developer,
    )
}

/// Predict which tasks fit in the sprint's available hours.
///
/// Tasks are packed by priority (1 first, unprioritized last), then input order.
pub fn sprint_prediction(
    config: &EngineConfig,
    plan: &SprintPlan,
    roster: &Roster,
) -> EngineResult<SprintPrediction> {
    let capacity = sprint_capacity(config, plan, roster)?;
    let available = capacity.total_available_hours;
    let planned = capacity.planned_hours;

    let mut order: Vec<(usize, &Task)> = plan.tasks.iter().enumerate().collect();
    order.sort_by_key(|(idx, t)| (t.priority.unwrap_or(u8::MAX), *idx));

    let mut remaining = available;
    let mut predicted_completed = Vec::new();
    let mut at_risk = Vec::new();
    for (_, task) in order {
        let hours = task.estimated_hours(&config.workload);
        if hours <= remaining + 1e-9 {
            remaining -= hours;
            predicted_completed.push(task.id.clone());
        } else {
            at_risk.push(task.id.clone());
        }
    }

    let completion_ratio = if planned <= 0.0 {
        1.0
    } else {
        round2((available / planned).min(1.0))
    };
    let outlook = if completion_ratio >= 0.9 {
        SprintOutlook::OnTrack
    } else if completion_ratio >= 0.7 {
        SprintOutlook::AtRisk
    } else {
        SprintOutlook::OffTrack
    };

    let mut warnings = Vec::new();
    if capacity.developers.is_empty() {
        warnings.push("sprint has no participants".to_string());
    }
    if !at_risk.is_empty() {
        warnings.push(format!(
            "{} task(s) do not fit in {:.1} available hours",
            at_risk.len(),
            available
        ));
    }

    tracing::debug!(
        target: "skillmatch::sprint",
        sprint = %plan.sprint_id,
        completion_ratio,
        at_risk = at_risk.len(),
        "Predicted sprint outcome"
    );

    Ok(SprintPrediction {
        sprint_id: plan.sprint_id.clone(),
        planned_hours: planned,
        available_hours: available,
        completion_ratio,
        predicted_completed,
        at_risk,
        outlook,
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{SkillFingerprint, Trend};
    use crate::test_support::{developer, language, task};
    use crate::workload::WorkloadSnapshot;

    fn roster() -> Roster {
        let fp = SkillFingerprint {
            languages: vec![language("rust", 80.0, 10, 100, Trend::Stable)],
            ..Default::default()
        };
        Roster::new(
            vec![developer("a", fp.clone()), developer("b", fp)],
            vec![WorkloadSnapshot {
                developer_id: "a".into(),
                current_tasks: 3,
                current_estimated_hours: 30.0,
            }],
        )
        .unwrap()
    }

    fn plan(tasks: Vec<Task>) -> SprintPlan {
        SprintPlan {
            sprint_id: "S1".into(),
            name: "Sprint 1".into(),
            tasks,
            ..Default::default()
        }
    }

    #[test]
    fn capacity_subtracts_committed_hours() {
        let cap = sprint_capacity(
            &EngineConfig::default(),
            &plan(vec![task("T1", &["rust"])]),
            &roster(),
        )
        .unwrap();
        assert_eq!(cap.developers[0].available_hours, 10.0);
        assert_eq!(cap.developers[1].available_hours, 40.0);
        assert_eq!(cap.total_available_hours, 50.0);
        assert_eq!(cap.planned_hours, 8.0);
        // (30 + 8) / 80
        assert_eq!(cap.projected_utilization, 47.5);
    }

    #[test]
    fn override_for_excluded_developer_is_rejected() {
        let mut p = plan(vec![]);
        p.developer_ids = Some(vec!["b".into()]);
        p.capacity_overrides.insert("a".into(), 20.0);
        let err = sprint_capacity(&EngineConfig::default(), &p, &roster()).unwrap_err();
        assert!(matches!(
            err,
            EngineError::InvalidInput { ref field, .. } if field == "capacity_overrides[a]"
        ));
        assert!(sprint_suggestions(&EngineConfig::default(), &p, &roster()).is_err());
    }

    #[test]
    fn overrides_and_participant_filter_apply() {
        let mut p = plan(vec![]);
        p.developer_ids = Some(vec!["b".into()]);
        p.capacity_overrides.insert("b".into(), 20.0);
        let cap = sprint_capacity(&EngineConfig::default(), &p, &roster()).unwrap();
        assert_eq!(cap.developers.len(), 1);
        assert_eq!(cap.developers[0].capacity_hours, 20.0);

        p.developer_ids = Some(vec!["ghost".into()]);
        assert_eq!(
            sprint_capacity(&EngineConfig::default(), &p, &roster()).unwrap_err(),
            EngineError::UnknownDeveloper("ghost".into())
        );
    }

    #[test]
    fn prediction_packs_by_priority() {
        let mut tasks: Vec<Task> = (1..=8).map(|i| task(&format!("T{i}"), &["rust"])).collect();
        tasks[7].priority = Some(1);
        // 64 planned hours against 50 available.
        let prediction =
            sprint_prediction(&EngineConfig::default(), &plan(tasks), &roster()).unwrap();
        assert_eq!(prediction.predicted_completed[0], "T8");
        assert_eq!(prediction.predicted_completed.len(), 6);
        assert_eq!(prediction.at_risk, vec!["T6".to_string(), "T7".to_string()]);
        assert_eq!(prediction.completion_ratio, 0.78);
        assert_eq!(prediction.outlook, SprintOutlook::AtRisk);
    }

    #[test]
    fn empty_sprint_is_on_track() {
        let prediction =
            sprint_prediction(&EngineConfig::default(), &plan(vec![]), &roster()).unwrap();
        assert_eq!(prediction.completion_ratio, 1.0);
        assert_eq!(prediction.outlook, SprintOutlook::OnTrack);
    }

    #[test]
    fn suggestions_use_participants_only() {
        let mut p = plan(vec![task("T1", &["rust"]), task("T2", &["rust"])]);
        p.developer_ids = Some(vec!["b".into()]);
        let scenario = sprint_suggestions(&EngineConfig::default(), &p, &roster()).unwrap();
        assert_eq!(scenario.scenario_name, "Sprint 1");
        assert!(scenario.assignments.iter().all(|a| a.developer_id == "b"));
        assert_eq!(scenario.workload_impacts.len(), 1);
    }
}
