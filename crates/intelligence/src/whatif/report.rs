//! Scenario report assembly shared by the optimizer and the simulator.

use super::{
    GrowthDistribution, ScenarioAssignment, ScenarioKind, Solver, TeamImpact, UnassignedReason,
    UnassignedTask, WhatIfScenario,
};
use crate::config::EngineConfig;
use crate::model::{SkillProfile, Task};
use crate::score::MatchScore;
use crate::types::{mean, round2};
use crate::workload::{AddedLoad, Roster, WorkloadImpact, WorkloadStatus};
use std::collections::BTreeMap;

/// A task (by index) placed on a roster developer (by index).
#[derive(Debug, Clone)]
pub(crate) struct Placement {
    pub task: usize,
    pub developer: usize,
    pub score: MatchScore,
}

pub(crate) struct ScenarioBuilder<'a> {
    config: &'a EngineConfig,
    tasks: &'a [Task],
    roster: &'a Roster,
    name: String,
    kind: ScenarioKind,
    solver: Option<Solver>,
    notes: Vec<String>,
}

impl<'a> ScenarioBuilder<'a> {
    pub fn new(
        config: &'a EngineConfig,
        tasks: &'a [Task],
        roster: &'a Roster,
        name: impl Into<String>,
        kind: ScenarioKind,
    ) -> Self {
        Self {
            config,
            tasks,
            roster,
            name: name.into(),
            kind,
            solver: None,
            notes: Vec::new(),
        }
    }

    pub fn with_solver(mut self, solver: Solver) -> Self {
        self.solver = Some(solver);
        self
    }

    /// Extra warning appended after the standard ones.
    pub fn with_warning(mut self, warning: String) -> Self {
        self.notes.push(warning);
        self
    }

    pub fn build(
        self,
        mut placements: Vec<Placement>,
        unassigned: Vec<UnassignedTask>,
    ) -> WhatIfScenario {
        placements.sort_by_key(|p| p.task);
        let policy = &self.config.workload;
        let developers = self.roster.developers();

        let mut added: BTreeMap<String, AddedLoad> = BTreeMap::new();
        let mut assignments = Vec::with_capacity(placements.len());
        let mut growth = GrowthDistribution::default();
        let mut covered_slots = 0usize;

        for placement in &placements {
            let task = &self.tasks[placement.task];
            let dev = &developers[placement.developer];
            let hours = task.estimated_hours(policy);

            let load = added.entry(dev.id.clone()).or_default();
            load.tasks += 1;
            load.hours += hours;

            let g = placement.score.growth_opportunity;
            if g >= self.config.growth.high_growth {
                growth.high += 1;
            } else if g >= self.config.growth.moderate_growth {
                growth.moderate += 1;
            } else {
                growth.low += 1;
            }

            let profile =
                SkillProfile::new(&dev.fingerprint, self.config.skill_match.tool_proficiency);
            covered_slots += task
                .signals
                .required()
                .iter()
                .filter(|s| profile.holds(s))
                .count();

            assignments.push(ScenarioAssignment {
                task_id: task.id.clone(),
                developer_id: dev.id.clone(),
                developer_name: dev.display_name().to_string(),
                match_score: placement.score.overall_score,
                skill_match: placement.score.skill_match,
                growth_opportunity: g,
                estimated_hours: round2(hours),
            });
        }

        let total_slots: usize = self.tasks.iter().map(|t| t.signals.required().len()).sum();
        let skill_coverage = if total_slots == 0 {
            100.0
        } else {
            round2(covered_slots as f64 / total_slots as f64 * 100.0)
        };

        let workload_impacts = self.roster.impacts(&added, policy);
        let scores: Vec<f64> = assignments.iter().map(|a| a.match_score).collect();

        let mut warnings: Vec<String> = unassigned
            .iter()
            .map(|u| format!("task {} unassigned: {}", u.task_id, u.reason.describe()))
            .collect();
        warnings.extend(
            workload_impacts
                .iter()
                .filter(|w| w.workload_status == WorkloadStatus::Over)
                .map(|w| {
                    format!(
                        "{} would be over capacity ({:.1}h of {:.1}h)",
                        w.developer_id, w.estimated_hours, w.capacity_hours
                    )
                }),
        );
        warnings.extend(self.notes);

        let recommendations = recommendations(&unassigned, &workload_impacts);

        tracing::debug!(
            target: "skillmatch::whatif",
            scenario = %self.name,
            assigned = assignments.len(),
            unassigned = unassigned.len(),
            "Built scenario report"
        );

        WhatIfScenario {
            scenario_name: self.name,
            kind: self.kind,
            solver: self.solver,
            team_impact: TeamImpact {
                total_tasks: self.tasks.len(),
                assigned_tasks: assignments.len(),
                unassigned_tasks: unassigned.len(),
                average_match_score: round2(mean(&scores)),
                skill_coverage,
                growth_distribution: growth,
                utilization_spread: utilization_spread(&workload_impacts),
                unassigned,
                warnings,
            },
            assignments,
            workload_impacts,
            recommendations,
        }
    }
}

fn utilization_spread(impacts: &[WorkloadImpact]) -> f64 {
    let values: Vec<f64> = impacts.iter().map(|w| w.utilization).collect();
    if values.is_empty() {
        return 0.0;
    }
    let avg = mean(&values);
    let variance = mean(&values.iter().map(|v| (v - avg).powi(2)).collect::<Vec<_>>());
    round2(variance.sqrt())
}

fn recommendations(unassigned: &[UnassignedTask], impacts: &[WorkloadImpact]) -> Vec<String> {
    let count = |reason: UnassignedReason| unassigned.iter().filter(|u| u.reason == reason).count();
    let mut out = Vec::new();

    let blocked = count(UnassignedReason::CapacityExhausted);
    if blocked > 0 {
        out.push(format!(
            "Add capacity or defer {blocked} task(s) blocked by capacity"
        ));
    }
    let unqualified = count(UnassignedReason::NoQualifiedDeveloper);
    if unqualified > 0 {
        out.push(format!(
            "Hire, train, or pair for {unqualified} task(s) with no qualified developer"
        ));
    }
    let unproposed = count(UnassignedReason::NotProposed);
    if unproposed > 0 {
        out.push(format!("Propose developers for {unproposed} unplaced task(s)"));
    }

    let over: Vec<&WorkloadImpact> = impacts
        .iter()
        .filter(|w| w.workload_status == WorkloadStatus::Over)
        .collect();
    for w in &over {
        out.push(format!(
            "Rebalance work away from {} ({:.0}% utilized)",
            w.developer_name, w.utilization
        ));
    }
    if !over.is_empty() {
        let spare: Vec<&str> = impacts
            .iter()
            .filter(|w| w.workload_status == WorkloadStatus::Under)
            .map(|w| w.developer_name.as_str())
            .collect();
        if !spare.is_empty() {
            out.push(format!("Spare capacity: {}", spare.join(", ")));
        }
    }
    out
}
