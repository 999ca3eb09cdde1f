//! What-if scenarios: scored, non-committing allocations and their diffs.
//!
//! Both the optimizer and the simulator produce a [`WhatIfScenario`]; the
//! comparator consumes two of them. Scenarios are plain values built fresh
//! per call and never touch the workload snapshot they were computed from.

mod compare;
mod report;
mod simulate;

pub use compare::{compare, AssignmentDiff, ImpactDelta, Preference, ScenarioComparison};
pub(crate) use report::{Placement, ScenarioBuilder};
pub use simulate::{simulate, ProposedAssignment};

use crate::workload::WorkloadImpact;
use serde::{Deserialize, Serialize};

/// How a scenario's allocation was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioKind {
    /// Chosen by the assignment optimizer.
    Optimized,
    /// Supplied by a caller and scored as-is.
    Proposed,
}

/// Allocation algorithm behind an optimized scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Solver {
    /// Exact min-cost flow over slot capacities.
    MinCostFlow,
    /// Greedy by score with an exchange-improvement pass.
    Greedy,
}

/// One task placed on one developer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioAssignment {
    pub task_id: String,
    pub developer_id: String,
    pub developer_name: String,
    pub match_score: f64,
    pub skill_match: f64,
    pub growth_opportunity: f64,
    pub estimated_hours: f64,
}

/// Why a task was left unassigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnassignedReason {
    /// No developer reaches the minimum viable score.
    NoQualifiedDeveloper,
    /// Qualified developers exist but none has room left.
    CapacityExhausted,
    /// The caller's proposal did not include the task.
    NotProposed,
}

impl UnassignedReason {
    pub fn describe(&self) -> &'static str {
        match self {
            Self::NoQualifiedDeveloper => "no developer reaches the minimum viable score",
            Self::CapacityExhausted => "every qualified developer is at capacity",
            Self::NotProposed => "not included in the proposal",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnassignedTask {
    pub task_id: String,
    pub reason: UnassignedReason,
}

/// Assignment counts by growth band.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrowthDistribution {
    pub high: usize,
    pub moderate: usize,
    pub low: usize,
}

/// Team-level summary of a scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamImpact {
    pub total_tasks: usize,
    pub assigned_tasks: usize,
    pub unassigned_tasks: usize,
    pub average_match_score: f64,
    /// Percent of (task, required skill) slots held by the assigned developer.
    pub skill_coverage: f64,
    pub growth_distribution: GrowthDistribution,
    /// Population standard deviation of utilization percentages.
    pub utilization_spread: f64,
    pub unassigned: Vec<UnassignedTask>,
    pub warnings: Vec<String>,
}

/// A fully scored hypothetical allocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WhatIfScenario {
    pub scenario_name: String,
    pub kind: ScenarioKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solver: Option<Solver>,
    pub assignments: Vec<ScenarioAssignment>,
    pub workload_impacts: Vec<WorkloadImpact>,
    pub team_impact: TeamImpact,
    pub recommendations: Vec<String>,
}

impl WhatIfScenario {
    /// Sum of assigned match scores.
    pub fn total_score(&self) -> f64 {
        crate::types::round2(self.assignments.iter().map(|a| a.match_score).sum())
    }
}
