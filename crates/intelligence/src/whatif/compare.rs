//! Side-by-side diff of two scenarios.

use super::WhatIfScenario;
use crate::types::round2;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// How one task is placed in each scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignmentDiff {
    pub task_id: String,
    pub developer_a: Option<String>,
    pub developer_b: Option<String>,
    pub score_a: Option<f64>,
    pub score_b: Option<f64>,
    /// `score_b - score_a`, with a missing side counting as zero.
    pub score_delta: f64,
    pub changed: bool,
}

/// Aggregate differences, always `b - a`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpactDelta {
    pub average_score: f64,
    pub skill_coverage: f64,
    pub utilization_spread: f64,
    pub assigned_tasks: i64,
    pub total_score: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Preference {
    ScenarioA,
    ScenarioB,
    Equivalent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioComparison {
    pub scenario_a: String,
    pub scenario_b: String,
    pub assignments: Vec<AssignmentDiff>,
    pub changed_assignments: usize,
    pub deltas: ImpactDelta,
    pub preferred: Preference,
    pub summary: String,
}

/// Align two scenarios by task id and report their differences.
pub fn compare(a: &WhatIfScenario, b: &WhatIfScenario) -> ScenarioComparison {
    let side = |s: &WhatIfScenario| -> BTreeMap<String, (String, f64)> {
        s.assignments
            .iter()
            .map(|x| (x.task_id.clone(), (x.developer_id.clone(), x.match_score)))
            .collect()
    };
    let placed_a = side(a);
    let placed_b = side(b);

    let task_ids: BTreeSet<&str> = [a, b]
        .into_iter()
        .flat_map(|s| {
            s.assignments
                .iter()
                .map(|x| x.task_id.as_str())
                .chain(s.team_impact.unassigned.iter().map(|u| u.task_id.as_str()))
        })
        .collect();

    let assignments: Vec<AssignmentDiff> = task_ids
        .into_iter()
        .map(|task_id| {
            let in_a = placed_a.get(task_id);
            let in_b = placed_b.get(task_id);
            let score_a = in_a.map(|(_, s)| *s);
            let score_b = in_b.map(|(_, s)| *s);
            let developer_a = in_a.map(|(d, _)| d.clone());
            let developer_b = in_b.map(|(d, _)| d.clone());
            AssignmentDiff {
                task_id: task_id.to_string(),
                changed: developer_a != developer_b,
                score_delta: round2(score_b.unwrap_or(0.0) - score_a.unwrap_or(0.0)),
                developer_a,
                developer_b,
                score_a,
                score_b,
            }
        })
        .collect();

    let ta = &a.team_impact;
    let tb = &b.team_impact;
    let deltas = ImpactDelta {
        average_score: round2(tb.average_match_score - ta.average_match_score),
        skill_coverage: round2(tb.skill_coverage - ta.skill_coverage),
        utilization_spread: round2(tb.utilization_spread - ta.utilization_spread),
        assigned_tasks: tb.assigned_tasks as i64 - ta.assigned_tasks as i64,
        total_score: round2(b.total_score() - a.total_score()),
    };

    let preferred = if deltas.total_score != 0.0 {
        pick(deltas.total_score > 0.0)
    } else if deltas.skill_coverage != 0.0 {
        pick(deltas.skill_coverage > 0.0)
    } else if deltas.utilization_spread != 0.0 {
        pick(deltas.utilization_spread < 0.0)
    } else {
        Preference::Equivalent
    };

    let changed_assignments = assignments.iter().filter(|d| d.changed).count();
    let summary = match preferred {
        Preference::Equivalent => format!(
            "'{}' and '{}' are equivalent; {} assignment(s) differ",
            a.scenario_name, b.scenario_name, changed_assignments
        ),
        Preference::ScenarioA | Preference::ScenarioB => {
            let (winner, loser) = if preferred == Preference::ScenarioA {
                (&a.scenario_name, &b.scenario_name)
            } else {
                (&b.scenario_name, &a.scenario_name)
            };
            format!(
                "'{winner}' is preferred over '{loser}': total score {:+.2}, coverage {:+.2}, spread {:+.2}; {changed_assignments} assignment(s) differ",
                deltas.total_score, deltas.skill_coverage, deltas.utilization_spread
            )
        }
    };

    tracing::debug!(
        target: "skillmatch::whatif",
        changed = changed_assignments,
        preferred = ?preferred,
        "Compared scenarios"
    );

    ScenarioComparison {
        scenario_a: a.scenario_name.clone(),
        scenario_b: b.scenario_name.clone(),
        assignments,
        changed_assignments,
        deltas,
        preferred,
        summary,
    }
}

fn pick(b_wins: bool) -> Preference {
    if b_wins {
        Preference::ScenarioB
    } else {
        Preference::ScenarioA
    }
}
