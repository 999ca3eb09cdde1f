//! Capacity-constrained task allocation.
//!
//! The full task x developer score matrix is built first (in parallel, then
//! materialized in order), after which a solver picks the allocation:
//!
//! - slot capacities on small and moderate problems use an exact min-cost
//!   flow;
//! - hour budgets and large problems use greedy selection followed by an
//!   exchange-improvement pass.
//!
//! Both maximize total `overall_score` and break ties towards higher total
//! `growth_opportunity`. Neither uses randomness, so identical input yields
//! identical allocations.

mod flow;
mod greedy;

use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::model::{validate_tasks, SkillProfile, Task};
use crate::score::{CohortStats, MatchScore, MatchScorer, Scorer};
use crate::whatif::{
    Placement, ScenarioBuilder, ScenarioKind, Solver, UnassignedReason, UnassignedTask,
    WhatIfScenario,
};
use crate::workload::{LoadContext, Roster};
use rayon::prelude::*;

/// Hour budgets are compared with this slack to absorb float noise.
const HOURS_EPSILON: f64 = 1e-9;

/// Every task x developer score, indexed `[task][developer]`.
#[derive(Debug, Clone)]
pub struct ScoreMatrix {
    scores: Vec<Vec<MatchScore>>,
}

impl ScoreMatrix {
    /// Score all pairs. Rows are computed in parallel and collected in task
    /// order, so the matrix is independent of thread scheduling.
    pub fn build(
        config: &EngineConfig,
        tasks: &[Task],
        roster: &Roster,
        cohort: &CohortStats,
    ) -> Self {
        let tool = config.skill_match.tool_proficiency;
        let developers = roster.developers();
        let profiles: Vec<SkillProfile> = developers
            .iter()
            .map(|d| SkillProfile::new(&d.fingerprint, tool))
            .collect();
        let loads: Vec<LoadContext> = developers
            .iter()
            .map(|d| roster.load_context(d, &config.workload))
            .collect();
        let scorer = MatchScorer::new(config, cohort);

        let scores = tasks
            .par_iter()
            .map(|task| {
                profiles
                    .iter()
                    .zip(&loads)
                    .map(|(profile, load)| scorer.score(&task.signals, profile, load))
                    .collect()
            })
            .collect();
        Self { scores }
    }

    pub fn get(&self, task: usize, developer: usize) -> &MatchScore {
        &self.scores[task][developer]
    }

    pub fn task_count(&self) -> usize {
        self.scores.len()
    }
}

/// Fixed-point value of an eligible pair, in hundredths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PairValue {
    pub score: i64,
    pub growth: i64,
}

impl PairValue {
    fn from_score(score: &MatchScore) -> Self {
        Self {
            score: (score.overall_score * 100.0).round() as i64,
            growth: (score.growth_opportunity * 100.0).round() as i64,
        }
    }

    /// Lexicographic (score, growth) folded into one integer.
    ///
    /// `scale` exceeds the largest possible growth total, so score always
    /// dominates. The `+ 1` keeps every eligible pair strictly worth taking.
    pub fn key(&self, scale: i64) -> i64 {
        self.score * scale + self.growth + 1
    }
}

/// Per-developer room left before the allocation starts.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Capacity {
    Slots(Vec<u32>),
    Hours(Vec<f64>),
}

/// Eligible pair values plus per-task hours.
#[derive(Debug, Clone)]
pub(crate) struct Problem {
    values: Vec<Vec<Option<PairValue>>>,
    hours: Vec<f64>,
}

impl Problem {
    fn new(matrix: &ScoreMatrix, tasks: &[Task], config: &EngineConfig) -> Self {
        let min_viable = config.assignment.min_viable_score;
        let values = matrix
            .scores
            .iter()
            .map(|row| {
                row.iter()
                    .map(|s| (s.overall_score >= min_viable).then(|| PairValue::from_score(s)))
                    .collect()
            })
            .collect();
        Self {
            values,
            hours: tasks
                .iter()
                .map(|t| t.estimated_hours(&config.workload))
                .collect(),
        }
    }

    #[cfg(test)]
    pub(crate) fn from_values(values: Vec<Vec<Option<PairValue>>>) -> Self {
        let hours = vec![8.0; values.len()];
        Self { values, hours }
    }

    pub fn task_count(&self) -> usize {
        self.values.len()
    }

    pub fn developer_count(&self) -> usize {
        self.values.first().map_or(0, Vec::len)
    }

    pub fn value(&self, task: usize, developer: usize) -> Option<PairValue> {
        self.values[task][developer]
    }

    pub fn hours(&self, task: usize) -> f64 {
        self.hours[task]
    }

    pub fn eligible(&self, task: usize) -> bool {
        self.values[task].iter().any(Option::is_some)
    }

    /// Multiplier that keeps growth (plus the per-pair unit) below one score step.
    pub fn tie_scale(&self) -> i64 {
        10_001 * self.task_count() as i64 + 1
    }
}

/// Per-developer room derived from the roster's committed load.
fn capacity(config: &EngineConfig, roster: &Roster, max_per_developer: Option<u32>) -> Capacity {
    let policy = &config.workload;
    match max_per_developer {
        Some(k) => Capacity::Slots(
            roster
                .developers()
                .iter()
                .map(|d| k.saturating_sub(roster.snapshot(&d.id).current_tasks))
                .collect(),
        ),
        None => Capacity::Hours(
            roster
                .developers()
                .iter()
                .map(|d| {
                    let budget = policy.high_ratio * d.capacity(policy);
                    (budget - roster.snapshot(&d.id).current_estimated_hours).max(0.0)
                })
                .collect(),
        ),
    }
}

/// Validate `max_per_developer` at the boundary.
pub fn check_max_per_developer(max_per_developer: Option<i64>) -> EngineResult<Option<u32>> {
    match max_per_developer {
        None => Ok(None),
        Some(k) if k <= 0 => Err(EngineError::InvalidCapacity(k)),
        Some(k) => Ok(Some(u32::try_from(k).unwrap_or(u32::MAX))),
    }
}

/// Allocate `tasks` across the roster and report the result as a scenario.
pub fn optimize(
    config: &EngineConfig,
    scenario_name: &str,
    tasks: &[Task],
    roster: &Roster,
    cohort: &CohortStats,
    max_per_developer: Option<i64>,
) -> EngineResult<WhatIfScenario> {
    let max_per_developer = check_max_per_developer(max_per_developer)?;
    validate_tasks(tasks)?;

    let matrix = ScoreMatrix::build(config, tasks, roster, cohort);
    let problem = Problem::new(&matrix, tasks, config);
    let capacity = capacity(config, roster, max_per_developer);

    let pairs = problem.task_count() * problem.developer_count();
    let (solver, chosen) = match &capacity {
        Capacity::Slots(slots) if pairs <= config.assignment.exact_pair_limit => {
            (Solver::MinCostFlow, flow::solve(&problem, slots))
        }
        _ => (Solver::Greedy, greedy::solve(&problem, &capacity)),
    };

    tracing::debug!(
        target: "skillmatch::optimize",
        tasks = problem.task_count(),
        developers = problem.developer_count(),
        solver = ?solver,
        "Solved allocation"
    );

    let mut placements = Vec::new();
    let mut unassigned = Vec::new();
    for (t, choice) in chosen.into_iter().enumerate() {
        match choice {
            Some(d) => placements.push(Placement {
                task: t,
                developer: d,
                score: matrix.get(t, d).clone(),
            }),
            None => unassigned.push(UnassignedTask {
                task_id: tasks[t].id.clone(),
                reason: if problem.eligible(t) {
                    UnassignedReason::CapacityExhausted
                } else {
                    UnassignedReason::NoQualifiedDeveloper
                },
            }),
        }
    }

    if !unassigned.is_empty() {
        tracing::debug!(
            target: "skillmatch::optimize",
            unassigned = unassigned.len(),
            "Left tasks unassigned"
        );
    }

    Ok(
        ScenarioBuilder::new(config, tasks, roster, scenario_name, ScenarioKind::Optimized)
            .with_solver(solver)
            .build(placements, unassigned),
    )
}
