//! Engine facade: one validated policy, every operation.

use crate::benchmark::{self, BenchmarkResult, TeamSkillGaps};
use crate::config::EngineConfig;
use crate::error::EngineResult;
use crate::model::{Task, TaskSignals};
use crate::optimize;
use crate::rank::{self, TaskMatchResult};
use crate::score::CohortStats;
use crate::sprint::{self, SprintCapacity, SprintPlan, SprintPrediction};
use crate::whatif::{self, ProposedAssignment, ScenarioComparison, WhatIfScenario};
use crate::workload::Roster;
use std::collections::BTreeMap;

/// Default name for optimizer-produced scenarios.
pub const OPTIMIZED_SCENARIO_NAME: &str = "optimized";

/// Stateless engine bound to one workspace policy.
///
/// Cheap to clone and safe to share; every call works on the roster it is
/// given and never retains it.
#[derive(Debug, Clone)]
pub struct Engine {
    config: EngineConfig,
}

impl Engine {
    /// Create an engine, rejecting an inconsistent policy up front.
    pub fn new(config: EngineConfig) -> EngineResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn cohort(&self, roster: &Roster) -> CohortStats {
        CohortStats::from_roster(roster, self.config.skill_match.tool_proficiency)
    }

    fn with_overrides(
        &self,
        roster: &Roster,
        current_workloads: Option<&BTreeMap<String, u32>>,
    ) -> EngineResult<Roster> {
        match current_workloads {
            Some(counts) => roster.with_task_counts(counts, &self.config.workload),
            None => Ok(roster.clone()),
        }
    }

    /// Rank every developer for one task.
    pub fn match_task(
        &self,
        signals: TaskSignals,
        roster: &Roster,
    ) -> EngineResult<TaskMatchResult> {
        rank::match_task(&self.config, signals, roster, &self.cohort(roster))
    }

    /// Allocate tasks to maximize total match score under capacity limits.
    pub fn optimize_assignments(
        &self,
        tasks: &[Task],
        roster: &Roster,
        max_per_developer: Option<i64>,
        current_workloads: Option<&BTreeMap<String, u32>>,
    ) -> EngineResult<WhatIfScenario> {
        optimize::check_max_per_developer(max_per_developer)?;
        let roster = self.with_overrides(roster, current_workloads)?;
        optimize::optimize(
            &self.config,
            OPTIMIZED_SCENARIO_NAME,
            tasks,
            &roster,
            &self.cohort(&roster),
            max_per_developer,
        )
    }

    /// Score a caller-proposed allocation without optimizing it.
    pub fn simulate(
        &self,
        scenario_name: &str,
        tasks: &[Task],
        proposals: &[ProposedAssignment],
        roster: &Roster,
        current_workloads: Option<&BTreeMap<String, u32>>,
    ) -> EngineResult<WhatIfScenario> {
        let roster = self.with_overrides(roster, current_workloads)?;
        whatif::simulate(
            &self.config,
            scenario_name,
            tasks,
            proposals,
            &roster,
            &self.cohort(&roster),
        )
    }

    pub fn compare(&self, a: &WhatIfScenario, b: &WhatIfScenario) -> ScenarioComparison {
        whatif::compare(a, b)
    }

    pub fn benchmark(
        &self,
        developer_id: &str,
        domain: Option<&str>,
        roster: &Roster,
    ) -> EngineResult<BenchmarkResult> {
        benchmark::benchmark(&self.config, developer_id, domain, roster)
    }

    pub fn team_skill_gaps(
        &self,
        target_skills: &[String],
        roster: &Roster,
    ) -> EngineResult<TeamSkillGaps> {
        benchmark::team_skill_gaps(&self.config, target_skills, roster)
    }

    pub fn sprint_capacity(
        &self,
        plan: &SprintPlan,
        roster: &Roster,
    ) -> EngineResult<SprintCapacity> {
        sprint::sprint_capacity(&self.config, plan, roster)
    }

    pub fn sprint_suggestions(
        &self,
        plan: &SprintPlan,
        roster: &Roster,
    ) -> EngineResult<WhatIfScenario> {
        sprint::sprint_suggestions(&self.config, plan, roster)
    }

    pub fn sprint_prediction(
        &self,
        plan: &SprintPlan,
        roster: &Roster,
    ) -> EngineResult<SprintPrediction> {
        sprint::sprint_prediction(&self.config, plan, roster)
    }
}
