//! Async facade over the engine.
//!
//! Every operation fetches a fresh roster snapshot from the directory,
//! runs one engine call over it, and returns. Nothing is cached between calls.
//! Each collaborator call is bounded by `dependencies.timeout_ms`; a call
//! that runs past it fails as `DependencyUnavailable`.

use crate::providers::{DeveloperDirectory, SignalClassifier, TaskDescription};
use futures::future::try_join_all;
use skillmatch_intelligence::{
    BenchmarkResult, Engine, EngineConfig, EngineError, EngineResult, ProposedAssignment, Roster,
    ScenarioComparison, SprintCapacity, SprintPlan, SprintPrediction, Task, TaskMatchResult,
    TeamSkillGaps, WhatIfScenario,
};
use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::instrument;

const DIRECTORY: &str = "developer directory";
const CLASSIFIER: &str = "signal classifier";

/// Matching, optimization, and benchmarking over one workspace.
#[derive(Clone)]
pub struct MatchingService {
    engine: Engine,
    directory: Arc<dyn DeveloperDirectory>,
    classifier: Arc<dyn SignalClassifier>,
    timeout: Duration,
}

impl std::fmt::Debug for MatchingService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatchingService")
            .field("engine", &self.engine)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl MatchingService {
    pub fn new(
        config: EngineConfig,
        directory: Arc<dyn DeveloperDirectory>,
        classifier: Arc<dyn SignalClassifier>,
    ) -> EngineResult<Self> {
        let timeout = Duration::from_millis(config.dependencies.timeout_ms);
        Ok(Self {
            engine: Engine::new(config)?,
            directory,
            classifier,
            timeout,
        })
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Runs one collaborator call under the dependency timeout.
    async fn bounded<T>(
        &self,
        dependency: &str,
        call: impl Future<Output = EngineResult<T>>,
    ) -> EngineResult<T> {
        let result = match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(EngineError::dependency_unavailable(
                dependency,
                format!("timed out after {}ms", self.timeout.as_millis()),
            )),
        };
        result.map_err(log_failure)
    }

    /// Developers plus every workload, fetched concurrently.
    async fn roster(&self) -> EngineResult<Roster> {
        let developers = self
            .bounded(DIRECTORY, self.directory.developers())
            .await?;
        let snapshots = try_join_all(
            developers
                .iter()
                .map(|dev| self.bounded(DIRECTORY, self.directory.workload(&dev.id))),
        )
        .await?;
        tracing::debug!(
            target: "skillmatch::service",
            developers = developers.len(),
            "Fetched roster snapshot"
        );
        Roster::new(developers, snapshots.into_iter().flatten().collect())
    }

    /// Classify a task and rank every developer for it.
    #[instrument(skip_all, fields(title = %task.title))]
    pub async fn match_task(&self, task: &TaskDescription) -> EngineResult<TaskMatchResult> {
        let signals = self
            .bounded(CLASSIFIER, self.classifier.classify(task))
            .await?;
        let roster = self.roster().await?;
        self.engine.match_task(signals, &roster)
    }

    #[instrument(skip_all, fields(scenario = scenario_name, tasks = tasks.len()))]
    pub async fn create_what_if_scenario(
        &self,
        scenario_name: &str,
        tasks: &[Task],
        proposals: &[ProposedAssignment],
        current_workloads: Option<&BTreeMap<String, u32>>,
    ) -> EngineResult<WhatIfScenario> {
        let roster = self.roster().await?;
        self.engine
            .simulate(scenario_name, tasks, proposals, &roster, current_workloads)
    }

    #[instrument(skip_all, fields(tasks = tasks.len(), max_per_developer = ?max_per_developer))]
    pub async fn optimize_assignments(
        &self,
        tasks: &[Task],
        max_per_developer: Option<i64>,
        current_workloads: Option<&BTreeMap<String, u32>>,
    ) -> EngineResult<WhatIfScenario> {
        let roster = self.roster().await?;
        self.engine
            .optimize_assignments(tasks, &roster, max_per_developer, current_workloads)
    }

    #[instrument(skip_all, fields(a = %a.scenario_name, b = %b.scenario_name))]
    pub async fn compare_scenarios(
        &self,
        a: &WhatIfScenario,
        b: &WhatIfScenario,
    ) -> ScenarioComparison {
        self.engine.compare(a, b)
    }

    #[instrument(skip(self))]
    pub async fn benchmark(
        &self,
        developer_id: &str,
        domain: Option<&str>,
    ) -> EngineResult<BenchmarkResult> {
        let roster = self.roster().await?;
        self.engine.benchmark(developer_id, domain, &roster)
    }

    #[instrument(skip_all, fields(skills = target_skills.len()))]
    pub async fn team_skill_gaps(&self, target_skills: &[String]) -> EngineResult<TeamSkillGaps> {
        let roster = self.roster().await?;
        self.engine.team_skill_gaps(target_skills, &roster)
    }

    #[instrument(skip_all, fields(sprint = %plan.sprint_id))]
    pub async fn sprint_capacity(&self, plan: &SprintPlan) -> EngineResult<SprintCapacity> {
        let roster = self.roster().await?;
        self.engine.sprint_capacity(plan, &roster)
    }

    #[instrument(skip_all, fields(sprint = %plan.sprint_id))]
    pub async fn sprint_suggestions(&self, plan: &SprintPlan) -> EngineResult<WhatIfScenario> {
        let roster = self.roster().await?;
        self.engine.sprint_suggestions(plan, &roster)
    }

    #[instrument(skip_all, fields(sprint = %plan.sprint_id))]
    pub async fn sprint_prediction(&self, plan: &SprintPlan) -> EngineResult<SprintPrediction> {
        let roster = self.roster().await?;
        self.engine.sprint_prediction(plan, &roster)
    }
}

fn log_failure(err: EngineError) -> EngineError {
    if let EngineError::DependencyUnavailable {
        dependency,
        message,
    } = &err
    {
        tracing::warn!(
            target: "skillmatch::service",
            dependency = %dependency,
            error = %message,
            "Dependency unavailable"
        );
    }
    err
}
