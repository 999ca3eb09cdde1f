//! CLI handlers for `optimize`, `simulate`, and `compare`.

use super::{emit, load_json, open_service, render};
use crate::cli::{OutputFormat, WorkspaceArgs};
use anyhow::Result;
use skillmatch_intelligence::{Engine, EngineConfig, ProposedAssignment, Task, WhatIfScenario};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

fn load_current_workloads(path: Option<&Path>) -> Result<Option<BTreeMap<String, u32>>> {
    path.map(|p| load_json(p, "current workloads")).transpose()
}

/// Handle the `optimize` command.
pub(crate) async fn handle_optimize_command(
    config: &EngineConfig,
    workspace: WorkspaceArgs,
    tasks: PathBuf,
    max_per_developer: Option<i64>,
    current_workloads: Option<PathBuf>,
) -> Result<String> {
    let tasks: Vec<Task> = load_json(&tasks, "tasks")?;
    let current = load_current_workloads(current_workloads.as_deref())?;
    let service = open_service(config, &workspace.workspace_file, None).await?;
    let scenario = service
        .optimize_assignments(&tasks, max_per_developer, current.as_ref())
        .await?;
    emit(&scenario, workspace.format, render::scenario)
}

/// Handle the `simulate` command.
pub(crate) async fn handle_simulate_command(
    config: &EngineConfig,
    workspace: WorkspaceArgs,
    name: String,
    tasks: PathBuf,
    proposal: PathBuf,
    current_workloads: Option<PathBuf>,
) -> Result<String> {
    let tasks: Vec<Task> = load_json(&tasks, "tasks")?;
    let proposals: Vec<ProposedAssignment> = load_json(&proposal, "proposal")?;
    let current = load_current_workloads(current_workloads.as_deref())?;
    let service = open_service(config, &workspace.workspace_file, None).await?;
    let scenario = service
        .create_what_if_scenario(&name, &tasks, &proposals, current.as_ref())
        .await?;
    emit(&scenario, workspace.format, render::scenario)
}

/// Handle the `compare` command.
///
/// Works on saved scenarios alone, so no workspace is read.
pub(crate) fn handle_compare_command(
    config: &EngineConfig,
    scenario_a: PathBuf,
    scenario_b: PathBuf,
    format: OutputFormat,
) -> Result<String> {
    let a: WhatIfScenario = load_json(&scenario_a, "scenario")?;
    let b: WhatIfScenario = load_json(&scenario_b, "scenario")?;
    let engine = Engine::new(config.clone())?;
    let comparison = engine.compare(&a, &b);
    emit(&comparison, format, render::comparison)
}
