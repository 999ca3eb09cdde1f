//! CLI handlers for `benchmark` and `skill-gaps`.

use super::{emit, open_service, render};
use crate::cli::WorkspaceArgs;
use anyhow::Result;
use skillmatch_intelligence::EngineConfig;

/// Handle the `benchmark` command.
pub(crate) async fn handle_benchmark_command(
    config: &EngineConfig,
    workspace: WorkspaceArgs,
    developer_id: String,
    domain: Option<String>,
) -> Result<String> {
    let service = open_service(config, &workspace.workspace_file, None).await?;
    let result = service.benchmark(&developer_id, domain.as_deref()).await?;
    emit(&result, workspace.format, render::benchmark)
}

/// Handle the `skill-gaps` command.
pub(crate) async fn handle_skill_gaps_command(
    config: &EngineConfig,
    workspace: WorkspaceArgs,
    skills: Vec<String>,
) -> Result<String> {
    let service = open_service(config, &workspace.workspace_file, None).await?;
    let gaps = service.team_skill_gaps(&skills).await?;
    emit(&gaps, workspace.format, render::skill_gaps)
}
