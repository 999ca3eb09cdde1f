//! CLI handler for the `match` command.

use super::{emit, load_json, open_service, render};
use crate::cli::WorkspaceArgs;
use crate::providers::{PrecomputedClassifier, SignalClassifier, TaskDescription};
use anyhow::Result;
use skillmatch_intelligence::{EngineConfig, TaskSignals};
use std::path::PathBuf;
use std::sync::Arc;

/// Handle the `match` command.
pub(crate) async fn handle_match_command(
    config: &EngineConfig,
    workspace: WorkspaceArgs,
    title: String,
    description: String,
    source: Option<String>,
    labels: Vec<String>,
    signals: Option<PathBuf>,
) -> Result<String> {
    let precomputed: Option<TaskSignals> = signals
        .as_deref()
        .map(|path| load_json(path, "task signals"))
        .transpose()?;
    let classifier: Option<Arc<dyn SignalClassifier>> = precomputed
        .is_some()
        .then(|| Arc::new(PrecomputedClassifier) as Arc<dyn SignalClassifier>);

    let task = TaskDescription {
        title,
        description,
        source,
        labels,
        signals: precomputed,
    };
    let service = open_service(config, &workspace.workspace_file, classifier).await?;
    let result = service.match_task(&task).await?;
    emit(&result, workspace.format, |r| render::task_match(&task.title, r))
}
