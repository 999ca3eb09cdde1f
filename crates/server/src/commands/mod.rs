//! CLI command handlers for the skillmatch application.
//!
//! Every handler returns the rendered output instead of printing it, so
//! `run` owns stdout and tests can inspect results directly.

mod benchmark;
mod config;
mod matching;
mod render;
mod scenario;
mod sprint;

pub(crate) use benchmark::{handle_benchmark_command, handle_skill_gaps_command};
pub(crate) use config::handle_config_command;
pub(crate) use matching::handle_match_command;
pub(crate) use scenario::{
    handle_compare_command, handle_optimize_command, handle_simulate_command,
};
pub(crate) use sprint::handle_sprint_command;

use crate::cli::OutputFormat;
use crate::providers::{JsonWorkspaceDirectory, LabelClassifier, SignalClassifier};
use crate::service::MatchingService;
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use skillmatch_intelligence::EngineConfig;
use std::path::Path;
use std::sync::Arc;

/// Read and parse a JSON input file.
pub(crate) fn load_json<T: DeserializeOwned>(path: &Path, what: &str) -> Result<T> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {what} from {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("failed to parse {what} in {}", path.display()))
}

/// Service over a workspace file, classifying tasks by label unless told otherwise.
pub(crate) async fn open_service(
    config: &EngineConfig,
    workspace_file: &Path,
    classifier: Option<Arc<dyn SignalClassifier>>,
) -> Result<MatchingService> {
    let directory = JsonWorkspaceDirectory::open(workspace_file).await?;
    let classifier = classifier.unwrap_or_else(|| Arc::new(LabelClassifier));
    Ok(MatchingService::new(
        config.clone(),
        Arc::new(directory),
        classifier,
    )?)
}

/// Pretty JSON or the text summary, depending on `format`.
pub(crate) fn emit<T: Serialize>(
    value: &T,
    format: OutputFormat,
    text: impl FnOnce(&T) -> String,
) -> Result<String> {
    if format.is_json() {
        Ok(serde_json::to_string_pretty(value)?)
    } else {
        Ok(text(value))
    }
}
