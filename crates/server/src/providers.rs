//! Collaborators the matching service reads from.
//!
//! A [`DeveloperDirectory`] supplies fingerprints and committed workloads; a
//! [`SignalClassifier`] turns a free-form task description into
//! [`TaskSignals`]. Either one failing surfaces as
//! [`EngineError::DependencyUnavailable`], never as a guessed score.

use async_trait::async_trait;
use serde::de::value::StrDeserializer;
use serde::de::IntoDeserializer;
use serde::{Deserialize, Serialize};
use skillmatch_intelligence::{
    Complexity, Confidence, Developer, EngineError, EngineResult, TaskSignals, WorkloadSnapshot,
};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Confidence assigned to signals read off structured labels.
pub const LABEL_CONFIDENCE: f64 = 0.6;

/// A task as a caller describes it, before classification.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskDescription {
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Where the task came from (tracker name, repository).
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub labels: Vec<String>,
    /// Signals already extracted upstream.
    #[serde(default)]
    pub signals: Option<TaskSignals>,
}

/// Source of developers and their committed workloads.
#[async_trait]
pub trait DeveloperDirectory: Send + Sync {
    async fn developers(&self) -> EngineResult<Vec<Developer>>;
    /// Current workload for one developer; `None` when nothing is committed.
    async fn workload(&self, developer_id: &str) -> EngineResult<Option<WorkloadSnapshot>>;
}

/// Extracts structured requirements from a task description.
#[async_trait]
pub trait SignalClassifier: Send + Sync {
    async fn classify(&self, task: &TaskDescription) -> EngineResult<TaskSignals>;
}

/// In-memory directory for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct MemoryDirectory {
    developers: Vec<Developer>,
    workloads: BTreeMap<String, WorkloadSnapshot>,
}

impl MemoryDirectory {
    pub fn new(developers: Vec<Developer>, workloads: Vec<WorkloadSnapshot>) -> Self {
        let workloads = workloads
            .into_iter()
            .map(|w| (w.developer_id.clone(), w))
            .collect();
        Self {
            developers,
            workloads,
        }
    }
}

#[async_trait]
impl DeveloperDirectory for MemoryDirectory {
    async fn developers(&self) -> EngineResult<Vec<Developer>> {
        Ok(self.developers.clone())
    }

    async fn workload(&self, developer_id: &str) -> EngineResult<Option<WorkloadSnapshot>> {
        Ok(self.workloads.get(developer_id).cloned())
    }
}

/// On-disk shape of a workspace file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkspaceFile {
    #[serde(default)]
    pub developers: Vec<Developer>,
    #[serde(default)]
    pub workloads: Vec<WorkloadSnapshot>,
}

/// Directory backed by a workspace JSON file with `developers` and `workloads`.
///
/// The file is read once by [`JsonWorkspaceDirectory::open`]; every call
/// afterwards serves that snapshot.
#[derive(Debug, Clone)]
pub struct JsonWorkspaceDirectory {
    path: PathBuf,
    inner: MemoryDirectory,
}

impl JsonWorkspaceDirectory {
    const DEPENDENCY: &'static str = "workspace directory";

    pub async fn open(path: impl AsRef<Path>) -> EngineResult<Self> {
        let path = path.as_ref().to_path_buf();
        let text = tokio::fs::read_to_string(&path).await.map_err(|e| {
            EngineError::dependency_unavailable(
                Self::DEPENDENCY,
                format!("failed to read {}: {e}", path.display()),
            )
        })?;
        let file: WorkspaceFile = serde_json::from_str(&text).map_err(|e| {
            EngineError::dependency_unavailable(
                Self::DEPENDENCY,
                format!("failed to parse {}: {e}", path.display()),
            )
        })?;
        tracing::debug!(
            target: "skillmatch::service",
            path = %path.display(),
            developers = file.developers.len(),
            workloads = file.workloads.len(),
            "Loaded workspace file"
        );
        Ok(Self {
            path,
            inner: MemoryDirectory::new(file.developers, file.workloads),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl DeveloperDirectory for JsonWorkspaceDirectory {
    async fn developers(&self) -> EngineResult<Vec<Developer>> {
        self.inner.developers().await
    }

    async fn workload(&self, developer_id: &str) -> EngineResult<Option<WorkloadSnapshot>> {
        self.inner.workload(developer_id).await
    }
}

/// Classifier that reads structured labels.
///
/// `skill:x` marks a required skill, `prefer:x` a preferred one, and
/// `domain:`, `complexity:`, `effort:` set the matching fields. Any other
/// label becomes a keyword.
#[derive(Debug, Clone, Copy, Default)]
pub struct LabelClassifier;

#[async_trait]
impl SignalClassifier for LabelClassifier {
    async fn classify(&self, task: &TaskDescription) -> EngineResult<TaskSignals> {
        let mut signals = TaskSignals {
            confidence: Confidence::new(LABEL_CONFIDENCE)?,
            ..Default::default()
        };
        for label in &task.labels {
            let label = label.trim();
            if label.is_empty() {
                continue;
            }
            match label.split_once(':').map(|(k, v)| (k.trim(), v.trim())) {
                Some((key, value)) if value.is_empty() => {
                    tracing::trace!(
                        target: "skillmatch::service",
                        key,
                        "Skipping empty label value"
                    );
                }
                Some(("skill", value)) => signals.required_skills.push(value.to_string()),
                Some(("prefer", value)) => signals.preferred_skills.push(value.to_string()),
                Some(("domain", value)) => signals.domain = Some(value.to_string()),
                Some(("complexity", value)) => signals.complexity = parse_complexity(value),
                Some(("effort", value)) => signals.estimated_effort = Some(value.to_string()),
                _ => signals.keywords.push(label.to_string()),
            }
        }
        Ok(signals)
    }
}

fn parse_complexity(value: &str) -> Complexity {
    let lowered = value.to_ascii_lowercase();
    let de: StrDeserializer<'_, serde::de::value::Error> = lowered.as_str().into_deserializer();
    Complexity::deserialize(de).unwrap_or(Complexity::Unknown)
}

/// Classifier that returns signals produced upstream.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrecomputedClassifier;

#[async_trait]
impl SignalClassifier for PrecomputedClassifier {
    async fn classify(&self, task: &TaskDescription) -> EngineResult<TaskSignals> {
        let signals = task.signals.clone().ok_or_else(|| {
            EngineError::invalid_input(
                "signals",
                format!("no precomputed signals supplied for '{}'", task.title),
            )
        })?;
        signals.validate()?;
        Ok(signals)
    }
}
