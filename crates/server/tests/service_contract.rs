//! MatchingService behaviour over in-memory and file-backed collaborators.

use async_trait::async_trait;
use skillmatch_intelligence::{
    Developer, EngineConfig, EngineError, EngineResult, SprintOutlook, SprintPlan, TaskSignals,
    UnassignedReason, WorkloadSnapshot,
};
use skillmatch_server::{
    DeveloperDirectory, JsonWorkspaceDirectory, LabelClassifier, MatchingService,
    MemoryDirectory, SignalClassifier, TaskDescription,
};
use skillmatch_test_utils::{
    developer, python_django_pair, task, workload, FingerprintBuilder, WorkspaceFixture,
};
use std::collections::BTreeMap;
use std::sync::Arc;

fn service(directory: impl DeveloperDirectory + 'static) -> MatchingService {
    MatchingService::new(
        EngineConfig::default(),
        Arc::new(directory),
        Arc::new(LabelClassifier),
    )
    .expect("default config is valid")
}

fn rust_pair() -> MemoryDirectory {
    let fp = FingerprintBuilder::new().language("rust", 75.0, 50, 5_000).build();
    MemoryDirectory::new(
        vec![developer("x", fp.clone()), developer("y", fp)],
        vec![workload("x", 1, 8.0)],
    )
}

/// Directory whose workload lookups always fail.
struct FlakyDirectory;

#[async_trait]
impl DeveloperDirectory for FlakyDirectory {
    async fn developers(&self) -> EngineResult<Vec<Developer>> {
        let (a, b) = python_django_pair();
        Ok(vec![a, b])
    }

    async fn workload(&self, _developer_id: &str) -> EngineResult<Option<WorkloadSnapshot>> {
        Err(EngineError::dependency_unavailable(
            "workload store",
            "connection refused",
        ))
    }
}

struct DownClassifier;

#[async_trait]
impl SignalClassifier for DownClassifier {
    async fn classify(&self, _task: &TaskDescription) -> EngineResult<TaskSignals> {
        Err(EngineError::dependency_unavailable("classifier", "timed out"))
    }
}

/// Directory whose calls never complete.
struct HungDirectory;

#[async_trait]
impl DeveloperDirectory for HungDirectory {
    async fn developers(&self) -> EngineResult<Vec<Developer>> {
        std::future::pending().await
    }

    async fn workload(&self, _developer_id: &str) -> EngineResult<Option<WorkloadSnapshot>> {
        std::future::pending().await
    }
}

/// Directory that lists developers promptly but hangs on workloads.
struct SlowWorkloads;

#[async_trait]
impl DeveloperDirectory for SlowWorkloads {
    async fn developers(&self) -> EngineResult<Vec<Developer>> {
        let (a, b) = python_django_pair();
        Ok(vec![a, b])
    }

    async fn workload(&self, _developer_id: &str) -> EngineResult<Option<WorkloadSnapshot>> {
        std::future::pending().await
    }
}

struct HungClassifier;

#[async_trait]
impl SignalClassifier for HungClassifier {
    async fn classify(&self, _task: &TaskDescription) -> EngineResult<TaskSignals> {
        std::future::pending().await
    }
}

fn short_timeout() -> EngineConfig {
    let mut config = EngineConfig::default();
    config.dependencies.timeout_ms = 50;
    config
}

fn assert_timed_out(err: EngineError, expected: &str) {
    match err {
        EngineError::DependencyUnavailable {
            dependency,
            message,
        } => {
            assert_eq!(dependency, expected);
            assert_eq!(message, "timed out after 50ms");
        }
        other => panic!("expected a timeout, got {other:?}"),
    }
}

fn labelled(labels: &[&str]) -> TaskDescription {
    TaskDescription {
        title: "Build API".into(),
        labels: labels.iter().map(|l| l.to_string()).collect(),
        ..Default::default()
    }
}

#[tokio::test]
async fn match_task_classifies_labels_and_ranks() {
    let (a, b) = python_django_pair();
    let service = service(MemoryDirectory::new(vec![a, b], vec![]));

    let result = service
        .match_task(&labelled(&["skill:python", "skill:django"]))
        .await
        .unwrap();

    assert_eq!(result.task_signals.confidence.value(), 0.6);
    let ids: Vec<&str> = result
        .candidates
        .iter()
        .map(|c| c.developer_id.as_str())
        .collect();
    assert_eq!(ids, vec!["b", "a"]);
    assert_eq!(result.candidates[0].match_score.overall_score, 48.75);
    // The missing-django penalty scales with the lower label confidence.
    assert_eq!(result.candidates[1].match_score.overall_score, 40.0);
}

#[tokio::test]
async fn workload_failure_surfaces_as_dependency_unavailable() {
    let service = service(FlakyDirectory);
    let err = service
        .match_task(&labelled(&["skill:python"]))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        EngineError::DependencyUnavailable { ref dependency, .. } if dependency == "workload store"
    ));
}

#[tokio::test]
async fn classifier_failure_is_never_scored() {
    let (a, b) = python_django_pair();
    let service = MatchingService::new(
        EngineConfig::default(),
        Arc::new(MemoryDirectory::new(vec![a, b], vec![])),
        Arc::new(DownClassifier),
    )
    .unwrap();
    let err = service.match_task(&labelled(&[])).await.unwrap_err();
    assert!(matches!(err, EngineError::DependencyUnavailable { .. }));
}

#[tokio::test]
async fn hung_directory_times_out_as_dependency_unavailable() {
    let service = MatchingService::new(
        short_timeout(),
        Arc::new(HungDirectory),
        Arc::new(LabelClassifier),
    )
    .unwrap();
    let outcome = tokio::time::timeout(
        std::time::Duration::from_secs(5),
        service.team_skill_gaps(&["rust".to_string()]),
    )
    .await
    .expect("service call is bounded by the dependency timeout");
    assert_timed_out(outcome.unwrap_err(), "developer directory");
}

#[tokio::test]
async fn hung_workload_lookup_times_out() {
    let service = MatchingService::new(
        short_timeout(),
        Arc::new(SlowWorkloads),
        Arc::new(LabelClassifier),
    )
    .unwrap();
    let err = service.benchmark("a", None).await.unwrap_err();
    assert_timed_out(err, "developer directory");
}

#[tokio::test]
async fn hung_classifier_times_out() {
    let (a, b) = python_django_pair();
    let service = MatchingService::new(
        short_timeout(),
        Arc::new(MemoryDirectory::new(vec![a, b], vec![])),
        Arc::new(HungClassifier),
    )
    .unwrap();
    let err = service
        .match_task(&labelled(&["skill:python"]))
        .await
        .unwrap_err();
    assert_timed_out(err, "signal classifier");
}

#[tokio::test]
async fn optimize_counts_committed_tasks_against_the_limit() {
    let service = service(rust_pair());
    let tasks: Vec<_> = (1..=3).map(|i| task(&format!("T{i}"), &["rust"])).collect();

    let scenario = service
        .optimize_assignments(&tasks, Some(2), None)
        .await
        .unwrap();

    // x already holds one task, so only one more fits there; y takes two.
    assert_eq!(scenario.team_impact.assigned_tasks, 3);
    let on_x = scenario
        .assignments
        .iter()
        .filter(|a| a.developer_id == "x")
        .count();
    assert_eq!(on_x, 1);
}

#[tokio::test]
async fn optimize_overrides_current_workloads() {
    let service = service(rust_pair());
    let tasks: Vec<_> = (1..=3).map(|i| task(&format!("T{i}"), &["rust"])).collect();
    let mut current = BTreeMap::new();
    current.insert("x".to_string(), 2);
    current.insert("y".to_string(), 1);

    let scenario = service
        .optimize_assignments(&tasks, Some(2), Some(&current))
        .await
        .unwrap();

    assert_eq!(scenario.team_impact.assigned_tasks, 1);
    assert!(scenario
        .team_impact
        .unassigned
        .iter()
        .all(|u| u.reason == UnassignedReason::CapacityExhausted));
}

#[tokio::test]
async fn non_positive_max_is_a_caller_error() {
    let err = service(rust_pair())
        .optimize_assignments(&[task("T1", &["rust"])], Some(-3), None)
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::InvalidCapacity(-3));
    assert!(err.is_caller_error());
}

#[tokio::test]
async fn benchmark_reads_a_workspace_file() {
    let fixture = WorkspaceFixture::new().unwrap();
    let fp = |p| FingerprintBuilder::new().language("go", p, 10, 1_000).build();
    let developers = vec![
        developer("a", fp(90.0)),
        developer("b", fp(60.0)),
        developer("c", fp(40.0)),
        developer("d", fp(20.0)),
    ];
    let path = fixture.write_workspace("ws.json", &developers, &[]).unwrap();

    let directory = JsonWorkspaceDirectory::open(&path).await.unwrap();
    assert_eq!(directory.path(), path.as_path());
    let result = service(directory).benchmark("b", None).await.unwrap();

    assert_eq!(result.peer_group_size, 3);
    assert!(result.statistically_reliable);
    assert_eq!(result.languages[0].skill, "go");
    assert!(result.percentile_overall.is_some());
}

#[tokio::test]
async fn sprint_prediction_packs_by_priority() {
    let service = service(rust_pair());
    let mut urgent = task("T2", &["rust"]);
    urgent.priority = Some(1);
    let mut later = task("T1", &["rust"]);
    later.priority = Some(2);
    let mut overrides = BTreeMap::new();
    overrides.insert("y".to_string(), 10.0);
    let plan = SprintPlan {
        sprint_id: "S1".into(),
        name: String::new(),
        tasks: vec![later, urgent],
        developer_ids: Some(vec!["y".into()]),
        capacity_overrides: overrides,
        max_per_developer: None,
    };

    let prediction = service.sprint_prediction(&plan).await.unwrap();
    assert_eq!(prediction.predicted_completed, vec!["T2".to_string()]);
    assert_eq!(prediction.at_risk, vec!["T1".to_string()]);
    assert_eq!(prediction.outlook, SprintOutlook::OffTrack);

    let suggestions = service.sprint_suggestions(&plan).await.unwrap();
    assert_eq!(suggestions.scenario_name, "sprint S1");
    assert!(suggestions
        .assignments
        .iter()
        .all(|a| a.developer_id == "y"));
}

#[tokio::test]
async fn compare_prefers_the_better_scenario() {
    let service = service(rust_pair());
    let tasks = vec![task("T1", &["rust"]), task("T2", &["rust"])];
    let proposal = vec![skillmatch_intelligence::ProposedAssignment {
        task_id: "T1".into(),
        developer_id: "x".into(),
    }];

    let proposed = service
        .create_what_if_scenario("manual", &tasks, &proposal, None)
        .await
        .unwrap();
    let optimized = service.optimize_assignments(&tasks, None, None).await.unwrap();
    let diff = service.compare_scenarios(&proposed, &optimized).await;

    assert_eq!(diff.scenario_a, "manual");
    assert_eq!(diff.deltas.assigned_tasks, 1);
}
