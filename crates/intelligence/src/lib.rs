//! Task-developer matching and assignment optimization.
//!
//! This crate provides:
//! - Match scoring between a task's signals and a developer's skill fingerprint
//! - Workload tracking over immutable snapshots
//! - Capacity-constrained assignment optimization (exact and heuristic)
//! - What-if simulation of proposed allocations and scenario comparison
//! - Peer benchmarking and team skill-gap analysis
//! - Sprint capacity, suggestions, and completion prediction
//!
//! Everything here is pure and synchronous: callers supply a [`Roster`]
//! snapshot and an [`EngineConfig`], and every operation returns a fresh
//! value without touching shared state.

pub mod benchmark;
pub mod config;
pub mod engine;
pub mod error;
pub mod model;
pub mod optimize;
pub mod rank;
pub mod score;
pub mod sprint;
pub mod types;
pub mod whatif;
pub mod workload;

#[cfg(test)]
mod test_support;

pub use benchmark::{
    BenchmarkResult, CoverageStatus, SkillBenchmark, SkillCategory, SkillCoverage, TeamSkillGaps,
};
pub use config::{
    AssignmentPolicy, BenchmarkPolicy, DependencyPolicy, EngineConfig, ExperiencePolicy,
    GrowthPolicy, ScoringWeights, SkillMatchPolicy, WorkloadPolicy,
};
pub use engine::{Engine, OPTIMIZED_SCENARIO_NAME};
pub use error::{EngineError, EngineResult};
pub use model::{
    Complexity, Developer, DomainExpertise, FrameworkSkill, LanguageSkill, SkillFingerprint,
    SkillProfile, Task, TaskSignals, Trend,
};
pub use optimize::ScoreMatrix;
pub use rank::{Candidate, TaskMatchResult};
pub use score::{CohortStats, MatchScore, MatchScorer, Scorer};
pub use sprint::{
    DeveloperCapacity, SprintCapacity, SprintOutlook, SprintPlan, SprintPrediction,
};
pub use types::Confidence;
pub use whatif::{
    AssignmentDiff, GrowthDistribution, ImpactDelta, Preference, ProposedAssignment,
    ScenarioAssignment, ScenarioComparison, ScenarioKind, Solver, TeamImpact, UnassignedReason,
    UnassignedTask, WhatIfScenario,
};
pub use workload::{LoadContext, Roster, WorkloadImpact, WorkloadSnapshot, WorkloadStatus};
