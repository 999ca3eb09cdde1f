//! Per-workspace engine policy.
//!
//! Every scorer and optimizer call receives an `EngineConfig`; nothing in the
//! engine reads module-level policy, so workspaces with different policies
//! can run side by side in one process.

use crate::error::{EngineError, EngineResult};
use serde::{Deserialize, Serialize};

/// Complete engine policy for one workspace.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Weights combining the three match sub-scores.
    pub weights: ScoringWeights,
    /// Skill overlap policy.
    pub skill_match: SkillMatchPolicy,
    /// Experience normalization policy.
    pub experience: ExperiencePolicy,
    /// Growth opportunity policy.
    pub growth: GrowthPolicy,
    /// Capacity and workload classification.
    pub workload: WorkloadPolicy,
    /// Allocation policy.
    pub assignment: AssignmentPolicy,
    /// Peer ranking and team coverage policy.
    pub benchmark: BenchmarkPolicy,
    /// Limits on calls to the developer directory and signal classifier.
    pub dependencies: DependencyPolicy,
}

/// Weights for `overall_score`; combined as a weighted mean.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    pub skill: f64,
    pub experience: f64,
    pub growth: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            skill: 0.5,
            experience: 0.3,
            growth: 0.2,
        }
    }
}

impl ScoringWeights {
    pub fn sum(&self) -> f64 {
        self.skill + self.experience + self.growth
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillMatchPolicy {
    /// Share of `skill_match` carried by required skills.
    pub required_weight: f64,
    /// Share of `skill_match` carried by preferred skills.
    pub preferred_weight: f64,
    /// Points removed when every required skill is missing at full confidence.
    pub missing_required_penalty: f64,
    /// Proficiency credited for a skill listed only as a tool.
    pub tool_proficiency: f64,
    /// Signal confidence below which rankings and reasoning are flagged as tentative.
    pub low_confidence: f64,
}

impl Default for SkillMatchPolicy {
    fn default() -> Self {
        Self {
            required_weight: 0.7,
            preferred_weight: 0.3,
            missing_required_penalty: 25.0,
            tool_proficiency: 50.0,
            low_confidence: 0.5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperiencePolicy {
    /// Bonus for a language whose usage is growing.
    pub growing_bonus: f64,
    /// Penalty for a language whose usage is declining.
    pub declining_penalty: f64,
    /// Discount applied to skills held without any volume data (domains, tools).
    pub unmeasured_factor: f64,
}

impl Default for ExperiencePolicy {
    fn default() -> Self {
        Self {
            growing_bonus: 10.0,
            declining_penalty: 10.0,
            unmeasured_factor: 0.5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrowthPolicy {
    /// Skills below this proficiency count as a stretch for the developer.
    pub weak_threshold: f64,
    /// Assignments at or above this growth score are "high".
    pub high_growth: f64,
    /// Assignments at or above this growth score are "moderate".
    pub moderate_growth: f64,
}

impl Default for GrowthPolicy {
    fn default() -> Self {
        Self {
            weak_threshold: 50.0,
            high_growth: 60.0,
            moderate_growth: 30.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkloadPolicy {
    /// Below `low_ratio * capacity` a developer is under-loaded.
    pub low_ratio: f64,
    /// Above `high_ratio * capacity` a developer is over-loaded.
    pub high_ratio: f64,
    /// Weekly capacity for developers without an explicit value.
    pub default_capacity_hours: f64,
    /// Hours for a task with no usable effort estimate or complexity.
    pub default_task_hours: f64,
    pub hours_per_day: f64,
    pub hours_per_point: f64,
}

impl Default for WorkloadPolicy {
    fn default() -> Self {
        Self {
            low_ratio: 0.5,
            high_ratio: 1.0,
            default_capacity_hours: 40.0,
            default_task_hours: 8.0,
            hours_per_day: 8.0,
            hours_per_point: 4.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssignmentPolicy {
    /// Pairs scoring below this are never assigned by the optimizer.
    pub min_viable_score: f64,
    /// Largest task x developer matrix solved exactly.
    pub exact_pair_limit: usize,
}

impl Default for AssignmentPolicy {
    fn default() -> Self {
        Self {
            min_viable_score: 30.0,
            exact_pair_limit: 20_000,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchmarkPolicy {
    /// Smallest peer group that yields a reported percentile.
    pub min_peer_group_size: usize,
    /// Score at which a developer counts as an expert in a skill.
    pub expert_threshold: f64,
    /// Score at which a developer counts as a practitioner.
    pub practitioner_threshold: f64,
    /// Experts needed before a skill is considered well covered.
    pub min_experts: usize,
}

impl Default for BenchmarkPolicy {
    fn default() -> Self {
        Self {
            min_peer_group_size: 3,
            expert_threshold: 70.0,
            practitioner_threshold: 40.0,
            min_experts: 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DependencyPolicy {
    /// Longest a single collaborator call may take before it counts as unavailable.
    pub timeout_ms: u64,
}

impl Default for DependencyPolicy {
    fn default() -> Self {
        Self { timeout_ms: 10_000 }
    }
}

impl EngineConfig {
    /// Check every policy against its own constraints.
    pub fn validate(&self) -> EngineResult<()> {
        let w = &self.weights;
        for (name, value) in [
            ("weights.skill", w.skill),
            ("weights.experience", w.experience),
            ("weights.growth", w.growth),
            ("skill_match.required_weight", self.skill_match.required_weight),
            ("skill_match.preferred_weight", self.skill_match.preferred_weight),
            (
                "skill_match.missing_required_penalty",
                self.skill_match.missing_required_penalty,
            ),
            ("experience.growing_bonus", self.experience.growing_bonus),
            ("experience.declining_penalty", self.experience.declining_penalty),
            ("workload.low_ratio", self.workload.low_ratio),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(EngineError::InvalidConfig(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
        }
        if w.sum() <= 0.0 {
            return Err(EngineError::InvalidConfig(
                "scoring weights must not all be zero".into(),
            ));
        }
        if self.skill_match.required_weight + self.skill_match.preferred_weight <= 0.0 {
            return Err(EngineError::InvalidConfig(
                "required_weight and preferred_weight must not both be zero".into(),
            ));
        }
        for (name, value) in [
            ("skill_match.tool_proficiency", self.skill_match.tool_proficiency),
            ("growth.weak_threshold", self.growth.weak_threshold),
            ("growth.high_growth", self.growth.high_growth),
            ("growth.moderate_growth", self.growth.moderate_growth),
            ("assignment.min_viable_score", self.assignment.min_viable_score),
            ("benchmark.expert_threshold", self.benchmark.expert_threshold),
            (
                "benchmark.practitioner_threshold",
                self.benchmark.practitioner_threshold,
            ),
        ] {
            if !(0.0..=100.0).contains(&value) {
                return Err(EngineError::InvalidConfig(format!(
                    "{name} must be within [0, 100], got {value}"
                )));
            }
        }
        if !(0.0..=1.0).contains(&self.skill_match.low_confidence) {
            return Err(EngineError::InvalidConfig(format!(
                "skill_match.low_confidence must be within [0, 1], got {}",
                self.skill_match.low_confidence
            )));
        }
        if !(0.0..=1.0).contains(&self.experience.unmeasured_factor) {
            return Err(EngineError::InvalidConfig(format!(
                "experience.unmeasured_factor must be within [0, 1], got {}",
                self.experience.unmeasured_factor
            )));
        }
        if self.growth.moderate_growth > self.growth.high_growth {
            return Err(EngineError::InvalidConfig(
                "growth.moderate_growth must not exceed growth.high_growth".into(),
            ));
        }
        let wl = &self.workload;
        if !wl.high_ratio.is_finite() || wl.high_ratio <= 0.0 || wl.low_ratio > wl.high_ratio {
            return Err(EngineError::InvalidConfig(format!(
                "workload thresholds must satisfy 0 <= low_ratio <= high_ratio and high_ratio > 0 (low {}, high {})",
                wl.low_ratio, wl.high_ratio
            )));
        }
        for (name, value) in [
            ("workload.default_capacity_hours", wl.default_capacity_hours),
            ("workload.default_task_hours", wl.default_task_hours),
            ("workload.hours_per_day", wl.hours_per_day),
            ("workload.hours_per_point", wl.hours_per_point),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(EngineError::InvalidConfig(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }
        if self.benchmark.practitioner_threshold > self.benchmark.expert_threshold {
            return Err(EngineError::InvalidConfig(
                "benchmark.practitioner_threshold must not exceed benchmark.expert_threshold"
                    .into(),
            ));
        }
        if self.benchmark.min_experts == 0 {
            return Err(EngineError::InvalidConfig(
                "benchmark.min_experts must be at least 1".into(),
            ));
        }
        if self.dependencies.timeout_ms == 0 {
            return Err(EngineError::InvalidConfig(
                "dependencies.timeout_ms must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
