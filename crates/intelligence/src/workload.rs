//! Workload tracking over immutable snapshots.
//!
//! The tracker never holds mutable state: callers pass the committed load
//! for each developer and every impact is computed by adding a proposed
//! allocation on top of that snapshot.

use crate::config::WorkloadPolicy;
use crate::error::{EngineError, EngineResult};
use crate::model::Developer;
use crate::types::round2;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Committed load for one developer, sourced from external persistence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkloadSnapshot {
    pub developer_id: String,
    #[serde(default)]
    pub current_tasks: u32,
    #[serde(default)]
    pub current_estimated_hours: f64,
}

/// Load classification against capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkloadStatus {
    Under,
    Balanced,
    Over,
}

impl WorkloadStatus {
    pub fn classify(hours: f64, capacity: f64, policy: &WorkloadPolicy) -> Self {
        if hours < policy.low_ratio * capacity {
            Self::Under
        } else if hours > policy.high_ratio * capacity {
            Self::Over
        } else {
            Self::Balanced
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Under => "under",
            Self::Balanced => "balanced",
            Self::Over => "over",
        }
    }
}

/// Effect of a scenario on one developer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkloadImpact {
    pub developer_id: String,
    pub developer_name: String,
    pub current_tasks: u32,
    pub assigned_tasks: u32,
    pub total_tasks: u32,
    pub current_hours: f64,
    /// Current plus assigned hours.
    pub estimated_hours: f64,
    pub capacity_hours: f64,
    /// Estimated hours as a percentage of capacity.
    pub utilization: f64,
    pub workload_status: WorkloadStatus,
}

/// A developer's committed load as seen by the scorer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoadContext {
    pub current_hours: f64,
    pub capacity_hours: f64,
    pub status: WorkloadStatus,
}

impl LoadContext {
    pub fn new(current_hours: f64, capacity_hours: f64, policy: &WorkloadPolicy) -> Self {
        Self {
            current_hours,
            capacity_hours,
            status: WorkloadStatus::classify(current_hours, capacity_hours, policy),
        }
    }

    /// An idle developer at the default capacity.
    pub fn idle(policy: &WorkloadPolicy) -> Self {
        Self::new(0.0, policy.default_capacity_hours, policy)
    }
}

/// Load a scenario adds to one developer.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AddedLoad {
    pub tasks: u32,
    pub hours: f64,
}

/// Developers plus their committed workloads, as one immutable snapshot.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    developers: Vec<Developer>,
    workloads: BTreeMap<String, WorkloadSnapshot>,
}

impl Roster {
    /// Build a roster, validating every developer and snapshot.
    ///
    /// Developers are ordered by id so results never depend on the order the
    /// directory returned them in.
    pub fn new(
        mut developers: Vec<Developer>,
        workloads: Vec<WorkloadSnapshot>,
    ) -> EngineResult<Self> {
        developers.sort_by(|a, b| a.id.cmp(&b.id));
        let mut ids = BTreeSet::new();
        for dev in &developers {
            dev.validate()?;
            if !ids.insert(dev.id.as_str()) {
                return Err(EngineError::invalid_input(
                    "developer.id",
                    format!("duplicate developer id '{}'", dev.id),
                ));
            }
        }

        let mut by_id = BTreeMap::new();
        for snapshot in workloads {
            if !ids.contains(snapshot.developer_id.as_str()) {
                return Err(EngineError::UnknownDeveloper(snapshot.developer_id));
            }
            let hours = snapshot.current_estimated_hours;
            if !hours.is_finite() || hours < 0.0 {
                return Err(EngineError::invalid_input(
                    format!("current_estimated_hours[{}]", snapshot.developer_id),
                    format!("must be a non-negative number, got {hours}"),
                ));
            }
            by_id.insert(snapshot.developer_id.clone(), snapshot);
        }

        Ok(Self {
            developers,
            workloads: by_id,
        })
    }

    pub fn developers(&self) -> &[Developer] {
        &self.developers
    }

    pub fn len(&self) -> usize {
        self.developers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.developers.is_empty()
    }

    pub fn developer(&self, id: &str) -> Option<&Developer> {
        self.position(id).map(|idx| &self.developers[idx])
    }

    /// Index of a developer in id order.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.developers
            .binary_search_by(|d| d.id.as_str().cmp(id))
            .ok()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.developer(id).is_some()
    }

    /// Committed load for a developer; zero when no snapshot was supplied.
    pub fn snapshot(&self, id: &str) -> WorkloadSnapshot {
        self.workloads
            .get(id)
            .cloned()
            .unwrap_or_else(|| WorkloadSnapshot {
                developer_id: id.to_string(),
                ..Default::default()
            })
    }

    /// Replace current task counts with caller-supplied ones.
    ///
    /// Overridden developers carry `count * default_task_hours` committed hours.
    pub fn with_task_counts(
        &self,
        counts: &BTreeMap<String, u32>,
        policy: &WorkloadPolicy,
    ) -> EngineResult<Self> {
        let mut workloads = self.workloads.clone();
        for (id, count) in counts {
            if !self.contains(id) {
                return Err(EngineError::UnknownDeveloper(id.clone()));
            }
            workloads.insert(
                id.clone(),
                WorkloadSnapshot {
                    developer_id: id.clone(),
                    current_tasks: *count,
                    current_estimated_hours: f64::from(*count) * policy.default_task_hours,
                },
            );
        }
        Ok(Self {
            developers: self.developers.clone(),
            workloads,
        })
    }

    /// Keep only the listed developers.
    pub fn restrict(&self, ids: &[String]) -> EngineResult<Self> {
        let wanted: BTreeSet<&str> = ids.iter().map(String::as_str).collect();
        for id in &wanted {
            if !self.contains(id) {
                return Err(EngineError::UnknownDeveloper((*id).to_string()));
            }
        }
        Ok(Self {
            developers: self
                .developers
                .iter()
                .filter(|d| wanted.contains(d.id.as_str()))
                .cloned()
                .collect(),
            workloads: self
                .workloads
                .iter()
                .filter(|(id, _)| wanted.contains(id.as_str()))
                .map(|(id, w)| (id.clone(), w.clone()))
                .collect(),
        })
    }

    /// Committed load of a developer before any new assignment.
    pub fn load_context(&self, developer: &Developer, policy: &WorkloadPolicy) -> LoadContext {
        let snapshot = self.snapshot(&developer.id);
        LoadContext::new(
            snapshot.current_estimated_hours,
            developer.capacity(policy),
            policy,
        )
    }

    /// Per-developer impact of adding `added` on top of the snapshot.
    ///
    /// Every developer appears, ordered by id.
    pub fn impacts(
        &self,
        added: &BTreeMap<String, AddedLoad>,
        policy: &WorkloadPolicy,
    ) -> Vec<WorkloadImpact> {
        self.developers
            .iter()
            .map(|dev| {
                let snapshot = self.snapshot(&dev.id);
                let extra = added.get(&dev.id).copied().unwrap_or_default();
                let capacity = dev.capacity(policy);
                let estimated = snapshot.current_estimated_hours + extra.hours;
                WorkloadImpact {
                    developer_id: dev.id.clone(),
                    developer_name: dev.display_name().to_string(),
                    current_tasks: snapshot.current_tasks,
                    assigned_tasks: extra.tasks,
                    total_tasks: snapshot.current_tasks.saturating_add(extra.tasks),
                    current_hours: round2(snapshot.current_estimated_hours),
                    estimated_hours: round2(estimated),
                    capacity_hours: round2(capacity),
                    utilization: round2(estimated / capacity * 100.0),
                    workload_status: WorkloadStatus::classify(estimated, capacity, policy),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SkillFingerprint;

    fn dev(id: &str, capacity: Option<f64>) -> Developer {
        Developer {
            id: id.into(),
            name: id.to_uppercase(),
            fingerprint: SkillFingerprint::default(),
            capacity_hours: capacity,
        }
    }

    fn snapshot(id: &str, tasks: u32, hours: f64) -> WorkloadSnapshot {
        WorkloadSnapshot {
            developer_id: id.into(),
            current_tasks: tasks,
            current_estimated_hours: hours,
        }
    }

    #[test]
    fn classify_uses_thresholds() {
        let policy = WorkloadPolicy::default();
        assert_eq!(
            WorkloadStatus::classify(10.0, 40.0, &policy),
            WorkloadStatus::Under
        );
        assert_eq!(
            WorkloadStatus::classify(20.0, 40.0, &policy),
            WorkloadStatus::Balanced
        );
        assert_eq!(
            WorkloadStatus::classify(40.0, 40.0, &policy),
            WorkloadStatus::Balanced
        );
        assert_eq!(
            WorkloadStatus::classify(41.0, 40.0, &policy),
            WorkloadStatus::Over
        );
    }

    #[test]
    fn custom_thresholds_shift_classification() {
        let policy = WorkloadPolicy {
            low_ratio: 0.2,
            high_ratio: 0.8,
            ..Default::default()
        };
        assert_eq!(
            WorkloadStatus::classify(10.0, 40.0, &policy),
            WorkloadStatus::Balanced
        );
        assert_eq!(
            WorkloadStatus::classify(33.0, 40.0, &policy),
            WorkloadStatus::Over
        );
    }

    #[test]
    fn roster_sorts_and_rejects_unknown_snapshots() {
        let roster = Roster::new(vec![dev("b", None), dev("a", None)], vec![]).unwrap();
        assert_eq!(roster.developers()[0].id, "a");

        let err = Roster::new(vec![dev("a", None)], vec![snapshot("zed", 1, 4.0)]).unwrap_err();
        assert_eq!(err, EngineError::UnknownDeveloper("zed".into()));
    }

    #[test]
    fn roster_rejects_duplicate_developers() {
        assert!(Roster::new(vec![dev("a", None), dev("a", None)], vec![]).is_err());
    }

    #[test]
    fn impacts_add_on_top_of_snapshot_without_mutating_it() {
        let policy = WorkloadPolicy::default();
        let roster = Roster::new(
            vec![dev("a", Some(20.0)), dev("b", None)],
            vec![snapshot("a", 2, 16.0)],
        )
        .unwrap();
        let mut added = BTreeMap::new();
        added.insert(
            "a".to_string(),
            AddedLoad {
                tasks: 1,
                hours: 8.0,
            },
        );

        let impacts = roster.impacts(&added, &policy);
        assert_eq!(impacts.len(), 2);
        assert_eq!(impacts[0].total_tasks, 3);
        assert_eq!(impacts[0].estimated_hours, 24.0);
        assert_eq!(impacts[0].utilization, 120.0);
        assert_eq!(impacts[0].workload_status, WorkloadStatus::Over);
        assert_eq!(impacts[1].workload_status, WorkloadStatus::Under);

        // The snapshot itself is untouched.
        assert_eq!(roster.snapshot("a").current_estimated_hours, 16.0);
    }

    #[test]
    fn task_count_overrides_replace_snapshot() {
        let policy = WorkloadPolicy::default();
        let roster = Roster::new(vec![dev("a", None)], vec![snapshot("a", 5, 30.0)]).unwrap();
        let mut counts = BTreeMap::new();
        counts.insert("a".to_string(), 1);
        let overridden = roster.with_task_counts(&counts, &policy).unwrap();
        assert_eq!(overridden.snapshot("a").current_tasks, 1);
        assert_eq!(overridden.snapshot("a").current_estimated_hours, 8.0);

        counts.insert("ghost".to_string(), 1);
        assert!(roster.with_task_counts(&counts, &policy).is_err());
    }

    #[test]
    fn restrict_rejects_unknown_ids() {
        let roster = Roster::new(vec![dev("a", None), dev("b", None)], vec![]).unwrap();
        assert_eq!(roster.restrict(&["b".to_string()]).unwrap().len(), 1);
        assert!(roster.restrict(&["c".to_string()]).is_err());
    }
}
