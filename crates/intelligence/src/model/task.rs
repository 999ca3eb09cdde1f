//! Tasks, developers, and effort estimation.

use super::{SkillFingerprint, TaskSignals};
use crate::config::WorkloadPolicy;
use crate::error::{EngineError, EngineResult};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::LazyLock;

/// A unit of work to be matched or allocated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub signals: TaskSignals,
    /// Urgency, 1 being the most urgent.
    #[serde(default)]
    pub priority: Option<u8>,
}

impl Task {
    /// Hours this task is expected to take.
    pub fn estimated_hours(&self, policy: &WorkloadPolicy) -> f64 {
        self.signals
            .estimated_effort
            .as_deref()
            .and_then(|effort| parse_effort_hours(effort, policy))
            .or_else(|| self.signals.complexity.default_hours())
            .unwrap_or(policy.default_task_hours)
    }
}

/// A developer eligible for assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Developer {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub fingerprint: SkillFingerprint,
    /// Hours per planning period; the workspace default applies when unset.
    #[serde(default)]
    pub capacity_hours: Option<f64>,
}

impl Developer {
    pub fn capacity(&self, policy: &WorkloadPolicy) -> f64 {
        self.capacity_hours
            .unwrap_or(policy.default_capacity_hours)
    }

    /// Name for reports, falling back to the id.
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            &self.id
        } else {
            &self.name
        }
    }

    pub fn validate(&self) -> EngineResult<()> {
        if self.id.trim().is_empty() {
            return Err(EngineError::invalid_input(
                "developer.id",
                "must not be blank",
            ));
        }
        if let Some(capacity) = self.capacity_hours {
            if !capacity.is_finite() || capacity <= 0.0 {
                return Err(EngineError::invalid_input(
                    format!("capacity_hours[{}]", self.id),
                    format!("must be positive, got {capacity}"),
                ));
            }
        }
        self.fingerprint.validate()
    }
}

/// Validate task ids and signals for a batch request.
pub fn validate_tasks(tasks: &[Task]) -> EngineResult<()> {
    let mut seen = BTreeSet::new();
    for task in tasks {
        if task.id.trim().is_empty() {
            return Err(EngineError::invalid_input("task.id", "must not be blank"));
        }
        if !seen.insert(task.id.as_str()) {
            return Err(EngineError::invalid_input(
                "task.id",
                format!("duplicate task id '{}'", task.id),
            ));
        }
        task.signals.validate()?;
    }
    Ok(())
}

static EFFORT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^\s*(\d+(?:\.\d+)?)\s*(h|hr|hrs|hours?|d|days?|w|wks?|weeks?|sp|pts?|points?)?\s*$",
    )
    .expect("effort pattern is valid")
});

/// Parse a free-form effort estimate into hours.
///
/// Accepts `"6h"`, `"2 days"`, `"1w"`, `"3sp"`, bare numbers (hours), and
/// T-shirt sizes. Returns `None` for anything else.
pub fn parse_effort_hours(effort: &str, policy: &WorkloadPolicy) -> Option<f64> {
    let lower = effort.trim().to_lowercase();
    let shirt = match lower.as_str() {
        "xs" | "tiny" => Some(2.0),
        "s" | "small" => Some(4.0),
        "m" | "medium" => Some(8.0),
        "l" | "large" => Some(16.0),
        "xl" | "huge" => Some(32.0),
        _ => None,
    };
    if shirt.is_some() {
        return shirt;
    }

    let caps = EFFORT_RE.captures(&lower)?;
    let amount: f64 = caps.get(1)?.as_str().parse().ok()?;
    let unit = caps.get(2).map(|m| m.as_str()).unwrap_or("h");
    let hours = match unit.chars().next() {
        Some('d') => amount * policy.hours_per_day,
        Some('w') => amount * policy.hours_per_day * 5.0,
        Some('s') | Some('p') => amount * policy.hours_per_point,
        _ => amount,
    };
    (hours > 0.0).then_some(hours)
}
