//! Common types shared across engine modules.

use crate::error::EngineError;
use serde::{Deserialize, Serialize};

/// Trust weight of a classifier-derived signal, always within [0.0, 1.0].
///
/// Unlike a clamping newtype, out-of-range input is rejected: a malformed
/// confidence is a caller error and must not be coerced into a valid one.
///
/// # Examples
///
/// ```
/// use skillmatch_intelligence::Confidence;
///
/// let c = Confidence::new(0.75).unwrap();
/// assert_eq!(c.value(), 0.75);
///
/// assert!(Confidence::new(1.5).is_err());
/// assert!(Confidence::new(f64::NAN).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Confidence(f64);

impl Confidence {
    /// Create a new Confidence, rejecting values outside [0.0, 1.0].
    pub fn new(value: f64) -> Result<Self, EngineError> {
        if value.is_finite() && (0.0..=1.0).contains(&value) {
            Ok(Self(value))
        } else {
            Err(EngineError::invalid_input(
                "confidence",
                format!("must be within [0, 1], got {value}"),
            ))
        }
    }

    /// Get the inner confidence value.
    #[must_use]
    pub fn value(&self) -> f64 {
        self.0
    }

    /// Create a full confidence score (1.0).
    #[must_use]
    pub fn full() -> Self {
        Self(1.0)
    }
}

impl Default for Confidence {
    fn default() -> Self {
        Self::full()
    }
}

impl TryFrom<f64> for Confidence {
    type Error = EngineError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Confidence> for f64 {
    fn from(conf: Confidence) -> Self {
        conf.0
    }
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

/// Round a score to two decimals.
///
/// Every reported score passes through here so that equal inputs compare
/// equal and reports stay readable.
#[must_use]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Clamp to the [0, 100] score range.
#[must_use]
pub fn clamp_score(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 100.0)
}

/// Normalize a skill, domain, or tool name for comparison.
///
/// Returns `None` for names that are empty after trimming.
#[must_use]
pub fn normalize_skill(name: &str) -> Option<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

/// Percentile rank of `value` within a sorted distribution, in [0.0, 1.0].
///
/// Ties count half, so a value equal to every member ranks at 0.5. An empty
/// distribution yields the neutral 0.5.
#[must_use]
pub fn percentile_rank(value: f64, sorted: &[f64]) -> f64 {
    if sorted.is_empty() {
        return 0.5;
    }
    let below = sorted.partition_point(|v| *v < value);
    let not_above = sorted.partition_point(|v| *v <= value);
    let equal = not_above - below;
    (below as f64 + 0.5 * equal as f64) / sorted.len() as f64
}

/// Arithmetic mean, 0.0 for an empty slice.
#[must_use]
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_rejects_high_values() {
        assert!(Confidence::new(1.5).is_err());
    }

    #[test]
    fn test_confidence_rejects_low_values() {
        assert!(Confidence::new(-0.5).is_err());
    }

    #[test]
    fn test_confidence_preserves_valid_values() {
        assert_eq!(Confidence::new(0.75).unwrap().value(), 0.75);
        assert_eq!(Confidence::new(0.0).unwrap().value(), 0.0);
        assert_eq!(Confidence::new(1.0).unwrap().value(), 1.0);
    }

    #[test]
    fn test_confidence_serde_rejects_out_of_range() {
        let parsed: Result<Confidence, _> = serde_json::from_str("1.2");
        assert!(parsed.is_err());

        let ok: Confidence = serde_json::from_str("0.85").unwrap();
        assert_eq!(ok.value(), 0.85);
        assert_eq!(serde_json::to_string(&ok).unwrap(), "0.85");
    }

    #[test]
    fn test_confidence_display() {
        assert_eq!(format!("{}", Confidence::new(0.756).unwrap()), "0.76");
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(48.754), 48.75);
        assert_eq!(round2(0.005), 0.01);
    }

    #[test]
    fn test_clamp_score_handles_nan() {
        assert_eq!(clamp_score(f64::NAN), 0.0);
        assert_eq!(clamp_score(120.0), 100.0);
        assert_eq!(clamp_score(-3.0), 0.0);
    }

    #[test]
    fn test_normalize_skill() {
        assert_eq!(normalize_skill("  Python "), Some("python".to_string()));
        assert_eq!(normalize_skill("   "), None);
    }

    #[test]
    fn test_percentile_rank_ties_count_half() {
        let dist = vec![10.0, 20.0, 20.0, 30.0];
        assert_eq!(percentile_rank(5.0, &dist), 0.0);
        assert_eq!(percentile_rank(20.0, &dist), 0.5);
        assert_eq!(percentile_rank(40.0, &dist), 1.0);
        assert_eq!(percentile_rank(1.0, &[]), 0.5);
    }
}
