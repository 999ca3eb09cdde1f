//! Multi-factor match scoring.

use super::explainer::{self, Evidence};
use super::{CohortStats, MatchScore};
use crate::config::EngineConfig;
use crate::model::{SkillProfile, TaskSignals, Trend};
use crate::types::{clamp_score, mean, round2};
use crate::workload::LoadContext;
use std::collections::{BTreeMap, BTreeSet};

/// Trait for computing task x developer fit.
pub trait Scorer {
    /// Score one developer against one task's signals.
    ///
    /// Total over well-formed input: empty signals or an empty fingerprint
    /// yield a zero score with a `gaps` reason instead of an error.
    fn score(&self, task: &TaskSignals, developer: &SkillProfile, load: &LoadContext)
        -> MatchScore;
}

/// Scorer parameterized by workspace policy and a cohort for normalization.
#[derive(Debug, Clone, Copy)]
pub struct MatchScorer<'a> {
    config: &'a EngineConfig,
    cohort: &'a CohortStats,
}

impl<'a> MatchScorer<'a> {
    pub fn new(config: &'a EngineConfig, cohort: &'a CohortStats) -> Self {
        Self { config, cohort }
    }

    /// Proficiency-weighted coverage of required and preferred skills, less
    /// a confidence-scaled penalty for required skills the developer lacks.
    fn skill_match(
        &self,
        required: &BTreeSet<String>,
        preferred: &BTreeSet<String>,
        confidence: f64,
        profile: &SkillProfile,
    ) -> f64 {
        let policy = &self.config.skill_match;
        let coverage = |skills: &BTreeSet<String>| {
            let values: Vec<f64> = skills
                .iter()
                .map(|s| profile.proficiency(s) / 100.0)
                .collect();
            mean(&values)
        };

        let (wr, wp) = match (required.is_empty(), preferred.is_empty()) {
            (false, false) => {
                let total = policy.required_weight + policy.preferred_weight;
                (policy.required_weight / total, policy.preferred_weight / total)
            }
            (false, true) => (1.0, 0.0),
            (true, false) => (0.0, 1.0),
            (true, true) => return 0.0,
        };

        let base = 100.0 * (wr * coverage(required) + wp * coverage(preferred));
        let penalty = if required.is_empty() {
            0.0
        } else {
            let missing = required.iter().filter(|s| !profile.holds(s)).count();
            policy.missing_required_penalty * confidence * missing as f64 / required.len() as f64
        };

        round2(clamp_score(base - penalty))
    }

    /// Experience on a single skill, normalized against the cohort.
    fn skill_experience(&self, skill: &str, profile: &SkillProfile) -> f64 {
        let policy = &self.config.experience;
        let Some(entry) = profile.entry(skill) else {
            return 0.0;
        };

        if let (Some(p), Some(volume)) = (entry.language, entry.language_volume) {
            if p > 0.0 {
                let rank = (self.cohort.commits_rank(skill, volume.commits)
                    + self.cohort.lines_rank(skill, volume.lines_of_code))
                    / 2.0;
                let trend = match volume.trend {
                    Trend::Growing => policy.growing_bonus,
                    Trend::Stable => 0.0,
                    Trend::Declining => -policy.declining_penalty,
                };
                return clamp_score(100.0 * rank + trend);
            }
        }
        if let (Some(p), Some(usage)) = (entry.framework, entry.framework_usage) {
            if p > 0.0 {
                return clamp_score(100.0 * self.cohort.usage_rank(skill, usage));
            }
        }
        // Held without volume data (domain or tool only).
        clamp_score(profile.proficiency(skill) * policy.unmeasured_factor)
    }
}

impl Scorer for MatchScorer<'_> {
    fn score(
        &self,
        task: &TaskSignals,
        developer: &SkillProfile,
        load: &LoadContext,
    ) -> MatchScore {
        let required = task.required();
        let preferred = task.preferred();
        let skills: BTreeSet<String> = required.union(&preferred).cloned().collect();

        if skills.is_empty() {
            return MatchScore::zero("task signals name no skills");
        }
        if developer.is_empty() {
            return MatchScore::zero("developer has no skill fingerprint");
        }

        let confidence = task.confidence.value();
        let skill_match = self.skill_match(&required, &preferred, confidence, developer);

        let per_skill: BTreeMap<&str, f64> = skills
            .iter()
            .map(|s| (s.as_str(), self.skill_experience(s, developer)))
            .collect();
        let domain = task.normalized_domain();
        let mut experience_items: Vec<f64> = per_skill.values().copied().collect();
        if let Some(domain) = &domain {
            experience_items.push(developer.domain_score(domain));
        }
        let experience_match = round2(clamp_score(mean(&experience_items)));

        let weak: Vec<f64> = skills
            .iter()
            .filter(|s| developer.proficiency(s) < self.config.growth.weak_threshold)
            .map(|s| 100.0 - per_skill.get(s.as_str()).copied().unwrap_or(0.0))
            .collect();
        let growth_opportunity = round2(clamp_score(
            weak.len() as f64 / skills.len() as f64 * mean(&weak),
        ));

        let w = &self.config.weights;
        let weighted = w.skill * skill_match
            + w.experience * experience_match
            + w.growth * growth_opportunity;
        let overall_score = round2(clamp_score(weighted / w.sum()));

        let explanation = explainer::explain(&Evidence {
            required: &required,
            preferred: &preferred,
            domain: domain.as_deref(),
            profile: developer,
            confidence,
            low_confidence: self.config.skill_match.low_confidence,
            weak_threshold: self.config.growth.weak_threshold,
            load,
            skill_match,
            experience_match,
            growth_opportunity,
        });

        tracing::trace!(
            target: "skillmatch::scorer",
            overall_score,
            skill_match,
            experience_match,
            growth_opportunity,
            "Scored pair"
        );

        MatchScore {
            overall_score,
            skill_match,
            experience_match,
            growth_opportunity,
            reasoning: explanation.reasoning,
            strengths: explanation.strengths,
            gaps: explanation.gaps,
        }
    }
}
