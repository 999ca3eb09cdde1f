//! Human-readable reasoning for match scores.

use crate::model::{SkillProfile, Trend};
use crate::workload::{LoadContext, WorkloadStatus};
use std::collections::BTreeSet;

/// Proficiency at which a skill is called out as a strength.
const STRENGTH_THRESHOLD: f64 = 70.0;

/// Everything the explainer needs from one scoring pass.
pub(super) struct Evidence<'a> {
    pub required: &'a BTreeSet<String>,
    pub preferred: &'a BTreeSet<String>,
    pub domain: Option<&'a str>,
    pub profile: &'a SkillProfile,
    pub confidence: f64,
    /// Below this confidence the reasoning flags the signals as uncertain.
    pub low_confidence: f64,
    pub weak_threshold: f64,
    pub load: &'a LoadContext,
    pub skill_match: f64,
    pub experience_match: f64,
    pub growth_opportunity: f64,
}

pub(super) struct Explanation {
    pub reasoning: String,
    pub strengths: Vec<String>,
    pub gaps: Vec<String>,
}

pub(super) fn explain(ev: &Evidence<'_>) -> Explanation {
    let mut strengths = Vec::new();
    let mut gaps = Vec::new();

    for skill in ev.required.iter().chain(ev.preferred.iter()) {
        let proficiency = ev.profile.proficiency(skill);
        if proficiency >= STRENGTH_THRESHOLD {
            strengths.push(format!("strong {skill} ({proficiency:.0})"));
        }
        let growing = ev
            .profile
            .entry(skill)
            .and_then(|e| e.language_volume)
            .is_some_and(|v| v.trend == Trend::Growing);
        if growing && proficiency > 0.0 {
            strengths.push(format!("growing {skill} usage"));
        }
    }

    for skill in ev.required {
        let proficiency = ev.profile.proficiency(skill);
        if proficiency <= 0.0 {
            gaps.push(format!("missing required skill: {skill}"));
        } else if proficiency < ev.weak_threshold {
            gaps.push(format!("limited {skill} proficiency ({proficiency:.0})"));
        }
    }
    for skill in ev.preferred {
        if !ev.profile.holds(skill) {
            gaps.push(format!("missing preferred skill: {skill}"));
        }
    }

    if let Some(domain) = ev.domain {
        let score = ev.profile.domain_score(domain);
        if score >= STRENGTH_THRESHOLD {
            strengths.push(format!("{domain} domain expertise"));
        } else if score <= 0.0 {
            gaps.push(format!("no {domain} domain experience"));
        }
    }

    if ev.load.status == WorkloadStatus::Over {
        gaps.push(format!(
            "over capacity ({:.1}h of {:.1}h)",
            ev.load.current_hours, ev.load.capacity_hours
        ));
    }

    let covered = |skills: &BTreeSet<String>| skills.iter().filter(|s| ev.profile.holds(s)).count();
    let mut reasoning = format!(
        "Covers {}/{} required and {}/{} preferred skills; skill {:.1}, experience {:.1}, growth {:.1}",
        covered(ev.required),
        ev.required.len(),
        covered(ev.preferred),
        ev.preferred.len(),
        ev.skill_match,
        ev.experience_match,
        ev.growth_opportunity,
    );
    if ev.confidence < ev.low_confidence {
        reasoning.push_str(&format!(
            " (low signal confidence {:.2})",
            ev.confidence
        ));
    }

    Explanation {
        reasoning,
        strengths,
        gaps,
    }
}
