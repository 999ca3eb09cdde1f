//! Developer skill fingerprints and their normalized lookup index.

use crate::error::{EngineError, EngineResult};
use crate::types::{normalize_skill, Confidence};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Direction a language's usage is moving in recent history.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Growing,
    #[default]
    Stable,
    Declining,
}

/// Proficiency in one programming language.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageSkill {
    pub name: String,
    /// Proficiency (0 - 100).
    pub proficiency: f64,
    #[serde(default)]
    pub lines_of_code: u64,
    #[serde(default)]
    pub commits_count: u64,
    #[serde(default)]
    pub trend: Trend,
}

/// Proficiency in one framework or library.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameworkSkill {
    pub name: String,
    #[serde(default)]
    pub category: String,
    /// Proficiency (0 - 100).
    pub proficiency: f64,
    #[serde(default)]
    pub usage_count: u64,
}

/// Expertise in a business or technical domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainExpertise {
    pub name: String,
    pub confidence: Confidence,
}

/// A developer's aggregated skill profile.
///
/// Produced by an external re-analysis process; read-only to the engine.
/// Entry order carries no meaning.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkillFingerprint {
    #[serde(default)]
    pub languages: Vec<LanguageSkill>,
    #[serde(default)]
    pub frameworks: Vec<FrameworkSkill>,
    #[serde(default)]
    pub domains: Vec<DomainExpertise>,
    #[serde(default)]
    pub tools: Vec<String>,
}

impl SkillFingerprint {
    /// True when the fingerprint carries no skills at all.
    pub fn is_empty(&self) -> bool {
        self.languages.is_empty()
            && self.frameworks.is_empty()
            && self.domains.is_empty()
            && self.tools.iter().all(|t| normalize_skill(t).is_none())
    }

    /// Reject out-of-range proficiencies and unnamed entries.
    pub fn validate(&self) -> EngineResult<()> {
        for lang in &self.languages {
            check_name("languages.name", &lang.name)?;
            check_proficiency(&lang.name, lang.proficiency)?;
        }
        for fw in &self.frameworks {
            check_name("frameworks.name", &fw.name)?;
            check_proficiency(&fw.name, fw.proficiency)?;
        }
        for domain in &self.domains {
            check_name("domains.name", &domain.name)?;
        }
        Ok(())
    }
}

fn check_name(field: &str, name: &str) -> EngineResult<()> {
    if normalize_skill(name).is_none() {
        return Err(EngineError::invalid_input(field, "must not be blank"));
    }
    Ok(())
}

fn check_proficiency(name: &str, value: f64) -> EngineResult<()> {
    if !value.is_finite() || !(0.0..=100.0).contains(&value) {
        return Err(EngineError::invalid_input(
            format!("proficiency[{name}]"),
            format!("must be within [0, 100], got {value}"),
        ));
    }
    Ok(())
}

/// Volume data behind a language skill.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LanguageVolume {
    pub commits: u64,
    pub lines_of_code: u64,
    pub trend: Trend,
}

/// Everything known about one normalized skill name for one developer.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SkillEntry {
    /// Language proficiency, if listed as a language.
    pub language: Option<f64>,
    /// Framework proficiency, if listed as a framework.
    pub framework: Option<f64>,
    /// Domain confidence scaled to 0 - 100.
    pub domain: Option<f64>,
    /// Listed as a tool.
    pub tool: bool,
    pub language_volume: Option<LanguageVolume>,
    pub framework_usage: Option<u64>,
}

/// Normalized, name-indexed view of a fingerprint.
///
/// Built once per developer per call; every score lookup goes through it so
/// casing and duplicate entries never affect results.
#[derive(Debug, Clone, Default)]
pub struct SkillProfile {
    entries: BTreeMap<String, SkillEntry>,
    tool_proficiency: f64,
}

impl SkillProfile {
    pub fn new(fingerprint: &SkillFingerprint, tool_proficiency: f64) -> Self {
        let mut entries: BTreeMap<String, SkillEntry> = BTreeMap::new();

        for lang in &fingerprint.languages {
            let Some(name) = normalize_skill(&lang.name) else {
                continue;
            };
            let entry = entries.entry(name).or_default();
            // Duplicates keep the strongest entry.
            if entry.language.is_none_or(|p| lang.proficiency > p) {
                entry.language = Some(lang.proficiency);
                entry.language_volume = Some(LanguageVolume {
                    commits: lang.commits_count,
                    lines_of_code: lang.lines_of_code,
                    trend: lang.trend,
                });
            }
        }
        for fw in &fingerprint.frameworks {
            let Some(name) = normalize_skill(&fw.name) else {
                continue;
            };
            let entry = entries.entry(name).or_default();
            if entry.framework.is_none_or(|p| fw.proficiency > p) {
                entry.framework = Some(fw.proficiency);
                entry.framework_usage = Some(fw.usage_count);
            }
        }
        for domain in &fingerprint.domains {
            let Some(name) = normalize_skill(&domain.name) else {
                continue;
            };
            let scaled = domain.confidence.value() * 100.0;
            let entry = entries.entry(name).or_default();
            if entry.domain.is_none_or(|p| scaled > p) {
                entry.domain = Some(scaled);
            }
        }
        for tool in &fingerprint.tools {
            if let Some(name) = normalize_skill(tool) {
                entries.entry(name).or_default().tool = true;
            }
        }

        Self {
            entries,
            tool_proficiency,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Raw entry for an already-normalized name.
    pub fn entry(&self, name: &str) -> Option<&SkillEntry> {
        self.entries.get(name)
    }

    /// Proficiency for an already-normalized name: the strongest evidence
    /// across languages, frameworks, domains, and tools.
    pub fn proficiency(&self, name: &str) -> f64 {
        let Some(entry) = self.entries.get(name) else {
            return 0.0;
        };
        let tool = if entry.tool {
            self.tool_proficiency
        } else {
            0.0
        };
        [
            entry.language.unwrap_or(0.0),
            entry.framework.unwrap_or(0.0),
            entry.domain.unwrap_or(0.0),
            tool,
        ]
        .into_iter()
        .fold(0.0, f64::max)
        .min(100.0)
    }

    /// A developer holds a skill when its proficiency is above zero.
    pub fn holds(&self, name: &str) -> bool {
        self.proficiency(name) > 0.0
    }

    /// Domain confidence (0 - 100) for an already-normalized domain name.
    pub fn domain_score(&self, name: &str) -> f64 {
        self.entries
            .get(name)
            .and_then(|e| e.domain)
            .unwrap_or(0.0)
    }

    /// Held languages as (name, volume), for cohort statistics.
    pub fn language_volumes(&self) -> impl Iterator<Item = (&str, LanguageVolume)> {
        self.entries.iter().filter_map(|(name, entry)| {
            match (entry.language, entry.language_volume) {
                (Some(p), Some(v)) if p > 0.0 => Some((name.as_str(), v)),
                _ => None,
            }
        })
    }

    /// Held frameworks as (name, usage count), for cohort statistics.
    pub fn framework_usages(&self) -> impl Iterator<Item = (&str, u64)> {
        self.entries.iter().filter_map(|(name, entry)| {
            match (entry.framework, entry.framework_usage) {
                (Some(p), Some(u)) if p > 0.0 => Some((name.as_str(), u)),
                _ => None,
            }
        })
    }
}
