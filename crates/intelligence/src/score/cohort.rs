//! Cohort distributions used to normalize experience volume.
//!
//! Commit and line counts differ by orders of magnitude between skills, so
//! a developer's volume is ranked against the people who hold the same
//! skill rather than scored in absolute terms.

use crate::model::SkillProfile;
use crate::types::percentile_rank;
use crate::workload::Roster;
use std::collections::BTreeMap;

/// Sorted per-skill volume distributions for one cohort.
#[derive(Debug, Clone, Default)]
pub struct CohortStats {
    commits: BTreeMap<String, Vec<f64>>,
    lines: BTreeMap<String, Vec<f64>>,
    usage: BTreeMap<String, Vec<f64>>,
}

impl CohortStats {
    /// Collect distributions from every profile that holds each skill.
    pub fn from_profiles<'a>(profiles: impl IntoIterator<Item = &'a SkillProfile>) -> Self {
        let mut stats = Self::default();
        for profile in profiles {
            for (name, volume) in profile.language_volumes() {
                stats
                    .commits
                    .entry(name.to_string())
                    .or_default()
                    .push(volume.commits as f64);
                stats
                    .lines
                    .entry(name.to_string())
                    .or_default()
                    .push(volume.lines_of_code as f64);
            }
            for (name, usage) in profile.framework_usages() {
                stats
                    .usage
                    .entry(name.to_string())
                    .or_default()
                    .push(usage as f64);
            }
        }
        for dist in stats
            .commits
            .values_mut()
            .chain(stats.lines.values_mut())
            .chain(stats.usage.values_mut())
        {
            dist.sort_by(f64::total_cmp);
        }
        stats
    }

    /// Statistics over every developer on a roster.
    pub fn from_roster(roster: &Roster, tool_proficiency: f64) -> Self {
        let profiles: Vec<SkillProfile> = roster
            .developers()
            .iter()
            .map(|d| SkillProfile::new(&d.fingerprint, tool_proficiency))
            .collect();
        Self::from_profiles(profiles.iter())
    }

    /// Rank of a commit count among holders of `skill`, in [0, 1].
    pub fn commits_rank(&self, skill: &str, commits: u64) -> f64 {
        rank_in(&self.commits, skill, commits as f64)
    }

    /// Rank of a line count among holders of `skill`, in [0, 1].
    pub fn lines_rank(&self, skill: &str, lines: u64) -> f64 {
        rank_in(&self.lines, skill, lines as f64)
    }

    /// Rank of a framework usage count among holders of `skill`, in [0, 1].
    pub fn usage_rank(&self, skill: &str, usage: u64) -> f64 {
        rank_in(&self.usage, skill, usage as f64)
    }
}

fn rank_in(dists: &BTreeMap<String, Vec<f64>>, skill: &str, value: f64) -> f64 {
    dists
        .get(skill)
        .map(|dist| percentile_rank(value, dist))
        .unwrap_or(0.5)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FrameworkSkill, LanguageSkill, SkillFingerprint, Trend};

    fn profile(commits: u64, lines: u64, usage: u64) -> SkillProfile {
        SkillProfile::new(
            &SkillFingerprint {
                languages: vec![LanguageSkill {
                    name: "rust".into(),
                    proficiency: 50.0,
                    lines_of_code: lines,
                    commits_count: commits,
                    trend: Trend::Stable,
                }],
                frameworks: vec![FrameworkSkill {
                    name: "tokio".into(),
                    category: "async".into(),
                    proficiency: 50.0,
                    usage_count: usage,
                }],
                ..Default::default()
            },
            50.0,
        )
    }

    #[test]
    fn ranks_against_holders_only() {
        let profiles = [profile(10, 1_000, 1), profile(100, 10_000, 5)];
        let stats = CohortStats::from_profiles(profiles.iter());

        assert_eq!(stats.commits_rank("rust", 100), 0.75);
        assert_eq!(stats.lines_rank("rust", 1_000), 0.25);
        assert_eq!(stats.usage_rank("tokio", 5), 0.75);
    }

    #[test]
    fn unknown_skill_is_neutral() {
        let stats = CohortStats::default();
        assert_eq!(stats.commits_rank("cobol", 10), 0.5);
    }
}
