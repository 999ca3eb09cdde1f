//! Peer benchmarking: percentile ranks against a workspace cohort.

mod gaps;

pub use gaps::{team_skill_gaps, CoverageStatus, SkillCoverage, TeamSkillGaps};

use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::model::{Developer, SkillFingerprint};
use crate::types::{mean, normalize_skill, percentile_rank, round2};
use crate::workload::Roster;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Which part of the fingerprint a benchmarked skill comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillCategory {
    Language,
    Framework,
    Domain,
}

/// One skill of the subject ranked against peers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillBenchmark {
    pub skill: String,
    pub score: f64,
    pub peer_avg: f64,
    /// `None` when the peer group is too small to rank against.
    pub percentile: Option<f64>,
    /// `score - peer_avg`.
    pub delta: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkResult {
    pub developer_id: String,
    pub developer_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    pub overall_score: f64,
    pub peer_group_size: usize,
    pub percentile_overall: Option<f64>,
    pub statistically_reliable: bool,
    pub languages: Vec<SkillBenchmark>,
    pub frameworks: Vec<SkillBenchmark>,
    pub domains: Vec<SkillBenchmark>,
    pub warnings: Vec<String>,
}

/// Per-category scores keyed by normalized name; strongest duplicate wins.
type CategoryScores = BTreeMap<(SkillCategory, String), f64>;

fn category_scores(fp: &SkillFingerprint) -> CategoryScores {
    let mut scores = CategoryScores::new();
    let mut put = |category, name: &str, score: f64| {
        if let Some(name) = normalize_skill(name) {
            let slot = scores.entry((category, name)).or_insert(0.0);
            *slot = slot.max(score);
        }
    };
    for l in &fp.languages {
        put(SkillCategory::Language, &l.name, l.proficiency);
    }
    for f in &fp.frameworks {
        put(SkillCategory::Framework, &f.name, f.proficiency);
    }
    for d in &fp.domains {
        put(SkillCategory::Domain, &d.name, d.confidence.value() * 100.0);
    }
    scores
}

/// Mean score over the skills a developer actually holds.
fn overall(scores: &CategoryScores) -> f64 {
    let held: Vec<f64> = scores.values().copied().filter(|s| *s > 0.0).collect();
    mean(&held)
}

fn holds_domain(dev: &Developer, domain: &str) -> bool {
    dev.fingerprint
        .domains
        .iter()
        .any(|d| normalize_skill(&d.name).as_deref() == Some(domain) && d.confidence.value() > 0.0)
}

fn sorted(mut values: Vec<f64>) -> Vec<f64> {
    values.sort_by(f64::total_cmp);
    values
}

/// Rank one developer's skills against everyone else on the roster.
///
/// With `domain`, the peer group is narrowed to developers holding that domain.
pub fn benchmark(
    config: &EngineConfig,
    developer_id: &str,
    domain: Option<&str>,
    roster: &Roster,
) -> EngineResult<BenchmarkResult> {
    let subject = roster
        .developer(developer_id)
        .ok_or_else(|| EngineError::UnknownDeveloper(developer_id.to_string()))?;
    let domain = match domain {
        Some(raw) => Some(
            normalize_skill(raw)
                .ok_or_else(|| EngineError::invalid_input("domain", "must not be blank"))?,
        ),
        None => None,
    };

    let peers: Vec<CategoryScores> = roster
        .developers()
        .iter()
        .filter(|d| d.id != subject.id)
        .filter(|d| domain.as_deref().is_none_or(|dom| holds_domain(d, dom)))
        .map(|d| category_scores(&d.fingerprint))
        .collect();

    let peer_group_size = peers.len();
    let min_group = config.benchmark.min_peer_group_size;
    let reliable = peer_group_size >= min_group && peer_group_size > 0;

    let subject_scores = category_scores(&subject.fingerprint);
    let mut languages = Vec::new();
    let mut frameworks = Vec::new();
    let mut domains = Vec::new();

    for ((category, skill), &score) in &subject_scores {
        if score <= 0.0 {
            continue;
        }
        // Peers without the skill count as zero.
        let peer_scores: Vec<f64> = peers
            .iter()
            .map(|p| {
                p.get(&(*category, skill.clone()))
                    .copied()
                    .unwrap_or(0.0)
            })
            .collect();
        let peer_avg = mean(&peer_scores);
        let entry = SkillBenchmark {
            skill: skill.clone(),
            score: round2(score),
            peer_avg: round2(peer_avg),
            percentile: reliable
                .then(|| round2(percentile_rank(score, &sorted(peer_scores)) * 100.0)),
            delta: round2(score - peer_avg),
        };
        match category {
            SkillCategory::Language => languages.push(entry),
            SkillCategory::Framework => frameworks.push(entry),
            SkillCategory::Domain => domains.push(entry),
        }
    }

    let overall_score = overall(&subject_scores);
    let peer_overall: Vec<f64> = peers.iter().map(overall).collect();

    let mut warnings = Vec::new();
    if !reliable {
        warnings.push(format!(
            "peer group of {peer_group_size} is below the minimum of {min_group}; percentiles are not statistically reliable"
        ));
    }
    if subject_scores.values().all(|s| *s <= 0.0) {
        warnings.push(format!("{} has no scored skills", subject.id));
    }

    tracing::debug!(
        target: "skillmatch::benchmark",
        developer = %subject.id,
        peers = peer_group_size,
        reliable,
        "Benchmarked developer"
    );

    Ok(BenchmarkResult {
        developer_id: subject.id.clone(),
        developer_name: subject.display_name().to_string(),
        domain,
        overall_score: round2(overall_score),
        peer_group_size,
        percentile_overall: reliable
            .then(|| round2(percentile_rank(overall_score, &sorted(peer_overall)) * 100.0)),
        statistically_reliable: reliable,
        languages,
        frameworks,
        domains,
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DomainExpertise, Trend};
    use crate::test_support::{developer, language};
    use crate::Confidence;

    fn rust_dev(id: &str, proficiency: f64) -> Developer {
        developer(
            id,
            SkillFingerprint {
                languages: vec![language("rust", proficiency, 10, 100, Trend::Stable)],
                ..Default::default()
            },
        )
    }

    #[test]
    fn small_peer_group_is_flagged_unreliable() {
        let roster = Roster::new(
            vec![rust_dev("a", 80.0), rust_dev("b", 60.0), rust_dev("c", 40.0)],
            vec![],
        )
        .unwrap();
        let result = benchmark(&EngineConfig::default(), "a", None, &roster).unwrap();

        assert_eq!(result.peer_group_size, 2);
        assert!(!result.statistically_reliable);
        assert_eq!(result.percentile_overall, None);
        assert_eq!(result.languages[0].percentile, None);
        assert_eq!(result.languages[0].peer_avg, 50.0);
        assert_eq!(result.languages[0].delta, 30.0);
        assert!(result.warnings[0].contains("not statistically reliable"));
    }

    #[test]
    fn peers_missing_a_skill_count_as_zero() {
        let roster = Roster::new(
            vec![
                rust_dev("a", 50.0),
                rust_dev("b", 90.0),
                developer("c", SkillFingerprint::default()),
                developer("d", SkillFingerprint::default()),
            ],
            vec![],
        )
        .unwrap();
        let result = benchmark(&EngineConfig::default(), "a", None, &roster).unwrap();
        let rust = &result.languages[0];
        // Peers: 0, 0, 90 -> two below, none equal.
        assert_eq!(rust.percentile, Some(66.67));
        assert_eq!(rust.peer_avg, 30.0);
    }

    #[test]
    fn domain_filter_narrows_the_peer_group() {
        let mut fin = rust_dev("b", 70.0);
        fin.fingerprint.domains.push(DomainExpertise {
            name: "Fintech".into(),
            confidence: Confidence::new(0.8).unwrap(),
        });
        let roster = Roster::new(
            vec![rust_dev("a", 50.0), fin, rust_dev("c", 10.0)],
            vec![],
        )
        .unwrap();
        let result = benchmark(&EngineConfig::default(), "a", Some("fintech"), &roster).unwrap();
        assert_eq!(result.peer_group_size, 1);
        assert_eq!(result.domain.as_deref(), Some("fintech"));
    }

    #[test]
    fn unknown_subject_is_rejected() {
        let roster = Roster::new(vec![rust_dev("a", 50.0)], vec![]).unwrap();
        assert_eq!(
            benchmark(&EngineConfig::default(), "ghost", None, &roster).unwrap_err(),
            EngineError::UnknownDeveloper("ghost".into())
        );
    }
}
