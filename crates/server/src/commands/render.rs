//! Human-readable summaries for `--format text`.

use skillmatch_intelligence::{
    BenchmarkResult, CoverageStatus, Preference, ScenarioComparison, ScenarioKind,
    SkillBenchmark, Solver, SprintCapacity, SprintOutlook, SprintPrediction, TaskMatchResult,
    TeamSkillGaps, WhatIfScenario,
};
use skillmatch_state::ResolvedConfig;

fn push_list(lines: &mut Vec<String>, heading: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    lines.push(format!("{heading}:"));
    lines.extend(items.iter().map(|item| format!("  - {item}")));
}

fn skills_or_none(skills: &[String]) -> String {
    if skills.is_empty() {
        "none".to_string()
    } else {
        skills.join(", ")
    }
}

pub(crate) fn task_match(title: &str, result: &TaskMatchResult) -> String {
    let signals = &result.task_signals;
    let mut lines = vec![
        format!("Task: {title}"),
        format!(
            "Signals: required {}; preferred {}; confidence {:.2}",
            skills_or_none(&signals.required_skills),
            skills_or_none(&signals.preferred_skills),
            signals.confidence.value()
        ),
    ];
    if result.candidates.is_empty() {
        lines.push("No candidates.".to_string());
    }
    for candidate in &result.candidates {
        let score = &candidate.match_score;
        lines.push(format!(
            "{:>3}. {} ({})  {:.2}  skill {:.2}  experience {:.2}  growth {:.2}  [{}]",
            candidate.rank,
            candidate.developer_name,
            candidate.developer_id,
            score.overall_score,
            score.skill_match,
            score.experience_match,
            score.growth_opportunity,
            candidate.workload_status.label()
        ));
        lines.push(format!("     {}", score.reasoning));
    }
    push_list(&mut lines, "Recommendations", &result.recommendations);
    push_list(&mut lines, "Warnings", &result.warnings);
    lines.join("\n")
}

pub(crate) fn scenario(scenario: &WhatIfScenario) -> String {
    let kind = match (scenario.kind, scenario.solver) {
        (ScenarioKind::Proposed, _) => "proposed".to_string(),
        (ScenarioKind::Optimized, Some(solver)) => format!("optimized, {}", solver_label(solver)),
        (ScenarioKind::Optimized, None) => "optimized".to_string(),
    };
    let impact = &scenario.team_impact;
    let mut lines = vec![
        format!("Scenario '{}' ({kind})", scenario.scenario_name),
        format!(
            "Assigned {}/{} tasks, average score {:.2}, skill coverage {:.2}%, utilization spread {:.2}",
            impact.assigned_tasks,
            impact.total_tasks,
            impact.average_match_score,
            impact.skill_coverage,
            impact.utilization_spread
        ),
        format!(
            "Growth: {} high, {} moderate, {} low",
            impact.growth_distribution.high,
            impact.growth_distribution.moderate,
            impact.growth_distribution.low
        ),
    ];
    if !scenario.assignments.is_empty() {
        lines.push("Assignments:".to_string());
        for a in &scenario.assignments {
            lines.push(format!(
                "  {} -> {} ({})  {:.2}  {:.1}h",
                a.task_id, a.developer_name, a.developer_id, a.match_score, a.estimated_hours
            ));
        }
    }
    if !impact.unassigned.is_empty() {
        lines.push("Unassigned:".to_string());
        for u in &impact.unassigned {
            lines.push(format!("  {}: {}", u.task_id, u.reason.describe()));
        }
    }
    if !scenario.workload_impacts.is_empty() {
        lines.push("Workload:".to_string());
        for w in &scenario.workload_impacts {
            lines.push(format!(
                "  {:<12} {} tasks  {:.1}/{:.1}h  {:.2}%  {}",
                w.developer_id,
                w.total_tasks,
                w.estimated_hours,
                w.capacity_hours,
                w.utilization,
                w.workload_status.label()
            ));
        }
    }
    push_list(&mut lines, "Warnings", &impact.warnings);
    push_list(&mut lines, "Recommendations", &scenario.recommendations);
    lines.join("\n")
}

fn solver_label(solver: Solver) -> &'static str {
    match solver {
        Solver::MinCostFlow => "min-cost flow",
        Solver::Greedy => "greedy",
    }
}

pub(crate) fn comparison(cmp: &ScenarioComparison) -> String {
    let mut lines = vec![format!(
        "Comparing '{}' with '{}'",
        cmp.scenario_a, cmp.scenario_b
    )];
    for diff in cmp.assignments.iter().filter(|d| d.changed) {
        lines.push(format!(
            "  {}: {} -> {}  ({:+.2})",
            diff.task_id,
            diff.developer_a.as_deref().unwrap_or("unassigned"),
            diff.developer_b.as_deref().unwrap_or("unassigned"),
            diff.score_delta
        ));
    }
    let d = &cmp.deltas;
    lines.push(format!(
        "Changed {} assignments; deltas: average {:+.2}, coverage {:+.2}, spread {:+.2}, assigned {:+}, total {:+.2}",
        cmp.changed_assignments,
        d.average_score,
        d.skill_coverage,
        d.utilization_spread,
        d.assigned_tasks,
        d.total_score
    ));
    let preferred = match cmp.preferred {
        Preference::ScenarioA => cmp.scenario_a.as_str(),
        Preference::ScenarioB => cmp.scenario_b.as_str(),
        Preference::Equivalent => "neither (equivalent)",
    };
    lines.push(format!("Preferred: {preferred}"));
    lines.push(cmp.summary.clone());
    lines.join("\n")
}

fn percentile(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |p| format!("{p:.2}"))
}

fn push_benchmarks(lines: &mut Vec<String>, heading: &str, rows: &[SkillBenchmark]) {
    if rows.is_empty() {
        return;
    }
    lines.push(format!("{heading}:"));
    for row in rows {
        lines.push(format!(
            "  {:<16} {:>6.2}  peers {:>6.2}  delta {:+.2}  percentile {}",
            row.skill,
            row.score,
            row.peer_avg,
            row.delta,
            percentile(row.percentile)
        ));
    }
}

pub(crate) fn benchmark(result: &BenchmarkResult) -> String {
    let scope = result
        .domain
        .as_deref()
        .map(|d| format!(" in {d}"))
        .unwrap_or_default();
    let mut lines = vec![
        format!(
            "{} ({}){scope}: overall {:.2}, percentile {}",
            result.developer_name,
            result.developer_id,
            result.overall_score,
            percentile(result.percentile_overall)
        ),
        format!(
            "Peer group: {} developers ({})",
            result.peer_group_size,
            if result.statistically_reliable {
                "reliable"
            } else {
                "too small to rank"
            }
        ),
    ];
    push_benchmarks(&mut lines, "Languages", &result.languages);
    push_benchmarks(&mut lines, "Frameworks", &result.frameworks);
    push_benchmarks(&mut lines, "Domains", &result.domains);
    push_list(&mut lines, "Warnings", &result.warnings);
    lines.join("\n")
}

pub(crate) fn skill_gaps(gaps: &TeamSkillGaps) -> String {
    let mut lines = vec![format!("Team of {} developers", gaps.team_size)];
    for skill in &gaps.skills {
        let status = match skill.status {
            CoverageStatus::Gap => "gap",
            CoverageStatus::AtRisk => "at risk",
            CoverageStatus::WellCovered => "well covered",
        };
        lines.push(format!(
            "  {:<16} {:<12} average {:>6.2}  experts {}  practitioners {}",
            skill.skill,
            status,
            skill.average_score,
            skills_or_none(&skill.experts),
            skill.practitioners
        ));
    }
    push_list(&mut lines, "Recommendations", &gaps.recommendations);
    lines.join("\n")
}

pub(crate) fn sprint_capacity(capacity: &SprintCapacity) -> String {
    let mut lines = vec![format!(
        "Sprint {}: {:.1}h capacity, {:.1}h committed, {:.1}h available, {:.1}h planned ({:.2}% projected)",
        capacity.sprint_id,
        capacity.total_capacity_hours,
        capacity.total_committed_hours,
        capacity.total_available_hours,
        capacity.planned_hours,
        capacity.projected_utilization
    )];
    for dev in &capacity.developers {
        lines.push(format!(
            "  {:<12} {:.1}/{:.1}h committed, {:.1}h available  {}",
            dev.developer_id,
            dev.committed_hours,
            dev.capacity_hours,
            dev.available_hours,
            dev.workload_status.label()
        ));
    }
    lines.join("\n")
}

pub(crate) fn sprint_prediction(prediction: &SprintPrediction) -> String {
    let outlook = match prediction.outlook {
        SprintOutlook::OnTrack => "on track",
        SprintOutlook::AtRisk => "at risk",
        SprintOutlook::OffTrack => "off track",
    };
    let mut lines = vec![
        format!(
            "Sprint {}: {outlook} ({:.0}% of {:.1}h planned fits in {:.1}h available)",
            prediction.sprint_id,
            prediction.completion_ratio * 100.0,
            prediction.planned_hours,
            prediction.available_hours
        ),
        format!(
            "Expected to complete: {}",
            skills_or_none(&prediction.predicted_completed)
        ),
        format!("At risk: {}", skills_or_none(&prediction.at_risk)),
    ];
    push_list(&mut lines, "Warnings", &prediction.warnings);
    lines.join("\n")
}

pub(crate) fn config(resolved: &ResolvedConfig) -> String {
    let engine = &resolved.engine;
    let source = resolved
        .source
        .as_deref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "built-in defaults".to_string());
    [
        format!(
            "Workspace: {}",
            resolved.workspace.as_deref().unwrap_or("(none)")
        ),
        format!("Source: {source}"),
        format!(
            "Weights: skill {}, experience {}, growth {}",
            engine.weights.skill, engine.weights.experience, engine.weights.growth
        ),
        format!(
            "Workload: low {} / high {} of capacity, default capacity {}h",
            engine.workload.low_ratio,
            engine.workload.high_ratio,
            engine.workload.default_capacity_hours
        ),
        format!(
            "Assignment: min viable score {}, exact pair limit {}",
            engine.assignment.min_viable_score, engine.assignment.exact_pair_limit
        ),
        format!(
            "Benchmark: min peer group {}, expert {}, practitioner {}, min experts {}",
            engine.benchmark.min_peer_group_size,
            engine.benchmark.expert_threshold,
            engine.benchmark.practitioner_threshold,
            engine.benchmark.min_experts
        ),
        format!("Dependency timeout: {}ms", engine.dependencies.timeout_ms),
    ]
    .join("\n")
}
