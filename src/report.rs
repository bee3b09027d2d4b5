//! Result aggregation and quality-gate evaluation.
//!
//! A pure reduction: findings from all files are concatenated, deduplicated
//! on (file, line, rule id), and sorted by severity rank descending then
//! file and line ascending. The sort, not worker completion order, is what
//! makes report output deterministic under parallel analysis.

use crate::config::{GateConfig, ResolvedConfig};
use crate::core::{
    FileResult, Finding, GateStatus, Report, ReportSummary, Severity,
};
use chrono::Utc;
use std::collections::HashSet;
use std::path::PathBuf;

pub fn aggregate(results: Vec<FileResult>, config: &ResolvedConfig, truncated: bool) -> Report {
    let mut findings: Vec<Finding> = config.warnings.clone();
    let mut metrics = Vec::new();
    let mut files_analyzed = 0usize;

    for result in results {
        files_analyzed += 1;
        findings.extend(result.findings);
        if let Some(m) = result.metrics {
            metrics.push(m);
        }
    }

    findings = dedup_findings(findings);
    sort_findings(&mut findings);
    metrics.sort_by(|a, b| a.file.cmp(&b.file));

    let summary = summarize(&findings, &metrics, files_analyzed);
    let gate = evaluate_gate(&summary, &config.gate);

    Report {
        timestamp: Utc::now(),
        findings,
        metrics,
        summary,
        gate,
        truncated,
    }
}

/// First occurrence wins; later duplicates of the same (file, line, rule id)
/// are dropped. Distinct rule ids on the same line all survive.
fn dedup_findings(findings: Vec<Finding>) -> Vec<Finding> {
    let mut seen: HashSet<(PathBuf, usize, String)> = HashSet::new();
    findings
        .into_iter()
        .filter(|f| seen.insert((f.file.clone(), f.line, f.rule_id.clone())))
        .collect()
}

fn sort_findings(findings: &mut [Finding]) {
    findings.sort_by(|a, b| {
        b.severity
            .cmp(&a.severity)
            .then_with(|| a.file.cmp(&b.file))
            .then_with(|| a.line.cmp(&b.line))
            .then_with(|| a.rule_id.cmp(&b.rule_id))
    });
}

fn summarize(
    findings: &[Finding],
    metrics: &[crate::core::FileMetrics],
    files_analyzed: usize,
) -> ReportSummary {
    let mut summary = ReportSummary {
        files_analyzed,
        total_findings: findings.len(),
        ..Default::default()
    };
    for finding in findings {
        *summary.by_severity.entry(finding.severity).or_default() += 1;
        *summary.by_category.entry(finding.category).or_default() += 1;
    }

    let mut cyclomatic_sum = 0u64;
    for file in metrics {
        for function in &file.functions {
            summary.total_functions += 1;
            summary.max_cyclomatic = summary.max_cyclomatic.max(function.cyclomatic);
            cyclomatic_sum += u64::from(function.cyclomatic);
        }
    }
    if summary.total_functions > 0 {
        summary.average_cyclomatic = cyclomatic_sum as f64 / summary.total_functions as f64;
    }
    summary
}

/// Fail when critical findings exceed the critical threshold or total
/// findings exceed the total threshold.
pub fn evaluate_gate(summary: &ReportSummary, gate: &GateConfig) -> GateStatus {
    let critical = summary.severity_count(Severity::Critical);
    if critical > gate.critical_issue_threshold
        || summary.total_findings > gate.total_issue_threshold
    {
        GateStatus::Fail
    } else {
        GateStatus::Pass
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::RuleCategory;

    fn finding(file: &str, line: usize, rule: &str, severity: Severity) -> Finding {
        Finding::new(file, line, rule, severity, RuleCategory::Style, "msg")
    }

    #[test]
    fn duplicate_triples_collapse_distinct_rules_survive() {
        let input = vec![
            finding("a.py", 5, "r1", Severity::Medium),
            finding("a.py", 5, "r1", Severity::Medium),
            finding("a.py", 5, "r2", Severity::Medium),
        ];
        let out = dedup_findings(input);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn sort_is_severity_then_file_then_line() {
        let mut findings = vec![
            finding("b.py", 10, "r1", Severity::Medium),
            finding("a.py", 5, "r2", Severity::Medium),
            finding("a.py", 5, "r1", Severity::Medium),
            finding("z.py", 1, "r1", Severity::Critical),
        ];
        sort_findings(&mut findings);
        assert_eq!(findings[0].file, PathBuf::from("z.py"));
        assert_eq!(findings[1].file, PathBuf::from("a.py"));
        assert_eq!(findings[1].line, 5);
        assert_eq!(findings[2].file, PathBuf::from("a.py"));
        assert_eq!(findings[3].file, PathBuf::from("b.py"));
    }

    #[test]
    fn gate_fails_on_critical_count_and_passes_under_thresholds() {
        let gate = GateConfig {
            critical_issue_threshold: 5,
            total_issue_threshold: 50,
        };

        let mut failing = ReportSummary {
            total_findings: 10,
            ..Default::default()
        };
        failing.by_severity.insert(Severity::Critical, 6);
        assert_eq!(evaluate_gate(&failing, &gate), GateStatus::Fail);

        let mut passing = ReportSummary {
            total_findings: 10,
            ..Default::default()
        };
        passing.by_severity.insert(Severity::Critical, 2);
        assert_eq!(evaluate_gate(&passing, &gate), GateStatus::Pass);
    }

    #[test]
    fn total_threshold_alone_fails_gate() {
        let gate = GateConfig {
            critical_issue_threshold: 5,
            total_issue_threshold: 50,
        };
        let summary = ReportSummary {
            total_findings: 51,
            ..Default::default()
        };
        assert_eq!(evaluate_gate(&summary, &gate), GateStatus::Fail);
    }
}
