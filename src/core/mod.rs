//! Core value types shared across the analysis pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Severity levels for findings, ordered from least to most severe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Low,
    Medium,
    High,
    Critical,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Severity::Info => "info",
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        };
        write!(f, "{s}")
    }
}

/// Rule categories. `Internal` is reserved for engine-generated notices
/// (unreadable files, disabled rules) and never carries gate weight beyond
/// the total count.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleCategory {
    Security,
    Complexity,
    Style,
    Internal,
}

impl std::fmt::Display for RuleCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RuleCategory::Security => "security",
            RuleCategory::Complexity => "complexity",
            RuleCategory::Style => "style",
            RuleCategory::Internal => "internal",
        };
        write!(f, "{s}")
    }
}

/// A single reported issue at a specific file and line.
///
/// Identity for deduplication is the (file, line, rule_id) triple; two rules
/// with different ids reporting the same line both survive aggregation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub file: PathBuf,
    pub line: usize,
    pub rule_id: String,
    pub severity: Severity,
    pub category: RuleCategory,
    pub message: String,
}

impl Finding {
    pub fn new(
        file: impl Into<PathBuf>,
        line: usize,
        rule_id: impl Into<String>,
        severity: Severity,
        category: RuleCategory,
        message: impl Into<String>,
    ) -> Self {
        Self {
            file: file.into(),
            line,
            rule_id: rule_id.into(),
            severity,
            category,
            message: message.into(),
        }
    }

    /// Key used by the aggregator to collapse duplicate findings.
    pub fn dedup_key(&self) -> (&PathBuf, usize, &str) {
        (&self.file, self.line, &self.rule_id)
    }
}

/// Complexity metrics for one function-like unit.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FunctionMetrics {
    pub name: String,
    pub file: PathBuf,
    pub line: usize,
    pub end_line: usize,
    pub cyclomatic: u32,
    pub cognitive: u32,
    pub nesting: u32,
    pub length: usize,
}

impl FunctionMetrics {
    pub fn new(name: String, file: PathBuf, line: usize) -> Self {
        Self {
            name,
            file,
            line,
            end_line: line,
            cyclomatic: 1,
            cognitive: 0,
            nesting: 0,
            length: 0,
        }
    }
}

/// Per-file complexity summary carried into the report.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FileMetrics {
    pub file: PathBuf,
    pub language: String,
    pub functions: Vec<FunctionMetrics>,
}

/// Output of one file's analysis pass, before aggregation.
#[derive(Clone, Debug, Default)]
pub struct FileResult {
    pub findings: Vec<Finding>,
    pub metrics: Option<FileMetrics>,
}

/// Quality-gate outcome for the whole run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GateStatus {
    Pass,
    Fail,
}

impl GateStatus {
    pub fn is_pass(&self) -> bool {
        matches!(self, GateStatus::Pass)
    }
}

/// Aggregate counts for the report header and gate evaluation.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub files_analyzed: usize,
    pub total_findings: usize,
    pub by_severity: BTreeMap<Severity, usize>,
    pub by_category: BTreeMap<RuleCategory, usize>,
    pub total_functions: usize,
    pub max_cyclomatic: u32,
    pub average_cyclomatic: f64,
}

impl ReportSummary {
    pub fn severity_count(&self, severity: Severity) -> usize {
        self.by_severity.get(&severity).copied().unwrap_or(0)
    }
}

/// Final, immutable result of a run.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Report {
    pub timestamp: DateTime<Utc>,
    pub findings: Vec<Finding>,
    pub metrics: Vec<FileMetrics>,
    pub summary: ReportSummary,
    pub gate: GateStatus,
    /// True when a run deadline cut the analysis short; the findings present
    /// cover only the files completed before the deadline.
    pub truncated: bool,
}
