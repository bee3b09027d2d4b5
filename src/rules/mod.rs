//! Rule model and the built-in rule set.
//!
//! Matchers form a closed set of kinds (pattern, line-length, threshold) so
//! the evaluator handles every variant exhaustively; new kinds extend the
//! enum rather than introducing dynamic dispatch.

pub mod matcher;

use crate::core::{RuleCategory, Severity};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Which token kinds a pattern rule may see.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PatternScope {
    /// Code tokens only; comments and string literals are invisible.
    Code,
    /// Code plus string literals. Secret detection needs this: secrets live
    /// inside string literals.
    CodeAndStrings,
    /// Raw source lines, independent of token classification (style rules).
    RawLine,
}

/// Metric a threshold rule gates on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricKind {
    Cyclomatic,
    Cognitive,
    Nesting,
}

/// Compiled matcher for one rule.
#[derive(Clone, Debug)]
pub enum MatcherKind {
    Pattern { regex: Regex, scope: PatternScope },
    LineLength { max: usize },
    Threshold { metric: MetricKind, limit: u32 },
}

/// A resolved, immutable rule. Shared read-only across workers.
#[derive(Clone, Debug)]
pub struct Rule {
    pub id: String,
    pub category: RuleCategory,
    pub severity: Severity,
    pub enabled: bool,
    pub message: String,
    pub matcher: MatcherKind,
}

/// Uncompiled rule definition; defaults live here and user overrides are
/// merged onto these before pattern compilation.
#[derive(Clone, Debug)]
pub struct RuleSpec {
    pub id: &'static str,
    pub category: RuleCategory,
    pub severity: Severity,
    pub enabled: bool,
    pub message: &'static str,
    pub kind: SpecKind,
}

#[derive(Clone, Debug)]
pub enum SpecKind {
    Pattern {
        pattern: &'static str,
        scope: PatternScope,
    },
    LineLength {
        max: usize,
    },
    Threshold {
        metric: MetricKind,
        limit: u32,
    },
}

/// The built-in rule set. Patterns are written against the matcher's
/// token-joined line view, where adjacent tokens are separated by single
/// spaces, hence the liberal `\s*` between identifiers and punctuation.
pub fn builtin_rules() -> Vec<RuleSpec> {
    vec![
        RuleSpec {
            id: "hardcoded-secret",
            category: RuleCategory::Security,
            severity: Severity::Critical,
            enabled: true,
            message: "Hardcoded secret or credential",
            kind: SpecKind::Pattern {
                pattern: r#"(?i)(api[_-]?key|apikey|secret|passwd|password|auth[_-]?token|access[_-]?token)\s*[:=]\s*['"][^'"]{6,}['"]|sk[_-]live[_-][0-9a-zA-Z]{10,}|-----BEGIN [A-Z ]*PRIVATE KEY-----"#,
                scope: PatternScope::CodeAndStrings,
            },
        },
        RuleSpec {
            id: "eval-usage",
            category: RuleCategory::Security,
            severity: Severity::High,
            enabled: true,
            message: "Dynamic code evaluation (eval/exec)",
            kind: SpecKind::Pattern {
                pattern: r"\b(eval|exec|execfile)\s*\(",
                scope: PatternScope::Code,
            },
        },
        RuleSpec {
            id: "sql-string-concat",
            category: RuleCategory::Security,
            severity: Severity::High,
            enabled: true,
            message: "SQL assembled by string concatenation",
            kind: SpecKind::Pattern {
                pattern: r#"(?i)['"]\s*(select|insert|update|delete)\b[^'"]*['"]\s*(\+|%|\|\|)"#,
                scope: PatternScope::CodeAndStrings,
            },
        },
        RuleSpec {
            id: "shell-injection",
            category: RuleCategory::Security,
            severity: Severity::High,
            enabled: true,
            message: "Shell command built from program data",
            kind: SpecKind::Pattern {
                pattern: r"\b(os\s*\.\s*system|subprocess\s*\.\s*(call|run|Popen)|shell_exec|popen|proc_open)\s*\(|\bsystem\s*\(",
                scope: PatternScope::Code,
            },
        },
        RuleSpec {
            id: "line-length",
            category: RuleCategory::Style,
            severity: Severity::Low,
            enabled: true,
            message: "Line exceeds the configured maximum length",
            kind: SpecKind::LineLength { max: 120 },
        },
        RuleSpec {
            id: "trailing-whitespace",
            category: RuleCategory::Style,
            severity: Severity::Info,
            enabled: true,
            message: "Trailing whitespace",
            kind: SpecKind::Pattern {
                pattern: r"[ \t]+$",
                scope: PatternScope::RawLine,
            },
        },
        RuleSpec {
            id: "todo-comment",
            category: RuleCategory::Style,
            severity: Severity::Info,
            enabled: true,
            message: "TODO/FIXME marker",
            kind: SpecKind::Pattern {
                pattern: r"(?i)\b(TODO|FIXME|HACK|XXX)\b",
                scope: PatternScope::RawLine,
            },
        },
        RuleSpec {
            id: "merge-conflict-marker",
            category: RuleCategory::Style,
            severity: Severity::High,
            enabled: true,
            message: "Unresolved merge conflict marker",
            kind: SpecKind::Pattern {
                pattern: r"^(<{7}|={7}|>{7})( |$)",
                scope: PatternScope::RawLine,
            },
        },
        RuleSpec {
            id: "max-cyclomatic-complexity",
            category: RuleCategory::Complexity,
            severity: Severity::Medium,
            enabled: true,
            message: "Cyclomatic complexity over threshold",
            kind: SpecKind::Threshold {
                metric: MetricKind::Cyclomatic,
                limit: 10,
            },
        },
        RuleSpec {
            id: "max-cognitive-complexity",
            category: RuleCategory::Complexity,
            severity: Severity::Medium,
            enabled: true,
            message: "Cognitive complexity over threshold",
            kind: SpecKind::Threshold {
                metric: MetricKind::Cognitive,
                limit: 15,
            },
        },
        RuleSpec {
            id: "max-nesting-depth",
            category: RuleCategory::Complexity,
            severity: Severity::Medium,
            enabled: true,
            message: "Block nesting over threshold",
            kind: SpecKind::Threshold {
                metric: MetricKind::Nesting,
                limit: 4,
            },
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_rule_ids_are_unique() {
        let rules = builtin_rules();
        let mut ids: Vec<_> = rules.iter().map(|r| r.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), rules.len());
    }

    #[test]
    fn builtin_patterns_compile() {
        for spec in builtin_rules() {
            if let SpecKind::Pattern { pattern, .. } = spec.kind {
                assert!(Regex::new(pattern).is_ok(), "pattern for {} must compile", spec.id);
            }
        }
    }

    #[test]
    fn only_secret_rule_inspects_strings() {
        let string_aware: Vec<_> = builtin_rules()
            .into_iter()
            .filter(|r| {
                matches!(
                    r.kind,
                    SpecKind::Pattern {
                        scope: PatternScope::CodeAndStrings,
                        ..
                    }
                ) && r.category == RuleCategory::Security
            })
            .map(|r| r.id)
            .collect();
        assert!(string_aware.contains(&"hardcoded-secret"));
    }
}
