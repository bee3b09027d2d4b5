//! Configuration loading and rule resolution.
//!
//! Defaults are merged with user overrides field-by-field per rule id, once
//! per run. The resolved set is immutable afterwards and shared read-only
//! across workers. Configuration problems are fatal before any file is
//! analyzed, with one deliberate exception: a user-supplied pattern that
//! fails to compile disables only that rule and surfaces as a warning
//! finding, so one bad regex cannot take down a CI run.

use crate::core::{Finding, RuleCategory, Severity};
use crate::rules::{builtin_rules, MatcherKind, Rule, RuleSpec, SpecKind};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default config file names probed in the working directory.
const CONFIG_FILE_NAMES: &[&str] = &[".codegate.yml", ".codegate.yaml"];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config syntax: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("unknown rule id '{0}'")]
    UnknownRule(String),
    #[error("invalid value for rule '{rule}': {reason}")]
    InvalidValue { rule: String, reason: String },
}

/// User-facing configuration file schema.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub rules: BTreeMap<String, RuleOverride>,
    #[serde(default)]
    pub complexity: ComplexityConfig,
    #[serde(default)]
    pub style: StyleConfig,
    #[serde(default)]
    pub gate: GateConfig,
}

/// Per-rule override; unset fields keep the built-in default.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleOverride {
    pub enabled: Option<bool>,
    pub severity: Option<Severity>,
    pub threshold: Option<u32>,
    pub pattern: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ComplexityConfig {
    pub max_cyclomatic: Option<u32>,
    pub max_cognitive: Option<u32>,
    pub max_nesting: Option<u32>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StyleConfig {
    pub max_line_length: Option<usize>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GateConfig {
    /// Gate fails when the critical finding count exceeds this.
    #[serde(default = "default_critical_threshold")]
    pub critical_issue_threshold: usize,
    /// Gate fails when the total finding count exceeds this.
    #[serde(default = "default_total_threshold")]
    pub total_issue_threshold: usize,
}

fn default_critical_threshold() -> usize {
    0
}

fn default_total_threshold() -> usize {
    200
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            critical_issue_threshold: default_critical_threshold(),
            total_issue_threshold: default_total_threshold(),
        }
    }
}

/// Fully resolved, compiled configuration. Safe to share across threads.
#[derive(Clone, Debug)]
pub struct ResolvedConfig {
    pub rules: Vec<Rule>,
    pub gate: GateConfig,
    /// Findings produced during resolution (disabled rules with bad
    /// patterns); merged into the report by the aggregator.
    pub warnings: Vec<Finding>,
}

impl Config {
    /// Load from an explicit path, or probe the working directory for
    /// `.codegate.yml`. A missing explicit path is an error; an absent
    /// default file just means defaults.
    pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
        match path {
            Some(p) => Self::from_file(p),
            None => {
                for name in CONFIG_FILE_NAMES {
                    let candidate = PathBuf::from(name);
                    if candidate.is_file() {
                        return Self::from_file(&candidate);
                    }
                }
                Ok(Config::default())
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Config, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_yaml::from_str(&content)?)
    }

    /// Merge overrides onto the built-in rule set and compile patterns.
    pub fn resolve(self) -> Result<ResolvedConfig, ConfigError> {
        let mut specs = builtin_rules();
        let mut pattern_overrides: BTreeMap<String, String> = BTreeMap::new();

        apply_section_shorthand(&mut specs, &self.complexity, &self.style);

        for (id, over) in &self.rules {
            let spec = specs
                .iter_mut()
                .find(|s| s.id == id.as_str())
                .ok_or_else(|| ConfigError::UnknownRule(id.clone()))?;
            if let Some(enabled) = over.enabled {
                spec.enabled = enabled;
            }
            if let Some(severity) = over.severity {
                spec.severity = severity;
            }
            if let Some(threshold) = over.threshold {
                apply_threshold(spec, threshold)?;
            }
            if let Some(pattern) = &over.pattern {
                match spec.kind {
                    SpecKind::Pattern { .. } => {
                        pattern_overrides.insert(id.clone(), pattern.clone());
                    }
                    _ => {
                        return Err(ConfigError::InvalidValue {
                            rule: id.clone(),
                            reason: "pattern override only applies to pattern rules".to_string(),
                        })
                    }
                }
            }
        }

        let mut rules = Vec::with_capacity(specs.len());
        let mut warnings = Vec::new();
        for spec in specs {
            rules.push(compile_rule(spec, &pattern_overrides, &mut warnings));
        }

        Ok(ResolvedConfig {
            rules,
            gate: self.gate,
            warnings,
        })
    }
}

/// The `complexity` and `style` sections are shorthand for threshold
/// overrides on the corresponding built-in rules.
fn apply_section_shorthand(specs: &mut [RuleSpec], complexity: &ComplexityConfig, style: &StyleConfig) {
    let shorthand: &[(&str, Option<u32>)] = &[
        ("max-cyclomatic-complexity", complexity.max_cyclomatic),
        ("max-cognitive-complexity", complexity.max_cognitive),
        ("max-nesting-depth", complexity.max_nesting),
    ];
    for (id, value) in shorthand {
        if let Some(limit) = value {
            if let Some(spec) = specs.iter_mut().find(|s| s.id == *id) {
                if let SpecKind::Threshold { metric, .. } = spec.kind {
                    spec.kind = SpecKind::Threshold {
                        metric,
                        limit: *limit,
                    };
                }
            }
        }
    }
    if let Some(max) = style.max_line_length {
        if let Some(spec) = specs.iter_mut().find(|s| s.id == "line-length") {
            spec.kind = SpecKind::LineLength { max };
        }
    }
}

fn apply_threshold(spec: &mut RuleSpec, threshold: u32) -> Result<(), ConfigError> {
    if threshold == 0 {
        return Err(ConfigError::InvalidValue {
            rule: spec.id.to_string(),
            reason: "threshold must be positive".to_string(),
        });
    }
    match spec.kind {
        SpecKind::Threshold { metric, .. } => {
            spec.kind = SpecKind::Threshold {
                metric,
                limit: threshold,
            };
            Ok(())
        }
        SpecKind::LineLength { .. } => {
            spec.kind = SpecKind::LineLength {
                max: threshold as usize,
            };
            Ok(())
        }
        SpecKind::Pattern { .. } => Err(ConfigError::InvalidValue {
            rule: spec.id.to_string(),
            reason: "threshold override only applies to threshold rules".to_string(),
        }),
    }
}

fn compile_rule(
    spec: RuleSpec,
    pattern_overrides: &BTreeMap<String, String>,
    warnings: &mut Vec<Finding>,
) -> Rule {
    let mut enabled = spec.enabled;
    let matcher = match spec.kind {
        SpecKind::LineLength { max } => MatcherKind::LineLength { max },
        SpecKind::Threshold { metric, limit } => MatcherKind::Threshold { metric, limit },
        SpecKind::Pattern { pattern, scope } => {
            let source = pattern_overrides
                .get(spec.id)
                .map(String::as_str)
                .unwrap_or(pattern);
            match Regex::new(source) {
                Ok(regex) => MatcherKind::Pattern { regex, scope },
                Err(err) => {
                    // Built-in patterns are covered by tests; this branch is
                    // reachable only through a user override.
                    log::warn!("disabling rule '{}': invalid pattern: {err}", spec.id);
                    warnings.push(Finding::new(
                        "<config>",
                        0,
                        "internal/invalid-rule-pattern",
                        Severity::Low,
                        RuleCategory::Internal,
                        format!("Rule '{}' disabled for this run: invalid pattern", spec.id),
                    ));
                    enabled = false;
                    // Keep the default pattern as a placeholder matcher.
                    MatcherKind::Pattern {
                        regex: Regex::new(pattern).unwrap_or_else(|_| Regex::new(r"\z.").expect("never matches")),
                        scope,
                    }
                }
            }
        }
    };
    Rule {
        id: spec.id.to_string(),
        category: spec.category,
        severity: spec.severity,
        enabled,
        message: spec.message.to_string(),
        matcher,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    #[test]
    fn default_config_resolves_all_builtin_rules() {
        let resolved = Config::default().resolve().unwrap();
        assert_eq!(resolved.rules.len(), builtin_rules().len());
        assert!(resolved.warnings.is_empty());
        assert_eq!(resolved.gate.critical_issue_threshold, 0);
    }

    #[test]
    fn override_merges_field_by_field() {
        let config: Config = serde_yaml::from_str(indoc! {r#"
            rules:
              line-length:
                threshold: 80
                severity: medium
              eval-usage:
                enabled: false
        "#})
        .unwrap();
        let resolved = config.resolve().unwrap();
        let line_length = resolved.rules.iter().find(|r| r.id == "line-length").unwrap();
        assert_eq!(line_length.severity, Severity::Medium);
        assert!(matches!(line_length.matcher, MatcherKind::LineLength { max: 80 }));
        let eval = resolved.rules.iter().find(|r| r.id == "eval-usage").unwrap();
        assert!(!eval.enabled);
        // Untouched rules keep their defaults.
        let secret = resolved.rules.iter().find(|r| r.id == "hardcoded-secret").unwrap();
        assert!(secret.enabled);
        assert_eq!(secret.severity, Severity::Critical);
    }

    #[test]
    fn unknown_rule_id_is_fatal() {
        let config: Config = serde_yaml::from_str("rules:\n  no-such-rule:\n    enabled: false\n").unwrap();
        match config.resolve() {
            Err(ConfigError::UnknownRule(id)) => assert_eq!(id, "no-such-rule"),
            other => panic!("expected UnknownRule, got {other:?}"),
        }
    }

    #[test]
    fn malformed_severity_fails_at_parse() {
        let result: Result<Config, _> =
            serde_yaml::from_str("rules:\n  eval-usage:\n    severity: enormous\n");
        assert!(result.is_err());
    }

    #[test]
    fn zero_threshold_is_invalid() {
        let config: Config =
            serde_yaml::from_str("rules:\n  max-nesting-depth:\n    threshold: 0\n").unwrap();
        assert!(matches!(config.resolve(), Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn pattern_override_on_threshold_rule_is_invalid() {
        let config: Config = serde_yaml::from_str(
            "rules:\n  max-nesting-depth:\n    pattern: \"foo\"\n",
        )
        .unwrap();
        assert!(matches!(config.resolve(), Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn invalid_user_pattern_disables_rule_with_warning() {
        let config: Config = serde_yaml::from_str(
            "rules:\n  todo-comment:\n    pattern: \"([unclosed\"\n",
        )
        .unwrap();
        let resolved = config.resolve().unwrap();
        let todo = resolved.rules.iter().find(|r| r.id == "todo-comment").unwrap();
        assert!(!todo.enabled);
        assert_eq!(resolved.warnings.len(), 1);
        assert_eq!(resolved.warnings[0].category, RuleCategory::Internal);
    }

    #[test]
    fn complexity_section_is_threshold_shorthand() {
        let config: Config = serde_yaml::from_str("complexity:\n  max_cyclomatic: 5\n").unwrap();
        let resolved = config.resolve().unwrap();
        let rule = resolved
            .rules
            .iter()
            .find(|r| r.id == "max-cyclomatic-complexity")
            .unwrap();
        assert!(matches!(
            rule.matcher,
            MatcherKind::Threshold { limit: 5, .. }
        ));
    }
}
