//! Function-unit detection and complexity metrics.
//!
//! Units are found by brace-depth tracking (with or without a function
//! keyword) or by indentation, depending on the language profile. When no
//! unit can be detected the whole file becomes one unit; degraded, but
//! defined. Metrics follow the classic approximations:
//!
//! - cyclomatic = 1 + decision keywords + short-circuit operators
//! - cognitive  = (1 + nesting) per decision keyword, +1 per operator
//! - nesting    = deepest block level reached inside the unit body

use crate::core::{Finding, FunctionMetrics, RuleCategory, Severity};
use crate::languages::{BoundaryKind, LanguageProfile};
use crate::rules::{MatcherKind, MetricKind, Rule};
use crate::scanner::{Token, TokenKind};
use std::path::Path;

/// A function-like region of the token stream.
#[derive(Clone, Debug)]
pub struct FunctionUnit {
    pub name: String,
    pub start_line: usize,
    pub end_line: usize,
    pub tokens: Vec<Token>,
}

/// Indentation step assumed when a file gives no evidence of its own.
const DEFAULT_INDENT_UNIT: usize = 4;

pub fn analyze(
    tokens: &[Token],
    lines: &[&str],
    profile: &LanguageProfile,
    file: &Path,
) -> Vec<FunctionMetrics> {
    let mut units = detect_units(tokens, lines, profile);
    if units.is_empty() {
        units.push(file_scope_unit(tokens, lines));
    }
    units
        .into_iter()
        .map(|unit| unit_metrics(unit, profile, lines, file))
        .collect()
}

/// Convert metrics that exceed configured limits into complexity findings.
/// Severity is the rule's configured level, promoted to at least `High`
/// when the metric is more than twice the limit.
pub fn check_thresholds(metrics: &[FunctionMetrics], rules: &[Rule]) -> Vec<Finding> {
    let mut findings = Vec::new();
    for rule in rules.iter().filter(|r| r.enabled) {
        let (metric_kind, limit) = match &rule.matcher {
            MatcherKind::Threshold { metric, limit } => (*metric, *limit),
            _ => continue,
        };
        for m in metrics {
            let value = match metric_kind {
                MetricKind::Cyclomatic => m.cyclomatic,
                MetricKind::Cognitive => m.cognitive,
                MetricKind::Nesting => m.nesting,
            };
            if value > limit {
                let severity = if value > limit.saturating_mul(2) {
                    rule.severity.max(Severity::High)
                } else {
                    rule.severity
                };
                findings.push(Finding::new(
                    m.file.clone(),
                    m.line,
                    rule.id.clone(),
                    severity,
                    RuleCategory::Complexity,
                    format!(
                        "{} {} of `{}` exceeds threshold {}",
                        metric_kind.label(),
                        value,
                        m.name,
                        limit
                    ),
                ));
            }
        }
    }
    findings
}

pub fn detect_units(
    tokens: &[Token],
    lines: &[&str],
    profile: &LanguageProfile,
) -> Vec<FunctionUnit> {
    match profile.boundary {
        BoundaryKind::Brace if !profile.function_keywords.is_empty() => {
            keyword_brace_units(tokens, profile)
        }
        BoundaryKind::Brace => top_level_brace_units(tokens),
        BoundaryKind::Indent => indent_units(tokens, lines, profile),
        BoundaryKind::None => Vec::new(),
    }
}

fn code_tokens(tokens: &[Token]) -> Vec<&Token> {
    tokens.iter().filter(|t| t.kind == TokenKind::Code).collect()
}

/// Best-effort unit name: the last identifier directly preceding a `(` in
/// the keyword-to-brace window (handles Go method receivers), else the
/// first identifier after the keyword.
fn function_name(window: &[&Token]) -> String {
    let mut name = None;
    for pair in window.windows(2) {
        if is_word(&pair[0].text) && pair[1].text == "(" {
            name = Some(pair[0].text.clone());
        }
    }
    name.or_else(|| {
        window
            .first()
            .filter(|t| is_word(&t.text))
            .map(|t| t.text.clone())
    })
    .unwrap_or_else(|| "<anonymous>".to_string())
}

fn keyword_brace_units(tokens: &[Token], profile: &LanguageProfile) -> Vec<FunctionUnit> {
    let code = code_tokens(tokens);
    let mut units = Vec::new();
    let mut i = 0;
    while i < code.len() {
        if !profile.function_keywords.contains(&code[i].text.as_str()) {
            i += 1;
            continue;
        }
        let mut j = i + 1;
        while j < code.len() && code[j].text != "{" {
            // A sibling keyword before any brace means this one had no body
            // (trait method signatures, forward declarations).
            if profile.function_keywords.contains(&code[j].text.as_str()) {
                break;
            }
            j += 1;
        }
        if j >= code.len() || code[j].text != "{" {
            i = j.max(i + 1);
            continue;
        }
        let name = function_name(&code[i + 1..j]);
        let mut depth = 1u32;
        let mut k = j + 1;
        while k < code.len() && depth > 0 {
            match code[k].text.as_str() {
                "{" => depth += 1,
                "}" => depth -= 1,
                _ => {}
            }
            k += 1;
        }
        units.push(FunctionUnit {
            name,
            start_line: code[i].line,
            end_line: code[k.saturating_sub(1)].line,
            tokens: code[j..k].iter().map(|t| (*t).clone()).collect(),
        });
        i = k;
    }
    units
}

/// Languages like Java and C have no function keyword; treat each top-level
/// brace group as a unit and name it after the identifier preceding the
/// nearest call-style parenthesis.
fn top_level_brace_units(tokens: &[Token]) -> Vec<FunctionUnit> {
    let code = code_tokens(tokens);
    let mut units = Vec::new();
    let mut depth = 0u32;
    let mut last_word: Option<String> = None;
    let mut candidate: Option<String> = None;
    let mut start: Option<(usize, String, usize)> = None;

    for (idx, token) in code.iter().enumerate() {
        match token.text.as_str() {
            "{" => {
                depth += 1;
                if depth == 1 {
                    let name = candidate
                        .take()
                        .or_else(|| last_word.clone())
                        .unwrap_or_else(|| "<unit>".to_string());
                    start = Some((idx, name, token.line));
                }
            }
            "}" => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    if let Some((start_idx, name, start_line)) = start.take() {
                        units.push(FunctionUnit {
                            name,
                            start_line,
                            end_line: token.line,
                            tokens: code[start_idx..=idx].iter().map(|t| (*t).clone()).collect(),
                        });
                    }
                }
            }
            "(" if depth == 0 => candidate = last_word.clone(),
            text if is_word(text) && depth == 0 => last_word = Some(text.to_string()),
            _ => {}
        }
    }
    units
}

fn indent_units(tokens: &[Token], lines: &[&str], profile: &LanguageProfile) -> Vec<FunctionUnit> {
    let code = code_tokens(tokens);
    let code_lines: std::collections::BTreeSet<usize> = code.iter().map(|t| t.line).collect();
    let mut units = Vec::new();
    let mut i = 0;
    while i < code.len() {
        let token = code[i];
        if !profile.function_keywords.contains(&token.text.as_str()) {
            i += 1;
            continue;
        }
        let def_line = token.line;
        let def_indent = line_indent(lines, def_line);
        let name = code
            .get(i + 1)
            .filter(|t| is_word(&t.text))
            .map(|t| t.text.clone())
            .unwrap_or_else(|| "<anonymous>".to_string());

        // The unit ends at the last line before code returns to the
        // definition's indentation level. Blank and comment-only lines
        // never close a unit.
        let mut end_line = def_line;
        for line_no in (def_line + 1)..=lines.len() {
            if !code_lines.contains(&line_no) {
                continue;
            }
            if line_indent(lines, line_no) <= def_indent {
                break;
            }
            end_line = line_no;
        }

        let unit_tokens: Vec<Token> = code
            .iter()
            .filter(|t| t.line >= def_line && t.line <= end_line)
            .map(|t| (*t).clone())
            .collect();
        // Skip past this unit; nested definitions belong to it.
        while i < code.len() && code[i].line <= end_line {
            i += 1;
        }
        units.push(FunctionUnit {
            name,
            start_line: def_line,
            end_line,
            tokens: unit_tokens,
        });
    }
    units
}

fn file_scope_unit(tokens: &[Token], lines: &[&str]) -> FunctionUnit {
    FunctionUnit {
        name: "<file>".to_string(),
        start_line: 1,
        end_line: lines.len().max(1),
        tokens: code_tokens(tokens).into_iter().cloned().collect(),
    }
}

fn unit_metrics(
    unit: FunctionUnit,
    profile: &LanguageProfile,
    lines: &[&str],
    file: &Path,
) -> FunctionMetrics {
    let mut metrics = FunctionMetrics::new(unit.name.clone(), file.to_path_buf(), unit.start_line);
    metrics.end_line = unit.end_line;
    metrics.length = unit.end_line.saturating_sub(unit.start_line) + 1;

    match profile.boundary {
        BoundaryKind::Indent => indent_weights(&unit, profile, lines, &mut metrics),
        _ => brace_weights(&unit, profile, &mut metrics),
    }
    metrics
}

fn brace_weights(unit: &FunctionUnit, profile: &LanguageProfile, metrics: &mut FunctionMetrics) {
    // Skip the unit's own opening brace so statements at body level sit at
    // nesting 0.
    let body = match unit.tokens.first() {
        Some(t) if t.text == "{" => &unit.tokens[1..],
        _ => &unit.tokens[..],
    };
    let mut depth = 0u32;
    for token in body {
        match token.text.as_str() {
            "{" => {
                depth += 1;
                metrics.nesting = metrics.nesting.max(depth);
            }
            "}" => depth = depth.saturating_sub(1),
            text if profile.decision_keywords.contains(&text) => {
                metrics.cyclomatic += 1;
                metrics.cognitive += 1 + depth;
            }
            text if profile.boolean_operators.contains(&text) => {
                metrics.cyclomatic += 1;
                metrics.cognitive += 1;
            }
            _ => {}
        }
    }
}

fn indent_weights(
    unit: &FunctionUnit,
    profile: &LanguageProfile,
    lines: &[&str],
    metrics: &mut FunctionMetrics,
) {
    let def_indent = line_indent(lines, unit.start_line);
    let body_indent = unit
        .tokens
        .iter()
        .find(|t| t.line > unit.start_line)
        .map(|t| line_indent(lines, t.line))
        .unwrap_or(def_indent + DEFAULT_INDENT_UNIT);
    let diff = body_indent.saturating_sub(def_indent);
    // File-scope fallback has no indent evidence; assume a common step.
    let step = if diff == 0 { DEFAULT_INDENT_UNIT } else { diff };

    for token in &unit.tokens {
        let indent = line_indent(lines, token.line);
        let depth = (indent.saturating_sub(body_indent) / step) as u32;
        if token.line > unit.start_line {
            metrics.nesting = metrics.nesting.max(depth);
        }
        let text = token.text.as_str();
        if profile.decision_keywords.contains(&text) {
            metrics.cyclomatic += 1;
            metrics.cognitive += 1 + depth;
        } else if profile.boolean_operators.contains(&text) {
            metrics.cyclomatic += 1;
            metrics.cognitive += 1;
        }
    }
}

fn line_indent(lines: &[&str], line_no: usize) -> usize {
    lines
        .get(line_no.saturating_sub(1))
        .map(|l| l.chars().take_while(|c| c.is_whitespace()).count())
        .unwrap_or(0)
}

fn is_word(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_')
}

impl MetricKind {
    pub fn label(&self) -> &'static str {
        match self {
            MetricKind::Cyclomatic => "cyclomatic complexity",
            MetricKind::Cognitive => "cognitive complexity",
            MetricKind::Nesting => "nesting depth",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::languages::Language;
    use crate::scanner;
    use indoc::indoc;
    use std::path::PathBuf;

    fn analyze_snippet(content: &str, lang: Language) -> Vec<FunctionMetrics> {
        let profile = lang.profile();
        let tokens = scanner::scan(content, profile);
        let lines: Vec<&str> = content.lines().collect();
        analyze(&tokens, &lines, profile, &PathBuf::from("test.src"))
    }

    #[test]
    fn one_if_and_one_and_yields_cyclomatic_three() {
        let content = indoc! {r#"
            fn check(a: bool, b: bool) -> bool {
                if a && b {
                    return true;
                }
                false
            }
        "#};
        let metrics = analyze_snippet(content, Language::Rust);
        assert_eq!(metrics.len(), 1);
        assert_eq!(metrics[0].cyclomatic, 3);
    }

    #[test]
    fn nested_if_weighs_more_than_sequential() {
        let nested = indoc! {r#"
            fn f() {
                if a {
                    if b {
                        g();
                    }
                }
            }
        "#};
        let sequential = indoc! {r#"
            fn f() {
                if a {
                    g();
                }
                if b {
                    g();
                }
            }
        "#};
        let n = &analyze_snippet(nested, Language::Rust)[0];
        let s = &analyze_snippet(sequential, Language::Rust)[0];
        assert_eq!(n.cyclomatic, s.cyclomatic);
        assert!(n.cognitive > s.cognitive, "nested {} vs sequential {}", n.cognitive, s.cognitive);
        assert_eq!(n.nesting, 2);
        assert_eq!(s.nesting, 1);
    }

    #[test]
    fn python_indent_units_close_on_dedent() {
        let content = indoc! {r#"
            def first(x):
                if x:
                    return 1
                return 0

            def second(y):
                while y:
                    y -= 1
        "#};
        let metrics = analyze_snippet(content, Language::Python);
        assert_eq!(metrics.len(), 2);
        assert_eq!(metrics[0].name, "first");
        assert_eq!(metrics[1].name, "second");
        assert_eq!(metrics[0].cyclomatic, 2);
        assert_eq!(metrics[1].cyclomatic, 2);
    }

    #[test]
    fn file_without_functions_falls_back_to_file_scope() {
        let content = "x = 1\nif x:\n    print(x)\n";
        let metrics = analyze_snippet(content, Language::Python);
        assert_eq!(metrics.len(), 1);
        assert_eq!(metrics[0].name, "<file>");
        assert_eq!(metrics[0].cyclomatic, 2);
    }

    #[test]
    fn java_methods_detected_without_function_keyword() {
        let content = indoc! {r#"
            class Account {
                void debit(int amount) {
                    if (amount > 0 && open) {
                        balance -= amount;
                    }
                }
            }
        "#};
        let metrics = analyze_snippet(content, Language::Java);
        // Top-level group detection sees the class as one unit.
        assert_eq!(metrics.len(), 1);
        assert_eq!(metrics[0].cyclomatic, 3);
    }

    #[test]
    fn threshold_findings_scale_severity() {
        let mut low = FunctionMetrics::new("busy".into(), PathBuf::from("a.rs"), 3);
        low.cyclomatic = 12;
        let mut very = FunctionMetrics::new("worse".into(), PathBuf::from("a.rs"), 40);
        very.cyclomatic = 25;
        let rules = vec![Rule {
            id: "max-cyclomatic-complexity".into(),
            category: RuleCategory::Complexity,
            severity: Severity::Medium,
            enabled: true,
            message: String::new(),
            matcher: MatcherKind::Threshold {
                metric: MetricKind::Cyclomatic,
                limit: 10,
            },
        }];
        let findings = check_thresholds(&[low, very], &rules);
        assert_eq!(findings.len(), 2);
        assert_eq!(findings[0].severity, Severity::Medium);
        assert_eq!(findings[1].severity, Severity::High);
    }

    #[test]
    fn decision_keywords_inside_comments_do_not_count() {
        let content = indoc! {r#"
            fn f() {
                // if this were code it would count
                let s = "if while for";
                g();
            }
        "#};
        let metrics = analyze_snippet(content, Language::Rust);
        assert_eq!(metrics[0].cyclomatic, 1);
    }
}
