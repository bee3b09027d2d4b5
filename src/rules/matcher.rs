//! Rule evaluation over the scanned token stream and raw lines.
//!
//! Pattern rules see a per-line "view": the concatenation of that line's
//! tokens of the allowed kinds, joined with single spaces. Comments never
//! appear in any view, and string literals appear only for rules scoped
//! `CodeAndStrings`. Raw-line rules bypass tokens entirely. Matching is a
//! pure function of (tokens, lines, rules); no state survives a file.

use crate::core::{Finding, RuleCategory};
use crate::rules::{MatcherKind, PatternScope, Rule};
use crate::scanner::{Token, TokenKind};
use std::collections::BTreeMap;
use std::path::Path;

pub fn run_rules(tokens: &[Token], lines: &[&str], file: &Path, rules: &[Rule]) -> Vec<Finding> {
    let code_view = line_view(tokens, false);
    let string_view = line_view(tokens, true);

    let mut findings = Vec::new();
    for rule in rules.iter().filter(|r| r.enabled) {
        match &rule.matcher {
            MatcherKind::Pattern { regex, scope } => {
                let view: Box<dyn Iterator<Item = (usize, &str)> + '_> = match scope {
                    PatternScope::RawLine => Box::new(
                        lines.iter().enumerate().map(|(i, l)| (i + 1, *l)),
                    ),
                    PatternScope::Code => {
                        Box::new(code_view.iter().map(|(n, l)| (*n, l.as_str())))
                    }
                    PatternScope::CodeAndStrings => {
                        Box::new(string_view.iter().map(|(n, l)| (*n, l.as_str())))
                    }
                };
                for (line_no, text) in view {
                    if regex.is_match(text) {
                        findings.push(Finding::new(
                            file,
                            line_no,
                            rule.id.clone(),
                            rule.severity,
                            rule.category,
                            rule.message.clone(),
                        ));
                    }
                }
            }
            MatcherKind::LineLength { max } => {
                for (idx, line) in lines.iter().enumerate() {
                    let width = line.chars().count();
                    if width > *max {
                        findings.push(Finding::new(
                            file,
                            idx + 1,
                            rule.id.clone(),
                            rule.severity,
                            RuleCategory::Style,
                            format!("Line exceeds {max} characters ({width})"),
                        ));
                    }
                }
            }
            // Threshold rules operate on complexity metrics, not tokens.
            MatcherKind::Threshold { .. } => {}
        }
    }
    findings
}

/// Per-line concatenation of token texts, space-joined. Patterns written
/// against this view use `\s*` wherever the scanner may split tokens.
fn line_view(tokens: &[Token], include_strings: bool) -> BTreeMap<usize, String> {
    let mut view: BTreeMap<usize, String> = BTreeMap::new();
    for token in tokens {
        let keep = match token.kind {
            TokenKind::Code => true,
            TokenKind::Str => include_strings,
            TokenKind::Comment | TokenKind::Whitespace => false,
        };
        if !keep {
            continue;
        }
        let entry = view.entry(token.line).or_default();
        if !entry.is_empty() {
            entry.push(' ');
        }
        entry.push_str(&token.text);
    }
    view
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::core::Severity;
    use crate::languages::Language;
    use crate::scanner;
    use std::path::PathBuf;

    fn run_builtin(content: &str, lang: Language) -> Vec<Finding> {
        let resolved = Config::default().resolve().expect("default config resolves");
        let profile = lang.profile();
        let tokens = scanner::scan(content, profile);
        let lines: Vec<&str> = content.lines().collect();
        run_rules(&tokens, &lines, &PathBuf::from("test.py"), &resolved.rules)
    }

    #[test]
    fn secret_in_string_literal_is_reported() {
        let findings = run_builtin(
            "api_key = \"sk_live_ABCDEF1234567890\"\n",
            Language::Python,
        );
        assert!(findings.iter().any(|f| f.rule_id == "hardcoded-secret"));
        assert_eq!(
            findings.iter().find(|f| f.rule_id == "hardcoded-secret").map(|f| f.severity),
            Some(Severity::Critical)
        );
    }

    #[test]
    fn secret_in_comment_is_not_reported() {
        let findings = run_builtin(
            "# api_key = \"sk_live_ABCDEF1234567890\"\n",
            Language::Python,
        );
        assert!(!findings.iter().any(|f| f.rule_id == "hardcoded-secret"));
    }

    #[test]
    fn eval_in_code_fires_but_not_in_string() {
        let hit = run_builtin("result = eval(user_input)\n", Language::Python);
        assert!(hit.iter().any(|f| f.rule_id == "eval-usage"));

        let quoted = run_builtin("doc = \"call eval(x) carefully\"\n", Language::Python);
        assert!(!quoted.iter().any(|f| f.rule_id == "eval-usage"));
    }

    #[test]
    fn sql_concatenation_detected() {
        let findings = run_builtin(
            "query = \"SELECT * FROM users WHERE id=\" + user_id\n",
            Language::Python,
        );
        assert!(findings.iter().any(|f| f.rule_id == "sql-string-concat"));
    }

    #[test]
    fn shell_injection_detected_despite_token_splitting() {
        let findings = run_builtin("os.system(cmd)\n", Language::Python);
        assert!(findings.iter().any(|f| f.rule_id == "shell-injection"));
    }

    #[test]
    fn raw_line_rules_ignore_token_classification() {
        // The marker sits inside a comment; raw-line rules still see it.
        let findings = run_builtin("x = 1  # TODO: remove\n", Language::Python);
        assert!(findings.iter().any(|f| f.rule_id == "todo-comment"));
    }

    #[test]
    fn different_rules_on_same_line_all_survive() {
        let long_todo = format!("# TODO: {}\n", "x".repeat(130));
        let findings = run_builtin(&long_todo, Language::Python);
        let on_line_one: Vec<_> = findings.iter().filter(|f| f.line == 1).collect();
        assert!(on_line_one.iter().any(|f| f.rule_id == "todo-comment"));
        assert!(on_line_one.iter().any(|f| f.rule_id == "line-length"));
    }
}
