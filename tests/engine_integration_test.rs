use codegate::config::Config;
use codegate::io::walker::FileWalker;
use codegate::{engine, EngineOptions, GateStatus, RuleCategory, Severity};
use indoc::indoc;
use pretty_assertions::assert_eq;
use std::fs;

fn write_fixture_project(dir: &std::path::Path) {
    fs::write(
        dir.join("app.py"),
        indoc! {r#"
            import subprocess

            def handler(request):
                api_key = "sk_live_ABCDEF1234567890"
                if request.user and request.active:
                    subprocess.run(cmd)
                return api_key
        "#},
    )
    .unwrap();
    fs::write(
        dir.join("util.rs"),
        indoc! {r#"
            fn tangled(a: i32, b: i32, c: i32) -> i32 {
                if a > 0 {
                    if b > 0 {
                        if c > 0 {
                            if a > b {
                                if b > c && a > c {
                                    if a + b > c {
                                        return 1;
                                    }
                                }
                            }
                        }
                    }
                }
                0
            }
        "#},
    )
    .unwrap();
    fs::write(dir.join("notes.xyz"), format!("{}\n", "n".repeat(150))).unwrap();
}

#[test]
fn full_run_produces_expected_findings() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture_project(dir.path());

    let config = Config::default().resolve().unwrap();
    let files = FileWalker::new(dir.path().to_path_buf()).walk().unwrap();
    assert_eq!(files.len(), 3);

    let report = engine::run(&files, &config, &EngineOptions::default());

    // Secret in a Python string literal.
    assert!(report
        .findings
        .iter()
        .any(|f| f.rule_id == "hardcoded-secret" && f.file.ends_with("app.py")));
    // Deeply nested Rust function trips the nesting threshold.
    assert!(report
        .findings
        .iter()
        .any(|f| f.rule_id == "max-nesting-depth" && f.file.ends_with("util.rs")));
    // Unknown extension gets style checks but no complexity findings.
    assert!(report
        .findings
        .iter()
        .any(|f| f.rule_id == "line-length" && f.file.ends_with("notes.xyz")));
    assert!(!report
        .findings
        .iter()
        .any(|f| f.category == RuleCategory::Complexity && f.file.ends_with("notes.xyz")));

    // One critical finding fails the default gate (threshold 0).
    assert_eq!(report.gate, GateStatus::Fail);
    assert!(report.summary.severity_count(Severity::Critical) >= 1);
    assert!(!report.truncated);
}

#[test]
fn serial_and_parallel_runs_agree() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture_project(dir.path());

    let config = Config::default().resolve().unwrap();
    let files = FileWalker::new(dir.path().to_path_buf()).walk().unwrap();

    let serial = engine::run(
        &files,
        &config,
        &EngineOptions {
            parallel: false,
            ..Default::default()
        },
    );
    let parallel = engine::run(
        &files,
        &config,
        &EngineOptions {
            parallel: true,
            jobs: 2,
            deadline: None,
        },
    );

    assert_eq!(serial.findings, parallel.findings);
    assert_eq!(serial.summary, parallel.summary);
    assert_eq!(serial.gate, parallel.gate);
}

#[test]
fn report_serializes_to_json_and_back() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture_project(dir.path());

    let config = Config::default().resolve().unwrap();
    let files = FileWalker::new(dir.path().to_path_buf()).walk().unwrap();
    let report = engine::run(&files, &config, &EngineOptions::default());

    let json = serde_json::to_string(&report).unwrap();
    let parsed: codegate::Report = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed.findings, report.findings);
    assert_eq!(parsed.gate, report.gate);
}

#[test]
fn raised_gate_thresholds_turn_fail_into_pass() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture_project(dir.path());

    let mut config = Config::default().resolve().unwrap();
    config.gate.critical_issue_threshold = 10;
    config.gate.total_issue_threshold = 1000;

    let files = FileWalker::new(dir.path().to_path_buf()).walk().unwrap();
    let report = engine::run(&files, &config, &EngineOptions::default());
    assert_eq!(report.gate, GateStatus::Pass);
}
