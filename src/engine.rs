//! Per-file analysis pipeline and the parallel run driver.
//!
//! Each file's analysis is independent and side-effect-free; the only shared
//! state is the read-only resolved configuration, so files fan out across a
//! rayon pool. Determinism of the final report comes from the aggregator's
//! sort, never from completion order.

use crate::config::ResolvedConfig;
use crate::core::{FileMetrics, FileResult, Finding, Report, RuleCategory, Severity};
use crate::languages::Language;
use crate::rules::matcher;
use crate::{complexity, io, report, scanner};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

#[derive(Clone, Debug)]
pub struct EngineOptions {
    pub parallel: bool,
    /// Worker count; 0 means all available cores.
    pub jobs: usize,
    /// Run deadline. Files not started before it are skipped and the report
    /// is flagged truncated.
    pub deadline: Option<Duration>,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            parallel: true,
            jobs: 0,
            deadline: None,
        }
    }
}

/// Analyze one file's content. Pure with respect to everything but the
/// given content; unknown languages degrade to raw-line style checks.
pub fn analyze_content(path: &Path, content: &str, config: &ResolvedConfig) -> FileResult {
    let language = Language::from_path(path);
    let profile = language.profile();
    let lines: Vec<&str> = content.lines().collect();

    if !profile.supports_tokens() {
        return FileResult {
            findings: matcher::run_rules(&[], &lines, path, &config.rules),
            metrics: None,
        };
    }

    let tokens = scanner::scan(content, profile);
    let mut findings = matcher::run_rules(&tokens, &lines, path, &config.rules);
    let functions = complexity::analyze(&tokens, &lines, profile, path);
    findings.extend(complexity::check_thresholds(&functions, &config.rules));

    FileResult {
        findings,
        metrics: Some(FileMetrics {
            file: path.to_path_buf(),
            language: language.display_name().to_string(),
            functions,
        }),
    }
}

fn analyze_path(path: &Path, config: &ResolvedConfig) -> FileResult {
    match io::read_file(path) {
        Ok(content) => analyze_content(path, &content, config),
        Err(err) => {
            log::debug!("skipping {}: {err}", path.display());
            FileResult {
                findings: vec![Finding::new(
                    path,
                    0,
                    "internal/unreadable-file",
                    Severity::Info,
                    RuleCategory::Internal,
                    format!("File skipped: {err}"),
                )],
                metrics: None,
            }
        }
    }
}

/// Analyze all files and aggregate into the final report.
pub fn run(files: &[PathBuf], config: &ResolvedConfig, options: &EngineOptions) -> Report {
    let start = Instant::now();
    let truncated = AtomicBool::new(false);

    let analyze_one = |path: &PathBuf| -> Option<FileResult> {
        if let Some(deadline) = options.deadline {
            if start.elapsed() >= deadline {
                truncated.store(true, Ordering::Relaxed);
                return None;
            }
        }
        Some(analyze_path(path, config))
    };

    let results: Vec<FileResult> = if !options.parallel {
        files.iter().filter_map(analyze_one).collect()
    } else {
        let jobs = if options.jobs > 0 {
            options.jobs
        } else {
            num_cpus::get()
        };
        log::debug!("analyzing {} files on {jobs} workers", files.len());
        match rayon::ThreadPoolBuilder::new().num_threads(jobs).build() {
            Ok(pool) => pool.install(|| files.par_iter().filter_map(&analyze_one).collect()),
            Err(err) => {
                log::warn!("falling back to default thread pool: {err}");
                files.par_iter().filter_map(&analyze_one).collect()
            }
        }
    };

    report::aggregate(results, config, truncated.load(Ordering::Relaxed))
}
