//! The `analyze` command: discovery, engine run, rendering, gate result.

use crate::cli;
use crate::config::{Config, ConfigError};
use crate::core::GateStatus;
use crate::engine::{self, EngineOptions};
use crate::io::output::{create_writer, OutputFormat};
use crate::io::walker::FileWalker;
use crate::languages::Language;
use anyhow::Result;
use std::fs::File;
use std::path::PathBuf;
use std::time::Duration;

pub struct AnalyzeConfig {
    pub path: PathBuf,
    pub format: cli::OutputFormat,
    pub output: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub languages: Option<Vec<String>>,
    pub ignore_patterns: Vec<String>,
    pub max_critical: Option<usize>,
    pub max_total: Option<usize>,
    pub no_parallel: bool,
    pub jobs: usize,
    pub timeout: Option<u64>,
}

pub fn handle_analyze(config: AnalyzeConfig) -> Result<GateStatus> {
    // Configuration problems must surface before any file is touched.
    let mut resolved = Config::load(config.config.as_deref())?.resolve()?;
    if let Some(max_critical) = config.max_critical {
        resolved.gate.critical_issue_threshold = max_critical;
    }
    if let Some(max_total) = config.max_total {
        resolved.gate.total_issue_threshold = max_total;
    }

    let languages = parse_languages(config.languages.as_deref())?;
    let files = FileWalker::new(config.path.clone())
        .with_languages(languages)
        .with_ignore_patterns(config.ignore_patterns.clone())
        .walk()?;
    log::info!("analyzing {} files under {}", files.len(), config.path.display());

    let options = EngineOptions {
        parallel: !config.no_parallel,
        jobs: config.jobs,
        deadline: config.timeout.map(Duration::from_secs),
    };
    let report = engine::run(&files, &resolved, &options);

    let format = match config.format {
        cli::OutputFormat::Terminal => OutputFormat::Terminal,
        cli::OutputFormat::Json => OutputFormat::Json,
        cli::OutputFormat::Markdown => OutputFormat::Markdown,
    };
    let mut writer = match &config.output {
        Some(path) => create_writer(format, File::create(path)?),
        None => create_writer(format, std::io::stdout()),
    };
    writer.write_report(&report)?;

    Ok(report.gate)
}

fn parse_languages(names: Option<&[String]>) -> Result<Option<Vec<Language>>> {
    let Some(names) = names else {
        return Ok(None);
    };
    let mut languages = Vec::with_capacity(names.len());
    for name in names {
        let lang = Language::from_name(name).ok_or_else(|| ConfigError::InvalidValue {
            rule: "--languages".to_string(),
            reason: format!("unknown language '{name}'"),
        })?;
        languages.push(lang);
    }
    Ok(Some(languages))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_names_and_extensions_parse() {
        let langs = parse_languages(Some(&["python".to_string(), "rs".to_string()]))
            .unwrap()
            .unwrap();
        assert_eq!(langs, vec![Language::Python, Language::Rust]);
    }

    #[test]
    fn unknown_language_is_a_config_error() {
        let err = parse_languages(Some(&["klingon".to_string()])).unwrap_err();
        assert!(err.downcast_ref::<ConfigError>().is_some());
    }
}
