// Export modules for library usage
pub mod cli;
pub mod commands;
pub mod complexity;
pub mod config;
pub mod core;
pub mod engine;
pub mod io;
pub mod languages;
pub mod report;
pub mod rules;
pub mod scanner;

// Re-export commonly used types
pub use crate::core::{
    FileMetrics, FileResult, Finding, FunctionMetrics, GateStatus, Report, ReportSummary,
    RuleCategory, Severity,
};

pub use crate::config::{Config, ConfigError, GateConfig, ResolvedConfig};

pub use crate::engine::{analyze_content, run, EngineOptions};

pub use crate::languages::{BoundaryKind, Language, LanguageProfile};

pub use crate::rules::{builtin_rules, MatcherKind, MetricKind, PatternScope, Rule};

pub use crate::scanner::{scan, Scanner, Token, TokenKind};

pub use crate::io::output::{create_writer, OutputFormat, OutputWriter};

pub use crate::report::{aggregate, evaluate_gate};
