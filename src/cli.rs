use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Terminal,
    Json,
    Markdown,
}

#[derive(Parser, Debug)]
#[command(name = "codegate")]
#[command(about = "Multi-language static analysis with CI quality gates", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze files and evaluate the quality gate
    Analyze {
        /// Path to analyze (directory or single file)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "terminal")]
        format: OutputFormat,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Config file (defaults to .codegate.yml in the working directory)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Restrict analysis to these languages (e.g. python,rust,go)
        #[arg(long, value_delimiter = ',')]
        languages: Option<Vec<String>>,

        /// Glob patterns to exclude from discovery
        #[arg(long = "ignore", value_delimiter = ',')]
        ignore_patterns: Vec<String>,

        /// Override the gate's critical-issue threshold
        #[arg(long)]
        max_critical: Option<usize>,

        /// Override the gate's total-issue threshold
        #[arg(long)]
        max_total: Option<usize>,

        /// Disable parallel file analysis
        #[arg(long)]
        no_parallel: bool,

        /// Number of worker threads (0 = all cores)
        #[arg(short, long, default_value = "0")]
        jobs: usize,

        /// Run deadline in seconds; files not started in time are skipped
        /// and the report is marked truncated
        #[arg(long)]
        timeout: Option<u64>,
    },

    /// Write a starter .codegate.yml with the default rule set
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}
