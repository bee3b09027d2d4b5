use clap::Parser;
use codegate::cli::{Cli, Commands};
use codegate::commands::analyze::{handle_analyze, AnalyzeConfig};
use codegate::commands::init::init_config;
use codegate::config::ConfigError;
use codegate::core::GateStatus;

// Exit codes consumed by CI scripts.
const EXIT_PASS: i32 = 0;
const EXIT_GATE_FAIL: i32 = 1;
const EXIT_CONFIG_ERROR: i32 = 2;
const EXIT_INTERNAL_ERROR: i32 = 3;

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let outcome = match cli.command {
        Commands::Analyze {
            path,
            format,
            output,
            config,
            languages,
            ignore_patterns,
            max_critical,
            max_total,
            no_parallel,
            jobs,
            timeout,
        } => handle_analyze(AnalyzeConfig {
            path,
            format,
            output,
            config,
            languages,
            ignore_patterns,
            max_critical,
            max_total,
            no_parallel,
            jobs,
            timeout,
        }),
        Commands::Init { force } => init_config(force).map(|()| GateStatus::Pass),
    };

    let code = match outcome {
        Ok(GateStatus::Pass) => EXIT_PASS,
        Ok(GateStatus::Fail) => EXIT_GATE_FAIL,
        Err(err) => {
            eprintln!("error: {err:#}");
            if err.downcast_ref::<ConfigError>().is_some() {
                EXIT_CONFIG_ERROR
            } else {
                EXIT_INTERNAL_ERROR
            }
        }
    };
    std::process::exit(code);
}
