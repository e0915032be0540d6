// LogAnalyzer - main.rs
//
// Application entry point. Handles:
// 1. CLI argument parsing
// 2. Settings loading and logging initialisation (debug mode support)
// 3. Building pipeline options from CLI flags over settings values
// 4. Exit-code mapping

use clap::{Args, Parser, Subcommand};
use loganalyzer::app::pipeline::{self, PipelineOptions};
use loganalyzer::app::scheduler::Concurrency;
use loganalyzer::core::analyzer::{Analyzer, SimulatedStrategy};
use loganalyzer::core::export::ReportFormat;
use loganalyzer::platform::config::{self, AppConfig, PlatformPaths};
use loganalyzer::util::{constants, logging};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

/// LogAnalyzer - concurrent batch analyser for configured log files.
///
/// Reads a JSON list of log descriptors, analyses every file in parallel,
/// prints a summary and optionally writes a JSON or CSV report.
#[derive(Parser, Debug)]
#[command(name = "loganalyzer", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Settings file (defaults to config.toml in the platform config directory).
    #[arg(long = "settings", global = true)]
    settings: Option<PathBuf>,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug", global = true)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Analyse the log files listed in a configuration file.
    ///
    /// Example: loganalyzer analyze -c config.json -o report.json
    Analyze(AnalyzeArgs),
}

#[derive(Args, Debug)]
struct AnalyzeArgs {
    /// JSON list of {"id", "path", "type"} log descriptors.
    #[arg(short = 'c', long = "config")]
    config: PathBuf,

    /// Write a report to this file.
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// Prefix the report file name with a yyMMdd_HHmmss timestamp.
    #[arg(short = 't', long = "timestamp")]
    timestamp: bool,

    /// Report format: json or csv.
    #[arg(long = "format")]
    format: Option<ReportFormat>,

    /// Maximum concurrent analyses (0 = one thread per file).
    #[arg(
        short = 'j',
        long = "jobs",
        value_parser = clap::builder::RangedU64ValueParser::<usize>::new()
            .range(0..=constants::ABSOLUTE_MAX_CONCURRENCY as u64)
    )]
    jobs: Option<usize>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let settings_path = cli
        .settings
        .clone()
        .unwrap_or_else(|| PlatformPaths::resolve().settings_file());
    let (settings, settings_warnings) = config::load_config(&settings_path);

    logging::init(cli.debug, settings.log_level.as_deref());

    for warning in &settings_warnings {
        tracing::warn!(warning = %warning, "Settings warning");
    }

    tracing::info!(
        version = constants::APP_VERSION,
        settings = %settings_path.display(),
        debug = cli.debug,
        "LogAnalyzer starting"
    );

    match cli.command {
        Command::Analyze(args) => analyze(args, &settings),
    }
}

fn analyze(args: AnalyzeArgs, settings: &AppConfig) -> ExitCode {
    let options = PipelineOptions {
        config_path: args.config,
        output: args.output,
        timestamped: args.timestamp || settings.timestamped,
        format: args.format.unwrap_or(settings.report_format),
        concurrency: Concurrency::from_limit(args.jobs.unwrap_or(settings.max_concurrency)),
    };

    let analyzer = Analyzer::with_strategy(SimulatedStrategy::new(
        settings.min_delay_ms,
        settings.max_delay_ms,
        settings.failure_rate,
    ));

    tracing::info!(config = %options.config_path.display(), "Starting analysis");

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match pipeline::run(&options, &analyzer, &mut out) {
        Ok(summary) => {
            tracing::info!(
                succeeded = summary.succeeded,
                total = summary.outcomes.len(),
                "Analysis finished"
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "Analysis failed");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
