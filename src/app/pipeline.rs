// LogAnalyzer - app/pipeline.rs
//
// End-to-end run: load descriptors, analyse them concurrently, render the
// summary, then optionally export the report.
//
// Every input the run needs comes in through `PipelineOptions`; nothing here
// reads process-wide state.
//
// Output on `out`: the descriptor count, the rendered summary, the report
// path when one was written, and a closing "Analysis complete" line.
//
// Error policy:
//   - Config errors return before any analysis task is started and before
//     anything is written to `out`.
//   - The summary is always written before the export is attempted, so a
//     report error never hides the already-computed outcomes.

use crate::app::scheduler::{Concurrency, Scheduler};
use crate::core::analyzer::Analyzer;
use crate::core::config;
use crate::core::export::{self, ReportFormat};
use crate::core::model::AnalysisOutcome;
use crate::core::presenter;
use crate::util::error::{AppError, Result};
use std::io::Write;
use std::path::PathBuf;

/// Everything one pipeline run needs to know.
#[derive(Debug, Clone, Default)]
pub struct PipelineOptions {
    /// Descriptor list (JSON).
    pub config_path: PathBuf,

    /// Report destination. No report is written when `None`.
    pub output: Option<PathBuf>,

    /// Insert a timestamp before the report file name.
    pub timestamped: bool,

    pub format: ReportFormat,

    pub concurrency: Concurrency,
}

/// What a successful run produced.
#[derive(Debug)]
pub struct RunSummary {
    /// Outcomes in descriptor order.
    pub outcomes: Vec<AnalysisOutcome>,

    /// Number of `Success` outcomes.
    pub succeeded: usize,

    /// Where the report was written, if one was requested.
    pub report_path: Option<PathBuf>,
}

/// Run the whole pipeline, writing progress and the rendered summary to `out`.
pub fn run<W: Write>(options: &PipelineOptions, analyzer: &Analyzer, out: &mut W) -> Result<RunSummary> {
    let descriptors = config::load_descriptors(&options.config_path)?;
    emit(out, &format!("{} log files to analyse\n", descriptors.len()))?;

    let outcomes = Scheduler::new(analyzer)
        .with_concurrency(options.concurrency)
        .run(&descriptors)?;

    emit(out, &presenter::render(&outcomes))?;

    let report_path = match &options.output {
        None => None,
        Some(base) if options.timestamped => {
            Some(export::export_timestamped(&outcomes, base, options.format)?)
        }
        Some(destination) => {
            export::export(&outcomes, destination, options.format)?;
            Some(destination.clone())
        }
    };

    if let Some(path) = &report_path {
        emit(out, &format!("Report exported to: {}\n", path.display()))?;
    }
    emit(out, "Analysis complete\n")?;

    Ok(RunSummary {
        succeeded: presenter::count_successes(&outcomes),
        outcomes,
        report_path,
    })
}

fn emit<W: Write>(out: &mut W, text: &str) -> Result<()> {
    out.write_all(text.as_bytes())
        .and_then(|()| out.flush())
        .map_err(|source| AppError::Output { source })
}
