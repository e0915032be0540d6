// LogAnalyzer - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// All errors preserve the causal chain for diagnostic logging.
//
// Per-file analysis failures are NOT errors: they are recorded as data in
// `core::model::AnalysisOutcome` and never propagate past the analyzer.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Top-level error type for all fatal LogAnalyzer conditions.
/// Errors are categorised by the pipeline stage that produced them.
#[derive(Debug)]
pub enum AppError {
    /// The descriptor list could not be loaded or validated.
    Config(ConfigError),

    /// The concurrent analysis run hit a coordination fault.
    Scheduler(SchedulerError),

    /// The report could not be produced.
    Report(ReportError),

    /// The rendered summary could not be written to the output stream.
    Output { source: io::Error },
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "Configuration error: {e}"),
            Self::Scheduler(e) => write!(f, "Scheduler error: {e}"),
            Self::Report(e) => write!(f, "Report error: {e}"),
            Self::Output { source } => write!(f, "Failed to write summary: {source}"),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Scheduler(e) => Some(e),
            Self::Report(e) => Some(e),
            Self::Output { source } => Some(source),
        }
    }
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

/// Errors raised while loading the descriptor list. All of them abort the
/// run before any analysis starts.
#[derive(Debug)]
pub enum ConfigError {
    /// The configuration source does not exist.
    NotFound { path: PathBuf },

    /// The configuration source exists but could not be read.
    Read { path: PathBuf, source: io::Error },

    /// The content is not a list of `{id, path, type}` records.
    Malformed {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// The list decoded correctly but holds no entries.
    Empty { path: PathBuf },

    /// The first entry with an empty required field.
    InvalidEntry { index: usize, field: &'static str },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { path } => {
                write!(f, "Configuration file '{}' not found", path.display())
            }
            Self::Read { path, source } => {
                write!(
                    f,
                    "Could not read configuration file '{}': {source}",
                    path.display()
                )
            }
            Self::Malformed { path, source } => {
                write!(
                    f,
                    "Configuration file '{}' is not a valid descriptor list: {source}",
                    path.display()
                )
            }
            Self::Empty { path } => {
                write!(
                    f,
                    "Configuration file '{}' contains no log descriptors",
                    path.display()
                )
            }
            Self::InvalidEntry { index, field } => {
                write!(f, "Descriptor {index}: field '{field}' must not be empty")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Read { source, .. } => Some(source),
            Self::Malformed { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Scheduler errors
// ---------------------------------------------------------------------------

/// Coordination faults of the fan-out/fan-in run. These are fatal for the
/// whole batch; domain failures never show up here.
#[derive(Debug)]
pub enum SchedulerError {
    /// The OS refused to spawn an analysis thread.
    Spawn { index: usize, source: io::Error },

    /// The bounded worker pool could not be created.
    WorkerPool {
        threads: usize,
        source: rayon::ThreadPoolBuildError,
    },

    /// An analysis task panicked instead of producing an outcome.
    TaskPanicked {
        index: usize,
        log_id: String,
        reason: String,
    },

    /// A result slot was still empty after every task finished.
    MissingResult { index: usize },
}

impl fmt::Display for SchedulerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Spawn { index, source } => {
                write!(f, "Failed to spawn analysis task {index}: {source}")
            }
            Self::WorkerPool { threads, source } => {
                write!(f, "Failed to build a pool of {threads} workers: {source}")
            }
            Self::TaskPanicked {
                index,
                log_id,
                reason,
            } => write!(
                f,
                "Analysis task {index} ('{log_id}') panicked: {reason}"
            ),
            Self::MissingResult { index } => {
                write!(f, "No result was collected for descriptor {index}")
            }
        }
    }
}

impl std::error::Error for SchedulerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Spawn { source, .. } => Some(source),
            Self::WorkerPool { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<SchedulerError> for AppError {
    fn from(e: SchedulerError) -> Self {
        Self::Scheduler(e)
    }
}

// ---------------------------------------------------------------------------
// Report errors
// ---------------------------------------------------------------------------

/// Errors related to writing or re-reading a report.
#[derive(Debug)]
pub enum ReportError {
    /// The outcome collection could not be encoded.
    Serialization {
        path: PathBuf,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The encoded report could not be written to its destination.
    Write { path: PathBuf, source: io::Error },

    /// An existing report could not be read back.
    Read { path: PathBuf, source: io::Error },

    /// An existing report is not a valid report document.
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl fmt::Display for ReportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Serialization { path, source } => {
                write!(f, "Failed to encode report '{}': {source}", path.display())
            }
            Self::Write { path, source } => {
                write!(f, "Failed to write report '{}': {source}", path.display())
            }
            Self::Read { path, source } => {
                write!(f, "Failed to read report '{}': {source}", path.display())
            }
            Self::Parse { path, source } => {
                write!(f, "Report '{}' is malformed: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ReportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Serialization { source, .. } => Some(source.as_ref()),
            Self::Write { source, .. } => Some(source),
            Self::Read { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
        }
    }
}

impl From<ReportError> for AppError {
    fn from(e: ReportError) -> Self {
        Self::Report(e)
    }
}

/// Convenience type alias for LogAnalyzer results.
pub type Result<T> = std::result::Result<T, AppError>;
