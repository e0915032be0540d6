// LogAnalyzer - core/analyzer.rs
//
// Per-descriptor analysis: metadata check, then the pluggable analysis step.
//
// `Analyzer::analyze` never fails. Every problem is classified into a
// `FailureKind` and recorded on the returned outcome, so one bad file can
// never abort the batch.

use crate::core::model::{AnalysisOutcome, FailureKind, LogDescriptor};
use crate::platform::fs::{FileKind, FileProbe, StdFileProbe};
use crate::util::constants;
use rand::Rng;
use std::fmt;
use std::io;
use std::time::Duration;

// =============================================================================
// Analysis strategy
// =============================================================================

/// Rejection reported by an analysis strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseFailure {
    pub reason: String,
}

impl ParseFailure {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for ParseFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.reason)
    }
}

/// The analysis step run on a descriptor whose path is a regular file.
///
/// Strategies are shared by every analysis thread of a run.
pub trait AnalysisStrategy: Send + Sync {
    fn analyze(&self, descriptor: &LogDescriptor) -> Result<(), ParseFailure>;
}

/// Strategy that accepts every file immediately.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysSucceed;

impl AnalysisStrategy for AlwaysSucceed {
    fn analyze(&self, _descriptor: &LogDescriptor) -> Result<(), ParseFailure> {
        Ok(())
    }
}

/// Strategy built from a closure. See [`strategy_fn`].
pub struct FnStrategy<F>(F);

impl<F> AnalysisStrategy for FnStrategy<F>
where
    F: Fn(&LogDescriptor) -> Result<(), ParseFailure> + Send + Sync,
{
    fn analyze(&self, descriptor: &LogDescriptor) -> Result<(), ParseFailure> {
        (self.0)(descriptor)
    }
}

/// Wrap a closure as an [`AnalysisStrategy`].
pub fn strategy_fn<F>(f: F) -> FnStrategy<F>
where
    F: Fn(&LogDescriptor) -> Result<(), ParseFailure> + Send + Sync,
{
    FnStrategy(f)
}

/// Stand-in for real log parsing: sleeps for a uniformly random time in
/// `[min_delay_ms, max_delay_ms]` and then rejects the file with probability
/// `failure_rate`.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulatedStrategy {
    min_delay_ms: u64,
    max_delay_ms: u64,
    failure_rate: f64,
}

impl SimulatedStrategy {
    /// Bounds are reordered if given backwards; the rate is clamped to [0, 1].
    pub fn new(min_delay_ms: u64, max_delay_ms: u64, failure_rate: f64) -> Self {
        let (min_delay_ms, max_delay_ms) = if min_delay_ms <= max_delay_ms {
            (min_delay_ms, max_delay_ms)
        } else {
            (max_delay_ms, min_delay_ms)
        };
        let failure_rate = if failure_rate.is_nan() {
            0.0
        } else {
            failure_rate.clamp(0.0, 1.0)
        };
        Self {
            min_delay_ms,
            max_delay_ms,
            failure_rate,
        }
    }

    pub fn failure_rate(&self) -> f64 {
        self.failure_rate
    }

    pub fn delay_bounds_ms(&self) -> (u64, u64) {
        (self.min_delay_ms, self.max_delay_ms)
    }
}

impl Default for SimulatedStrategy {
    fn default() -> Self {
        Self::new(
            constants::DEFAULT_MIN_DELAY_MS,
            constants::DEFAULT_MAX_DELAY_MS,
            constants::DEFAULT_FAILURE_RATE,
        )
    }
}

impl AnalysisStrategy for SimulatedStrategy {
    fn analyze(&self, descriptor: &LogDescriptor) -> Result<(), ParseFailure> {
        let mut rng = rand::thread_rng();
        let delay_ms = rng.gen_range(self.min_delay_ms..=self.max_delay_ms);
        tracing::trace!(id = %descriptor.id, delay_ms, "Simulating analysis work");
        if delay_ms > 0 {
            std::thread::sleep(Duration::from_millis(delay_ms));
        }

        if rng.gen_bool(self.failure_rate) {
            return Err(ParseFailure::new(constants::SIMULATED_FAILURE_REASON));
        }
        Ok(())
    }
}

// =============================================================================
// Analyzer
// =============================================================================

/// Runs one descriptor through the metadata check and the analysis strategy.
pub struct Analyzer {
    probe: Box<dyn FileProbe>,
    strategy: Box<dyn AnalysisStrategy>,
}

impl Analyzer {
    pub fn new(
        probe: impl FileProbe + 'static,
        strategy: impl AnalysisStrategy + 'static,
    ) -> Self {
        Self {
            probe: Box::new(probe),
            strategy: Box::new(strategy),
        }
    }

    /// Analyzer on the real filesystem with the given strategy.
    pub fn with_strategy(strategy: impl AnalysisStrategy + 'static) -> Self {
        Self::new(StdFileProbe, strategy)
    }

    /// Analyse one descriptor. Never fails; see the module header.
    pub fn analyze(&self, descriptor: &LogDescriptor) -> AnalysisOutcome {
        let path = &descriptor.path;

        match self.probe.file_kind(path) {
            Ok(FileKind::Regular) => {}
            Ok(kind) => {
                tracing::debug!(id = %descriptor.id, path = %path.display(), ?kind, "Not a regular file");
                return AnalysisOutcome::failure(
                    descriptor,
                    FailureKind::NotRegularFile,
                    format!("{} is not a regular file", path.display()),
                );
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(id = %descriptor.id, path = %path.display(), "File not found");
                return AnalysisOutcome::failure(
                    descriptor,
                    FailureKind::FileNotFound,
                    format!("file not found: {}", path.display()),
                );
            }
            Err(e) => {
                tracing::debug!(id = %descriptor.id, path = %path.display(), error = %e, "Metadata query failed");
                return AnalysisOutcome::failure(descriptor, FailureKind::AccessError, e.to_string());
            }
        }

        match self.strategy.analyze(descriptor) {
            Ok(()) => AnalysisOutcome::success(descriptor),
            Err(failure) => {
                tracing::debug!(id = %descriptor.id, reason = %failure, "Analysis rejected file");
                AnalysisOutcome::failure(
                    descriptor,
                    FailureKind::ParseError,
                    format!("failed to parse {}: {failure}", path.display()),
                )
            }
        }
    }
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new(StdFileProbe, SimulatedStrategy::default())
    }
}

impl fmt::Debug for Analyzer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Analyzer").finish_non_exhaustive()
    }
}
