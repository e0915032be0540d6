// LogAnalyzer - app/scheduler.rs
//
// Fan-out/fan-in execution of a descriptor batch.
//
// Architecture:
//   - One task per descriptor. By default each task gets its own named OS
//     thread inside `std::thread::scope`; with a concurrency cap the tasks
//     run on a rayon pool of that many workers instead.
//   - Each task sends `(index, result)` over an mpsc channel.
//   - The end of the scope is the completion barrier. Only then are the
//     tagged results placed into a pre-sized slot vector, so completion
//     order never influences output order.
//   - A panicking task is a coordination fault and fails the whole run.
//     Domain failures are ordinary `Failed` outcomes.

use crate::core::analyzer::Analyzer;
use crate::core::model::{AnalysisOutcome, LogDescriptor};
use crate::util::constants::ANALYSIS_THREAD_PREFIX;
use crate::util::error::SchedulerError;
use std::any::Any;
use std::num::NonZeroUsize;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc;
use std::time::Instant;

/// How many analysis tasks may run at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Concurrency {
    /// Every descriptor starts immediately on its own thread.
    #[default]
    Unbounded,
    /// At most this many tasks run at the same time.
    Limited(NonZeroUsize),
}

impl Concurrency {
    /// `0` means unbounded.
    pub fn from_limit(limit: usize) -> Self {
        NonZeroUsize::new(limit).map_or(Concurrency::Unbounded, Concurrency::Limited)
    }
}

/// Result of one task, tagged with the descriptor's input position.
struct TaggedResult {
    index: usize,
    result: Result<AnalysisOutcome, String>,
}

/// Runs an [`Analyzer`] over a whole batch.
#[derive(Debug)]
pub struct Scheduler<'a> {
    analyzer: &'a Analyzer,
    concurrency: Concurrency,
}

impl<'a> Scheduler<'a> {
    pub fn new(analyzer: &'a Analyzer) -> Self {
        Self {
            analyzer,
            concurrency: Concurrency::default(),
        }
    }

    pub fn with_concurrency(mut self, concurrency: Concurrency) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Analyse every descriptor and return the outcomes in input order.
    ///
    /// Blocks until all tasks have finished. The returned collection always
    /// has exactly one outcome per descriptor.
    pub fn run(&self, descriptors: &[LogDescriptor]) -> Result<Vec<AnalysisOutcome>, SchedulerError> {
        if descriptors.is_empty() {
            return Ok(Vec::new());
        }

        let started = Instant::now();
        tracing::info!(
            tasks = descriptors.len(),
            concurrency = ?self.concurrency,
            "Starting analysis batch"
        );

        let (tx, rx) = mpsc::channel();
        match self.concurrency {
            Concurrency::Unbounded => self.dispatch_threads(descriptors, tx)?,
            Concurrency::Limited(workers) => self.dispatch_pool(descriptors, workers, tx)?,
        }

        // Both dispatchers return only after every task has finished and
        // dropped its sender, so the receiver drains without blocking.
        let outcomes = collect(rx, descriptors)?;

        tracing::info!(
            tasks = outcomes.len(),
            succeeded = outcomes.iter().filter(|o| o.is_success()).count(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Analysis batch complete"
        );
        Ok(outcomes)
    }

    fn dispatch_threads(
        &self,
        descriptors: &[LogDescriptor],
        tx: mpsc::Sender<TaggedResult>,
    ) -> Result<(), SchedulerError> {
        let analyzer = self.analyzer;
        std::thread::scope(|scope| {
            for (index, descriptor) in descriptors.iter().enumerate() {
                let tx = tx.clone();
                std::thread::Builder::new()
                    .name(format!("{ANALYSIS_THREAD_PREFIX}-{index}"))
                    .spawn_scoped(scope, move || run_task(analyzer, index, descriptor, &tx))
                    .map_err(|source| SchedulerError::Spawn { index, source })?;
            }
            Ok(())
        })
    }

    fn dispatch_pool(
        &self,
        descriptors: &[LogDescriptor],
        workers: NonZeroUsize,
        tx: mpsc::Sender<TaggedResult>,
    ) -> Result<(), SchedulerError> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers.get())
            .thread_name(|i| format!("{ANALYSIS_THREAD_PREFIX}-worker-{i}"))
            .build()
            .map_err(|source| SchedulerError::WorkerPool {
                threads: workers.get(),
                source,
            })?;

        let analyzer = self.analyzer;
        pool.scope(|scope| {
            for (index, descriptor) in descriptors.iter().enumerate() {
                let tx = tx.clone();
                scope.spawn(move |_| run_task(analyzer, index, descriptor, &tx));
            }
        });
        Ok(())
    }
}

/// Body of one analysis task.
fn run_task(
    analyzer: &Analyzer,
    index: usize,
    descriptor: &LogDescriptor,
    tx: &mpsc::Sender<TaggedResult>,
) {
    tracing::trace!(index, id = %descriptor.id, "Analysis task started");

    let result = panic::catch_unwind(AssertUnwindSafe(|| analyzer.analyze(descriptor)))
        .map_err(panic_reason);

    // The receiver lives until after the barrier; a failed send is unreachable.
    let _ = tx.send(TaggedResult { index, result });
}

fn panic_reason(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// Fan-in: place every tagged result at its input position.
///
/// Faults are reported for the lowest failing index so that a rerun of the
/// same batch reports the same error.
fn collect(
    rx: mpsc::Receiver<TaggedResult>,
    descriptors: &[LogDescriptor],
) -> Result<Vec<AnalysisOutcome>, SchedulerError> {
    let mut slots: Vec<Option<Result<AnalysisOutcome, String>>> =
        (0..descriptors.len()).map(|_| None).collect();

    for TaggedResult { index, result } in rx {
        if let Ok(outcome) = &result {
            tracing::debug!(
                index,
                id = outcome.log_id(),
                status = %outcome.status(),
                "Analysis task finished"
            );
        }
        slots[index] = Some(result);
    }

    slots
        .into_iter()
        .enumerate()
        .map(|(index, slot)| match slot {
            Some(Ok(outcome)) => Ok(outcome),
            Some(Err(reason)) => Err(SchedulerError::TaskPanicked {
                index,
                log_id: descriptors[index].id.clone(),
                reason,
            }),
            None => Err(SchedulerError::MissingResult { index }),
        })
        .collect()
}
