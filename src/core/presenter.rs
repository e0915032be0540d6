// LogAnalyzer - core/presenter.rs
//
// Plain-text rendering of an outcome collection for the terminal.
// Pure: no I/O, never fails.

use crate::core::model::{AnalysisOutcome, AnalysisStatus};
use crate::util::constants::SUMMARY_RULE_WIDTH;

/// Number of successful outcomes in the collection.
pub fn count_successes(outcomes: &[AnalysisOutcome]) -> usize {
    outcomes.iter().filter(|o| o.is_success()).count()
}

/// Render one block per outcome followed by a `successes/total` summary line.
pub fn render(outcomes: &[AnalysisOutcome]) -> String {
    let mut out = String::from("Analysis results:\n");
    out.push_str(&"=".repeat(SUMMARY_RULE_WIDTH));
    out.push('\n');

    for outcome in outcomes {
        out.push_str(&render_block(outcome));
        out.push('\n');
    }

    out.push_str(&format!(
        "Summary: {}/{} analyses succeeded\n",
        count_successes(outcomes),
        outcomes.len()
    ));
    out
}

fn render_block(outcome: &AnalysisOutcome) -> String {
    let indicator = match outcome.status() {
        AnalysisStatus::Success => "[OK]",
        AnalysisStatus::Failed => "[FAILED]",
    };
    let mut block = format!(
        "{indicator} ID: {}\n   Path: {}\n   Status: {}\n   Message: {}\n",
        outcome.log_id(),
        outcome.file_path().display(),
        outcome.status(),
        outcome.message()
    );
    if let Some(error) = outcome.error() {
        block.push_str(&format!("   Details: {}\n", error.details));
    }
    block
}
