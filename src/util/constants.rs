// LogAnalyzer - util/constants.rs
//
// Single source of truth for all named constants, limits, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "LogAnalyzer";

/// Application identifier used for the config directory.
pub const APP_ID: &str = "LogAnalyzer";

/// Current application version.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Scheduling limits
// =============================================================================

/// Default concurrency cap. 0 means unbounded: one thread per descriptor.
pub const DEFAULT_MAX_CONCURRENCY: usize = 0;

/// Hard upper bound on a configured worker-pool size.
pub const ABSOLUTE_MAX_CONCURRENCY: usize = 1_024;

/// Name prefix for analysis threads (visible in logs with thread ids).
pub const ANALYSIS_THREAD_PREFIX: &str = "analyze";

// =============================================================================
// Simulated analysis
// =============================================================================

/// Lower bound of the simulated per-file analysis delay (ms).
pub const DEFAULT_MIN_DELAY_MS: u64 = 50;

/// Upper bound (inclusive) of the simulated per-file analysis delay (ms).
pub const DEFAULT_MAX_DELAY_MS: u64 = 200;

/// Largest configurable simulated delay (ms).
pub const ABSOLUTE_MAX_DELAY_MS: u64 = 10_000;

/// Probability that the simulated analysis reports a parse failure.
pub const DEFAULT_FAILURE_RATE: f64 = 0.1;

/// Reason attached to a simulated parse failure.
pub const SIMULATED_FAILURE_REASON: &str = "format not recognized";

// =============================================================================
// Outcome messages
// =============================================================================

/// Message recorded on a successful analysis.
pub const MSG_SUCCESS: &str = "analysis completed successfully";

/// Message recorded when the configured path does not exist.
pub const MSG_FILE_NOT_FOUND: &str = "file not found";

/// Message recorded when the metadata query fails for another reason.
pub const MSG_ACCESS_ERROR: &str = "access error";

/// Message recorded when the path exists but is not a regular file.
pub const MSG_NOT_REGULAR_FILE: &str = "not a regular file";

/// Message recorded when the analysis step rejects the file content.
pub const MSG_PARSE_ERROR: &str = "parsing error";

// =============================================================================
// Report
// =============================================================================

/// chrono format inserted before the report file name by timestamped export.
pub const REPORT_TIMESTAMP_FORMAT: &str = "%y%m%d_%H%M%S";

/// Suffix of the temp file a report is written to before it replaces the destination.
pub const REPORT_TEMP_SUFFIX: &str = ".tmp";

/// Width of the `=` rule under the presenter heading.
pub const SUMMARY_RULE_WIDTH: usize = 50;

// =============================================================================
// Logging
// =============================================================================

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Accepted values for `[logging] level`.
pub const VALID_LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

// =============================================================================
// Configuration
// =============================================================================

/// Settings file name.
pub const CONFIG_FILE_NAME: &str = "config.toml";
