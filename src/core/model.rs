// LogAnalyzer - core/model.rs
//
// Core data model types. Pure data definitions with no I/O.
//
// These types are the shared vocabulary across all layers.

use crate::util::constants;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

// =============================================================================
// Log Descriptor (one configured input)
// =============================================================================

/// One configured log file entry.
///
/// The declared `log_type` is carried through untouched; nothing in the
/// pipeline interprets it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogDescriptor {
    /// Identity of the entry. Expected, but not required, to be unique.
    pub id: String,

    /// Path of the log file to analyse.
    pub path: PathBuf,

    /// Declared log type (e.g. "nginx-access", "app").
    #[serde(rename = "type")]
    pub log_type: String,
}

impl LogDescriptor {
    pub fn new(id: impl Into<String>, path: impl Into<PathBuf>, log_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            path: path.into(),
            log_type: log_type.into(),
        }
    }
}

// =============================================================================
// Status
// =============================================================================

/// Final status of one analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnalysisStatus {
    #[serde(rename = "OK")]
    Success,
    #[serde(rename = "FAILED")]
    Failed,
}

impl AnalysisStatus {
    /// Label used in reports and in the rendered summary.
    pub fn label(&self) -> &'static str {
        match self {
            AnalysisStatus::Success => "OK",
            AnalysisStatus::Failed => "FAILED",
        }
    }
}

impl fmt::Display for AnalysisStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// Failure classification
// =============================================================================

/// Why a single analysis failed. Each kind has one fixed message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// The configured path does not exist.
    FileNotFound,
    /// The metadata query failed for another reason (permissions, I/O).
    AccessError,
    /// The path exists but is a directory, device, or similar.
    NotRegularFile,
    /// The analysis step rejected the file content.
    ParseError,
}

impl FailureKind {
    /// All kinds, in classification order.
    pub fn all() -> &'static [FailureKind] {
        &[
            FailureKind::FileNotFound,
            FailureKind::AccessError,
            FailureKind::NotRegularFile,
            FailureKind::ParseError,
        ]
    }

    /// Human-readable message recorded on the outcome.
    pub fn message(&self) -> &'static str {
        match self {
            FailureKind::FileNotFound => constants::MSG_FILE_NOT_FOUND,
            FailureKind::AccessError => constants::MSG_ACCESS_ERROR,
            FailureKind::NotRegularFile => constants::MSG_NOT_REGULAR_FILE,
            FailureKind::ParseError => constants::MSG_PARSE_ERROR,
        }
    }

    /// Recover the kind from a recorded message (used when re-reading reports).
    pub fn from_message(message: &str) -> Option<Self> {
        Self::all().iter().copied().find(|k| k.message() == message)
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Structured detail attached to a failed outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutcomeError {
    pub kind: FailureKind,
    pub details: String,
}

// =============================================================================
// Analysis Outcome
// =============================================================================

/// The result of analysing one descriptor.
///
/// Invariant: `error` is present iff `status` is `Failed`. The only way to
/// build an outcome is through [`AnalysisOutcome::success`] and
/// [`AnalysisOutcome::failure`], which uphold it.
///
/// Serialises through [`ReportRecord`], the on-disk report shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "ReportRecord", try_from = "ReportRecord")]
pub struct AnalysisOutcome {
    log_id: String,
    file_path: PathBuf,
    status: AnalysisStatus,
    message: String,
    error: Option<OutcomeError>,
}

impl AnalysisOutcome {
    /// Outcome for a file that was analysed without problems.
    pub fn success(descriptor: &LogDescriptor) -> Self {
        Self {
            log_id: descriptor.id.clone(),
            file_path: descriptor.path.clone(),
            status: AnalysisStatus::Success,
            message: constants::MSG_SUCCESS.to_string(),
            error: None,
        }
    }

    /// Outcome for a file whose analysis failed with the given classification.
    pub fn failure(descriptor: &LogDescriptor, kind: FailureKind, details: impl Into<String>) -> Self {
        Self {
            log_id: descriptor.id.clone(),
            file_path: descriptor.path.clone(),
            status: AnalysisStatus::Failed,
            message: kind.message().to_string(),
            error: Some(OutcomeError {
                kind,
                details: details.into(),
            }),
        }
    }

    pub fn log_id(&self) -> &str {
        &self.log_id
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    pub fn status(&self) -> AnalysisStatus {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn error(&self) -> Option<&OutcomeError> {
        self.error.as_ref()
    }

    /// Failure classification, `None` on success.
    pub fn failure_kind(&self) -> Option<FailureKind> {
        self.error.as_ref().map(|e| e.kind)
    }

    pub fn is_success(&self) -> bool {
        self.status == AnalysisStatus::Success
    }
}

// =============================================================================
// Report Record (serialised shape)
// =============================================================================

/// One row of a report. Field order is the on-disk order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRecord {
    pub log_id: String,
    pub file_path: PathBuf,
    pub status: AnalysisStatus,
    pub message: String,
    /// Empty when `status` is OK.
    #[serde(default)]
    pub error_details: String,
}

impl From<AnalysisOutcome> for ReportRecord {
    fn from(outcome: AnalysisOutcome) -> Self {
        Self {
            log_id: outcome.log_id,
            file_path: outcome.file_path,
            status: outcome.status,
            message: outcome.message,
            error_details: outcome.error.map(|e| e.details).unwrap_or_default(),
        }
    }
}

/// Why a [`ReportRecord`] could not be turned back into an outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    /// A FAILED record carries a message that names no known failure kind.
    UnknownFailure { log_id: String, message: String },
    /// An OK record carries error details.
    UnexpectedDetails { log_id: String },
}

impl fmt::Display for RecordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownFailure { log_id, message } => {
                write!(f, "record '{log_id}': unknown failure message '{message}'")
            }
            Self::UnexpectedDetails { log_id } => {
                write!(f, "record '{log_id}': OK status with error details")
            }
        }
    }
}

impl std::error::Error for RecordError {}

impl TryFrom<ReportRecord> for AnalysisOutcome {
    type Error = RecordError;

    fn try_from(record: ReportRecord) -> Result<Self, Self::Error> {
        let error = match record.status {
            AnalysisStatus::Success => {
                if !record.error_details.is_empty() {
                    return Err(RecordError::UnexpectedDetails {
                        log_id: record.log_id,
                    });
                }
                None
            }
            AnalysisStatus::Failed => {
                let kind = FailureKind::from_message(&record.message).ok_or_else(|| {
                    RecordError::UnknownFailure {
                        log_id: record.log_id.clone(),
                        message: record.message.clone(),
                    }
                })?;
                Some(OutcomeError {
                    kind,
                    details: record.error_details,
                })
            }
        };

        Ok(Self {
            log_id: record.log_id,
            file_path: record.file_path,
            status: record.status,
            message: record.message,
            error,
        })
    }
}
