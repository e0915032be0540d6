// LogAnalyzer - core/export.rs
//
// JSON and CSV reports of an outcome collection.
//
// A report is encoded completely in memory first, then written to a uniquely
// named sibling temp file and persisted over the destination. An encoding or
// write failure therefore never leaves a partial report behind.

use crate::core::model::{AnalysisOutcome, ReportRecord};
use crate::util::constants::{REPORT_TEMP_SUFFIX, REPORT_TIMESTAMP_FORMAT};
use crate::util::error::ReportError;
use chrono::NaiveDateTime;
use std::ffi::OsString;
use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;

// =============================================================================
// Report format
// =============================================================================

/// On-disk report encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    /// Array of records, two-space indentation.
    #[default]
    Json,
    /// Header row plus one row per outcome.
    Csv,
}

impl ReportFormat {
    pub fn label(&self) -> &'static str {
        match self {
            ReportFormat::Json => "json",
            ReportFormat::Csv => "csv",
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(ReportFormat::Json),
            "csv" => Ok(ReportFormat::Csv),
            other => Err(format!(
                "unknown report format '{other}'; expected \"json\" or \"csv\""
            )),
        }
    }
}

// =============================================================================
// Encoding
// =============================================================================

/// Write the collection as a pretty-printed JSON array.
pub fn export_json<W: Write>(
    outcomes: &[AnalysisOutcome],
    mut writer: W,
    export_path: &Path,
) -> Result<usize, ReportError> {
    serde_json::to_writer_pretty(&mut writer, outcomes).map_err(|e| {
        ReportError::Serialization {
            path: export_path.to_path_buf(),
            source: Box::new(e),
        }
    })?;
    writer.write_all(b"\n").map_err(|e| ReportError::Write {
        path: export_path.to_path_buf(),
        source: e,
    })?;
    Ok(outcomes.len())
}

/// Write the collection as CSV with a `log_id,file_path,status,message,error_details` header.
pub fn export_csv<W: Write>(
    outcomes: &[AnalysisOutcome],
    writer: W,
    export_path: &Path,
) -> Result<usize, ReportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    for outcome in outcomes {
        csv_writer
            .serialize(ReportRecord::from(outcome.clone()))
            .map_err(|e| ReportError::Serialization {
                path: export_path.to_path_buf(),
                source: Box::new(e),
            })?;
    }

    csv_writer.flush().map_err(|e| ReportError::Write {
        path: export_path.to_path_buf(),
        source: e,
    })?;

    Ok(outcomes.len())
}

/// Encode the collection into memory.
pub fn encode(
    outcomes: &[AnalysisOutcome],
    format: ReportFormat,
    export_path: &Path,
) -> Result<Vec<u8>, ReportError> {
    let mut buf = Vec::new();
    match format {
        ReportFormat::Json => export_json(outcomes, &mut buf, export_path)?,
        ReportFormat::Csv => export_csv(outcomes, &mut buf, export_path)?,
    };
    Ok(buf)
}

// =============================================================================
// File export
// =============================================================================

/// Encode `outcomes` and write them to `destination`.
pub fn export(
    outcomes: &[AnalysisOutcome],
    destination: &Path,
    format: ReportFormat,
) -> Result<(), ReportError> {
    let bytes = encode(outcomes, format, destination)?;
    write_replacing(destination, &bytes)?;

    tracing::info!(
        path = %destination.display(),
        format = %format,
        outcomes = outcomes.len(),
        bytes = bytes.len(),
        "Report exported"
    );
    Ok(())
}

/// Export to a name derived from `base` with the current local time inserted
/// before the file name. Returns the path written.
pub fn export_timestamped(
    outcomes: &[AnalysisOutcome],
    base: &Path,
    format: ReportFormat,
) -> Result<PathBuf, ReportError> {
    let destination = timestamped_path(base, chrono::Local::now().naive_local());
    export(outcomes, &destination, format)?;
    Ok(destination)
}

/// `dir/report.json` at 2024-03-05 14:07:09 becomes `dir/240305_140709_report.json`.
pub fn timestamped_path(base: &Path, stamp: NaiveDateTime) -> PathBuf {
    let mut name = OsString::from(stamp.format(REPORT_TIMESTAMP_FORMAT).to_string());
    if let Some(file_name) = base.file_name() {
        name.push("_");
        name.push(file_name);
    }
    match base.parent() {
        Some(dir) => dir.join(name),
        None => PathBuf::from(name),
    }
}

fn write_replacing(destination: &Path, bytes: &[u8]) -> Result<(), ReportError> {
    let write_err = |source: std::io::Error| ReportError::Write {
        path: destination.to_path_buf(),
        source,
    };

    let dir = match destination.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut prefix = OsString::from(".");
    if let Some(file_name) = destination.file_name() {
        prefix.push(file_name);
    }

    // The temp file is removed on drop if anything below fails.
    let mut temp = tempfile::Builder::new()
        .prefix(&prefix)
        .suffix(REPORT_TEMP_SUFFIX)
        .tempfile_in(dir)
        .map_err(write_err)?;
    temp.write_all(bytes).map_err(write_err)?;
    temp.persist(destination).map_err(|e| write_err(e.error))?;
    Ok(())
}

// =============================================================================
// Re-reading
// =============================================================================

/// Read a JSON report back into an outcome collection.
pub fn read_report(path: &Path) -> Result<Vec<AnalysisOutcome>, ReportError> {
    let content = std::fs::read_to_string(path).map_err(|e| ReportError::Read {
        path: path.to_path_buf(),
        source: e,
    })?;
    serde_json::from_str(&content).map_err(|e| ReportError::Parse {
        path: path.to_path_buf(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::{FailureKind, LogDescriptor};
    use chrono::NaiveDate;
    use std::fs;

    fn outcomes() -> Vec<AnalysisOutcome> {
        vec![
            AnalysisOutcome::success(&LogDescriptor::new("web", "/var/log/web.log", "nginx")),
            AnalysisOutcome::failure(
                &LogDescriptor::new("db", "/var/log/db.log", "postgres"),
                FailureKind::ParseError,
                "failed to parse /var/log/db.log: format not recognized",
            ),
        ]
    }

    #[test]
    fn test_json_layout() {
        let mut buf = Vec::new();
        let count = export_json(&outcomes()[..1], &mut buf, Path::new("out.json")).unwrap();
        assert_eq!(count, 1);

        let expected = "[\n  {\n    \"log_id\": \"web\",\n    \"file_path\": \"/var/log/web.log\",\n    \"status\": \"OK\",\n    \"message\": \"analysis completed successfully\",\n    \"error_details\": \"\"\n  }\n]\n";
        assert_eq!(String::from_utf8(buf).unwrap(), expected);
    }

    #[test]
    fn test_csv_export() {
        let mut buf = Vec::new();
        let count = export_csv(&outcomes(), &mut buf, Path::new("out.csv")).unwrap();
        assert_eq!(count, 2);

        let output = String::from_utf8(buf).unwrap();
        let mut lines = output.lines();
        assert_eq!(lines.next(), Some("log_id,file_path,status,message,error_details"));
        assert_eq!(
            lines.next(),
            Some("web,/var/log/web.log,OK,analysis completed successfully,")
        );
        assert!(lines.next().unwrap().starts_with("db,/var/log/db.log,FAILED,parsing error,"));
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!("JSON".parse::<ReportFormat>().unwrap(), ReportFormat::Json);
        assert_eq!("csv".parse::<ReportFormat>().unwrap(), ReportFormat::Csv);
        assert!("xml".parse::<ReportFormat>().is_err());
    }

    #[test]
    fn test_export_then_read_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        let original = outcomes();

        export(&original, &path, ReportFormat::Json).unwrap();
        let reread = read_report(&path).unwrap();
        assert_eq!(reread, original);
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_export_leaves_unrelated_tmp_file_alone() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        let neighbour = dir.path().join("report.json.tmp");
        fs::write(&neighbour, "keep me").unwrap();

        export(&outcomes(), &path, ReportFormat::Json).unwrap();

        assert_eq!(fs::read_to_string(&neighbour).unwrap(), "keep me");
        assert_eq!(read_report(&path).unwrap(), outcomes());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 2);
    }

    #[test]
    fn test_export_replaces_existing_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        fs::write(&path, "stale").unwrap();

        export(&outcomes()[..1], &path, ReportFormat::Json).unwrap();
        assert_eq!(read_report(&path).unwrap(), outcomes()[..1].to_vec());
    }

    #[test]
    fn test_export_into_missing_directory_fails_without_output() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no-such-dir").join("report.json");

        let result = export(&outcomes(), &path, ReportFormat::Json);
        assert!(matches!(result, Err(ReportError::Write { .. })), "{result:?}");
        assert!(!path.exists());
    }

    #[test]
    fn test_timestamped_path_keeps_dir_and_extension() {
        let stamp = NaiveDate::from_ymd_opt(2024, 3, 5)
            .unwrap()
            .and_hms_opt(14, 7, 9)
            .unwrap();
        assert_eq!(
            timestamped_path(Path::new("reports/out.json"), stamp),
            PathBuf::from("reports/240305_140709_out.json")
        );
        assert_eq!(
            timestamped_path(Path::new("out.json"), stamp),
            PathBuf::from("240305_140709_out.json")
        );
    }

    #[test]
    fn test_export_timestamped_writes_derived_file() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("report.json");

        let written = export_timestamped(&outcomes(), &base, ReportFormat::Json).unwrap();
        assert_eq!(written.parent(), Some(dir.path()));
        let name = written.file_name().unwrap().to_str().unwrap();
        assert!(name.ends_with("_report.json"), "{name}");
        assert_eq!(name.len(), "yymmdd_hhmmss_report.json".len());
        assert!(!base.exists());
        assert_eq!(fs::read_to_string(&written).unwrap().lines().next(), Some("["));
    }

    #[test]
    fn test_read_malformed_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(read_report(&path), Err(ReportError::Parse { .. })));
        assert!(matches!(
            read_report(&dir.path().join("absent.json")),
            Err(ReportError::Read { .. })
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_path_fails_json_encoding() {
        use std::os::unix::ffi::OsStrExt;
        let raw = std::ffi::OsStr::from_bytes(b"/logs/\xff.log");
        let bad = vec![AnalysisOutcome::success(&LogDescriptor::new("x", raw, "app"))];

        let result = encode(&bad, ReportFormat::Json, Path::new("out.json"));
        assert!(matches!(result, Err(ReportError::Serialization { .. })), "{result:?}");
    }
}
