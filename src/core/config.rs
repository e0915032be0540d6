// LogAnalyzer - core/config.rs
//
// Descriptor list loading and validation.
//
// The input is a JSON array of `{ "id", "path", "type" }` records.
// Validation is all-or-nothing: one bad entry rejects the whole batch and
// the error names the first offending index and field. A missing or null
// field decodes as empty and is reported by validation, not by the decoder.

use crate::core::model::LogDescriptor;
use crate::util::error::ConfigError;
use serde::Deserialize;
use std::io;
use std::path::{Path, PathBuf};

/// On-disk shape of one record. Every field is optional here so that absent
/// keys reach validation with their index.
#[derive(Debug, Deserialize)]
struct RawDescriptor {
    id: Option<String>,
    path: Option<PathBuf>,
    #[serde(rename = "type")]
    log_type: Option<String>,
}

impl From<RawDescriptor> for LogDescriptor {
    fn from(raw: RawDescriptor) -> Self {
        LogDescriptor {
            id: raw.id.unwrap_or_default(),
            path: raw.path.unwrap_or_default(),
            log_type: raw.log_type.unwrap_or_default(),
        }
    }
}

/// Load and validate the descriptor list stored at `path`.
pub fn load_descriptors(path: &Path) -> Result<Vec<LogDescriptor>, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => ConfigError::NotFound {
            path: path.to_path_buf(),
        },
        _ => ConfigError::Read {
            path: path.to_path_buf(),
            source: e,
        },
    })?;

    let descriptors = parse_descriptors(&content, path)?;

    tracing::info!(
        path = %path.display(),
        descriptors = descriptors.len(),
        "Loaded log descriptors"
    );

    Ok(descriptors)
}

/// Decode and validate descriptor list text. `path` is only used for error
/// context.
pub fn parse_descriptors(content: &str, path: &Path) -> Result<Vec<LogDescriptor>, ConfigError> {
    // A top-level `null` counts as an empty list.
    let raw: Option<Vec<RawDescriptor>> =
        serde_json::from_str(content).map_err(|e| ConfigError::Malformed {
            path: path.to_path_buf(),
            source: e,
        })?;
    let descriptors: Vec<LogDescriptor> = raw
        .unwrap_or_default()
        .into_iter()
        .map(LogDescriptor::from)
        .collect();

    if descriptors.is_empty() {
        return Err(ConfigError::Empty {
            path: path.to_path_buf(),
        });
    }

    validate_descriptors(&descriptors)?;
    Ok(descriptors)
}

/// Check that every descriptor has non-empty `id`, `path`, and `type`.
///
/// Fields are checked in that order, entry by entry, so the error always
/// names the lowest failing index.
pub fn validate_descriptors(descriptors: &[LogDescriptor]) -> Result<(), ConfigError> {
    for (index, d) in descriptors.iter().enumerate() {
        let field = if d.id.is_empty() {
            Some("id")
        } else if d.path.as_os_str().is_empty() {
            Some("path")
        } else if d.log_type.is_empty() {
            Some("type")
        } else {
            None
        };

        if let Some(field) = field {
            tracing::debug!(index, field, "Rejected descriptor list");
            return Err(ConfigError::InvalidEntry { index, field });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    fn src() -> PathBuf {
        PathBuf::from("config.json")
    }

    #[test]
    fn test_parse_valid_list_preserves_order() {
        let json = r#"[
            {"id": "b", "path": "/logs/b.log", "type": "app"},
            {"id": "a", "path": "/logs/a.log", "type": "nginx"}
        ]"#;
        let ds = parse_descriptors(json, &src()).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds[0].id, "b");
        assert_eq!(ds[1].log_type, "nginx");
    }

    #[test]
    fn test_empty_list_rejected() {
        let result = parse_descriptors("[]", &src());
        assert!(matches!(result, Err(ConfigError::Empty { .. })), "{result:?}");
    }

    #[test]
    fn test_not_a_list_is_malformed() {
        let result = parse_descriptors(r#"{"id": "a"}"#, &src());
        assert!(matches!(result, Err(ConfigError::Malformed { .. })), "{result:?}");
    }

    #[test]
    fn test_missing_field_is_invalid_entry() {
        let result = parse_descriptors(r#"[{"id": "a", "path": "/a.log"}]"#, &src());
        assert!(
            matches!(result, Err(ConfigError::InvalidEntry { index: 0, field: "type" })),
            "{result:?}"
        );
    }

    #[test]
    fn test_missing_field_at_later_index_is_named() {
        let json = r#"[
            {"id": "a", "path": "/a", "type": "app"},
            {"id": "b", "path": "/b"}
        ]"#;
        let result = parse_descriptors(json, &src());
        assert!(
            matches!(result, Err(ConfigError::InvalidEntry { index: 1, field: "type" })),
            "{result:?}"
        );
    }

    #[test]
    fn test_empty_value_before_missing_key_wins() {
        let json = r#"[
            {"id": "a", "path": "/a", "type": "app"},
            {"id": "",  "path": "/b", "type": "app"},
            {"id": "c", "path": "/c", "type": "app"},
            {"path": "/d", "type": "app"}
        ]"#;
        let result = parse_descriptors(json, &src());
        assert!(
            matches!(result, Err(ConfigError::InvalidEntry { index: 1, field: "id" })),
            "{result:?}"
        );
    }

    #[test]
    fn test_null_field_is_invalid_entry() {
        let result = parse_descriptors(r#"[{"id": null, "path": "/a", "type": "app"}]"#, &src());
        assert!(
            matches!(result, Err(ConfigError::InvalidEntry { index: 0, field: "id" })),
            "{result:?}"
        );
    }

    #[test]
    fn test_top_level_null_is_empty() {
        let result = parse_descriptors("null", &src());
        assert!(matches!(result, Err(ConfigError::Empty { .. })), "{result:?}");
    }

    #[test]
    fn test_non_string_field_is_malformed() {
        let result = parse_descriptors(r#"[{"id": 7, "path": "/a", "type": "app"}]"#, &src());
        assert!(matches!(result, Err(ConfigError::Malformed { .. })), "{result:?}");
    }

    #[test]
    fn test_empty_id_at_index_two_rejects_batch() {
        let json = r#"[
            {"id": "a", "path": "/a.log", "type": "app"},
            {"id": "b", "path": "/b.log", "type": "app"},
            {"id": "",  "path": "/c.log", "type": "app"},
            {"id": "d", "path": "",       "type": "app"}
        ]"#;
        let result = parse_descriptors(json, &src());
        match result {
            Err(ConfigError::InvalidEntry { index, field }) => {
                assert_eq!(index, 2);
                assert_eq!(field, "id");
            }
            other => panic!("expected InvalidEntry, got {other:?}"),
        }
    }

    #[test]
    fn test_field_check_order_within_entry() {
        let ds = vec![LogDescriptor::new("a", "", "")];
        assert!(matches!(
            validate_descriptors(&ds),
            Err(ConfigError::InvalidEntry { index: 0, field: "path" })
        ));
        let ds = vec![LogDescriptor::new("a", "/a.log", "")];
        assert!(matches!(
            validate_descriptors(&ds),
            Err(ConfigError::InvalidEntry { index: 0, field: "type" })
        ));
    }

    #[test]
    fn test_load_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_descriptors(&dir.path().join("absent.json"));
        assert!(matches!(result, Err(ConfigError::NotFound { .. })), "{result:?}");
    }

    #[test]
    fn test_load_directory_is_read_failure() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_descriptors(dir.path());
        assert!(matches!(result, Err(ConfigError::Read { .. })), "{result:?}");
    }

    #[test]
    fn test_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"[{"id":"x","path":"/x.log","type":"syslog"}]"#).unwrap();
        let ds = load_descriptors(&path).unwrap();
        assert_eq!(ds, vec![LogDescriptor::new("x", "/x.log", "syslog")]);
    }
}
