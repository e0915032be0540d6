// LogAnalyzer - platform/config.rs
//
// Platform config directory resolution and config.toml loading with
// startup validation.
//
// Uses the `directories` crate for XDG (Linux), AppData (Windows),
// Library (macOS) compliance.

use crate::util::constants;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Resolved platform paths for LogAnalyzer configuration.
#[derive(Debug, Clone)]
pub struct PlatformPaths {
    /// Configuration directory (e.g. ~/.config/loganalyzer/ or %APPDATA%\LogAnalyzer\config\)
    pub config_dir: PathBuf,
}

impl PlatformPaths {
    /// Resolve platform-appropriate paths.
    ///
    /// Falls back to the current directory if platform dirs cannot be determined.
    pub fn resolve() -> Self {
        if let Some(proj_dirs) = ProjectDirs::from("", "", constants::APP_ID) {
            let config_dir = proj_dirs.config_dir().to_path_buf();
            tracing::debug!(config = %config_dir.display(), "Platform paths resolved");
            Self { config_dir }
        } else {
            tracing::warn!("Could not determine platform directories, using current directory");
            Self {
                config_dir: PathBuf::from("."),
            }
        }
    }

    /// Default location of the settings file.
    pub fn settings_file(&self) -> PathBuf {
        self.config_dir.join(constants::CONFIG_FILE_NAME)
    }
}

// =============================================================================
// config.toml loading and validation
// =============================================================================

/// Raw deserialisable shape of config.toml.
///
/// Unknown keys are silently ignored for forward compatibility.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// `[analysis]` section.
    pub analysis: AnalysisSection,
    /// `[report]` section.
    pub report: ReportSection,
    /// `[logging]` section.
    pub logging: LoggingSection,
}

/// `[analysis]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct AnalysisSection {
    /// Concurrency cap (0 = one thread per file).
    pub max_concurrency: Option<usize>,
    /// Simulated delay lower bound in ms.
    pub min_delay_ms: Option<u64>,
    /// Simulated delay upper bound in ms.
    pub max_delay_ms: Option<u64>,
    /// Simulated parse-failure probability.
    pub failure_rate: Option<f64>,
}

/// `[report]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct ReportSection {
    /// "json" or "csv".
    pub format: Option<String>,
    /// Insert a timestamp before the report file name.
    pub timestamped: Option<bool>,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
}

/// Validated settings derived from `config.toml`.
///
/// Invalid values produce actionable warnings and fall back to defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    // -- Analysis --
    /// Concurrency cap; 0 means unbounded.
    pub max_concurrency: usize,
    pub min_delay_ms: u64,
    pub max_delay_ms: u64,
    pub failure_rate: f64,

    // -- Report --
    pub report_format: crate::core::export::ReportFormat,
    pub timestamped: bool,

    // -- Logging --
    /// Logging level string (for init before tracing is available).
    pub log_level: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            max_concurrency: constants::DEFAULT_MAX_CONCURRENCY,
            min_delay_ms: constants::DEFAULT_MIN_DELAY_MS,
            max_delay_ms: constants::DEFAULT_MAX_DELAY_MS,
            failure_rate: constants::DEFAULT_FAILURE_RATE,
            report_format: Default::default(),
            timestamped: false,
            log_level: None,
        }
    }
}

/// Load and validate the settings file at `config_path`.
///
/// Returns `AppConfig` with validated values and a list of non-fatal warnings.
/// A missing file yields defaults with no warnings. An unreadable or
/// unparseable file yields defaults plus a warning; the run still proceeds.
///
/// This runs before logging is initialised (the file may set the level), so
/// problems are returned as warnings for the caller to log.
pub fn load_config(config_path: &Path) -> (AppConfig, Vec<String>) {
    let mut warnings: Vec<String> = Vec::new();

    if !config_path.exists() {
        return (AppConfig::default(), warnings);
    }

    let content = match std::fs::read_to_string(config_path) {
        Ok(c) => c,
        Err(e) => {
            warnings.push(format!(
                "Could not read settings file '{}': {e}. Using defaults.",
                config_path.display()
            ));
            return (AppConfig::default(), warnings);
        }
    };

    match toml::from_str::<RawConfig>(&content) {
        Ok(raw) => validate(raw),
        Err(e) => {
            warnings.push(format!(
                "Failed to parse settings file '{}': {e}. Using defaults.",
                config_path.display()
            ));
            (AppConfig::default(), warnings)
        }
    }
}

/// Validate each field against named constants, accumulating all problems.
pub fn validate(raw: RawConfig) -> (AppConfig, Vec<String>) {
    let mut warnings: Vec<String> = Vec::new();
    let mut config = AppConfig::default();

    // -- Analysis: max_concurrency --
    if let Some(limit) = raw.analysis.max_concurrency {
        if limit <= constants::ABSOLUTE_MAX_CONCURRENCY {
            config.max_concurrency = limit;
        } else {
            warnings.push(format!(
                "[analysis] max_concurrency = {limit} is out of range (0-{}). Using default ({}).",
                constants::ABSOLUTE_MAX_CONCURRENCY,
                constants::DEFAULT_MAX_CONCURRENCY,
            ));
        }
    }

    // -- Analysis: delay bounds --
    for (key, value, slot) in [
        ("min_delay_ms", raw.analysis.min_delay_ms, &mut config.min_delay_ms),
        ("max_delay_ms", raw.analysis.max_delay_ms, &mut config.max_delay_ms),
    ] {
        if let Some(ms) = value {
            if ms <= constants::ABSOLUTE_MAX_DELAY_MS {
                *slot = ms;
            } else {
                warnings.push(format!(
                    "[analysis] {key} = {ms} is out of range (0-{}). Using default ({}).",
                    constants::ABSOLUTE_MAX_DELAY_MS,
                    *slot,
                ));
            }
        }
    }
    if config.min_delay_ms > config.max_delay_ms {
        warnings.push(format!(
            "[analysis] min_delay_ms ({}) exceeds max_delay_ms ({}). Using defaults ({}-{}).",
            config.min_delay_ms,
            config.max_delay_ms,
            constants::DEFAULT_MIN_DELAY_MS,
            constants::DEFAULT_MAX_DELAY_MS,
        ));
        config.min_delay_ms = constants::DEFAULT_MIN_DELAY_MS;
        config.max_delay_ms = constants::DEFAULT_MAX_DELAY_MS;
    }

    // -- Analysis: failure_rate --
    if let Some(rate) = raw.analysis.failure_rate {
        if (0.0..=1.0).contains(&rate) {
            config.failure_rate = rate;
        } else {
            warnings.push(format!(
                "[analysis] failure_rate = {rate} is out of range (0.0-1.0). Using default ({}).",
                constants::DEFAULT_FAILURE_RATE,
            ));
        }
    }

    // -- Report: format --
    if let Some(ref format) = raw.report.format {
        match format.parse() {
            Ok(f) => config.report_format = f,
            Err(e) => warnings.push(format!("[report] format: {e}. Using default (json).")),
        }
    }

    // -- Report: timestamped --
    if let Some(timestamped) = raw.report.timestamped {
        config.timestamped = timestamped;
    }

    // -- Logging: level --
    if let Some(ref level) = raw.logging.level {
        if constants::VALID_LOG_LEVELS.contains(&level.to_lowercase().as_str()) {
            config.log_level = Some(level.to_lowercase());
        } else {
            warnings.push(format!(
                "[logging] level = \"{level}\" is not recognised. \
                 Valid values: error, warn, info, debug, trace. Using default (info).",
            ));
        }
    }

    (config, warnings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::export::ReportFormat;
    use std::fs;

    fn parse(content: &str) -> (AppConfig, Vec<String>) {
        validate(toml::from_str(content).unwrap())
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let (config, warnings) = load_config(&dir.path().join("config.toml"));
        assert_eq!(config, AppConfig::default());
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_valid_file_applied() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
[analysis]
max_concurrency = 8
min_delay_ms = 0
max_delay_ms = 20
failure_rate = 0.0

[report]
format = "csv"
timestamped = true

[logging]
level = "DEBUG"

[future]
key = "ignored"
"#,
        )
        .unwrap();

        let (config, warnings) = load_config(&path);
        assert!(warnings.is_empty(), "{warnings:?}");
        assert_eq!(config.max_concurrency, 8);
        assert_eq!((config.min_delay_ms, config.max_delay_ms), (0, 20));
        assert_eq!(config.failure_rate, 0.0);
        assert_eq!(config.report_format, ReportFormat::Csv);
        assert!(config.timestamped);
        assert_eq!(config.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_unparseable_file_warns_and_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[analysis\nmax_concurrency = ").unwrap();

        let (config, warnings) = load_config(&path);
        assert_eq!(config, AppConfig::default());
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].starts_with("Failed to parse settings file"));
    }

    #[test]
    fn test_out_of_range_values_fall_back() {
        let (config, warnings) = parse(
            r#"
[analysis]
max_concurrency = 100000
max_delay_ms = 999999
failure_rate = 1.5

[report]
format = "xml"

[logging]
level = "loud"
"#,
        );
        assert_eq!(config, AppConfig::default());
        assert_eq!(warnings.len(), 5, "{warnings:?}");
    }

    #[test]
    fn test_inverted_delay_bounds_reset() {
        let (config, warnings) = parse("[analysis]\nmin_delay_ms = 500\nmax_delay_ms = 100\n");
        assert_eq!(config.min_delay_ms, constants::DEFAULT_MIN_DELAY_MS);
        assert_eq!(config.max_delay_ms, constants::DEFAULT_MAX_DELAY_MS);
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_settings_file_location() {
        let paths = PlatformPaths {
            config_dir: PathBuf::from("/home/u/.config/loganalyzer"),
        };
        assert_eq!(
            paths.settings_file(),
            PathBuf::from("/home/u/.config/loganalyzer/config.toml")
        );
    }
}
