//! CLI configuration

use crate::error::{CliError, CliResult};
use pageloader::PollConfig;
use serde::de::DeserializeOwned;
use std::path::Path;

/// CLI verbosity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Quiet - errors only
    Quiet,
    /// Normal - default output
    #[default]
    Normal,
    /// Verbose - extra output
    Verbose,
    /// Debug - poll lifecycle events
    Debug,
    /// Trace - every sample
    Trace,
}

impl Verbosity {
    /// Derive verbosity from the `-v` count and `-q` flag
    #[must_use]
    pub const fn from_flags(verbose: u8, quiet: bool) -> Self {
        if quiet {
            return Self::Quiet;
        }
        match verbose {
            0 => Self::Normal,
            1 => Self::Verbose,
            2 => Self::Debug,
            _ => Self::Trace,
        }
    }

    /// Check if quiet mode
    #[must_use]
    pub const fn is_quiet(self) -> bool {
        matches!(self, Self::Quiet)
    }

    /// Log filter used when `RUST_LOG` is not set
    #[must_use]
    pub const fn log_directive(self) -> &'static str {
        match self {
            Self::Quiet => "error",
            Self::Normal => "warn",
            Self::Verbose => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }
}

/// Color output choice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorChoice {
    /// Always use colors
    Always,
    /// Use colors when output is a terminal
    #[default]
    Auto,
    /// Never use colors
    Never,
}

impl ColorChoice {
    /// Should use colors based on output detection
    #[must_use]
    pub fn should_color(self) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => console::colors_enabled(),
        }
    }
}

/// CLI configuration
#[derive(Debug, Clone, Copy, Default)]
pub struct CliConfig {
    /// Verbosity level
    pub verbosity: Verbosity,
    /// Color output choice
    pub color: ColorChoice,
}

impl CliConfig {
    /// Create new default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set verbosity
    #[must_use]
    pub const fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Set color choice
    #[must_use]
    pub const fn with_color(mut self, color: ColorChoice) -> Self {
        self.color = color;
        self
    }
}

// =============================================================================
// FILE LOADING
// =============================================================================

/// Serialization format of an input file, chosen by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// `.json`
    Json,
    /// `.yaml` or `.yml`
    Yaml,
}

impl FileFormat {
    /// Detect the format from the file extension
    pub fn from_path(path: &Path) -> CliResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("json") => Ok(Self::Json),
            Some("yaml" | "yml") => Ok(Self::Yaml),
            _ => Err(CliError::invalid_argument(format!(
                "{}: expected a .json, .yaml or .yml file",
                path.display()
            ))),
        }
    }

    /// Deserialize `text` in this format
    pub fn parse<T: DeserializeOwned>(self, text: &str) -> CliResult<T> {
        match self {
            Self::Json => Ok(serde_json::from_str(text)?),
            Self::Yaml => Ok(serde_yaml_ng::from_str(text)?),
        }
    }
}

/// Read and deserialize a JSON or YAML file
pub fn load_file<T: DeserializeOwned>(path: &Path) -> CliResult<T> {
    let format = FileFormat::from_path(path)?;
    let text = std::fs::read_to_string(path)?;
    format.parse(&text)
}

/// Load a poll configuration file; missing fields take their defaults
pub fn load_poll_config(path: &Path) -> CliResult<PollConfig> {
    let config: PollConfig = load_file(path)?;
    config
        .validate()
        .map_err(|e| CliError::config(format!("{}: {e}", path.display())))?;
    Ok(config)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    mod verbosity_tests {
        use super::*;

        #[test]
        fn test_default_verbosity() {
            assert_eq!(Verbosity::default(), Verbosity::Normal);
        }

        #[test]
        fn test_from_flags() {
            assert_eq!(Verbosity::from_flags(0, false), Verbosity::Normal);
            assert_eq!(Verbosity::from_flags(1, false), Verbosity::Verbose);
            assert_eq!(Verbosity::from_flags(2, false), Verbosity::Debug);
            assert_eq!(Verbosity::from_flags(7, false), Verbosity::Trace);
            assert_eq!(Verbosity::from_flags(3, true), Verbosity::Quiet);
        }

        #[test]
        fn test_log_directive() {
            assert_eq!(Verbosity::Quiet.log_directive(), "error");
            assert_eq!(Verbosity::Normal.log_directive(), "warn");
            assert_eq!(Verbosity::Verbose.log_directive(), "info");
            assert_eq!(Verbosity::Debug.log_directive(), "debug");
            assert_eq!(Verbosity::Trace.log_directive(), "trace");
        }

        #[test]
        fn test_is_quiet() {
            assert!(Verbosity::Quiet.is_quiet());
            assert!(!Verbosity::Normal.is_quiet());
            assert!(!Verbosity::Trace.is_quiet());
        }
    }

    mod color_tests {
        use super::*;

        #[test]
        fn test_explicit_choices() {
            assert!(ColorChoice::Always.should_color());
            assert!(!ColorChoice::Never.should_color());
        }

        #[test]
        fn test_cli_config_builder() {
            let config = CliConfig::new()
                .with_verbosity(Verbosity::Debug)
                .with_color(ColorChoice::Never);
            assert_eq!(config.verbosity, Verbosity::Debug);
            assert_eq!(config.color, ColorChoice::Never);
        }
    }

    mod file_tests {
        use super::*;

        #[test]
        fn test_format_from_extension() {
            assert_eq!(FileFormat::from_path(Path::new("a.json")).unwrap(), FileFormat::Json);
            assert_eq!(FileFormat::from_path(Path::new("a.YML")).unwrap(), FileFormat::Yaml);
            assert_eq!(FileFormat::from_path(Path::new("a.yaml")).unwrap(), FileFormat::Yaml);
            assert!(FileFormat::from_path(Path::new("a.toml")).is_err());
            assert!(FileFormat::from_path(Path::new("trace")).is_err());
        }

        #[test]
        fn test_load_partial_yaml_config() {
            let dir = TempDir::new().unwrap();
            let path = dir.path().join("poll.yaml");
            fs::write(&path, "threshold_ms: 2000\nrequire_change: false\n").unwrap();
            let config = load_poll_config(&path).unwrap();
            assert_eq!(config.threshold_ms, 2_000);
            assert!(!config.require_change);
            assert_eq!(config.recheck_interval_ms, 100);
        }

        #[test]
        fn test_load_json_config_rejects_zero_interval() {
            let dir = TempDir::new().unwrap();
            let path = dir.path().join("poll.json");
            fs::write(&path, r#"{"recheck_interval_ms": 0}"#).unwrap();
            let err = load_poll_config(&path).unwrap_err();
            assert!(matches!(err, CliError::Config { .. }));
        }

        #[test]
        fn test_missing_file_is_io_error() {
            let err = load_poll_config(Path::new("/nonexistent/poll.json")).unwrap_err();
            assert!(matches!(err, CliError::Io(_)));
        }
    }
}
