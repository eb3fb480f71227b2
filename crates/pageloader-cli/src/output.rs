//! Output formatting for plans and replay reports

use crate::replay::ReplayReport;
use clap::ValueEnum;
use console::{style, Term};
use pageloader::PollConfig;
use serde::Serialize;
use std::io;

/// Output format for command results
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// JSON output
    Json,
}

/// Effective poll timings and what they imply
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanReport {
    /// Effective timings
    #[serde(flatten)]
    pub config: PollConfig,
    /// Samples that must agree before a value counts as stable
    pub window_size: usize,
    /// Most samples a poll can take, final check included
    pub max_samples: u64,
}

impl PlanReport {
    /// Derive the report from a config
    #[must_use]
    pub fn new(config: PollConfig) -> Self {
        Self {
            config,
            window_size: config.window_size(),
            max_samples: config.max_samples(),
        }
    }
}

/// Writes command results to stdout
#[derive(Debug)]
pub struct Reporter {
    term: Term,
    /// Whether to use colors
    pub use_color: bool,
    /// Quiet mode
    pub quiet: bool,
}

impl Reporter {
    /// Create a new reporter
    #[must_use]
    pub fn new(use_color: bool, quiet: bool) -> Self {
        Self {
            term: Term::stdout(),
            use_color,
            quiet,
        }
    }

    /// Print a section header
    pub fn header(&self, title: &str) {
        if self.quiet {
            return;
        }

        let styled = if self.use_color {
            style(title).bold().underlined().to_string()
        } else {
            format!("=== {title} ===")
        };
        let _ = self.term.write_line(&styled);
    }

    /// Print an aligned key/value line
    pub fn field(&self, key: &str, value: impl std::fmt::Display) {
        if self.quiet {
            return;
        }

        let key = format!("{key:<18}");
        let key = if self.use_color {
            style(key).dim().to_string()
        } else {
            key
        };
        let _ = self.term.write_line(&format!("{key} {value}"));
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        if self.quiet {
            return;
        }

        let prefix = if self.use_color {
            style("✓").green().bold().to_string()
        } else {
            "PASS".to_string()
        };
        let _ = self.term.write_line(&format!("{prefix} {message}"));
    }

    /// Print a failure message
    pub fn failure(&self, message: &str) {
        // Always print failures, even in quiet mode
        let prefix = if self.use_color {
            style("✗").red().bold().to_string()
        } else {
            "FAIL".to_string()
        };
        let _ = self.term.write_line(&format!("{prefix} {message}"));
    }

    /// Print raw text regardless of quiet mode
    pub fn raw(&self, text: &str) -> io::Result<()> {
        self.term.write_line(text)
    }

    /// Render a plan
    pub fn plan(&self, report: &PlanReport) {
        self.header("Poll plan");
        self.field("threshold", format_args!("{} ms", report.config.threshold_ms));
        self.field(
            "stability window",
            format_args!("{} ms", report.config.stability_window_ms),
        );
        self.field(
            "recheck interval",
            format_args!("{} ms", report.config.recheck_interval_ms),
        );
        self.field("require change", report.config.require_change);
        self.field("window size", format_args!("{} samples", report.window_size));
        self.field("max samples", report.max_samples);
    }

    /// Render a replay result
    pub fn replay(&self, report: &ReplayReport) {
        self.header("Replay");
        self.field("waited for", &report.waited_for);
        self.field("steps", report.steps);
        self.field("samples", report.samples);
        self.field("virtual time", format_args!("{} ms", report.elapsed_ms));
        match report.timeout_ms {
            None => self.success(&format!("settled after {} ms", report.elapsed_ms)),
            Some(ms) => self.failure(&format!("not settled within {ms} ms")),
        }
    }
}

/// Serialize a report as pretty JSON
pub fn to_json<T: Serialize>(report: &T) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report)
}
