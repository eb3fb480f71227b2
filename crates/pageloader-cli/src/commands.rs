//! CLI command definitions using clap

use crate::config::{load_poll_config, ColorChoice};
use crate::error::CliResult;
use crate::output::OutputFormat;
use clap::{Args, Parser, Subcommand, ValueEnum};
use pageloader::PollConfig;
use std::path::PathBuf;

/// pageloader: inspect page-load poll plans and replay recorded traces
#[derive(Parser, Debug)]
#[command(name = "pageloader")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output (auto, always, never)
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorArg,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the effective poll timings and derived sample counts
    Plan(PlanArgs),

    /// Replay a recorded trace through the poller on a virtual clock
    Replay(ReplayArgs),
}

/// Timing knobs shared by every subcommand
#[derive(Args, Debug, Clone, Default)]
pub struct TimingArgs {
    /// Load poll timings from a JSON or YAML file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Start from a timing preset
    #[arg(long, value_enum)]
    pub preset: Option<PresetArg>,

    /// Overall budget in milliseconds
    #[arg(long, value_name = "MS")]
    pub threshold_ms: Option<u64>,

    /// How long the value must stay unchanged, in milliseconds
    #[arg(long, value_name = "MS")]
    pub stability_window_ms: Option<u64>,

    /// Pause between samples in milliseconds
    #[arg(long, value_name = "MS")]
    pub recheck_interval_ms: Option<u64>,

    /// Whether the value must change at least once before it can settle
    #[arg(long, value_name = "BOOL")]
    pub require_change: Option<bool>,
}

impl TimingArgs {
    /// Resolve the effective config: file or preset, then flag overrides
    pub fn resolve(&self) -> CliResult<PollConfig> {
        let mut config = match (&self.config, self.preset) {
            (Some(path), _) => load_poll_config(path)?,
            (None, Some(preset)) => preset.into(),
            (None, None) => PollConfig::default(),
        };

        if let Some(ms) = self.threshold_ms {
            config = config.with_threshold(ms);
        }
        if let Some(ms) = self.stability_window_ms {
            config = config.with_stability_window(ms);
        }
        if let Some(ms) = self.recheck_interval_ms {
            config = config.with_recheck_interval(ms);
        }
        if let Some(require) = self.require_change {
            config = config.with_require_change(require);
        }

        config.validate()?;
        Ok(config)
    }
}

/// Arguments for the plan command
#[derive(Parser, Debug)]
pub struct PlanArgs {
    /// Poll timings
    #[command(flatten)]
    pub timing: TimingArgs,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

/// Arguments for the replay command
#[derive(Parser, Debug)]
pub struct ReplayArgs {
    /// Trace file (.json, .yaml or .yml)
    pub trace: PathBuf,

    /// What the trace records
    #[arg(long, value_enum, default_value = "size")]
    pub mode: ReplayMode,

    /// Poll timings
    #[command(flatten)]
    pub timing: TimingArgs,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

/// Kind of trace being replayed
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplayMode {
    /// Steps carry a content size; waits for it to stabilize
    #[default]
    Size,
    /// Steps carry loader statuses; waits for all to be absent or hidden
    Loaders,
}

/// Timing preset argument
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum PresetArg {
    /// 4s budget, 500ms window, 100ms interval
    Default,
    /// 1s budget, 200ms window, 50ms interval
    Fast,
    /// 30s budget, 1.5s window, 250ms interval
    Slow,
}

impl From<PresetArg> for PollConfig {
    fn from(arg: PresetArg) -> Self {
        match arg {
            PresetArg::Default => Self::default(),
            PresetArg::Fast => Self::fast(),
            PresetArg::Slow => Self::slow(),
        }
    }
}

/// Color argument for CLI
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum ColorArg {
    /// Automatic color detection
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

impl From<ColorArg> for ColorChoice {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => Self::Auto,
            ColorArg::Always => Self::Always,
            ColorArg::Never => Self::Never,
        }
    }
}
