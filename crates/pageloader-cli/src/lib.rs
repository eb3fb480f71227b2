//! pageloader CLI library
//!
//! Command-line front end for the `pageloader` crate: show what a set of
//! poll timings implies and replay recorded page-load traces on a virtual
//! clock.

#![warn(missing_docs)]
#![allow(clippy::module_name_repetitions)]

mod commands;
mod config;
mod error;
pub mod logging;
mod output;
pub mod replay;

pub use commands::{Cli, ColorArg, Commands, PlanArgs, PresetArg, ReplayArgs, ReplayMode, TimingArgs};
pub use config::{load_file, load_poll_config, CliConfig, ColorChoice, FileFormat, Verbosity};
pub use error::{CliError, CliResult};
pub use logging::init_logging;
pub use output::{to_json, OutputFormat, PlanReport, Reporter};
pub use replay::{replay, ReplayReport, Trace};
