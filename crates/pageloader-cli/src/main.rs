//! pageloader: inspect poll plans and replay page-load traces
//!
//! ## Usage
//!
//! ```bash
//! pageloader plan --preset fast --format json
//! pageloader replay trace.yaml --threshold-ms 2000
//! pageloader replay loaders.json --mode loaders -vv
//! ```

use clap::Parser;
use pageloader_cli::{
    init_logging, replay, to_json, Cli, CliConfig, CliResult, ColorChoice, Commands,
    OutputFormat, PlanArgs, PlanReport, ReplayArgs, Reporter, Trace, Verbosity,
};
use std::process::ExitCode;

/// Exit code for a replay that ran out of budget
const EXIT_TIMEOUT: u8 = 2;

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = build_config(&cli);
    init_logging(config.verbosity, config.color.should_color());

    match run(cli.command, &config) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Commands, config: &CliConfig) -> CliResult<ExitCode> {
    match command {
        Commands::Plan(args) => run_plan(config, &args),
        Commands::Replay(args) => run_replay(config, &args),
    }
}

fn build_config(cli: &Cli) -> CliConfig {
    let color: ColorChoice = cli.color.into();
    CliConfig::new()
        .with_verbosity(Verbosity::from_flags(cli.verbose, cli.quiet))
        .with_color(color)
}

fn reporter(config: &CliConfig) -> Reporter {
    Reporter::new(config.color.should_color(), config.verbosity.is_quiet())
}

fn run_plan(config: &CliConfig, args: &PlanArgs) -> CliResult<ExitCode> {
    let report = PlanReport::new(args.timing.resolve()?);
    let out = reporter(config);
    match args.format {
        OutputFormat::Text => out.plan(&report),
        OutputFormat::Json => out.raw(&to_json(&report)?)?,
    }
    Ok(ExitCode::SUCCESS)
}

fn run_replay(config: &CliConfig, args: &ReplayArgs) -> CliResult<ExitCode> {
    let poll = args.timing.resolve()?;
    let trace = Trace::load(&args.trace, args.mode)?;
    let report = replay(&trace, &poll)?;

    let out = reporter(config);
    match args.format {
        OutputFormat::Text => out.replay(&report),
        OutputFormat::Json => out.raw(&to_json(&report)?)?,
    }

    Ok(if report.settled {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(EXIT_TIMEOUT)
    })
}
