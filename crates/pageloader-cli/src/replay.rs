//! Trace replay on a virtual clock.
//!
//! A trace records what a page looked like over time. Replaying it drives a
//! [`PageLoader`] against a [`TracePage`] whose state is looked up from the
//! trace at the current [`FakeClock`] time, so a recorded load can be
//! re-judged under different timings without a browser.
//!
//! ```yaml
//! # --mode size
//! - { at_ms: 0,   size: 1200 }
//! - { at_ms: 300, size: 4800 }
//!
//! # --mode loaders
//! - { at_ms: 0,   loaders: [displayed, displayed] }
//! - { at_ms: 900, loaders: [hidden, absent] }
//! ```

use crate::commands::ReplayMode;
use crate::config::{load_file, FileFormat};
use crate::error::{CliError, CliResult};
use pageloader::{
    By, ElementStatus, FakeClock, PageDriver, PageLoadError, PageLoader, PollConfig, WaitOutcome,
};
use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::path::Path;
use tracing::{debug, info};

const LOADER_PREFIX: &str = "loader_";

/// Content size observed from `at_ms` on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SizeStep {
    /// Virtual time the step takes effect
    pub at_ms: u64,
    /// Content length
    pub size: u64,
}

/// Loader statuses observed from `at_ms` on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoaderStep {
    /// Virtual time the step takes effect
    pub at_ms: u64,
    /// One status per loader, in a fixed order
    pub loaders: Vec<ElementStatus>,
}

// =============================================================================
// TIMELINE
// =============================================================================

/// Piecewise-constant value over virtual time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timeline<T> {
    steps: Vec<(u64, T)>,
}

impl<T> Timeline<T> {
    /// Build a timeline; steps are ordered by time, file order breaking ties
    pub fn new(mut steps: Vec<(u64, T)>) -> CliResult<Self> {
        if steps.is_empty() {
            return Err(CliError::trace("trace has no steps"));
        }
        steps.sort_by_key(|(at, _)| *at);
        Ok(Self { steps })
    }

    /// Value of the latest step with `at_ms <= t`, or the first step before it
    #[must_use]
    pub fn value_at(&self, t_ms: u64) -> &T {
        let idx = self.steps.partition_point(|(at, _)| *at <= t_ms);
        &self.steps[idx.saturating_sub(1)].1
    }

    /// Number of steps
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Always false; a timeline holds at least one step
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }
}

/// A parsed trace
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trace {
    /// Content sizes
    Size(Timeline<u64>),
    /// Loader statuses, all steps with the same loader count
    Loaders {
        /// Statuses over time
        timeline: Timeline<Vec<ElementStatus>>,
        /// Number of loaders
        count: usize,
    },
}

impl Trace {
    /// Read a trace file, format chosen by extension
    pub fn load(path: &Path, mode: ReplayMode) -> CliResult<Self> {
        match mode {
            ReplayMode::Size => Self::from_size_steps(load_file(path)?),
            ReplayMode::Loaders => Self::from_loader_steps(load_file(path)?),
        }
    }

    /// Parse a trace from text
    pub fn parse(text: &str, format: FileFormat, mode: ReplayMode) -> CliResult<Self> {
        match mode {
            ReplayMode::Size => Self::from_size_steps(format.parse(text)?),
            ReplayMode::Loaders => Self::from_loader_steps(format.parse(text)?),
        }
    }

    /// Build a size trace
    pub fn from_size_steps(steps: Vec<SizeStep>) -> CliResult<Self> {
        let steps = steps.into_iter().map(|s| (s.at_ms, s.size)).collect();
        Ok(Self::Size(Timeline::new(steps)?))
    }

    /// Build a loaders trace; every step must list the same number of loaders
    pub fn from_loader_steps(steps: Vec<LoaderStep>) -> CliResult<Self> {
        let count = steps.first().map_or(0, |s| s.loaders.len());
        if let Some((i, step)) = steps
            .iter()
            .enumerate()
            .find(|(_, s)| s.loaders.len() != count)
        {
            return Err(CliError::trace(format!(
                "step {i} lists {} loader(s), expected {count}",
                step.loaders.len()
            )));
        }
        let steps = steps.into_iter().map(|s| (s.at_ms, s.loaders)).collect();
        Ok(Self::Loaders {
            timeline: Timeline::new(steps)?,
            count,
        })
    }

    /// Replay mode this trace belongs to
    #[must_use]
    pub const fn mode(&self) -> ReplayMode {
        match self {
            Self::Size(_) => ReplayMode::Size,
            Self::Loaders { .. } => ReplayMode::Loaders,
        }
    }

    /// Number of recorded steps
    #[must_use]
    pub fn steps(&self) -> usize {
        match self {
            Self::Size(timeline) => timeline.len(),
            Self::Loaders { timeline, .. } => timeline.len(),
        }
    }
}

// =============================================================================
// TRACE PAGE
// =============================================================================

/// A page driver answering from a trace at the clock's current time.
///
/// In size mode the trace value is the page size. In loaders mode loader `i`
/// is reachable as `By::id("loader_{i}")`.
#[derive(Debug)]
pub struct TracePage<'a> {
    trace: &'a Trace,
    clock: &'a FakeClock,
    samples: Cell<u64>,
}

impl<'a> TracePage<'a> {
    /// Create a page over `trace` read at `clock` time
    #[must_use]
    pub const fn new(trace: &'a Trace, clock: &'a FakeClock) -> Self {
        Self {
            trace,
            clock,
            samples: Cell::new(0),
        }
    }

    /// Number of measurement rounds taken so far
    #[must_use]
    pub fn samples(&self) -> u64 {
        self.samples.get()
    }

    fn loader_index(by: &By) -> Option<usize> {
        match by {
            By::Id(id) => id.strip_prefix(LOADER_PREFIX)?.parse().ok(),
            _ => None,
        }
    }
}

impl PageDriver for TracePage<'_> {
    type Element = ElementStatus;

    fn find_element(&self, by: &By) -> Option<Self::Element> {
        let Trace::Loaders { timeline, .. } = self.trace else {
            return None;
        };
        let index = Self::loader_index(by)?;
        // every round probes loader 0 first
        if index == 0 {
            self.samples.set(self.samples.get() + 1);
        }
        match timeline.value_at(self.clock.now_ms()).get(index)? {
            ElementStatus::Absent => None,
            status => Some(*status),
        }
    }

    fn is_displayed(&self, element: &Self::Element) -> bool {
        *element == ElementStatus::Displayed
    }

    fn element_size(&self, _element: &Self::Element) -> u64 {
        0
    }

    fn page_size(&self) -> u64 {
        match self.trace {
            Trace::Size(timeline) => {
                self.samples.set(self.samples.get() + 1);
                *timeline.value_at(self.clock.now_ms())
            }
            Trace::Loaders { .. } => 0,
        }
    }
}

// =============================================================================
// REPLAY
// =============================================================================

/// Result of replaying a trace
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplayReport {
    /// Replay mode
    pub mode: ReplayMode,
    /// Steps in the trace
    pub steps: usize,
    /// What the poll waited for
    pub waited_for: String,
    /// Whether the page settled within the budget
    pub settled: bool,
    /// Virtual time when the poll returned
    pub elapsed_ms: u64,
    /// Measurement rounds taken
    pub samples: u64,
    /// Budget that ran out, when the poll timed out
    pub timeout_ms: Option<u64>,
    /// Effective timings
    pub config: PollConfig,
}

/// Replay `trace` with `config` on a fresh virtual clock.
///
/// A timeout is reported in the returned report; only invalid timings are
/// errors.
pub fn replay(trace: &Trace, config: &PollConfig) -> CliResult<ReplayReport> {
    let clock = FakeClock::new();
    let page = TracePage::new(trace, &clock);
    let loader = PageLoader::with_clock(&page, &clock);
    debug!(mode = ?trace.mode(), steps = trace.steps(), "replaying trace");

    let (waited_for, result) = match trace {
        Trace::Size(_) => (
            "page source size to settle".to_string(),
            loader.wait_by_dom_size_with(config),
        ),
        Trace::Loaders { count, .. } => {
            let ids: Vec<By> = (0..*count)
                .map(|i| By::id(format!("{LOADER_PREFIX}{i}")))
                .collect();
            (
                format!("{count} loader(s) to disappear"),
                loader.wait_by_loaders_status_with(&ids, config),
            )
        }
    };

    let (waited_for, timeout_ms) = match result {
        Ok(WaitOutcome { waited_for, .. }) => (waited_for, None),
        Err(PageLoadError::Timeout { ms }) => (waited_for, Some(ms)),
        Err(err) => return Err(err.into()),
    };

    let report = ReplayReport {
        mode: trace.mode(),
        steps: trace.steps(),
        waited_for,
        settled: timeout_ms.is_none(),
        elapsed_ms: clock.now_ms(),
        samples: page.samples(),
        timeout_ms,
        config: *config,
    };
    info!(
        settled = report.settled,
        elapsed_ms = report.elapsed_ms,
        samples = report.samples,
        "replay finished"
    );
    Ok(report)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use ElementStatus::{Absent, Displayed, Hidden};

    fn size_trace(steps: &[(u64, u64)]) -> Trace {
        Trace::from_size_steps(
            steps
                .iter()
                .map(|&(at_ms, size)| SizeStep { at_ms, size })
                .collect(),
        )
        .unwrap()
    }

    mod timeline_tests {
        use super::*;

        #[test]
        fn test_value_before_first_step_uses_first() {
            let timeline = Timeline::new(vec![(200, 'a'), (500, 'b')]).unwrap();
            assert_eq!(*timeline.value_at(0), 'a');
            assert_eq!(*timeline.value_at(199), 'a');
        }

        #[test]
        fn test_latest_step_at_or_before() {
            let timeline = Timeline::new(vec![(0, 1), (300, 2), (600, 3)]).unwrap();
            assert_eq!(*timeline.value_at(299), 1);
            assert_eq!(*timeline.value_at(300), 2);
            assert_eq!(*timeline.value_at(10_000), 3);
        }

        #[test]
        fn test_unsorted_steps_and_ties() {
            let timeline = Timeline::new(vec![(300, 'c'), (0, 'a'), (300, 'd')]).unwrap();
            assert_eq!(*timeline.value_at(100), 'a');
            // later entry in file order wins a tie
            assert_eq!(*timeline.value_at(300), 'd');
        }

        #[test]
        fn test_empty_rejected() {
            let err = Timeline::<u64>::new(Vec::new()).unwrap_err();
            assert!(matches!(err, CliError::Trace { .. }));
        }
    }

    mod parse_tests {
        use super::*;

        #[test]
        fn test_parse_yaml_size_trace() {
            let text = "- { at_ms: 0, size: 10 }\n- { at_ms: 100, size: 20 }\n";
            let trace = Trace::parse(text, FileFormat::Yaml, ReplayMode::Size).unwrap();
            assert_eq!(trace.steps(), 2);
            assert_eq!(trace.mode(), ReplayMode::Size);
        }

        #[test]
        fn test_parse_json_loader_trace() {
            let text = r#"[{"at_ms": 0, "loaders": ["displayed", "hidden"]}]"#;
            let trace = Trace::parse(text, FileFormat::Json, ReplayMode::Loaders).unwrap();
            assert!(matches!(trace, Trace::Loaders { count: 2, .. }));
        }

        #[test]
        fn test_inconsistent_loader_count_rejected() {
            let err = Trace::from_loader_steps(vec![
                LoaderStep {
                    at_ms: 0,
                    loaders: vec![Displayed, Displayed],
                },
                LoaderStep {
                    at_ms: 100,
                    loaders: vec![Hidden],
                },
            ])
            .unwrap_err();
            assert_eq!(
                err.to_string(),
                "Invalid trace: step 1 lists 1 loader(s), expected 2"
            );
        }

        #[test]
        fn test_unknown_field_rejected() {
            let text = r#"[{"at_ms": 0, "bytes": 10}]"#;
            assert!(Trace::parse(text, FileFormat::Json, ReplayMode::Size).is_err());
        }

        #[test]
        fn test_empty_trace_rejected() {
            assert!(Trace::parse("[]", FileFormat::Json, ReplayMode::Size).is_err());
        }
    }

    mod replay_tests {
        use super::*;

        #[test]
        fn test_size_trace_settles() {
            let trace = size_trace(&[(0, 100), (200, 300), (450, 900)]);
            let report = replay(&trace, &PollConfig::default()).unwrap();
            // 900 from 500ms, fifth equal sample at 900ms
            assert!(report.settled);
            assert_eq!(report.elapsed_ms, 900);
            assert_eq!(report.samples, 10);
            assert_eq!(report.timeout_ms, None);
        }

        #[test]
        fn test_flat_size_trace_times_out() {
            let trace = size_trace(&[(0, 100)]);
            let config = PollConfig::new().with_threshold(1_000);
            let report = replay(&trace, &config).unwrap();
            assert!(!report.settled);
            assert_eq!(report.timeout_ms, Some(1_000));
            assert_eq!(report.elapsed_ms, 1_000);
            assert_eq!(report.samples, 11);
        }

        #[test]
        fn test_flat_size_trace_without_change_requirement() {
            let trace = size_trace(&[(0, 100)]);
            let config = PollConfig::new().with_require_change(false);
            let report = replay(&trace, &config).unwrap();
            assert!(report.settled);
            assert_eq!(report.samples, 5);
        }

        #[test]
        fn test_loader_trace_settles_when_all_gone() {
            let trace = Trace::from_loader_steps(vec![
                LoaderStep {
                    at_ms: 0,
                    loaders: vec![Displayed, Displayed],
                },
                LoaderStep {
                    at_ms: 350,
                    loaders: vec![Hidden, Displayed],
                },
                LoaderStep {
                    at_ms: 700,
                    loaders: vec![Hidden, Absent],
                },
            ])
            .unwrap();
            let report = replay(&trace, &PollConfig::default()).unwrap();
            assert!(report.settled);
            assert_eq!(report.elapsed_ms, 700);
            assert_eq!(report.samples, 8);
            assert_eq!(report.waited_for, "2 loader(s) to disappear");
        }

        #[test]
        fn test_loader_trace_times_out() {
            let trace = Trace::from_loader_steps(vec![LoaderStep {
                at_ms: 0,
                loaders: vec![Displayed],
            }])
            .unwrap();
            let config = PollConfig::new().with_threshold(500);
            let report = replay(&trace, &config).unwrap();
            assert_eq!(report.timeout_ms, Some(500));
            assert_eq!(report.samples, 6);
        }

        #[test]
        fn test_zero_loaders_settle_immediately() {
            let trace = Trace::from_loader_steps(vec![LoaderStep {
                at_ms: 0,
                loaders: Vec::new(),
            }])
            .unwrap();
            let report = replay(&trace, &PollConfig::default()).unwrap();
            assert!(report.settled);
            assert_eq!(report.samples, 0);
            assert_eq!(report.elapsed_ms, 0);
        }

        #[test]
        fn test_invalid_config_is_error() {
            let trace = size_trace(&[(0, 1)]);
            let config = PollConfig::new().with_recheck_interval(0);
            let err = replay(&trace, &config).unwrap_err();
            assert!(matches!(
                err,
                CliError::PageLoad(PageLoadError::InvalidConfig { .. })
            ));
        }

        #[test]
        fn test_report_serializes_mode_lowercase() {
            let report = replay(&size_trace(&[(0, 1)]), &PollConfig::new().with_threshold(0))
                .unwrap();
            let json = serde_json::to_value(&report).unwrap();
            assert_eq!(json["mode"], "size");
            assert_eq!(json["settled"], false);
            assert_eq!(json["config"]["threshold_ms"], 0);
        }
    }
}
