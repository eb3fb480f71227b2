//! Time-bounded polling shared by every wait.
//!
//! Every wait in this crate is the same loop:
//!
//! 1. while less than the budget has elapsed, try once; return on success
//! 2. otherwise sleep for the recheck interval, clamped so the last sleep lands
//!    just past the deadline instead of overshooting it
//! 3. once the budget is spent, try one final time before reporting
//!    [`PageLoadError::Timeout`]
//!
//! The final attempt is a grace period: a reading that becomes good exactly at
//! the deadline still counts.

mod quiescence;
mod stability;

pub use quiescence::QuiescencePoller;
pub use stability::StabilityPoller;

use crate::clock::{Clock, SystemClock};
use crate::config::PollConfig;
use crate::driver::ElementStatus;
use crate::result::{PageLoadError, PageLoadResult};
use std::time::Duration;

/// Slack added to the remaining budget when clamping the last sleep
pub const DEADLINE_GRACE: Duration = Duration::from_millis(1);

// =============================================================================
// WAIT OUTCOME
// =============================================================================

/// Report of a wait that succeeded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaitOutcome {
    /// Time from the start of the poll to the successful attempt
    pub elapsed: Duration,
    /// Number of attempts made, including the successful one
    pub samples: u64,
    /// Description of what was waited for
    pub waited_for: String,
}

impl WaitOutcome {
    /// Outcome of a wait that had nothing to wait for
    #[must_use]
    pub fn immediate(waited_for: impl Into<String>) -> Self {
        Self {
            elapsed: Duration::ZERO,
            samples: 0,
            waited_for: waited_for.into(),
        }
    }
}

// =============================================================================
// RETRY LOOP
// =============================================================================

/// Value produced by a successful attempt, with loop statistics
#[derive(Debug)]
pub(crate) struct Settled<T> {
    pub value: T,
    pub elapsed: Duration,
    pub samples: u64,
}

impl<T> Settled<T> {
    pub fn into_outcome(self, waited_for: impl Into<String>) -> WaitOutcome {
        WaitOutcome {
            elapsed: self.elapsed,
            samples: self.samples,
            waited_for: waited_for.into(),
        }
    }
}

/// Run `attempt` until it yields a value or `config.threshold_ms` runs out.
pub(crate) fn retry_until<C, T, F>(
    clock: &C,
    config: &PollConfig,
    mut attempt: F,
) -> PageLoadResult<Settled<T>>
where
    C: Clock + ?Sized,
    F: FnMut() -> Option<T>,
{
    let start = clock.now();
    let budget = config.threshold();
    let interval = config.recheck_interval();
    let elapsed = || clock.now().saturating_sub(start);
    let mut samples = 0;

    while elapsed() < budget {
        samples += 1;
        if let Some(value) = attempt() {
            return Ok(Settled {
                value,
                elapsed: elapsed(),
                samples,
            });
        }

        let remaining = budget.saturating_sub(elapsed());
        clock.sleep(interval.min(remaining + DEADLINE_GRACE));
    }

    samples += 1;
    if let Some(value) = attempt() {
        return Ok(Settled {
            value,
            elapsed: elapsed(),
            samples,
        });
    }

    Err(PageLoadError::timeout(config.threshold_ms))
}

// =============================================================================
// CONVENIENCE FUNCTIONS
// =============================================================================

/// Wait on the system clock until `measure` stays constant for the configured
/// stability window.
pub fn wait_stable<T, F>(measure: F, config: &PollConfig) -> PageLoadResult<WaitOutcome>
where
    T: Ord + Clone + std::fmt::Debug,
    F: FnMut() -> T,
{
    StabilityPoller::with_clock(*config, SystemClock::new())?.run(measure)
}

/// Wait on the system clock until every item probes as absent or hidden.
///
/// An empty `items` slice succeeds immediately without probing.
pub fn wait_quiescent<I, F>(items: &[I], probe: F, config: &PollConfig) -> PageLoadResult<WaitOutcome>
where
    F: FnMut(&I) -> ElementStatus,
{
    QuiescencePoller::with_clock(*config, SystemClock::new())?.run(items, probe)
}
