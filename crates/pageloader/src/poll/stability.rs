//! Wait until a measured quantity stops changing.

use super::{retry_until, WaitOutcome};
use crate::clock::{Clock, SystemClock};
use crate::config::PollConfig;
use crate::result::PageLoadResult;
use crate::window::ExtremumWindow;
use std::fmt::Debug;
use tracing::{debug, trace};

/// A window slot: either a seed placeholder or a real reading.
///
/// Seeds order below every reading and are pairwise distinct, so the window
/// cannot look flat until it holds `W` real readings.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum Slot<T> {
    Seed(usize),
    Reading(T),
}

/// Polls a measurement until it has been constant for the stability window.
///
/// Success requires the last `W = config.window_size()` samples to be equal
/// and, when `require_change` is set, that some sample differed from the one
/// before it since the poll began.
#[derive(Debug, Clone)]
pub struct StabilityPoller<C = SystemClock> {
    config: PollConfig,
    clock: C,
    description: String,
}

impl StabilityPoller<SystemClock> {
    /// Create a poller on the system clock
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if `config` does not validate.
    pub fn new(config: PollConfig) -> PageLoadResult<Self> {
        Self::with_clock(config, SystemClock::new())
    }
}

impl<C: Clock> StabilityPoller<C> {
    /// Create a poller on a custom clock
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if `config` does not validate.
    pub fn with_clock(config: PollConfig, clock: C) -> PageLoadResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            clock,
            description: "measured value to stabilize".to_string(),
        })
    }

    /// Set the description reported in the outcome
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Get the poll configuration
    #[must_use]
    pub const fn config(&self) -> &PollConfig {
        &self.config
    }

    /// Poll `measure` until its value settles or the budget runs out.
    ///
    /// # Errors
    ///
    /// Returns `Timeout` carrying `threshold_ms` if the value never settles.
    pub fn run<T, F>(&self, mut measure: F) -> PageLoadResult<WaitOutcome>
    where
        T: Ord + Clone + Debug,
        F: FnMut() -> T,
    {
        let width = self.config.window_size();
        let require_change = self.config.require_change;
        // a window wider than the sample budget can never go flat; one seed
        // past the budget keeps it that way without allocating all of `width`
        let budget = usize::try_from(self.config.max_samples())
            .unwrap_or(usize::MAX)
            .saturating_add(1);
        let seeds = width.min(budget);
        let mut window = ExtremumWindow::new((0..seeds).map(Slot::Seed))?;
        let mut previous: Option<T> = None;
        let mut changed = false;

        debug!(
            waiting_for = %self.description,
            window = width,
            seeds,
            threshold_ms = self.config.threshold_ms,
            require_change,
            "stability poll started"
        );

        let result = retry_until(&self.clock, &self.config, || {
            let value = measure();
            window.append(Slot::Reading(value.clone()));

            let flat = window.is_flat();
            trace!(?value, flat, changed, "stability sample");
            if flat && (!require_change || changed) {
                return Some(());
            }

            match &previous {
                Some(prev) if *prev == value => {}
                Some(_) => {
                    changed = true;
                    previous = Some(value);
                }
                None => previous = Some(value),
            }
            None
        });

        match result {
            Ok(settled) => {
                debug!(
                    elapsed_ms = settled.elapsed.as_millis() as u64,
                    samples = settled.samples,
                    "stability poll settled"
                );
                Ok(settled.into_outcome(self.description.clone()))
            }
            Err(err) => {
                debug!(%err, "stability poll timed out");
                Err(err)
            }
        }
    }

    /// Poll the sum of `size_of` over `items`.
    ///
    /// An empty `items` slice succeeds immediately without measuring.
    ///
    /// # Errors
    ///
    /// Returns `Timeout` carrying `threshold_ms` if the sum never settles.
    pub fn run_sum<I, F>(&self, items: &[I], mut size_of: F) -> PageLoadResult<WaitOutcome>
    where
        F: FnMut(&I) -> u64,
    {
        if items.is_empty() {
            debug!(waiting_for = %self.description, "nothing to measure");
            return Ok(WaitOutcome::immediate(self.description.clone()));
        }
        self.run(|| items.iter().map(&mut size_of).sum::<u64>())
    }
}
