//! Wait until loading indicators are gone.

use super::{retry_until, WaitOutcome};
use crate::clock::{Clock, SystemClock};
use crate::config::PollConfig;
use crate::driver::ElementStatus;
use crate::result::PageLoadResult;
use tracing::{debug, trace};

/// Polls a set of items until every one is absent or hidden.
///
/// Only `threshold_ms` and `recheck_interval_ms` of the config apply.
#[derive(Debug, Clone)]
pub struct QuiescencePoller<C = SystemClock> {
    config: PollConfig,
    clock: C,
}

impl QuiescencePoller<SystemClock> {
    /// Create a poller on the system clock
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if `config` does not validate.
    pub fn new(config: PollConfig) -> PageLoadResult<Self> {
        Self::with_clock(config, SystemClock::new())
    }
}

impl<C: Clock> QuiescencePoller<C> {
    /// Create a poller on a custom clock
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if `config` does not validate.
    pub fn with_clock(config: PollConfig, clock: C) -> PageLoadResult<Self> {
        config.validate()?;
        Ok(Self { config, clock })
    }

    /// Get the poll configuration
    #[must_use]
    pub const fn config(&self) -> &PollConfig {
        &self.config
    }

    /// Probe `items` until all of them are settled.
    ///
    /// Probing stops at the first displayed item of a round. An empty `items`
    /// slice succeeds immediately with no probe and no sleep.
    ///
    /// # Errors
    ///
    /// Returns `Timeout` carrying `threshold_ms` if some item stays displayed.
    pub fn run<I, F>(&self, items: &[I], mut probe: F) -> PageLoadResult<WaitOutcome>
    where
        F: FnMut(&I) -> ElementStatus,
    {
        let waited_for = format!("{} loader(s) to disappear", items.len());
        if items.is_empty() {
            debug!("no loaders to wait for");
            return Ok(WaitOutcome::immediate(waited_for));
        }

        debug!(
            loaders = items.len(),
            threshold_ms = self.config.threshold_ms,
            "quiescence poll started"
        );

        let result = retry_until(&self.clock, &self.config, || {
            let quiet = items.iter().all(|item| probe(item).is_settled());
            trace!(quiet, "quiescence sample");
            quiet.then_some(())
        });

        match result {
            Ok(settled) => {
                debug!(
                    elapsed_ms = settled.elapsed.as_millis() as u64,
                    samples = settled.samples,
                    "loaders gone"
                );
                Ok(settled.into_outcome(waited_for))
            }
            Err(err) => {
                debug!(%err, "quiescence poll timed out");
                Err(err)
            }
        }
    }
}
