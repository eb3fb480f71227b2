//! Timing configuration for polling waits.

use crate::result::{PageLoadError, PageLoadResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

// =============================================================================
// CONSTANTS
// =============================================================================

/// Default total budget for a wait (4 seconds)
pub const MAX_THRESHOLD_TIME_MS: u64 = 4_000;

/// Default time the measured value must stay unchanged (500ms)
pub const UNCHANGED_WAITING_TIME_MS: u64 = 500;

/// Default delay between two samples (100ms)
pub const TIME_BEFORE_NEXT_CHECK_MS: u64 = 100;

// =============================================================================
// POLL CONFIG
// =============================================================================

/// Timing parameters for a single poll.
///
/// All times are milliseconds. `stability_window_ms` and `require_change` only
/// affect stability polls; quiescence polls ignore them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollConfig {
    /// Total time budget
    pub threshold_ms: u64,
    /// How long the measured value must stay constant
    pub stability_window_ms: u64,
    /// Nominal delay between samples
    pub recheck_interval_ms: u64,
    /// Whether the value must have changed at least once since the poll began
    pub require_change: bool,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            threshold_ms: MAX_THRESHOLD_TIME_MS,
            stability_window_ms: UNCHANGED_WAITING_TIME_MS,
            recheck_interval_ms: TIME_BEFORE_NEXT_CHECK_MS,
            require_change: true,
        }
    }
}

impl PollConfig {
    /// Create a config with the default timings
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the total budget
    #[must_use]
    pub const fn with_threshold(mut self, threshold_ms: u64) -> Self {
        self.threshold_ms = threshold_ms;
        self
    }

    /// Set the stability window
    #[must_use]
    pub const fn with_stability_window(mut self, stability_window_ms: u64) -> Self {
        self.stability_window_ms = stability_window_ms;
        self
    }

    /// Set the delay between samples
    #[must_use]
    pub const fn with_recheck_interval(mut self, recheck_interval_ms: u64) -> Self {
        self.recheck_interval_ms = recheck_interval_ms;
        self
    }

    /// Set whether the value must change before it may settle
    #[must_use]
    pub const fn with_require_change(mut self, require_change: bool) -> Self {
        self.require_change = require_change;
        self
    }

    /// Short budget with fast polling, for pages that settle quickly
    #[must_use]
    pub const fn fast() -> Self {
        Self {
            threshold_ms: 1_000,
            stability_window_ms: 200,
            recheck_interval_ms: 50,
            require_change: true,
        }
    }

    /// Long budget with slower polling, for heavy pages
    #[must_use]
    pub const fn slow() -> Self {
        Self {
            threshold_ms: 30_000,
            stability_window_ms: 1_500,
            recheck_interval_ms: 250,
            require_change: true,
        }
    }

    /// Total budget as a Duration
    #[must_use]
    pub const fn threshold(&self) -> Duration {
        Duration::from_millis(self.threshold_ms)
    }

    /// Stability window as a Duration
    #[must_use]
    pub const fn stability_window(&self) -> Duration {
        Duration::from_millis(self.stability_window_ms)
    }

    /// Recheck interval as a Duration
    #[must_use]
    pub const fn recheck_interval(&self) -> Duration {
        Duration::from_millis(self.recheck_interval_ms)
    }

    /// Number of consecutive equal samples that make the value stable:
    /// `ceil(stability_window / recheck_interval)`, at least 1.
    ///
    /// Only meaningful for a config that passes [`validate`](Self::validate).
    #[must_use]
    pub fn window_size(&self) -> usize {
        let interval = self.recheck_interval_ms.max(1);
        let checks = self.stability_window_ms.div_ceil(interval);
        usize::try_from(checks).unwrap_or(usize::MAX).max(1)
    }

    /// Upper bound on in-loop samples a poll can take, plus the final check
    #[must_use]
    pub fn max_samples(&self) -> u64 {
        let interval = self.recheck_interval_ms.max(1);
        self.threshold_ms.div_ceil(interval).saturating_add(1)
    }

    /// Check the invariants a poll relies on.
    ///
    /// # Errors
    ///
    /// Returns [`PageLoadError::InvalidConfig`] if the recheck interval is zero.
    pub fn validate(&self) -> PageLoadResult<()> {
        if self.recheck_interval_ms == 0 {
            return Err(PageLoadError::invalid_config(
                "recheck interval must be positive",
            ));
        }
        Ok(())
    }
}
