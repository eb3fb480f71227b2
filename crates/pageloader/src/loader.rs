//! Page-load waits over a [`PageDriver`].
//!
//! [`PageLoader`] offers three ways to decide that a page has finished loading
//! dynamic content, plus an explicit wait for a single element:
//!
//! | Method                        | Settled when                                    |
//! |-------------------------------|-------------------------------------------------|
//! | `wait_by_loaders_status`      | every loading indicator is absent or hidden     |
//! | `wait_by_dom_size`            | page source length stops changing               |
//! | `wait_by_improved_dom_size`   | summed inner HTML of chosen elements stops changing |
//! | `find_dynamic_element`        | the element exists                              |
//!
//! Every method has a form using the loader's default [`PollConfig`] and a
//! `_with` form taking an explicit one.

use crate::clock::{Clock, SystemClock};
use crate::config::PollConfig;
use crate::driver::PageDriver;
use crate::locator::By;
use crate::poll::{retry_until, QuiescencePoller, StabilityPoller, WaitOutcome};
use crate::result::PageLoadResult;
use tracing::debug;

/// Waits for dynamic page content through a driver
#[derive(Debug, Clone)]
pub struct PageLoader<D, C = SystemClock> {
    driver: D,
    clock: C,
    defaults: PollConfig,
}

impl<D: PageDriver> PageLoader<D> {
    /// Create a loader on the system clock with default timings
    #[must_use]
    pub fn new(driver: D) -> Self {
        Self::with_clock(driver, SystemClock::new())
    }
}

impl<D: PageDriver, C: Clock> PageLoader<D, C> {
    /// Create a loader on a custom clock
    #[must_use]
    pub fn with_clock(driver: D, clock: C) -> Self {
        Self {
            driver,
            clock,
            defaults: PollConfig::default(),
        }
    }

    /// Replace the timings used by the default forms
    #[must_use]
    pub fn with_defaults(mut self, defaults: PollConfig) -> Self {
        self.defaults = defaults;
        self
    }

    /// Get the underlying driver
    #[must_use]
    pub const fn driver(&self) -> &D {
        &self.driver
    }

    /// Get the default timings
    #[must_use]
    pub const fn defaults(&self) -> &PollConfig {
        &self.defaults
    }

    // =========================================================================
    // SINGLE ELEMENT
    // =========================================================================

    /// Wait for an element to appear, using the default budget.
    pub fn find_dynamic_element(&self, by: &By) -> PageLoadResult<D::Element> {
        self.find_dynamic_element_within(by, self.defaults.threshold_ms)
    }

    /// Wait up to `threshold_ms` for an element to appear and return it.
    pub fn find_dynamic_element_within(
        &self,
        by: &By,
        threshold_ms: u64,
    ) -> PageLoadResult<D::Element> {
        let config = self.defaults.with_threshold(threshold_ms);
        config.validate()?;

        let settled = retry_until(&self.clock, &config, || self.driver.find_element(by))?;
        debug!(
            element = %by,
            elapsed_ms = settled.elapsed.as_millis() as u64,
            "dynamic element found"
        );
        Ok(settled.value)
    }

    // =========================================================================
    // LOADING INDICATORS
    // =========================================================================

    /// Wait for all loading indicators to vanish, using default timings.
    pub fn wait_by_loaders_status(&self, loaders: &[By]) -> PageLoadResult<WaitOutcome> {
        self.wait_by_loaders_status_with(loaders, &self.defaults)
    }

    /// Wait for all loading indicators to be absent or hidden.
    ///
    /// An empty `loaders` slice succeeds immediately.
    pub fn wait_by_loaders_status_with(
        &self,
        loaders: &[By],
        config: &PollConfig,
    ) -> PageLoadResult<WaitOutcome> {
        QuiescencePoller::with_clock(*config, &self.clock)?
            .run(loaders, |by| self.driver.element_status(by))
    }

    // =========================================================================
    // DOM SIZE
    // =========================================================================

    /// Wait for the page source length to settle, using default timings.
    pub fn wait_by_dom_size(&self) -> PageLoadResult<WaitOutcome> {
        self.wait_by_dom_size_with(&self.defaults)
    }

    /// Wait for the page source length to settle.
    pub fn wait_by_dom_size_with(&self, config: &PollConfig) -> PageLoadResult<WaitOutcome> {
        StabilityPoller::with_clock(*config, &self.clock)?
            .with_description("page source size to settle")
            .run(|| self.driver.page_size())
    }

    /// Wait for the chosen elements' content to settle, using default timings.
    pub fn wait_by_improved_dom_size(&self, elements: &[By]) -> PageLoadResult<WaitOutcome> {
        self.wait_by_improved_dom_size_with(elements, &self.defaults)
    }

    /// Wait for the summed inner HTML length of `elements` to settle.
    ///
    /// Elements missing from the page count as size 0. An empty `elements`
    /// slice succeeds immediately.
    pub fn wait_by_improved_dom_size_with(
        &self,
        elements: &[By],
        config: &PollConfig,
    ) -> PageLoadResult<WaitOutcome> {
        StabilityPoller::with_clock(*config, &self.clock)?
            .with_description(format!("{} element(s) to settle", elements.len()))
            .run_sum(elements, |by| self.driver.size_of(by))
    }
}
