//! pageloader: wait for dynamic web pages to finish loading
//!
//! Browser tests that act as soon as `document.readyState` flips to
//! `complete` race against scripts that keep filling the page afterwards.
//! This crate polls the page through a [`PageDriver`] until the dynamic
//! content has settled.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    PAGELOADER Architecture                      │
//! ├─────────────────────────────────────────────────────────────────┤
//! │   ┌────────────┐    ┌──────────────────┐    ┌────────────┐      │
//! │   │ PageLoader │───►│ StabilityPoller  │───►│ Extremum   │      │
//! │   │            │    │ QuiescencePoller │    │ Window     │      │
//! │   └─────┬──────┘    └────────┬─────────┘    └────────────┘      │
//! │         │                    │ retry_until + Clock              │
//! │         ▼                    ▼                                  │
//! │   ┌────────────────────────────────┐                            │
//! │   │ PageDriver (WebDriver, CDP...) │                            │
//! │   └────────────────────────────────┘                            │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use pageloader::prelude::*;
//!
//! let clock = FakeClock::new();
//! // content length grows until 1s, then stays put
//! let outcome = StabilityPoller::with_clock(PollConfig::default(), &clock)?
//!     .run(|| clock.now_ms().min(1_000))?;
//! assert_eq!(outcome.elapsed.as_millis(), 1_400);
//! # Ok::<(), PageLoadError>(())
//! ```

#![warn(missing_docs)]

mod clock;
mod config;
mod driver;
mod loader;
mod locator;
mod poll;
mod result;
mod window;

pub use clock::{Clock, FakeClock, SystemClock};
pub use config::{
    PollConfig, MAX_THRESHOLD_TIME_MS, TIME_BEFORE_NEXT_CHECK_MS, UNCHANGED_WAITING_TIME_MS,
};
pub use driver::{ElementStatus, PageDriver};
pub use loader::PageLoader;
pub use locator::By;
pub use poll::{
    wait_quiescent, wait_stable, QuiescencePoller, StabilityPoller, WaitOutcome, DEADLINE_GRACE,
};
pub use result::{PageLoadError, PageLoadResult};
pub use window::ExtremumWindow;

/// Prelude for convenient imports
pub mod prelude {
    pub use super::clock::*;
    pub use super::config::*;
    pub use super::driver::*;
    pub use super::loader::*;
    pub use super::locator::*;
    pub use super::poll::{
        wait_quiescent, wait_stable, QuiescencePoller, StabilityPoller, WaitOutcome,
        DEADLINE_GRACE,
    };
    pub use super::result::*;
    pub use super::window::*;
}
