//! Time source for polling loops.
//!
//! Polls read elapsed time and sleep through a [`Clock`], so the same loop
//! runs against the wall clock in browser tests and against a [`FakeClock`]
//! in deterministic unit tests and trace replays.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Monotonic time source with a blocking sleep
pub trait Clock {
    /// Time elapsed since an arbitrary, fixed origin
    fn now(&self) -> Duration;

    /// Block the current thread for `duration`
    fn sleep(&self, duration: Duration);
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Duration {
        (**self).now()
    }

    fn sleep(&self, duration: Duration) {
        (**self).sleep(duration);
    }
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn now(&self) -> Duration {
        (**self).now()
    }

    fn sleep(&self, duration: Duration) {
        (**self).sleep(duration);
    }
}

// =============================================================================
// SYSTEM CLOCK
// =============================================================================

/// Wall clock backed by [`Instant`] and [`std::thread::sleep`]
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    /// Create a clock whose origin is now
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

// =============================================================================
// FAKE CLOCK
// =============================================================================

/// Virtual clock: time only moves when someone sleeps or advances it.
///
/// Uses atomics so a measurement closure can read the time through a shared
/// reference while the poller holds another.
#[derive(Debug, Default)]
pub struct FakeClock {
    current_ns: AtomicU64,
    sleeps: AtomicU64,
}

impl FakeClock {
    /// Create a clock at time zero
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a clock starting at `ms`
    #[must_use]
    pub fn at_ms(ms: u64) -> Self {
        let clock = Self::new();
        clock.advance(Duration::from_millis(ms));
        clock
    }

    /// Move time forward without counting a sleep; saturates at `u64::MAX` ns
    pub fn advance(&self, duration: Duration) {
        let ns = u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX);
        let _ = self
            .current_ns
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |now| {
                Some(now.saturating_add(ns))
            });
    }

    /// Current virtual time in whole milliseconds
    #[must_use]
    pub fn now_ms(&self) -> u64 {
        self.current_ns.load(Ordering::SeqCst) / 1_000_000
    }

    /// Number of sleeps performed against this clock
    #[must_use]
    pub fn sleeps(&self) -> u64 {
        self.sleeps.load(Ordering::SeqCst)
    }
}

impl Clone for FakeClock {
    fn clone(&self) -> Self {
        Self {
            current_ns: AtomicU64::new(self.current_ns.load(Ordering::SeqCst)),
            sleeps: AtomicU64::new(self.sleeps.load(Ordering::SeqCst)),
        }
    }
}

impl Clock for FakeClock {
    fn now(&self) -> Duration {
        Duration::from_nanos(self.current_ns.load(Ordering::SeqCst))
    }

    fn sleep(&self, duration: Duration) {
        self.sleeps.fetch_add(1, Ordering::SeqCst);
        self.advance(duration);
    }
}
