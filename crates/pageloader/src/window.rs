//! Sliding-window minimum and maximum.
//!
//! [`ExtremumWindow`] keeps the last `W` appended values and answers `min()` /
//! `max()` in O(1). It is a queue built from two stacks, where every stack
//! entry caches the extrema of everything beneath it:
//!
//! ```text
//!   append ──► incoming [ v5 v6 v7 ]   (top caches min/max of v5..v7)
//!              outgoing [ v4 v3 v2 ]   (top caches min/max of v2..v4) ──► evict
//! ```
//!
//! Evicting from an empty `outgoing` drains `incoming` onto it once, reversing
//! the order. Each value crosses over at most once, so appends are amortized
//! O(1).

use crate::result::{PageLoadError, PageLoadResult};
use std::cmp;

#[derive(Debug, Clone)]
struct Entry<T> {
    value: T,
    min: T,
    max: T,
}

/// Push `value` onto `stack`, caching the running extrema of the stack.
fn push<T: Ord + Clone>(stack: &mut Vec<Entry<T>>, value: T) {
    let entry = match stack.last() {
        Some(top) => Entry {
            min: cmp::min(&top.min, &value).clone(),
            max: cmp::max(&top.max, &value).clone(),
            value,
        },
        None => Entry {
            min: value.clone(),
            max: value.clone(),
            value,
        },
    };
    stack.push(entry);
}

/// Fixed-size sliding window over an ordered value type.
///
/// The window is created full: the seed values occupy all `W` slots and each
/// [`append`](Self::append) evicts the oldest value.
#[derive(Debug, Clone)]
pub struct ExtremumWindow<T> {
    incoming: Vec<Entry<T>>,
    outgoing: Vec<Entry<T>>,
    size: usize,
    transfers: usize,
}

impl<T: Ord + Clone> ExtremumWindow<T> {
    /// Create a window pre-loaded with `seed`; its length fixes the window size.
    ///
    /// # Errors
    ///
    /// Returns [`PageLoadError::InvalidConfig`] if `seed` is empty.
    pub fn new(seed: impl IntoIterator<Item = T>) -> PageLoadResult<Self> {
        let mut incoming = Vec::new();
        for value in seed {
            push(&mut incoming, value);
        }
        if incoming.is_empty() {
            return Err(PageLoadError::invalid_config(
                "extremum window needs at least one seed value",
            ));
        }

        Ok(Self {
            size: incoming.len(),
            incoming,
            outgoing: Vec::new(),
            transfers: 0,
        })
    }

    /// Record a new value, evicting the oldest one.
    pub fn append(&mut self, value: T) {
        self.evict_oldest();
        push(&mut self.incoming, value);
    }

    fn evict_oldest(&mut self) {
        if self.outgoing.is_empty() {
            while let Some(entry) = self.incoming.pop() {
                push(&mut self.outgoing, entry.value);
                self.transfers += 1;
            }
        }
        self.outgoing.pop();
    }

    /// Minimum over the current window
    #[must_use]
    pub fn min(&self) -> &T {
        match (self.incoming.last(), self.outgoing.last()) {
            (Some(a), Some(b)) => cmp::min(&a.min, &b.min),
            (Some(top), None) | (None, Some(top)) => &top.min,
            (None, None) => Self::empty(),
        }
    }

    /// Maximum over the current window
    #[must_use]
    pub fn max(&self) -> &T {
        match (self.incoming.last(), self.outgoing.last()) {
            (Some(a), Some(b)) => cmp::max(&a.max, &b.max),
            (Some(top), None) | (None, Some(top)) => &top.max,
            (None, None) => Self::empty(),
        }
    }

    #[allow(clippy::panic)]
    #[cold]
    fn empty() -> ! {
        panic!("extremum window is never empty after construction")
    }

    /// True when every value in the window compares equal
    #[must_use]
    pub fn is_flat(&self) -> bool {
        self.min() == self.max()
    }

    /// Window size `W`
    #[must_use]
    pub const fn len(&self) -> usize {
        self.size
    }

    /// Always false; a window holds at least one value
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Number of values moved from the incoming to the outgoing stack so far
    #[must_use]
    pub const fn transfers(&self) -> usize {
        self.transfers
    }
}
