//! PageDriver - the browser primitives the waits consume.
//!
//! ```text
//! ┌──────────────────────────┐      ┌───────────────────────────────┐
//! │  PageLoader / pollers    │ ───► │  PageDriver (this trait)      │
//! │  (timing, windows)       │      │  find_element / is_displayed  │
//! └──────────────────────────┘      │  element_size / page_size     │
//!                                   └───────────────┬───────────────┘
//!                                                   ▼
//!                                    WebDriver / CDP client of choice
//! ```
//!
//! Implementations wrap whatever browser client the test suite already uses.
//! Calls are synchronous and must not have side effects visible to the page.

use crate::locator::By;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Visibility of a tracked element at one point in time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementStatus {
    /// Not present on the page
    Absent,
    /// Present but not displayed
    Hidden,
    /// Present and displayed
    Displayed,
}

impl ElementStatus {
    /// Absent and hidden elements no longer block the page
    #[must_use]
    pub const fn is_settled(self) -> bool {
        !matches!(self, Self::Displayed)
    }

    /// Get the status name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Absent => "absent",
            Self::Hidden => "hidden",
            Self::Displayed => "displayed",
        }
    }
}

impl fmt::Display for ElementStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Synchronous access to a live page.
///
/// A lookup that finds nothing returns `None`; absence is a normal
/// observation, not an error.
pub trait PageDriver {
    /// Handle to a located element
    type Element;

    /// Find the first element matching `by`
    fn find_element(&self, by: &By) -> Option<Self::Element>;

    /// Whether the element is currently displayed
    fn is_displayed(&self, element: &Self::Element) -> bool;

    /// Length of the element's inner HTML
    fn element_size(&self, element: &Self::Element) -> u64;

    /// Length of the serialized page source
    fn page_size(&self) -> u64;

    /// Classify the element matching `by`
    fn element_status(&self, by: &By) -> ElementStatus {
        match self.find_element(by) {
            None => ElementStatus::Absent,
            Some(element) if self.is_displayed(&element) => ElementStatus::Displayed,
            Some(_) => ElementStatus::Hidden,
        }
    }

    /// Inner HTML length of the element matching `by`, 0 when absent
    fn size_of(&self, by: &By) -> u64 {
        self.find_element(by)
            .map_or(0, |element| self.element_size(&element))
    }
}

impl<D: PageDriver + ?Sized> PageDriver for &D {
    type Element = D::Element;

    fn find_element(&self, by: &By) -> Option<Self::Element> {
        (**self).find_element(by)
    }

    fn is_displayed(&self, element: &Self::Element) -> bool {
        (**self).is_displayed(element)
    }

    fn element_size(&self, element: &Self::Element) -> u64 {
        (**self).element_size(element)
    }

    fn page_size(&self) -> u64 {
        (**self).page_size()
    }
}
