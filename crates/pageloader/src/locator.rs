//! Element identifiers handed to the driver.
//!
//! A [`By`] is opaque to this crate: it is never parsed or matched here, only
//! passed through to [`PageDriver::find_element`](crate::driver::PageDriver::find_element).

use serde::{Deserialize, Serialize};
use std::fmt;

/// How to locate an element on the page
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum By {
    /// Element `id` attribute
    Id(String),
    /// CSS selector (e.g., "div.spinner")
    Css(String),
    /// XPath expression
    #[serde(rename = "xpath")]
    XPath(String),
    /// Element `name` attribute
    Name(String),
    /// Single class name
    ClassName(String),
    /// Tag name (e.g., "progress")
    TagName(String),
}

impl By {
    /// Locate by `id`
    #[must_use]
    pub fn id(id: impl Into<String>) -> Self {
        Self::Id(id.into())
    }

    /// Locate by CSS selector
    #[must_use]
    pub fn css(selector: impl Into<String>) -> Self {
        Self::Css(selector.into())
    }

    /// Locate by XPath
    #[must_use]
    pub fn xpath(expression: impl Into<String>) -> Self {
        Self::XPath(expression.into())
    }

    /// Locate by `name`
    #[must_use]
    pub fn name(name: impl Into<String>) -> Self {
        Self::Name(name.into())
    }

    /// Locate by class name
    #[must_use]
    pub fn class_name(class: impl Into<String>) -> Self {
        Self::ClassName(class.into())
    }

    /// Locate by tag name
    #[must_use]
    pub fn tag_name(tag: impl Into<String>) -> Self {
        Self::TagName(tag.into())
    }

    /// Strategy name as used by WebDriver
    #[must_use]
    pub const fn strategy(&self) -> &'static str {
        match self {
            Self::Id(_) => "id",
            Self::Css(_) => "css selector",
            Self::XPath(_) => "xpath",
            Self::Name(_) => "name",
            Self::ClassName(_) => "class name",
            Self::TagName(_) => "tag name",
        }
    }

    /// The raw selector value
    #[must_use]
    pub fn value(&self) -> &str {
        match self {
            Self::Id(v)
            | Self::Css(v)
            | Self::XPath(v)
            | Self::Name(v)
            | Self::ClassName(v)
            | Self::TagName(v) => v,
        }
    }
}

impl fmt::Display for By {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "By.{}: {}", self.strategy(), self.value())
    }
}
