//! Result and error types for page-load waits.

use thiserror::Error;

/// Result type for page-load operations
pub type PageLoadResult<T> = Result<T, PageLoadError>;

/// Errors that can occur while waiting for a page to settle
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PageLoadError {
    /// Construction-time misconfiguration; never retried
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Error message
        message: String,
    },

    /// The page did not settle within the time budget
    #[error("Page was not loaded in the specified time {ms}ms")]
    Timeout {
        /// Budget that was exceeded, in milliseconds
        ms: u64,
    },
}

impl PageLoadError {
    /// Create an invalid configuration error
    #[must_use]
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create a timeout error for the given budget
    #[must_use]
    pub const fn timeout(ms: u64) -> Self {
        Self::Timeout { ms }
    }

    /// Check if this is a timeout
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// Budget carried by a timeout, if this is one
    #[must_use]
    pub const fn timeout_ms(&self) -> Option<u64> {
        match self {
            Self::Timeout { ms } => Some(*ms),
            Self::InvalidConfig { .. } => None,
        }
    }
}
