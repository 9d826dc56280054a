//! Primary endpoint configuration errors.

use thiserror::Error;

/// Rejected primary provider base URLs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[allow(missing_docs)]
pub enum EndpointError {
    #[error("invalid base URL {url:?}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("base URL {url:?} must use http or https")]
    UnsupportedScheme { url: String },
}

impl EndpointError {
    /// Creates invalid base URL error.
    #[must_use]
    pub fn invalid(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidBaseUrl {
            url: url.into(),
            reason: reason.into(),
        }
    }
}
