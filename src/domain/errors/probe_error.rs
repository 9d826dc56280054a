//! Primary provider health probe errors.

use thiserror::Error;

/// Health probe failure variants.
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum ProbeError {
    #[error("health probe timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("failed to connect to primary provider: {message}")]
    Connect { message: String },

    #[error("primary provider returned HTTP {status}")]
    BadStatus { status: u16 },

    #[error("health probe failed: {message}")]
    Other { message: String },
}

impl ProbeError {
    /// Creates connect error.
    #[must_use]
    pub fn connect(message: impl Into<String>) -> Self {
        Self::Connect {
            message: message.into(),
        }
    }

    /// Creates generic probe error.
    #[must_use]
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    /// Returns whether the probe hit its deadline.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}
