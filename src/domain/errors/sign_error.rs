//! Backup provider URL signing errors.

use thiserror::Error;

/// Pre-signed URL generation failure variants.
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum SignError {
    #[error("no object key can be derived from {path:?}")]
    NoObjectKey { path: String },

    #[error("object {key:?} not found in backup storage")]
    ObjectNotFound { key: String },

    #[error("invalid backup storage credentials: {message}")]
    InvalidCredentials { message: String },

    #[error("invalid presign expiry: {message}")]
    InvalidExpiry { message: String },

    #[error("failed to sign backup URL: {message}")]
    Signing { message: String },
}

impl SignError {
    /// Creates missing key error.
    #[must_use]
    pub fn no_object_key(path: impl Into<String>) -> Self {
        Self::NoObjectKey { path: path.into() }
    }

    /// Creates signing error.
    #[must_use]
    pub fn signing(message: impl Into<String>) -> Self {
        Self::Signing {
            message: message.into(),
        }
    }

    /// Creates expiry error.
    #[must_use]
    pub fn invalid_expiry(message: impl Into<String>) -> Self {
        Self::InvalidExpiry {
            message: message.into(),
        }
    }

    /// Returns whether the object itself is missing.
    #[must_use]
    pub const fn is_missing_object(&self) -> bool {
        matches!(self, Self::ObjectNotFound { .. })
    }
}
