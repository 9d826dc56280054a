//! Transform option validation errors.

use thiserror::Error;

/// Rejected transform option values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[allow(missing_docs)]
pub enum TransformError {
    #[error("{field} must be greater than zero")]
    ZeroDimension { field: &'static str },

    #[error("quality must be between 1 and 100, got {value}")]
    QualityOutOfRange { value: u32 },

    #[error("invalid aspect ratio {value:?}: {reason}")]
    InvalidAspectRatio { value: String, reason: String },

    #[error("unknown {kind} {value:?}")]
    UnknownVariant { kind: &'static str, value: String },
}

impl TransformError {
    /// Creates aspect ratio error.
    #[must_use]
    pub fn aspect_ratio(value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidAspectRatio {
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Creates unknown variant error.
    #[must_use]
    pub fn unknown(kind: &'static str, value: impl Into<String>) -> Self {
        Self::UnknownVariant {
            kind,
            value: value.into(),
        }
    }
}
