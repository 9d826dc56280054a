//! Resolved image URLs.

use std::fmt;

use serde::Serialize;

/// Tier that produced a [`ResolvedUrl`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UrlSource {
    /// Transform-capable primary CDN.
    Primary,
    /// Pre-signed backup storage URL.
    Backup,
    /// Input returned unchanged.
    Original,
}

impl fmt::Display for UrlSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primary => write!(f, "primary"),
            Self::Backup => write!(f, "backup"),
            Self::Original => write!(f, "original"),
        }
    }
}

/// A deliverable image URL tagged with the tier that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedUrl {
    /// Primary provider URL, possibly carrying transform tokens.
    Primary(String),
    /// Time-limited backup URL serving the untransformed original.
    Backup(String),
    /// The caller's input, unchanged.
    Original(String),
}

impl ResolvedUrl {
    /// Returns the URL.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Primary(url) | Self::Backup(url) | Self::Original(url) => url,
        }
    }

    /// Consumes and returns the URL.
    #[must_use]
    pub fn into_string(self) -> String {
        match self {
            Self::Primary(url) | Self::Backup(url) | Self::Original(url) => url,
        }
    }

    /// Returns the producing tier.
    #[must_use]
    pub const fn source(&self) -> UrlSource {
        match self {
            Self::Primary(_) => UrlSource::Primary,
            Self::Backup(_) => UrlSource::Backup,
            Self::Original(_) => UrlSource::Original,
        }
    }
}

impl fmt::Display for ResolvedUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<ResolvedUrl> for String {
    fn from(value: ResolvedUrl) -> Self {
        value.into_string()
    }
}

/// Attribute bundle for a responsive `<img>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResponsiveImage {
    /// Fallback `src`, at the largest requested width.
    pub src: String,
    /// `srcset` value.
    pub srcset: String,
    /// `sizes` value, passed through from the caller.
    pub sizes: Option<String>,
    /// Blurred placeholder URL.
    pub lqip: String,
}
