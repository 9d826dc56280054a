//! Secret configuration values.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use zeroize::Zeroizing;

/// Credential string wiped on drop and masked in logs.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct SecretString {
    value: Zeroizing<String>,
}

impl SecretString {
    /// Wraps a secret value.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: Zeroizing::new(value.into()),
        }
    }

    /// Returns the secret. Callers must not log the result.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.value
    }

    /// Returns whether the secret is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Returns masked value for display.
    #[must_use]
    pub fn masked(&self) -> String {
        let len = self.value.chars().count();
        if len <= 8 {
            return "*".repeat(len);
        }

        let visible_prefix: String = self.value.chars().take(4).collect();
        format!("{visible_prefix}...")
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SecretString").field(&self.masked()).finish()
    }
}

impl From<String> for SecretString {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl Serialize for SecretString {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.value)
    }
}

impl<'de> Deserialize<'de> for SecretString {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "K004abcdefghijklmnopqrstuvwxyz";

    #[test]
    fn test_masked_multibyte_prefix() {
        let secret = SecretString::new("ñandú-secret-key");
        assert_eq!(secret.masked(), "ñand...");
        assert_eq!(SecretString::new("ééé").masked(), "***");
    }

    #[test]
    fn test_debug_does_not_leak_secret() {
        let secret = SecretString::new(SECRET);
        let debug_output = format!("{secret:?}");

        assert!(!debug_output.contains(SECRET));
        assert!(debug_output.contains("K004..."));
    }

    #[test]
    fn test_short_secret_fully_masked() {
        assert_eq!(SecretString::new("abc").masked(), "***");
    }
}
