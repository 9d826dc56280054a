//! Backup storage URL signing port.

use std::time::Duration;

use async_trait::async_trait;

use crate::domain::errors::SignError;

/// Port for issuing time-limited read URLs on backup storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UrlSignerPort: Send + Sync {
    /// Returns a pre-signed GET URL for `key`, valid for `expires_in`.
    async fn presign_get(&self, key: &str, expires_in: Duration) -> Result<String, SignError>;
}
