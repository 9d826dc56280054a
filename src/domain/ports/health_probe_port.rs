//! Primary provider health probe port.

use async_trait::async_trait;

use crate::domain::errors::ProbeError;

/// Port for a single reachability check of the primary provider.
///
/// Implementations must bound their own runtime; callers never cancel.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HealthProbePort: Send + Sync {
    /// Returns `Ok` if the provider answered with a non-error status.
    async fn probe(&self) -> Result<(), ProbeError>;
}
