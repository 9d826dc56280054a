//! Wiring of the resolver from configuration.

use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use super::cdn::HttpHealthProbe;
use super::clock::SystemClock;
use super::config::{AppConfig, ConfigError};
use super::storage::S3UrlSigner;
use crate::application::services::{HealthTracker, ImageUrlResolver, PrimaryEndpoint};
use crate::domain::errors::{ProbeError, SignError};

/// Failures while assembling the resolver.
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to create health probe: {0}")]
    Probe(#[from] ProbeError),

    #[error("failed to create backup signer: {0}")]
    Signer(#[from] SignError),
}

/// Builds a resolver backed by the HTTP probe and the S3 signer.
///
/// # Errors
/// Returns error if the configuration is invalid or an adapter cannot be
/// created.
pub fn build_resolver(config: &AppConfig) -> Result<ImageUrlResolver, BootstrapError> {
    config.validate()?;

    let endpoint = PrimaryEndpoint::parse(&config.primary.base_url).map_err(ConfigError::from)?;
    let probe = HttpHealthProbe::for_endpoint(
        &endpoint,
        &config.primary.health_check_path,
        config.primary.probe_timeout(),
    )?;
    let signer = S3UrlSigner::new(&config.backup)?;

    info!(
        primary = %endpoint.base_url(),
        health_url = %probe.url(),
        bucket = %config.backup.bucket,
        interval_ms = config.primary.check_interval_ms,
        "Image resolver configured"
    );

    let tracker = Arc::new(HealthTracker::new(
        Arc::new(probe),
        Arc::new(SystemClock),
        config.primary.check_interval(),
    ));

    Ok(ImageUrlResolver::new(
        tracker,
        Arc::new(signer),
        endpoint,
        config.resolver_settings(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::config::SecretString;

    fn config() -> AppConfig {
        let mut config = AppConfig::default();
        config.primary.base_url = "https://ik.imagekit.io/acme".to_string();
        config.backup.bucket = "acme-media".to_string();
        config.backup.access_key_id = "004accesskey".to_string();
        config.backup.secret_access_key = SecretString::new("K004secretsecretsecret");
        config
    }

    #[test]
    fn test_build_resolver() {
        assert!(build_resolver(&config()).is_ok());
    }

    #[test]
    fn test_build_resolver_requires_credentials() {
        let mut config = config();
        config.backup.access_key_id.clear();

        assert!(matches!(
            build_resolver(&config),
            Err(BootstrapError::Signer(_))
        ));
    }

    #[test]
    fn test_build_resolver_rejects_invalid_config() {
        let mut config = config();
        config.primary.base_url = "ik.imagekit.io".to_string();

        assert!(matches!(
            build_resolver(&config),
            Err(BootstrapError::Config(_))
        ));
    }
}
