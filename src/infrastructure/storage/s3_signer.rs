//! Pre-signed URL issuance for S3-compatible backup storage.

use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::config::{BehaviorVersion, Credentials, Region};
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::presigning::PresigningConfig;
use tracing::debug;

use crate::domain::errors::SignError;
use crate::domain::ports::UrlSignerPort;
use crate::infrastructure::config::BackupConfig;

/// Maximum pre-signed URL lifetime (7 days for S3).
pub const MAX_PRESIGN_EXPIRY: Duration = Duration::from_secs(7 * 24 * 60 * 60);

const CREDENTIALS_PROVIDER: &str = "imgfailover-config";

/// Signs GET URLs with static credentials.
///
/// Signing is local computation; only `verify_objects` adds a round trip.
pub struct S3UrlSigner {
    client: Client,
    bucket: String,
    verify_objects: bool,
}

impl std::fmt::Debug for S3UrlSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("S3UrlSigner")
            .field("bucket", &self.bucket)
            .field("verify_objects", &self.verify_objects)
            .finish_non_exhaustive()
    }
}

impl S3UrlSigner {
    /// Creates signer from backup storage configuration.
    ///
    /// # Errors
    /// Returns error if the bucket or credentials are missing.
    pub fn new(config: &BackupConfig) -> Result<Self, SignError> {
        if config.bucket.trim().is_empty() {
            return Err(SignError::InvalidCredentials {
                message: "backup bucket is not configured".to_string(),
            });
        }
        if config.access_key_id.is_empty() || config.secret_access_key.is_empty() {
            return Err(SignError::InvalidCredentials {
                message: "backup access key id and secret are required".to_string(),
            });
        }

        let credentials = Credentials::new(
            config.access_key_id.clone(),
            config.secret_access_key.expose().to_string(),
            None,
            None,
            CREDENTIALS_PROVIDER,
        );

        let mut builder = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .credentials_provider(credentials)
            .force_path_style(config.force_path_style);
        if let Some(endpoint) = &config.endpoint {
            builder = builder.endpoint_url(endpoint.clone());
        }

        debug!(
            bucket = %config.bucket,
            region = %config.region,
            endpoint = ?config.endpoint,
            "Created backup storage signer"
        );

        Ok(Self {
            client: Client::from_conf(builder.build()),
            bucket: config.bucket.clone(),
            verify_objects: config.verify_objects,
        })
    }

    async fn ensure_exists(&self, key: &str) -> Result<(), SignError> {
        self.client
            .head_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map(|_| ())
            .map_err(|e| {
                match e.raw_response().map(|response| response.status().as_u16()) {
                    Some(404) => SignError::ObjectNotFound {
                        key: key.to_string(),
                    },
                    Some(401 | 403) => SignError::InvalidCredentials {
                        message: DisplayErrorContext(&e).to_string(),
                    },
                    _ => SignError::signing(format!(
                        "failed to check backup object: {}",
                        DisplayErrorContext(&e)
                    )),
                }
            })
    }
}

/// Validates presigned URL expiry duration.
///
/// # Errors
/// Returns error if the expiry is zero or above [`MAX_PRESIGN_EXPIRY`].
pub fn validate_expiry(expires_in: Duration) -> Result<(), SignError> {
    if expires_in > MAX_PRESIGN_EXPIRY {
        Err(SignError::invalid_expiry(format!(
            "{expires_in:?} exceeds maximum allowed {MAX_PRESIGN_EXPIRY:?}"
        )))
    } else if expires_in.is_zero() {
        Err(SignError::invalid_expiry("must be greater than zero"))
    } else {
        Ok(())
    }
}

#[async_trait]
impl UrlSignerPort for S3UrlSigner {
    async fn presign_get(&self, key: &str, expires_in: Duration) -> Result<String, SignError> {
        validate_expiry(expires_in)?;

        if self.verify_objects {
            self.ensure_exists(key).await?;
        }

        let presigning_config = PresigningConfig::expires_in(expires_in)
            .map_err(|e| SignError::invalid_expiry(e.to_string()))?;

        let presigned = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .presigned(presigning_config)
            .await
            .map_err(|e| {
                SignError::signing(format!(
                    "failed to generate presigned GET URL: {}",
                    DisplayErrorContext(&e)
                ))
            })?;

        Ok(presigned.uri().to_string())
    }
}
