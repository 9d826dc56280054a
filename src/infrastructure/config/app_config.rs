//! Application configuration.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::args::CliArgs;
use super::secret::SecretString;
use super::storage::ConfigError;
use crate::application::services::{PlaceholderSettings, PrimaryEndpoint, ResolverSettings};

/// Longest lifetime S3-compatible stores accept for a pre-signed URL.
pub const MAX_PRESIGN_EXPIRY_SECS: u64 = 7 * 24 * 60 * 60;

/// Log level configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace level.
    Trace,
    /// Debug level.
    Debug,
    /// Info level.
    #[default]
    Info,
    /// Warning level.
    Warn,
    /// Error level.
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Trace => write!(f, "trace"),
            Self::Debug => write!(f, "debug"),
            Self::Info => write!(f, "info"),
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Configuration file path.
    #[serde(skip)]
    pub config: Option<PathBuf>,

    /// Log file path. Logs go to stderr when unset.
    #[serde(skip)]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[serde(default)]
    pub log_level: LogLevel,

    /// Primary CDN settings.
    #[serde(default)]
    pub primary: PrimaryConfig,

    /// Backup object storage settings.
    #[serde(default)]
    pub backup: BackupConfig,

    /// Placeholder image settings.
    #[serde(default)]
    pub placeholder: PlaceholderConfig,
}

/// Primary CDN configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrimaryConfig {
    /// Provider base URL, including the URL endpoint id.
    #[serde(default)]
    pub base_url: String,

    /// Path probed by the health check, relative to `base_url`.
    #[serde(default = "default_health_check_path")]
    pub health_check_path: String,

    /// Minimum time between health probes.
    #[serde(default = "default_check_interval_ms")]
    pub check_interval_ms: u64,

    /// Health probe deadline.
    #[serde(default = "default_probe_timeout_ms")]
    pub probe_timeout_ms: u64,
}

impl PrimaryConfig {
    /// Returns the polling interval.
    #[must_use]
    pub const fn check_interval(&self) -> Duration {
        Duration::from_millis(self.check_interval_ms)
    }

    /// Returns the probe timeout.
    #[must_use]
    pub const fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }
}

impl Default for PrimaryConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            health_check_path: default_health_check_path(),
            check_interval_ms: default_check_interval_ms(),
            probe_timeout_ms: default_probe_timeout_ms(),
        }
    }
}

/// Backup S3-compatible storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupConfig {
    /// Custom endpoint for S3-compatible stores (B2, R2, MinIO).
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Signing region.
    #[serde(default = "default_region")]
    pub region: String,

    /// Bucket holding the original images.
    #[serde(default)]
    pub bucket: String,

    /// Access key id.
    #[serde(default)]
    pub access_key_id: String,

    /// Secret access key.
    #[serde(default)]
    pub secret_access_key: SecretString,

    /// Lifetime of pre-signed URLs in seconds.
    #[serde(default = "default_presign_expiry_secs")]
    pub presign_expiry_secs: u64,

    /// Prefix prepended to every object key.
    #[serde(default)]
    pub key_prefix: Option<String>,

    /// Address buckets by path instead of by subdomain.
    #[serde(default = "default_true")]
    pub force_path_style: bool,

    /// Check the object exists before signing.
    #[serde(default)]
    pub verify_objects: bool,
}

impl BackupConfig {
    /// Returns the pre-signed URL lifetime.
    #[must_use]
    pub const fn presign_expiry(&self) -> Duration {
        Duration::from_secs(self.presign_expiry_secs)
    }
}

impl Default for BackupConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            region: default_region(),
            bucket: String::new(),
            access_key_id: String::new(),
            secret_access_key: SecretString::default(),
            presign_expiry_secs: default_presign_expiry_secs(),
            key_prefix: None,
            force_path_style: true,
            verify_objects: false,
        }
    }
}

/// Placeholder image configuration.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PlaceholderConfig {
    /// Placeholder width in pixels.
    #[serde(default = "default_placeholder_width")]
    pub width: u32,

    /// Placeholder quality.
    #[serde(default = "default_placeholder_quality")]
    pub quality: u32,

    /// Placeholder blur radius.
    #[serde(default = "default_placeholder_blur")]
    pub blur: u32,
}

impl Default for PlaceholderConfig {
    fn default() -> Self {
        Self {
            width: default_placeholder_width(),
            quality: default_placeholder_quality(),
            blur: default_placeholder_blur(),
        }
    }
}

fn default_health_check_path() -> String {
    "/".to_string()
}

fn default_check_interval_ms() -> u64 {
    60_000
}

fn default_probe_timeout_ms() -> u64 {
    1_500
}

fn default_region() -> String {
    "us-east-1".to_string()
}

fn default_presign_expiry_secs() -> u64 {
    3_600
}

fn default_placeholder_width() -> u32 {
    20
}

fn default_placeholder_quality() -> u32 {
    20
}

fn default_placeholder_blur() -> u32 {
    10
}

fn default_true() -> bool {
    true
}

impl AppConfig {
    /// Merges CLI arguments and environment overrides into the configuration.
    pub fn merge_with_args(&mut self, args: &CliArgs) {
        if let Some(config_path) = &args.config {
            self.config = Some(config_path.clone());
        }
        if let Some(log_path) = &args.log_path {
            self.log_path = Some(log_path.clone());
        }
        if let Some(log_level) = args.log_level {
            self.log_level = log_level;
        }
        if let Some(base_url) = &args.primary_base_url {
            self.primary.base_url.clone_from(base_url);
        }
        if let Some(endpoint) = &args.backup_endpoint {
            self.backup.endpoint = Some(endpoint.clone());
        }
        if let Some(bucket) = &args.backup_bucket {
            self.backup.bucket.clone_from(bucket);
        }
        if let Some(access_key_id) = &args.backup_access_key_id {
            self.backup.access_key_id.clone_from(access_key_id);
        }
        if let Some(secret) = &args.backup_secret_access_key {
            self.backup.secret_access_key = SecretString::new(secret.clone());
        }
    }

    /// Checks cross-field constraints the deserializer cannot express.
    ///
    /// # Errors
    /// Returns the first invalid field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        PrimaryEndpoint::parse(&self.primary.base_url)?;

        if self.primary.check_interval_ms == 0 {
            return Err(ConfigError::invalid(
                "primary.check_interval_ms",
                "must be greater than zero",
            ));
        }
        if self.primary.probe_timeout_ms == 0 {
            return Err(ConfigError::invalid(
                "primary.probe_timeout_ms",
                "must be greater than zero",
            ));
        }
        if self.backup.bucket.trim().is_empty() {
            return Err(ConfigError::invalid("backup.bucket", "must not be empty"));
        }
        if self.backup.presign_expiry_secs == 0
            || self.backup.presign_expiry_secs > MAX_PRESIGN_EXPIRY_SECS
        {
            return Err(ConfigError::invalid(
                "backup.presign_expiry_secs",
                format!("must be between 1 and {MAX_PRESIGN_EXPIRY_SECS}"),
            ));
        }

        Ok(())
    }

    /// Returns resolver settings derived from this configuration.
    #[must_use]
    pub fn resolver_settings(&self) -> ResolverSettings {
        ResolverSettings {
            presign_expiry: self.backup.presign_expiry(),
            key_prefix: self.backup.key_prefix.clone(),
            placeholder: PlaceholderSettings {
                width: self.placeholder.width,
                quality: self.placeholder.quality,
                blur: self.placeholder.blur,
            },
        }
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn valid_config() -> AppConfig {
        toml::from_str(
            r#"
            [primary]
            base_url = "https://ik.imagekit.io/acme"

            [backup]
            bucket = "acme-media"
            "#,
        )
        .expect("valid config")
    }

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
            log_level = "debug"

            [primary]
            base_url = "https://ik.imagekit.io/acme"
            health_check_path = "/health-check.png"
            check_interval_ms = 30000
            probe_timeout_ms = 800

            [backup]
            endpoint = "https://s3.us-west-004.backblazeb2.com"
            region = "us-west-004"
            bucket = "acme-media"
            access_key_id = "004abc"
            secret_access_key = "K004secretsecret"
            presign_expiry_secs = 600
            key_prefix = "media"

            [placeholder]
            width = 32
        "#;

        let config: AppConfig = toml::from_str(toml_content).expect("Failed to parse config");

        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.primary.check_interval(), Duration::from_secs(30));
        assert_eq!(config.primary.probe_timeout(), Duration::from_millis(800));
        assert_eq!(config.backup.region, "us-west-004");
        assert_eq!(config.backup.secret_access_key.expose(), "K004secretsecret");
        assert_eq!(config.backup.presign_expiry(), Duration::from_secs(600));
        assert!(config.backup.force_path_style);
        assert_eq!(config.placeholder.width, 32);
        assert_eq!(config.placeholder.blur, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();

        assert_eq!(config.primary.check_interval_ms, 60_000);
        assert_eq!(config.primary.health_check_path, "/");
        assert_eq!(config.backup.presign_expiry_secs, 3_600);
        assert_eq!(config.resolver_settings(), ResolverSettings::default());
    }

    #[test]
    fn test_default_config_fails_validation() {
        assert!(matches!(
            AppConfig::default().validate(),
            Err(ConfigError::Endpoint(_))
        ));
    }

    #[test]
    fn test_validation_rejects_bad_fields() {
        let mut config = valid_config();
        config.primary.check_interval_ms = 0;
        assert!(config.validate().is_err());

        let mut config = valid_config();
        config.backup.bucket = "  ".to_string();
        assert!(config.validate().is_err());

        let mut config = valid_config();
        config.backup.presign_expiry_secs = MAX_PRESIGN_EXPIRY_SECS + 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_merge_with_args() {
        let mut config = valid_config();
        let args = CliArgs::parse_from([
            "imgfailover",
            "--log-level",
            "warn",
            "--backup-bucket",
            "other-bucket",
            "--backup-secret-access-key",
            "from-cli",
            "status",
        ]);

        config.merge_with_args(&args);

        assert_eq!(config.log_level, LogLevel::Warn);
        assert_eq!(config.backup.bucket, "other-bucket");
        assert_eq!(config.backup.secret_access_key.expose(), "from-cli");
        assert_eq!(config.primary.base_url, "https://ik.imagekit.io/acme");
    }
}
