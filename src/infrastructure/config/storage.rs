use super::app_config::AppConfig;
use crate::domain::errors::EndpointError;
use directories::ProjectDirs;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

const APP_QUALIFIER: &str = "com";
const APP_ORGANIZATION: &str = "linuxmobile";
const APP_NAME: &str = "imgfailover";
const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to determine config directory")]
    ConfigDirNotFound,
    #[error("config file not found at {0}")]
    NotFound(PathBuf),
    #[error("config file already exists at {0}")]
    AlreadyExists(PathBuf),
    #[error("invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
    #[error(transparent)]
    Endpoint(#[from] EndpointError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("toml serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),
    #[error("toml deserialization error: {0}")]
    TomlDe(#[from] toml::de::Error),
}

impl ConfigError {
    /// Creates invalid field error.
    #[must_use]
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

pub struct ConfigStore {
    config_dir: PathBuf,
}

impl ConfigStore {
    /// Create a new `ConfigStore` rooted at the platform config directory.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the configuration directory cannot be determined.
    pub fn new() -> Result<Self, ConfigError> {
        let config_dir = ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
            .map(|dirs| dirs.config_dir().to_path_buf())
            .ok_or(ConfigError::ConfigDirNotFound)?;

        Ok(Self { config_dir })
    }

    /// Creates a new `ConfigStore` with a specific directory (useful for testing).
    #[must_use]
    pub fn with_dir(path: PathBuf) -> Self {
        Self { config_dir: path }
    }

    /// Returns the configuration directory path.
    #[must_use]
    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    fn config_path(&self, path_override: Option<&Path>) -> PathBuf {
        path_override.map_or_else(
            || self.config_dir.join(CONFIG_FILE_NAME),
            std::path::Path::to_path_buf,
        )
    }

    /// Loads the application configuration.
    ///
    /// A missing file yields defaults, which still have to pass
    /// [`AppConfig::validate`] once overrides are merged.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read or parsed.
    pub fn load_config(&self, path_override: Option<&Path>) -> Result<AppConfig, ConfigError> {
        let config_path = self.config_path(path_override);

        if !config_path.exists() {
            if path_override.is_some() {
                return Err(ConfigError::NotFound(config_path));
            }
            info!(path = %config_path.display(), "Config file not found, using defaults");
            return Ok(AppConfig::default());
        }

        let content = fs::read_to_string(&config_path)?;
        let mut config = toml::from_str::<AppConfig>(&content)?;
        config.config = Some(config_path);
        Ok(config)
    }

    /// Writes a default configuration file for the operator to fill in.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file exists and `force` is false, or
    /// if it cannot be written.
    pub fn init_config(
        &self,
        path_override: Option<&Path>,
        force: bool,
    ) -> Result<PathBuf, ConfigError> {
        let config_path = self.config_path(path_override);

        if config_path.exists() && !force {
            return Err(ConfigError::AlreadyExists(config_path));
        }

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }
        Self::save_to_file(&config_path, &AppConfig::default())?;
        info!(path = %config_path.display(), "Wrote default configuration");

        Ok(config_path)
    }

    fn save_to_file<T: serde::Serialize>(path: &Path, data: &T) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(data)?;

        let parent = path
            .parent()
            .ok_or_else(|| std::io::Error::other("Invalid path"))?;
        let mut temp_file = tempfile::NamedTempFile::new_in(parent)?;
        temp_file.write_all(content.as_bytes())?;
        temp_file.persist(path).map_err(|e| e.error)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_load_config_defaults_if_missing() {
        let dir = tempdir().unwrap();
        let store = ConfigStore::with_dir(dir.path().to_path_buf());

        let config = store.load_config(None).unwrap();
        assert_eq!(config.primary.check_interval_ms, 60_000);
        assert!(!dir.path().join(CONFIG_FILE_NAME).exists());
    }

    #[test]
    fn test_load_config_missing_override_is_error() {
        let dir = tempdir().unwrap();
        let store = ConfigStore::with_dir(dir.path().to_path_buf());
        let missing = dir.path().join("nope.toml");

        assert!(matches!(
            store.load_config(Some(&missing)),
            Err(ConfigError::NotFound(_))
        ));
    }

    #[test]
    fn test_load_config_rejects_malformed_file() {
        let dir = tempdir().unwrap();
        let store = ConfigStore::with_dir(dir.path().to_path_buf());
        let config_file = dir.path().join(CONFIG_FILE_NAME);

        fs::write(&config_file, "invalid_toml = [").unwrap();

        assert!(matches!(
            store.load_config(None),
            Err(ConfigError::TomlDe(_))
        ));
        let content = fs::read_to_string(&config_file).unwrap();
        assert_eq!(content, "invalid_toml = [");
    }

    #[test]
    fn test_init_then_load_round_trip() {
        let dir = tempdir().unwrap();
        let store = ConfigStore::with_dir(dir.path().join("imgfailover"));

        let path = store.init_config(None, false).unwrap();
        assert!(path.exists());

        let config = store.load_config(None).unwrap();
        assert_eq!(config.backup.presign_expiry_secs, 3_600);
        assert_eq!(config.config.as_deref(), Some(path.as_path()));
    }

    #[test]
    fn test_init_refuses_to_overwrite() {
        let dir = tempdir().unwrap();
        let store = ConfigStore::with_dir(dir.path().to_path_buf());
        let config_file = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&config_file, "log_level = \"warn\"").unwrap();

        assert!(matches!(
            store.init_config(None, false),
            Err(ConfigError::AlreadyExists(_))
        ));
        assert!(store.init_config(None, true).is_ok());
        assert_ne!(fs::read_to_string(&config_file).unwrap(), "log_level = \"warn\"");
    }
}
