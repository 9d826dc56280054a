//! Application configuration.

pub mod app_config;
pub mod args;
pub mod secret;
pub mod storage;

pub use app_config::{AppConfig, BackupConfig, LogLevel, PlaceholderConfig, PrimaryConfig};
pub use args::{CliArgs, Command, TransformArgs};
pub use secret::SecretString;
pub use storage::{ConfigError, ConfigStore};
