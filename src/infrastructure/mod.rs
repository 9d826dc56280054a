//! Infrastructure layer with external service adapters.

/// Resolver assembly from configuration.
pub mod bootstrap;
/// Primary CDN adapters.
pub mod cdn;
/// Wall clock adapter.
pub mod clock;
/// Application configuration.
pub mod config;
/// Backup storage adapters.
pub mod storage;

pub use bootstrap::{BootstrapError, build_resolver};
pub use cdn::HttpHealthProbe;
pub use clock::SystemClock;
pub use config::{AppConfig, CliArgs, Command, ConfigError, ConfigStore, LogLevel};
pub use storage::S3UrlSigner;
