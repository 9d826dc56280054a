//! imgfailover - image URL resolution with CDN failover.
//!
//! Image URLs are served from a transform-capable primary CDN while it is
//! reachable, and from pre-signed backup storage URLs while it is not.
//! Availability is cached and re-probed at most once per polling interval.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

/// Application layer containing the resolution services.
pub mod application;
/// Domain layer containing entities, errors, and port definitions.
pub mod domain;
/// Infrastructure layer containing adapters for external services.
pub mod infrastructure;

/// Current version of the application.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name.
pub const NAME: &str = "imgfailover";
