//! Application layer with the image delivery services.

/// Service implementations.
pub mod services;

pub use services::{HealthTracker, ImageUrlResolver, PrimaryEndpoint, ResolverSettings};
