//! Application services.

mod health_tracker;
mod image_url_resolver;
mod primary_endpoint;

pub use health_tracker::HealthTracker;
pub use image_url_resolver::{
    DEFAULT_PRESIGN_EXPIRY, ImageUrlResolver, PlaceholderSettings, ResolverSettings,
};
pub use primary_endpoint::{ImagePath, PrimaryEndpoint};
