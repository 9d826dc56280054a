//! Domain entity definitions.

mod availability;
mod resolved_url;
mod transform;

pub use availability::{AvailabilityState, ProviderStatus};
pub use resolved_url::{ResolvedUrl, ResponsiveImage, UrlSource};
pub use transform::{
    AspectRatio, CropMode, FocusPoint, ImageFormat, TRANSFORM_QUERY_KEY, TransformBuilder,
    TransformOptions,
};
