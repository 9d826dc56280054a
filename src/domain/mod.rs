//! Domain layer with core entities, errors, and port definitions.

/// Entity definitions.
pub mod entities;
/// Error types.
pub mod errors;
/// Port definitions.
pub mod ports;

pub use entities::{ResolvedUrl, TransformOptions};
pub use errors::{EndpointError, ProbeError, SignError, TransformError};
pub use ports::{ClockPort, HealthProbePort, UrlSignerPort};
