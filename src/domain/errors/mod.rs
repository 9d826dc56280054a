//! Domain error types.

mod endpoint_error;
mod probe_error;
mod sign_error;
mod transform_error;

pub use endpoint_error::EndpointError;
pub use probe_error::ProbeError;
pub use sign_error::SignError;
pub use transform_error::TransformError;
