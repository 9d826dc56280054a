//! Primary CDN adapters.

pub mod health_probe;

pub use health_probe::HttpHealthProbe;
