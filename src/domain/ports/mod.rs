mod clock_port;
mod health_probe_port;
mod url_signer_port;

pub use clock_port::ClockPort;
pub use health_probe_port::HealthProbePort;
pub use url_signer_port::UrlSignerPort;
