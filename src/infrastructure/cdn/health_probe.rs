//! HTTP health probe for the primary CDN.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::debug;

use crate::application::services::PrimaryEndpoint;
use crate::domain::errors::ProbeError;
use crate::domain::ports::HealthProbePort;

const USER_AGENT: &str = concat!("imgfailover/", env!("CARGO_PKG_VERSION"));

/// Probes the primary CDN with a `HEAD` request under a short deadline.
pub struct HttpHealthProbe {
    client: Client,
    url: String,
    timeout: Duration,
}

impl std::fmt::Debug for HttpHealthProbe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpHealthProbe")
            .field("url", &self.url)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl HttpHealthProbe {
    /// Creates probe targeting `url`.
    ///
    /// # Errors
    /// Returns error if HTTP client creation fails.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, ProbeError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()
            .map_err(|e| ProbeError::other(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            url: url.into(),
            timeout,
        })
    }

    /// Creates probe for `health_check_path` under the endpoint's base URL.
    ///
    /// # Errors
    /// Returns error if HTTP client creation fails.
    pub fn for_endpoint(
        endpoint: &PrimaryEndpoint,
        health_check_path: &str,
        timeout: Duration,
    ) -> Result<Self, ProbeError> {
        let path = health_check_path.trim_start_matches('/');
        Self::new(format!("{}/{path}", endpoint.base_url()), timeout)
    }

    /// Returns the probed URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    fn timeout_ms(&self) -> u64 {
        u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX)
    }
}

#[async_trait]
impl HealthProbePort for HttpHealthProbe {
    async fn probe(&self) -> Result<(), ProbeError> {
        debug!(url = %self.url, "Probing primary image provider");

        let response = self.client.head(&self.url).send().await.map_err(|e| {
            if e.is_timeout() {
                ProbeError::Timeout {
                    timeout_ms: self.timeout_ms(),
                }
            } else if e.is_connect() {
                ProbeError::connect(e.to_string())
            } else {
                ProbeError::other(e.to_string())
            }
        })?;

        let status: StatusCode = response.status();
        if status.is_client_error() || status.is_server_error() {
            return Err(ProbeError::BadStatus {
                status: status.as_u16(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serves a single canned HTTP response, or holds the connection open.
    async fn serve_once(response: Option<&'static str>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 1024];
            let _ = socket.read(&mut buf).await;
            match response {
                Some(response) => {
                    let _ = socket.write_all(response.as_bytes()).await;
                }
                None => tokio::time::sleep(Duration::from_secs(5)).await,
            }
        });

        format!("http://{addr}/health.png")
    }

    #[tokio::test]
    async fn test_probe_success() {
        let url = serve_once(Some(
            "HTTP/1.1 200 OK\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        ))
        .await;
        let probe = HttpHealthProbe::new(url, Duration::from_secs(2)).unwrap();

        tokio_test::assert_ok!(probe.probe().await);
    }

    #[tokio::test]
    async fn test_probe_error_status() {
        let url = serve_once(Some(
            "HTTP/1.1 503 Service Unavailable\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        ))
        .await;
        let probe = HttpHealthProbe::new(url, Duration::from_secs(2)).unwrap();

        let err = probe.probe().await.unwrap_err();
        assert!(matches!(err, ProbeError::BadStatus { status: 503 }));
    }

    #[tokio::test]
    async fn test_probe_times_out() {
        let url = serve_once(None).await;
        let probe = HttpHealthProbe::new(url, Duration::from_millis(100)).unwrap();

        let err = probe.probe().await.unwrap_err();
        assert!(err.is_timeout());
    }

    #[test]
    fn test_for_endpoint_joins_path() {
        let endpoint = PrimaryEndpoint::parse("https://ik.imagekit.io/acme/").unwrap();
        let probe =
            HttpHealthProbe::for_endpoint(&endpoint, "/health-check.png", Duration::from_secs(1))
                .unwrap();

        assert_eq!(probe.url(), "https://ik.imagekit.io/acme/health-check.png");
    }
}
