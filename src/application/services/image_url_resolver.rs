//! Image URL resolution with backup failover.

use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;
use tracing::{debug, warn};

use super::health_tracker::HealthTracker;
use super::primary_endpoint::{ImagePath, PrimaryEndpoint};
use crate::domain::entities::{ResolvedUrl, ResponsiveImage, TransformOptions};
use crate::domain::errors::SignError;
use crate::domain::ports::UrlSignerPort;

/// Default lifetime of backup pre-signed URLs.
pub const DEFAULT_PRESIGN_EXPIRY: Duration = Duration::from_secs(3600);

/// Low quality placeholder parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaceholderSettings {
    /// Placeholder width in pixels.
    pub width: u32,
    /// Placeholder quality (1-100).
    pub quality: u32,
    /// Placeholder blur radius.
    pub blur: u32,
}

impl Default for PlaceholderSettings {
    fn default() -> Self {
        Self {
            width: 20,
            quality: 20,
            blur: 10,
        }
    }
}

/// Backup routing and placeholder settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverSettings {
    /// Lifetime of backup pre-signed URLs.
    pub presign_expiry: Duration,
    /// Prefix prepended to every backup object key.
    pub key_prefix: Option<String>,
    /// Placeholder parameters for [`ImageUrlResolver::lqip`].
    pub placeholder: PlaceholderSettings,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            presign_expiry: DEFAULT_PRESIGN_EXPIRY,
            key_prefix: None,
            placeholder: PlaceholderSettings::default(),
        }
    }
}

/// Produces deliverable image URLs, failing over to backup storage.
///
/// None of the public operations fail. When the primary provider is down
/// the untransformed original is served from backup storage; when signing
/// also fails the caller's path comes back unchanged.
pub struct ImageUrlResolver {
    tracker: Arc<HealthTracker>,
    signer: Arc<dyn UrlSignerPort>,
    endpoint: PrimaryEndpoint,
    settings: ResolverSettings,
}

impl std::fmt::Debug for ImageUrlResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageUrlResolver")
            .field("endpoint", &self.endpoint)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl ImageUrlResolver {
    /// Creates new resolver.
    #[must_use]
    pub fn new(
        tracker: Arc<HealthTracker>,
        signer: Arc<dyn UrlSignerPort>,
        endpoint: PrimaryEndpoint,
        settings: ResolverSettings,
    ) -> Self {
        Self {
            tracker,
            signer,
            endpoint,
            settings,
        }
    }

    /// Returns the shared health tracker.
    #[must_use]
    pub fn tracker(&self) -> &Arc<HealthTracker> {
        &self.tracker
    }

    /// Resolves `path` under `options` to a URL string.
    pub async fn resolve(&self, path: &str, options: &TransformOptions) -> String {
        self.resolve_detailed(path, options).await.into_string()
    }

    /// Resolves `path` and reports which tier served it.
    pub async fn resolve_detailed(&self, path: &str, options: &TransformOptions) -> ResolvedUrl {
        if self.tracker.is_available().await {
            return self.primary_url(path, options);
        }

        match self.backup_url(path).await {
            Ok(resolved) => resolved,
            Err(e) if e.is_missing_object() => {
                warn!(error = %e, path, "Object missing from backup storage, serving original path");
                ResolvedUrl::Original(path.to_string())
            }
            Err(e) => {
                warn!(error = %e, path, "Backup URL signing failed, serving original path");
                ResolvedUrl::Original(path.to_string())
            }
        }
    }

    /// Returns a tiny blurred placeholder URL.
    ///
    /// Only the primary tier can blur; on backup the original is served.
    pub async fn lqip(&self, path: &str, width: Option<u32>) -> String {
        let placeholder = self.settings.placeholder;
        let options = TransformOptions::builder()
            .width(width.unwrap_or(placeholder.width))
            .quality(placeholder.quality)
            .blur(placeholder.blur)
            .build();

        match options {
            Ok(options) => self.resolve(path, &options).await,
            Err(e) => {
                warn!(error = %e, "Invalid placeholder settings, resolving without transforms");
                self.resolve(path, &TransformOptions::none()).await
            }
        }
    }

    /// Builds a `srcset` value with one entry per width, in input order.
    pub async fn build_srcset(&self, path: &str, widths: &[u32]) -> String {
        self.build_srcset_with(path, widths, &TransformOptions::none())
            .await
    }

    /// Builds a `srcset` layering each width over `base`.
    ///
    /// Zero widths are skipped.
    pub async fn build_srcset_with(
        &self,
        path: &str,
        widths: &[u32],
        base: &TransformOptions,
    ) -> String {
        let entries = widths.iter().filter_map(|&width| match base.with_width(width) {
            Ok(options) => Some((width, options)),
            Err(e) => {
                warn!(error = %e, width, "Skipping invalid srcset width");
                None
            }
        });

        let resolved = join_all(entries.map(|(width, options)| async move {
            format!("{} {width}w", self.resolve(path, &options).await)
        }))
        .await;

        resolved.join(", ")
    }

    /// Builds the `src`/`srcset`/`sizes`/placeholder bundle for one image.
    ///
    /// `src` uses the largest requested width.
    pub async fn responsive_image(
        &self,
        path: &str,
        widths: &[u32],
        sizes: Option<&str>,
        base: &TransformOptions,
    ) -> ResponsiveImage {
        let src_options = widths
            .iter()
            .copied()
            .max()
            .and_then(|width| base.with_width(width).ok())
            .unwrap_or_else(|| base.clone());

        let (src, srcset, lqip) = tokio::join!(
            self.resolve(path, &src_options),
            self.build_srcset_with(path, widths, base),
            self.lqip(path, None),
        );

        ResponsiveImage {
            src,
            srcset,
            sizes: sizes.map(ToString::to_string),
            lqip,
        }
    }

    fn primary_url(&self, path: &str, options: &TransformOptions) -> ResolvedUrl {
        if self.endpoint.classify(path) == ImagePath::RootRelative {
            ResolvedUrl::Primary(self.endpoint.build(path, options))
        } else {
            debug!(path, "Passing non root-relative image path through unchanged");
            ResolvedUrl::Original(path.to_string())
        }
    }

    async fn backup_url(&self, path: &str) -> Result<ResolvedUrl, SignError> {
        match self.endpoint.classify(path) {
            ImagePath::Empty | ImagePath::Presigned | ImagePath::ForeignUrl => {
                return Ok(ResolvedUrl::Original(path.to_string()));
            }
            _ => {}
        }

        let key = self
            .endpoint
            .object_key(path, self.settings.key_prefix.as_deref())
            .ok_or_else(|| SignError::no_object_key(path))?;

        let url = self
            .signer
            .presign_get(&key, self.settings.presign_expiry)
            .await?;

        debug!(key = %key, "Serving image from backup storage");
        Ok(ResolvedUrl::Backup(url))
    }
}
