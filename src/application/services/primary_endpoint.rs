//! Primary provider URL construction and path classification.

use percent_encoding::percent_decode_str;
use reqwest::Url;

use crate::domain::entities::TransformOptions;
use crate::domain::errors::EndpointError;

/// Shape of a caller supplied image path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImagePath {
    /// Empty input.
    Empty,
    /// URL that already carries a storage signature.
    Presigned,
    /// Absolute URL on the primary provider's host.
    PrimaryUrl(Url),
    /// Absolute URL on some other host.
    ForeignUrl,
    /// Path starting with `/`.
    RootRelative,
    /// Any other relative reference.
    Relative,
}

/// Base URL of the primary provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimaryEndpoint {
    base: String,
    host: String,
    base_path: String,
}

impl PrimaryEndpoint {
    /// Parses the provider base URL, e.g. `https://ik.imagekit.io/acme`.
    ///
    /// # Errors
    /// Returns error if the URL is malformed, hostless, or not http(s).
    pub fn parse(base_url: &str) -> Result<Self, EndpointError> {
        let url = Url::parse(base_url.trim())
            .map_err(|e| EndpointError::invalid(base_url, e.to_string()))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(EndpointError::UnsupportedScheme {
                url: base_url.to_string(),
            });
        }

        let host = url
            .host_str()
            .ok_or_else(|| EndpointError::invalid(base_url, "missing host"))?
            .to_ascii_lowercase();

        Ok(Self {
            base: url.as_str().trim_end_matches('/').to_string(),
            host,
            base_path: url.path().trim_end_matches('/').to_string(),
        })
    }

    /// Returns the base URL without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base
    }

    /// Returns the provider host.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Classifies `path` relative to this endpoint.
    #[must_use]
    pub fn classify(&self, path: &str) -> ImagePath {
        if path.is_empty() {
            return ImagePath::Empty;
        }
        if is_presigned(path) {
            return ImagePath::Presigned;
        }
        if let Some(rest) = path.strip_prefix("//") {
            return match Url::parse(&format!("https://{rest}")) {
                Ok(url) if self.owns(&url) => ImagePath::PrimaryUrl(url),
                _ => ImagePath::ForeignUrl,
            };
        }
        if has_scheme(path) {
            return match Url::parse(path) {
                Ok(url) if self.owns(&url) => ImagePath::PrimaryUrl(url),
                _ => ImagePath::ForeignUrl,
            };
        }
        if path.starts_with('/') {
            ImagePath::RootRelative
        } else {
            ImagePath::Relative
        }
    }

    /// Builds a transformed primary URL for a root-relative path.
    ///
    /// Every other path shape is returned unchanged.
    #[must_use]
    pub fn build(&self, path: &str, options: &TransformOptions) -> String {
        if self.classify(path) != ImagePath::RootRelative {
            return path.to_string();
        }

        let (target, fragment) = match path.split_once('#') {
            Some((target, fragment)) => (target, Some(fragment)),
            None => (path, None),
        };

        let mut url = format!("{}{target}", self.base);
        if let Some(param) = options.to_query_param() {
            url.push(if target.contains('?') { '&' } else { '?' });
            url.push_str(&param);
        }
        if let Some(fragment) = fragment {
            url.push('#');
            url.push_str(fragment);
        }
        url
    }

    /// Derives the backup storage object key for `path`.
    ///
    /// Returns `None` for paths with no object behind them (empty input,
    /// foreign hosts, signed URLs, bare `/`).
    #[must_use]
    pub fn object_key(&self, path: &str, key_prefix: Option<&str>) -> Option<String> {
        let raw = match self.classify(path) {
            ImagePath::Empty | ImagePath::Presigned | ImagePath::ForeignUrl => return None,
            ImagePath::PrimaryUrl(url) => {
                let full = url.path();
                let trimmed = if self.base_path.is_empty() {
                    full
                } else {
                    full.strip_prefix(self.base_path.as_str())
                        .filter(|rest| rest.is_empty() || rest.starts_with('/'))
                        .unwrap_or(full)
                };
                percent_decode_str(trimmed).decode_utf8_lossy().into_owned()
            }
            ImagePath::RootRelative | ImagePath::Relative => strip_query(path).to_string(),
        };

        let key = raw.trim_start_matches('/');
        if key.is_empty() {
            return None;
        }

        match key_prefix.map(|p| p.trim_matches('/')).filter(|p| !p.is_empty()) {
            Some(prefix) => Some(format!("{prefix}/{key}")),
            None => Some(key.to_string()),
        }
    }

    fn owns(&self, url: &Url) -> bool {
        url.host_str()
            .is_some_and(|host| host.eq_ignore_ascii_case(&self.host))
    }
}

fn has_scheme(path: &str) -> bool {
    path.starts_with("http://") || path.starts_with("https://")
}

fn strip_query(path: &str) -> &str {
    path.split(['?', '#']).next().unwrap_or(path)
}

fn is_presigned(path: &str) -> bool {
    let Some((_, query)) = path.split_once('?') else {
        return false;
    };

    query.split('&').any(|pair| {
        let key = pair.split('=').next().unwrap_or("");
        key.eq_ignore_ascii_case("X-Amz-Signature") || key == "Signature"
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::ImageFormat;
    use test_case::test_case;

    fn endpoint() -> PrimaryEndpoint {
        PrimaryEndpoint::parse("https://ik.imagekit.io/acme/").unwrap()
    }

    #[test]
    fn test_parse_trims_trailing_slash() {
        let endpoint = endpoint();
        assert_eq!(endpoint.base_url(), "https://ik.imagekit.io/acme");
        assert_eq!(endpoint.host(), "ik.imagekit.io");
    }

    #[test_case("not a url" ; "garbage")]
    #[test_case("ftp://ik.imagekit.io/acme" ; "ftp")]
    #[test_case("" ; "empty")]
    fn test_parse_rejects(input: &str) {
        assert!(PrimaryEndpoint::parse(input).is_err());
    }

    #[test_case("", ImagePath::Empty ; "empty")]
    #[test_case("/images/a.jpg", ImagePath::RootRelative ; "root_relative")]
    #[test_case("images/a.jpg", ImagePath::Relative ; "relative")]
    #[test_case("https://cdn.example.com/a.jpg", ImagePath::ForeignUrl ; "foreign")]
    #[test_case("//cdn.example.com/a.jpg", ImagePath::ForeignUrl ; "protocol_relative")]
    #[test_case("https://b2.example.com/a.jpg?X-Amz-Signature=abc", ImagePath::Presigned ; "presigned")]
    fn test_classify(path: &str, expected: ImagePath) {
        assert_eq!(endpoint().classify(path), expected);
    }

    #[test_case("https://IK.imagekit.io/acme/images/a.jpg" ; "absolute")]
    #[test_case("//ik.imagekit.io/acme/images/a.jpg" ; "protocol_relative")]
    fn test_classify_primary_host(path: &str) {
        let kind = endpoint().classify(path);
        assert!(matches!(kind, ImagePath::PrimaryUrl(_)));
    }

    #[test]
    fn test_build_root_relative_with_transforms() {
        let options = TransformOptions::builder()
            .width(400)
            .format(ImageFormat::Webp)
            .build()
            .unwrap();

        assert_eq!(
            endpoint().build("/images/a.jpg", &options),
            "https://ik.imagekit.io/acme/images/a.jpg?tr=w-400,f-webp"
        );
    }

    #[test]
    fn test_build_appends_to_existing_query() {
        let options = TransformOptions::builder().quality(60).build().unwrap();

        assert_eq!(
            endpoint().build("/a.jpg?v=2", &options),
            "https://ik.imagekit.io/acme/a.jpg?v=2&tr=q-60"
        );
    }

    #[test_case("/a.jpg#hero", "https://ik.imagekit.io/acme/a.jpg?tr=w-400#hero" ; "fragment")]
    #[test_case("/a.jpg?v=2#hero", "https://ik.imagekit.io/acme/a.jpg?v=2&tr=w-400#hero" ; "query_and_fragment")]
    fn test_build_keeps_fragment_last(path: &str, expected: &str) {
        let options = TransformOptions::builder().width(400).build().unwrap();
        assert_eq!(endpoint().build(path, &options), expected);
    }

    #[test]
    fn test_build_without_transforms_has_no_query() {
        assert_eq!(
            endpoint().build("/a.jpg", &TransformOptions::none()),
            "https://ik.imagekit.io/acme/a.jpg"
        );
    }

    #[test_case("images/a.jpg" ; "relative")]
    #[test_case("https://ik.imagekit.io/acme/a.jpg" ; "primary_absolute")]
    #[test_case("https://cdn.example.com/a.jpg" ; "foreign")]
    #[test_case("" ; "empty")]
    fn test_build_passes_through(path: &str) {
        let options = TransformOptions::builder().width(400).build().unwrap();
        assert_eq!(endpoint().build(path, &options), path);
    }

    #[test_case("/images/a.jpg", None, Some("images/a.jpg") ; "root_relative")]
    #[test_case("images/a.jpg?v=1#x", None, Some("images/a.jpg") ; "strips_query")]
    #[test_case("https://ik.imagekit.io/acme/images/a.jpg?tr=w-400", None, Some("images/a.jpg") ; "primary_url")]
    #[test_case("//ik.imagekit.io/acme/images/a.jpg", None, Some("images/a.jpg") ; "protocol_relative_primary")]
    #[test_case("https://ik.imagekit.io/acmecorp/a.jpg", None, Some("acmecorp/a.jpg") ; "base_path_boundary")]
    #[test_case("/images/a.jpg", Some("/media/"), Some("media/images/a.jpg") ; "prefixed")]
    #[test_case("https://cdn.example.com/a.jpg", None, None ; "foreign")]
    #[test_case("/", None, None ; "bare_slash")]
    #[test_case("", Some("media"), None ; "empty")]
    fn test_object_key(path: &str, prefix: Option<&str>, expected: Option<&str>) {
        assert_eq!(endpoint().object_key(path, prefix).as_deref(), expected);
    }

    #[test_case("my photo.jpg" ; "space")]
    #[test_case("café.jpg" ; "non_ascii")]
    fn test_object_key_same_for_relative_and_absolute(name: &str) {
        let endpoint = endpoint();
        let relative = endpoint.object_key(&format!("/images/{name}"), None);
        let absolute = endpoint.object_key(&format!("https://ik.imagekit.io/acme/images/{name}"), None);

        assert_eq!(relative.as_deref(), Some(format!("images/{name}").as_str()));
        assert_eq!(absolute, relative);
    }
}
