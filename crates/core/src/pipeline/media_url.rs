use std::path::Path;

use crate::shared::constants::MEDIA_URL_PREFIX;

/// Scheme and host the upload request arrived on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestOrigin {
    pub scheme: String,
    pub host: String,
}

impl RequestOrigin {
    pub fn new(scheme: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            scheme: scheme.into(),
            host: host.into(),
        }
    }

    pub fn http(host: impl Into<String>) -> Self {
        Self::new("http", host)
    }
}

/// Turns media-root-relative paths into absolute URLs.
///
/// A configured public base URL wins over the request origin, for
/// deployments behind a proxy that rewrites the host.
#[derive(Clone, Debug, Default)]
pub struct MediaUrlBuilder {
    public_base_url: Option<String>,
}

impl MediaUrlBuilder {
    pub fn new(public_base_url: Option<String>) -> Self {
        Self {
            public_base_url: public_base_url.map(|u| u.trim_end_matches('/').to_string()),
        }
    }

    pub fn build(&self, origin: &RequestOrigin, relative: &Path) -> String {
        let base = match &self.public_base_url {
            Some(base) => base.clone(),
            None => format!("{}://{}", origin.scheme, origin.host),
        };
        // Media URLs always use forward slashes, whatever the host OS.
        let path = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        format!("{base}{MEDIA_URL_PREFIX}{path}")
    }
}
