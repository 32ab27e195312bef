//! Backend service definitions.

use std::fmt;

use axum::http::Uri;
use url::Url;

use crate::error::ProxyError;

/// A named backend identified by its origin URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Service {
    name: String,
    origin: Url,
}

impl Service {
    pub fn new(name: impl Into<String>, origin: Url) -> Self {
        Self {
            name: name.into(),
            origin,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn origin(&self) -> &Url {
        &self.origin
    }

    /// Resolve an inbound request target against this service's origin.
    ///
    /// Scheme, host and port come from the origin. The origin's base path
    /// (without its trailing `/`) prefixes the inbound path, and the inbound
    /// query string is carried over as-is.
    pub fn resolve(&self, target: &Uri) -> Result<Url, ProxyError> {
        match self.origin.scheme() {
            "http" | "https" => {}
            scheme => {
                return Err(ProxyError::UnsupportedScheme {
                    service: self.name.clone(),
                    scheme: scheme.to_string(),
                })
            }
        }

        let base = self.origin.path().trim_end_matches('/');
        let path = match target.path() {
            "" | "*" => "/",
            path => path,
        };

        let mut url = self.origin.clone();
        url.set_path(&format!("{base}{path}"));
        url.set_query(target.query());
        url.set_fragment(None);
        Ok(url)
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.origin)
    }
}
