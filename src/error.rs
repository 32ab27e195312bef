//! Error types shared across the dispatcher.
//!
//! Startup errors (pattern compilation, dispatcher construction) are fatal and
//! surface before the listener is bound. `ProxyError` covers per-request
//! forwarding failures; those are turned into synthetic responses and handed
//! to the configured [`ErrorReporter`](crate::observability::reporter::ErrorReporter).

use axum::http::StatusCode;
use thiserror::Error;

/// Failure to compile a dispatch pattern.
#[derive(Debug, Error)]
pub enum PatternError {
    /// Host part has an empty value or a `*` outside the leading position.
    #[error("invalid host pattern: {0:?}")]
    InvalidHost(String),

    /// Path part has a `*` outside the trailing position.
    #[error("invalid path pattern: {0:?}")]
    InvalidPath(String),

    /// Pattern carries no `/` separating host from path.
    #[error("invalid URL pattern: {pattern} (no path)")]
    MissingPath { pattern: String },

    /// A host or path sub-pattern failed; wraps it with the full pattern.
    #[error("invalid URL pattern: {pattern} ({source})")]
    InvalidUrl {
        pattern: String,
        #[source]
        source: Box<PatternError>,
    },
}

impl PatternError {
    pub(crate) fn in_pattern(self, pattern: &str) -> Self {
        Self::InvalidUrl {
            pattern: pattern.to_string(),
            source: Box::new(self),
        }
    }
}

/// Failure to construct a [`Dispatcher`](crate::routing::Dispatcher).
#[derive(Debug, Error)]
pub enum DispatchError {
    /// A rule references a service absent from the service map.
    #[error("undefined backend for service: {0}")]
    UndefinedService(String),
}

/// Per-request forwarding failure.
#[derive(Debug, Error)]
pub enum ProxyError {
    /// The service origin uses a scheme the client cannot speak.
    #[error("unsupported origin scheme {scheme:?} for service {service}")]
    UnsupportedScheme { service: String, scheme: String },

    /// The resolved upstream URL is not a valid request URI.
    #[error("invalid upstream URI {uri}: {source}")]
    InvalidUri {
        uri: String,
        #[source]
        source: axum::http::uri::InvalidUri,
    },

    /// The forwarded-for chain could not be encoded as a header value.
    #[error("invalid forwarding header: {0}")]
    InvalidHeader(#[from] axum::http::header::InvalidHeaderValue),

    /// The outbound request could not be assembled.
    #[error("failed to create proxy request: {0}")]
    CreateRequest(#[from] axum::http::Error),

    /// The backend call failed before a response arrived.
    #[error("request to service {service} failed: {source}")]
    Backend {
        service: String,
        #[source]
        source: hyper_util::client::legacy::Error,
    },

    /// Reading the backend body failed while relaying it.
    #[error("failed to relay response body: {0}")]
    ResponseBody(String),

    /// The client stopped consuming the response before it was complete.
    #[error("response stream aborted before completion")]
    ResponseAborted,
}

impl ProxyError {
    /// Status code used for the synthetic response to this failure.
    ///
    /// Body relay failures happen after the backend status has been sent;
    /// their status is only meaningful for logging.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::UnsupportedScheme { .. }
            | Self::InvalidUri { .. }
            | Self::InvalidHeader(_)
            | Self::CreateRequest(_) => StatusCode::BAD_REQUEST,
            Self::Backend { .. } | Self::ResponseBody(_) | Self::ResponseAborted => {
                StatusCode::BAD_GATEWAY
            }
        }
    }
}
