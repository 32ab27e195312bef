//! Response handling and transformation.
//!
//! # Responsibilities
//! - Synthetic plain-text responses for routing and forwarding failures
//! - Relay backend responses with hop-by-hop headers stripped
//! - Stream backend bodies and report relay failures
//!
//! # Design Decisions
//! - Streaming responses avoid buffering entire body
//! - Client-facing bodies are generic; detail goes to the reporter
//! - A relay failure is reported once and never retried

use std::fmt;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{ready, Context, Poll};

use axum::body::Body;
use axum::http::{Response, StatusCode};
use axum::response::IntoResponse;
use bytes::Bytes;
use http_body::{Body as HttpBody, Frame, SizeHint};

use crate::error::ProxyError;
use crate::observability::ErrorReporter;
use crate::security::headers::strip_hop_by_hop;

pub const CREATE_REQUEST_FAILED: &str = "Failed to create proxy request";
pub const BACKEND_FAILED: &str = "Failed to request for backend";

/// 404 for a request no rule matched.
pub fn no_backend(path: &str) -> Response<Body> {
    (
        StatusCode::NOT_FOUND,
        format!("No such backend for the URL: {path}"),
    )
        .into_response()
}

/// Synthetic response for a forwarding failure.
pub fn error_response(err: &ProxyError) -> Response<Body> {
    let status = err.status();
    let body = if status == StatusCode::BAD_REQUEST {
        CREATE_REQUEST_FAILED
    } else {
        BACKEND_FAILED
    };
    (status, body).into_response()
}

/// Turn a backend response into the client response.
///
/// Status and end-to-end headers are copied; the body is streamed through a
/// [`ReportingBody`].
pub fn relay<B>(response: Response<B>, reporter: Arc<dyn ErrorReporter>) -> Response<Body>
where
    B: HttpBody<Data = Bytes> + Send + 'static,
    B::Error: fmt::Display + Into<axum::BoxError>,
{
    let (mut parts, body) = response.into_parts();
    strip_hop_by_hop(&mut parts.headers);

    let mut relayed = Response::new(Body::new(ReportingBody::new(body, reporter)));
    *relayed.status_mut() = parts.status;
    *relayed.headers_mut() = parts.headers;
    relayed
}

/// Body wrapper that reports a relay failure exactly once.
///
/// Two failures are reported: the inner body yielding an error, and the
/// wrapper being dropped before the inner body reached its end (the client
/// went away or a write failed).
pub struct ReportingBody<B: HttpBody> {
    inner: Pin<Box<B>>,
    reporter: Arc<dyn ErrorReporter>,
    settled: bool,
}

impl<B: HttpBody> ReportingBody<B> {
    pub fn new(inner: B, reporter: Arc<dyn ErrorReporter>) -> Self {
        Self {
            inner: Box::pin(inner),
            reporter,
            settled: false,
        }
    }

    fn report(&mut self, err: ProxyError) {
        if !self.settled {
            self.settled = true;
            self.reporter.report_error(&err);
        }
    }
}

impl<B> HttpBody for ReportingBody<B>
where
    B: HttpBody,
    B::Error: fmt::Display,
{
    type Data = B::Data;
    type Error = B::Error;

    fn poll_frame(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        let this = self.get_mut();
        match ready!(this.inner.as_mut().poll_frame(cx)) {
            Some(Ok(frame)) => Poll::Ready(Some(Ok(frame))),
            Some(Err(e)) => {
                this.report(ProxyError::ResponseBody(e.to_string()));
                Poll::Ready(Some(Err(e)))
            }
            None => {
                this.settled = true;
                Poll::Ready(None)
            }
        }
    }

    fn is_end_stream(&self) -> bool {
        self.inner.is_end_stream()
    }

    fn size_hint(&self) -> SizeHint {
        self.inner.size_hint()
    }
}

impl<B: HttpBody> Drop for ReportingBody<B> {
    fn drop(&mut self) {
        if !self.settled && !self.inner.is_end_stream() {
            self.report(ProxyError::ResponseAborted);
        }
    }
}
