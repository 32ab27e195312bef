//! Side channel for per-request forwarding errors.
//!
//! The proxy answers every failure with a generic plain-text response; the
//! underlying error is handed to an [`ErrorReporter`] exactly once.

use crate::error::ProxyError;

/// Receives forwarding errors.
pub trait ErrorReporter: Send + Sync {
    fn report_error(&self, err: &ProxyError);
}

/// Discards every error. The proxy handler's default.
#[derive(Debug, Clone, Copy, Default)]
pub struct NopReporter;

impl ErrorReporter for NopReporter {
    fn report_error(&self, _err: &ProxyError) {}
}

/// Logs errors as `tracing` events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl ErrorReporter for TracingReporter {
    fn report_error(&self, err: &ProxyError) {
        tracing::error!(status = err.status().as_u16(), error = %err, "Proxy error");
    }
}

impl<F> ErrorReporter for F
where
    F: Fn(&ProxyError) + Send + Sync,
{
    fn report_error(&self, err: &ProxyError) {
        self(err)
    }
}
