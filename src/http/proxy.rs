//! Dispatch-and-forward request handling.
//!
//! # Responsibilities
//! - Stage A: route the request through the dispatcher, 404 on no match
//! - Stage B: forward to the resolved service and relay its response
//! - Report every forwarding failure once through the error reporter
//!
//! # Design Decisions
//! - Single-shot forwarding: no retries, no failover
//! - The HTTP client is injected, never global
//! - Shared state is read-only, so handlers clone freely across tasks

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::body::Body;
use axum::http::{Request, Response};

use crate::error::ProxyError;
use crate::http::client::HttpClient;
use crate::http::request::{build_proxy_request, routing_host, routing_path};
use crate::http::response::{error_response, no_backend, relay};
use crate::observability::metrics::{self, NO_SERVICE};
use crate::observability::{ErrorReporter, NopReporter};
use crate::routing::{Dispatcher, Service};

/// Routes inbound requests and forwards them to their service.
#[derive(Clone)]
pub struct ProxyHandler {
    dispatcher: Arc<Dispatcher>,
    client: HttpClient,
    reporter: Arc<dyn ErrorReporter>,
}

impl ProxyHandler {
    /// Create a handler that discards forwarding errors.
    pub fn new(dispatcher: Arc<Dispatcher>, client: HttpClient) -> Self {
        Self::with_reporter(dispatcher, client, Arc::new(NopReporter))
    }

    /// Create a handler with an explicit error reporter.
    pub fn with_reporter(
        dispatcher: Arc<Dispatcher>,
        client: HttpClient,
        reporter: Arc<dyn ErrorReporter>,
    ) -> Self {
        Self {
            dispatcher,
            client,
            reporter,
        }
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Handle one request from `remote_addr`.
    pub async fn handle(&self, remote_addr: SocketAddr, request: Request<Body>) -> Response<Body> {
        let start = Instant::now();
        let method = request.method().to_string();
        let path = routing_path(&request).into_owned();
        let host = routing_host(&request).to_string();

        let Some(service) = self.dispatcher.dispatch(&host, &path) else {
            tracing::warn!(host = %host, path = %path, "No rule matched");
            metrics::record_request(&method, 404, NO_SERVICE, start);
            return no_backend(&path);
        };

        let proxy = ServiceProxy::new(service.clone(), self.client.clone(), self.reporter.clone());
        let response = proxy.forward(remote_addr, request).await;
        metrics::record_request(&method, response.status().as_u16(), service.name(), start);
        response
    }
}

/// Forwards requests to one resolved service.
#[derive(Clone)]
pub struct ServiceProxy {
    service: Arc<Service>,
    client: HttpClient,
    reporter: Arc<dyn ErrorReporter>,
}

impl ServiceProxy {
    pub fn new(service: Arc<Service>, client: HttpClient, reporter: Arc<dyn ErrorReporter>) -> Self {
        Self {
            service,
            client,
            reporter,
        }
    }

    /// Forward `request` and relay the backend response.
    ///
    /// Construction failures answer 400 and backend call failures 502; both
    /// are reported. Failures while streaming the body are reported by the
    /// relayed body itself.
    pub async fn forward(&self, remote_addr: SocketAddr, request: Request<Body>) -> Response<Body> {
        let outbound = match build_proxy_request(&self.service, remote_addr, request) {
            Ok(outbound) => outbound,
            Err(err) => return self.fail(err),
        };

        tracing::debug!(
            service = %self.service.name(),
            method = %outbound.method(),
            uri = %outbound.uri(),
            "Forwarding request"
        );

        let response = match self.client.request(outbound).await {
            Ok(response) => response,
            Err(source) => {
                return self.fail(ProxyError::Backend {
                    service: self.service.name().to_string(),
                    source,
                })
            }
        };

        tracing::debug!(
            service = %self.service.name(),
            status = %response.status(),
            "Backend responded"
        );

        relay(response, self.reporter.clone())
    }

    fn fail(&self, err: ProxyError) -> Response<Body> {
        tracing::debug!(service = %self.service.name(), error = %err, "Forwarding failed");
        let response = error_response(&err);
        self.reporter.report_error(&err);
        response
    }
}
