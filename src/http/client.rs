//! Outbound HTTP client.
//!
//! The client is built once from `ClientConfig` and handed to the proxy
//! handler; there is no process-wide default client.

use std::time::Duration;

use axum::body::Body;
use hyper_util::client::legacy::{connect::HttpConnector, Client};
use hyper_util::rt::TokioExecutor;

use crate::config::ClientConfig;

/// Pooled HTTP/1.1 client used to reach backends.
pub type HttpClient = Client<HttpConnector, Body>;

/// Build a client from configuration.
pub fn build_client(config: &ClientConfig) -> HttpClient {
    let mut connector = HttpConnector::new();
    connector.set_nodelay(true);
    connector.set_connect_timeout(config.connect_timeout_ms.map(Duration::from_millis));

    Client::builder(TokioExecutor::new())
        .pool_idle_timeout(Duration::from_secs(config.pool_idle_timeout_secs))
        .pool_max_idle_per_host(config.pool_max_idle_per_host)
        .build(connector)
}
