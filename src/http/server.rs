//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the proxy handler as catch-all
//! - Wire up middleware (tracing)
//! - Serve on a bound listener with connect info (caller address)
//! - Stop accepting and drain on shutdown

use std::net::SocketAddr;

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{Request, Response},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;

use crate::http::proxy::ProxyHandler;

/// HTTP server for the dispatcher.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    pub fn new(handler: ProxyHandler) -> Self {
        Self {
            router: build_router(handler),
        }
    }

    /// Run the server until `shutdown` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Build the Axum router: every method and path goes to the proxy handler.
pub fn build_router(handler: ProxyHandler) -> Router {
    Router::new()
        .fallback(proxy_handler)
        .with_state(handler)
        .layer(TraceLayer::new_for_http())
}

async fn proxy_handler(
    State(handler): State<ProxyHandler>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    request: Request<Body>,
) -> Response<Body> {
    handler.handle(addr, request).await
}
