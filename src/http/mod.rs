//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, catch-all route, connect info)
//!     → proxy.rs (dispatch; 404 when no rule matches)
//!     → request.rs (resolve backend URL, chain X-Forwarded-For, strip hop-by-hop)
//!     → client.rs (pooled call to the backend)
//!     → response.rs (strip hop-by-hop, stream body, report relay failures)
//!     → Send to client
//! ```

pub mod client;
pub mod proxy;
pub mod request;
pub mod response;
pub mod server;

pub use client::{build_client, HttpClient};
pub use proxy::{ProxyHandler, ServiceProxy};
pub use server::{build_router, HttpServer};
