//! Request dispatcher and reverse proxy for a multi-service platform.
//!
//! Requests are routed by `<host>/<path>` patterns to named services and
//! forwarded with hop-by-hop headers stripped and `X-Forwarded-For` chained.

pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;
pub mod security;

pub use config::schema::ProxyConfig;
pub use error::{DispatchError, PatternError, ProxyError};
pub use http::{HttpServer, ProxyHandler};
pub use lifecycle::Shutdown;
pub use observability::{ErrorReporter, NopReporter, TracingReporter};
pub use routing::{DispatchConfig, Dispatcher, Service};
