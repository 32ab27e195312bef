//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Proxy handler produces:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, histograms)
//!     → reporter.rs (forwarding errors, once per failure)
//!
//! Consumers:
//!     → stdout (pretty or JSON)
//!     → Metrics endpoint (Prometheus scrape, optional)
//!     → ErrorReporter implementation (no-op, tracing, test capture)
//! ```

pub mod logging;
pub mod metrics;
pub mod reporter;

pub use reporter::{ErrorReporter, NopReporter, TracingReporter};
