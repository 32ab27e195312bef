//! Forwarding header hygiene.
//!
//! # Data Flow
//! ```text
//! Inbound request:
//!     → headers.rs (chain X-Forwarded-For, strip hop-by-hop)
//!     → Outbound request to backend
//!
//! Backend response:
//!     → headers.rs (strip hop-by-hop)
//!     → Response to client
//! ```

pub mod headers;
