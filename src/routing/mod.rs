//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Dispatch rules (at startup):
//!     "<host>/<path>" patterns
//!     → matcher.rs (compile into HostPathMatcher)
//!     → rules.rs (ordered DispatchConfig)
//!     → dispatcher.rs (check against service map, freeze)
//!
//! Incoming Request (host, path)
//!     → dispatcher.rs (scan rules in order)
//!     → Return: matched Service or None
//! ```
//!
//! # Design Decisions
//! - Rules compiled at startup, immutable at runtime
//! - No regex in hot path (exact, prefix and suffix only)
//! - Deterministic: declaration order decides, first match wins

pub mod dispatcher;
pub mod matcher;
pub mod rules;
pub mod service;

pub use dispatcher::Dispatcher;
pub use matcher::{HostMatcher, HostPathMatcher, PathMatcher, StringMatcher};
pub use rules::{ConfigRule, DispatchConfig};
pub use service::Service;
