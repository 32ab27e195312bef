//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! settings file (TOML)            command line
//!     → loader.rs (parse)             → services.rs (merge NAME:ORIGIN specs)
//!     → validation.rs (semantic checks)
//!     → ProxyConfig (validated, immutable)
//!
//! dispatch file (YAML/XML) or inline [[dispatch]] entries
//!     → dispatch_file.rs (parse, compile every pattern)
//!     → DispatchConfig (ordered rules)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; there is no reload
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod dispatch_file;
pub mod loader;
pub mod schema;
pub mod services;
pub mod validation;

pub use dispatch_file::{loader_for, DispatchLoader, XmlDispatchLoader, YamlDispatchLoader};
pub use loader::{load_config, ConfigError};
pub use schema::{ClientConfig, DispatchEntry, ListenerConfig, ObservabilityConfig, ProxyConfig};
