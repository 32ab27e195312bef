//! Configuration schema definitions.
//!
//! This module defines the settings file structure for the dispatcher.
//! All types derive Serde traits for deserialization from TOML.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root configuration for the dispatcher.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration.
    pub listener: ListenerConfig,

    /// Path to a `dispatch.yaml` or `dispatch.xml` file.
    pub dispatch_file: Option<PathBuf>,

    /// Inline dispatch rules, used when no dispatch file is given.
    pub dispatch: Vec<DispatchEntry>,

    /// Service name to origin (`http://host:port[/base]` or `host:port`).
    pub services: BTreeMap<String, String>,

    /// Outbound HTTP client settings.
    pub client: ClientConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "localhost:3000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "localhost:3000".to_string(),
        }
    }
}

/// A single dispatch rule as written in a config file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DispatchEntry {
    /// `"<host>/<path>"` pattern.
    pub url: String,

    /// Target service name.
    pub service: String,
}

/// Outbound client configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ClientConfig {
    /// TCP connect timeout in milliseconds. Unset means no timeout.
    pub connect_timeout_ms: Option<u64>,

    /// How long idle pooled connections are kept, in seconds.
    pub pool_idle_timeout_secs: u64,

    /// Maximum idle pooled connections per backend.
    pub pool_max_idle_per_host: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            connect_timeout_ms: None,
            pool_idle_timeout_secs: 90,
            pool_max_idle_per_host: 32,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config: ProxyConfig = toml::from_str("").unwrap();
        assert_eq!(config.listener.bind_address, "localhost:3000");
        assert!(config.dispatch_file.is_none());
        assert!(config.services.is_empty());
        assert_eq!(config.client.pool_idle_timeout_secs, 90);
        assert_eq!(config.observability.log_format, LogFormat::Pretty);
        assert!(!config.observability.metrics_enabled);
    }

    #[test]
    fn parses_full_document() {
        let config: ProxyConfig = toml::from_str(
            r#"
            dispatch_file = "dispatch.yaml"

            [listener]
            bind_address = "127.0.0.1:8080"

            [services]
            default = "localhost:8081"
            admin = "http://localhost:8082/admin"

            [client]
            connect_timeout_ms = 500

            [observability]
            log_level = "debug"
            log_format = "json"
            "#,
        )
        .unwrap();

        assert_eq!(config.dispatch_file, Some(PathBuf::from("dispatch.yaml")));
        assert_eq!(config.listener.bind_address, "127.0.0.1:8080");
        assert_eq!(config.services["admin"], "http://localhost:8082/admin");
        assert_eq!(config.client.connect_timeout_ms, Some(500));
        assert_eq!(config.client.pool_max_idle_per_host, 32);
        assert_eq!(config.observability.log_format, LogFormat::Json);
    }

    #[test]
    fn parses_inline_rules_in_order() {
        let config: ProxyConfig = toml::from_str(
            r#"
            [[dispatch]]
            url = "*/mobile/*"
            service = "mobile"

            [[dispatch]]
            url = "*/"
            service = "default"
            "#,
        )
        .unwrap();

        assert_eq!(
            config.dispatch,
            vec![
                DispatchEntry { url: "*/mobile/*".into(), service: "mobile".into() },
                DispatchEntry { url: "*/".into(), service: "default".into() },
            ]
        );
    }
}
