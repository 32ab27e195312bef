//! Startup orchestration.
//!
//! # Responsibilities
//! - Turn validated settings into the service map and dispatch rules
//! - Build the dispatcher, the HTTP client and the proxy handler
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Subsystems initialize in order, not concurrently
//! - Listeners are bound by the caller, after everything here succeeded

use std::sync::Arc;

use thiserror::Error;

use crate::config::dispatch_file::{loader_for, DispatchLoader, InlineDispatchLoader};
use crate::config::services::build_service_map;
use crate::config::{ConfigError, ProxyConfig};
use crate::error::DispatchError;
use crate::http::{build_client, ProxyHandler};
use crate::observability::ErrorReporter;
use crate::routing::{DispatchConfig, Dispatcher};

/// Error raised while assembling the dispatcher.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

/// Load the dispatch rules named by the settings.
///
/// A dispatch file wins over inline entries; validation rejects configs
/// that carry both.
pub fn load_dispatch_config(config: &ProxyConfig) -> Result<DispatchConfig, ConfigError> {
    match &config.dispatch_file {
        Some(path) => {
            tracing::debug!(path = %path.display(), "Loading dispatch file");
            loader_for(path)?.load()
        }
        None => InlineDispatchLoader::new(&config.dispatch).load(),
    }
}

/// Build the dispatcher from validated settings.
pub fn build_dispatcher(config: &ProxyConfig) -> Result<Dispatcher, StartupError> {
    let services = build_service_map(config)?;
    let rules = load_dispatch_config(config)?;
    let dispatcher = Dispatcher::new(services, rules)?;

    for rule in dispatcher.rules() {
        tracing::info!(
            pattern = %rule.matcher.pattern(),
            service = %rule.service_name,
            "Dispatch rule"
        );
    }
    Ok(dispatcher)
}

/// Build the request handler: dispatcher, pooled client and reporter.
pub fn build_proxy_handler(
    config: &ProxyConfig,
    reporter: Arc<dyn ErrorReporter>,
) -> Result<ProxyHandler, StartupError> {
    let dispatcher = build_dispatcher(config)?;
    let client = build_client(&config.client);
    Ok(ProxyHandler::with_reporter(
        Arc::new(dispatcher),
        client,
        reporter,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DispatchEntry;

    fn inline_config() -> ProxyConfig {
        let mut config = ProxyConfig::default();
        config
            .services
            .insert("default".into(), "localhost:8081".into());
        config.dispatch.push(DispatchEntry {
            url: "*/favicon.ico".into(),
            service: "default".into(),
        });
        config
    }

    #[test]
    fn inline_rules_build_a_dispatcher() {
        let dispatcher = build_dispatcher(&inline_config()).unwrap();
        assert_eq!(dispatcher.rules().len(), 1);
        let service = dispatcher.dispatch("example.com", "/favicon.ico").unwrap();
        assert_eq!(service.name(), "default");
    }

    #[test]
    fn rule_for_unknown_service_is_fatal() {
        let mut config = inline_config();
        config.dispatch.push(DispatchEntry {
            url: "*/mobile/*".into(),
            service: "mobile-frontend".into(),
        });
        let err = build_dispatcher(&config).unwrap_err();
        assert!(matches!(
            err,
            StartupError::Dispatch(DispatchError::UndefinedService(ref name)) if name == "mobile-frontend"
        ));
    }

    #[test]
    fn invalid_pattern_is_fatal() {
        let mut config = inline_config();
        config.dispatch[0].url = "no-path".into();
        let err = build_dispatcher(&config).unwrap_err();
        assert!(matches!(err, StartupError::Config(ConfigError::Pattern(_))));
    }

    #[test]
    fn unknown_dispatch_extension_is_fatal() {
        let mut config = inline_config();
        config.dispatch.clear();
        config.dispatch_file = Some("dispatch.json".into());
        let err = load_dispatch_config(&config).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownDispatchFormat(_)));
    }
}
