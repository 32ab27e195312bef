//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Exactly one dispatch source, at least one service
//! - Service origins and addresses parse
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ProxyConfig → Result<(), Vec<ValidationError>>
//! - Rule-to-service integrity is checked by the dispatcher, once rules are loaded

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::ProxyConfig;
use crate::config::services::parse_origin;
use crate::observability::logging::LOG_LEVELS;

/// A single semantic problem in a `ProxyConfig`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.bind_address must not be empty")]
    EmptyBindAddress,

    #[error("no dispatch rules: set dispatch_file or [[dispatch]] entries")]
    MissingDispatchRules,

    #[error("dispatch_file and [[dispatch]] entries are mutually exclusive")]
    ConflictingDispatchSources,

    #[error("no services configured")]
    NoServices,

    #[error("service name must not be empty")]
    EmptyServiceName,

    #[error("invalid origin for service {name}: {reason}")]
    InvalidOrigin { name: String, reason: String },

    #[error("invalid metrics address {0:?}")]
    InvalidMetricsAddress(String),

    #[error("unknown log level {0:?}")]
    UnknownLogLevel(String),
}

/// Check `config` for semantic errors.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.trim().is_empty() {
        errors.push(ValidationError::EmptyBindAddress);
    }

    match (config.dispatch_file.is_some(), config.dispatch.is_empty()) {
        (false, true) => errors.push(ValidationError::MissingDispatchRules),
        (true, false) => errors.push(ValidationError::ConflictingDispatchSources),
        _ => {}
    }

    if config.services.is_empty() {
        errors.push(ValidationError::NoServices);
    }
    for (name, origin) in &config.services {
        if name.is_empty() {
            errors.push(ValidationError::EmptyServiceName);
        }
        if let Err(e) = parse_origin(origin) {
            errors.push(ValidationError::InvalidOrigin {
                name: name.clone(),
                reason: e.to_string(),
            });
        }
    }

    let observability = &config.observability;
    if observability.metrics_enabled
        && observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            observability.metrics_address.clone(),
        ));
    }
    if !LOG_LEVELS.contains(&observability.log_level.to_ascii_lowercase().as_str()) {
        errors.push(ValidationError::UnknownLogLevel(observability.log_level.clone()));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
