//! Service lookup for a request's host and path.
//!
//! # Responsibilities
//! - Hold the service map and the ordered rule set
//! - Resolve (host, path) to the service of the first matching rule
//! - Reject rules naming unknown services at construction
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - O(n) scan in declaration order; first match wins
//! - No match is `None`, not an error

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::DispatchError;
use crate::routing::rules::DispatchConfig;
use crate::routing::service::Service;

/// Resolves requests to backend services.
#[derive(Debug)]
pub struct Dispatcher {
    services: HashMap<String, Arc<Service>>,
    rules: DispatchConfig,
}

impl Dispatcher {
    /// Build a dispatcher, checking that every rule targets a known service.
    pub fn new(
        services: HashMap<String, Arc<Service>>,
        rules: DispatchConfig,
    ) -> Result<Self, DispatchError> {
        if let Some(rule) = rules
            .iter()
            .find(|rule| !services.contains_key(&rule.service_name))
        {
            return Err(DispatchError::UndefinedService(rule.service_name.clone()));
        }

        tracing::debug!(
            services = services.len(),
            rules = rules.len(),
            "Dispatcher built"
        );

        Ok(Self { services, rules })
    }

    /// Returns the service of the first rule matching `host` and `path`.
    pub fn dispatch(&self, host: &str, path: &str) -> Option<&Arc<Service>> {
        let rule = self.rules.iter().find(|rule| rule.matcher.matches(host, path))?;
        tracing::trace!(
            host = %host,
            path = %path,
            pattern = %rule.matcher,
            service = %rule.service_name,
            "Rule matched"
        );
        self.services.get(&rule.service_name)
    }

    pub fn rules(&self) -> &DispatchConfig {
        &self.rules
    }

    pub fn services(&self) -> &HashMap<String, Arc<Service>> {
        &self.services
    }
}
