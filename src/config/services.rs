//! Service map construction.
//!
//! Services come from the `[services]` settings table and from
//! `name:origin` specs on the command line.

use std::collections::HashMap;
use std::sync::Arc;

use url::Url;

use crate::config::loader::ConfigError;
use crate::config::schema::ProxyConfig;
use crate::routing::Service;

/// Parse an origin, defaulting the scheme to `http://`.
pub fn parse_origin(origin: &str) -> Result<Url, url::ParseError> {
    if origin.starts_with("http://") || origin.starts_with("https://") {
        Url::parse(origin)
    } else {
        Url::parse(&format!("http://{origin}"))
    }
}

/// Split a `name:origin` spec, e.g. `default:localhost:8081`.
pub fn parse_service_spec(spec: &str) -> Result<(String, Url), ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidService {
        spec: spec.to_string(),
        reason,
    };

    let (name, origin) = spec
        .split_once(':')
        .ok_or_else(|| invalid("expected NAME:ORIGIN".to_string()))?;
    if name.is_empty() {
        return Err(invalid("empty service name".to_string()));
    }
    let origin = parse_origin(origin).map_err(|e| invalid(e.to_string()))?;
    Ok((name.to_string(), origin))
}

/// Merge command-line service specs into the settings table.
///
/// Specs override settings-file entries of the same name; a name repeated
/// among the specs themselves is an error.
pub fn merge_service_specs<S: AsRef<str>>(
    config: &mut ProxyConfig,
    specs: &[S],
) -> Result<(), ConfigError> {
    let mut seen = Vec::with_capacity(specs.len());
    for spec in specs {
        let (name, origin) = parse_service_spec(spec.as_ref())?;
        if seen.contains(&name) {
            return Err(ConfigError::DuplicateService(name));
        }
        config.services.insert(name.clone(), origin.to_string());
        seen.push(name);
    }
    Ok(())
}

/// Build the shared service map from validated settings.
pub fn build_service_map(config: &ProxyConfig) -> Result<HashMap<String, Arc<Service>>, ConfigError> {
    config
        .services
        .iter()
        .map(|(name, origin)| {
            let url = parse_origin(origin).map_err(|e| ConfigError::InvalidService {
                spec: format!("{name}:{origin}"),
                reason: e.to_string(),
            })?;
            Ok((name.clone(), Arc::new(Service::new(name.clone(), url))))
        })
        .collect()
}
