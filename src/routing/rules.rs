//! Ordered dispatch rules.

use crate::error::PatternError;
use crate::routing::matcher::HostPathMatcher;

/// One routing rule: requests matching `matcher` go to `service_name`.
#[derive(Debug, Clone)]
pub struct ConfigRule {
    pub service_name: String,
    pub matcher: HostPathMatcher,
}

impl ConfigRule {
    pub fn new(service_name: impl Into<String>, matcher: HostPathMatcher) -> Self {
        Self {
            service_name: service_name.into(),
            matcher,
        }
    }

    /// Compile `pattern` and bind it to `service_name`.
    pub fn compile(service_name: impl Into<String>, pattern: &str) -> Result<Self, PatternError> {
        Ok(Self::new(service_name, HostPathMatcher::compile(pattern)?))
    }
}

/// Rules in declaration order. The first matching rule wins.
#[derive(Debug, Clone, Default)]
pub struct DispatchConfig {
    rules: Vec<ConfigRule>,
}

impl DispatchConfig {
    pub fn new(rules: Vec<ConfigRule>) -> Self {
        Self { rules }
    }

    /// Compile `(pattern, service)` pairs in order.
    ///
    /// Stops at the first invalid pattern; no partial rule set is returned.
    pub fn compile<I, P, S>(entries: I) -> Result<Self, PatternError>
    where
        I: IntoIterator<Item = (P, S)>,
        P: AsRef<str>,
        S: Into<String>,
    {
        let rules = entries
            .into_iter()
            .map(|(pattern, service)| ConfigRule::compile(service, pattern.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { rules })
    }

    pub fn rules(&self) -> &[ConfigRule] {
        &self.rules
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ConfigRule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl<'a> IntoIterator for &'a DispatchConfig {
    type Item = &'a ConfigRule;
    type IntoIter = std::slice::Iter<'a, ConfigRule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}
