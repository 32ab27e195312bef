//! Configuration loading from disk.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::schema::ProxyConfig;
use crate::config::validation::{validate_config, ValidationError};
use crate::error::PatternError;

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("XML parse error: {0}")]
    Xml(#[from] quick_xml::de::DeError),

    #[error("Failed to determine dispatch file type for {0:?}")]
    UnknownDispatchFormat(PathBuf),

    #[error(transparent)]
    Pattern(#[from] PatternError),

    #[error("Invalid service map format: {spec} ({reason})")]
    InvalidService { spec: String, reason: String },

    #[error("Duplicated service name: {0}")]
    DuplicateService(String),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

pub(crate) fn read_file(path: &Path) -> Result<String, ConfigError> {
    fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Load a settings file without validating it.
///
/// Callers that merge command-line overrides validate afterwards.
pub fn read_config(path: &Path) -> Result<ProxyConfig, ConfigError> {
    let content = read_file(path)?;
    Ok(toml::from_str(&content)?)
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<ProxyConfig, ConfigError> {
    let config = read_config(path)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn load_valid_config() {
        let file = write_temp(
            r#"
            dispatch_file = "dispatch.yaml"
            [services]
            default = "localhost:8081"
            "#,
        );
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.services.len(), 1);
    }

    #[test]
    fn load_reports_validation_errors() {
        let file = write_temp("[listener]\nbind_address = \"\"\n");
        let err = load_config(file.path()).unwrap_err();
        match err {
            ConfigError::Validation(errors) => assert!(errors.len() >= 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn load_reports_parse_errors() {
        let file = write_temp("services = 3");
        assert!(matches!(load_config(file.path()), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn load_missing_file() {
        let err = load_config(Path::new("/nonexistent/dispatch-emulator.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("/nonexistent/dispatch-emulator.toml"));
    }
}
