//! Dispatch rule files.
//!
//! Two formats are understood:
//!
//! ```text
//! dispatch.yaml                      dispatch.xml
//! dispatch:                          <dispatch-entries>
//!   - url: "*/favicon.ico"             <dispatch>
//!     service: default                   <url>*/favicon.ico</url>
//!                                        <module>default</module>
//!                                      </dispatch>
//!                                    </dispatch-entries>
//! ```
//!
//! Entries are compiled while loading, so a bad pattern fails the whole file.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::config::loader::{read_file, ConfigError};
use crate::config::schema::DispatchEntry;
use crate::routing::DispatchConfig;

/// Produces the ordered rule set.
pub trait DispatchLoader {
    fn load(&self) -> Result<DispatchConfig, ConfigError>;
}

#[derive(Debug, Deserialize)]
struct DispatchYaml {
    #[serde(default)]
    dispatch: Vec<DispatchEntry>,
}

/// Loads `dispatch.yaml`.
#[derive(Debug, Clone)]
pub struct YamlDispatchLoader {
    path: PathBuf,
}

impl YamlDispatchLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Parse YAML text without touching the filesystem.
    pub fn parse(content: &str) -> Result<DispatchConfig, ConfigError> {
        let raw: DispatchYaml = serde_yaml::from_str(content)?;
        compile_entries(raw.dispatch.iter().map(|e| (e.url.as_str(), e.service.as_str())))
    }
}

impl DispatchLoader for YamlDispatchLoader {
    fn load(&self) -> Result<DispatchConfig, ConfigError> {
        Self::parse(&read_file(&self.path)?)
    }
}

#[derive(Debug, Deserialize)]
struct DispatchXml {
    #[serde(rename = "dispatch", default)]
    entries: Vec<DispatchEntryXml>,
}

#[derive(Debug, Deserialize)]
struct DispatchEntryXml {
    url: String,
    module: String,
}

/// Loads `dispatch.xml`.
#[derive(Debug, Clone)]
pub struct XmlDispatchLoader {
    path: PathBuf,
}

impl XmlDispatchLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Parse XML text without touching the filesystem.
    pub fn parse(content: &str) -> Result<DispatchConfig, ConfigError> {
        let raw: DispatchXml = quick_xml::de::from_str(content)?;
        compile_entries(
            raw.entries
                .iter()
                .map(|e| (e.url.trim(), e.module.trim())),
        )
    }
}

impl DispatchLoader for XmlDispatchLoader {
    fn load(&self) -> Result<DispatchConfig, ConfigError> {
        Self::parse(&read_file(&self.path)?)
    }
}

/// Loader for inline `[[dispatch]]` settings entries.
#[derive(Debug, Clone)]
pub struct InlineDispatchLoader<'a> {
    entries: &'a [DispatchEntry],
}

impl<'a> InlineDispatchLoader<'a> {
    pub fn new(entries: &'a [DispatchEntry]) -> Self {
        Self { entries }
    }
}

impl DispatchLoader for InlineDispatchLoader<'_> {
    fn load(&self) -> Result<DispatchConfig, ConfigError> {
        compile_entries(
            self.entries
                .iter()
                .map(|e| (e.url.as_str(), e.service.as_str())),
        )
    }
}

fn compile_entries<'a>(
    entries: impl Iterator<Item = (&'a str, &'a str)>,
) -> Result<DispatchConfig, ConfigError> {
    Ok(DispatchConfig::compile(entries)?)
}

/// Pick a loader from the file extension.
pub fn loader_for(path: &Path) -> Result<Box<dyn DispatchLoader>, ConfigError> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("yaml") | Some("yml") => Ok(Box::new(YamlDispatchLoader::new(path))),
        Some("xml") => Ok(Box::new(XmlDispatchLoader::new(path))),
        _ => Err(ConfigError::UnknownDispatchFormat(path.to_path_buf())),
    }
}
