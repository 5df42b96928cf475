//! Run configuration.
//!
//! A session is configured once, before ingestion starts: the granularity,
//! the separator used by package names, the placeholder marker some tools
//! put in front of unresolved names, and the list of participating tools.
//!
//! ```toml
//! granularity = "class"
//!
//! [[tools]]
//! name = "structure101"
//! convention = "underscored"
//! strip_prefixes = ["tajo"]
//!
//! [[tools]]
//! name = "pyne"
//! ```
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::ReconcileError;
use crate::core::matcher::{DEFAULT_SEPARATOR, DEFAULT_UNKNOWN_MARKER};
use crate::core::tools::IDEAL_NAME;
use crate::core::types::{Granularity, NamingConvention};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub granularity: Granularity,
    pub package_separator: String,
    pub unknown_marker: String,
    pub tools: Vec<ToolConfig>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            granularity: Granularity::Package,
            package_separator: DEFAULT_SEPARATOR.to_string(),
            unknown_marker: DEFAULT_UNKNOWN_MARKER.to_string(),
            tools: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ToolConfig {
    pub name: String,
    #[serde(default)]
    pub convention: NamingConvention,
    #[serde(default)]
    pub strip_prefixes: Vec<String>,
}

impl ToolConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            convention: NamingConvention::default(),
            strip_prefixes: Vec::new(),
        }
    }

    pub fn with_convention(mut self, convention: NamingConvention) -> Self {
        self.convention = convention;
        self
    }

    pub fn strip_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.strip_prefixes.push(prefix.into());
        self
    }
}

impl SessionConfig {
    pub fn new(granularity: Granularity, tools: impl IntoIterator<Item = ToolConfig>) -> Self {
        Self {
            granularity,
            tools: tools.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ReconcileError> {
        let config: SessionConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ReconcileError> {
        let text = fs::read_to_string(path).map_err(|source| ReconcileError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<(), ReconcileError> {
        if self.package_separator.is_empty() {
            return Err(ReconcileError::Config("package_separator must not be empty".into()));
        }
        if self.tools.is_empty() {
            return Err(ReconcileError::Config("at least one tool must be configured".into()));
        }
        if self.tools.len() >= u16::MAX as usize {
            return Err(ReconcileError::Config("too many tools".into()));
        }

        let mut seen = HashSet::new();
        for tool in &self.tools {
            if tool.name.trim().is_empty() {
                return Err(ReconcileError::Config("tool names must not be empty".into()));
            }
            if tool.name.eq_ignore_ascii_case(IDEAL_NAME) {
                return Err(ReconcileError::Config(format!(
                    "`{}` is reserved for the union of all tools",
                    tool.name
                )));
            }
            if !seen.insert(tool.name.as_str()) {
                return Err(ReconcileError::Config(format!("duplicate tool `{}`", tool.name)));
            }
        }
        Ok(())
    }
}
