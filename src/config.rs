use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Error raised when a [`ScanConfig`] is rejected.
///
/// Malformed *input text* never produces an error anywhere in this crate —
/// it only degrades to fewer results. Configuration is the one thing that is
/// checked up front, before any scanning begins.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScanError {
    /// The configuration failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}

/// Configuration shared by the block extractor and the line scanner.
///
/// All vocabulary is caller-supplied: nothing about the embedding host is
/// hardcoded. A freshly defaulted config classifies every block `generic`
/// and uses a 4-space indent unit.
///
/// # Example
///
/// ```toml
/// host_api_markers = ["cmds.", "maya.cmds", "pymel"]
/// language_tags = ["mel"]
/// indent_unit = 4
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Substrings whose presence in a block body marks it as host-API code
    /// (e.g. a command namespace prefix like `"cmds."`). Matched
    /// case-sensitively.
    pub host_api_markers: BTreeSet<String>,

    /// Fence language tags treated as host scripting languages (e.g. `"mel"`).
    /// Matched against block tags ASCII-case-insensitively.
    pub language_tags: BTreeSet<String>,

    /// Expected spaces per indentation level for the bad-indentation check.
    pub indent_unit: usize,
}

fn default_indent_unit() -> usize {
    4
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            host_api_markers: BTreeSet::new(),
            language_tags: BTreeSet::new(),
            indent_unit: default_indent_unit(),
        }
    }
}

impl ScanConfig {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::InvalidConfiguration`] if `indent_unit` is zero
    /// or either marker set contains an empty string. An empty marker would
    /// make every block match, so it is rejected rather than silently
    /// classifying everything as host-API.
    pub fn validate(&self) -> Result<(), ScanError> {
        if self.indent_unit == 0 {
            return Err(ScanError::InvalidConfiguration(
                "indent_unit must be at least 1".to_string(),
            ));
        }
        if self.host_api_markers.iter().any(|m| m.is_empty()) {
            return Err(ScanError::InvalidConfiguration(
                "host_api_markers must not contain empty strings".to_string(),
            ));
        }
        if self.language_tags.iter().any(|t| t.is_empty()) {
            return Err(ScanError::InvalidConfiguration(
                "language_tags must not contain empty strings".to_string(),
            ));
        }
        Ok(())
    }

    /// Parse a configuration from TOML text and validate it.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: ScanConfig = toml::from_str(raw).context("failed to parse scan config")?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a TOML file and validate it.
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_toml_str(&raw)
            .with_context(|| format!("invalid config file {}", path.display()))
    }
}
