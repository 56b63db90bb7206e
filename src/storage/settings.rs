//! Workspace settings
//!
//! Settings live in `.doc-hunt/config.toml`. Every key is optional.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::tracker::RefreshScope;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to parse settings: {0}")]
    Parse(String),
}

/// Output format used when `--format` is not given
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DefaultFormat {
    #[default]
    Text,
    Json,
}

/// Workspace-level settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Sources refreshed by `update`
    pub refresh_scope: RefreshScope,

    /// Whether `update` also forgets sources that were deleted
    pub prune_deleted: bool,

    pub default_format: DefaultFormat,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            refresh_scope: RefreshScope::Updated,
            prune_deleted: true,
            default_format: DefaultFormat::Text,
        }
    }
}

impl Settings {
    /// Template written by `init`
    pub const TEMPLATE: &'static str = r#"# doc-hunt settings

# Sources whose fingerprint `update` records: "updated" or "all"
refresh_scope = "updated"

# Forget sources whose file was deleted when running `update`
prune_deleted = true

# Output format when --format is not given: "text" or "json"
default_format = "text"
"#;

    /// Loads settings, falling back to defaults when the file is absent
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings: {}", path.display()))?;

        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| SettingsError::Parse(e.to_string()))
            .context("Failed to parse settings")
    }
}
