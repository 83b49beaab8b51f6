//! Configuration loading.
//!
//! ```toml
//! strict = true
//!
//! [messages]
//! numeric = "must be a number"
//! "meters.min" = "cannot be negative"
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::validation::MessageCatalog;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionConfig {
    /// Fail engine builds on unknown or malformed rules instead of warning.
    #[serde(default = "default_strict")]
    pub strict: bool,

    /// Message template overrides (`rule`, `rule.kind` or `field.rule`).
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub messages: HashMap<String, String>,
}

fn default_strict() -> bool {
    true
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            strict: default_strict(),
            messages: HashMap::new(),
        }
    }
}

impl InteractionConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Loads `path`; a missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    pub fn message_catalog(&self) -> MessageCatalog {
        MessageCatalog::from(self.messages.clone())
    }
}
