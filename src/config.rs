//! Editor configuration.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_MAP_SIZE, DEFAULT_STORAGE_KEY, UNCATEGORIZED};
use crate::error::{Error, Result};

/// Action group for names without a delimiter
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionFallback {
    /// Group under the full name ("admin" -> "admin")
    #[default]
    BareName,
    /// Group every undelimited name under one fixed key
    Sentinel(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EditorConfig {
    /// Category group for permissions without an explicit category.
    pub uncategorized_label: String,
    /// Action key policy for names without a delimiter.
    pub action_fallback: ActionFallback,
    /// Key under which the state document is persisted.
    pub storage_key: String,
    /// LMDB map size in bytes for the on-disk backend.
    pub map_size: usize,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            uncategorized_label: UNCATEGORIZED.into(),
            action_fallback: ActionFallback::BareName,
            storage_key: DEFAULT_STORAGE_KEY.into(),
            map_size: DEFAULT_MAP_SIZE,
        }
    }
}

impl EditorConfig {
    /// Parse a JSON config document; missing fields take their defaults
    pub fn from_json_str(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| Error::Config(e.to_string()))
    }
}
