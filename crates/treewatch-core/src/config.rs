/// Serializable scanner configuration.
///
/// This is the on-disk (JSON) form of everything a [`crate::TreeScanner`]
/// can be configured with. Every field is optional in the file:
///
/// ```json
/// {
///   "directories": ["/srv/incoming"],
///   "include_masks": ["\\.csv$"],
///   "exclude_masks": ["^\\.", "\\.tmp$"],
///   "recurse": true
/// }
/// ```
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScannerConfig {
    pub directories: Vec<PathBuf>,
    /// Regular expressions; a file name must match one of them when non-empty.
    pub include_masks: Vec<String>,
    /// Regular expressions; a matching file name is always rejected.
    pub exclude_masks: Vec<String>,
    pub recurse: bool,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            directories: Vec::new(),
            include_masks: Vec::new(),
            exclude_masks: Vec::new(),
            recurse: true,
        }
    }
}

impl ScannerConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a JSON config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    pub fn to_json_pretty(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
