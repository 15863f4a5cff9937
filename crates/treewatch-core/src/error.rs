/// Error types for the scanner and its configuration model.
///
/// Unreadable directories are deliberately absent: they are recovered from
/// inside a scan and only show up in [`crate::scanner::ScanStats`].
use std::path::PathBuf;
use thiserror::Error;

/// A scan could not be performed.
#[derive(Debug, Error)]
pub enum ScanError {
    /// An include or exclude mask is not a valid regular expression.
    #[error("invalid mask pattern `{pattern}`: {source}")]
    InvalidMask {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// A [`crate::config::ScannerConfig`] could not be loaded.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}
