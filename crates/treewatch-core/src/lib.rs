/// TreeWatch Core — polling directory-tree change detection.
///
/// This crate contains the scan-and-diff engine with no I/O loop, CLI, or
/// output formatting of its own. Callers decide how often to scan and what
/// to do with the results.
///
/// # Modules
///
/// - [`scanner`] — [`TreeScanner`]: traversal, mask filtering, and diffing.
/// - [`model`] — Per-file metadata snapshots and two-generation history.
/// - [`platform`] — The [`platform::FileSystem`] capability and its `std::fs` implementation.
/// - [`config`] — Serializable scanner configuration.
/// - [`error`] — Error types.
pub mod config;
pub mod error;
pub mod model;
pub mod platform;
pub mod scanner;

pub use config::ScannerConfig;
pub use error::{ConfigError, ScanError};
pub use model::{FileRecord, FileStat};
pub use scanner::{ScanDelta, ScanStats, TreeScanner};
