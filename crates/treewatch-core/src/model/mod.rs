/// Data model for tracked files.
///
/// Re-exports the per-file metadata snapshot and its two-generation history.
pub mod file_stat;

pub use file_stat::{FileRecord, FileStat};
