/// Filesystem access used by the scanner.
///
/// The scanner never touches `std::fs` directly; it goes through the
/// [`FileSystem`] trait so tests (and callers with unusual storage) can
/// supply their own listing and metadata primitives.
pub mod os;

pub use os::OsFileSystem;

use crate::model::FileStat;
use std::io;
use std::path::{Path, PathBuf};

/// Directory listing and per-entry metadata queries.
pub trait FileSystem {
    /// List the full paths of every entry directly inside `dir`.
    ///
    /// Implementations must release any directory handle before returning,
    /// on success and on error alike.
    fn read_dir(&self, dir: &Path) -> io::Result<Vec<PathBuf>>;

    /// Metadata for `path`. Symbolic links are followed; a link whose target
    /// is missing is reported as itself (neither file nor directory).
    fn metadata(&self, path: &Path) -> io::Result<FileStat>;
}
