/// `std::fs`-backed [`FileSystem`].
use super::FileSystem;
use crate::model::FileStat;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// The real filesystem.
#[derive(Clone, Copy, Debug, Default)]
pub struct OsFileSystem;

impl FileSystem for OsFileSystem {
    fn read_dir(&self, dir: &Path) -> io::Result<Vec<PathBuf>> {
        // `ReadDir` closes its handle on drop, which happens before this
        // function returns whether or not an entry errors mid-listing.
        let entries = fs::read_dir(dir)?;
        let mut paths = Vec::new();
        for entry in entries {
            paths.push(entry?.path());
        }
        Ok(paths)
    }

    fn metadata(&self, path: &Path) -> io::Result<FileStat> {
        match fs::metadata(path) {
            Ok(meta) => Ok(FileStat::from_metadata(&meta)),
            // A dangling link has no target to follow; report the link itself
            // so the caller sees a non-regular entry instead of an error.
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                fs::symlink_metadata(path).map(|meta| FileStat::from_metadata(&meta))
            }
            Err(err) => Err(err),
        }
    }
}
